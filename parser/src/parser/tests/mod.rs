use pretty_assertions::assert_eq;

use crate::ast::Node;
use crate::parser::{ErrorInfo, Parser, SourceCode};


fn byte(value: u8) -> Node {
    Node::Byte { value, inverted: false }
}

fn string(s: &str) -> Node {
    Node::String(s.to_owned())
}

macro_rules! parse_ok {
    ($pattern:expr, $expected:expr) => {{
        assert_eq!(Parser::new().parse($pattern).unwrap(), $expected);
    }};
}

macro_rules! parse_err {
    ($pattern:expr, $code:expr) => {{
        let err = Parser::new().parse($pattern).unwrap_err();
        assert_eq!(err.code(), $code, "{}", err);
    }};
}

#[test]
fn bytes() {
    for value in 0..=255_u8 {
        parse_ok!(format!("{:02x}", value).as_str(), byte(value));
        parse_ok!(format!("{:02X}", value).as_str(), byte(value));
        parse_ok!(
            format!("^{:02x}", value).as_str(),
            Node::Byte { value, inverted: true }
        );
    }
}

#[test]
fn bitmasks() {
    parse_ok!("&0f", Node::AllBitmask { mask: 0x0f, inverted: false });
    parse_ok!("~81", Node::AnyBitmask { mask: 0x81, inverted: false });
    parse_ok!("^&80", Node::AllBitmask { mask: 0x80, inverted: true });
    parse_ok!("^~01", Node::AnyBitmask { mask: 0x01, inverted: true });
}

#[test]
fn strings() {
    parse_ok!("'MZ'", string("MZ"));
    parse_ok!("`mz`", Node::CaseInsensitiveString("mz".to_owned()));
    // Whitespaces and `#` are part of the string.
    parse_ok!("'a b # c'", string("a b # c"));
    // Characters in the range U+0080-U+00FF are single bytes.
    parse_ok!("'é'", string("é"));
}

#[test]
fn any() {
    parse_ok!(".", Node::Any);
    parse_ok!(". .", Node::Sequence(vec![Node::Any, Node::Any]));
}

#[test]
fn sequences_and_alternatives() {
    parse_ok!("01 02 03", Node::Sequence(vec![byte(1), byte(2), byte(3)]));
    parse_ok!("010203", Node::Sequence(vec![byte(1), byte(2), byte(3)]));
    parse_ok!(
        "01|02|7f",
        Node::Alternatives(vec![byte(1), byte(2), byte(0x7f)])
    );
    parse_ok!(
        "01 02 | 03",
        Node::Alternatives(vec![
            Node::Sequence(vec![byte(1), byte(2)]),
            byte(3)
        ])
    );
    parse_ok!(
        "01 (02 | 03) 04",
        Node::Sequence(vec![
            byte(1),
            Node::Alternatives(vec![byte(2), byte(3)]),
            byte(4)
        ])
    );
    // A group with a single item is just the item.
    parse_ok!("((01))", byte(1));
}

#[test]
fn quantifiers() {
    let b = || Box::new(byte(1));

    parse_ok!("01*", Node::ZeroToMany(b()));
    parse_ok!("01+", Node::OneToMany(b()));
    parse_ok!("01?", Node::Optional(b()));
    parse_ok!("01{3}", Node::Repeat { count: 3, node: b() });
    parse_ok!("01{3,}", Node::RepeatMinToMany { min: 3, node: b() });
    parse_ok!("01{3,*}", Node::RepeatMinToMany { min: 3, node: b() });
    parse_ok!("01{0,*}", Node::RepeatMinToMany { min: 0, node: b() });
    parse_ok!("01{3,5}", Node::RepeatMinToMax { min: 3, max: 5, node: b() });
    parse_ok!("01{0,1}", Node::RepeatMinToMax { min: 0, max: 1, node: b() });
    parse_ok!("01{2,2}", Node::RepeatMinToMax { min: 2, max: 2, node: b() });

    // The quantifier applies to the inverted value.
    parse_ok!(
        "^01*",
        Node::ZeroToMany(Box::new(Node::Byte { value: 1, inverted: true }))
    );

    parse_ok!(
        "(01 02)+",
        Node::OneToMany(Box::new(Node::Sequence(vec![byte(1), byte(2)])))
    );

    parse_ok!("(01*)?", Node::Optional(Box::new(Node::ZeroToMany(b()))));
}

#[test]
fn ranges() {
    parse_ok!(
        "00-1f",
        Node::Range {
            start: Box::new(byte(0x00)),
            end: Box::new(byte(0x1f)),
            inverted: false
        }
    );
    parse_ok!(
        "^'a' - 'z'",
        Node::Range {
            start: Box::new(string("a")),
            end: Box::new(string("z")),
            inverted: true
        }
    );
    // Bounds can be in any order.
    parse_ok!(
        "ff-00",
        Node::Range {
            start: Box::new(byte(0xff)),
            end: Box::new(byte(0x00)),
            inverted: false
        }
    );
}

#[test]
fn sets() {
    parse_ok!(
        "[01 01 00-05 'ab' &80]",
        Node::Set {
            members: vec![
                byte(1),
                byte(1),
                Node::Range {
                    start: Box::new(byte(0x00)),
                    end: Box::new(byte(0x05)),
                    inverted: false
                },
                string("ab"),
                Node::AllBitmask { mask: 0x80, inverted: false },
            ],
            inverted: false
        }
    );
    parse_ok!(
        "^[00-1f]",
        Node::Set {
            members: vec![Node::Range {
                start: Box::new(byte(0x00)),
                end: Box::new(byte(0x1f)),
                inverted: false
            }],
            inverted: true
        }
    );
    parse_ok!(
        "[01 ^[01]]",
        Node::Set {
            members: vec![
                byte(1),
                Node::Set { members: vec![byte(1)], inverted: true }
            ],
            inverted: false
        }
    );
    parse_ok!(
        "[^01]",
        Node::Set {
            members: vec![Node::Byte { value: 1, inverted: true }],
            inverted: false
        }
    );
}

#[test]
fn shorthands() {
    let byte_tests =
        [("\\t", 0x09), ("\\n", 0x0a), ("\\v", 0x0b), ("\\f", 0x0c)];
    for (pattern, value) in byte_tests {
        parse_ok!(pattern, byte(value));
    }
    parse_ok!("\\r", byte(0x0d));
    parse_ok!("\\e", byte(0x1b));

    let char_range = |start: &str, end: &str, inverted| Node::Range {
        start: Box::new(string(start)),
        end: Box::new(string(end)),
        inverted,
    };

    parse_ok!("\\d", char_range("0", "9", false));
    parse_ok!("\\D", char_range("0", "9", true));
    parse_ok!("\\l", char_range("a", "z", false));
    parse_ok!("\\U", char_range("A", "Z", true));
    parse_ok!(
        "\\I",
        Node::Range {
            start: Box::new(byte(0x00)),
            end: Box::new(byte(0x7f)),
            inverted: true
        }
    );
    parse_ok!(
        "\\w",
        Node::Set {
            members: vec![
                char_range("0", "9", false),
                char_range("a", "z", false),
                char_range("A", "Z", false),
                string("_"),
            ],
            inverted: false
        }
    );
    parse_ok!(
        "\\s",
        Node::Set {
            members: vec![
                byte(0x09),
                byte(0x0a),
                byte(0x0b),
                byte(0x0c),
                byte(0x0d),
                byte(0x20)
            ],
            inverted: false
        }
    );
    // Inverting an inverted shorthand cancels the inversion.
    parse_ok!("^\\D", char_range("0", "9", false));
}

#[test]
fn whitespaces_and_comments() {
    parse_ok!(
        "01   # first byte\n\t02 # second byte",
        Node::Sequence(vec![byte(1), byte(2)])
    );
    parse_ok!("\r\n01\r\n", byte(1));
}

#[test]
fn syntax_errors() {
    parse_err!("4d 5", "E001");
    parse_err!("0g", "E001");
    parse_err!("&g0", "E001");
    parse_err!("~0", "E001");
    parse_err!("'abc", "E001");
    parse_err!("`abc", "E001");
    parse_err!("(01 02", "E001");
    parse_err!("[01 02", "E001");
    parse_err!("01{2", "E001");
    parse_err!("01{ 2}", "E001");
    parse_err!("*", "E001");
    parse_err!("01 | ", "E001");
    parse_err!("01**", "E001");
    parse_err!("[]", "E001");
    parse_err!("()", "E001");
    parse_err!("|", "E001");
    parse_err!("||01", "E001");
    parse_err!("# comment\n| 01", "E001");
}

#[test]
fn semantic_errors() {
    parse_err!("", "E002");
    parse_err!("   \n\t ", "E002");
    parse_err!("# just a comment", "E002");

    parse_err!("''", "E003");
    parse_err!("``", "E003");
    parse_err!("'ĀB'", "E003");

    parse_err!("01{0}", "E004");
    parse_err!("01{0,0}", "E004");
    parse_err!("01{5,3}", "E004");
    parse_err!("01{99999999999}", "E004");

    parse_err!("^(01 02)", "E005");
    parse_err!("^'ab'", "E005");
    parse_err!("^`ab`", "E005");
    parse_err!("^.", "E005");
    parse_err!("01-^02", "E005");
    parse_err!("[^.]", "E005");

    parse_err!("'ab'-'z'", "E006");

    parse_err!("\\q", "E007");
    parse_err!("\\T", "E007");
}

#[test]
fn error_report() {
    let err = Parser::new()
        .parse(SourceCode::from("01{5,3}").with_origin("test.pat"))
        .unwrap_err();

    assert_eq!(err.span().range(), 2..7);
    assert_eq!(
        err.to_string(),
        r#"error[E004]: invalid quantifier
 --> test.pat:1:3
  |
1 | 01{5,3}
  |   ^^^^^ lower bound (5) is greater than upper bound (3)
  |"#
    );

    match err.info() {
        ErrorInfo::InvalidQuantifier { error_msg, .. } => {
            assert_eq!(
                error_msg,
                "lower bound (5) is greater than upper bound (3)"
            );
        }
        info => panic!("unexpected error: {:?}", info),
    }
}

#[test]
fn syntax_error_message() {
    let err = Parser::new().parse("01 (02").unwrap_err();
    match err.info() {
        ErrorInfo::SyntaxError { error_msg, .. } => {
            assert!(
                error_msg.contains("closing parenthesis `)`"),
                "{}",
                error_msg
            );
        }
        info => panic!("unexpected error: {:?}", info),
    }
}

#[test]
fn invalid_utf8() {
    let err = Parser::new().parse(b"01 \xff".as_slice()).unwrap_err();
    assert_eq!(err.code(), "E008");
    assert_eq!(err.span().start(), 3);
}

#[test]
fn pathological_case() {
    // Make sure that nested patterns with a missing parenthesis don't take
    // forever to parse.
    let pattern = format!("{}01{}", "(".repeat(50), ")".repeat(49));
    assert!(Parser::new().parse(pattern.as_str()).is_err());

    let pattern = format!("{}01{}", "(".repeat(50), ")".repeat(50));
    parse_ok!(pattern.as_str(), byte(1));
}
