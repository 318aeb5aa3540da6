use pretty_assertions::assert_eq;

use crate::ast::{Node, NodeKind, TypeError};
use crate::Parser;

fn byte(value: u8) -> Node {
    Node::Byte { value, inverted: false }
}

#[test]
fn accessors() {
    let node = Node::Byte { value: 0x4d, inverted: true };
    assert_eq!(node.byte_value(), Ok(0x4d));
    assert!(node.is_inverted());
    assert_eq!(
        node.text_value(),
        Err(TypeError::new("text value", NodeKind::Byte))
    );

    let node = Node::AnyBitmask { mask: 0x81, inverted: false };
    assert_eq!(node.byte_value(), Ok(0x81));

    let node = Node::CaseInsensitiveString("mz".to_owned());
    assert_eq!(node.text_value(), Ok("mz"));
    assert_eq!(
        node.byte_value(),
        Err(TypeError::new("byte value", NodeKind::CaseInsensitiveString))
    );

    let node = Node::Sequence(vec![byte(1), byte(2)]);
    assert!(node.byte_value().is_err());
    assert!(node.text_value().is_err());
    assert!(node.repeat_bounds().is_err());
    assert!(!node.is_inverted());
}

#[test]
fn repeat_bounds() {
    let body = || Box::new(byte(1));

    assert_eq!(Node::ZeroToMany(body()).repeat_bounds(), Ok((0, None)));
    assert_eq!(Node::OneToMany(body()).repeat_bounds(), Ok((1, None)));
    assert_eq!(Node::Optional(body()).repeat_bounds(), Ok((0, Some(1))));
    assert_eq!(
        Node::Repeat { count: 3, node: body() }.repeat_bounds(),
        Ok((3, Some(3)))
    );
    assert_eq!(
        Node::RepeatMinToMany { min: 2, node: body() }.repeat_bounds(),
        Ok((2, None))
    );
    assert_eq!(
        Node::RepeatMinToMax { min: 2, max: 5, node: body() }.repeat_bounds(),
        Ok((2, Some(5)))
    );
}

#[test]
fn children() {
    let range = Node::Range {
        start: Box::new(byte(0x00)),
        end: Box::new(byte(0x1f)),
        inverted: false,
    };
    assert_eq!(range.children(), vec![&byte(0x00), &byte(0x1f)]);

    let optional = Node::Optional(Box::new(byte(7)));
    assert_eq!(optional.children(), vec![&byte(7)]);

    assert!(Node::Any.children().is_empty());
    assert!(Node::String("ab".to_owned()).children().is_empty());
}

#[test]
fn invert() {
    let node = byte(1).invert().unwrap();
    assert_eq!(node, Node::Byte { value: 1, inverted: true });
    assert_eq!(node.invert().unwrap(), byte(1));

    assert_eq!(
        Node::Any.invert(),
        Err(TypeError::new("inversion", NodeKind::Any))
    );
    assert_eq!(
        Node::String("a".to_owned()).invert(),
        Err(TypeError::new("inversion", NodeKind::String))
    );
    assert!(Node::Sequence(vec![byte(1), byte(2)]).invert().is_err());
}

#[test]
fn type_error_message() {
    assert_eq!(
        TypeError::new("byte value", NodeKind::Sequence).to_string(),
        "byte value is not supported by SEQUENCE nodes"
    );
}

#[test]
fn single_position() {
    assert!(byte(1).is_single_position());
    assert!(Node::Any.is_single_position());
    assert!(Node::String("a".to_owned()).is_single_position());
    assert!(!Node::String("ab".to_owned()).is_single_position());
    assert!(!Node::Optional(Box::new(byte(1))).is_single_position());
}

#[test]
fn display() {
    let tests = vec![
        (line!(), "4D  5a", "4d 5a"),
        (line!(), "^4d &0F ~80 .", "^4d &0f ~80 ."),
        (line!(), "'MZ' `pe`", "'MZ' `pe`"),
        (line!(), "[ 01 03-05 ^[ff] ]", "[01 03-05 ^[ff]]"),
        (line!(), "^'a'-'z'", "^'a'-'z'"),
        (line!(), "01 (02|03) 04", "01 (02|03) 04"),
        (line!(), "(01 02)* 03", "(01 02)* 03"),
        (line!(), "(01|02)|03", "(01|02)|03"),
        (line!(), "(01 02) 03", "(01 02) 03"),
        (line!(), "01{2} 02{1,} 03{1,*} 04{0,5}", "01{2} 02{1,*} 03{1,*} 04{0,5}"),
        (line!(), "(01+)?", "(01+)?"),
        (line!(), "\\d \\S", "'0'-'9' ^[09 0a 0b 0c 0d 20]"),
    ];

    for (line, pattern, expected) in tests {
        let ast = Parser::new().parse(pattern).unwrap();
        let printed = ast.to_string();
        assert_eq!(printed, expected, "test at line {}", line);
        assert_eq!(
            Parser::new().parse(printed.as_str()).unwrap(),
            ast,
            "round-trip at line {}",
            line
        );
    }
}

#[test]
fn display_zero_repetitions() {
    let tests = vec![
        (Node::Repeat { count: 0, node: Box::new(byte(1)) }, "01{0}"),
        (
            Node::RepeatMinToMax { min: 0, max: 0, node: Box::new(byte(1)) },
            "01{0,0}",
        ),
    ];

    for (node, expected) in tests {
        assert_eq!(node.to_string(), expected);
        assert_eq!(
            Parser::new().parse(expected).unwrap_err().code(),
            "E004",
            "{}",
            expected
        );
    }
}

#[cfg(feature = "ascii-tree")]
#[test]
fn ascii_tree() {
    let ast = Parser::new().parse("4d ^[01-03 'a'] (90|cc){2,3}").unwrap();

    assert_eq!(
        ast.ascii_tree_string(),
        r#" SEQUENCE
 ├─ BYTE 0x4d
 ├─ ^SET
 │  ├─ RANGE
 │  │  ├─ BYTE 0x01
 │  │  └─ BYTE 0x03
 │  └─ STRING "a"
 └─ REPEAT_MIN_TO_MAX 2..=3
    └─ ALTERNATIVES
       ├─ BYTE 0x90
       └─ BYTE 0xcc
"#
    );
}
