/*! End-to-end tests. */
use itertools::Itertools;
use pretty_assertions::assert_eq;

use crate::compiler::{Compiler, Error};
use crate::{compile, PatternId};

/// Returns every string of up to `max_len` bytes, where each byte is taken
/// from `alphabet`.
pub(crate) fn inputs(alphabet: &[u8], max_len: usize) -> Vec<Vec<u8>> {
    let mut result = vec![vec![]];
    for len in 1..=max_len {
        result.extend(
            itertools::repeat_n(alphabet.iter().copied(), len)
                .multi_cartesian_product(),
        );
    }
    result
}

macro_rules! test_pattern {
    ($pattern:expr, $data:expr, $expected_result:expr) => {{
        let data: &[u8] = $data;
        for deterministic in [true, false] {
            for optimize in [true, false] {
                let matcher = Compiler::new()
                    .deterministic(deterministic)
                    .optimize(optimize)
                    .compile($pattern)
                    .unwrap();

                assert_eq!(
                    matcher.accepts(data),
                    $expected_result,
                    "\n\n`{}` should {}match {:02x?} (deterministic: {}, optimize: {})",
                    $pattern,
                    if $expected_result { "" } else { "not " },
                    data,
                    deterministic,
                    optimize,
                );
            }
        }
    }};
}

macro_rules! pattern_true {
    ($pattern:expr, $data:expr) => {{
        test_pattern!($pattern, $data, true);
    }};
}

macro_rules! pattern_false {
    ($pattern:expr, $data:expr) => {{
        test_pattern!($pattern, $data, false);
    }};
}

#[test]
fn bytes() {
    for value in 0..=255_u8 {
        let pattern = format!("{:02X}", value);
        pattern_true!(pattern.as_str(), &[value]);
        pattern_false!(pattern.as_str(), &[value.wrapping_add(1)]);

        let inverted = compile(format!("^{:02x}", value).as_str()).unwrap();
        let accepted = (0..=255_u8).filter(|b| inverted.accepts(&[*b])).count();
        assert_eq!(accepted, 255);
    }
}

#[test]
fn bitmasks() {
    for mask in [0x00_u8, 0x01, 0x81, 0xf0, 0xff] {
        let all = compile(format!("&{:02x}", mask).as_str()).unwrap();
        for b in 0..=255_u8 {
            assert_eq!(all.accepts(&[b]), b & mask == mask);
        }
        // `~00` doesn't match any byte, it can't be compiled.
        if mask == 0 {
            continue;
        }
        let any = compile(format!("~{:02x}", mask).as_str()).unwrap();
        for b in 0..=255_u8 {
            assert_eq!(any.accepts(&[b]), b & mask != 0);
        }
    }
    pattern_true!("^&81", &[0x80]);
    pattern_false!("^&81", &[0x81]);
    pattern_true!("^~81", &[0x7e]);
    pattern_false!("^~81", &[0x01]);
    assert_eq!(compile("~00").unwrap_err(), Error::EmptyTransition);
    assert_eq!(compile("^&00").unwrap_err(), Error::EmptyTransition);
}

#[test]
fn strings() {
    pattern_true!("'MZ'", b"MZ");
    pattern_false!("'MZ'", b"Mz");
    pattern_true!("`MZ`", b"Mz");
    pattern_true!("'a b'", b"a b");
    pattern_true!("'#'", b"#");
    pattern_true!("'MZ' 90", b"MZ\x90");
}

#[test]
fn sets_and_ranges() {
    pattern_true!("[00-1f]", &[0x1f]);
    pattern_false!("[00-1f]", &[0x20]);
    pattern_true!("^[00-1f]", &[0x20]);
    pattern_false!("^[00-1f]", &[0x00]);
    pattern_true!("[01 ^[01]]", &[0x01]);
    pattern_true!("[01 ^[01]]", &[0x02]);
    pattern_true!("['a'-'c' 'xyz']", b"y");
    pattern_false!("['a'-'c' 'xyz']", b"d");
    pattern_true!("'z'-'a'", b"m");
    pattern_true!("\\w+ \\s \\d", b"ab_1\t7");
    pattern_false!("\\W", b"a");
    pattern_true!("\\I", &[0x80]);
    pattern_false!("\\i", &[0x80]);

    let control = compile("[00-1f]").unwrap();
    let accepted: Vec<u8> =
        (0..=255_u8).filter(|b| control.accepts(&[*b])).collect();
    assert_eq!(accepted, (0x00..=0x1f).collect::<Vec<u8>>());

    let printable = compile("^[00-1f]").unwrap();
    let accepted = (0..=255_u8).filter(|b| printable.accepts(&[*b])).count();
    assert_eq!(accepted, 224);
}

#[test]
fn sequences_and_alternatives() {
    pattern_true!("01 02 03", &[1, 2, 3]);
    pattern_false!("01 02 03", &[1, 2]);
    pattern_true!("01|02|7f", &[0x7f]);
    pattern_false!("01|02|7f", &[0x03]);
    pattern_true!("01 (02|03 04)", &[1, 3, 4]);
    pattern_false!("01 (02|03 04)", &[1, 3]);
    pattern_true!("(01|'ab') 'c'", b"abc");
    pattern_true!("(01|'ab') 'c'", b"\x01c");

    let alternatives = compile("01|02|7f").unwrap();
    let accepted: Vec<u8> =
        (0..=255_u8).filter(|b| alternatives.accepts(&[*b])).collect();
    assert_eq!(accepted, vec![0x01, 0x02, 0x7f]);
}

#[test]
fn sequences_are_associative() {
    let alphabet = &[0x01, 0x02, 0x03, 0x04];
    let patterns = [
        ["01 02* 03?", "(01 02*) 03?", "01 (02* 03?)"],
        ["(01|02) 03+ 04", "((01|02) 03+) 04", "(01|02) (03+ 04)"],
        ["01? 02? 03?", "(01? 02?) 03?", "01? (02? 03?)"],
    ];
    for [a, b, c] in patterns {
        let a_matcher = compile(a).unwrap();
        let b_matcher = compile(b).unwrap();
        let c_matcher = compile(c).unwrap();
        for input in inputs(alphabet, 5) {
            let expected = a_matcher.accepts(&input);
            assert_eq!(b_matcher.accepts(&input), expected, "{} {:?}", b, input);
            assert_eq!(c_matcher.accepts(&input), expected, "{} {:?}", c, input);
        }
    }
}

#[test]
fn quantifier_identities() {
    let alphabet = &[0x01, 0x02, 0x03];
    let identities = [
        ("(01 02?){0,*}", "(01 02?)*"),
        ("(01 02?){0,}", "(01 02?)*"),
        ("(01 02?){1,*}", "(01 02?)+"),
        ("(01 02?){0,1}", "(01 02?)?"),
        ("(01|02 03){0,*}", "(01|02 03)*"),
        ("(01|02 03){1,}", "(01|02 03)+"),
        ("(01|02 03){0,1}", "(01|02 03)?"),
        ("01{2,2}", "01{2}"),
        ("01{3}", "01 01 01"),
    ];
    for (a, b) in identities {
        let a_matcher = compile(a).unwrap();
        let b_matcher = compile(b).unwrap();
        for input in inputs(alphabet, 6) {
            assert_eq!(
                a_matcher.accepts(&input),
                b_matcher.accepts(&input),
                "`{}` and `{}` disagree on {:?}",
                a,
                b,
                input
            );
        }
    }
}

#[test]
fn repeated_string() {
    let matcher = compile("'ab'{2}").unwrap();
    for input in inputs(b"abc", 4) {
        assert_eq!(matcher.accepts(&input), input == b"abab", "{:?}", input);
    }
    pattern_true!("'ab'{2}", b"abab");
    pattern_false!("'ab'{2}", b"ab");
    pattern_false!("'ab'{2}", b"ababab");
}

#[test]
fn nfa_and_dfa_agree() {
    let patterns = [
        "01 02 03",
        "01|02|7f",
        "(01|02)* 01 02",
        "01{1,3} 02{2,}",
        "^[01 02]+ 03?",
        "[01 ^[01]] 02",
        "(01 (02|03)?)+ 04",
        ". . 01",
        "(01* 02?)* 03",
    ];
    let alphabet = &[0x00, 0x01, 0x02, 0x03, 0x04];
    for pattern in patterns {
        let dfa = Compiler::new().deterministic(true).compile(pattern).unwrap();
        let nfa =
            Compiler::new().deterministic(false).compile(pattern).unwrap();
        for input in inputs(alphabet, 5) {
            assert_eq!(
                dfa.accepts(&input),
                nfa.accepts(&input),
                "`{}` on {:02x?}",
                pattern,
                input
            );
            assert_eq!(
                dfa.match_len_at(&input, 0),
                nfa.match_len_at(&input, 0),
                "`{}` on {:02x?}",
                pattern,
                input
            );
        }
    }
}

#[test]
fn multiple_patterns() {
    let matcher = Compiler::new()
        .compile_many(&["4d 5a", "'MZ' 90", "50 45 00 00"])
        .unwrap();

    let data = b"..MZ\x90..PE\x00\x00..MZ";
    let matches: Vec<_> = matcher
        .find_iter(data)
        .map(|m| (m.range, m.patterns))
        .collect();

    assert_eq!(
        matches,
        vec![
            (2..5, vec![PatternId(1)]),
            (7..11, vec![PatternId(2)]),
            (13..15, vec![PatternId(0)]),
        ]
    );
}

#[test]
fn deeply_nested() {
    let pattern = format!("{}01{}", "(".repeat(40), ")+".repeat(40));
    pattern_true!(pattern.as_str(), &[0x01, 0x01]);
    pattern_false!(pattern.as_str(), &[]);
}
