use pretty_assertions::assert_eq;

use bytepat_parser::ast::Node;
use bytepat_parser::Error as ParseError;

use crate::automaton::{
    DefaultStateFactory, StateId, Transition, TransitionFactory,
};
use crate::byteset::ByteSet;
use crate::compiler::{Compiler, Error, PatternParser};
use crate::nfa::GlushkovBuilder;
use crate::{compile, PatternId};

#[test]
fn optimization() {
    let matcher = Compiler::new().optimize(true).compile("01|02|7f").unwrap();
    assert_eq!(matcher.state_count(), 2);

    let matcher = Compiler::new().optimize(false).compile("01|02|7f").unwrap();
    assert_eq!(matcher.state_count(), 4);

    for optimize in [false, true] {
        let matcher =
            Compiler::new().optimize(optimize).compile("01|02|7f").unwrap();
        let accepted: Vec<u8> =
            (0..=255_u8).filter(|b| matcher.accepts(&[*b])).collect();
        assert_eq!(accepted, vec![0x01, 0x02, 0x7f]);
    }
}

#[test]
fn deterministic() {
    let dfa = Compiler::new().compile("(01|01 02)+").unwrap();
    let nfa = Compiler::new().deterministic(false).compile("(01|01 02)+").unwrap();

    assert!(dfa.is_deterministic());
    assert!(dfa.dfa().is_some());
    assert!(!nfa.is_deterministic());
    assert!(nfa.nfa().is_some());

    let inputs: [&[u8]; 3] = [&[0x01, 0x01, 0x02], &[0x01, 0x02, 0x02], &[]];
    for data in inputs {
        assert_eq!(dfa.accepts(data), nfa.accepts(data), "{:?}", data);
    }
}

#[test]
fn errors() {
    let err = compile("4d 5").unwrap_err();
    match &err {
        Error::Parse(err) => assert_eq!(err.code(), "E001"),
        err => panic!("unexpected error: {:?}", err),
    }

    assert_eq!(compile("^[00-ff]").unwrap_err(), Error::EmptyTransition);
    assert_eq!(
        Error::EmptyTransition.to_string(),
        "the pattern contains a set that doesn't match any byte"
    );

    for optimize in [false, true] {
        for pattern in ["^[00-ff]|01", "01|~00", "(01|^[. 02])+"] {
            assert_eq!(
                Compiler::new().optimize(optimize).compile(pattern).unwrap_err(),
                Error::EmptyTransition,
                "{} (optimize: {})",
                pattern,
                optimize
            );
        }
    }
}

#[test]
fn too_large() {
    assert_eq!(compile("01{4294967295}").unwrap_err(), Error::TooLarge);
    assert_eq!(
        Compiler::new()
            .deterministic(false)
            .compile("(01{1000}){1000}")
            .unwrap_err(),
        Error::TooLarge
    );
    assert_eq!(Error::TooLarge.to_string(), "the pattern is too large");
}

#[test]
fn colorized_errors() {
    let err = Compiler::new().colorize_errors(true).compile("01{0}").unwrap_err();
    assert!(err.to_string().contains('\u{1b}'));

    let err = Compiler::new().compile("01{0}").unwrap_err();
    assert!(!err.to_string().contains('\u{1b}'));
    assert!(err.to_string().starts_with("error[E004]: invalid quantifier"));
}

struct AnyByteParser;

impl PatternParser for AnyByteParser {
    fn parse(&self, _pattern: &str) -> Result<Node, ParseError> {
        Ok(Node::Any)
    }
}

#[test]
fn custom_parser() {
    let matcher = Compiler::new()
        .with_parser(Box::new(AnyByteParser))
        .compile("this is not a valid pattern")
        .unwrap();

    assert!(matcher.accepts(&[0xaa]));
    assert!(!matcher.accepts(&[0xaa, 0xbb]));
}

/// Rejects transitions that match more than half of the byte values.
struct NarrowTransitions;

impl TransitionFactory for NarrowTransitions {
    fn create(
        &self,
        bytes: ByteSet,
        inverted: bool,
        target: StateId,
    ) -> Result<Transition, Error> {
        let bytes = if inverted { bytes.complement() } else { bytes };
        if bytes.len() > 128 {
            return Err(Error::InvalidAutomaton(format!(
                "transition matching {} bytes",
                bytes.len()
            )));
        }
        Ok(Transition::new(bytes, target))
    }
}

#[test]
fn custom_builder() {
    let mut compiler = Compiler::new();

    compiler.with_builder(Box::new(GlushkovBuilder::with_factories(
        Box::new(DefaultStateFactory),
        Box::new(NarrowTransitions),
    )));

    assert!(compiler.compile("01 [00-7f]").is_ok());
    assert_eq!(
        compiler.compile("01 .").unwrap_err(),
        Error::InvalidAutomaton("transition matching 256 bytes".to_string())
    );
    assert!(compiler.compile("01 ^01").is_err());
}

#[test]
fn compile_many() {
    let matcher = Compiler::new().compile_many(&["01 02", "01 .", "03+"]).unwrap();

    let m = matcher.matches_at(&[0x01, 0x02], 0).unwrap();
    assert_eq!(m.range, 0..2);
    assert_eq!(m.patterns, vec![PatternId(0), PatternId(1)]);

    let m = matcher.find(&[0x00, 0x03, 0x03, 0x03]).unwrap();
    assert_eq!(m.range, 1..4);
    assert_eq!(m.patterns, vec![PatternId(2)]);

    assert!(Compiler::new().compile_many(&["01", "4d 5"]).is_err());
    assert!(matches!(
        Compiler::new().compile_many(&[]).unwrap_err(),
        Error::InvalidAutomaton(_)
    ));
}

#[test]
fn parse() {
    assert_eq!(
        Compiler::new().optimize(true).parse("01|02").unwrap().to_string(),
        "[01 02]"
    );
    assert_eq!(
        Compiler::new().optimize(false).parse("01|02").unwrap().to_string(),
        "01|02"
    );
}
