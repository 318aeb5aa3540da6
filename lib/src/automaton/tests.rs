use pretty_assertions::assert_eq;

use crate::automaton::{
    Automaton, DefaultTransitionFactory, PatternId, State, StateId,
    Transition, TransitionFactory,
};
use crate::byteset::ByteSet;
use crate::compiler::Error;

fn transition(byte: u8, target: StateId) -> Transition {
    Transition::new(ByteSet::single(byte), target)
}

/// Builds `s0 -01-> s1 -02-> s2`, `s0 -03-> s2`, with a loop `s2 -04-> s2`
/// and a transition back from `s2` to `s1`.
fn diamond_with_loops() -> (Automaton, StateId) {
    let mut automaton = Automaton::new();
    let s0 = automaton.add_state(State::default());
    let s1 = automaton.add_state(State::default());
    let s2 = automaton.add_state(State::default());

    automaton.add_transition(s0, transition(0x01, s1));
    automaton.add_transition(s0, transition(0x03, s2));
    automaton.add_transition(s1, transition(0x02, s2));
    automaton.add_transition(s2, transition(0x04, s2));
    automaton.add_transition(s2, transition(0x05, s1));
    automaton.set_final(s2, true);
    automaton.associate(s2, PatternId(7));

    (automaton, s0)
}

#[test]
fn add_transition() {
    let mut automaton = Automaton::new();
    let s0 = automaton.add_state(State::default());
    let s1 = automaton.add_state(State::default());

    automaton.add_transition(s0, transition(0x01, s1));
    automaton.add_transition(s0, transition(0x01, s1));
    automaton.add_transition(s0, transition(0x02, s1));

    assert_eq!(automaton.state(s0).transitions().len(), 2);
    assert_eq!(automaton.transition_count(), 2);
    assert_eq!(automaton.state(s0).targets(0x01).collect::<Vec<_>>(), [s1]);
    assert_eq!(automaton.state(s0).targets(0x03).count(), 0);
}

#[test]
fn reachable() {
    let (mut automaton, s0) = diamond_with_loops();
    let orphan = automaton.add_state(State::default());
    automaton.add_transition(orphan, transition(0x01, s0));

    let reachable = automaton.reachable(s0);
    assert_eq!(reachable.len(), 3);
    assert!(!reachable.contains(&orphan));
    assert_eq!(automaton.reachable(orphan).len(), 4);
}

#[test]
fn deep_copy() {
    let (mut automaton, s0) = diamond_with_loops();
    let (copy, map) = automaton.deep_copy(s0);

    assert_eq!(automaton.state_count(), 6);
    assert_eq!(map.len(), 3);
    assert_eq!(map[&s0], copy);

    // The copy has the same shape as the original, but every transition
    // points to states within the copy.
    let copies = automaton.reachable(copy);
    assert_eq!(copies.len(), 3);
    for id in &copies {
        assert!(!map.contains_key(id));
    }

    let s2_copy = map[&StateId::from(2_usize)];
    let s1_copy = map[&StateId::from(1_usize)];
    assert!(automaton.is_final(s2_copy));
    assert_eq!(automaton.state(s2_copy).associations(), &[PatternId(7)]);
    assert_eq!(
        automaton.state(s2_copy).targets(0x04).collect::<Vec<_>>(),
        [s2_copy]
    );
    assert_eq!(
        automaton.state(s2_copy).targets(0x05).collect::<Vec<_>>(),
        [s1_copy]
    );
    assert_eq!(
        automaton.to_text(s0).lines().count(),
        automaton.to_text(copy).lines().count()
    );
}

#[test]
fn redirect() {
    let (mut automaton, s0) = diamond_with_loops();
    let s1 = StateId::from(1_usize);
    let s2 = StateId::from(2_usize);

    automaton.redirect(s1, s2);

    assert_eq!(automaton.state(s0).targets(0x01).collect::<Vec<_>>(), [s2]);
    assert_eq!(automaton.state(s2).targets(0x05).collect::<Vec<_>>(), [s2]);
    assert_eq!(automaton.reachable(s0), vec![s0, s2]);
}

#[test]
fn append() {
    let (mut a, a0) = diamond_with_loops();
    let (b, b0) = diamond_with_loops();

    let translate = a.append(b);
    let b0 = translate(b0);

    assert_eq!(b0, StateId::from(3_usize));
    assert_eq!(a.state_count(), 6);
    assert_eq!(a.reachable(b0).len(), 3);
    assert!(a.reachable(b0).iter().all(|id| id.index() >= 3));
    assert!(a.reachable(a0).iter().all(|id| id.index() < 3));
}

#[test]
fn associations_are_sorted() {
    let mut automaton = Automaton::new();
    let s0 = automaton.add_state(State::default());
    automaton.associate(s0, PatternId(3));
    automaton.associate(s0, PatternId(1));
    automaton.associate(s0, PatternId(3));
    assert_eq!(automaton.state(s0).associations(), &[PatternId(1), PatternId(3)]);
}

#[test]
fn transition_factory() {
    let factory = DefaultTransitionFactory;
    let target = StateId::from(0_usize);

    let t = factory.create(ByteSet::single(0x01), true, target).unwrap();
    assert_eq!(t.bytes().len(), 255);

    assert_eq!(
        factory.create(ByteSet::all(), true, target),
        Err(Error::EmptyTransition)
    );
    assert_eq!(
        factory.create(ByteSet::empty(), false, target),
        Err(Error::EmptyTransition)
    );
}

#[test]
fn text_and_dot() {
    let (automaton, s0) = diamond_with_loops();

    assert_eq!(
        automaton.to_text(s0),
        r#"s0 -> 01:s1 03:s2
s1 -> 02:s2
s2 (final) #7 -> 04:s2 05:s1"#
    );

    assert_eq!(
        automaton.to_dot(s0),
        r##"digraph automaton {
  rankdir=LR;
  node [shape=circle];
  start [shape=point];
  start -> s0;
  s2 [shape=doublecircle, xlabel="#7"];
  s0 -> s1 [label="01"];
  s0 -> s2 [label="03"];
  s1 -> s2 [label="02"];
  s2 -> s2 [label="04"];
  s2 -> s1 [label="05"];
}"##
    );
}
