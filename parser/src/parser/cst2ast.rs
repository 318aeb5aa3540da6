/*! Functions for converting a CST into an AST. */

use crate::ast::Node;
use crate::cst::CSTNode;
use crate::parser::{Context, Error, ErrorInfo, GrammarRule};
use crate::Span;

macro_rules! expect {
    ($next:expr, $parser_rule:expr) => {{
        assert_eq!(
            $parser_rule,
            $next.as_rule(),
            "expecting {:?} but found {:?}",
            $parser_rule,
            $next.as_rule()
        );
    }};
}

/// From a CST node corresponding to the grammar rule `pattern`, returns the
/// root of the AST. `len` is the length of the whole pattern, used for
/// reporting empty patterns.
pub(crate) fn pattern_from_cst(
    ctx: &mut Context,
    pattern: CSTNode,
    len: usize,
) -> Result<Node, Error> {
    expect!(pattern, GrammarRule::pattern);

    for node in pattern.into_inner() {
        match node.as_rule() {
            GrammarRule::alternatives => {
                return alternatives_from_cst(ctx, node);
            }
            GrammarRule::EOI => break,
            rule => unreachable!("{:?}", rule),
        }
    }

    // Only whitespaces and comments, if anything.
    Err(Error::from(ErrorInfo::empty_pattern(
        ctx.report_builder,
        Span::new(0, len),
    )))
}

/// From a CST node corresponding to the grammar rule `alternatives`, returns
/// a [`Node::Alternatives`], or the only alternative if there is just one.
fn alternatives_from_cst(
    ctx: &mut Context,
    alternatives: CSTNode,
) -> Result<Node, Error> {
    expect!(alternatives, GrammarRule::alternatives);

    let mut nodes = Vec::new();

    for node in alternatives.into_inner() {
        match node.as_rule() {
            GrammarRule::sequence => nodes.push(sequence_from_cst(ctx, node)?),
            GrammarRule::PIPE => {}
            rule => unreachable!("{:?}", rule),
        }
    }

    Ok(collapse(nodes, Node::Alternatives))
}

/// From a CST node corresponding to the grammar rule `sequence`, returns
/// a [`Node::Sequence`], or the only item if there is just one.
fn sequence_from_cst(
    ctx: &mut Context,
    sequence: CSTNode,
) -> Result<Node, Error> {
    expect!(sequence, GrammarRule::sequence);

    let nodes = sequence
        .into_inner()
        .map(|node| quantified_from_cst(ctx, node))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(collapse(nodes, Node::Sequence))
}

fn collapse(mut nodes: Vec<Node>, f: fn(Vec<Node>) -> Node) -> Node {
    if nodes.len() == 1 {
        nodes.remove(0)
    } else {
        f(nodes)
    }
}

/// From a CST node corresponding to the grammar rule `quantified`, returns
/// the atom wrapped in the node for its quantifier, if any.
fn quantified_from_cst(
    ctx: &mut Context,
    quantified: CSTNode,
) -> Result<Node, Error> {
    expect!(quantified, GrammarRule::quantified);

    let mut children = quantified.into_inner();
    let node = atom_from_cst(ctx, children.next().unwrap())?;

    match children.next() {
        Some(quantifier) => quantifier_from_cst(ctx, quantifier, node),
        None => Ok(node),
    }
}

fn quantifier_from_cst(
    ctx: &mut Context,
    quantifier: CSTNode,
    node: Node,
) -> Result<Node, Error> {
    expect!(quantifier, GrammarRule::quantifier);

    let quantifier = quantifier.into_inner().next().unwrap();
    let node = Box::new(node);

    Ok(match quantifier.as_rule() {
        GrammarRule::STAR => Node::ZeroToMany(node),
        GrammarRule::PLUS => Node::OneToMany(node),
        GrammarRule::QUESTION => Node::Optional(node),
        GrammarRule::repeat => repeat_from_cst(ctx, quantifier, node)?,
        rule => unreachable!("{:?}", rule),
    })
}

/// From a CST node corresponding to the grammar rule `repeat`, returns
/// the [`Node::Repeat`], [`Node::RepeatMinToMany`] or
/// [`Node::RepeatMinToMax`] applied to `node`.
fn repeat_from_cst(
    ctx: &mut Context,
    repeat: CSTNode,
    node: Box<Node>,
) -> Result<Node, Error> {
    expect!(repeat, GrammarRule::repeat);

    let repeat_span = ctx.span(&repeat);
    let mut children = repeat.into_inner();

    expect!(children.next().unwrap(), GrammarRule::LBRACE);

    let min = count_from_cst(ctx, children.next().unwrap())?;
    let next = children.next().unwrap();

    // `{n}`
    if next.as_rule() == GrammarRule::RBRACE {
        if min == 0 {
            return Err(Error::from(ErrorInfo::invalid_quantifier(
                ctx.report_builder,
                "the number of repetitions must be at least 1".to_owned(),
                repeat_span,
            )));
        }
        return Ok(Node::Repeat { count: min, node });
    }

    expect!(next, GrammarRule::COMMA);

    let next = children.next().unwrap();

    match next.as_rule() {
        // `{n,}` and `{n,*}`
        GrammarRule::RBRACE | GrammarRule::STAR => {
            Ok(Node::RepeatMinToMany { min, node })
        }
        // `{n,m}`
        GrammarRule::count => {
            let max = count_from_cst(ctx, next)?;
            if max == 0 {
                return Err(Error::from(ErrorInfo::invalid_quantifier(
                    ctx.report_builder,
                    "the upper bound must be at least 1".to_owned(),
                    repeat_span,
                )));
            }
            if min > max {
                return Err(Error::from(ErrorInfo::invalid_quantifier(
                    ctx.report_builder,
                    format!(
                        "lower bound ({}) is greater than upper bound ({})",
                        min, max
                    ),
                    repeat_span,
                )));
            }
            Ok(Node::RepeatMinToMax { min, max, node })
        }
        rule => unreachable!("{:?}", rule),
    }
}

fn count_from_cst(ctx: &mut Context, count: CSTNode) -> Result<u32, Error> {
    expect!(count, GrammarRule::count);

    count.as_str().parse::<u32>().map_err(|_| {
        Error::from(ErrorInfo::invalid_quantifier(
            ctx.report_builder,
            format!("this number is out of the valid range: [0, {}]", u32::MAX),
            ctx.span(&count),
        ))
    })
}

/// From a CST node corresponding to the grammar rule `atom`, returns the
/// node for the value or group, inverted if it is prefixed with `^`.
fn atom_from_cst(ctx: &mut Context, atom: CSTNode) -> Result<Node, Error> {
    expect!(atom, GrammarRule::atom);

    let mut children = atom.into_inner();
    let mut node = children.next().unwrap();

    let caret_span = if node.as_rule() == GrammarRule::CARET {
        let span = ctx.span(&node);
        node = children.next().unwrap();
        Some(span)
    } else {
        None
    };

    let node_span = ctx.span(&node);

    let value = match node.as_rule() {
        GrammarRule::group => {
            if let Some(caret_span) = caret_span {
                return Err(Error::from(ErrorInfo::invalid_inversion(
                    ctx.report_builder,
                    "groups can't be inverted".to_owned(),
                    caret_span.combine(&node_span),
                )));
            }
            let mut children = node.into_inner();
            expect!(children.next().unwrap(), GrammarRule::LPAREN);
            let value = alternatives_from_cst(ctx, children.next().unwrap())?;
            expect!(children.next().unwrap(), GrammarRule::RPAREN);
            value
        }
        GrammarRule::range => range_from_cst(ctx, node)?,
        GrammarRule::set => set_from_cst(ctx, node)?,
        GrammarRule::leaf => leaf_from_cst(ctx, node)?,
        rule => unreachable!("{:?}", rule),
    };

    match caret_span {
        Some(caret_span) => {
            invert(ctx, value, caret_span.combine(&node_span))
        }
        None => Ok(value),
    }
}

fn invert(ctx: &Context, node: Node, span: Span) -> Result<Node, Error> {
    node.invert().map_err(|err| {
        Error::from(ErrorInfo::invalid_inversion(
            ctx.report_builder,
            format!("{} values can't be inverted", err.kind),
            span,
        ))
    })
}

/// From a CST node corresponding to the grammar rule `set`, returns a
/// [`Node::Set`].
fn set_from_cst(ctx: &mut Context, set: CSTNode) -> Result<Node, Error> {
    expect!(set, GrammarRule::set);

    let mut members = Vec::new();

    for node in set.into_inner() {
        match node.as_rule() {
            GrammarRule::set_member => {
                members.push(set_member_from_cst(ctx, node)?)
            }
            GrammarRule::LBRACKET | GrammarRule::RBRACKET => {}
            rule => unreachable!("{:?}", rule),
        }
    }

    Ok(Node::Set { members, inverted: false })
}

fn set_member_from_cst(
    ctx: &mut Context,
    set_member: CSTNode,
) -> Result<Node, Error> {
    expect!(set_member, GrammarRule::set_member);

    let mut children = set_member.into_inner();
    let mut node = children.next().unwrap();

    let caret_span = if node.as_rule() == GrammarRule::CARET {
        let span = ctx.span(&node);
        node = children.next().unwrap();
        Some(span)
    } else {
        None
    };

    let node_span = ctx.span(&node);

    let member = match node.as_rule() {
        GrammarRule::range => range_from_cst(ctx, node)?,
        GrammarRule::set => set_from_cst(ctx, node)?,
        GrammarRule::leaf => leaf_from_cst(ctx, node)?,
        rule => unreachable!("{:?}", rule),
    };

    match caret_span {
        Some(caret_span) => {
            invert(ctx, member, caret_span.combine(&node_span))
        }
        None => Ok(member),
    }
}

/// From a CST node corresponding to the grammar rule `range`, returns a
/// [`Node::Range`].
fn range_from_cst(ctx: &mut Context, range: CSTNode) -> Result<Node, Error> {
    expect!(range, GrammarRule::range);

    let mut children = range.into_inner();

    let start = range_operand_from_cst(ctx, children.next().unwrap())?;
    expect!(children.next().unwrap(), GrammarRule::HYPHEN);
    let end = range_operand_from_cst(ctx, children.next().unwrap())?;

    Ok(Node::Range {
        start: Box::new(start),
        end: Box::new(end),
        inverted: false,
    })
}

fn range_operand_from_cst(
    ctx: &mut Context,
    operand: CSTNode,
) -> Result<Node, Error> {
    expect!(operand, GrammarRule::range_operand);

    let mut children = operand.into_inner();
    let node = children.next().unwrap();

    if node.as_rule() == GrammarRule::CARET {
        return Err(Error::from(ErrorInfo::invalid_inversion(
            ctx.report_builder,
            "range bounds can't be inverted".to_owned(),
            ctx.span(&node),
        )));
    }

    match node.as_rule() {
        GrammarRule::byte => {
            Ok(Node::Byte { value: byte_from_cst(node), inverted: false })
        }
        GrammarRule::string => {
            let span = ctx.span(&node);
            let s = string_from_cst(ctx, node)?;
            if s.chars().count() != 1 {
                return Err(Error::from(ErrorInfo::invalid_range(
                    ctx.report_builder,
                    "range bounds must be a byte or a single character"
                        .to_owned(),
                    span,
                )));
            }
            Ok(Node::String(s))
        }
        rule => unreachable!("{:?}", rule),
    }
}

/// From a CST node corresponding to the grammar rule `leaf`, returns the
/// corresponding value node.
fn leaf_from_cst(ctx: &mut Context, leaf: CSTNode) -> Result<Node, Error> {
    expect!(leaf, GrammarRule::leaf);

    let node = leaf.into_inner().next().unwrap();

    Ok(match node.as_rule() {
        GrammarRule::byte => {
            Node::Byte { value: byte_from_cst(node), inverted: false }
        }
        GrammarRule::all_bitmask => Node::AllBitmask {
            mask: byte_from_cst(node.into_inner().next().unwrap()),
            inverted: false,
        },
        GrammarRule::any_bitmask => Node::AnyBitmask {
            mask: byte_from_cst(node.into_inner().next().unwrap()),
            inverted: false,
        },
        GrammarRule::dot => Node::Any,
        GrammarRule::string => Node::String(string_from_cst(ctx, node)?),
        GrammarRule::ci_string => {
            Node::CaseInsensitiveString(string_from_cst(ctx, node)?)
        }
        GrammarRule::shorthand => shorthand_from_cst(ctx, node)?,
        rule => unreachable!("{:?}", rule),
    })
}

/// From a CST node corresponding to the grammar rule `byte`, returns its
/// value. The grammar guarantees exactly two hex digits.
fn byte_from_cst(byte: CSTNode) -> u8 {
    expect!(byte, GrammarRule::byte);
    u8::from_str_radix(byte.as_str(), 16).unwrap()
}

/// From a CST node corresponding to the grammar rules `string` or
/// `ci_string`, returns the text between the quotes.
///
/// Each character is a byte, so only characters in the range U+0000-U+00FF
/// are accepted.
fn string_from_cst(ctx: &mut Context, string: CSTNode) -> Result<String, Error> {
    let string_span = ctx.span(&string);
    let text = string.into_inner().next().unwrap();
    let text_span = ctx.span(&text);
    let s = text.as_str();

    if s.is_empty() {
        return Err(Error::from(ErrorInfo::invalid_string(
            ctx.report_builder,
            "empty strings are not allowed".to_owned(),
            string_span,
        )));
    }

    if let Some((offset, c)) =
        s.char_indices().find(|(_, c)| u32::from(*c) > 0xff)
    {
        let start = text_span.start() + offset;
        return Err(Error::from(ErrorInfo::invalid_string(
            ctx.report_builder,
            format!("character `{}` doesn't fit in a single byte", c),
            Span::new(start, start + c.len_utf8()),
        )));
    }

    Ok(s.to_owned())
}

/// From a CST node corresponding to the grammar rule `shorthand`, returns
/// the node the shorthand class stands for.
fn shorthand_from_cst(
    ctx: &mut Context,
    shorthand: CSTNode,
) -> Result<Node, Error> {
    expect!(shorthand, GrammarRule::shorthand);

    let class = shorthand.as_str().chars().nth(1).unwrap();
    let inverted = class.is_ascii_uppercase();

    let byte = |value| Node::Byte { value, inverted: false };

    let char_range = |start: char, end: char| Node::Range {
        start: Box::new(Node::String(start.to_string())),
        end: Box::new(Node::String(end.to_string())),
        inverted: false,
    };

    let node = match class {
        't' => byte(0x09),
        'n' => byte(0x0a),
        'v' => byte(0x0b),
        'f' => byte(0x0c),
        'r' => byte(0x0d),
        'e' => byte(0x1b),
        'd' | 'D' => char_range('0', '9'),
        'l' | 'L' => char_range('a', 'z'),
        'u' | 'U' => char_range('A', 'Z'),
        'i' | 'I' => Node::Range {
            start: Box::new(byte(0x00)),
            end: Box::new(byte(0x7f)),
            inverted: false,
        },
        'w' | 'W' => Node::Set {
            members: vec![
                char_range('0', '9'),
                char_range('a', 'z'),
                char_range('A', 'Z'),
                Node::String("_".to_owned()),
            ],
            inverted: false,
        },
        's' | 'S' => Node::Set {
            members: [0x09, 0x0a, 0x0b, 0x0c, 0x0d, 0x20]
                .into_iter()
                .map(byte)
                .collect(),
            inverted: false,
        },
        _ => {
            return Err(Error::from(ErrorInfo::unknown_shorthand(
                ctx.report_builder,
                shorthand.as_str().to_owned(),
                ctx.span(&shorthand),
            )))
        }
    };

    if inverted {
        // Range and set nodes can always be inverted.
        invert(ctx, node, ctx.span(&shorthand))
    } else {
        Ok(node)
    }
}
