pub const AST_LONG_HELP: &str = r#"Print the Abstract Syntax Tree (AST) for a pattern

The AST is printed exactly as the parser produces it, before any
optimization is applied.

Example:

bp ast '4d 5a (90|cc)'"#;

pub const CHECK_LONG_HELP: &str = r#"Check if patterns are correct

Each pattern is compiled into a deterministic automaton, and the result is
reported as PASS or FAIL. Errors are printed together with the pattern
that produced them."#;

pub const CONFIG_FILE: &str = r#"Config file for bytepat

Specifies a config file which controls the behavior of bytepat. If config
file is not specified, ${HOME}/.bytepat.toml is used. If it does not exist
the default options are applied.

Supported options:

[compile]
optimize = true
deterministic = true

[scan]
max_matches = 100

[dump]
format = "text"   # or "dot""#;

pub const DUMP_LONG_HELP: &str = r#"Print the automaton produced for one or more patterns

In the `text` format each line describes a state: its identifier, whether
it is final, the patterns associated to it, and its transitions as pairs
of bytes and target state. The `dot` format can be rendered with Graphviz:

bp dfa --output-format=dot '4d 5a (90|cc)' | dot -Tsvg > mz.svg"#;

pub const SCAN_LONG_HELP: &str = r#"Search for a pattern in a file

Every non-overlapping match is printed in a line with the format
OFFSET:LENGTH:PATTERNS: DATA, where PATTERNS are the identifiers of the
patterns that matched. The first pattern is #0, additional patterns
given with --pattern are #1, #2, and so on."#;
