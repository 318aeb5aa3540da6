use clap::{arg, value_parser, ArgAction, ArgMatches, Command};

use bytepat::Matcher;

use crate::commands::create_compiler;
use crate::config::{Config, DumpFormat};
use crate::help;

fn dump_command(name: &'static str, about: &'static str) -> Command {
    super::command(name)
        .about(about)
        .long_about(help::DUMP_LONG_HELP)
        .arg(
            arg!(<PATTERN>)
                .help("Byte pattern")
                .num_args(1..)
                .action(ArgAction::Append),
        )
        // Keep options sorted alphabetically by their long name.
        // For instance, --bar goes before --foo.
        .arg(
            arg!(--"no-optimize")
                .help("Build the automaton for the pattern as it was written"),
        )
        .arg(
            arg!(-o --"output-format" <FORMAT>)
                .help("Output format")
                .value_parser(value_parser!(DumpFormat)),
        )
}

pub fn nfa() -> Command {
    dump_command("nfa", "Print the non-deterministic automaton for patterns")
}

pub fn dfa() -> Command {
    dump_command("dfa", "Print the deterministic automaton for patterns")
}

pub fn exec_nfa(args: &ArgMatches, config: &Config) -> anyhow::Result<()> {
    let matcher = build(args, config, false)?;
    print_automaton(args, config, &matcher);
    Ok(())
}

pub fn exec_dfa(args: &ArgMatches, config: &Config) -> anyhow::Result<()> {
    let matcher = build(args, config, true)?;
    print_automaton(args, config, &matcher);
    Ok(())
}

fn build(
    args: &ArgMatches,
    config: &Config,
    deterministic: bool,
) -> anyhow::Result<Matcher> {
    let patterns: Vec<&str> = args
        .get_many::<String>("PATTERN")
        .unwrap()
        .map(|pattern| pattern.as_str())
        .collect();

    let mut compiler = create_compiler(args, config);
    compiler.deterministic(deterministic);

    Ok(compiler.compile_many(patterns.as_slice())?)
}

fn print_automaton(args: &ArgMatches, config: &Config, matcher: &Matcher) {
    let format = args
        .get_one::<DumpFormat>("output-format")
        .copied()
        .unwrap_or(config.dump.format);

    match format {
        DumpFormat::Text => println!("{}", matcher.to_text()),
        DumpFormat::Dot => println!("{}", matcher.to_dot()),
    }
}
