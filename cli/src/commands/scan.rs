use std::cmp::min;
use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::{arg, value_parser, ArgAction, ArgMatches, Command};
use yansi::Color::Cyan;
use yansi::Paint;

use bytepat::Match;

use crate::commands::create_compiler;
use crate::config::Config;
use crate::help;

const DATA_LIMIT: usize = 120;

#[rustfmt::skip]
pub fn scan() -> Command {
    super::command("scan")
        .about("Search for a pattern in a file")
        .long_about(help::SCAN_LONG_HELP)
        .arg(
            arg!(<PATTERN>)
                .help("Byte pattern")
        )
        .arg(
            arg!(<TARGET_PATH>)
                .help("Path to the file that will be scanned")
                .value_parser(value_parser!(PathBuf))
        )
        // Keep options sorted alphabetically by their long name.
        // For instance, --bar goes before --foo.
        .arg(
            arg!(-c --"count")
                .help("Print only the number of matches")
        )
        .arg(
            arg!(-n --"max-matches" <NUM_MATCHES>)
                .help("Print at most the given number of matches")
                .value_parser(value_parser!(usize))
        )
        .arg(
            arg!(--"no-optimize")
                .help("Build the automaton for the pattern as it was written")
        )
        .arg(
            arg!(-e --"pattern" <PATTERN>)
                .help("Additional pattern to search for")
                .action(ArgAction::Append)
        )
}

pub fn exec_scan(args: &ArgMatches, config: &Config) -> anyhow::Result<()> {
    let target_path = args.get_one::<PathBuf>("TARGET_PATH").unwrap();
    let max_matches = args
        .get_one::<usize>("max-matches")
        .copied()
        .or(config.scan.max_matches);

    let mut patterns = vec![args.get_one::<String>("PATTERN").unwrap().as_str()];

    if let Some(extra) = args.get_many::<String>("pattern") {
        patterns.extend(extra.map(|pattern| pattern.as_str()));
    }

    let matcher = create_compiler(args, config).compile_many(&patterns)?;

    let data = fs::read(target_path).with_context(|| {
        format!("can not read `{}`", target_path.display())
    })?;

    let matches = matcher
        .find_iter(data.as_slice())
        .take(max_matches.unwrap_or(usize::MAX));

    if args.get_flag("count") {
        println!("{}: {}", target_path.display(), matches.count());
        return Ok(());
    }

    for m in matches {
        println!("{}", format_match(&m, data.as_slice()));
    }

    Ok(())
}

/// Formats a match as `OFFSET:LENGTH:PATTERNS: DATA`.
fn format_match(m: &Match, data: &[u8]) -> String {
    let match_data = &data[m.range.clone()];
    let patterns: Vec<String> =
        m.patterns.iter().map(|pattern| pattern.to_string()).collect();

    let mut match_str = format!(
        "{:#x}:{}:{}: ",
        m.range.start,
        m.range.len(),
        patterns.join(",").paint(Cyan),
    );

    for b in &match_data[..min(match_data.len(), DATA_LIMIT)] {
        for c in b.escape_ascii() {
            match_str.push(c as char);
        }
    }

    if match_data.len() > DATA_LIMIT {
        match_str.push_str(
            format!(
                " ... {} more bytes",
                match_data.len().saturating_sub(DATA_LIMIT)
            )
            .as_str(),
        );
    }

    match_str
}
