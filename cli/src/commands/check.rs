use anyhow::bail;
use clap::{arg, ArgAction, ArgMatches, Command};
use yansi::Color::{Green, Red};
use yansi::Paint;

use crate::commands::create_compiler;
use crate::config::Config;
use crate::help;

pub fn check() -> Command {
    super::command("check")
        .about("Check if patterns are correct")
        .long_about(help::CHECK_LONG_HELP)
        .arg(
            arg!(<PATTERN>)
                .help("Byte pattern")
                .num_args(1..)
                .action(ArgAction::Append),
        )
        .arg(
            arg!(--"no-optimize")
                .help("Check the pattern as it was written, without simplifying it"),
        )
}

pub fn exec_check(args: &ArgMatches, config: &Config) -> anyhow::Result<()> {
    let patterns = args.get_many::<String>("PATTERN").unwrap();
    let compiler = create_compiler(args, config);

    let mut errors = 0;

    for pattern in patterns {
        match compiler.compile(pattern) {
            Ok(matcher) => {
                println!(
                    "[ {} ] {} ({} states)",
                    "PASS".paint(Green).bold(),
                    pattern,
                    matcher.state_count(),
                );
            }
            Err(err) => {
                errors += 1;
                println!("[ {} ] {}\n{}", "FAIL".paint(Red).bold(), pattern, err);
            }
        }
    }

    if errors > 0 {
        bail!("{} errors found", errors);
    }

    Ok(())
}
