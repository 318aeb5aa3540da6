mod check;
mod debug;
mod dump;
mod scan;

pub use check::*;
pub use debug::*;
pub use dump::*;
pub use scan::*;

use std::io::stdout;
use std::path::PathBuf;

use anyhow::anyhow;
use clap::{arg, command, crate_authors, ArgMatches, Command};
use crossterm::tty::IsTty;

use bytepat::Compiler;

use crate::config::Config;
use crate::{commands, help, APP_HELP_TEMPLATE};

pub fn command(name: &'static str) -> Command {
    Command::new(name).help_template(
        r#"{about-with-newline}
{usage-heading}
  {usage}

{all-args}
"#,
    )
}

pub fn cli() -> Command {
    command!()
        .author(crate_authors!("\n")) // requires `cargo` feature
        .arg_required_else_help(true)
        .arg(
            arg!(-C --config <CONFIG_FILE> "Config file")
                .value_parser(existing_path_parser)
                .long_help(help::CONFIG_FILE),
        )
        .help_template(APP_HELP_TEMPLATE)
        .subcommand_required(true)
        .subcommands(vec![
            commands::scan(),
            commands::check(),
            commands::ast(),
            commands::cst(),
            commands::nfa(),
            commands::dfa(),
        ])
}

/// Parses a path and makes sure that it exists.
fn existing_path_parser(input: &str) -> Result<PathBuf, anyhow::Error> {
    let path = PathBuf::from(input);
    if path.try_exists()? {
        Ok(path)
    } else {
        Err(anyhow!("file not found"))
    }
}

/// Creates a compiler configured according to the config file and the
/// command-line arguments, which take precedence over the config file.
pub fn create_compiler(args: &ArgMatches, config: &Config) -> Compiler {
    let mut compiler = Compiler::new();

    let no_optimize = args
        .try_get_one::<bool>("no-optimize")
        .unwrap_or_default()
        .cloned()
        .unwrap_or_default();

    compiler
        .optimize(config.compile.optimize && !no_optimize)
        .deterministic(config.compile.deterministic)
        .colorize_errors(stdout().is_tty());

    compiler
}
