use clap::{arg, ArgMatches, Command};
use crossterm::tty::IsTty;
use std::io::stdout;

use bytepat_parser::Parser;

use crate::help;

pub fn ast() -> Command {
    super::command("ast")
        .about("Print the Abstract Syntax Tree (AST) for a pattern")
        .long_about(help::AST_LONG_HELP)
        .arg(arg!(<PATTERN>).help("Byte pattern"))
}

pub fn cst() -> Command {
    super::command("cst")
        .about("Print the Concrete Syntax Tree (CST) for a pattern")
        .arg(arg!(<PATTERN>).help("Byte pattern"))
}

fn parser() -> Parser {
    let mut parser = Parser::new();
    parser.colorize_errors(stdout().is_tty());
    parser
}

pub fn exec_ast(args: &ArgMatches) -> anyhow::Result<()> {
    let pattern = args.get_one::<String>("PATTERN").unwrap();
    let ast = parser().parse(pattern.as_str())?;

    print!("{}", ast.ascii_tree_string());
    Ok(())
}

pub fn exec_cst(args: &ArgMatches) -> anyhow::Result<()> {
    let pattern = args.get_one::<String>("PATTERN").unwrap();
    let parser = parser();
    let mut cst = parser.build_cst(pattern.as_str())?;

    print!("{}", cst.ascii_tree_string());
    Ok(())
}
