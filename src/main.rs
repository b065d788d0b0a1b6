use clap::{Arg, ArgAction, Command};
use std::io::IsTerminal;
use std::path::Path;
use tracing::{debug, Level};

use technique::formatting::{self, Identity, Render, Terminal};
use technique::parsing;

mod problem;

fn main() {
    const VERSION: &str = concat!("v", env!("CARGO_PKG_VERSION"));

    let matches = Command::new("technique")
        .version(VERSION)
        .propagate_version(true)
        .author("Andrew Cowie")
        .about("The Technique Procedures Language.")
        .disable_help_subcommand(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Output debugging information about what the parser is doing."),
        )
        .subcommand(
            Command::new("check")
                .about("Syntax-check the given procedure")
                .arg(
                    Arg::new("tree")
                        .long("tree")
                        .action(ArgAction::SetTrue)
                        .help("Print the parsed document tree as JSON."),
                )
                .arg(
                    Arg::new("filename")
                        .required(true)
                        .help("The file containing the code for the procedure you want to check."),
                ),
        )
        .subcommand(
            Command::new("format")
                .about("Code format the given procedure")
                .arg(
                    Arg::new("raw-control-chars")
                        .short('R')
                        .long("raw-control-chars")
                        .action(ArgAction::SetTrue)
                        .help("Emit ANSI escape codes for syntax highlighting even if output is redirected to a pipe or file."),
                )
                .arg(
                    Arg::new("filename")
                        .required(true)
                        .help("The file containing the code for the procedure you want to format."),
                ),
        )
        .get_matches();

    let level = if matches.get_flag("verbose") {
        Level::DEBUG
    } else {
        Level::WARN
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let code = match matches.subcommand() {
        Some(("check", submatches)) => match submatches.get_one::<String>("filename") {
            Some(filename) => check(Path::new(filename), submatches.get_flag("tree")),
            None => 2,
        },
        Some(("format", submatches)) => match submatches.get_one::<String>("filename") {
            Some(filename) => format(
                Path::new(filename),
                submatches.get_flag("raw-control-chars"),
            ),
            None => 2,
        },
        Some(_) => {
            println!("No valid subcommand was used");
            2
        }
        None => {
            println!("usage: technique [COMMAND] ...");
            println!("Try '--help' for more information.");
            2
        }
    };

    std::process::exit(code);
}

fn check(filename: &Path, tree: bool) -> i32 {
    let content = match parsing::load(filename) {
        Ok(content) => content,
        Err(error) => {
            eprintln!("{}", problem::concise_loading_error(&error));
            return 1;
        }
    };

    let renderer = choose_renderer(std::io::stderr().is_terminal());

    match parsing::parse(filename, &content) {
        Ok(document) => {
            debug!("check ok");
            if tree {
                match serde_json::to_string_pretty(&document) {
                    Ok(json) => println!("{}", json),
                    Err(error) => {
                        eprintln!("{}", error);
                        return 1;
                    }
                }
            }
            0
        }
        Err(errors) => {
            for (i, error) in errors
                .iter()
                .enumerate()
            {
                if i > 0 {
                    eprintln!();
                }
                eprintln!(
                    "{}",
                    problem::full_parsing_error(error, filename, &content, renderer.as_ref())
                );
            }
            1
        }
    }
}

fn format(filename: &Path, raw: bool) -> i32 {
    let content = match parsing::load(filename) {
        Ok(content) => content,
        Err(error) => {
            eprintln!("{}", problem::concise_loading_error(&error));
            return 1;
        }
    };

    match parsing::parse(filename, &content) {
        Ok(document) => {
            let result = if raw || std::io::stdout().is_terminal() {
                formatting::format_with_renderer(&document, &Terminal)
            } else {
                formatting::format_with_renderer(&document, &Identity)
            };
            print!("{}", result);
            0
        }
        Err(errors) => {
            let renderer = choose_renderer(std::io::stderr().is_terminal());
            for error in &errors {
                eprintln!(
                    "{}",
                    problem::concise_parsing_error(error, filename, &content, renderer.as_ref())
                );
            }
            1
        }
    }
}

fn choose_renderer(colour: bool) -> Box<dyn Render> {
    if colour {
        Box::new(Terminal)
    } else {
        Box::new(Identity)
    }
}
