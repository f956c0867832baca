mod cli;

use std::{path::PathBuf, process::ExitCode};

use clap::Parser;
use psd_core::{
    eval::io::{ConsoleInput, ConsoleOutput},
    lexer::prelude::{Lexer, Token},
    parser::prelude::{parse_program, ParseError, ParseErrorType},
    utils::prelude::Error,
};

#[derive(Parser)]
enum Command {
    /// Parses and executes a source file
    Run {
        /// Path of source file
        path: PathBuf,
    },
    /// Parses a source file and reports syntax faults without executing
    Check {
        /// Path of source file
        path: PathBuf,
        /// Print the parsed tree instead of the formatted source
        #[arg(long, default_value_t = false)]
        print_ast: bool,
    },
    /// Prints the token stream of a source file
    Lex {
        /// Path of source file
        path: PathBuf,
    },
}

fn main() -> ExitCode {
    match Command::parse() {
        Command::Run { path } => run(path),
        Command::Check { path, print_ast } => check(path, print_ast),
        Command::Lex { path } => lex(path),
    }
}

fn run(path: PathBuf) -> ExitCode {
    match psd_core::run_file(path, Box::new(ConsoleOutput), Box::new(ConsoleInput)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => report(error),
    }
}

fn check(path: PathBuf, print_ast: bool) -> ExitCode {
    let src = match std::fs::read_to_string(&path) {
        Ok(src) => src,
        Err(err) => return report(Error::StdIo { err: err.kind() }),
    };

    cli::print_checking(&path.to_string_lossy());
    let start = std::time::Instant::now();

    let result = match parse_program(&src) {
        Ok(program) => {
            if print_ast {
                println!("{program:#?}");
            } else {
                println!("{program}");
            }

            ExitCode::SUCCESS
        },
        Err(errors) => report(Error::Parse { path, src, errors }),
    };

    cli::print_checked(std::time::Instant::now() - start);

    result
}

fn lex(path: PathBuf) -> ExitCode {
    let src = match std::fs::read_to_string(&path) {
        Ok(src) => src,
        Err(err) => return report(Error::StdIo { err: err.kind() }),
    };

    let lexer = Lexer::new(src.char_indices().map(|(i, c)| (i as u32, c)));
    let mut errors = vec![];

    for result in lexer {
        match result {
            Ok((start, token, end)) => {
                println!("{start:>4}..{end:<4} {token:?}");

                if token == Token::Eof {
                    break;
                }
            },
            Err(error) => {
                let location = error.location;

                errors.push(ParseError {
                    error: ParseErrorType::LexError { error },
                    span: location,
                });
            }
        }
    }

    if errors.is_empty() {
        ExitCode::SUCCESS
    } else {
        report(Error::Parse { path, src, errors })
    }
}

// exit codes in the sysexits tradition: the driver distinguishes a program
// that never ran from one that ran and failed
fn report(error: Error) -> ExitCode {
    let buf_writer = cli::stderr_buffer_writer();
    let mut buf = buf_writer.buffer();
    error.pretty(&mut buf);
    buf_writer
        .print(&buf)
        .expect("Writing error to stderr");

    match error {
        Error::Parse { .. } => ExitCode::from(65),
        Error::Runtime { .. } => ExitCode::from(70),
        Error::StdIo { .. } => ExitCode::from(66),
    }
}
