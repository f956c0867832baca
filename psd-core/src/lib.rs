pub mod environment;
pub mod eval;
pub mod lexer;
pub mod parser;
pub mod utils;

use std::path::PathBuf;

use eval::{io::{InputSource, OutputSink}, Interpreter};
use utils::prelude::Error;

/// Runs a source string through the whole pipeline: lex, parse, evaluate.
///
/// Any lexical or syntax fault prevents execution entirely; the first
/// runtime fault aborts the program. Every run gets a fresh interpreter
/// session, nothing survives between runs.
pub fn run_source(
    path: PathBuf,
    src: &str,
    output: Box<dyn OutputSink>,
    input: Box<dyn InputSource>,
) -> Result<(), Error> {
    let program = parser::prelude::parse_program(src)
        .map_err(|errors| Error::Parse {
            path: path.clone(),
            src: src.to_string(),
            errors
        })?;

    let mut interpreter = Interpreter::new(output, input);

    interpreter.interpret(&program)
        .map_err(|error| Error::Runtime {
            path,
            src: src.to_string(),
            error
        })
}

pub fn run_file(
    path: PathBuf,
    output: Box<dyn OutputSink>,
    input: Box<dyn InputSource>,
) -> Result<(), Error> {
    let src = match std::fs::read_to_string(&path) {
        Ok(src) => src,
        Err(err) => return Err(Error::StdIo { err: err.kind() })
    };

    run_source(path, &src, output, input)
}
