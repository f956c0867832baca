use std::path::PathBuf;

use termcolor::Buffer;
use thiserror::Error;

use crate::{
    environment::prelude::RuntimeError,
    parser::prelude::{ParseError, ParseErrorType},
    utils::prelude::SrcSpan,
};
use super::diagnostic::{Diagnostic, Label, Level, Location};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error("failed to parse source code")]
    Parse {
        path: PathBuf,
        src: String,
        errors: Vec<ParseError>
    },
    #[error("program execution failed")]
    Runtime {
        path: PathBuf,
        src: String,
        error: RuntimeError
    },
    #[error("IO operation failed")]
    StdIo {
        err: std::io::ErrorKind
    }
}

impl Error {
    pub fn pretty_string(&self) -> String {
        let mut nocolor = Buffer::no_color();
        self.pretty(&mut nocolor);
        String::from_utf8(nocolor.into_inner()).expect("Error printing produced invalid utf8")
    }

    pub fn pretty(&self, buf: &mut Buffer) {
        use std::io::Write;

        for diagnostic in self.to_diagnostics() {
            diagnostic.write(buf);
            writeln!(buf).expect("write new line diagnostic");
        }
    }

    pub fn to_diagnostics(&self) -> Vec<Diagnostic> {
        match self {
            Error::Parse { path, src, errors } => {
                errors.iter()
                    .map(|error| {
                        let (label, extra) = error.details();
                        let text = extra.join("\n");

                        // errors at the end of input point past the last
                        // token, so anchor them to the end of the source
                        let adjusted_location = if matches!(error.error, ParseErrorType::UnexpectedEof) {
                            SrcSpan {
                                start: src.len() as u32,
                                end: src.len() as u32,
                            }
                        } else {
                            clamp_span(error.span, src.len())
                        };

                        Diagnostic {
                            title: "Syntax error".into(),
                            text,
                            level: Level::Error,
                            location: Some(Location {
                                src,
                                path: path.clone(),
                                label: Label {
                                    text: Some(label.to_string()),
                                    span: adjusted_location,
                                },
                            }),
                        }
                    })
                    .collect()
            },
            Error::Runtime { path, src, error } => {
                let (label, extra) = error.details();

                vec![Diagnostic {
                    title: "Runtime error".into(),
                    text: extra.join("\n"),
                    level: Level::Error,
                    location: Some(Location {
                        src,
                        path: path.clone(),
                        label: Label {
                            text: Some(label),
                            span: clamp_span(error.span, src.len()),
                        },
                    }),
                }]
            },
            Error::StdIo { err } => {
                vec![Diagnostic {
                    title: "Standard IO error".into(),
                    text: format!("{err}"),
                    level: Level::Error,
                    location: None,
                }]
            }
        }
    }
}

// spans touching the synthetic end-of-file token can point one past the
// source, which the renderer rejects
fn clamp_span(span: SrcSpan, len: usize) -> SrcSpan {
    let end = span.end.min(len as u32);

    SrcSpan {
        start: span.start.min(end),
        end,
    }
}
