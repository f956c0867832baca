use crate::utils::prelude::SrcSpan;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexicalErrorType {
    UnrecognizedCharacter { ch: char },
    UnterminatedString,
    NewlineInString,
    EmptyCharLiteral,
    OverlongCharLiteral,
    UnterminatedCharLiteral,
    UnknownEscape { ch: char },
    UnterminatedComment,
    IntegerOutOfRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexicalError {
    pub error: LexicalErrorType,
    pub location: SrcSpan
}

impl LexicalError {
    pub fn details(&self) -> (&'static str, Vec<String>) {
        match self.error {
            LexicalErrorType::UnrecognizedCharacter { ch } => {
                ("Unrecognized character", vec![format!("`{ch}` is not part of the language")])
            },
            LexicalErrorType::UnterminatedString => {
                ("Missing closing `\"`", vec![])
            },
            LexicalErrorType::NewlineInString => {
                ("String literals cannot span multiple lines", vec![])
            },
            LexicalErrorType::EmptyCharLiteral => {
                ("Character literal is empty", vec![])
            },
            LexicalErrorType::OverlongCharLiteral => {
                ("Character literal holds more than one character", vec![])
            },
            LexicalErrorType::UnterminatedCharLiteral => {
                ("Missing closing `'`", vec![])
            },
            LexicalErrorType::UnknownEscape { ch } => {
                ("Unknown escape sequence", vec![format!("`\\{ch}` is not a supported escape")])
            },
            LexicalErrorType::UnterminatedComment => {
                ("Missing closing `*/`", vec![])
            },
            LexicalErrorType::IntegerOutOfRange => {
                ("Integer literal is too large", vec![])
            }
        }
    }
}
