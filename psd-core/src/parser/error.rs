use crate::{lexer::prelude::{LexicalError, Token}, utils::prelude::SrcSpan};

#[derive(Debug, Clone, PartialEq)]
pub enum ParseErrorType {
    ExpectedProgram,
    ExpectedKamus,
    ExpectedAlgoritma,
    ExpectedEndprogram,
    ExpectedIdent,
    ExpectedType,
    ExpectedExpression { token: Token },
    InvalidAssignmentTarget,
    InvalidIndexTarget,
    UnexpectedToken {
        token: Token,
        expected: Vec<String>,
    },
    UnexpectedEof,
    LexError { error: LexicalError },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub error: ParseErrorType,
    pub span: SrcSpan
}

impl ParseError {
    pub fn details(&self) -> (&'static str, Vec<String>) {
        match &self.error {
            ParseErrorType::ExpectedProgram => ("Expected the `program` keyword", vec![]),
            ParseErrorType::ExpectedKamus => ("Expected `kamus` after the program name", vec![]),
            ParseErrorType::ExpectedAlgoritma => ("Expected `algoritma` after the declarations", vec![]),
            ParseErrorType::ExpectedEndprogram => ("Expected `endprogram` after the statements", vec![]),
            ParseErrorType::ExpectedIdent => ("Expected identifier", vec![]),
            ParseErrorType::ExpectedType => {
                ("Expected a type", vec!["One of: integer, real, string, character, boolean".to_string()])
            },
            ParseErrorType::ExpectedExpression { token } => {
                ("Expected an expression", vec![format!("Found {}", describe_token(token))])
            },
            ParseErrorType::InvalidAssignmentTarget => {
                ("Invalid assignment target", vec!["Only a variable or an array element can be assigned to".to_string()])
            },
            ParseErrorType::InvalidIndexTarget => {
                ("Only variables can be indexed", vec![])
            },
            ParseErrorType::UnexpectedToken { token, expected } => {
                let messages = std::iter::once(format!("Found {}, expected one of: ", describe_token(token)))
                    .chain(expected.iter().map(|s| format!("- {s}")))
                    .collect();

                ("Not expected this", messages)
            },
            ParseErrorType::UnexpectedEof => ("Unexpected end of file", vec![]),
            ParseErrorType::LexError { error } => error.details()
        }
    }
}

fn describe_token(token: &Token) -> String {
    match token {
        Token::Int(_) => "an Int".to_string(),
        Token::Float(_) => "a Float".to_string(),
        Token::Str(_) => "a String".to_string(),
        Token::Char(_) => "a Character".to_string(),
        Token::Ident(_) => "an Identifier".to_string(),
        _ if token.is_reserved_word() => format!("the keyword `{}`", token.as_literal()),
        _ => format!("`{}`", token.as_literal())
    }
}
