use crate::{lexer::prelude::{LexResult, Lexer, LexicalError, Spanned, Token}, utils::prelude::SrcSpan};
use super::error::{ParseError, ParseErrorType};
use super::ast::{Expression, Program};

pub trait Parse<T: Iterator<Item = LexResult>>
    where Self: Sized,
{
    fn parse(
        parser: &mut Parser<T>,
        precedence: Option<Precedence>
    ) -> Result<Self, ParseError>;
}

pub trait InfixParse<T: Iterator<Item = LexResult>>
    where Self: Sized,
{
    fn parse(
        parser: &mut Parser<T>,
        left: Expression,
        precedence: Option<Precedence>
    ) -> Result<Self, ParseError>;
}

pub struct Parser<T: Iterator<Item = LexResult>> {
    pub current_token: Option<Spanned>,
    pub next_token: Option<Spanned>,
    pub lex_errors: Vec<LexicalError>,
    pub syntax_errors: Vec<ParseError>,

    tokens: T,
}

impl<T: Iterator<Item = LexResult>> Parser<T> {
    pub fn new(input: T) -> Self {
        let mut parser = Self {
            current_token: None,
            next_token: None,
            lex_errors: vec![],
            syntax_errors: vec![],

            tokens: input,
        };

        parser.step();
        parser.step();

        parser
    }

    pub fn step(&mut self) {
        let _ = self.next_token();
    }

    pub fn next_token(&mut self) -> Option<Spanned> {
        let t = self.current_token.take();
        let mut next = None;

        loop {
            match self.tokens.next() {
                Some(Err(error)) => {
                    // the lexer already skipped past the fault, keep pulling
                    self.lex_errors.push(error);
                },
                Some(Ok(token)) => {
                    next = Some(token);

                    break;
                },
                None => {
                    break;
                }
            }
        }

        self.current_token = self.next_token.take();
        self.next_token = next.take();

        t
    }

    pub fn check(&self, token: &Token) -> bool {
        matches!(&self.current_token, Some((_, current, _)) if current == token)
    }

    pub fn is_at_end(&self) -> bool {
        matches!(&self.current_token, Some((_, Token::Eof, _)) | None)
    }

    pub fn current_span(&self) -> SrcSpan {
        match &self.current_token {
            Some((start, _, end)) => SrcSpan::new(*start, *end),
            None => SrcSpan::new(0, 0)
        }
    }

    pub fn current_precedence(&self) -> Precedence {
        match &self.current_token {
            Some((_, token, _)) => Precedence::from(token),
            None => Precedence::Lowest
        }
    }

    pub fn parse(&mut self) -> Result<Program, Vec<ParseError>> {
        let program = Program::parse(self, None);

        let mut errors = self.lex_errors.drain(..)
            .map(|error| {
                let location = error.location;

                ParseError {
                    error: ParseErrorType::LexError { error },
                    span: location
                }
            })
            .collect::<Vec<ParseError>>();
        errors.append(&mut self.syntax_errors);

        match program {
            Ok(program) if errors.is_empty() => Ok(program),
            Ok(_) => {
                errors.sort_by_key(|error| error.span.start);
                Err(errors)
            },
            Err(error) => {
                errors.push(error);
                errors.sort_by_key(|error| error.span.start);
                Err(errors)
            }
        }
    }

    pub fn expect_one(&mut self, token: Token) -> Result<(u32, u32), ParseError> {
        match self.current_token.take() {
            Some((start, tok, end)) if tok == token => {
                self.step();
                Ok((start, end))
            },
            Some(t) => {
                let (start, tok, end) = t.clone();
                self.current_token = Some(t);

                parse_error(
                    ParseErrorType::UnexpectedToken {
                        token: tok,
                        expected: vec![format!("`{}`", token.as_literal())],
                    },
                    SrcSpan { start, end }
                )
            },
            None => {
                parse_error(
                    ParseErrorType::UnexpectedEof,
                    SrcSpan { start: 0, end: 0 }
                )
            }
        }
    }

    pub fn expect_ident(&mut self) -> Result<(u32, String, u32), ParseError> {
        match self.current_token.take() {
            Some((start, Token::Ident(value), end)) => {
                self.step();
                Ok((start, value, end))
            },
            Some(t) => {
                let (start, _, end) = t.clone();
                self.current_token = Some(t);

                parse_error(
                    ParseErrorType::ExpectedIdent,
                    SrcSpan { start, end }
                )
            },
            None => {
                parse_error(
                    ParseErrorType::UnexpectedEof,
                    SrcSpan { start: 0, end: 0 }
                )
            }
        }
    }

    /// Records the fault and discards tokens until something that can
    /// plausibly start a new statement, so several independent faults
    /// surface from a single run.
    pub fn recover(&mut self, error: ParseError) {
        self.syntax_errors.push(error);
        self.synchronize();
    }

    fn synchronize(&mut self) {
        self.step();

        loop {
            match &self.current_token {
                Some((_, token, _)) => match token {
                    Token::If
                    | Token::While
                    | Token::For
                    | Token::Repeat
                    | Token::Output
                    | Token::Outputf
                    | Token::Input
                    | Token::Inputf
                    | Token::Algoritma
                    | Token::Endprogram
                    | Token::Eof => return,
                    _ => self.step(),
                },
                None => return,
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub enum Precedence {
    Lowest,
    Assign,
    Or,
    And,
    Equals,
    LessGreater,
    Sum,
    Product,
    Prefix,
    Call
}

impl From<&Token> for Precedence {
    fn from(value: &Token) -> Self {
        match value {
            Token::Equal
            | Token::PlusEqual | Token::MinusEqual
            | Token::StarEqual | Token::SlashEqual => Self::Assign,
            Token::Or => Self::Or,
            Token::And => Self::And,
            Token::EqualEqual | Token::BangEqual => Self::Equals,
            Token::Less | Token::Greater |
            Token::LessEqual | Token::GreaterEqual => Self::LessGreater,
            Token::Plus | Token::Minus => Self::Sum,
            Token::Star | Token::Slash | Token::Div | Token::Mod => Self::Product,
            Token::LeftParen | Token::LeftBracket => Self::Call,
            _ => Self::Lowest,
        }
    }
}

pub fn parse_program(src: &str) -> Result<Program, Vec<ParseError>> {
    let lexer = Lexer::new(src.char_indices().map(|(i, c)| (i as u32, c)));
    let mut parser = Parser::new(lexer);

    parser.parse()
}

pub fn parse_error<T>(error: ParseErrorType, span: SrcSpan) -> Result<T, ParseError> {
    Err(ParseError { error, span })
}
