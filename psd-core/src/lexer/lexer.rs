use super::error::{LexicalError, LexicalErrorType};
use super::token::Token;
use crate::utils::prelude::SrcSpan;

pub type Spanned = (u32, Token, u32);
pub type LexResult = std::result::Result<Spanned, LexicalError>;

// keywords are matched case-insensitively; `word` arrives lowercased
pub fn str_to_keyword(word: &str) -> Option<Token> {
    Some(match word {
        "program" => Token::Program,
        "kamus" => Token::Kamus,
        "algoritma" => Token::Algoritma,
        "endprogram" => Token::Endprogram,

        "const" => Token::Const,
        "integer" => Token::Integer,
        "real" => Token::Real,
        "string" => Token::String,
        "character" => Token::Character,
        "boolean" => Token::Boolean,

        "if" => Token::If,
        "then" => Token::Then,
        "else" => Token::Else,
        "endif" => Token::Endif,
        "for" => Token::For,
        "to" => Token::To,
        "endfor" => Token::Endfor,
        "while" => Token::While,
        "endwhile" => Token::Endwhile,
        "repeat" => Token::Repeat,
        "untuk" => Token::Untuk,

        "and" => Token::And,
        "or" => Token::Or,
        "div" => Token::Div,
        "mod" => Token::Mod,

        "output" => Token::Output,
        "outputf" => Token::Outputf,
        "input" => Token::Input,
        "inputf" => Token::Inputf,

        "benar" | "true" => Token::True,
        "salah" | "false" => Token::False,

        _ => return None
    })
}

#[derive(Debug)]
pub struct Lexer<T: Iterator<Item = (u32, char)>> {
    position: u32,
    next_position: u32,
    ch: Option<char>,
    next_ch: Option<char>,
    input: T,
}

impl<T: Iterator<Item = (u32, char)>> Lexer<T> {
    pub fn new(input: T) -> Self {
        let mut lexer = Self {
            position: 0,
            next_position: 0,
            ch: None,
            next_ch: None,
            input,
        };

        lexer.next_char();
        lexer.next_char();

        lexer
    }

    pub fn next_token(&mut self) -> LexResult {
        let span = match self.ch {
            Some(ch) => match ch {
                '(' => self.eat_one_char(Token::LeftParen),
                ')' => self.eat_one_char(Token::RightParen),
                '[' => self.eat_one_char(Token::LeftBracket),
                ']' => self.eat_one_char(Token::RightBracket),
                ':' => self.eat_one_char(Token::Colon),
                ',' => self.eat_one_char(Token::Comma),
                '+' => self.eat_pair_or('=', Token::PlusEqual, Token::Plus),
                '-' => self.eat_pair_or('=', Token::MinusEqual, Token::Minus),
                '*' => self.eat_pair_or('=', Token::StarEqual, Token::Star),
                '!' => self.eat_pair_or('=', Token::BangEqual, Token::Bang),
                '=' => self.eat_pair_or('=', Token::EqualEqual, Token::Equal),
                '<' => self.eat_pair_or('=', Token::LessEqual, Token::Less),
                '>' => self.eat_pair_or('=', Token::GreaterEqual, Token::Greater),
                '/' => return self.lex_slash(),
                '"' => return self.lex_string(),
                '\'' => return self.lex_char(),
                'a'..='z' | 'A'..='Z' | '_' => {
                    return Ok(self.lex_ident());
                },
                '0'..='9' => {
                    return self.lex_number();
                },
                ' ' | '\t' | '\x0C' | '\r' | '\n' => {
                    while matches!(self.ch, Some(' ' | '\t' | '\x0C' | '\r' | '\n')) {
                        self.next_char();
                    }

                    return self.next_token();
                },
                c => {
                    let start = self.position;
                    // skip the offending character so scanning can go on
                    let _ = self.next_char();

                    return Err(LexicalError {
                        error: LexicalErrorType::UnrecognizedCharacter { ch: c },
                        location: SrcSpan::new(start, self.position),
                    });
                }
            },
            None => {
                self.eat_one_char(Token::Eof)
            }
        };

        Ok(span)
    }

    fn next_char(&mut self) -> Option<char> {
        let ch = self.ch;

        let next = match self.input.next() {
            Some((pos, ch)) => {
                self.position = self.next_position;
                self.next_position = pos;

                Some(ch)
            },
            None => {
                self.position = self.next_position;
                self.next_position += 1;

                None
            }
        };

        self.ch = self.next_ch;
        self.next_ch = next;

        ch
    }

    fn eat_one_char(&mut self, token: Token) -> Spanned {
        let start = self.position;
        self.next_char();

        (start, token, self.position)
    }

    fn eat_pair_or(&mut self, expected: char, pair: Token, single: Token) -> Spanned {
        let start = self.position;
        self.next_char();

        if self.ch == Some(expected) {
            self.next_char();
            (start, pair, self.position)
        } else {
            (start, single, self.position)
        }
    }

    fn lex_ident(&mut self) -> Spanned {
        let start = self.position;
        let mut ident = String::new();

        loop {
            match self.ch {
                Some(ch) if ch.is_ascii_alphanumeric() || ch == '_' => {
                    ident.push(self.next_char().unwrap())
                },
                _ => break
            }
        }

        let end = self.position;

        match str_to_keyword(&ident.to_lowercase()) {
            Some(token) => (start, token, end),
            None => (start, Token::Ident(ident), end),
        }
    }

    fn lex_number(&mut self) -> LexResult {
        let start = self.position;
        let mut value = String::new();

        while matches!(self.ch, Some(ch) if ch.is_ascii_digit()) {
            value.push(self.next_char().unwrap());
        }

        let is_real = self.ch == Some('.')
            && matches!(self.next_ch, Some(ch) if ch.is_ascii_digit());

        if is_real {
            value.push(self.next_char().unwrap());

            while matches!(self.ch, Some(ch) if ch.is_ascii_digit()) {
                value.push(self.next_char().unwrap());
            }
        }

        let end = self.position;

        if is_real {
            match value.parse::<f64>() {
                Ok(value) => Ok((start, Token::Float(value), end)),
                Err(_) => Err(LexicalError {
                    error: LexicalErrorType::IntegerOutOfRange,
                    location: SrcSpan::new(start, end)
                })
            }
        } else {
            match value.parse::<i64>() {
                Ok(value) => Ok((start, Token::Int(value), end)),
                Err(_) => Err(LexicalError {
                    error: LexicalErrorType::IntegerOutOfRange,
                    location: SrcSpan::new(start, end)
                })
            }
        }
    }

    fn lex_slash(&mut self) -> LexResult {
        let start = self.position;
        self.next_char();

        match self.ch {
            Some('/') => {
                while !matches!(self.ch, Some('\n') | None) {
                    self.next_char();
                }

                self.next_token()
            },
            Some('*') => {
                self.next_char();

                loop {
                    match self.ch {
                        None => {
                            return Err(LexicalError {
                                error: LexicalErrorType::UnterminatedComment,
                                location: SrcSpan::new(start, self.position)
                            })
                        },
                        Some('*') if self.next_ch == Some('/') => {
                            self.next_char();
                            self.next_char();

                            return self.next_token();
                        },
                        Some(_) => {
                            self.next_char();
                        }
                    }
                }
            },
            Some('=') => {
                self.next_char();
                Ok((start, Token::SlashEqual, self.position))
            },
            _ => Ok((start, Token::Slash, self.position)),
        }
    }

    fn lex_string(&mut self) -> LexResult {
        let start = self.position;
        self.next_char();

        let mut value = String::new();

        loop {
            match self.ch {
                None => {
                    return Err(LexicalError {
                        error: LexicalErrorType::UnterminatedString,
                        location: SrcSpan::new(start, self.position)
                    })
                },
                Some('\n') => {
                    return Err(LexicalError {
                        error: LexicalErrorType::NewlineInString,
                        location: SrcSpan::new(start, self.position)
                    })
                },
                Some('"') => {
                    self.next_char();
                    break;
                },
                Some('\\') => {
                    self.next_char();

                    match self.ch {
                        Some('n') => value.push('\n'),
                        Some('t') => value.push('\t'),
                        Some('"') => value.push('"'),
                        Some('\'') => value.push('\''),
                        Some('\\') => value.push('\\'),
                        // unknown escapes pass through untouched
                        Some(ch) => {
                            value.push('\\');
                            value.push(ch);
                        },
                        None => {
                            return Err(LexicalError {
                                error: LexicalErrorType::UnterminatedString,
                                location: SrcSpan::new(start, self.position)
                            })
                        }
                    }

                    self.next_char();
                },
                Some(ch) => {
                    value.push(ch);
                    self.next_char();
                }
            }
        }

        Ok((start, Token::Str(value), self.position))
    }

    fn lex_char(&mut self) -> LexResult {
        let start = self.position;
        self.next_char();

        let value = match self.ch {
            None => {
                return Err(LexicalError {
                    error: LexicalErrorType::UnterminatedCharLiteral,
                    location: SrcSpan::new(start, self.position)
                })
            },
            Some('\'') => {
                self.next_char();

                return Err(LexicalError {
                    error: LexicalErrorType::EmptyCharLiteral,
                    location: SrcSpan::new(start, self.position)
                });
            },
            Some('\\') => {
                self.next_char();

                match self.ch {
                    Some('n') => '\n',
                    Some('t') => '\t',
                    Some('"') => '"',
                    Some('\'') => '\'',
                    Some('\\') => '\\',
                    Some(ch) => {
                        self.skip_to_char_close();

                        return Err(LexicalError {
                            error: LexicalErrorType::UnknownEscape { ch },
                            location: SrcSpan::new(start, self.position)
                        });
                    },
                    None => {
                        return Err(LexicalError {
                            error: LexicalErrorType::UnterminatedCharLiteral,
                            location: SrcSpan::new(start, self.position)
                        })
                    }
                }
            },
            Some(ch) => ch
        };

        self.next_char();

        match self.ch {
            Some('\'') => {
                self.next_char();

                Ok((start, Token::Char(value), self.position))
            },
            _ => {
                let closed = self.skip_to_char_close();

                Err(LexicalError {
                    error: if closed {
                        LexicalErrorType::OverlongCharLiteral
                    } else {
                        LexicalErrorType::UnterminatedCharLiteral
                    },
                    location: SrcSpan::new(start, self.position)
                })
            }
        }
    }

    // resynchronize past a malformed character literal
    fn skip_to_char_close(&mut self) -> bool {
        while !matches!(self.ch, Some('\'') | Some('\n') | None) {
            self.next_char();
        }

        if self.ch == Some('\'') {
            self.next_char();
            true
        } else {
            false
        }
    }
}

impl<T: Iterator<Item = (u32, char)>> Iterator for Lexer<T> {
    type Item = LexResult;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.next_token();

        Some(token)
    }
}
