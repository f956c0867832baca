use super::prelude::{Lexer, LexicalError, LexicalErrorType, Token};

fn assert_tokens(input: &str, tokens: Vec<Token>) {
    let mut lexer = Lexer::new(input.char_indices().map(|(i, c)| (i as u32, c)));

    for (idx, token) in tokens.iter().enumerate() {
        let (_, next_token, _) = match lexer.next_token() {
            Ok(next_token) => next_token,
            Err(err) => {
                println!("stopped at {token:?} ({idx})");
                panic!("{err:?}")
            }
        };

        assert_eq!(
            *token, next_token,
            "Next token does not match expected token ({:?}, {:?}) at {}",
            next_token, token, idx
        );
    }
}

#[test]
fn test_punctuation_and_operators() {
    let input = "( ) [ ] : , + - * / = += -= *= /= ! != == > >= < <=";

    assert_tokens(input, vec![
        Token::LeftParen,
        Token::RightParen,
        Token::LeftBracket,
        Token::RightBracket,
        Token::Colon,
        Token::Comma,
        Token::Plus,
        Token::Minus,
        Token::Star,
        Token::Slash,
        Token::Equal,
        Token::PlusEqual,
        Token::MinusEqual,
        Token::StarEqual,
        Token::SlashEqual,
        Token::Bang,
        Token::BangEqual,
        Token::EqualEqual,
        Token::Greater,
        Token::GreaterEqual,
        Token::Less,
        Token::LessEqual,
        Token::Eof,
    ]);
}

#[test]
fn test_keywords() {
    let input = r#"
        program kamus algoritma endprogram
        const integer real string character boolean
        if then else endif for to endfor while endwhile repeat untuk
        and or div mod
        output outputf input inputf
        benar salah true false
    "#;

    assert_tokens(input, vec![
        Token::Program,
        Token::Kamus,
        Token::Algoritma,
        Token::Endprogram,
        Token::Const,
        Token::Integer,
        Token::Real,
        Token::String,
        Token::Character,
        Token::Boolean,
        Token::If,
        Token::Then,
        Token::Else,
        Token::Endif,
        Token::For,
        Token::To,
        Token::Endfor,
        Token::While,
        Token::Endwhile,
        Token::Repeat,
        Token::Untuk,
        Token::And,
        Token::Or,
        Token::Div,
        Token::Mod,
        Token::Output,
        Token::Outputf,
        Token::Input,
        Token::Inputf,
        Token::True,
        Token::False,
        Token::True,
        Token::False,
        Token::Eof,
    ]);
}

#[test]
fn test_keywords_are_case_insensitive() {
    let input = "PROGRAM Kamus AlGoRiTmA EndProgram WHILE";

    assert_tokens(input, vec![
        Token::Program,
        Token::Kamus,
        Token::Algoritma,
        Token::Endprogram,
        Token::While,
        Token::Eof,
    ]);
}

#[test]
fn test_identifiers_keep_their_case() {
    // identifiers are case-sensitive, `Var` and `var` are distinct names
    let input = "Var var nilai_2 _tmp";

    assert_tokens(input, vec![
        Token::Ident(String::from("Var")),
        Token::Ident(String::from("var")),
        Token::Ident(String::from("nilai_2")),
        Token::Ident(String::from("_tmp")),
        Token::Eof,
    ]);
}

#[test]
fn test_length_is_not_a_keyword() {
    assert_tokens("length(s)", vec![
        Token::Ident(String::from("length")),
        Token::LeftParen,
        Token::Ident(String::from("s")),
        Token::RightParen,
        Token::Eof,
    ]);
}

#[test]
fn test_numbers() {
    // a literal is real only when the point is followed by a digit
    let input = "0 123 3.14 10.0 7.";

    assert_tokens(input, vec![
        Token::Int(0),
        Token::Int(123),
        Token::Float(3.14),
        Token::Float(10.0),
        Token::Int(7),
    ]);
}

#[test]
fn test_strings_and_escapes() {
    let input = r#""halo" "" "a\nb" "tab\there" "quote\" inside" "back\\slash""#;

    assert_tokens(input, vec![
        Token::Str(String::from("halo")),
        Token::Str(String::from("")),
        Token::Str(String::from("a\nb")),
        Token::Str(String::from("tab\there")),
        Token::Str(String::from("quote\" inside")),
        Token::Str(String::from("back\\slash")),
        Token::Eof,
    ]);
}

#[test]
fn test_char_literals() {
    let input = r#"'a' '0' '\n' '\'' '\\'"#;

    assert_tokens(input, vec![
        Token::Char('a'),
        Token::Char('0'),
        Token::Char('\n'),
        Token::Char('\''),
        Token::Char('\\'),
        Token::Eof,
    ]);
}

#[test]
fn test_comments_are_discarded() {
    let input = r#"
        a // a line comment
        /* a block
           comment */ b
        10 /* inline */ / 2
    "#;

    assert_tokens(input, vec![
        Token::Ident(String::from("a")),
        Token::Ident(String::from("b")),
        Token::Int(10),
        Token::Slash,
        Token::Int(2),
        Token::Eof,
    ]);
}

#[test]
fn test_lexical_errors() {
    let cases: Vec<(&str, LexicalErrorType)> = vec![
        ("\"belum selesai", LexicalErrorType::UnterminatedString),
        ("\"dua\nbaris\"", LexicalErrorType::NewlineInString),
        ("''", LexicalErrorType::EmptyCharLiteral),
        ("'ab'", LexicalErrorType::OverlongCharLiteral),
        ("'a", LexicalErrorType::UnterminatedCharLiteral),
        ("'\\q'", LexicalErrorType::UnknownEscape { ch: 'q' }),
        ("/* tanpa akhir", LexicalErrorType::UnterminatedComment),
        ("@", LexicalErrorType::UnrecognizedCharacter { ch: '@' }),
        ("99999999999999999999", LexicalErrorType::IntegerOutOfRange),
    ];

    for (input, expected) in cases {
        let mut lexer = Lexer::new(input.char_indices().map(|(i, c)| (i as u32, c)));

        let err: LexicalError = match lexer.next_token() {
            Err(err) => err,
            Ok(value) => panic!("Expected Err for {input:?} but got Ok({value:?})"),
        };

        assert_eq!(expected, err.error, "wrong error for {input:?}");
    }
}

#[test]
fn test_scanning_continues_after_an_error() {
    // the bad character is reported, the rest still becomes tokens
    let input = "a @ b";

    let mut lexer = Lexer::new(input.char_indices().map(|(i, c)| (i as u32, c)));

    assert_eq!(lexer.next_token().unwrap().1, Token::Ident(String::from("a")));
    assert!(lexer.next_token().is_err());
    assert_eq!(lexer.next_token().unwrap().1, Token::Ident(String::from("b")));
    assert_eq!(lexer.next_token().unwrap().1, Token::Eof);
}

#[test]
fn test_program_scan() {
    let input = r#"
        program hitung
        kamus
            a, b : integer
            m : real[2][3]
        algoritma
            a = 10
            b = a div 3
            if a > b then
                output("lebih", a)
            endif
        endprogram
    "#;

    assert_tokens(input, vec![
        Token::Program,
        Token::Ident(String::from("hitung")),
        Token::Kamus,
        Token::Ident(String::from("a")),
        Token::Comma,
        Token::Ident(String::from("b")),
        Token::Colon,
        Token::Integer,
        Token::Ident(String::from("m")),
        Token::Colon,
        Token::Real,
        Token::LeftBracket,
        Token::Int(2),
        Token::RightBracket,
        Token::LeftBracket,
        Token::Int(3),
        Token::RightBracket,
        Token::Algoritma,
        Token::Ident(String::from("a")),
        Token::Equal,
        Token::Int(10),
        Token::Ident(String::from("b")),
        Token::Equal,
        Token::Ident(String::from("a")),
        Token::Div,
        Token::Int(3),
        Token::If,
        Token::Ident(String::from("a")),
        Token::Greater,
        Token::Ident(String::from("b")),
        Token::Then,
        Token::Output,
        Token::LeftParen,
        Token::Str(String::from("lebih")),
        Token::Comma,
        Token::Ident(String::from("a")),
        Token::RightParen,
        Token::Endif,
        Token::Endprogram,
        Token::Eof,
    ]);
}
