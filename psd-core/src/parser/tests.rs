use crate::lexer::prelude::Token;
use super::prelude::{
    parse_program, Declaration, Expression, ParseError, ParseErrorType, Program, Statement,
    TypeAnnotation, TypeName
};

fn parse_ok(input: &str) -> Program {
    match parse_program(input) {
        Ok(program) => program,
        Err(errors) => panic!("expected a clean parse, got {errors:?}")
    }
}

fn parse_errors(input: &str) -> Vec<ParseError> {
    match parse_program(input) {
        Ok(program) => panic!("expected errors, got {program}"),
        Err(errors) => errors
    }
}

#[test]
fn test_minimal_program() {
    let program = parse_ok("program kosong kamus algoritma endprogram");

    assert_eq!(program.name.value, "kosong");
    assert!(program.declarations.is_empty());
    assert!(program.statements.is_empty());
}

#[test]
fn test_var_declarations() {
    let program = parse_ok(r#"
        program t
        kamus
            a, b : integer
            nama : string
        algoritma
        endprogram
    "#);

    assert_eq!(program.declarations.len(), 2);

    match &program.declarations[0] {
        Declaration::Var(declaration) => {
            let names = declaration.names.iter()
                .map(|name| name.value.as_str())
                .collect::<Vec<&str>>();

            assert_eq!(names, vec!["a", "b"]);
            assert!(matches!(
                declaration.annotation,
                TypeAnnotation::Basic { name: TypeName::Integer, .. }
            ));
        },
        other => panic!("expected a var declaration, got {other:?}")
    }
}

#[test]
fn test_const_declaration() {
    let program = parse_ok(r#"
        program t
        kamus
            const pi : real = 3.14
        algoritma
        endprogram
    "#);

    match &program.declarations[0] {
        Declaration::Const(declaration) => {
            assert_eq!(declaration.name.value, "pi");
            assert!(matches!(
                declaration.annotation,
                TypeAnnotation::Basic { name: TypeName::Real, .. }
            ));
        },
        other => panic!("expected a const declaration, got {other:?}")
    }
}

#[test]
fn test_array_declaration_with_expression_dimension() {
    let program = parse_ok(r#"
        program t
        kamus
            m : real[2][n + 1]
        algoritma
        endprogram
    "#);

    match &program.declarations[0] {
        Declaration::Var(declaration) => match &declaration.annotation {
            TypeAnnotation::Array { base, dimensions, .. } => {
                assert_eq!(*base, TypeName::Real);
                assert_eq!(dimensions.len(), 2);
                assert!(matches!(dimensions[1], Expression::Binary(_)));
            },
            other => panic!("expected an array annotation, got {other:?}")
        },
        other => panic!("expected a var declaration, got {other:?}")
    }
}

#[test]
fn test_operator_precedence() {
    let program = parse_ok("program t kamus a : integer algoritma a = 1 + 2 * 3 endprogram");

    let assign = match &program.statements[0] {
        Statement::Expression(Expression::Assign(assign)) => assign,
        other => panic!("expected an assignment, got {other:?}")
    };

    // multiplication binds tighter: 1 + (2 * 3)
    match assign.value.as_ref() {
        Expression::Binary(binary) => {
            assert_eq!(binary.operator, Token::Plus);
            assert!(matches!(binary.right.as_ref(), Expression::Binary(inner) if inner.operator == Token::Star));
        },
        other => panic!("expected a binary expression, got {other:?}")
    }
}

#[test]
fn test_grouping_overrides_precedence() {
    let program = parse_ok("program t kamus a : integer algoritma a = (1 + 2) * 3 endprogram");

    let assign = match &program.statements[0] {
        Statement::Expression(Expression::Assign(assign)) => assign,
        other => panic!("expected an assignment, got {other:?}")
    };

    match assign.value.as_ref() {
        Expression::Binary(binary) => {
            assert_eq!(binary.operator, Token::Star);
            assert!(matches!(binary.left.as_ref(), Expression::Grouping { .. }));
        },
        other => panic!("expected a binary expression, got {other:?}")
    }
}

#[test]
fn test_logical_operators_are_their_own_node() {
    let program = parse_ok("program t kamus algoritma output(benar or salah and benar) endprogram");

    let output = match &program.statements[0] {
        Statement::Output(output) => output,
        other => panic!("expected output, got {other:?}")
    };

    // or binds loosest: benar or (salah and benar)
    match &output.args[0] {
        Expression::Logical(logical) => {
            assert_eq!(logical.operator, Token::Or);
            assert!(matches!(
                logical.right.as_ref(),
                Expression::Logical(inner) if inner.operator == Token::And
            ));
        },
        other => panic!("expected a logical expression, got {other:?}")
    }
}

#[test]
fn test_else_if_chain_nests_to_the_right() {
    let program = parse_ok(r#"
        program t
        kamus
            a : integer
        algoritma
            if a == 1 then
                output("satu")
            else if a == 2 then
                output("dua")
            else
                output("lain")
            endif
        endprogram
    "#);

    let outer = match &program.statements[0] {
        Statement::If(statement) => statement,
        other => panic!("expected if, got {other:?}")
    };

    let nested = match outer.else_branch.as_deref() {
        Some(Statement::If(nested)) => nested,
        other => panic!("expected a nested if in the else branch, got {other:?}")
    };

    assert!(matches!(nested.else_branch.as_deref(), Some(Statement::Block(_))));
}

#[test]
fn test_multidimensional_index_uses_bracket_groups() {
    let program = parse_ok(r#"
        program t
        kamus
            m : integer[2][2]
        algoritma
            m[1][0] = 5
        endprogram
    "#);

    match &program.statements[0] {
        Statement::Expression(Expression::ArraySet(set)) => {
            assert_eq!(set.target.name.value, "m");
            assert_eq!(set.target.indices.len(), 2);
        },
        other => panic!("expected an array set, got {other:?}")
    }
}

#[test]
fn test_repeat_untuk() {
    let program = parse_ok(r#"
        program t
        kamus
            i : integer
        algoritma
            repeat
                i = i + 1
            untuk i > 3
        endprogram
    "#);

    match &program.statements[0] {
        Statement::Repeat(statement) => {
            assert_eq!(statement.body.statements.len(), 1);
        },
        other => panic!("expected repeat, got {other:?}")
    }
}

#[test]
fn test_recovery_surfaces_multiple_errors() {
    // both malformed conditions are reported in a single run
    let errors = parse_errors(r#"
        program t
        kamus
        algoritma
            if then output("a") endif
            while then output("b") endwhile
            output("selesai")
        endprogram
    "#);

    assert!(errors.len() >= 2, "expected several errors, got {errors:?}");
    assert!(errors.iter().any(|error| {
        matches!(&error.error, ParseErrorType::ExpectedExpression { token: Token::Then })
    }));
}

#[test]
fn test_invalid_assignment_target() {
    let errors = parse_errors("program t kamus a : integer algoritma (a) = 1 endprogram");

    assert!(errors.iter().any(|error| {
        matches!(error.error, ParseErrorType::InvalidAssignmentTarget)
    }));
}

#[test]
fn test_indexing_is_only_legal_on_identifiers() {
    let errors = parse_errors("program t kamus a : integer algoritma output((a)[0]) endprogram");

    assert!(errors.iter().any(|error| {
        matches!(error.error, ParseErrorType::InvalidIndexTarget)
    }));
}

#[test]
fn test_code_after_endprogram_is_rejected() {
    let errors = parse_errors("program t kamus algoritma endprogram output(1)");

    assert!(errors.iter().any(|error| {
        matches!(error.error, ParseErrorType::UnexpectedToken { .. })
    }));
}

#[test]
fn test_missing_endif() {
    let errors = parse_errors(r#"
        program t
        kamus
        algoritma
            if benar then output("ya")
        endprogram
    "#);

    assert!(!errors.is_empty());
}

#[test]
fn test_missing_header_keywords() {
    assert!(parse_errors("kamus algoritma endprogram").iter().any(|error| {
        matches!(error.error, ParseErrorType::ExpectedProgram)
    }));

    assert!(parse_errors("program t algoritma endprogram").iter().any(|error| {
        matches!(error.error, ParseErrorType::ExpectedKamus)
    }));

    assert!(parse_errors("program t kamus endprogram").iter().any(|error| {
        matches!(error.error, ParseErrorType::ExpectedAlgoritma)
    }));

    assert!(parse_errors("program t kamus algoritma").iter().any(|error| {
        matches!(error.error, ParseErrorType::ExpectedEndprogram)
    }));
}

#[test]
fn test_lex_errors_surface_through_parsing() {
    let errors = parse_errors("program t kamus algoritma output(@) endprogram");

    assert!(errors.iter().any(|error| {
        matches!(error.error, ParseErrorType::LexError { .. })
    }));
}

#[test]
fn test_display_round_trip() {
    let program = parse_ok(r#"
        program contoh
        kamus
            a : integer
        algoritma
            a = 1 + 2
            output(a)
        endprogram
    "#);

    assert_eq!(
        program.to_string(),
        "program contoh kamus a : integer algoritma a = 1 + 2 output(a) endprogram"
    );
}
