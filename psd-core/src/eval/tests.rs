use crate::{
    environment::prelude::{Environment, RuntimeError, RuntimeErrorType, Value, ValueType},
    parser::prelude::parse_program,
    utils::prelude::SrcSpan
};

use super::{io::{BufferOutput, ScriptedInput}, Interpreter};

fn try_run_with_input(src: &str, lines: &[&str]) -> Result<String, RuntimeError> {
    let program = match parse_program(src) {
        Ok(program) => program,
        Err(errors) => panic!("parse failed: {errors:?}")
    };

    let output = BufferOutput::new();
    let captured = output.clone();
    let input = ScriptedInput::new(lines.iter().copied());

    let mut interpreter = Interpreter::new(Box::new(output), Box::new(input));
    interpreter.interpret(&program)?;

    Ok(captured.contents())
}

fn run(src: &str) -> String {
    try_run_with_input(src, &[]).expect("program raised a runtime fault")
}

fn run_with_input(src: &str, lines: &[&str]) -> String {
    try_run_with_input(src, lines).expect("program raised a runtime fault")
}

fn run_err(src: &str) -> RuntimeError {
    try_run_with_input(src, &[]).expect_err("program should have faulted")
}

#[test]
fn test_output_literals() {
    assert_eq!(run("program t kamus algoritma output(123) endprogram"), "123\n");
    assert_eq!(run("program t kamus algoritma output(3.14) endprogram"), "3.14\n");
    assert_eq!(run("program t kamus algoritma output(\"halo\") endprogram"), "halo\n");
    assert_eq!(run("program t kamus algoritma output(benar) endprogram"), "true\n");
    assert_eq!(run("program t kamus algoritma output(salah) endprogram"), "false\n");
    assert_eq!(run("program t kamus algoritma output('A') endprogram"), "A\n");
}

#[test]
fn test_output_joins_arguments_with_one_space() {
    assert_eq!(run("program t kamus algoritma output(1, 2, \"tiga\") endprogram"), "1 2 tiga\n");
}

#[test]
fn test_variable_assignment() {
    let src = r#"
        program t
        kamus
            x : integer
        algoritma
            x = 10
            output(x)
        endprogram
    "#;

    assert_eq!(run(src), "10\n");
}

#[test]
fn test_division_semantics() {
    assert_eq!(run("program t kamus algoritma output(10 / 4) endprogram"), "2.5\n");
    assert_eq!(run("program t kamus algoritma output(10 div 4) endprogram"), "2\n");
    assert_eq!(run("program t kamus algoritma output(10 mod 3) endprogram"), "1\n");

    let err = run_err("program t kamus algoritma output(10 / 0) endprogram");
    assert_eq!(err.error, RuntimeErrorType::DivisionByZero);

    let err = run_err("program t kamus algoritma output(10 div 0) endprogram");
    assert_eq!(err.error, RuntimeErrorType::DivisionByZero);
}

#[test]
fn test_div_floors_and_mod_follows_the_dividend() {
    assert_eq!(run("program t kamus algoritma output(-7 div 2) endprogram"), "-4\n");
    assert_eq!(run("program t kamus algoritma output(-7 mod 2) endprogram"), "-1\n");
}

#[test]
fn test_integer_arithmetic_stays_integer() {
    assert_eq!(run("program t kamus algoritma output(1 + 2) endprogram"), "3\n");
    assert_eq!(run("program t kamus algoritma output(4 * 3) endprogram"), "12\n");
    assert_eq!(run("program t kamus algoritma output(10 - 3) endprogram"), "7\n");
    assert_eq!(run("program t kamus algoritma output(-5) endprogram"), "-5\n");
}

#[test]
fn test_string_concatenation() {
    assert_eq!(run("program t kamus algoritma output(\"a\" + \"b\") endprogram"), "ab\n");
    assert_eq!(run("program t kamus algoritma output(\"a\" + 1) endprogram"), "a1\n");
    assert_eq!(run("program t kamus algoritma output(1 + \"a\") endprogram"), "1a\n");
}

#[test]
fn test_equality_has_one_numeric_domain() {
    assert_eq!(run("program t kamus algoritma output(5 == 5.0) endprogram"), "true\n");
    assert_eq!(run("program t kamus algoritma output(\"1\" == 1) endprogram"), "false\n");
    assert_eq!(run("program t kamus algoritma output(5 != 5) endprogram"), "false\n");
}

#[test]
fn test_comparisons() {
    assert_eq!(run("program t kamus algoritma output(10 > 5) endprogram"), "true\n");
    assert_eq!(run("program t kamus algoritma output(10 < 5) endprogram"), "false\n");
    assert_eq!(run("program t kamus algoritma output(5 <= 5) endprogram"), "true\n");

    let err = run_err("program t kamus algoritma output(\"a\" < 5) endprogram");
    assert_eq!(err.error, RuntimeErrorType::OperandsMustBeNumbers);
}

#[test]
fn test_logical_operators_yield_the_deciding_operand() {
    assert_eq!(run("program t kamus algoritma output(1 or 2) endprogram"), "1\n");
    assert_eq!(run("program t kamus algoritma output(salah or 2) endprogram"), "2\n");
    assert_eq!(run("program t kamus algoritma output(benar and 2) endprogram"), "2\n");
}

#[test]
fn test_logical_operators_short_circuit() {
    // the right side would fault if it were evaluated
    assert_eq!(
        run("program t kamus algoritma output(salah and 10 div 0) endprogram"),
        "false\n"
    );
    assert_eq!(
        run("program t kamus algoritma output(benar or 10 div 0) endprogram"),
        "true\n"
    );
}

#[test]
fn test_only_false_is_falsy() {
    // numeric zero and empty text are truthy, deliberately
    assert_eq!(
        run("program t kamus algoritma if 0 then output(\"ya\") endif endprogram"),
        "ya\n"
    );
    assert_eq!(
        run("program t kamus algoritma if \"\" then output(\"ya\") endif endprogram"),
        "ya\n"
    );
    assert_eq!(run("program t kamus algoritma output(!0) endprogram"), "false\n");
    assert_eq!(run("program t kamus algoritma output(!salah) endprogram"), "true\n");
}

#[test]
fn test_if_else_chain_picks_the_middle_branch() {
    let src = r#"
        program t
        kamus
            a : integer
        algoritma
            a = 2
            if a == 1 then
                output("satu")
            else if a == 2 then
                output("dua")
            else
                output("lain")
            endif
        endprogram
    "#;

    assert_eq!(run(src), "dua\n");
}

#[test]
fn test_for_loop_is_inclusive_with_no_separators() {
    let src = r#"
        program t
        kamus
            i : integer
        algoritma
            for i = 1 to 3 then
                outputf("%d", i)
            endfor
        endprogram
    "#;

    assert_eq!(run(src), "123");
}

#[test]
fn test_for_loop_with_start_past_end_runs_zero_times() {
    let src = r#"
        program t
        kamus
            i : integer
        algoritma
            for i = 3 to 1 then
                output(i)
            endfor
            output("selesai")
        endprogram
    "#;

    assert_eq!(run(src), "selesai\n");
}

#[test]
fn test_while_loop() {
    let src = r#"
        program t
        kamus
            i : integer
        algoritma
            i = 1
            while i <= 3 then
                outputf("%d", i)
                i = i + 1
            endwhile
        endprogram
    "#;

    assert_eq!(run(src), "123");
}

#[test]
fn test_repeat_body_always_runs_once() {
    let src = r#"
        program t
        kamus
            i : integer
        algoritma
            i = 99
            repeat
                output(i)
            untuk i > 0
        endprogram
    "#;

    assert_eq!(run(src), "99\n");
}

#[test]
fn test_repeat_runs_until_the_condition_holds() {
    let src = r#"
        program t
        kamus
            i : integer
        algoritma
            i = 1
            repeat
                outputf("%d", i)
                i = i + 1
            untuk i > 3
        endprogram
    "#;

    assert_eq!(run(src), "123");
}

#[test]
fn test_array_round_trip() {
    let src = r#"
        program t
        kamus
            list : integer[5]
        algoritma
            list[2] = 100
            output(list[2])
        endprogram
    "#;

    assert_eq!(run(src), "100\n");
}

#[test]
fn test_two_dimensional_array_round_trip() {
    let src = r#"
        program t
        kamus
            matrix : real[2][2]
        algoritma
            matrix[1][0] = 3.14
            output(matrix[1][0])
        endprogram
    "#;

    assert_eq!(run(src), "3.14\n");
}

#[test]
fn test_array_index_out_of_bounds() {
    let err = run_err(r#"
        program t
        kamus
            l : integer[5]
        algoritma
            output(l[10])
        endprogram
    "#);

    assert!(matches!(err.error, RuntimeErrorType::IndexOutOfBounds { index: 10, .. }));
}

#[test]
fn test_array_dimension_must_be_positive() {
    let err = run_err(r#"
        program t
        kamus
            l : integer[0]
        algoritma
        endprogram
    "#);

    assert_eq!(err.error, RuntimeErrorType::InvalidDimension);
}

#[test]
fn test_array_dimension_may_be_an_expression() {
    let src = r#"
        program t
        kamus
            const n : integer = 3
            l : integer[n + 1]
        algoritma
            output(length(l))
        endprogram
    "#;

    assert_eq!(run(src), "4\n");
}

#[test]
fn test_whole_array_assignment_is_rejected() {
    let err = run_err(r#"
        program t
        kamus
            l : integer[5]
        algoritma
            l = 1
        endprogram
    "#);

    assert!(matches!(err.error, RuntimeErrorType::WholeArrayAssignment { .. }));
}

#[test]
fn test_assigning_text_to_an_integer_faults() {
    let err = run_err(r#"
        program t
        kamus
            v : integer
        algoritma
            v = "halo"
        endprogram
    "#);

    assert!(matches!(err.error, RuntimeErrorType::TypeMismatch { .. }));
}

#[test]
fn test_integer_accepts_a_whole_numbered_real() {
    let src = r#"
        program t
        kamus
            x : integer
        algoritma
            x = 10 / 5
            output(x)
        endprogram
    "#;

    assert_eq!(run(src), "2\n");
}

#[test]
fn test_character_demands_exactly_one_text_element() {
    let src = r#"
        program t
        kamus
            c : character
        algoritma
            c = 'A'
            output(c)
        endprogram
    "#;

    assert_eq!(run(src), "A\n");

    let err = run_err(r#"
        program t
        kamus
            c : character
        algoritma
            c = "xy"
        endprogram
    "#);

    assert!(matches!(err.error, RuntimeErrorType::TypeMismatch { .. }));
}

#[test]
fn test_constants_are_immutable() {
    let err = run_err(r#"
        program t
        kamus
            const pi : real = 3.14
        algoritma
            pi = 3.0
        endprogram
    "#);

    assert!(matches!(err.error, RuntimeErrorType::ConstantReassignment { .. }));
}

#[test]
fn test_redeclaration_in_the_same_scope_faults() {
    let err = run_err(r#"
        program t
        kamus
            a : integer
            a : real
        algoritma
        endprogram
    "#);

    assert!(matches!(err.error, RuntimeErrorType::Redeclaration { .. }));
}

#[test]
fn test_undefined_variable() {
    let err = run_err("program t kamus algoritma output(tak_dikenal) endprogram");

    assert!(matches!(err.error, RuntimeErrorType::UndefinedVariable { .. }));
}

#[test]
fn test_unknown_function() {
    let err = run_err("program t kamus algoritma output(foo(1)) endprogram");

    assert!(matches!(err.error, RuntimeErrorType::UnknownFunction { .. }));
}

#[test]
fn test_length_of_text_and_arrays() {
    let src = r#"
        program t
        kamus
            s : string
        algoritma
            s = "test"
            output(length(s))
        endprogram
    "#;

    assert_eq!(run(src), "4\n");

    let src = r#"
        program t
        kamus
            l : integer[7]
        algoritma
            output(length(l))
        endprogram
    "#;

    assert_eq!(run(src), "7\n");

    // case-insensitive dispatch
    assert_eq!(run("program t kamus algoritma output(LENGTH(\"ab\")) endprogram"), "2\n");

    let err = run_err("program t kamus algoritma output(length(1)) endprogram");
    assert_eq!(err.error, RuntimeErrorType::InvalidLengthOperand);
}

#[test]
fn test_compound_assignment() {
    let src = r#"
        program t
        kamus
            a : integer
        algoritma
            a = 10
            a += 5
            output(a)
            a -= 3
            output(a)
            a *= 2
            output(a)
        endprogram
    "#;

    assert_eq!(run(src), "15\n12\n24\n");
}

#[test]
fn test_compound_assignment_on_array_elements() {
    let src = r#"
        program t
        kamus
            l : integer[3]
        algoritma
            l[0] = 4
            l[0] += 6
            output(l[0])
        endprogram
    "#;

    assert_eq!(run(src), "10\n");
}

#[test]
fn test_outputf_appends_no_newline() {
    assert_eq!(run("program t kamus algoritma outputf(\"hi\") endprogram"), "hi");
}

#[test]
fn test_outputf_substitutes_placeholders() {
    let src = r#"
        program t
        kamus
        algoritma
            outputf("angka: %d, str: %s", 10, "tes")
        endprogram
    "#;

    assert_eq!(run(src), "angka: 10, str: tes");
}

#[test]
fn test_outputf_format_must_be_text() {
    let err = run_err("program t kamus algoritma outputf(1, 2) endprogram");

    assert_eq!(err.error, RuntimeErrorType::FormatNotText);
}

#[test]
fn test_input_converts_per_declared_type() {
    let src = r#"
        program t
        kamus
            nama : string
            umur : integer
        algoritma
            input(nama)
            input(umur)
            outputf("Nama: %s, Umur: %d", nama, umur)
        endprogram
    "#;

    assert_eq!(run_with_input(src, &["Alex", "18"]), "Nama: Alex, Umur: 18");
}

#[test]
fn test_input_caches_leftover_tokens_within_a_line() {
    // the second input consumes the leftover of the first line
    let src = r#"
        program t
        kamus
            nama : string
            umur : integer
        algoritma
            input(nama)
            input(umur)
            outputf("%s/%d", nama, umur)
        endprogram
    "#;

    assert_eq!(run_with_input(src, &["Alex 18"]), "Alex/18");
}

#[test]
fn test_input_boolean_and_character() {
    let src = r#"
        program t
        kamus
            b : boolean
            c : character
        algoritma
            input(b, c)
            output(b, c)
        endprogram
    "#;

    assert_eq!(run_with_input(src, &["BENAR kata"]), "true k\n");
    assert_eq!(run_with_input(src, &["lain x"]), "false x\n");
}

#[test]
fn test_input_faults_when_tokens_run_out() {
    let src = r#"
        program t
        kamus
            a, b : integer
        algoritma
            input(a, b)
        endprogram
    "#;

    let err = try_run_with_input(src, &["1"]).expect_err("input should run dry");
    assert_eq!(err.error, RuntimeErrorType::InputExhausted);
}

#[test]
fn test_input_rejects_non_numeric_tokens_for_integers() {
    let src = r#"
        program t
        kamus
            a : integer
        algoritma
            input(a)
        endprogram
    "#;

    let err = try_run_with_input(src, &["bukan_angka"]).expect_err("input should fail to parse");
    assert!(matches!(err.error, RuntimeErrorType::InputParse { .. }));
}

#[test]
fn test_input_into_array_elements() {
    let src = r#"
        program t
        kamus
            l : integer[2]
        algoritma
            input(l[0], l[1])
            output(l[0] + l[1])
        endprogram
    "#;

    assert_eq!(run_with_input(src, &["3 4"]), "7\n");
}

#[test]
fn test_runs_are_deterministic_across_sessions() {
    let src = r#"
        program t
        kamus
            a : integer
        algoritma
            input(a)
            output(a * 2)
        endprogram
    "#;

    let first = run_with_input(src, &["21"]);
    let second = run_with_input(src, &["21"]);

    assert_eq!(first, "42\n");
    assert_eq!(first, second);
}

#[test]
fn test_keywords_lex_case_insensitively_in_a_full_run() {
    assert_eq!(
        run("PROGRAM T KAMUS ALGORITMA OUTPUT(1) ENDPROGRAM"),
        "1\n"
    );
}

#[test]
fn test_uninitialized_variables_read_as_null() {
    let src = r#"
        program t
        kamus
            a : integer
        algoritma
            output(a)
        endprogram
    "#;

    assert_eq!(run(src), "null\n");
}

#[test]
fn test_scopes_nest_and_shadow() {
    let mut env = Environment::new();
    let span = SrcSpan::new(0, 0);

    env.define("a", ValueType::Integer, false, None, Value::Int(1), span).unwrap();

    env.enter_scope();
    // shadowing across a scope boundary is allowed
    env.define("a", ValueType::Integer, false, None, Value::Int(2), span).unwrap();
    assert_eq!(env.get("a", span).unwrap(), Value::Int(2));

    // redeclaring within the same scope is not
    let err = env.define("a", ValueType::Integer, false, None, Value::Int(3), span);
    assert!(matches!(err.unwrap_err().error, RuntimeErrorType::Redeclaration { .. }));
    env.exit_scope();

    // the child scope is gone, the outer binding is visible again
    assert_eq!(env.get("a", span).unwrap(), Value::Int(1));
}
