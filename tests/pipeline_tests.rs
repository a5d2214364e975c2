// End-to-end tests over the public pipeline API: lexing, parsing,
// semantic validation, and interpretation.

use modl::{
    execute, ErrorKind, Execution, Lexer, ModlError, Parser, RunFailure, SemanticAnalyzer,
    TokenKind, Value,
};

fn program(declarations: &str, body: &str) -> String {
    format!("program var\n{}\nbegin\n{}\nend.", declarations, body)
}

fn run_ok(source: &str) -> Execution {
    match execute(source) {
        Ok(execution) => execution,
        Err(RunFailure::Error(e)) => panic!("pipeline failed: {}", e),
        Err(RunFailure::Violations(v)) => {
            panic!(
                "unexpected violations: {:?}",
                v.iter().map(|e| e.message.clone()).collect::<Vec<_>>()
            )
        }
    }
}

fn violations_of(source: &str) -> Vec<ModlError> {
    match execute(source) {
        Err(RunFailure::Violations(violations)) => violations,
        Ok(_) => panic!("expected semantic violations, but the program ran"),
        Err(RunFailure::Error(e)) => panic!("expected violations, got hard error: {}", e),
    }
}

fn hard_error_of(source: &str) -> ModlError {
    match execute(source) {
        Err(RunFailure::Error(error)) => error,
        Ok(_) => panic!("expected a failure, but the program ran"),
        Err(RunFailure::Violations(v)) => panic!("expected a hard error, got violations: {:?}", v),
    }
}

fn number(value: Value) -> f64 {
    match value {
        Value::Number(n) => n,
        Value::Bool(b) => panic!("expected a number, got bool {}", b),
    }
}

fn env_number(execution: &Execution, name: &str) -> f64 {
    number(
        execution
            .environment
            .get(name)
            .unwrap_or_else(|| panic!("no binding for {}", name)),
    )
}

fn env_bool(execution: &Execution, name: &str) -> bool {
    match execution.environment.get(name) {
        Some(Value::Bool(b)) => b,
        other => panic!("expected bool binding for {}, got {:?}", name, other),
    }
}

// ---------------------------------------------------------------------------
// Lexer

#[test]
fn operator_word_prefix_splits_identifier() {
    let tokens = Lexer::new("minute".to_string()).scan_tokens().unwrap();
    let texts: Vec<(TokenKind, &str)> = tokens.iter().map(|t| (t.kind, t.text.as_str())).collect();
    assert_eq!(
        texts,
        vec![(TokenKind::Operator, "min"), (TokenKind::Identifier, "ute")]
    );
}

#[test]
fn true_and_false_are_boolean_tokens() {
    let tokens = Lexer::new("true false".to_string()).scan_tokens().unwrap();
    assert!(tokens.iter().all(|t| t.kind == TokenKind::Boolean));
}

#[test]
fn end_dot_is_a_single_keyword_token() {
    let tokens = Lexer::new("end.".to_string()).scan_tokens().unwrap();
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::Keyword);
    assert_eq!(tokens[0].text, "end.");
}

#[test]
fn comments_are_discarded() {
    let tokens = Lexer::new("A {ignored} B".to_string()).scan_tokens().unwrap();
    let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
    assert_eq!(texts, vec!["A", "B"]);
}

#[test]
fn unterminated_comment_is_a_lexical_error() {
    let error = Lexer::new("{ never closed".to_string())
        .scan_tokens()
        .unwrap_err();
    assert_eq!(error.kind, ErrorKind::LexError);
    assert!(error.message.contains("Unterminated comment"));
}

#[test]
fn unknown_character_reports_position() {
    let error = Lexer::new("A as @".to_string()).scan_tokens().unwrap_err();
    assert_eq!(error.kind, ErrorKind::LexError);
    assert!(error.message.contains('@'));
    assert!(error.message.contains("line 1"));
    assert!(error.message.contains("column 5"));
}

#[test]
fn token_positions_track_lines_and_columns() {
    let tokens = Lexer::new("A as 1\n  B as 2".to_string())
        .scan_tokens()
        .unwrap();
    assert_eq!((tokens[0].line, tokens[0].column), (1, 0));
    assert_eq!((tokens[3].line, tokens[3].column), (2, 2));
    assert_eq!(tokens[3].text, "B");
}

#[test]
fn number_may_start_with_a_dot() {
    let tokens = Lexer::new(".5".to_string()).scan_tokens().unwrap();
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::Number);
    assert_eq!(tokens[0].text, ".5");
}

#[test]
fn and_and_or_lex_as_operator_tokens() {
    let tokens = Lexer::new("A and B or C".to_string()).scan_tokens().unwrap();
    let texts: Vec<(TokenKind, &str)> = tokens.iter().map(|t| (t.kind, t.text.as_str())).collect();
    assert_eq!(
        texts,
        vec![
            (TokenKind::Identifier, "A"),
            (TokenKind::Operator, "and"),
            (TokenKind::Identifier, "B"),
            (TokenKind::Operator, "or"),
            (TokenKind::Identifier, "C"),
        ]
    );
}

#[test]
fn token_stream_round_trips_through_rendering() {
    let source = program(
        "A int;\nB float;\nC bool;",
        "A as 5; {note}\nif A GT 3 then B as 1.5 else B as .5;\nwhile C do [A as A min 1]",
    );
    let tokens = Lexer::new(source).scan_tokens().unwrap();

    let rendered = tokens
        .iter()
        .map(|t| t.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    let relexed = Lexer::new(rendered).scan_tokens().unwrap();

    assert_eq!(tokens.len(), relexed.len());
    for (a, b) in tokens.iter().zip(relexed.iter()) {
        assert_eq!(a.kind, b.kind);
        assert_eq!(a.text, b.text);
    }
}

// ---------------------------------------------------------------------------
// Parser

#[test]
fn literal_left_operand_terminates_the_expression() {
    // `2 plus 3` never forms a binary operation: the literal ends the
    // production and the dangling `plus` breaks the statement block.
    let source = program("X int;", "X as 2 plus 3");
    let error = hard_error_of(&source);
    assert_eq!(error.kind, ErrorKind::ParseError);
}

#[test]
fn missing_then_is_an_expected_vs_actual_error() {
    let source = program("A int; X int;", "if A GT 3 X as 1");
    let error = hard_error_of(&source);
    assert_eq!(error.kind, ErrorKind::ParseError);
    assert!(error.message.contains("Expected 'then'"));
    assert!(error.message.contains("'X'"));
}

#[test]
fn premature_end_of_input_is_a_syntax_error() {
    let error = hard_error_of("program var");
    assert_eq!(error.kind, ErrorKind::ParseError);
    assert!(error.message.contains("Unexpected end of input"));
}

#[test]
fn declaration_type_must_be_int_float_or_bool() {
    let source = program("A while;", "A as 1");
    let error = hard_error_of(&source);
    assert_eq!(error.kind, ErrorKind::ParseError);
    assert!(error.message.contains("type keyword"));
}

#[test]
fn symbol_table_preserves_declaration_order() {
    let source = program("A int;\nB float;\nC bool;", "A as 1");
    let tokens = Lexer::new(source).scan_tokens().unwrap();
    let (_, symbols) = Parser::new(tokens).parse().unwrap();

    let names: Vec<&str> = symbols.iter().map(|(name, _)| name).collect();
    assert_eq!(names, vec!["A", "B", "C"]);
}

#[test]
fn comparison_cannot_nest_inside_arithmetic() {
    // `X as A GT 3` leaves `GT 3` dangling after the assignment.
    let source = program("A int; X int;", "X as A GT 3");
    let error = hard_error_of(&source);
    assert_eq!(error.kind, ErrorKind::ParseError);
}

#[test]
fn logical_operators_are_lexed_but_never_parsed() {
    // `and`/`or` exist as operator tokens only; no production consumes
    // them, so one dangling after an assignment breaks the block.
    let source = program("A bool; C bool; X bool;", "X as A and C");
    let error = hard_error_of(&source);
    assert_eq!(error.kind, ErrorKind::ParseError);
}

// ---------------------------------------------------------------------------
// Semantic validation

#[test]
fn duplicate_declaration_is_exactly_one_violation() {
    let source = program("A int;\nA int;", "A as 1");
    let violations = violations_of(&source);
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].kind, ErrorKind::SemanticError);
    assert!(violations[0].message.contains("declared more than once"));
}

#[test]
fn write_of_undeclared_identifier_names_the_unknown_type() {
    let source = program("A int;", "write(B)");
    let violations = violations_of(&source);
    assert_eq!(violations.len(), 1);
    assert!(violations[0].message.contains("write()"));
    assert!(violations[0].message.contains("unknown"));
}

#[test]
fn assignment_to_undeclared_variable_is_reported() {
    let source = program("A int;", "B as 1");
    let violations = violations_of(&source);
    assert_eq!(violations.len(), 1);
    assert!(violations[0].message.contains("Undeclared variable 'B'"));
}

#[test]
fn int_variable_rejects_float_expression() {
    let source = program("A int;", "A as 1.5");
    let violations = violations_of(&source);
    assert_eq!(violations.len(), 1);
    assert!(violations[0].message.contains("'A' is int"));
    assert!(violations[0].message.contains("expression is float"));
}

#[test]
fn float_variable_accepts_int_expression() {
    let source = program("B float;", "B as 2");
    let execution = run_ok(&source);
    assert_eq!(env_number(&execution, "B"), 2.0);
}

#[test]
fn while_condition_must_infer_bool() {
    let source = program("X int;", "while X do X as 1");
    let violations = violations_of(&source);
    assert_eq!(violations.len(), 1);
    assert!(violations[0].message.contains("While condition must be bool"));
}

#[test]
fn for_limit_must_be_numeric() {
    let source = program("X int; C bool;", "for X as 1 to C do write(X)");
    let violations = violations_of(&source);
    assert_eq!(violations.len(), 1);
    assert!(violations[0].message.contains("Loop limit must be numeric"));
}

#[test]
fn comparison_operands_must_be_numeric() {
    let source = program("C bool; X int;", "if C GT 1 then X as 1");
    let violations = violations_of(&source);
    assert_eq!(violations.len(), 1);
    assert!(violations[0].message.contains("Cannot compare"));
}

#[test]
fn all_violations_are_collected_in_one_pass() {
    let source = program("A int;\nA int;", "A as 1.5;\nB as 2;\nwrite(Q)");
    let violations = violations_of(&source);
    // Duplicate declaration, float-into-int, undeclared target,
    // unknown-typed write argument.
    assert_eq!(violations.len(), 4);
}

// ---------------------------------------------------------------------------
// Interpreter

#[test]
fn declared_int_defaults_to_zero() {
    let source = program("A int;", "write(A)");
    let execution = run_ok(&source);
    assert_eq!(execution.output.len(), 1);
    assert_eq!(execution.output[0].to_string(), "0");
}

#[test]
fn defaults_follow_declared_types() {
    let source = program("A int; B float; C bool;", "write(A)");
    let execution = run_ok(&source);
    assert_eq!(env_number(&execution, "A"), 0.0);
    assert_eq!(env_number(&execution, "B"), 0.0);
    assert!(!env_bool(&execution, "C"));
}

#[test]
fn for_loop_writes_one_through_five_and_leaves_six() {
    let source = program("X int;", "for X as 1 to 5 do write(X)");
    let execution = run_ok(&source);

    let written: Vec<String> = execution.output.iter().map(|v| v.to_string()).collect();
    assert_eq!(written, vec!["1", "2", "3", "4", "5"]);
    assert_eq!(env_number(&execution, "X"), 6.0);
}

#[test]
fn conditional_takes_the_then_branch() {
    let source = program(
        "A int; X int;",
        "A as 5;\nif A GT 3 then X as A mult 2 else X as A div 2",
    );
    let execution = run_ok(&source);
    assert_eq!(env_number(&execution, "X"), 10.0);
}

#[test]
fn conditional_takes_the_else_branch() {
    let source = program(
        "A int; X int;",
        "A as 2;\nif A GT 3 then X as A mult 2 else X as A div 2",
    );
    let execution = run_ok(&source);
    assert_eq!(env_number(&execution, "X"), 1.0);
}

#[test]
fn while_loop_runs_exactly_three_iterations() {
    let source = program(
        "X int; C bool;",
        "X as 3;\nC as true;\nwhile C do [X as X min 1; if X EQ 0 then C as false]",
    );
    let execution = run_ok(&source);
    assert_eq!(env_number(&execution, "X"), 0.0);
    assert!(!env_bool(&execution, "C"));
}

#[test]
fn arithmetic_associates_to_the_right_without_precedence() {
    // A mult B plus C is A * (B + C), not (A * B) + C.
    let source = program(
        "A int; B int; C int; X int;",
        "A as 2; B as 3; C as 4;\nX as A mult B plus C",
    );
    let execution = run_ok(&source);
    assert_eq!(env_number(&execution, "X"), 14.0);
}

#[test]
fn for_body_may_advance_its_own_counter() {
    // The increment applies to the value the body left behind, so a
    // body that bumps the counter itself gives the loop stride 2.
    let source = program("X int;", "for X as 1 to 5 do [X as X plus 1; write(X)]");
    let execution = run_ok(&source);

    let written: Vec<String> = execution.output.iter().map(|v| v.to_string()).collect();
    assert_eq!(written, vec!["2", "4", "6"]);
    assert_eq!(env_number(&execution, "X"), 7.0);
}

#[test]
fn for_limit_is_reevaluated_each_iteration() {
    let source = program(
        "X int; N int;",
        "N as 3;\nfor X as 1 to N do [write(X); N as N min 1]",
    );
    let execution = run_ok(&source);

    let written: Vec<String> = execution.output.iter().map(|v| v.to_string()).collect();
    assert_eq!(written, vec!["1", "2"]);
    assert_eq!(env_number(&execution, "X"), 3.0);
    assert_eq!(env_number(&execution, "N"), 1.0);
}

#[test]
fn division_by_zero_is_a_runtime_error() {
    let source = program("A int; B int;", "A as 5;\nwrite(A div B)");
    let error = hard_error_of(&source);
    assert_eq!(error.kind, ErrorKind::RuntimeError);
    assert!(error.message.contains("Division by zero"));
}

#[test]
fn writes_before_a_runtime_abort_remain_observable() {
    let source = program("A int; B int;", "A as 5;\nwrite(A);\nwrite(A div B)");
    let tokens = Lexer::new(source).scan_tokens().unwrap();
    let (prog, symbols) = Parser::new(tokens).parse().unwrap();
    assert!(SemanticAnalyzer::new(&symbols).analyze(&prog).is_empty());

    let mut interpreter = modl::Interpreter::new(&symbols);
    let result = interpreter.run(&prog);
    assert!(result.is_err());
    assert_eq!(interpreter.output().len(), 1);
    assert_eq!(interpreter.output()[0].to_string(), "5");
}

#[test]
fn bare_numeric_if_condition_fails_at_runtime() {
    // Statically unchecked (it is not a comparison), rejected when the
    // condition evaluates to a number.
    let source = program("A int; X int;", "if A then X as 1");
    let error = hard_error_of(&source);
    assert_eq!(error.kind, ErrorKind::RuntimeError);
    assert!(error.message.contains("Condition must be a boolean"));
}

#[test]
fn leading_dot_literal_evaluates_as_fraction() {
    let source = program("B float;", "B as .5");
    let execution = run_ok(&source);
    assert_eq!(env_number(&execution, "B"), 0.5);
}

#[test]
fn fractional_values_display_with_their_fraction() {
    let source = program("B float;", "B as 1.5;\nwrite(B)");
    let execution = run_ok(&source);
    assert_eq!(execution.output[0].to_string(), "1.5");
}

#[test]
fn full_sample_program_runs_end_to_end() {
    let source = "\
program var
    A int;
    B float;
    C bool;
    X int;
begin
    A as 5;
    B as 3.14;
    C as true;
    {test comment}
    if A GT 3 then
        X as A mult 2
    else
        X as A div 2;

    [B as B plus 10.5;
    C as false];

    for X as 1 to 5 do
        write(X);

    while C do
        [X as X min 1;
        if X EQ 0 then
            C as false]
end.";

    let execution = run_ok(source);
    let written: Vec<String> = execution.output.iter().map(|v| v.to_string()).collect();
    assert_eq!(written, vec!["1", "2", "3", "4", "5"]);

    assert_eq!(env_number(&execution, "A"), 5.0);
    assert_eq!(env_number(&execution, "B"), 3.14 + 10.5);
    assert!(!env_bool(&execution, "C"));
    assert_eq!(env_number(&execution, "X"), 6.0);

    // Snapshot iterates in declaration order.
    let names: Vec<&str> = execution.environment.iter().map(|(n, _)| n).collect();
    assert_eq!(names, vec!["A", "B", "C", "X"]);
}
