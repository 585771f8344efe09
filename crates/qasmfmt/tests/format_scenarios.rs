//! End-to-end formatting behavior through the public API.

use qasmfmt::{FormatConfig, FormatError, check, format, format_with_config};

#[test]
fn test_concatenated_statements_are_split() {
    let output = format("OPENQASM 3.0;qubit[2]q;hq[0];").unwrap();
    assert_eq!(output, "OPENQASM 3.0;\nqubit[2] q;\nh q[0];\n");
}

#[test]
fn test_spacing_repairs() {
    let input = "OPENQASM 3.0;include\"stdgates.qasm\";qubit[2]q;bit[2]c;hq[0];cxq[0],q[1];measureq->c;";
    let expected = "OPENQASM 3.0;\ninclude \"stdgates.qasm\";\n\nqubit[2] q;\nbit[2] c;\nh q[0];\ncx q[0], q[1];\nmeasure q -> c;\n";
    assert_eq!(format(input).unwrap(), expected);
}

#[test]
fn test_trailing_newline_is_added() {
    assert_eq!(
        format("OPENQASM 3.0;\nqubit q;").unwrap(),
        "OPENQASM 3.0;\nqubit q;\n"
    );
}

#[test]
fn test_formatted_input_is_a_fixed_point() {
    let formatted = format("OPENQASM 3.0;\nqubit q;\nh q;").unwrap();
    assert_eq!(formatted, "OPENQASM 3.0;\nqubit q;\nh q;\n");
    assert_eq!(format(&formatted).unwrap(), formatted);
    assert!(check(&formatted, &FormatConfig::default()).unwrap());
}

#[test]
fn test_empty_and_whitespace_input_pass_through() {
    assert_eq!(format("").unwrap(), "");
    let blank = "   \n\t\n   ";
    assert_eq!(format(blank).unwrap(), blank);
    assert!(check(blank, &FormatConfig::default()).unwrap());
}

#[test]
fn test_comments_stay_on_their_lines() {
    let input = "// init\nOPENQASM 3.0;\nqubit q; // main\n";
    assert_eq!(format(input).unwrap(), input);
}

#[test]
fn test_comment_after_concatenated_statement() {
    let output = format("qubit q;h q; // hadamard\nx q;").unwrap();
    assert_eq!(output, "qubit q;\nh q; // hadamard\nx q;\n");
}

#[test]
fn test_operator_spacing_in_conditions() {
    let output = format("bit c;\nif(c==1){x q;}").unwrap();
    assert_eq!(output, "bit c;\nif (c == 1) {\n  x q;\n}\n");
}

#[test]
fn test_compound_operators_are_not_split() {
    let output = format("while (a>=b) { a -= 1; }").unwrap();
    assert_eq!(output, "while (a >= b) {\n  a -= 1;\n}\n");
}

#[test]
fn test_spaced_numeric_literals() {
    let input = "OPENQASM 3.0;\nint x = 1 + 2;\nx = 2 * x;\nqubit[ 2 ] q;\nrx(0.5 , 2) q;\nreturn 1 + a;\n";
    let expected =
        "OPENQASM 3.0;\nint x = 1+2;\nx = 2*x;\nqubit[2] q;\nrx(0.5, 2) q;\nreturn 1 + a;\n";
    let output = format(input).unwrap();
    assert_eq!(output, expected);
    assert_eq!(format(&output).unwrap(), output);
}

#[test]
fn test_spaced_ranges_and_conditions() {
    assert_eq!(
        format("for i in [0 : 3] { x q[i]; }").unwrap(),
        "for i in [0:3] {\n  x q[i];\n}\n"
    );
    assert_eq!(
        format("if (c == 1 ) x q;").unwrap(),
        "if (c == 1) {\n  x q;\n}\n"
    );
    assert!(check("return 1 + a;\n", &FormatConfig::default()).unwrap());
}

#[test]
fn test_double_minus_stays_apart() {
    let output = format("x = a - -b;").unwrap();
    assert_eq!(output, "x = a- -b;\n");
    assert_eq!(format(&output).unwrap(), output);
}

#[test]
fn test_nested_bodies_use_configured_indent() {
    let config = FormatConfig::new(4, true);
    let output = format_with_config("for i in [0:1] { if (i == 0) { h q; } }", &config).unwrap();
    assert_eq!(
        output,
        "for i in [0:1] {\n    if (i == 0) {\n        h q;\n    }\n}\n"
    );
}

#[test]
fn test_zero_indent() {
    let config = FormatConfig::new(0, true);
    let output = format_with_config("gate g a { h a; }", &config).unwrap();
    assert_eq!(output, "gate g a {\nh a;\n}\n");
}

#[test]
fn test_without_trailing_newline() {
    let config = FormatConfig::default().with_trailing_newline(false);
    let output = format_with_config("qubit q;\n\n\nh q;\n", &config).unwrap();
    assert_eq!(output, "qubit q;\nh q;");
    assert!(check(&output, &config).unwrap());
    assert!(!check("qubit q;\nh q;\n", &config).unwrap());
}

#[test]
fn test_unrecognized_statements_are_kept() {
    let output = format("OPENQASM 2.0;\ncreg c[2];\nlet r=q[0:1];").unwrap();
    assert_eq!(output, "OPENQASM 2.0;\ncreg c[2];\nlet r = q[0:1];\n");
}

#[test]
fn test_malformed_input_is_a_parse_failure() {
    let err = format("malformed qasm").unwrap_err();
    assert!(matches!(err, FormatError::ParseFailure(_)));
    assert!(err.to_string().starts_with("failed to parse QASM"));
}

#[test]
fn test_unbalanced_brace_is_a_parse_failure() {
    assert!(format("qubit q;\n}").is_err());
    assert!(format("gate g a { h a;").is_err());
}

#[test]
fn test_check_reports_unformatted_input() {
    let config = FormatConfig::default();
    assert!(!check("qubit   q;", &config).unwrap());
    assert!(check("qubit q;\n", &config).unwrap());
    assert!(check("malformed qasm", &config).is_err());
}
