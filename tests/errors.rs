mod common;

use common::cargo_bin;
use predicates::prelude::*;

#[test]
fn stray_close_bracket_reports_position() {
    cargo_bin()
        .args(["run", "]"])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("bf: mismatched brackets at character 1"));
}

#[test]
fn position_counts_comments() {
    cargo_bin()
        .args(["run", "ab[]]"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("mismatched brackets at character 5"));
}

#[test]
fn caret_points_at_offending_bracket() {
    cargo_bin()
        .args(["run", "+]"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("  +]\n   ^\n"));
}

#[test]
fn unclosed_bracket_is_unexpected_eof() {
    cargo_bin()
        .args(["run", "["])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("bf: unexpected end of file"));
}

#[test]
fn compile_errors_happen_before_any_output() {
    cargo_bin()
        .args(["run", "+.+.]"])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty());
}

#[test]
fn moving_left_of_first_cell_is_fatal() {
    cargo_bin()
        .args(["run", "+.<+."])
        .assert()
        .code(1)
        // Output produced before the fault stays; no tape dump follows.
        .stdout("\u{1}")
        .stderr(predicate::str::contains("bf: negative index"));
}
