// The first `,` in the source reads exactly one line before execution starts;
// at run time `,` consumes that line one character at a time.
mod common;

use common::cargo_bin;
use predicates::prelude::*;
use std::time::Duration;

#[test]
fn reads_from_stdin_and_echoes_char() {
    cargo_bin()
        .args(["run", ",."])
        .write_stdin("A\n")
        .assert()
        .success()
        .stdout("Atape: (65)\n");
}

#[test]
fn empty_stdin_leaves_cell_unchanged() {
    cargo_bin()
        .args(["run", ",."])
        .write_stdin("")
        .assert()
        .success()
        .stdout("\0tape: (0)\n");
}

#[test]
fn only_one_line_is_ever_available() {
    // Four reads over "ab\ncd\n": 'a', 'b', '\n', then nothing left.
    cargo_bin()
        .args(["run", ",>,>,>+++,"])
        .write_stdin("ab\ncd\n")
        .assert()
        .success()
        .stdout("tape: (97,98,10,3)\n");
}

#[test]
fn high_code_points_are_reduced_modulo_256() {
    // U+0141 is 321; 321 % 256 = 65
    cargo_bin()
        .args(["run", ","])
        .write_stdin("\u{141}\n")
        .assert()
        .success()
        .stdout("tape: (65)\n");
}

#[test]
fn echo_until_eof_stalls_instead_of_terminating() {
    cargo_bin()
        .timeout(Duration::from_secs(5))
        .args(["run", "--max-steps", "100", ",[.,]"])
        .write_stdin("hi\n")
        .assert()
        .code(1)
        .stdout(predicate::str::starts_with("hi\n\n").and(predicate::str::contains("tape:").not()))
        .stderr(predicate::str::contains("step limit exceeded (100)"));
}
