use std::io::Write;

/// `bf` with settings isolated from the host: no config file, no env limits.
pub fn cargo_bin() -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::cargo_bin("bf").expect("bf binary");
    cmd.env("BF_CONFIG", "/nonexistent/bf.toml")
        .env_remove("BF_MAX_STEPS")
        .env_remove("BF_TIMEOUT_MS")
        .env_remove("BF_LOG")
        .env("BF_COLOR", "0");
    cmd
}

#[allow(dead_code)]
pub fn write_tempfile(content: &str) -> tempfile::NamedTempFile {
    let mut tf = tempfile::NamedTempFile::new().expect("tempfile");
    write!(tf, "{}", content).unwrap();
    tf
}
