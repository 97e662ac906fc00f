// Ctrl+C must end a run with status 130, even while the program is stalled.
#![cfg(unix)]

use assert_cmd::prelude::*;
use std::io::Read;
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

fn spawn_bf(args: &[&str]) -> Child {
    Command::cargo_bin("bf")
        .unwrap()
        .args(args)
        .env("BF_CONFIG", "/nonexistent/bf.toml")
        .env_remove("BF_MAX_STEPS")
        .env_remove("BF_TIMEOUT_MS")
        .env("BF_COLOR", "0")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .unwrap()
}

fn send_sigint(child: &Child) {
    let status = Command::new("kill")
        .args(["-INT", &child.id().to_string()])
        .status()
        .expect("kill");
    assert!(status.success());
}

fn wait_with_deadline(child: &mut Child, deadline: Duration) -> Option<i32> {
    let start = Instant::now();
    loop {
        if let Some(status) = child.try_wait().unwrap() {
            return status.code();
        }
        if start.elapsed() > deadline {
            let _ = child.kill();
            let _ = child.wait();
            panic!("bf still running {deadline:?} after SIGINT");
        }
        thread::sleep(Duration::from_millis(20));
    }
}

#[test]
fn sigint_during_infinite_loop_exits_130() {
    let mut child = spawn_bf(&["run", "+[]"]);
    thread::sleep(Duration::from_millis(500));

    send_sigint(&child);
    assert_eq!(wait_with_deadline(&mut child, Duration::from_secs(5)), Some(130));
}

#[test]
fn sigint_while_stalled_on_exhausted_input_exits_130() {
    let mut child = spawn_bf(&["run", ",[.,]"]);
    {
        use std::io::Write;
        let mut stdin = child.stdin.take().unwrap();
        stdin.write_all(b"hi\n").unwrap();
    }

    // Seeing output means the handler is installed and the program is running.
    let mut stdout = child.stdout.take().unwrap();
    let mut first = [0u8; 2];
    stdout.read_exact(&mut first).unwrap();
    assert_eq!(&first, b"hi");

    // Keep draining so the endless '\n' echo never blocks on a full pipe.
    let drain = thread::spawn(move || {
        let mut sink = Vec::new();
        let _ = stdout.read_to_end(&mut sink);
    });

    send_sigint(&child);
    assert_eq!(wait_with_deadline(&mut child, Duration::from_secs(5)), Some(130));
    drain.join().unwrap();
}

#[test]
fn sigint_with_timeout_worker_exits_130() {
    let mut child = spawn_bf(&["run", "--timeout", "60000", "+[]"]);
    thread::sleep(Duration::from_millis(500));

    send_sigint(&child);
    assert_eq!(wait_with_deadline(&mut child, Duration::from_secs(5)), Some(130));
}
