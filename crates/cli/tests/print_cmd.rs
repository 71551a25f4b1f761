//! CLI tests for `labelgen print`.

mod common;

use std::fs;
use std::io::Read;
use std::net::TcpListener;
use std::thread;
use std::time::Duration;

use common::*;

#[test]
fn dry_run_prints_the_job() {
    let (_dir, job) = write_temp("job.json", STANDARD_JOB);
    let output = labelgen()
        .args(["print", job.to_str().unwrap(), "--dry-run"])
        .output()
        .unwrap();

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let zpl = stdout(&output);
    assert!(zpl.starts_with("^XA"));
    assert!(zpl.contains("^BQN,2,7"));
}

#[test]
fn print_to_file_matches_dry_run() {
    let (dir, job) = write_temp("job.json", STANDARD_JOB);
    let spool = dir.path().join("lp0");

    let dry = labelgen()
        .args(["print", job.to_str().unwrap(), "--dry-run"])
        .output()
        .unwrap();
    let sent = labelgen()
        .args(["print", job.to_str().unwrap(), "--file"])
        .arg(&spool)
        .output()
        .unwrap();

    assert!(sent.status.success(), "stderr: {}", stderr(&sent));
    assert!(stderr(&sent).contains("sent"), "{}", stderr(&sent));
    let written = fs::read_to_string(&spool).unwrap();
    assert_eq!(format!("{written}\n"), stdout(&dry));
}

#[test]
fn warnings_do_not_block_printing() {
    let job = STANDARD_JOB.replace("\"qr_size_mm\": 25.0", "\"qr_size_mm\": 300.0");
    let (dir, job) = write_temp("job.json", &job);
    let spool = dir.path().join("lp0");
    let output = labelgen()
        .args(["print", job.to_str().unwrap(), "--file"])
        .arg(&spool)
        .output()
        .unwrap();

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stderr(&output).contains("LBL1003"), "{}", stderr(&output));
    assert!(fs::read_to_string(&spool).unwrap().contains("^BQN,2,10"));
}

#[test]
fn append_keeps_earlier_jobs() {
    let (dir, job) = write_temp("job.json", STANDARD_JOB);
    let spool = dir.path().join("spool.zpl");
    for _ in 0..2 {
        let output = labelgen()
            .args(["print", job.to_str().unwrap(), "--append", "--file"])
            .arg(&spool)
            .output()
            .unwrap();
        assert!(output.status.success(), "stderr: {}", stderr(&output));
    }
    let written = fs::read_to_string(&spool).unwrap();
    assert_eq!(written.matches("^XA").count(), 2);
}

#[test]
fn copies_reach_the_print_quantity() {
    let job = STANDARD_JOB.replace(r#""qr_size_mm": 25.0"#, r#""qr_size_mm": 25.0, "copies": 3"#);
    let (_dir, job) = write_temp("job.json", &job);
    let output = labelgen()
        .args(["print", job.to_str().unwrap(), "--dry-run"])
        .output()
        .unwrap();
    assert!(stdout(&output).contains("^PQ3\n^XZ"));
}

#[test]
fn print_over_tcp() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let server = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        stream
            .set_read_timeout(Some(Duration::from_secs(10)))
            .unwrap();
        let mut received = String::new();
        let _ = stream.read_to_string(&mut received);
        received
    });

    let (_dir, job) = write_temp("job.json", STANDARD_JOB);
    let output = labelgen()
        .args(["print", job.to_str().unwrap(), "--printer", &addr.to_string()])
        .args(["--output", "json"])
        .output()
        .unwrap();

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let v: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(v["ok"], true);
    assert_eq!(v["destination"], format!("tcp://{addr}"));

    let received = server.join().unwrap();
    assert!(received.starts_with("^XA\n^CI28\n"));
    assert!(received.ends_with("^XZ"));
    assert_eq!(v["bytes"], received.len());
}

#[test]
fn unreachable_printer_fails() {
    // Bind then drop to get a port nothing listens on.
    let addr = TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();
    let (_dir, job) = write_temp("job.json", STANDARD_JOB);
    let output = labelgen()
        .args(["print", job.to_str().unwrap(), "--printer", &addr.to_string()])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("cannot reach printer"), "{}", stderr(&output));
}

#[test]
fn destination_is_required() {
    let (_dir, job) = write_temp("job.json", STANDARD_JOB);
    let output = labelgen()
        .args(["print", job.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(!output.status.success());
}

#[test]
fn printer_and_file_conflict() {
    let (dir, job) = write_temp("job.json", STANDARD_JOB);
    let output = labelgen()
        .args(["print", job.to_str().unwrap(), "--printer", "127.0.0.1", "--file"])
        .arg(dir.path().join("lp0"))
        .output()
        .unwrap();
    assert!(!output.status.success());
}
