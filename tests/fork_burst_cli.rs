use assert_cmd::prelude::*;
use predicates::prelude::*;
use serial_test::serial;
use std::collections::BTreeMap;
use std::process::Command;

fn fork_burst() -> Command {
    let mut cmd = Command::cargo_bin("fork-burst").expect("binary built");
    cmd.env("RUST_LOG", "off");
    cmd
}

/// Make every fork in the spawned process fail with EAGAIN.
///
/// RLIMIT_NPROC is not enforced for root, so a root runner first drops to
/// nobody/nogroup.
fn without_process_quota(cmd: &mut Command) {
    use nix::sys::resource::{setrlimit, Resource};
    use nix::unistd::{setgid, setuid, Gid, Uid};
    use std::os::unix::process::CommandExt;

    let drop_privileges = Uid::effective().is_root();
    unsafe {
        cmd.pre_exec(move || {
            if drop_privileges {
                setgid(Gid::from_raw(65534))?;
                setuid(Uid::from_raw(65534))?;
            }
            setrlimit(Resource::RLIMIT_NPROC, 0, 0)?;
            Ok(())
        });
    }
}

fn countdown_histogram(stdout: &[u8]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for line in String::from_utf8_lossy(stdout).lines() {
        *counts.entry(line.to_string()).or_insert(0) += 1;
    }
    counts
}

#[test]
#[serial]
fn every_lineage_prints_its_part_of_the_countdown() {
    let output = fork_burst().output().expect("run fork-burst");

    assert!(output.status.success());
    let counts = countdown_histogram(&output.stdout);
    let expected: BTreeMap<String, usize> = [("2", 1), ("1", 2), ("0", 4)]
        .into_iter()
        .map(|(value, n)| (value.to_string(), n))
        .collect();
    assert_eq!(counts, expected);
}

#[test]
#[serial]
fn burst_ends_with_eight_processes() {
    let output = fork_burst()
        .args(["--log-level", "debug"])
        .output()
        .expect("run fork-burst");

    assert!(output.status.success());
    // Only the original's status is visible here; every instance logs the
    // code it is about to exit with.
    let stderr = String::from_utf8_lossy(&output.stderr);
    let exiting: Vec<&str> = stderr
        .lines()
        .filter(|line| line.contains("burst process exiting"))
        .collect();
    assert_eq!(exiting.len(), 8, "stderr was:\n{}", stderr);
    assert!(
        exiting.iter().all(|line| line.contains("code=0")),
        "stderr was:\n{}",
        stderr
    );
}

#[test]
#[serial]
fn single_iteration_prints_zero_once() {
    fork_burst()
        .args(["--iterations", "1"])
        .assert()
        .success()
        .stdout("0\n");
}

#[test]
fn zero_iterations_prints_nothing() {
    fork_burst()
        .args(["--iterations", "0"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn oversized_burst_is_refused_before_forking() {
    fork_burst()
        .args(["--iterations", "17"])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("iterations must be at most 16"));
}

#[test]
#[serial]
fn fork_failure_exits_one_with_error_on_stderr() {
    let mut cmd = fork_burst();
    without_process_quota(&mut cmd);

    cmd.assert()
        .code(1)
        .stdout("2\n")
        .stderr(predicate::str::contains("Resource temporarily unavailable"));
}
