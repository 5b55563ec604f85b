// tests/supervisor_fake_executor.rs

use procwarden_test_utils::builders::StartRequestBuilder;
use procwarden_test_utils::fake_executor::{FakeBehaviour, FakeExecutor};
use procwarden_test_utils::{init_tracing, with_timeout};

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tempfile::TempDir;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use procwarden::allowlist::PathAllowlist;
use procwarden::engine::{
    LaunchSpec, Supervisor, SupervisorEvent, SupervisorHandle, EVENT_CHANNEL_CAPACITY,
};
use procwarden::errors::{ProcwardenError, Result};
use procwarden::registry::ProcessId;

struct TestRig {
    handle: SupervisorHandle,
    launched: Arc<Mutex<Vec<LaunchSpec>>>,
    task: JoinHandle<Result<()>>,
    root: PathBuf,
    _tempdir: TempDir,
}

/// Wire a supervisor to a fake executor rooted in a fresh tempdir.
fn spawn_with_fake(behaviour: FakeBehaviour) -> TestRig {
    init_tracing();

    let tempdir = TempDir::new().expect("create tempdir");
    let root = tempdir.path().canonicalize().expect("canonicalize tempdir");
    let allowlist = PathAllowlist::new([root.clone()]);

    let (tx, rx) = mpsc::channel::<SupervisorEvent>(EVENT_CHANNEL_CAPACITY);
    let launched = Arc::new(Mutex::new(Vec::new()));
    let executor = FakeExecutor::new(tx.clone(), Arc::clone(&launched), behaviour);

    let supervisor = Supervisor::new(allowlist, 60, rx, executor);
    let task = tokio::spawn(supervisor.run());

    TestRig {
        handle: SupervisorHandle::new(tx),
        launched,
        task,
        root,
        _tempdir: tempdir,
    }
}

#[tokio::test]
async fn start_returns_id_and_an_immediately_readable_record() {
    let rig = spawn_with_fake(FakeBehaviour::StayRunning);

    let id = with_timeout(rig.handle.start(
        StartRequestBuilder::new("echo hello")
            .working_dir(&rig.root)
            .build(),
    ))
    .await
    .expect("start must succeed");

    let snap = with_timeout(rig.handle.read(id, false))
        .await
        .expect("read must succeed");

    assert!(snap.running);
    assert_eq!(snap.command, "echo hello");
    assert_eq!(snap.working_dir, rig.root);
    assert!(snap.stdout.is_empty());
    assert!(snap.stderr.is_empty());
}

#[tokio::test]
async fn command_splitting_and_default_timeout_reach_the_executor() {
    let rig = spawn_with_fake(FakeBehaviour::StayRunning);

    with_timeout(rig.handle.start(
        StartRequestBuilder::new("seq  1   10")
            .working_dir(&rig.root)
            .build(),
    ))
    .await
    .expect("start must succeed");

    let launched = rig.launched.lock().unwrap();
    assert_eq!(launched.len(), 1);
    assert_eq!(launched[0].program, "seq");
    assert_eq!(launched[0].args, vec!["1".to_string(), "10".to_string()]);
    assert_eq!(launched[0].timeout, Duration::from_secs(60));
}

#[tokio::test]
async fn explicit_timeout_overrides_the_default() {
    let rig = spawn_with_fake(FakeBehaviour::StayRunning);

    with_timeout(rig.handle.start(
        StartRequestBuilder::new("sleep 30")
            .working_dir(&rig.root)
            .timeout_secs(5)
            .build(),
    ))
    .await
    .expect("start must succeed");

    let launched = rig.launched.lock().unwrap();
    assert_eq!(launched[0].timeout, Duration::from_secs(5));
}

#[tokio::test]
async fn disallowed_working_dir_launches_nothing() {
    let rig = spawn_with_fake(FakeBehaviour::StayRunning);
    let outside = TempDir::new().expect("create tempdir");

    let err = with_timeout(rig.handle.start(
        StartRequestBuilder::new("echo hello")
            .working_dir(outside.path())
            .build(),
    ))
    .await
    .expect_err("outside dir must be rejected");

    assert!(matches!(
        err,
        ProcwardenError::DirectoryNotAllowed { .. }
    ));
    assert!(rig.launched.lock().unwrap().is_empty());
}

#[tokio::test]
async fn empty_command_fails_before_launch() {
    let rig = spawn_with_fake(FakeBehaviour::StayRunning);

    for command in ["", "   \t  "] {
        let err = with_timeout(rig.handle.start(
            StartRequestBuilder::new(command)
                .working_dir(&rig.root)
                .build(),
        ))
        .await
        .expect_err("empty command must fail");
        assert!(matches!(err, ProcwardenError::Launch(_)));
    }

    assert!(rig.launched.lock().unwrap().is_empty());
}

#[tokio::test]
async fn launch_failure_leaves_no_record() {
    let rig = spawn_with_fake(FakeBehaviour::FailLaunch {
        message: "no such executable".to_string(),
    });

    let err = with_timeout(rig.handle.start(
        StartRequestBuilder::new("ghost-binary")
            .working_dir(&rig.root)
            .build(),
    ))
    .await
    .expect_err("launch failure must surface");

    assert!(matches!(err, ProcwardenError::Launch(_)));

    // Any id we invent afterwards is unknown: nothing was registered.
    let read_err = with_timeout(rig.handle.read(ProcessId::new(), false))
        .await
        .expect_err("nothing must be registered");
    assert!(matches!(read_err, ProcwardenError::ProcessNotFound(_)));
}

#[tokio::test]
async fn completed_process_reports_accumulated_output() {
    let rig = spawn_with_fake(FakeBehaviour::CompleteImmediately {
        stdout: vec!["hello ".to_string(), "world\n".to_string()],
        stderr: vec!["note\n".to_string()],
    });

    let id = with_timeout(rig.handle.start(
        StartRequestBuilder::new("echo hello world")
            .working_dir(&rig.root)
            .build(),
    ))
    .await
    .expect("start must succeed");

    // The fake's chunks and exit were enqueued before this read.
    let snap = with_timeout(rig.handle.read(id, false))
        .await
        .expect("read must succeed");

    assert!(!snap.running);
    assert_eq!(snap.stdout, "hello world\n");
    assert_eq!(snap.stderr, "note\n");
}

#[tokio::test]
async fn clear_on_completed_process_evicts_after_the_snapshot() {
    let rig = spawn_with_fake(FakeBehaviour::CompleteImmediately {
        stdout: vec!["done\n".to_string()],
        stderr: vec![],
    });

    let id = with_timeout(rig.handle.start(
        StartRequestBuilder::new("echo done")
            .working_dir(&rig.root)
            .build(),
    ))
    .await
    .expect("start must succeed");

    let final_snap = with_timeout(rig.handle.read(id, true))
        .await
        .expect("clearing read must succeed");
    assert!(!final_snap.running);
    assert_eq!(final_snap.stdout, "done\n");

    let err = with_timeout(rig.handle.read(id, false))
        .await
        .expect_err("record must be gone after clear");
    assert!(matches!(err, ProcwardenError::ProcessNotFound(_)));
}

#[tokio::test]
async fn clear_on_running_process_is_ignored() {
    let rig = spawn_with_fake(FakeBehaviour::StayRunning);

    let id = with_timeout(rig.handle.start(
        StartRequestBuilder::new("sleep 30")
            .working_dir(&rig.root)
            .build(),
    ))
    .await
    .expect("start must succeed");

    let snap = with_timeout(rig.handle.read(id, true))
        .await
        .expect("clearing read must succeed");
    assert!(snap.running);

    // Still retrievable: the eviction was a no-op.
    let again = with_timeout(rig.handle.read(id, false))
        .await
        .expect("record must still exist");
    assert!(again.running);
}

#[tokio::test]
async fn unknown_id_reports_not_found() {
    let rig = spawn_with_fake(FakeBehaviour::StayRunning);

    let err = with_timeout(rig.handle.read(ProcessId::new(), false))
        .await
        .expect_err("unknown id must fail");
    assert!(matches!(err, ProcwardenError::ProcessNotFound(_)));
}

#[tokio::test]
async fn elapsed_grows_across_reads_of_a_running_process() {
    let rig = spawn_with_fake(FakeBehaviour::StayRunning);

    let id = with_timeout(rig.handle.start(
        StartRequestBuilder::new("sleep 30")
            .working_dir(&rig.root)
            .build(),
    ))
    .await
    .expect("start must succeed");

    let first = with_timeout(rig.handle.read(id, false))
        .await
        .expect("read must succeed");
    tokio::time::sleep(Duration::from_millis(30)).await;
    let second = with_timeout(rig.handle.read(id, false))
        .await
        .expect("read must succeed");

    assert!(second.elapsed_secs > first.elapsed_secs);
}

#[tokio::test]
async fn independent_supervisors_do_not_share_records() {
    let rig_a = spawn_with_fake(FakeBehaviour::StayRunning);
    let rig_b = spawn_with_fake(FakeBehaviour::StayRunning);

    let id = with_timeout(rig_a.handle.start(
        StartRequestBuilder::new("sleep 30")
            .working_dir(&rig_a.root)
            .build(),
    ))
    .await
    .expect("start must succeed");

    let err = with_timeout(rig_b.handle.read(id, false))
        .await
        .expect_err("other instance must not know the id");
    assert!(matches!(err, ProcwardenError::ProcessNotFound(_)));
}

#[tokio::test]
async fn shutdown_stops_the_loop_and_later_requests_fail() {
    let rig = spawn_with_fake(FakeBehaviour::StayRunning);

    rig.handle.shutdown().await;
    with_timeout(rig.task)
        .await
        .expect("supervisor task must join")
        .expect("supervisor must exit cleanly");

    let err = with_timeout(rig.handle.start(
        StartRequestBuilder::new("echo late")
            .working_dir(&rig.root)
            .build(),
    ))
    .await
    .expect_err("requests after shutdown must fail");
    assert!(matches!(err, ProcwardenError::Other(_)));
}
