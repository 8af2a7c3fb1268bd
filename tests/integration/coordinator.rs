use jarlaunch::core::{LauncherError, Result};
use jarlaunch::process::{LaunchedProcess, Launcher};
use jarlaunch::test_utils::{
    FakeInstaller, FakeLauncher, FakeReleaseSource, TestEnvironment, init_test_logging, release,
    wait_until, wait_until_settled,
};
use jarlaunch::update::verification::Sha256Hasher;
use jarlaunch::update::{UpdateCoordinator, UpdateState};
use std::future::Future;
use std::time::Duration;

#[tokio::test]
async fn test_offline_with_cached_client() {
    init_test_logging(None);
    let env = TestEnvironment::new();
    env.install("v1.0.0", b"cached").await;

    let (_coordinator, mut updates) = UpdateCoordinator::spawn(env.services(
        FakeReleaseSource::offline(),
        FakeInstaller::succeeding(env.paths(), Vec::new()),
        FakeLauncher::succeeding(),
    ));

    let view = wait_until_settled(&mut updates).await;
    assert_eq!(view.state, UpdateState::OfflineReady);
    assert_eq!(view.action_label, "Launch Offline");
    assert_eq!(view.version_line(), "Local: v1.0.0 | Remote: unknown");
}

#[tokio::test]
async fn test_offline_without_client_is_blocked_until_retry_succeeds() {
    let env = TestEnvironment::new();
    let releases = FakeReleaseSource::offline();

    let (coordinator, mut updates) = UpdateCoordinator::spawn(env.services(
        releases.clone(),
        FakeInstaller::succeeding(env.paths(), Vec::new()),
        FakeLauncher::succeeding(),
    ));

    let view = wait_until_settled(&mut updates).await;
    assert_eq!(view.state, UpdateState::Blocked);
    assert_eq!(view.action_label, "Retry");

    releases.set(Some(release("v1.0.0")));
    coordinator.primary_action();
    assert_eq!(coordinator.current().state, UpdateState::Checking);

    let view = wait_until_settled(&mut updates).await;
    assert_eq!(view.state, UpdateState::NeedsUpdate);
    assert_eq!(view.action_label, "Download v1.0.0");
    assert_eq!(releases.calls(), 2);
}

#[tokio::test]
async fn test_download_then_launch() {
    let env = TestEnvironment::new();
    let installer = FakeInstaller::succeeding(env.paths(), b"new client".to_vec());
    let launcher = FakeLauncher::succeeding();

    let (coordinator, mut updates) = UpdateCoordinator::spawn(env.services(
        FakeReleaseSource::with_release(release("v2.0.0")),
        installer.clone(),
        launcher.clone(),
    ));
    assert_eq!(wait_until_settled(&mut updates).await.state, UpdateState::NeedsUpdate);

    coordinator.primary_action();
    let view = wait_until_settled(&mut updates).await;
    assert_eq!(view.state, UpdateState::ReadyToLaunch);
    assert_eq!(view.message, "Updated to v2.0.0.");
    assert_eq!(view.version_line(), "Local: v2.0.0 | Remote: v2.0.0");

    let metadata = env.store().read().await.unwrap();
    assert_eq!(metadata.version, "v2.0.0");
    assert_eq!(metadata.sha256, Sha256Hasher::digest_bytes(b"new client"));
    assert_eq!(metadata.asset_size, 10);

    coordinator.primary_action();
    assert_eq!(coordinator.current().state, UpdateState::Launching);
    let view = wait_until_settled(&mut updates).await;
    assert_eq!(view.state, UpdateState::ReadyToLaunch);
    assert_eq!(view.message, "Client launched. Use this window for updates.");
    assert_eq!(installer.calls(), 1);
    assert_eq!(launcher.calls(), 1);
}

#[tokio::test]
async fn test_updating_is_published_before_work_and_ignores_actions() {
    let env = TestEnvironment::new();
    env.install("v1.0.0", b"old").await;
    let (installer, gate) = FakeInstaller::succeeding(env.paths(), b"new".to_vec()).gated();

    let (coordinator, mut updates) = UpdateCoordinator::spawn(env.services(
        FakeReleaseSource::with_release(release("v2.0.0")),
        installer.clone(),
        FakeLauncher::succeeding(),
    ));
    let view = wait_until_settled(&mut updates).await;
    assert_eq!(view.action_label, "Update to v2.0.0");

    coordinator.primary_action();
    let view = coordinator.current();
    assert_eq!(view.state, UpdateState::Updating);
    assert!(!view.action_enabled);
    assert_eq!(view.message, "Downloading v2.0.0…");

    coordinator.primary_action();
    coordinator.primary_action();

    gate.add_permits(1);
    let view = wait_until_settled(&mut updates).await;
    assert_eq!(view.state, UpdateState::ReadyToLaunch);
    assert_eq!(installer.calls(), 1);
}

#[tokio::test]
async fn test_refresh_is_ignored_while_download_runs() {
    let env = TestEnvironment::new();
    let releases = FakeReleaseSource::with_release(release("v2.0.0"));
    let (installer, gate) = FakeInstaller::succeeding(env.paths(), b"new".to_vec()).gated();

    let (coordinator, mut updates) = UpdateCoordinator::spawn(env.services(
        releases.clone(),
        installer,
        FakeLauncher::succeeding(),
    ));
    wait_until_settled(&mut updates).await;

    coordinator.primary_action();
    coordinator.refresh();
    assert_eq!(coordinator.current().state, UpdateState::Updating);
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(releases.calls(), 1);

    gate.add_permits(1);
    let view = wait_until_settled(&mut updates).await;
    assert_eq!(view.state, UpdateState::ReadyToLaunch);
    assert_eq!(view.message, "Updated to v2.0.0.");
    assert_eq!(releases.calls(), 1);

    coordinator.refresh();
    let view = wait_until(&mut updates, |view| {
        view.message == "Latest version v2.0.0 is ready."
    })
    .await;
    assert_eq!(view.state, UpdateState::ReadyToLaunch);
    assert_eq!(releases.calls(), 2);
}

#[tokio::test]
async fn test_refresh_cannot_unlock_a_second_launch() {
    let env = TestEnvironment::new();
    env.install("v1.0.0", b"client").await;
    let releases = FakeReleaseSource::with_release(release("v1.0.0"));
    let (launcher, gate) = FakeLauncher::succeeding().gated();

    let (coordinator, mut updates) = UpdateCoordinator::spawn(env.services(
        releases.clone(),
        FakeInstaller::succeeding(env.paths(), Vec::new()),
        launcher.clone(),
    ));
    assert_eq!(wait_until_settled(&mut updates).await.state, UpdateState::ReadyToLaunch);

    coordinator.primary_action();
    coordinator.refresh();
    coordinator.primary_action();

    let view = coordinator.current();
    assert_eq!(view.state, UpdateState::Launching);
    assert!(!view.action_enabled);

    gate.add_permits(1);
    let view = wait_until_settled(&mut updates).await;
    assert_eq!(view.state, UpdateState::ReadyToLaunch);
    assert_eq!(view.message, "Client launched. Use this window for updates.");
    assert_eq!(launcher.calls(), 1);
    assert_eq!(releases.calls(), 1);
}

#[tokio::test]
async fn test_download_failure_keeps_remote_version_and_retries_check() {
    let env = TestEnvironment::new();
    let releases = FakeReleaseSource::with_release(release("v2.0.0"));

    let (coordinator, mut updates) = UpdateCoordinator::spawn(env.services(
        releases.clone(),
        FakeInstaller::failing(env.paths(), "connection reset"),
        FakeLauncher::succeeding(),
    ));
    wait_until_settled(&mut updates).await;

    coordinator.primary_action();
    let view = wait_until_settled(&mut updates).await;
    assert_eq!(view.state, UpdateState::Error);
    assert_eq!(view.action_label, "Retry");
    assert!(view.message.starts_with("Download failed:"));
    assert!(view.message.contains("connection reset"));
    assert_eq!(view.remote_version, "v2.0.0");
    assert!(env.store().read().await.is_none());

    coordinator.primary_action();
    let view = wait_until_settled(&mut updates).await;
    assert_eq!(view.state, UpdateState::NeedsUpdate);
    assert_eq!(releases.calls(), 2);
}

#[tokio::test]
async fn test_launch_failure_is_reported() {
    let env = TestEnvironment::new();
    env.install("v1.0.0", b"client").await;

    let (coordinator, mut updates) = UpdateCoordinator::spawn(env.services(
        FakeReleaseSource::with_release(release("v1.0.0")),
        FakeInstaller::succeeding(env.paths(), Vec::new()),
        FakeLauncher::failing(),
    ));
    assert_eq!(wait_until_settled(&mut updates).await.state, UpdateState::ReadyToLaunch);

    coordinator.primary_action();
    let view = wait_until_settled(&mut updates).await;
    assert_eq!(view.state, UpdateState::Error);
    assert!(view.message.starts_with("Launch failed:"));
    assert!(view.message.contains("not found"));
    assert_eq!(view.version_line(), "Local: v1.0.0 | Remote: v1.0.0");
}

struct ExplodingLauncher;

fn explode() -> LauncherError {
    panic!("launcher exploded")
}

impl Launcher for ExplodingLauncher {
    fn launch(&self) -> impl Future<Output = Result<LaunchedProcess>> + Send {
        async { Err::<LaunchedProcess, _>(explode()) }
    }
}

#[tokio::test]
async fn test_panicking_task_becomes_error_state() {
    let env = TestEnvironment::new();
    env.install("v1.0.0", b"client").await;

    let (coordinator, mut updates) = UpdateCoordinator::spawn(env.services(
        FakeReleaseSource::offline(),
        FakeInstaller::succeeding(env.paths(), Vec::new()),
        ExplodingLauncher,
    ));
    assert_eq!(wait_until_settled(&mut updates).await.state, UpdateState::OfflineReady);

    coordinator.primary_action();
    let view = wait_until_settled(&mut updates).await;
    assert_eq!(view.state, UpdateState::Error);
    assert!(view.action_enabled);

    // The worker survives and keeps serving jobs.
    coordinator.primary_action();
    assert_eq!(wait_until_settled(&mut updates).await.state, UpdateState::OfflineReady);
}

#[tokio::test]
async fn test_artifact_without_record_offers_update() {
    let env = TestEnvironment::new();
    env.write_artifact(b"left over from an interrupted install");

    let (_coordinator, mut updates) = UpdateCoordinator::spawn(env.services(
        FakeReleaseSource::with_release(release("v3.0.0")),
        FakeInstaller::succeeding(env.paths(), Vec::new()),
        FakeLauncher::succeeding(),
    ));

    let view = wait_until_settled(&mut updates).await;
    assert_eq!(view.state, UpdateState::NeedsUpdate);
    assert_eq!(view.action_label, "Update to v3.0.0");
    assert_eq!(view.local_version, "cached");
}
