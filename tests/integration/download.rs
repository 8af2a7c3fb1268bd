use jarlaunch::core::LauncherError;
use jarlaunch::test_utils::{FakeLauncher, FakeReleaseSource, TestEnvironment, wait_until_settled};
use jarlaunch::update::verification::Sha256Hasher;
use jarlaunch::update::{ArtifactDownloader, ReleaseInfo, UpdateCoordinator, UpdateState, http_client};
use reqwest::Url;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CLIENT_BYTES: &[u8] = b"PK\x03\x04 pretend this is a jar";

fn release_at(server: &MockServer, route: &str, size: u64) -> ReleaseInfo {
    ReleaseInfo {
        tag: "v2.0.0".to_string(),
        download_url: Url::parse(&format!("{}{route}", server.uri())).unwrap(),
        asset_size: size,
        checksum_url: None,
    }
}

async fn serve_client(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/download/woodlanders-client.jar"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(CLIENT_BYTES))
        .mount(server)
        .await;
}

fn downloader(env: &TestEnvironment) -> ArtifactDownloader {
    ArtifactDownloader::new(http_client().unwrap(), env.paths())
}

#[tokio::test]
async fn test_download_installs_and_reports_digest() {
    let server = MockServer::start().await;
    serve_client(&server).await;
    let env = TestEnvironment::new();
    let release = release_at(&server, "/download/woodlanders-client.jar", CLIENT_BYTES.len() as u64);

    let outcome = downloader(&env).download(&release).await.unwrap();

    assert_eq!(outcome.file_path, env.paths().artifact_path());
    assert_eq!(outcome.sha256, Sha256Hasher::digest_bytes(CLIENT_BYTES));
    assert_eq!(outcome.size, CLIENT_BYTES.len() as u64);
    assert_eq!(env.artifact_content(), CLIENT_BYTES);
    assert!(env.staging_files().is_empty());
}

#[tokio::test]
async fn test_download_follows_redirects() {
    let server = MockServer::start().await;
    serve_client(&server).await;
    Mock::given(method("GET"))
        .and(path("/releases/download/v2.0.0/woodlanders-client.jar"))
        .respond_with(
            ResponseTemplate::new(302).insert_header(
                "location",
                format!("{}/download/woodlanders-client.jar", server.uri()).as_str(),
            ),
        )
        .mount(&server)
        .await;
    let env = TestEnvironment::new();
    let release = release_at(&server, "/releases/download/v2.0.0/woodlanders-client.jar", 0);

    downloader(&env).download(&release).await.unwrap();

    assert_eq!(env.artifact_content(), CLIENT_BYTES);
}

#[tokio::test]
async fn test_repeated_download_leaves_single_verified_artifact() {
    let server = MockServer::start().await;
    serve_client(&server).await;
    let env = TestEnvironment::new();
    let release = release_at(&server, "/download/woodlanders-client.jar", CLIENT_BYTES.len() as u64);
    let downloader = downloader(&env);

    let first = downloader.download(&release).await.unwrap();
    let second = downloader.download(&release).await.unwrap();

    assert_eq!(first, second);
    let recomputed = Sha256Hasher::digest_file(&env.paths().artifact_path()).await.unwrap();
    assert_eq!(second.sha256, recomputed);
    assert!(env.staging_files().is_empty());
    let files: Vec<_> = std::fs::read_dir(env.paths().base_dir()).unwrap().collect();
    assert_eq!(files.len(), 1);
}

#[tokio::test]
async fn test_http_error_keeps_existing_artifact() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    let env = TestEnvironment::new();
    env.install("v1.0.0", b"old client").await;

    let err = downloader(&env)
        .download(&release_at(&server, "/download/woodlanders-client.jar", 0))
        .await
        .unwrap_err();

    assert!(matches!(err, LauncherError::HttpStatus { status: 404, .. }));
    assert_eq!(env.artifact_content(), b"old client");
    assert!(env.staging_files().is_empty());
}

#[tokio::test]
async fn test_size_mismatch_is_rejected() {
    let server = MockServer::start().await;
    serve_client(&server).await;
    let env = TestEnvironment::new();
    env.install("v1.0.0", b"old client").await;

    let err = downloader(&env)
        .download(&release_at(&server, "/download/woodlanders-client.jar", 999_999))
        .await
        .unwrap_err();

    assert!(matches!(err, LauncherError::SizeMismatch { expected: 999_999, .. }));
    assert!(err.is_integrity_failure());
    assert_eq!(env.artifact_content(), b"old client");
    assert!(env.staging_files().is_empty());
}

#[tokio::test]
async fn test_checksum_file_is_verified() {
    let server = MockServer::start().await;
    serve_client(&server).await;
    Mock::given(method("GET"))
        .and(path("/download/woodlanders-client.jar.sha256"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            "{}  woodlanders-client.jar\n",
            Sha256Hasher::digest_bytes(CLIENT_BYTES).to_uppercase()
        )))
        .expect(1)
        .mount(&server)
        .await;
    let env = TestEnvironment::new();
    let mut release = release_at(&server, "/download/woodlanders-client.jar", 0);
    release.checksum_url =
        Some(Url::parse(&format!("{}/download/woodlanders-client.jar.sha256", server.uri())).unwrap());

    let outcome = downloader(&env).download(&release).await.unwrap();
    assert_eq!(outcome.sha256, Sha256Hasher::digest_bytes(CLIENT_BYTES));
}

#[tokio::test]
async fn test_missing_checksum_file_skips_verification() {
    let server = MockServer::start().await;
    serve_client(&server).await;
    let env = TestEnvironment::new();
    let mut release = release_at(&server, "/download/woodlanders-client.jar", 0);
    release.checksum_url = Some(Url::parse(&format!("{}/missing.sha256", server.uri())).unwrap());

    assert!(downloader(&env).download(&release).await.is_ok());
}

#[tokio::test]
async fn test_injected_checksum_mismatch_is_rejected() {
    let server = MockServer::start().await;
    serve_client(&server).await;
    let env = TestEnvironment::new();
    env.install("v1.0.0", b"old client").await;

    let err = downloader(&env)
        .with_expected_sha256(Some("0".repeat(64)))
        .download(&release_at(&server, "/download/woodlanders-client.jar", 0))
        .await
        .unwrap_err();

    assert!(matches!(err, LauncherError::ChecksumMismatch { .. }));
    assert_eq!(env.artifact_content(), b"old client");
    assert!(env.staging_files().is_empty());
}

#[tokio::test]
async fn test_slow_download_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(CLIENT_BYTES)
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;
    let env = TestEnvironment::new();

    let err = downloader(&env)
        .with_timeout(Duration::from_millis(200))
        .download(&release_at(&server, "/download/woodlanders-client.jar", 0))
        .await
        .unwrap_err();

    assert!(matches!(err, LauncherError::Timeout { .. }));
    assert!(env.staging_files().is_empty());
}

#[tokio::test]
async fn test_checksum_mismatch_leaves_install_and_record_untouched() {
    let server = MockServer::start().await;
    serve_client(&server).await;
    let env = TestEnvironment::new();
    let installed = env.install("v1.0.0", b"old client").await;
    let release = release_at(&server, "/download/woodlanders-client.jar", 0);

    let installer = downloader(&env).with_expected_sha256(Some("0".repeat(64)));
    let (coordinator, mut updates) = UpdateCoordinator::spawn(env.services(
        FakeReleaseSource::with_release(release),
        installer,
        FakeLauncher::succeeding(),
    ));

    let view = wait_until_settled(&mut updates).await;
    assert_eq!(view.state, UpdateState::NeedsUpdate);

    coordinator.primary_action();
    let view = wait_until_settled(&mut updates).await;

    assert_eq!(view.state, UpdateState::Error);
    assert!(view.message.starts_with("Download failed: checksum mismatch"));
    assert_eq!(view.remote_version, "v2.0.0");
    assert_eq!(env.store().read().await, Some(installed));
    assert_eq!(env.artifact_content(), b"old client");
    assert!(env.staging_files().is_empty());
}
