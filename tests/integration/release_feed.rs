use jarlaunch::constants::{GITHUB_ACCEPT, user_agent};
use jarlaunch::update::{GithubReleaseResolver, ReleaseSource, http_client};
use reqwest::Url;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn resolver_for(server: &MockServer) -> GithubReleaseResolver {
    let feed = Url::parse(&format!("{}/repos/woodlanders/releases/latest", server.uri())).unwrap();
    GithubReleaseResolver::new(http_client().unwrap(), feed, "woodlanders-client.jar")
}

fn asset(server: &MockServer, name: &str, size: u64) -> serde_json::Value {
    json!({
        "name": name,
        "browser_download_url": format!("{}/download/{name}", server.uri()),
        "size": size,
        "content_type": "application/java-archive"
    })
}

#[tokio::test]
async fn test_resolves_latest_release() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/woodlanders/releases/latest"))
        .and(header("accept", GITHUB_ACCEPT))
        .and(header("user-agent", user_agent().as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "tag_name": "v0.9.1",
            "name": "Spring update",
            "prerelease": false,
            "assets": [
                asset(&server, "CHANGELOG.txt", 100),
                asset(&server, "woodlanders-client.jar", 2048),
                asset(&server, "woodlanders-client.jar.sha256", 64),
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let release = resolver_for(&server).fetch_latest().await.unwrap();

    assert_eq!(release.tag, "v0.9.1");
    assert_eq!(release.asset_size, 2048);
    assert!(release.download_url.path().ends_with("/woodlanders-client.jar"));
    assert!(release.checksum_url.unwrap().path().ends_with(".sha256"));
}

#[tokio::test]
async fn test_falls_back_to_last_jar_asset() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "tag_name": "v1.0.0",
            "assets": [
                asset(&server, "old-client.jar", 1),
                asset(&server, "notes.md", 1),
                asset(&server, "new-client.jar", 2),
            ]
        })))
        .mount(&server)
        .await;

    let release = resolver_for(&server).fetch_latest().await.unwrap();
    assert!(release.download_url.path().ends_with("/new-client.jar"));
}

#[tokio::test]
async fn test_release_without_jar_is_unusable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "tag_name": "v1.0.0",
            "assets": [asset(&server, "readme.txt", 1)]
        })))
        .mount(&server)
        .await;

    assert!(resolver_for(&server).fetch_latest().await.is_none());
}

#[tokio::test]
async fn test_non_success_status_is_offline() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403).set_body_string("rate limit exceeded"))
        .expect(1)
        .mount(&server)
        .await;

    assert!(resolver_for(&server).fetch_latest().await.is_none());
}

#[tokio::test]
async fn test_slow_feed_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"tag_name": "v1", "assets": []}))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let resolver = resolver_for(&server).with_timeout(Duration::from_millis(200));
    assert!(resolver.fetch_latest().await.is_none());
}

#[tokio::test]
async fn test_unreachable_feed_is_offline() {
    let feed = Url::parse("http://127.0.0.1:9/releases/latest").unwrap();
    let resolver = GithubReleaseResolver::new(http_client().unwrap(), feed, "woodlanders-client.jar");
    assert!(resolver.fetch_latest().await.is_none());
}
