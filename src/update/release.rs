//! Resolution of the latest published client release.
//!
//! The release feed is a GitHub-style "latest release" document. Only the tag
//! and the asset list are read; unknown fields are ignored. Resolution never
//! fails loudly: an unreachable feed, a non-success status or an unusable
//! document all resolve to `None`, which the coordinator reports as offline.

use crate::constants::{ASSET_EXTENSION, CHECKSUM_SUFFIX, GITHUB_ACCEPT, RELEASE_REQUEST_TIMEOUT};
use reqwest::{Client, Url, header};
use serde::Deserialize;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, info, warn};

/// The release the launcher would install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseInfo {
    /// Release tag, used as the installed version string
    pub tag: String,
    /// Where the selected asset can be downloaded
    pub download_url: Url,
    /// Advertised asset size; zero when the feed omitted it
    pub asset_size: u64,
    /// Companion `<asset>.sha256` file, when published
    pub checksum_url: Option<Url>,
}

/// Release document as returned by the feed.
#[derive(Debug, Deserialize)]
pub struct FeedRelease {
    #[serde(default)]
    pub tag_name: Option<String>,
    #[serde(default)]
    pub assets: Option<Vec<FeedAsset>>,
}

/// One downloadable file attached to a release.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedAsset {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub browser_download_url: Option<String>,
    #[serde(default)]
    pub size: u64,
}

impl FeedAsset {
    fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }
}

/// Something that can report the latest available release.
pub trait ReleaseSource: Send + Sync + 'static {
    /// Latest usable release, or `None` when the feed cannot be used.
    fn fetch_latest(&self) -> impl Future<Output = Option<ReleaseInfo>> + Send;
}

/// Pick the asset to install.
///
/// An asset named exactly `expected_name` wins. Otherwise the last asset in
/// document order whose name ends with `extension` is used.
pub fn select_asset<'a>(
    assets: &'a [FeedAsset],
    expected_name: &str,
    extension: &str,
) -> Option<&'a FeedAsset> {
    let mut fallback = None;
    for asset in assets {
        let name = asset.name();
        if name == expected_name {
            return Some(asset);
        }
        if name.ends_with(extension) {
            fallback = Some(asset);
        }
    }
    fallback
}

/// Turn a release document into a [`ReleaseInfo`], if it is usable.
///
/// Unusable means: unparseable JSON, a blank tag, no matching asset, or a
/// matching asset without a valid download URL.
pub fn parse_release(body: &str, expected_name: &str, extension: &str) -> Option<ReleaseInfo> {
    let release: FeedRelease = match serde_json::from_str(body) {
        Ok(release) => release,
        Err(e) => {
            warn!("Failed to parse release feed response: {e}");
            return None;
        }
    };

    let tag = release.tag_name.as_deref().unwrap_or_default();
    if tag.trim().is_empty() {
        warn!("Latest release has no tag; ignoring it");
        return None;
    }

    let assets = release.assets.unwrap_or_default();
    let Some(asset) = select_asset(&assets, expected_name, extension) else {
        warn!("Release {tag} has no {extension} asset");
        return None;
    };

    let download_url = match asset.browser_download_url.as_deref().map(Url::parse) {
        Some(Ok(url)) => url,
        Some(Err(e)) => {
            warn!("Asset {} has an invalid download URL: {e}", asset.name());
            return None;
        }
        None => {
            warn!("Asset {} has no download URL", asset.name());
            return None;
        }
    };

    let checksum_name = format!("{}{CHECKSUM_SUFFIX}", asset.name());
    let checksum_url = assets
        .iter()
        .find(|candidate| candidate.name() == checksum_name)
        .and_then(|candidate| candidate.browser_download_url.as_deref())
        .and_then(|url| Url::parse(url).ok());

    Some(ReleaseInfo {
        tag: tag.to_string(),
        download_url,
        asset_size: asset.size,
        checksum_url,
    })
}

/// Queries a GitHub-compatible release feed.
pub struct GithubReleaseResolver {
    client: Client,
    feed_url: Url,
    asset_name: String,
    extension: String,
    timeout: Duration,
}

impl GithubReleaseResolver {
    pub fn new(client: Client, feed_url: Url, asset_name: impl Into<String>) -> Self {
        Self {
            client,
            feed_url,
            asset_name: asset_name.into(),
            extension: ASSET_EXTENSION.to_string(),
            timeout: RELEASE_REQUEST_TIMEOUT,
        }
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Issue the single feed request.
    pub async fn latest_release(&self) -> Option<ReleaseInfo> {
        debug!("Fetching latest release from {}", self.feed_url);

        let response = match self
            .client
            .get(self.feed_url.clone())
            .header(header::ACCEPT, GITHUB_ACCEPT)
            .timeout(self.timeout)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!("Release feed unreachable: {e}");
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!("Release feed returned HTTP {status}");
            return None;
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                warn!("Failed to read release feed response: {e}");
                return None;
            }
        };

        let release = parse_release(&body, &self.asset_name, &self.extension)?;
        info!("Latest release is {}", release.tag);
        Some(release)
    }
}

impl ReleaseSource for GithubReleaseResolver {
    fn fetch_latest(&self) -> impl Future<Output = Option<ReleaseInfo>> + Send {
        self.latest_release()
    }
}
