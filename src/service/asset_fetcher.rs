use crate::config::Config;
use crate::error::DirectoryError;
use rusty_s3::{Bucket, Credentials, S3Action, UrlStyle};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{error, info, warn};
use url::Url;

const PRESIGN_TTL: Duration = Duration::from_secs(300);

/// Result of a single best-effort asset download.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Object written to the destination path.
    Downloaded,
    /// Bucket or key not configured; nothing was attempted.
    Skipped,
    /// Credentials, download or write failed; the destination was left untouched.
    Failed,
}

impl FetchOutcome {
    pub fn is_downloaded(self) -> bool {
        matches!(self, FetchOutcome::Downloaded)
    }
}

/// One-shot downloader for the page background image.
///
/// Requests are SigV4-presigned with the `AWS_ACCESS_KEY_ID` /
/// `AWS_SECRET_ACCESS_KEY` (and optional `AWS_SESSION_TOKEN`) credentials,
/// virtual-hosted against `s3.{region}.amazonaws.com` or path-style under an
/// explicit endpoint.
#[derive(Clone)]
pub struct AssetFetcher {
    client: reqwest::Client,
    endpoint: Option<Url>,
    region: String,
    credentials: Option<Credentials>,
}

impl AssetFetcher {
    pub fn new(
        endpoint: Option<&str>,
        region: impl Into<String>,
        credentials: Option<Credentials>,
    ) -> Result<Self, DirectoryError> {
        let endpoint = endpoint
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(Url::parse)
            .transpose()?;
        let client = reqwest::Client::builder()
            .user_agent(concat!("empdir/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            client,
            endpoint,
            region: region.into(),
            credentials,
        })
    }

    pub fn from_config(cfg: &Config) -> Result<Self, DirectoryError> {
        Self::new(
            cfg.s3_endpoint.as_deref(),
            cfg.aws_region.clone(),
            credentials_from(cfg),
        )
    }

    /// Presigned GET URL for `key` in `bucket`.
    pub fn object_url(&self, bucket: &str, key: &str) -> Result<Url, DirectoryError> {
        let credentials = self
            .credentials
            .as_ref()
            .ok_or(DirectoryError::MissingCredentials)?;
        let (base, style) = match &self.endpoint {
            Some(endpoint) => (endpoint.clone(), UrlStyle::Path),
            None => (
                Url::parse(&format!("https://s3.{}.amazonaws.com", self.region))?,
                UrlStyle::VirtualHost,
            ),
        };
        let bucket = Bucket::new(base, style, bucket.to_string(), self.region.clone())?;
        let key = key.trim_start_matches('/');
        Ok(bucket.get_object(Some(credentials), key).sign(PRESIGN_TTL))
    }

    /// Download `s3://{bucket}/{key}` to `destination`.
    ///
    /// Never returns an error: an unconfigured source is [`FetchOutcome::Skipped`]
    /// and any failure is logged and reported as [`FetchOutcome::Failed`].
    pub async fn fetch_asset(
        &self,
        bucket: Option<&str>,
        key: Option<&str>,
        destination: &Path,
    ) -> FetchOutcome {
        let (Some(bucket), Some(key)) = (
            bucket.filter(|b| !b.is_empty()),
            key.filter(|k| !k.is_empty()),
        ) else {
            warn!("S3_BUCKET_NAME or S3_IMAGE_KEY not set; skipping image download");
            return FetchOutcome::Skipped;
        };

        let source = format!("s3://{bucket}/{key}");
        match self.download(bucket, key, destination).await {
            Ok(bytes) => {
                info!(
                    source = %source,
                    path = %destination.display(),
                    bytes,
                    "downloaded background image"
                );
                FetchOutcome::Downloaded
            }
            Err(DirectoryError::MissingCredentials) => {
                error!(source = %source, "AWS credentials not found; background image not downloaded");
                FetchOutcome::Failed
            }
            Err(e) => {
                error!(source = %source, error = %e, "failed to download background image");
                FetchOutcome::Failed
            }
        }
    }

    async fn download(
        &self,
        bucket: &str,
        key: &str,
        destination: &Path,
    ) -> Result<usize, DirectoryError> {
        let url = self.object_url(bucket, key)?;
        let body = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        // Stage next to the destination so a failed write never truncates it.
        let staged = staging_path(destination);
        let written = async {
            tokio::fs::write(&staged, &body).await?;
            tokio::fs::rename(&staged, destination).await
        }
        .await;
        if let Err(e) = written {
            if let Err(cleanup) = tokio::fs::remove_file(&staged).await {
                warn!(path = %staged.display(), error = %cleanup, "failed to remove staged download");
            }
            return Err(e.into());
        }
        Ok(body.len())
    }
}

fn credentials_from(cfg: &Config) -> Option<Credentials> {
    let key = cfg.aws_access_key_id.as_deref().filter(|s| !s.is_empty())?;
    let secret = cfg.aws_secret_access_key.as_deref().filter(|s| !s.is_empty())?;
    Some(match cfg.aws_session_token.as_deref().filter(|s| !s.is_empty()) {
        Some(token) => Credentials::new_with_token(key, secret, token),
        None => Credentials::new(key, secret),
    })
}

fn staging_path(destination: &Path) -> PathBuf {
    let name = destination
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    destination.with_file_name(format!(".{name}.part"))
}
