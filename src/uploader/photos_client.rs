use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::token::AccessToken;

const UPLOADS_PATH: &str = "/v1/uploads";
const BATCH_CREATE_PATH: &str = "/v1/mediaItems:batchCreate";

const FALLBACK_FILENAME: &str = "image.jpg";

/// Image bytes fetched from the clicked URL, alive for one attempt only.
#[derive(Debug, Clone)]
pub struct ImageBlob {
    pub bytes: Vec<u8>,
    pub filename: String,
}

/// Opaque token returned by the raw-bytes upload. Consumed by value in
/// `create_media_item`; the API rejects reuse, so the type does too.
#[derive(Debug, PartialEq, Eq)]
pub struct UploadToken(String);

impl UploadToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn into_inner(self) -> String {
        self.0
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BatchCreateRequest {
    new_media_items: Vec<NewMediaItem>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NewMediaItem {
    description: String,
    simple_media_item: SimpleMediaItem,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SimpleMediaItem {
    upload_token: String,
}

/// batchCreate response, parsed just enough to confirm the item landed.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItemResult {
    #[serde(default)]
    pub new_media_item_results: Vec<NewMediaItemResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMediaItemResult {
    #[serde(default)]
    pub upload_token: Option<String>,
    #[serde(default)]
    pub media_item: Option<MediaItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    pub id: String,
    #[serde(default)]
    pub filename: Option<String>,
}

/// Client for the two-call photo upload protocol plus the image fetch.
/// No retries in here; the retry policy lives with the orchestrator.
pub struct PhotosClient {
    client: Client,
    base_url: String,
    description: String,
}

impl PhotosClient {
    pub fn new(config: &Config) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            description: config.upload_description.clone(),
        })
    }

    /// Fetch the clicked image's bytes from its source URL.
    pub async fn fetch_image(&self, src_url: &str) -> AppResult<ImageBlob> {
        log::debug!("Fetching image from {}", src_url);
        let response = self.client.get(src_url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Fetch {
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await?.to_vec();
        Ok(ImageBlob {
            filename: filename_from_url(src_url),
            bytes,
        })
    }

    /// Raw-bytes upload. The response body is the opaque upload token.
    pub async fn upload_bytes(
        &self,
        blob: &ImageBlob,
        token: &AccessToken,
    ) -> AppResult<UploadToken> {
        let url = format!("{}{}", self.base_url, UPLOADS_PATH);
        log::debug!("Uploading {} bytes as {}", blob.bytes.len(), blob.filename);

        let response = self
            .client
            .post(&url)
            .bearer_auth(token.as_str())
            .header(CONTENT_TYPE, "application/octet-stream")
            .header("X-Goog-Upload-File-Name", &blob.filename)
            .header("X-Goog-Upload-Protocol", "raw")
            .body(blob.bytes.clone())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            log::warn!("Raw upload rejected with status {}", status);
            return Err(AppError::Upload {
                status: status.as_u16(),
            });
        }

        let upload_token = response.text().await?;
        Ok(UploadToken::new(upload_token))
    }

    /// Redeem the upload token into a library entry.
    pub async fn create_media_item(
        &self,
        upload_token: UploadToken,
        token: &AccessToken,
    ) -> AppResult<MediaItemResult> {
        let url = format!("{}{}", self.base_url, BATCH_CREATE_PATH);
        let body = BatchCreateRequest {
            new_media_items: vec![NewMediaItem {
                description: self.description.clone(),
                simple_media_item: SimpleMediaItem {
                    upload_token: upload_token.into_inner(),
                },
            }],
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(token.as_str())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            log::warn!("Media item creation rejected with status {}", status);
            return Err(AppError::MediaCreation {
                status: status.as_u16(),
            });
        }

        Ok(response.json::<MediaItemResult>().await?)
    }
}

/// Derive an upload filename from the URL's last path segment, falling back
/// to a generic name when the segment doesn't look like an image file.
pub fn filename_from_url(src_url: &str) -> String {
    let path = src_url
        .split(['?', '#'])
        .next()
        .unwrap_or(src_url)
        .trim_end_matches('/');

    let segment = path.rsplit('/').next().unwrap_or("");
    let extension = segment.rsplit('.').next().unwrap_or("").to_lowercase();

    let known_image = matches!(
        extension.as_str(),
        "png" | "jpg" | "jpeg" | "webp" | "gif" | "bmp" | "avif"
    );

    if known_image && segment.len() > extension.len() + 1 {
        segment.to_string()
    } else {
        FALLBACK_FILENAME.to_string()
    }
}
