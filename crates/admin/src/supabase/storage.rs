//! Storage helpers: asset upload, public URLs, and best-effort cleanup.
//!
//! Assets live in bucket-scoped storage next to the database. Records store
//! only the public URL; deletion parses that URL back into a bucket path.
//!
//! Cleanup during entity deletion is deliberately soft: an orphaned object
//! costs storage, a blocked record deletion costs an operator. Failures are
//! logged at `warn` and swallowed.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use rand::distr::{Alphanumeric, SampleString};
use tracing::instrument;

use super::{SupabaseClient, SupabaseError};

/// Path prefix under which uploaded objects are publicly served.
const PUBLIC_PREFIX: &str = "/storage/v1/object/public/";

impl SupabaseClient {
    /// Upload raw bytes into `bucket` under `folder` and return the public
    /// URL.
    ///
    /// The object name is derived from the original filename with a
    /// timestamp and random suffix, so repeated uploads of the same file
    /// never collide.
    ///
    /// # Errors
    ///
    /// Upload failures abort the surrounding operation; unlike deletion,
    /// they are never swallowed.
    #[instrument(skip(self, bytes), fields(bucket = bucket, folder = folder, size = bytes.len()))]
    pub async fn upload_object(
        &self,
        bucket: &str,
        folder: &str,
        filename: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, SupabaseError> {
        let name = unique_object_name(filename);
        let path = if folder.is_empty() {
            name
        } else {
            format!("{}/{name}", folder.trim_matches('/'))
        };

        let url = format!("{}/storage/v1/object/{bucket}/{path}", self.base_url());
        let response = self
            .http()
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SupabaseError::Api {
                status: status.as_u16(),
                code: None,
                message,
            });
        }

        Ok(self.public_url(bucket, &path))
    }

    /// Upload a base64 data-URL payload (`data:image/png;base64,...`).
    ///
    /// The dashboard's image pickers hand files over in this form; content
    /// type and file extension are inferred from the payload itself.
    ///
    /// # Errors
    ///
    /// Returns a parse error for malformed payloads, otherwise as
    /// [`Self::upload_object`].
    pub async fn upload_data_url(
        &self,
        bucket: &str,
        folder: &str,
        data_url: &str,
    ) -> Result<String, SupabaseError> {
        let (content_type, payload) = split_data_url(data_url)
            .ok_or_else(|| SupabaseError::Parse("malformed data URL".to_string()))?;
        let bytes = BASE64
            .decode(payload)
            .map_err(|e| SupabaseError::Parse(format!("invalid base64 payload: {e}")))?;
        let filename = format!("upload.{}", extension_for(content_type));
        self.upload_object(bucket, folder, &filename, bytes, content_type)
            .await
    }

    /// The public URL under which an object is served.
    #[must_use]
    pub fn public_url(&self, bucket: &str, path: &str) -> String {
        format!("{}{PUBLIC_PREFIX}{bucket}/{path}", self.base_url())
    }

    /// Parse a public URL of this project back into `(bucket, path)`.
    ///
    /// Returns `None` for URLs that do not belong to this project's public
    /// storage (external images pasted into forms end up as such).
    #[must_use]
    pub fn object_from_public_url(&self, public_url: &str) -> Option<(String, String)> {
        let rest = public_url
            .strip_prefix(self.base_url())?
            .strip_prefix(PUBLIC_PREFIX)?;
        let (bucket, path) = rest.split_once('/')?;
        if bucket.is_empty() || path.is_empty() {
            return None;
        }
        Some((bucket.to_string(), path.to_string()))
    }

    /// Remove one object.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(bucket = bucket, path = path))]
    pub async fn remove_object(&self, bucket: &str, path: &str) -> Result<(), SupabaseError> {
        let url = format!("{}/storage/v1/object/{bucket}/{path}", self.base_url());
        let response = self.http().delete(&url).send().await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let message = response.text().await.unwrap_or_default();
        Err(SupabaseError::Api {
            status: status.as_u16(),
            code: None,
            message,
        })
    }

    /// Best-effort removal of the objects behind a set of public URLs.
    ///
    /// Used while deleting the owning record: unparseable URLs and failed
    /// removals are logged and skipped, and the record deletion proceeds
    /// regardless. At-most-once, non-blocking.
    pub async fn remove_public_urls(&self, urls: &[String]) {
        for public_url in urls {
            let Some((bucket, path)) = self.object_from_public_url(public_url) else {
                tracing::warn!(url = %public_url, "skipping cleanup of foreign or malformed URL");
                continue;
            };
            if let Err(err) = self.remove_object(&bucket, &path).await {
                tracing::warn!(
                    error = %err,
                    bucket = %bucket,
                    path = %path,
                    "orphaned storage object left behind"
                );
            }
        }
    }
}

/// Collision-resistant object name: unix millis, random suffix, original
/// extension.
fn unique_object_name(filename: &str) -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let suffix = Alphanumeric
        .sample_string(&mut rand::rng(), 6)
        .to_lowercase();
    let ext = filename
        .rsplit('.')
        .next()
        .filter(|ext| !ext.is_empty() && ext.len() <= 8 && *ext != filename)
        .unwrap_or("bin");
    format!("{millis}-{suffix}.{ext}")
}

/// Split `data:<mime>;base64,<payload>` into `(mime, payload)`.
fn split_data_url(data_url: &str) -> Option<(&str, &str)> {
    let rest = data_url.strip_prefix("data:")?;
    let (header, payload) = rest.split_once(',')?;
    let content_type = header.strip_suffix(";base64")?;
    if content_type.is_empty() {
        return None;
    }
    Some((content_type, payload))
}

/// File extension for the content types the dashboard uploads.
fn extension_for(content_type: &str) -> &'static str {
    match content_type {
        "image/jpeg" => "jpg",
        "image/webp" => "webp",
        "image/gif" => "gif",
        "image/svg+xml" => "svg",
        "video/mp4" => "mp4",
        _ => "png",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::SupabaseConfig;

    fn client() -> SupabaseClient {
        let config =
            SupabaseConfig::new("https://abc.supabase.co", "eyJhbGciOiJIUzI1NiJ9.eyJ9.sig")
                .unwrap();
        SupabaseClient::new(&config).unwrap()
    }

    #[test]
    fn test_public_url_round_trip() {
        let client = client();
        let url = client.public_url("banners-images", "home/123-abc.png");
        assert_eq!(
            url,
            "https://abc.supabase.co/storage/v1/object/public/banners-images/home/123-abc.png"
        );
        assert_eq!(
            client.object_from_public_url(&url),
            Some((
                "banners-images".to_string(),
                "home/123-abc.png".to_string()
            ))
        );
    }

    #[test]
    fn test_foreign_url_is_rejected() {
        let client = client();
        assert_eq!(
            client.object_from_public_url("https://cdn.example.com/image.png"),
            None
        );
        assert_eq!(
            client.object_from_public_url("https://abc.supabase.co/rest/v1/products"),
            None
        );
    }

    #[test]
    fn test_unique_object_name_keeps_extension() {
        let name = unique_object_name("photo.JPG");
        assert!(name.ends_with(".JPG"));
        assert!(name.contains('-'));
    }

    #[test]
    fn test_unique_object_name_without_extension() {
        let name = unique_object_name("photo");
        assert!(name.ends_with(".bin"));
    }

    #[test]
    fn test_unique_object_names_do_not_collide() {
        let a = unique_object_name("a.png");
        let b = unique_object_name("a.png");
        assert_ne!(a, b);
    }

    #[test]
    fn test_split_data_url() {
        let (mime, payload) = split_data_url("data:image/png;base64,AAAA").unwrap();
        assert_eq!(mime, "image/png");
        assert_eq!(payload, "AAAA");

        assert!(split_data_url("image/png;base64,AAAA").is_none());
        assert!(split_data_url("data:image/png,AAAA").is_none());
    }

    #[test]
    fn test_extension_for_content_type() {
        assert_eq!(extension_for("image/jpeg"), "jpg");
        assert_eq!(extension_for("application/octet-stream"), "png");
    }
}
