//! Object storage collaborator.
//!
//! The core only ever needs two operations from storage: put a blob under a
//! bucket/filename, and produce the public URL a stored blob is served
//! from. Everything else (CDN, cache headers, retention) is the provider's
//! business.

use std::path::PathBuf;

use async_trait::async_trait;

/// Bucket holding product catalog images.
pub const PRODUCT_IMAGES_BUCKET: &str = "product-images";

/// Bucket holding payment barcodes and customer proof-of-payment images.
pub const PAYMENT_PROOFS_BUCKET: &str = "payment-proofs";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Upload to bucket '{bucket}' failed: {message}")]
    UploadFailed { bucket: String, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Provider-agnostic object storage contract.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Persist `bytes` under `bucket/filename` with the given content type.
    async fn put(
        &self,
        bucket: &str,
        filename: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<(), StorageError>;

    /// Public URL the stored object is retrievable from.
    fn public_url(&self, bucket: &str, filename: &str) -> String;
}

// ---------------------------------------------------------------------------
// S3 provider
// ---------------------------------------------------------------------------

/// S3-backed object storage. Buckets map to S3 buckets one-to-one; objects
/// are served from `{public_base_url}/{bucket}/{filename}`.
pub struct S3ObjectStorage {
    client: aws_sdk_s3::Client,
    public_base_url: String,
}

impl S3ObjectStorage {
    /// Build a client from the ambient AWS environment (credentials chain,
    /// region, endpoint overrides).
    pub async fn from_env(public_base_url: String) -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self {
            client: aws_sdk_s3::Client::new(&config),
            public_base_url,
        }
    }
}

#[async_trait]
impl ObjectStorage for S3ObjectStorage {
    async fn put(
        &self,
        bucket: &str,
        filename: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<(), StorageError> {
        self.client
            .put_object()
            .bucket(bucket)
            .key(filename)
            .body(aws_sdk_s3::primitives::ByteStream::from(bytes.to_vec()))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| StorageError::UploadFailed {
                bucket: bucket.to_string(),
                message: e.to_string(),
            })?;

        tracing::debug!(bucket, filename, size = bytes.len(), "Object stored in S3");
        Ok(())
    }

    fn public_url(&self, bucket: &str, filename: &str) -> String {
        format!(
            "{}/{bucket}/{filename}",
            self.public_base_url.trim_end_matches('/')
        )
    }
}

// ---------------------------------------------------------------------------
// Local filesystem provider
// ---------------------------------------------------------------------------

/// Filesystem-backed object storage for local development and tests.
/// Buckets are directories under the configured root.
pub struct LocalObjectStorage {
    root: PathBuf,
    public_base_url: String,
}

impl LocalObjectStorage {
    pub fn new(root: impl Into<PathBuf>, public_base_url: String) -> Self {
        Self {
            root: root.into(),
            public_base_url,
        }
    }
}

#[async_trait]
impl ObjectStorage for LocalObjectStorage {
    async fn put(
        &self,
        bucket: &str,
        filename: &str,
        bytes: &[u8],
        _content_type: &str,
    ) -> Result<(), StorageError> {
        let dir = self.root.join(bucket);
        tokio::fs::create_dir_all(&dir).await?;
        tokio::fs::write(dir.join(filename), bytes).await?;

        tracing::debug!(bucket, filename, size = bytes.len(), "Object stored locally");
        Ok(())
    }

    fn public_url(&self, bucket: &str, filename: &str) -> String {
        format!(
            "{}/{bucket}/{filename}",
            self.public_base_url.trim_end_matches('/')
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn local_put_writes_the_blob() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalObjectStorage::new(dir.path(), "http://localhost:3000/storage".into());

        storage
            .put(PAYMENT_PROOFS_BUCKET, "proof_test.png", b"fake-png", "image/png")
            .await
            .unwrap();

        let stored = std::fs::read(dir.path().join(PAYMENT_PROOFS_BUCKET).join("proof_test.png"))
            .unwrap();
        assert_eq!(stored, b"fake-png");
    }

    #[tokio::test]
    async fn local_put_creates_bucket_directories() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalObjectStorage::new(dir.path(), "http://localhost:3000/storage".into());

        storage
            .put(PRODUCT_IMAGES_BUCKET, "a.png", b"x", "image/png")
            .await
            .unwrap();

        assert!(dir.path().join(PRODUCT_IMAGES_BUCKET).is_dir());
    }

    #[test]
    fn public_url_joins_base_bucket_and_filename() {
        let storage =
            LocalObjectStorage::new("/tmp/obj", "http://localhost:3000/storage/".into());
        assert_eq!(
            storage.public_url(PAYMENT_PROOFS_BUCKET, "proof_a.png"),
            "http://localhost:3000/storage/payment-proofs/proof_a.png"
        );
    }
}
