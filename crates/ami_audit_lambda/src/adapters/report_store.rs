use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;

/// Durable storage for the rendered report plus time-limited download links.
#[async_trait]
pub trait ReportStore: Send + Sync {
    async fn write_object(&self, key: &str, body: &[u8]) -> Result<(), String>;
    async fn presign_get(&self, key: &str, expires_in: Duration) -> Result<String, String>;
}

pub struct S3ReportStore {
    bucket: String,
    s3_client: aws_sdk_s3::Client,
}

impl S3ReportStore {
    pub fn new(bucket: impl Into<String>, s3_client: aws_sdk_s3::Client) -> Self {
        Self {
            bucket: bucket.into(),
            s3_client,
        }
    }
}

#[async_trait]
impl ReportStore for S3ReportStore {
    async fn write_object(&self, key: &str, body: &[u8]) -> Result<(), String> {
        self.s3_client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body.to_vec()))
            .send()
            .await
            .map(|_| ())
            .map_err(|error| format!("failed to write object to s3: {error}"))
    }

    async fn presign_get(&self, key: &str, expires_in: Duration) -> Result<String, String> {
        let config = PresigningConfig::builder()
            .expires_in(expires_in)
            .build()
            .map_err(|error| format!("failed to build presigning config: {error}"))?;

        self.s3_client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(config)
            .await
            .map(|request| request.uri().to_string())
            .map_err(|error| format!("failed to presign report download: {error}"))
    }
}
