use crate::core::Storage;
use crate::utils::error::{ForecastError, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};

#[cfg(feature = "s3")]
use aws_sdk_s3::operation::get_object::GetObjectError;
#[cfg(feature = "s3")]
use aws_sdk_s3::Client as S3Client;

/// Reads objects over plain HTTP(S), e.g. a public bucket or CDN origin.
#[derive(Debug, Clone)]
pub struct HttpStorage {
    client: Client,
    base_url: String,
}

impl HttpStorage {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn object_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl Storage for HttpStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let url = self.object_url(path);
        tracing::debug!("Fetching object: {}", url);

        let response = self.client.get(&url).send().await?;
        match response.status() {
            status if status.is_success() => Ok(response.bytes().await?.to_vec()),
            StatusCode::NOT_FOUND => Err(ForecastError::DataNotFound { path: url }),
            status => Err(ForecastError::ObjectStoreError {
                message: format!("GET {} returned {}", url, status),
            }),
        }
    }

    fn describe(&self) -> String {
        format!("http:{}", self.base_url)
    }
}

#[cfg(feature = "s3")]
#[derive(Debug, Clone)]
pub struct S3Storage {
    client: S3Client,
    bucket: String,
    prefix: String,
}

#[cfg(feature = "s3")]
impl S3Storage {
    pub fn new(client: S3Client, bucket: String, prefix: String) -> Self {
        Self {
            client,
            bucket,
            prefix: prefix.trim_matches('/').to_string(),
        }
    }

    pub async fn from_env(bucket: String, prefix: String, region: String) -> Self {
        let shared = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        let config = aws_sdk_s3::config::Builder::from(&shared)
            .region(aws_sdk_s3::config::Region::new(region))
            .force_path_style(true)
            .build();
        Self::new(S3Client::from_conf(config), bucket, prefix)
    }

    fn key(&self, path: &str) -> String {
        if self.prefix.is_empty() {
            path.to_string()
        } else {
            format!("{}/{}", self.prefix, path)
        }
    }
}

#[cfg(feature = "s3")]
#[async_trait]
impl Storage for S3Storage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let key = self.key(path);
        let resp = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(&key)
            .send()
            .await
            .map_err(|e| match e.into_service_error() {
                GetObjectError::NoSuchKey(_) => ForecastError::DataNotFound {
                    path: format!("s3://{}/{}", self.bucket, key),
                },
                err => ForecastError::ObjectStoreError {
                    message: format!("Failed to read s3://{}/{}: {}", self.bucket, key, err),
                },
            })?;

        let data = resp
            .body
            .collect()
            .await
            .map_err(|e| ForecastError::ObjectStoreError {
                message: format!("Failed to collect S3 data: {}", e),
            })?;

        Ok(data.into_bytes().to_vec())
    }

    fn describe(&self) -> String {
        format!("s3://{}/{}", self.bucket, self.prefix)
    }
}
