//! Signed S3 access through the AWS SDK
//!
//! Credentials and region come from the standard AWS provider chain
//! (environment, profile, container or instance role). An endpoint override
//! switches to path-style addressing for S3-compatible stores.

use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::config::timeout::TimeoutConfig;
use aws_sdk_s3::config::{BehaviorVersion, Region};
use aws_sdk_s3::error::{DisplayErrorContext, SdkError};
use aws_sdk_s3::operation::get_object::GetObjectError;
use bytes::Bytes;
use tracing::debug;

use super::object_store::{ObjectStore, StoreError};

/// Label used in logs when the SDK resolves the endpoint itself
const AWS_ENDPOINT_LABEL: &str = "s3:/";

/// Object store backed by the AWS S3 client
pub struct S3ObjectStore {
    client: aws_sdk_s3::Client,
    endpoint: String,
}

impl S3ObjectStore {
    /// Build a client from the ambient AWS configuration.
    pub async fn from_env(endpoint: Option<&str>, region: Option<&str>, timeout: Duration) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .timeout_config(TimeoutConfig::builder().operation_timeout(timeout).build());
        if let Some(region) = region {
            loader = loader.region(Region::new(region.to_string()));
        }
        let shared = loader.load().await;

        let mut builder = aws_sdk_s3::config::Builder::from(&shared);
        if let Some(endpoint) = endpoint {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        Self::with_config(builder.build(), endpoint.unwrap_or(AWS_ENDPOINT_LABEL))
    }

    /// Wrap an explicit SDK configuration.
    pub fn with_config(config: aws_sdk_s3::Config, endpoint: &str) -> Self {
        Self {
            client: aws_sdk_s3::Client::from_conf(config),
            endpoint: endpoint.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes, StoreError> {
        debug!(bucket, key, endpoint = %self.endpoint, "Fetching object from S3");

        let output = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| map_sdk_error(&e, bucket, key))?;

        let body = output
            .body
            .collect()
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?
            .into_bytes();

        debug!(bucket, key, bytes = body.len(), "Object fetched");
        Ok(body)
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Classify an SDK failure by the HTTP status S3 answered with.
fn map_sdk_error(err: &SdkError<GetObjectError>, bucket: &str, key: &str) -> StoreError {
    let SdkError::ServiceError(service) = err else {
        return StoreError::Backend(DisplayErrorContext(err).to_string());
    };

    let status = service.raw().status().as_u16();
    match (service.err(), status) {
        (GetObjectError::NoSuchKey(_), _) | (_, 404) => StoreError::NotFound {
            bucket: bucket.to_string(),
            key: key.to_string(),
        },
        (_, 401 | 403) => StoreError::Denied {
            bucket: bucket.to_string(),
            key: key.to_string(),
            status,
        },
        _ => StoreError::Status {
            bucket: bucket.to_string(),
            key: key.to_string(),
            status,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_s3::config::Credentials;

    #[test]
    fn test_endpoint_label() {
        let config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .credentials_provider(Credentials::new("key", "secret", None, None, "test"))
            .endpoint_url("http://localhost:9000")
            .force_path_style(true)
            .build();

        let store = S3ObjectStore::with_config(config, "http://localhost:9000/");
        assert_eq!(store.endpoint(), "http://localhost:9000");
    }

    #[tokio::test]
    async fn test_from_env_with_endpoint_override() {
        let store = S3ObjectStore::from_env(
            Some("http://localhost:9000"),
            Some("eu-west-1"),
            Duration::from_secs(1),
        )
        .await;
        assert_eq!(store.endpoint(), "http://localhost:9000");
    }
}
