/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::Instrument;

use crate::connection::S3Connection;
use crate::error::Error;
use crate::io::InputStream;
use crate::metrics::aggregators::ConnectionMetrics;
use crate::operation::create_bucket::{CreateBucket, CreateBucketResponse};
use crate::operation::delete::{Delete, DeleteResponse};
use crate::operation::delete_bucket::{DeleteBucket, DeleteBucketResponse};
use crate::operation::get::{ConditionalGetResponse, Get, GetResponse};
use crate::operation::head::{Head, HeadResponse};
use crate::operation::list_all_buckets::{ListAllBuckets, ListAllBucketsResponse};
use crate::operation::list_bucket::{ListBucket, ListBucketInput, ListBucketResponse};
use crate::operation::put::{Put, PutResponse};
use crate::Config;

/// Connection to Amazon Simple Storage Service backed by the AWS SDK for Rust.
///
/// A `Client` is cheap to clone and safe to use from many tasks concurrently. Clones share the
/// same underlying SDK client and [metrics](Client::metrics).
#[derive(Debug, Clone)]
pub struct Client {
    pub(crate) handle: Arc<Handle>,
}

/// Whatever is needed to carry out operations
#[derive(Debug)]
pub(crate) struct Handle {
    pub(crate) config: crate::Config,
    pub(crate) metrics: ConnectionMetrics,
}

impl Handle {
    /// The SDK client requests are sent with
    pub(crate) fn client(&self) -> &aws_sdk_s3::Client {
        self.config.client()
    }

    /// Drive a single operation, recording its outcome in the connection metrics
    async fn track<T, F>(&self, operation: F) -> Result<T, Error>
    where
        F: Future<Output = Result<T, Error>>,
    {
        self.metrics.request_started();
        let result = operation.await;
        match &result {
            Err(err) if err.is_refused_locally() => self.metrics.request_refused(),
            _ => self.metrics.request_finished(result.is_ok()),
        }
        if let Err(err) = &result {
            tracing::debug!(
                kind = ?err.kind(),
                code = err.code(),
                request_id = err.request_id(),
                "operation failed: {err}"
            );
        }
        result
    }
}

impl Drop for Handle {
    fn drop(&mut self) {
        // Log final metrics summary when the connection is dropped
        tracing::debug!(
            "Connection metrics summary - Requests sent: {}, failed: {}, refused: {}, bytes uploaded: {}, bytes downloaded: {}",
            self.metrics.requests_sent(),
            self.metrics.requests_failed(),
            self.metrics.requests_refused(),
            self.metrics.bytes_uploaded(),
            self.metrics.bytes_downloaded()
        );
    }
}

impl Client {
    /// Creates a new client from a connection config.
    pub fn new(config: Config) -> Client {
        let metrics = ConnectionMetrics::new();
        let handle = Arc::new(Handle { config, metrics });
        Client { handle }
    }

    /// Returns the client's configuration
    pub fn config(&self) -> &Config {
        &self.handle.config
    }

    /// Returns the client's metrics
    pub fn metrics(&self) -> &ConnectionMetrics {
        &self.handle.metrics
    }
}

#[async_trait]
impl S3Connection for Client {
    async fn create_bucket(&self, bucket: &str) -> Result<CreateBucketResponse, Error> {
        self.handle
            .track(CreateBucket::orchestrate(&self.handle, bucket))
            .instrument(tracing::debug_span!("create-bucket", bucket))
            .await
    }

    async fn list_all_buckets(&self) -> Result<ListAllBucketsResponse, Error> {
        self.handle
            .track(ListAllBuckets::orchestrate(&self.handle))
            .instrument(tracing::debug_span!("list-all-buckets"))
            .await
    }

    async fn delete_bucket(&self, bucket: &str) -> Result<DeleteBucketResponse, Error> {
        self.handle
            .track(DeleteBucket::orchestrate(&self.handle, bucket))
            .instrument(tracing::debug_span!("delete-bucket", bucket))
            .await
    }

    async fn list_bucket_with(&self, input: ListBucketInput) -> Result<ListBucketResponse, Error> {
        let span = tracing::debug_span!(
            "list-bucket",
            bucket = input.bucket(),
            prefix = input.prefix(),
            marker = input.marker()
        );
        self.handle
            .track(ListBucket::orchestrate(&self.handle, input))
            .instrument(span)
            .await
    }

    async fn put_stream(
        &self,
        bucket: &str,
        key: &str,
        stream: InputStream,
        content_type: &str,
        size: Option<u64>,
    ) -> Result<PutResponse, Error> {
        self.handle
            .track(Put::orchestrate(
                &self.handle,
                bucket,
                key,
                stream,
                content_type,
                size,
            ))
            .instrument(tracing::debug_span!("put", bucket, key))
            .await
    }

    async fn get(&self, bucket: &str, key: &str) -> Result<GetResponse, Error> {
        self.handle
            .track(Get::orchestrate(&self.handle, bucket, key))
            .instrument(tracing::debug_span!("get", bucket, key))
            .await
    }

    async fn get_if_changed(
        &self,
        bucket: &str,
        key: &str,
        old_e_tag: &str,
    ) -> Result<ConditionalGetResponse, Error> {
        self.handle
            .track(Get::orchestrate_conditional(
                &self.handle,
                bucket,
                key,
                old_e_tag,
            ))
            .instrument(tracing::debug_span!("get-if-changed", bucket, key))
            .await
    }

    async fn delete(&self, bucket: &str, key: &str) -> Result<DeleteResponse, Error> {
        self.handle
            .track(Delete::orchestrate(&self.handle, bucket, key))
            .instrument(tracing::debug_span!("delete", bucket, key))
            .await
    }

    async fn head(&self, bucket: &str, key: &str) -> Result<HeadResponse, Error> {
        self.handle
            .track(Head::orchestrate(&self.handle, bucket, key))
            .instrument(tracing::debug_span!("head", bucket, key))
            .await
    }
}

#[cfg(test)]
mod tests {
    use aws_sdk_s3::operation::delete_bucket::DeleteBucketOutput;
    use aws_smithy_mocks_experimental::{mock, mock_client, RuleMode};

    use super::Client;
    use crate::connection::S3Connection;
    use crate::Config;

    #[tokio::test]
    async fn test_refused_input_is_not_counted_as_sent() {
        let ok = mock!(aws_sdk_s3::Client::delete_bucket)
            .then_output(|| DeleteBucketOutput::builder().build());
        let s3_client = mock_client!(aws_sdk_s3, RuleMode::MatchAny, &[&ok]);
        let client = Client::new(Config::builder().client(s3_client).build());

        client.delete_bucket("test-bucket").await.unwrap();
        client.create_bucket("").await.unwrap_err();

        let metrics = client.metrics();
        assert_eq!(1, metrics.requests_sent());
        assert_eq!(0, metrics.requests_failed());
        assert_eq!(1, metrics.requests_refused());
        assert_eq!(0, metrics.requests_in_flight());
        assert_eq!(1, ok.num_calls());
    }

    #[test]
    fn test_client_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + Clone>() {}
        assert_send_sync::<Client>();
    }
}
