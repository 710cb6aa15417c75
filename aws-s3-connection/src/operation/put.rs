/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use tracing::Instrument;

use crate::client::Handle;
use crate::error::{self, ErrorKind};
use crate::io::InputStream;
use crate::types::{ResponseMetadata, S3Response};

/// Response of a successful object upload
#[derive(Debug, Clone)]
pub struct PutResponse {
    pub(crate) bucket_name: String,
    pub(crate) key: String,
    pub(crate) e_tag: Option<String>,
    pub(crate) version_id: Option<String>,
    pub(crate) content_length: u64,
    pub(crate) metadata: ResponseMetadata,
}

impl PutResponse {
    /// Bucket the object was stored in
    pub fn bucket_name(&self) -> &str {
        &self.bucket_name
    }

    /// Key the object was stored under
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Entity tag of the stored object
    pub fn e_tag(&self) -> Option<&str> {
        self.e_tag.as_deref()
    }

    /// Version ID of the stored object if versioning is enabled on the bucket
    pub fn version_id(&self) -> Option<&str> {
        self.version_id.as_deref()
    }

    /// Number of bytes stored
    pub fn content_length(&self) -> u64 {
        self.content_length
    }
}

impl S3Response for PutResponse {
    fn response_metadata(&self) -> &ResponseMetadata {
        &self.metadata
    }
}

/// Operation struct for single object upload
#[derive(Clone, Default, Debug)]
pub(crate) struct Put;

impl Put {
    /// Store `stream` as a single `PutObject` request
    pub(crate) async fn orchestrate(
        handle: &Handle,
        bucket: &str,
        key: &str,
        stream: InputStream,
        content_type: &str,
        size: Option<u64>,
    ) -> Result<PutResponse, error::Error> {
        super::require_non_empty(ErrorKind::PutFailed, "bucket name", bucket)?;
        super::require_non_empty(ErrorKind::PutFailed, "key", key)?;

        let (body, content_length) = stream.into_body(size).await?;
        let request_length: i64 = content_length.try_into().map_err(|_| {
            error::invalid_input(
                ErrorKind::PutFailed,
                format!("content_length:{content_length} is invalid."),
            )
        })?;
        tracing::trace!("sending PutObject with content length {content_length}");

        let mut request = handle
            .client()
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(body)
            .content_length(request_length);
        if !content_type.is_empty() {
            request = request.content_type(content_type);
        }

        let output = request
            .send()
            .instrument(tracing::debug_span!("send-put-object"))
            .await
            .map_err(error::from_sdk(ErrorKind::PutFailed))?;

        // Track bytes transferred on successful upload
        handle.metrics.add_bytes_uploaded(content_length);

        Ok(PutResponse {
            bucket_name: bucket.to_owned(),
            key: key.to_owned(),
            e_tag: output.e_tag().map(str::to_owned),
            version_id: output.version_id().map(str::to_owned),
            content_length,
            metadata: ResponseMetadata::from_output(&output),
        })
    }
}

#[cfg(test)]
mod tests {
    use aws_sdk_s3::operation::put_object::PutObjectOutput;
    use aws_smithy_mocks_experimental::{mock, mock_client, RuleMode};
    use bytes::Bytes;

    use super::Put;
    use crate::error::ErrorKind;
    use crate::io::InputStream;
    use crate::operation::test_util::test_handle;

    #[tokio::test]
    async fn test_put_from_buffer() {
        let body = Bytes::from_static(b"every adolescent dog goes bonkers early");
        let rule = mock!(aws_sdk_s3::Client::put_object)
            .match_requests(|r| {
                r.bucket() == Some("test-bucket")
                    && r.key() == Some("test-key")
                    && r.content_type() == Some("text/plain")
                    && r.content_length() == Some(39)
            })
            .then_output(|| PutObjectOutput::builder().e_tag("\"test-etag\"").build());
        let client = mock_client!(aws_sdk_s3, RuleMode::Sequential, &[&rule]);
        let handle = test_handle(client);

        let resp = Put::orchestrate(
            &handle,
            "test-bucket",
            "test-key",
            InputStream::from(body),
            "text/plain",
            None,
        )
        .await
        .unwrap();

        assert_eq!("test-bucket", resp.bucket_name());
        assert_eq!("test-key", resp.key());
        assert_eq!(Some("\"test-etag\""), resp.e_tag());
        assert_eq!(39, resp.content_length());
        assert_eq!(39, handle.metrics.bytes_uploaded());
    }

    #[tokio::test]
    async fn test_put_empty_content_type_is_unset() {
        let rule = mock!(aws_sdk_s3::Client::put_object)
            .match_requests(|r| r.content_type().is_none() && r.content_length() == Some(0))
            .then_output(|| PutObjectOutput::builder().build());
        let client = mock_client!(aws_sdk_s3, RuleMode::Sequential, &[&rule]);
        let handle = test_handle(client);

        Put::orchestrate(
            &handle,
            "test-bucket",
            "empty",
            InputStream::default(),
            "",
            Some(0),
        )
        .await
        .unwrap();
        assert_eq!(1, rule.num_calls());
    }

    #[tokio::test]
    async fn test_put_unseekable_without_size_sends_nothing() {
        let rule = mock!(aws_sdk_s3::Client::put_object)
            .then_output(|| PutObjectOutput::builder().build());
        let client = mock_client!(aws_sdk_s3, RuleMode::Sequential, &[&rule]);
        let handle = test_handle(client);

        let err = Put::orchestrate(
            &handle,
            "test-bucket",
            "test-key",
            InputStream::from_reader(&b"abc"[..]),
            "",
            None,
        )
        .await
        .unwrap_err();

        assert_eq!(&ErrorKind::PutFailed, err.kind());
        assert_eq!(0, rule.num_calls());
        assert_eq!(0, handle.metrics.bytes_uploaded());
    }
}
