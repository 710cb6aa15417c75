/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use tracing::Instrument;

use crate::client::Handle;
use crate::error::{self, ErrorKind};
use crate::types::{ResponseMetadata, S3Response};

/// Response of a successful object deletion
#[derive(Debug, Clone)]
pub struct DeleteResponse {
    pub(crate) bucket_name: String,
    pub(crate) key: String,
    pub(crate) version_id: Option<String>,
    pub(crate) delete_marker: bool,
    pub(crate) metadata: ResponseMetadata,
}

impl DeleteResponse {
    /// Bucket the object was deleted from
    pub fn bucket_name(&self) -> &str {
        &self.bucket_name
    }

    /// Key of the deleted object
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Version ID of the delete marker created, if versioning is enabled on the bucket
    pub fn version_id(&self) -> Option<&str> {
        self.version_id.as_deref()
    }

    /// True if a delete marker was created in a versioned bucket
    pub fn delete_marker(&self) -> bool {
        self.delete_marker
    }
}

impl S3Response for DeleteResponse {
    fn response_metadata(&self) -> &ResponseMetadata {
        &self.metadata
    }
}

/// Operation struct for single object deletion
#[derive(Clone, Default, Debug)]
pub(crate) struct Delete;

impl Delete {
    pub(crate) async fn orchestrate(
        handle: &Handle,
        bucket: &str,
        key: &str,
    ) -> Result<DeleteResponse, error::Error> {
        super::require_non_empty(ErrorKind::DeleteFailed, "bucket name", bucket)?;
        super::require_non_empty(ErrorKind::DeleteFailed, "key", key)?;

        let output = handle
            .client()
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .instrument(tracing::debug_span!("send-delete-object"))
            .await
            .map_err(error::from_sdk(ErrorKind::DeleteFailed))?;

        Ok(DeleteResponse {
            bucket_name: bucket.to_owned(),
            key: key.to_owned(),
            version_id: output.version_id().map(str::to_owned),
            delete_marker: output.delete_marker().unwrap_or_default(),
            metadata: ResponseMetadata::from_output(&output),
        })
    }
}

#[cfg(test)]
mod tests {
    use aws_sdk_s3::operation::delete_object::{DeleteObjectError, DeleteObjectOutput};
    use aws_smithy_mocks_experimental::{mock, mock_client, RuleMode};
    use aws_smithy_types::error::ErrorMetadata;

    use super::Delete;
    use crate::error::ErrorKind;
    use crate::operation::test_util::test_handle;

    #[tokio::test]
    async fn test_delete_object() {
        let rule = mock!(aws_sdk_s3::Client::delete_object)
            .match_requests(|r| r.bucket() == Some("test-bucket") && r.key() == Some("test-key"))
            .then_output(|| DeleteObjectOutput::builder().build());
        let client = mock_client!(aws_sdk_s3, RuleMode::Sequential, &[&rule]);
        let handle = test_handle(client);

        let resp = Delete::orchestrate(&handle, "test-bucket", "test-key")
            .await
            .unwrap();
        assert_eq!("test-bucket", resp.bucket_name());
        assert_eq!("test-key", resp.key());
        assert!(!resp.delete_marker());
    }

    #[tokio::test]
    async fn test_delete_access_denied() {
        let rule = mock!(aws_sdk_s3::Client::delete_object).then_error(|| {
            DeleteObjectError::generic(ErrorMetadata::builder().code("AccessDenied").build())
        });
        let client = mock_client!(aws_sdk_s3, RuleMode::Sequential, &[&rule]);
        let handle = test_handle(client);

        let err = Delete::orchestrate(&handle, "test-bucket", "test-key")
            .await
            .unwrap_err();
        assert_eq!(&ErrorKind::DeleteFailed, err.kind());
        assert_eq!(Some("AccessDenied"), err.code());
    }

    #[tokio::test]
    async fn test_delete_empty_key() {
        let rule = mock!(aws_sdk_s3::Client::delete_object)
            .then_output(|| DeleteObjectOutput::builder().build());
        let client = mock_client!(aws_sdk_s3, RuleMode::Sequential, &[&rule]);
        let handle = test_handle(client);

        let err = Delete::orchestrate(&handle, "test-bucket", "")
            .await
            .unwrap_err();
        assert_eq!(&ErrorKind::DeleteFailed, err.kind());
        assert_eq!(0, rule.num_calls());
    }
}
