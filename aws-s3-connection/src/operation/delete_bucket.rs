/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use tracing::Instrument;

use crate::client::Handle;
use crate::error::{self, ErrorKind};
use crate::types::{ResponseMetadata, S3Response};

/// Response of a successful bucket deletion
#[derive(Debug, Clone)]
pub struct DeleteBucketResponse {
    pub(crate) bucket_name: String,
    pub(crate) metadata: ResponseMetadata,
}

impl DeleteBucketResponse {
    /// Name of the deleted bucket
    pub fn bucket_name(&self) -> &str {
        &self.bucket_name
    }
}

impl S3Response for DeleteBucketResponse {
    fn response_metadata(&self) -> &ResponseMetadata {
        &self.metadata
    }
}

/// Operation struct for bucket deletion
#[derive(Clone, Default, Debug)]
pub(crate) struct DeleteBucket;

impl DeleteBucket {
    pub(crate) async fn orchestrate(
        handle: &Handle,
        bucket: &str,
    ) -> Result<DeleteBucketResponse, error::Error> {
        super::require_non_empty(ErrorKind::BucketDeleteFailed, "bucket name", bucket)?;

        let output = handle
            .client()
            .delete_bucket()
            .bucket(bucket)
            .send()
            .instrument(tracing::debug_span!("send-delete-bucket"))
            .await
            .map_err(error::from_sdk(ErrorKind::BucketDeleteFailed))?;

        Ok(DeleteBucketResponse {
            bucket_name: bucket.to_owned(),
            metadata: ResponseMetadata::from_output(&output),
        })
    }
}

#[cfg(test)]
mod tests {
    use aws_sdk_s3::operation::delete_bucket::{DeleteBucketError, DeleteBucketOutput};
    use aws_smithy_mocks_experimental::{mock, mock_client, RuleMode};
    use aws_smithy_types::error::ErrorMetadata;

    use super::DeleteBucket;
    use crate::error::ErrorKind;
    use crate::operation::test_util::test_handle;

    #[tokio::test]
    async fn test_delete_bucket() {
        let rule = mock!(aws_sdk_s3::Client::delete_bucket)
            .match_requests(|r| r.bucket() == Some("test-bucket"))
            .then_output(|| DeleteBucketOutput::builder().build());
        let client = mock_client!(aws_sdk_s3, RuleMode::Sequential, &[&rule]);
        let handle = test_handle(client);

        let resp = DeleteBucket::orchestrate(&handle, "test-bucket")
            .await
            .unwrap();
        assert_eq!("test-bucket", resp.bucket_name());
    }

    #[tokio::test]
    async fn test_delete_bucket_not_empty() {
        let rule = mock!(aws_sdk_s3::Client::delete_bucket).then_error(|| {
            DeleteBucketError::generic(
                ErrorMetadata::builder()
                    .code("BucketNotEmpty")
                    .message("The bucket you tried to delete is not empty")
                    .build(),
            )
        });
        let client = mock_client!(aws_sdk_s3, RuleMode::Sequential, &[&rule]);
        let handle = test_handle(client);

        let err = DeleteBucket::orchestrate(&handle, "test-bucket")
            .await
            .unwrap_err();
        assert_eq!(&ErrorKind::BucketDeleteFailed, err.kind());
        assert_eq!(Some("BucketNotEmpty"), err.code());
        assert!(!err.is_not_found());
    }
}
