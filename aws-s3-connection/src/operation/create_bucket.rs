/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use aws_sdk_s3::types::{BucketLocationConstraint, CreateBucketConfiguration};
use tracing::Instrument;

use crate::client::Handle;
use crate::error::{self, ErrorKind};
use crate::types::{ResponseMetadata, S3Response};

/// Region that must not be sent as a location constraint
const DEFAULT_REGION: &str = "us-east-1";

/// Response of a successful bucket creation
#[derive(Debug, Clone)]
pub struct CreateBucketResponse {
    pub(crate) bucket_name: String,
    pub(crate) location: Option<String>,
    pub(crate) metadata: ResponseMetadata,
}

impl CreateBucketResponse {
    /// Name of the created bucket
    pub fn bucket_name(&self) -> &str {
        &self.bucket_name
    }

    /// Location of the created bucket (`/bucket` or a URL), as reported by the service
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }
}

impl S3Response for CreateBucketResponse {
    fn response_metadata(&self) -> &ResponseMetadata {
        &self.metadata
    }
}

/// Operation struct for bucket creation
#[derive(Clone, Default, Debug)]
pub(crate) struct CreateBucket;

impl CreateBucket {
    /// Create `bucket` in the region the client is configured for
    pub(crate) async fn orchestrate(
        handle: &Handle,
        bucket: &str,
    ) -> Result<CreateBucketResponse, error::Error> {
        super::require_non_empty(ErrorKind::BucketCreateFailed, "bucket name", bucket)?;

        let mut request = handle.client().create_bucket().bucket(bucket);
        if let Some(region) = handle.client().config().region() {
            if region.as_ref() != DEFAULT_REGION {
                tracing::trace!("creating bucket with location constraint {region}");
                request = request.create_bucket_configuration(
                    CreateBucketConfiguration::builder()
                        .location_constraint(BucketLocationConstraint::from(region.as_ref()))
                        .build(),
                );
            }
        }

        let output = request
            .send()
            .instrument(tracing::debug_span!("send-create-bucket"))
            .await
            .map_err(error::from_sdk(ErrorKind::BucketCreateFailed))?;

        Ok(CreateBucketResponse {
            bucket_name: bucket.to_owned(),
            location: output.location().map(str::to_owned),
            metadata: ResponseMetadata::from_output(&output),
        })
    }
}
