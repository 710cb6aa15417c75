/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::collections::HashMap;

use tracing::Instrument;

use crate::client::Handle;
use crate::error::{self, ErrorKind};
use crate::types::{content_length, ObjectMetadata, ResponseMetadata, S3Response};

/// Metadata of an object retrieved without its body
#[derive(Debug, Clone)]
pub struct HeadResponse {
    pub(crate) bucket_name: String,
    pub(crate) key: String,
    pub(crate) object: ObjectMetadata,
    pub(crate) version_id: Option<String>,
    pub(crate) metadata: ResponseMetadata,
}

impl HeadResponse {
    /// Bucket of the object
    pub fn bucket_name(&self) -> &str {
        &self.bucket_name
    }

    /// Key of the object
    pub fn key(&self) -> &str {
        &self.key
    }

    /// All metadata describing the object
    pub fn object_metadata(&self) -> &ObjectMetadata {
        &self.object
    }

    /// User defined `x-amz-meta-*` metadata
    pub fn user_metadata(&self) -> &HashMap<String, String> {
        self.object.user_metadata()
    }

    /// Size of the object in bytes
    pub fn content_length(&self) -> u64 {
        self.object.content_length()
    }

    /// Content type the object was stored with
    pub fn content_type(&self) -> Option<&str> {
        self.object.content_type()
    }

    /// Entity tag of the object
    pub fn e_tag(&self) -> Option<&str> {
        self.object.e_tag()
    }

    /// Version ID of the object if versioning is enabled on the bucket
    pub fn version_id(&self) -> Option<&str> {
        self.version_id.as_deref()
    }
}

impl S3Response for HeadResponse {
    fn response_metadata(&self) -> &ResponseMetadata {
        &self.metadata
    }
}

/// Operation struct for retrieving object metadata
#[derive(Clone, Default, Debug)]
pub(crate) struct Head;

impl Head {
    pub(crate) async fn orchestrate(
        handle: &Handle,
        bucket: &str,
        key: &str,
    ) -> Result<HeadResponse, error::Error> {
        super::require_non_empty(ErrorKind::GetFailed, "bucket name", bucket)?;
        super::require_non_empty(ErrorKind::GetFailed, "key", key)?;

        let output = handle
            .client()
            .head_object()
            .bucket(bucket)
            .key(key)
            .send()
            .instrument(tracing::debug_span!("send-head-object"))
            .await
            .map_err(error::from_sdk(ErrorKind::GetFailed))?;

        Ok(HeadResponse {
            bucket_name: bucket.to_owned(),
            key: key.to_owned(),
            object: ObjectMetadata {
                e_tag: output.e_tag().map(str::to_owned),
                content_type: output.content_type().map(str::to_owned),
                content_length: content_length(output.content_length()),
                last_modified: output.last_modified().cloned(),
                user_metadata: output.metadata().cloned().unwrap_or_default(),
            },
            version_id: output.version_id().map(str::to_owned),
            metadata: ResponseMetadata::from_output(&output),
        })
    }
}
