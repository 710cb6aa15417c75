/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::collections::HashMap;

use aws_smithy_types::DateTime;
use bytes::Bytes;

use crate::types::{ObjectMetadata, ResponseMetadata, S3Response};

/// A retrieved object together with its metadata
#[derive(Debug, Clone)]
pub struct GetResponse {
    pub(crate) bucket_name: String,
    pub(crate) key: String,
    pub(crate) body: Bytes,
    pub(crate) object: ObjectMetadata,
    pub(crate) version_id: Option<String>,
    pub(crate) metadata: ResponseMetadata,
}

impl GetResponse {
    /// Bucket the object was read from
    pub fn bucket_name(&self) -> &str {
        &self.bucket_name
    }

    /// Key of the object
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Contents of the object
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Consume the response, returning the contents of the object
    pub fn into_body(self) -> Bytes {
        self.body
    }

    /// Size of the object in bytes
    pub fn content_length(&self) -> u64 {
        self.object.content_length
    }

    /// Content type the object was stored with
    pub fn content_type(&self) -> Option<&str> {
        self.object.content_type()
    }

    /// Entity tag of the object
    pub fn e_tag(&self) -> Option<&str> {
        self.object.e_tag()
    }

    /// Date the object was last modified
    pub fn last_modified(&self) -> Option<&DateTime> {
        self.object.last_modified()
    }

    /// User defined `x-amz-meta-*` metadata
    pub fn user_metadata(&self) -> &HashMap<String, String> {
        self.object.user_metadata()
    }

    /// Version ID of the object if versioning is enabled on the bucket
    pub fn version_id(&self) -> Option<&str> {
        self.version_id.as_deref()
    }

    /// All metadata describing the object
    pub fn object_metadata(&self) -> &ObjectMetadata {
        &self.object
    }
}

impl S3Response for GetResponse {
    fn response_metadata(&self) -> &ResponseMetadata {
        &self.metadata
    }
}

/// An object that was not retrieved because it is unchanged
#[derive(Debug, Clone)]
pub struct NotModifiedResponse {
    pub(crate) bucket_name: String,
    pub(crate) key: String,
    pub(crate) e_tag: String,
    pub(crate) metadata: ResponseMetadata,
}

impl NotModifiedResponse {
    /// Bucket of the object
    pub fn bucket_name(&self) -> &str {
        &self.bucket_name
    }

    /// Key of the object
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Current entity tag of the object, equal to the one the caller already has
    pub fn e_tag(&self) -> &str {
        &self.e_tag
    }
}

impl S3Response for NotModifiedResponse {
    fn response_metadata(&self) -> &ResponseMetadata {
        &self.metadata
    }
}

/// Outcome of a conditional get
#[derive(Debug, Clone)]
pub enum ConditionalGetResponse {
    /// The object changed and was retrieved
    Modified(GetResponse),
    /// The object still matches the entity tag the caller supplied
    NotModified(NotModifiedResponse),
}

impl ConditionalGetResponse {
    /// Returns true if the object changed and its contents were retrieved
    pub fn is_modified(&self) -> bool {
        matches!(self, ConditionalGetResponse::Modified(_))
    }

    /// The retrieved object, if it changed
    pub fn modified(&self) -> Option<&GetResponse> {
        match self {
            ConditionalGetResponse::Modified(resp) => Some(resp),
            ConditionalGetResponse::NotModified(_) => None,
        }
    }

    /// Consume the response, returning the retrieved object if it changed
    pub fn into_modified(self) -> Option<GetResponse> {
        match self {
            ConditionalGetResponse::Modified(resp) => Some(resp),
            ConditionalGetResponse::NotModified(_) => None,
        }
    }
}

impl S3Response for ConditionalGetResponse {
    fn response_metadata(&self) -> &ResponseMetadata {
        match self {
            ConditionalGetResponse::Modified(resp) => resp.response_metadata(),
            ConditionalGetResponse::NotModified(resp) => resp.response_metadata(),
        }
    }
}
