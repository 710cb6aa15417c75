/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::collections::HashMap;

use aws_smithy_types::date_time::Format;
use aws_smithy_types::DateTime;

/// Request identifiers and service date returned with every successful response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseMetadata {
    pub(crate) request_id: Option<String>,
    pub(crate) extended_request_id: Option<String>,
    pub(crate) date: Option<DateTime>,
}

impl ResponseMetadata {
    pub(crate) fn new(request_id: Option<&str>, extended_request_id: Option<&str>) -> Self {
        Self {
            request_id: request_id.map(str::to_owned),
            extended_request_id: extended_request_id.map(str::to_owned),
            date: None,
        }
    }

    /// Set the date from an HTTP `Date` header value. Unparseable values leave it unset.
    pub(crate) fn with_date_header(mut self, date: Option<&str>) -> Self {
        self.date = date.and_then(|d| DateTime::from_str(d, Format::HttpDate).ok());
        self
    }

    /// Read the request ids off an SDK operation output
    pub(crate) fn from_output<O>(output: &O) -> Self
    where
        O: aws_sdk_s3::operation::RequestId + aws_sdk_s3::operation::RequestIdExt,
    {
        Self::new(output.request_id(), output.extended_request_id())
    }
}

/// Common accessors shared by all connection responses
pub trait S3Response {
    /// Request identifiers for the call that produced this response
    fn response_metadata(&self) -> &ResponseMetadata;

    /// The `x-amz-request-id` of the request
    fn request_id(&self) -> Option<&str> {
        self.response_metadata().request_id.as_deref()
    }

    /// The `x-amz-id-2` host identifier of the request
    fn extended_request_id(&self) -> Option<&str> {
        self.response_metadata().extended_request_id.as_deref()
    }

    /// Date the service produced the response, from its `Date` header.
    ///
    /// Only available when the raw response is kept, e.g. for
    /// [`NotModifiedResponse`](crate::operation::get::NotModifiedResponse) and every
    /// response of the in-memory connection.
    fn date(&self) -> Option<&DateTime> {
        self.response_metadata().date.as_ref()
    }
}

/// A bucket owned by the caller's account
#[derive(Debug, Clone, PartialEq)]
pub struct Bucket {
    pub(crate) name: String,
    pub(crate) creation_date: Option<DateTime>,
}

impl Bucket {
    /// The bucket name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Date the bucket was created
    pub fn creation_date(&self) -> Option<&DateTime> {
        self.creation_date.as_ref()
    }
}

/// Owner of the listed buckets
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Owner {
    pub(crate) id: Option<String>,
    pub(crate) display_name: Option<String>,
}

impl Owner {
    /// Canonical user ID of the owner
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Display name of the owner
    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }
}

/// A single entry of a bucket listing
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectSummary {
    pub(crate) key: String,
    pub(crate) size: u64,
    pub(crate) e_tag: Option<String>,
    pub(crate) last_modified: Option<DateTime>,
    pub(crate) storage_class: Option<String>,
}

impl ObjectSummary {
    /// The object key
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Size of the object in bytes
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Entity tag of the object
    pub fn e_tag(&self) -> Option<&str> {
        self.e_tag.as_deref()
    }

    /// Date the object was last modified
    pub fn last_modified(&self) -> Option<&DateTime> {
        self.last_modified.as_ref()
    }

    /// Storage class of the object (e.g. `STANDARD`)
    pub fn storage_class(&self) -> Option<&str> {
        self.storage_class.as_deref()
    }
}

/// Metadata describing a stored object
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectMetadata {
    pub(crate) e_tag: Option<String>,
    pub(crate) content_type: Option<String>,
    pub(crate) content_length: u64,
    pub(crate) last_modified: Option<DateTime>,
    pub(crate) user_metadata: HashMap<String, String>,
}

impl ObjectMetadata {
    /// Entity tag of the object
    pub fn e_tag(&self) -> Option<&str> {
        self.e_tag.as_deref()
    }

    /// Content type the object was stored with
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Size of the object in bytes
    pub fn content_length(&self) -> u64 {
        self.content_length
    }

    /// Date the object was last modified
    pub fn last_modified(&self) -> Option<&DateTime> {
        self.last_modified.as_ref()
    }

    /// User defined `x-amz-meta-*` metadata
    pub fn user_metadata(&self) -> &HashMap<String, String> {
        &self.user_metadata
    }
}

/// Convert an SDK content length into a size. Negative values are treated as unknown.
pub(crate) fn content_length(value: Option<i64>) -> u64 {
    value.and_then(|v| u64::try_from(v).ok()).unwrap_or_default()
}
