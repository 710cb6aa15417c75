/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use crate::types::{ObjectSummary, ResponseMetadata, S3Response};

/// One page of a bucket listing
#[derive(Debug, Clone)]
pub struct ListBucketResponse {
    pub(crate) bucket_name: String,
    pub(crate) prefix: Option<String>,
    pub(crate) marker: Option<String>,
    pub(crate) delimiter: Option<String>,
    pub(crate) max_keys: i32,
    pub(crate) is_truncated: bool,
    pub(crate) next_marker: Option<String>,
    pub(crate) objects: Vec<ObjectSummary>,
    pub(crate) common_prefixes: Vec<String>,
    pub(crate) metadata: ResponseMetadata,
}

impl ListBucketResponse {
    /// Name of the listed bucket
    pub fn bucket_name(&self) -> &str {
        &self.bucket_name
    }

    /// Prefix the listing was restricted to (empty if none)
    pub fn prefix(&self) -> &str {
        self.prefix.as_deref().unwrap_or_default()
    }

    /// Marker the listing started after (empty if none)
    pub fn marker(&self) -> &str {
        self.marker.as_deref().unwrap_or_default()
    }

    /// Delimiter keys were grouped by, if any
    pub fn delimiter(&self) -> Option<&str> {
        self.delimiter.as_deref()
    }

    /// Maximum number of entries requested
    pub fn max_keys(&self) -> i32 {
        self.max_keys
    }

    /// True if more entries remain after this page
    pub fn is_truncated(&self) -> bool {
        self.is_truncated
    }

    /// Marker to pass to the next call to continue the listing.
    ///
    /// Only present when the page [is truncated](Self::is_truncated). This is the last key or
    /// common prefix of the page, whichever sorts last.
    pub fn next_marker(&self) -> Option<&str> {
        self.next_marker.as_deref()
    }

    /// Objects of this page in ascending key order
    pub fn objects(&self) -> &[ObjectSummary] {
        &self.objects
    }

    /// Distinct common prefixes of this page in ascending order
    pub fn common_prefixes(&self) -> &[String] {
        &self.common_prefixes
    }
}

impl S3Response for ListBucketResponse {
    fn response_metadata(&self) -> &ResponseMetadata {
        &self.metadata
    }
}
