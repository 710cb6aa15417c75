/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use crate::error::{self, ErrorKind};
use crate::DEFAULT_MAX_KEYS;

/// Input type for listing one page of the objects in a bucket
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListBucketInput {
    pub(crate) bucket: String,
    pub(crate) prefix: Option<String>,
    pub(crate) marker: Option<String>,
    pub(crate) delimiter: Option<String>,
    pub(crate) max_keys: i32,
}

impl ListBucketInput {
    /// Creates a new builder-style object to manufacture [`ListBucketInput`].
    pub fn builder() -> ListBucketInputBuilder {
        ListBucketInputBuilder::default()
    }

    /// The bucket to list
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Only keys beginning with this prefix are listed
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Listing starts strictly after this key
    pub fn marker(&self) -> Option<&str> {
        self.marker.as_deref()
    }

    /// Character sequence used to group keys into common prefixes
    pub fn delimiter(&self) -> Option<&str> {
        self.delimiter.as_deref()
    }

    /// Maximum number of entries (keys plus common prefixes) in the page
    pub fn max_keys(&self) -> i32 {
        self.max_keys
    }
}

/// A builder for [`ListBucketInput`].
///
/// Empty strings are treated the same as unset values.
#[non_exhaustive]
#[derive(Debug, Clone, Default)]
pub struct ListBucketInputBuilder {
    pub(crate) bucket: Option<String>,
    pub(crate) prefix: Option<String>,
    pub(crate) marker: Option<String>,
    pub(crate) delimiter: Option<String>,
    pub(crate) max_keys: Option<i32>,
}

impl ListBucketInputBuilder {
    /// The bucket to list
    ///
    /// NOTE: A bucket is required.
    pub fn bucket(mut self, input: impl Into<String>) -> Self {
        self.bucket = Some(input.into());
        self
    }

    /// The bucket to list
    pub fn set_bucket(mut self, input: Option<String>) -> Self {
        self.bucket = input;
        self
    }

    /// Only list keys beginning with this prefix
    pub fn prefix(mut self, input: impl Into<String>) -> Self {
        self.prefix = Some(input.into());
        self
    }

    /// Only list keys beginning with this prefix
    pub fn set_prefix(mut self, input: Option<String>) -> Self {
        self.prefix = input;
        self
    }

    /// Start listing strictly after this key, usually the
    /// [`next_marker`](crate::operation::list_bucket::ListBucketResponse::next_marker) of the
    /// previous page
    pub fn marker(mut self, input: impl Into<String>) -> Self {
        self.marker = Some(input.into());
        self
    }

    /// Start listing strictly after this key
    pub fn set_marker(mut self, input: Option<String>) -> Self {
        self.marker = input;
        self
    }

    /// Group keys containing `delimiter` after the prefix into common prefixes
    pub fn delimiter(mut self, input: impl Into<String>) -> Self {
        self.delimiter = Some(input.into());
        self
    }

    /// Group keys containing `delimiter` after the prefix into common prefixes
    pub fn set_delimiter(mut self, input: Option<String>) -> Self {
        self.delimiter = input;
        self
    }

    /// Maximum number of entries in the page. Defaults to 1000, the most the service returns.
    pub fn max_keys(mut self, input: i32) -> Self {
        self.max_keys = Some(input);
        self
    }

    /// Maximum number of entries in the page
    pub fn set_max_keys(mut self, input: Option<i32>) -> Self {
        self.max_keys = input;
        self
    }

    /// Consumes the builder and constructs a [`ListBucketInput`].
    ///
    /// Fails with [`ErrorKind::ListFailed`] if the bucket is missing or `max_keys` is not
    /// positive.
    pub fn build(self) -> Result<ListBucketInput, error::Error> {
        let bucket = non_empty(self.bucket).ok_or_else(|| {
            error::invalid_input(ErrorKind::ListFailed, "bucket name must not be empty")
        })?;
        let max_keys = self.max_keys.unwrap_or(DEFAULT_MAX_KEYS);
        if max_keys <= 0 {
            return Err(error::invalid_input(
                ErrorKind::ListFailed,
                format!("max_keys must be positive, got {max_keys}"),
            ));
        }
        Ok(ListBucketInput {
            bucket,
            prefix: non_empty(self.prefix),
            marker: non_empty(self.marker),
            delimiter: non_empty(self.delimiter),
            max_keys,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::ListBucketInput;
    use crate::error::ErrorKind;

    #[test]
    fn test_defaults() {
        let input = ListBucketInput::builder()
            .bucket("test-bucket")
            .prefix("")
            .marker("")
            .build()
            .unwrap();
        assert_eq!("test-bucket", input.bucket());
        assert_eq!(None, input.prefix());
        assert_eq!(None, input.marker());
        assert_eq!(None, input.delimiter());
        assert_eq!(1000, input.max_keys());
    }

    #[test]
    fn test_missing_bucket() {
        let err = ListBucketInput::builder().prefix("a/").build().unwrap_err();
        assert_eq!(&ErrorKind::ListFailed, err.kind());
    }

    #[test]
    fn test_non_positive_max_keys() {
        for max_keys in [0, -1] {
            let err = ListBucketInput::builder()
                .bucket("test-bucket")
                .max_keys(max_keys)
                .build()
                .unwrap_err();
            assert_eq!(&ErrorKind::ListFailed, err.kind());
        }
    }
}
