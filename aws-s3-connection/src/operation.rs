/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use crate::error::{self, ErrorKind};

/// Types for the create bucket operation
pub mod create_bucket;

/// Types for the list all buckets operation
pub mod list_all_buckets;

/// Types for the delete bucket operation
pub mod delete_bucket;

/// Types for the list bucket operation
pub mod list_bucket;

/// Types for the put object operation
pub mod put;

/// Types for the get object operations
pub mod get;

/// Types for the delete object operation
pub mod delete;

/// Types for the head object operation
pub mod head;

/// Refuse an empty bucket name or key before anything is sent
pub(crate) fn require_non_empty(
    kind: ErrorKind,
    field: &'static str,
    value: &str,
) -> Result<(), error::Error> {
    if value.is_empty() {
        return Err(error::invalid_input(kind, format!("{field} must not be empty")));
    }
    Ok(())
}
