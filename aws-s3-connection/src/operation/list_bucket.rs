/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

mod input;
mod output;

/// Request type for listing the objects of a bucket
pub use input::{ListBucketInput, ListBucketInputBuilder};
/// Response type for listing the objects of a bucket
pub use output::ListBucketResponse;

use aws_sdk_s3::operation::list_objects::ListObjectsOutput;
use tracing::Instrument;

use crate::client::Handle;
use crate::error::{self, ErrorKind};
use crate::types::{content_length, ObjectSummary, ResponseMetadata};

/// Operation struct for listing one page of a bucket
#[derive(Clone, Default, Debug)]
pub(crate) struct ListBucket;

impl ListBucket {
    pub(crate) async fn orchestrate(
        handle: &Handle,
        input: ListBucketInput,
    ) -> Result<ListBucketResponse, error::Error> {
        let output = handle
            .client()
            .list_objects()
            .bucket(&input.bucket)
            .set_prefix(input.prefix.clone())
            .set_marker(input.marker.clone())
            .set_delimiter(input.delimiter.clone())
            .max_keys(input.max_keys)
            .send()
            .instrument(tracing::debug_span!("send-list-objects"))
            .await
            .map_err(error::from_sdk(ErrorKind::ListFailed))?;

        Ok(into_response(input, output))
    }
}

fn into_response(input: ListBucketInput, output: ListObjectsOutput) -> ListBucketResponse {
    let objects = output
        .contents()
        .iter()
        .filter_map(|obj| {
            Some(ObjectSummary {
                key: obj.key()?.to_owned(),
                size: content_length(obj.size()),
                e_tag: obj.e_tag().map(str::to_owned),
                last_modified: obj.last_modified().cloned(),
                storage_class: obj.storage_class().map(|c| c.as_str().to_owned()),
            })
        })
        .collect::<Vec<_>>();
    let common_prefixes = output
        .common_prefixes()
        .iter()
        .filter_map(|p| p.prefix().map(str::to_owned))
        .collect::<Vec<_>>();

    let is_truncated = output.is_truncated().unwrap_or_default();
    // The service only returns NextMarker when a delimiter was given
    let next_marker = if is_truncated {
        output
            .next_marker()
            .map(str::to_owned)
            .or_else(|| last_entry(&objects, &common_prefixes))
    } else {
        None
    };
    tracing::trace!(
        "listed {} objects and {} common prefixes, truncated: {is_truncated}",
        objects.len(),
        common_prefixes.len()
    );

    ListBucketResponse {
        bucket_name: input.bucket,
        prefix: input.prefix,
        marker: input.marker,
        delimiter: input.delimiter,
        max_keys: output.max_keys().unwrap_or(input.max_keys),
        is_truncated,
        next_marker,
        objects,
        common_prefixes,
        metadata: ResponseMetadata::from_output(&output),
    }
}

/// The greatest key or common prefix of a page
pub(crate) fn last_entry(objects: &[ObjectSummary], common_prefixes: &[String]) -> Option<String> {
    let last_key = objects.last().map(|o| o.key.as_str());
    let last_prefix = common_prefixes.last().map(String::as_str);
    last_key.max(last_prefix).map(str::to_owned)
}
