/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

mod output;

/// Response types for retrieving objects
pub use output::{ConditionalGetResponse, GetResponse, NotModifiedResponse};

use aws_sdk_s3::error::SdkError;
use aws_sdk_s3::operation::get_object::{GetObjectError, GetObjectOutput};
use aws_sdk_s3::operation::RequestId;
use aws_smithy_runtime_api::http::Response;
use tracing::Instrument;

use crate::client::Handle;
use crate::error::{self, ErrorKind};
use crate::types::{content_length, ObjectMetadata, ResponseMetadata};

/// Operation struct for retrieving a single object
#[derive(Clone, Default, Debug)]
pub(crate) struct Get;

impl Get {
    /// Retrieve an object unconditionally
    pub(crate) async fn orchestrate(
        handle: &Handle,
        bucket: &str,
        key: &str,
    ) -> Result<GetResponse, error::Error> {
        validate(bucket, key)?;
        let output = send(handle, bucket, key, None)
            .await
            .map_err(error::from_sdk(ErrorKind::GetFailed))?;
        collect(handle, bucket, key, output).await
    }

    /// Retrieve an object only if its entity tag no longer matches `old_e_tag`
    pub(crate) async fn orchestrate_conditional(
        handle: &Handle,
        bucket: &str,
        key: &str,
        old_e_tag: &str,
    ) -> Result<ConditionalGetResponse, error::Error> {
        validate(bucket, key)?;
        match send(handle, bucket, key, Some(old_e_tag)).await {
            Ok(output) => Ok(ConditionalGetResponse::Modified(
                collect(handle, bucket, key, output).await?,
            )),
            Err(err) if error::is_not_modified(&err) => {
                tracing::debug!("object unchanged since entity tag {old_e_tag}");
                Ok(ConditionalGetResponse::NotModified(not_modified(
                    bucket, key, old_e_tag, &err,
                )))
            }
            Err(err) => Err(error::from_sdk(ErrorKind::GetFailed)(err)),
        }
    }
}

fn validate(bucket: &str, key: &str) -> Result<(), error::Error> {
    super::require_non_empty(ErrorKind::GetFailed, "bucket name", bucket)?;
    super::require_non_empty(ErrorKind::GetFailed, "key", key)
}

async fn send(
    handle: &Handle,
    bucket: &str,
    key: &str,
    if_none_match: Option<&str>,
) -> Result<GetObjectOutput, SdkError<GetObjectError, Response>> {
    handle
        .client()
        .get_object()
        .bucket(bucket)
        .key(key)
        .set_if_none_match(if_none_match.map(str::to_owned))
        .send()
        .instrument(tracing::debug_span!("send-get-object"))
        .await
}

/// Read the full body of a successful response
async fn collect(
    handle: &Handle,
    bucket: &str,
    key: &str,
    output: GetObjectOutput,
) -> Result<GetResponse, error::Error> {
    let metadata = ResponseMetadata::from_output(&output);
    let mut object = ObjectMetadata {
        e_tag: output.e_tag().map(str::to_owned),
        content_type: output.content_type().map(str::to_owned),
        content_length: content_length(output.content_length()),
        last_modified: output.last_modified().cloned(),
        user_metadata: output.metadata().cloned().unwrap_or_default(),
    };
    let version_id = output.version_id().map(str::to_owned);

    let body = output
        .body
        .collect()
        .await
        .map_err(error::from_kind(ErrorKind::GetFailed))?
        .into_bytes();
    if object.content_length == 0 {
        object.content_length = body.len() as u64;
    }
    handle.metrics.add_bytes_downloaded(body.len() as u64);

    Ok(GetResponse {
        bucket_name: bucket.to_owned(),
        key: key.to_owned(),
        body,
        object,
        version_id,
        metadata,
    })
}

fn not_modified(
    bucket: &str,
    key: &str,
    old_e_tag: &str,
    err: &SdkError<GetObjectError, Response>,
) -> NotModifiedResponse {
    let raw = err.raw_response();
    let e_tag = raw
        .and_then(|r| r.headers().get("etag"))
        .unwrap_or(old_e_tag)
        .to_owned();
    let extended_request_id = raw.and_then(|r| r.headers().get("x-amz-id-2"));
    let date = raw.and_then(|r| r.headers().get("date"));
    NotModifiedResponse {
        bucket_name: bucket.to_owned(),
        key: key.to_owned(),
        e_tag,
        metadata: ResponseMetadata::new(err.request_id(), extended_request_id)
            .with_date_header(date),
    }
}
