/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::{self, Error, ErrorKind};
use crate::io::InputStream;
use crate::operation::create_bucket::CreateBucketResponse;
use crate::operation::delete::DeleteResponse;
use crate::operation::delete_bucket::DeleteBucketResponse;
use crate::operation::get::{ConditionalGetResponse, GetResponse};
use crate::operation::head::HeadResponse;
use crate::operation::list_all_buckets::ListAllBucketsResponse;
use crate::operation::list_bucket::{ListBucketInput, ListBucketResponse};
use crate::operation::put::PutResponse;

/// Bucket and object operations of an Amazon S3 connection.
///
/// Every call is a single independent request. On success a dedicated response type is
/// returned; on failure an [`Error`] whose [`kind`](Error::kind) is either the operation's own
/// failure kind or [`ErrorKind::ConnectionFailed`]. Failures are never retried at this layer.
///
/// Implementations must be safe to call concurrently from multiple tasks.
#[async_trait]
pub trait S3Connection: Send + Sync + Debug {
    /// Create a bucket.
    ///
    /// Fails with [`ErrorKind::BucketCreateFailed`] if the name is empty, invalid or already taken.
    async fn create_bucket(&self, bucket: &str) -> Result<CreateBucketResponse, Error>;

    /// List all buckets owned by the caller's account.
    ///
    /// Fails with [`ErrorKind::ListFailed`].
    async fn list_all_buckets(&self) -> Result<ListAllBucketsResponse, Error>;

    /// Delete a bucket.
    ///
    /// Fails with [`ErrorKind::BucketDeleteFailed`] if the bucket is not empty or does not exist.
    async fn delete_bucket(&self, bucket: &str) -> Result<DeleteBucketResponse, Error>;

    /// List one page of the objects in a bucket as described by `input`.
    ///
    /// Fails with [`ErrorKind::ListFailed`].
    async fn list_bucket_with(&self, input: ListBucketInput) -> Result<ListBucketResponse, Error>;

    /// List one page of objects whose keys start with `prefix`, resuming strictly after
    /// `marker`, returning at most `max_keys` entries.
    ///
    /// An empty `prefix` matches every key and an empty `marker` starts from the first key.
    /// If the page is truncated, pass [`ListBucketResponse::next_marker`] as `marker` to fetch
    /// the next one.
    async fn list_bucket(
        &self,
        bucket: &str,
        prefix: &str,
        marker: &str,
        max_keys: i32,
    ) -> Result<ListBucketResponse, Error> {
        let input = ListBucketInput::builder()
            .bucket(bucket)
            .prefix(prefix)
            .marker(marker)
            .max_keys(max_keys)
            .build()?;
        self.list_bucket_with(input).await
    }

    /// Same as [`list_bucket`](S3Connection::list_bucket), additionally rolling up keys that
    /// contain `delimiter` after `prefix` into [common prefixes](ListBucketResponse::common_prefixes).
    async fn list_bucket_delimited(
        &self,
        bucket: &str,
        prefix: &str,
        marker: &str,
        delimiter: &str,
        max_keys: i32,
    ) -> Result<ListBucketResponse, Error> {
        let input = ListBucketInput::builder()
            .bucket(bucket)
            .prefix(prefix)
            .marker(marker)
            .delimiter(delimiter)
            .max_keys(max_keys)
            .build()?;
        self.list_bucket_with(input).await
    }

    /// Store the contents of `stream` under `key`.
    ///
    /// When `size` is `None` the length of the stream is probed before anything is sent, which
    /// fails with [`ErrorKind::PutFailed`] for streams that can not seek. An empty
    /// `content_type` leaves the content type unset.
    async fn put_stream(
        &self,
        bucket: &str,
        key: &str,
        stream: InputStream,
        content_type: &str,
        size: Option<u64>,
    ) -> Result<PutResponse, Error>;

    /// Store `body` under `key`.
    ///
    /// `size` is mandatory and must equal the length of `body`, otherwise the call fails with
    /// [`ErrorKind::PutFailed`] without sending anything.
    async fn put_bytes(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        content_type: &str,
        size: u64,
    ) -> Result<PutResponse, Error> {
        if body.len() as u64 != size {
            return Err(error::invalid_input(
                ErrorKind::PutFailed,
                format!("size {size} does not match the buffer length {}", body.len()),
            ));
        }
        self.put_stream(bucket, key, InputStream::from(body), content_type, Some(size))
            .await
    }

    /// Retrieve an object and its metadata.
    ///
    /// Fails with [`ErrorKind::GetFailed`], see [`Error::is_not_found`] for missing keys.
    async fn get(&self, bucket: &str, key: &str) -> Result<GetResponse, Error>;

    /// Retrieve an object only if its entity tag differs from `old_e_tag`.
    ///
    /// An unchanged object is a successful [`ConditionalGetResponse::NotModified`].
    async fn get_if_changed(
        &self,
        bucket: &str,
        key: &str,
        old_e_tag: &str,
    ) -> Result<ConditionalGetResponse, Error>;

    /// Delete an object.
    ///
    /// Fails with [`ErrorKind::DeleteFailed`].
    async fn delete(&self, bucket: &str, key: &str) -> Result<DeleteResponse, Error>;

    /// Retrieve the metadata of an object without its body.
    ///
    /// Fails with [`ErrorKind::GetFailed`], see [`Error::is_not_found`] for missing keys.
    async fn head(&self, bucket: &str, key: &str) -> Result<HeadResponse, Error>;
}

// Implement the trait for Arc<T> to allow sharing a connection, including `Arc<dyn S3Connection>`
#[async_trait]
impl<T> S3Connection for Arc<T>
where
    T: S3Connection + ?Sized,
{
    async fn create_bucket(&self, bucket: &str) -> Result<CreateBucketResponse, Error> {
        (**self).create_bucket(bucket).await
    }

    async fn list_all_buckets(&self) -> Result<ListAllBucketsResponse, Error> {
        (**self).list_all_buckets().await
    }

    async fn delete_bucket(&self, bucket: &str) -> Result<DeleteBucketResponse, Error> {
        (**self).delete_bucket(bucket).await
    }

    async fn list_bucket_with(&self, input: ListBucketInput) -> Result<ListBucketResponse, Error> {
        (**self).list_bucket_with(input).await
    }

    async fn put_stream(
        &self,
        bucket: &str,
        key: &str,
        stream: InputStream,
        content_type: &str,
        size: Option<u64>,
    ) -> Result<PutResponse, Error> {
        (**self)
            .put_stream(bucket, key, stream, content_type, size)
            .await
    }

    async fn get(&self, bucket: &str, key: &str) -> Result<GetResponse, Error> {
        (**self).get(bucket, key).await
    }

    async fn get_if_changed(
        &self,
        bucket: &str,
        key: &str,
        old_e_tag: &str,
    ) -> Result<ConditionalGetResponse, Error> {
        (**self).get_if_changed(bucket, key, old_e_tag).await
    }

    async fn delete(&self, bucket: &str, key: &str) -> Result<DeleteResponse, Error> {
        (**self).delete(bucket, key).await
    }

    async fn head(&self, bucket: &str, key: &str) -> Result<HeadResponse, Error> {
        (**self).head(bucket, key).await
    }
}
