/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Synchronous, blocking access to any [`S3Connection`].
//!
//! Each call blocks the calling thread until the underlying request completes or fails.
//! These methods must not be called from within an asynchronous runtime.

use std::future::Future;

use bytes::Bytes;
use tokio::runtime::Runtime;

use crate::connection::S3Connection;
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

/// A blocking facade owning a Tokio runtime and a connection.
///
/// `BlockingConnection` is `Send + Sync` when the wrapped connection is, and may be shared
/// across threads. Concurrent calls only block their own calling thread.
///
/// # Examples
///
/// ```
/// use aws_s3_connection::blocking::BlockingConnection;
/// use aws_s3_connection::in_memory::InMemoryConnection;
///
/// let conn = BlockingConnection::new(InMemoryConnection::new()).unwrap();
/// conn.create_bucket("test-bucket").unwrap();
/// conn.put_bytes("test-bucket", "key", "value".into(), "", 5).unwrap();
/// assert_eq!(1, conn.list_bucket("test-bucket", "", "", 10).unwrap().objects().len());
/// ```
#[derive(Debug)]
pub struct BlockingConnection<C> {
    runtime: Runtime,
    inner: C,
}

impl<C: S3Connection> BlockingConnection<C> {
    /// Wrap `inner`, starting a multi-threaded runtime to drive its requests.
    ///
    /// Fails with [`ErrorKind::ConnectionFailed`] if the runtime can not be started.
    pub fn new(inner: C) -> Result<Self, Error> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .thread_name("s3-connection-blocking")
            .build()
            .map_err(error::from_kind(ErrorKind::ConnectionFailed))?;
        Ok(Self::with_runtime(runtime, inner))
    }

    /// Wrap `inner`, driving its requests on an existing runtime
    pub fn with_runtime(runtime: Runtime, inner: C) -> Self {
        Self { runtime, inner }
    }

    /// The wrapped asynchronous connection
    pub fn inner(&self) -> &C {
        &self.inner
    }

    fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    /// See [`S3Connection::create_bucket`]
    pub fn create_bucket(&self, bucket: &str) -> Result<CreateBucketResponse, Error> {
        self.block_on(self.inner.create_bucket(bucket))
    }

    /// See [`S3Connection::list_all_buckets`]
    pub fn list_all_buckets(&self) -> Result<ListAllBucketsResponse, Error> {
        self.block_on(self.inner.list_all_buckets())
    }

    /// See [`S3Connection::delete_bucket`]
    pub fn delete_bucket(&self, bucket: &str) -> Result<DeleteBucketResponse, Error> {
        self.block_on(self.inner.delete_bucket(bucket))
    }

    /// See [`S3Connection::list_bucket_with`]
    pub fn list_bucket_with(&self, input: ListBucketInput) -> Result<ListBucketResponse, Error> {
        self.block_on(self.inner.list_bucket_with(input))
    }

    /// See [`S3Connection::list_bucket`]
    pub fn list_bucket(
        &self,
        bucket: &str,
        prefix: &str,
        marker: &str,
        max_keys: i32,
    ) -> Result<ListBucketResponse, Error> {
        self.block_on(self.inner.list_bucket(bucket, prefix, marker, max_keys))
    }

    /// See [`S3Connection::list_bucket_delimited`]
    pub fn list_bucket_delimited(
        &self,
        bucket: &str,
        prefix: &str,
        marker: &str,
        delimiter: &str,
        max_keys: i32,
    ) -> Result<ListBucketResponse, Error> {
        self.block_on(
            self.inner
                .list_bucket_delimited(bucket, prefix, marker, delimiter, max_keys),
        )
    }

    /// See [`S3Connection::put_stream`]
    pub fn put_stream(
        &self,
        bucket: &str,
        key: &str,
        stream: InputStream,
        content_type: &str,
        size: Option<u64>,
    ) -> Result<PutResponse, Error> {
        self.block_on(
            self.inner
                .put_stream(bucket, key, stream, content_type, size),
        )
    }

    /// See [`S3Connection::put_bytes`]
    pub fn put_bytes(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        content_type: &str,
        size: u64,
    ) -> Result<PutResponse, Error> {
        self.block_on(self.inner.put_bytes(bucket, key, body, content_type, size))
    }

    /// See [`S3Connection::get`]
    pub fn get(&self, bucket: &str, key: &str) -> Result<GetResponse, Error> {
        self.block_on(self.inner.get(bucket, key))
    }

    /// See [`S3Connection::get_if_changed`]
    pub fn get_if_changed(
        &self,
        bucket: &str,
        key: &str,
        old_e_tag: &str,
    ) -> Result<ConditionalGetResponse, Error> {
        self.block_on(self.inner.get_if_changed(bucket, key, old_e_tag))
    }

    /// See [`S3Connection::delete`]
    pub fn delete(&self, bucket: &str, key: &str) -> Result<DeleteResponse, Error> {
        self.block_on(self.inner.delete(bucket, key))
    }

    /// See [`S3Connection::head`]
    pub fn head(&self, bucket: &str, key: &str) -> Result<HeadResponse, Error> {
        self.block_on(self.inner.head(bucket, key))
    }
}
