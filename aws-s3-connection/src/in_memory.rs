/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Process-local implementation of the [`S3Connection`] trait.

mod listing;

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::SystemTime;

use async_trait::async_trait;
use aws_smithy_types::DateTime;
use bytes::Bytes;
use tokio::sync::RwLock;

use crate::connection::S3Connection;
use crate::error::{self, Error, ErrorKind};
use crate::io::InputStream;
use crate::operation::create_bucket::CreateBucketResponse;
use crate::operation::delete::DeleteResponse;
use crate::operation::delete_bucket::DeleteBucketResponse;
use crate::operation::get::{ConditionalGetResponse, GetResponse, NotModifiedResponse};
use crate::operation::head::HeadResponse;
use crate::operation::list_all_buckets::ListAllBucketsResponse;
use crate::operation::list_bucket::{ListBucketInput, ListBucketResponse};
use crate::operation::put::PutResponse;
use crate::operation::require_non_empty;
use crate::types::{Bucket, ObjectMetadata, ObjectSummary, Owner, ResponseMetadata};
use crate::DEFAULT_MAX_KEYS;

const OWNER_ID: &str = "in-memory-owner";
const OWNER_DISPLAY_NAME: &str = "in-memory";
const STORAGE_CLASS: &str = "STANDARD";

/// An object as stored in memory
#[derive(Debug, Clone)]
pub(crate) struct StoredObject {
    data: Bytes,
    e_tag: String,
    content_type: Option<String>,
    last_modified: DateTime,
}

impl StoredObject {
    pub(crate) fn new(data: Bytes, content_type: Option<String>) -> Self {
        let e_tag = format!("\"{:x}\"", md5::compute(&data));
        Self {
            data,
            e_tag,
            content_type,
            last_modified: DateTime::from(SystemTime::now()),
        }
    }

    fn summary(&self, key: &str) -> ObjectSummary {
        ObjectSummary {
            key: key.to_owned(),
            size: self.data.len() as u64,
            e_tag: Some(self.e_tag.clone()),
            last_modified: Some(self.last_modified),
            storage_class: Some(STORAGE_CLASS.to_owned()),
        }
    }

    fn metadata(&self) -> ObjectMetadata {
        ObjectMetadata {
            e_tag: Some(self.e_tag.clone()),
            content_type: self.content_type.clone(),
            content_length: self.data.len() as u64,
            last_modified: Some(self.last_modified),
            user_metadata: Default::default(),
        }
    }
}

#[derive(Debug)]
struct StoredBucket {
    creation_date: DateTime,
    objects: BTreeMap<String, StoredObject>,
}

/// A connection keeping buckets and objects in process memory.
///
/// `InMemoryConnection` follows the same contract as the SDK-backed
/// [`Client`](crate::Client): bucket names are validated, non-empty buckets can not be
/// deleted, entity tags are the quoted hex MD5 digest of the body and every response carries a
/// fresh request ID. It is intended for tests and local development.
///
/// Share an instance between tasks by wrapping it in an [`Arc`](std::sync::Arc).
///
/// # Examples
///
/// ```
/// use aws_s3_connection::in_memory::InMemoryConnection;
/// use aws_s3_connection::S3Connection;
///
/// # async fn example() -> Result<(), aws_s3_connection::error::Error> {
/// let conn = InMemoryConnection::new();
/// conn.create_bucket("test-bucket").await?;
/// conn.put_bytes("test-bucket", "key", "value".into(), "text/plain", 5).await?;
///
/// let object = conn.get("test-bucket", "key").await?;
/// assert_eq!(&b"value"[..], object.body());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct InMemoryConnection {
    buckets: RwLock<BTreeMap<String, StoredBucket>>,
    offline: AtomicBool,
}

impl InMemoryConnection {
    /// Create a connection with no buckets
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with [`ErrorKind::ConnectionFailed`] until reset
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn check_online(&self) -> Result<(), Error> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(Error::new(
                ErrorKind::ConnectionFailed,
                "connection is offline",
            ));
        }
        Ok(())
    }
}

fn new_request_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

fn response_metadata() -> ResponseMetadata {
    ResponseMetadata {
        request_id: Some(new_request_id()),
        extended_request_id: None,
        date: Some(DateTime::from(SystemTime::now())),
    }
}

/// A rejected request, shaped like the service's error responses
fn service_error(kind: ErrorKind, code: &'static str, status: u16, message: String) -> Error {
    Error::new(kind, message)
        .with_code(code)
        .with_status(status)
        .with_request_id(Some(new_request_id()))
}

fn no_such_bucket(kind: ErrorKind, bucket: &str) -> Error {
    service_error(
        kind,
        "NoSuchBucket",
        404,
        format!("the bucket {bucket} does not exist"),
    )
}

fn no_such_key(kind: ErrorKind, code: &'static str, key: &str) -> Error {
    service_error(kind, code, 404, format!("the key {key} does not exist"))
}

/// Bucket naming rules: 3 to 63 characters of lowercase letters, digits, `.` and `-`,
/// beginning and ending with a letter or digit
fn is_valid_bucket_name(name: &str) -> bool {
    let alnum = |c: u8| c.is_ascii_lowercase() || c.is_ascii_digit();
    let bytes = name.as_bytes();
    (3..=63).contains(&bytes.len())
        && bytes
            .iter()
            .all(|&c| alnum(c) || c == b'.' || c == b'-')
        && bytes.first().copied().is_some_and(alnum)
        && bytes.last().copied().is_some_and(alnum)
}

fn same_e_tag(current: &str, other: &str) -> bool {
    other == "*" || current.trim_matches('"') == other.trim_matches('"')
}

#[async_trait]
impl S3Connection for InMemoryConnection {
    async fn create_bucket(&self, bucket: &str) -> Result<CreateBucketResponse, Error> {
        self.check_online()?;
        if !is_valid_bucket_name(bucket) {
            return Err(service_error(
                ErrorKind::BucketCreateFailed,
                "InvalidBucketName",
                400,
                format!("the bucket name {bucket:?} is not valid"),
            ));
        }

        let mut buckets = self.buckets.write().await;
        if buckets.contains_key(bucket) {
            return Err(service_error(
                ErrorKind::BucketCreateFailed,
                "BucketAlreadyOwnedByYou",
                409,
                format!("the bucket {bucket} already exists"),
            ));
        }
        buckets.insert(
            bucket.to_owned(),
            StoredBucket {
                creation_date: DateTime::from(SystemTime::now()),
                objects: BTreeMap::new(),
            },
        );
        tracing::debug!("created bucket {bucket}");

        Ok(CreateBucketResponse {
            bucket_name: bucket.to_owned(),
            location: Some(format!("/{bucket}")),
            metadata: response_metadata(),
        })
    }

    async fn list_all_buckets(&self) -> Result<ListAllBucketsResponse, Error> {
        self.check_online()?;
        let buckets = self.buckets.read().await;
        Ok(ListAllBucketsResponse {
            buckets: buckets
                .iter()
                .map(|(name, bucket)| Bucket {
                    name: name.clone(),
                    creation_date: Some(bucket.creation_date),
                })
                .collect(),
            owner: Some(Owner {
                id: Some(OWNER_ID.to_owned()),
                display_name: Some(OWNER_DISPLAY_NAME.to_owned()),
            }),
            metadata: response_metadata(),
        })
    }

    async fn delete_bucket(&self, bucket: &str) -> Result<DeleteBucketResponse, Error> {
        self.check_online()?;
        let mut buckets = self.buckets.write().await;
        let stored = buckets
            .get(bucket)
            .ok_or_else(|| no_such_bucket(ErrorKind::BucketDeleteFailed, bucket))?;
        if !stored.objects.is_empty() {
            return Err(service_error(
                ErrorKind::BucketDeleteFailed,
                "BucketNotEmpty",
                409,
                format!("the bucket {bucket} is not empty"),
            ));
        }
        buckets.remove(bucket);
        tracing::debug!("deleted bucket {bucket}");

        Ok(DeleteBucketResponse {
            bucket_name: bucket.to_owned(),
            metadata: response_metadata(),
        })
    }

    async fn list_bucket_with(&self, input: ListBucketInput) -> Result<ListBucketResponse, Error> {
        self.check_online()?;
        let buckets = self.buckets.read().await;
        let stored = buckets
            .get(&input.bucket)
            .ok_or_else(|| no_such_bucket(ErrorKind::ListFailed, &input.bucket))?;

        let max_keys = input.max_keys.clamp(1, DEFAULT_MAX_KEYS);
        let page = listing::list_page(
            &stored.objects,
            input.prefix().unwrap_or_default(),
            input.marker(),
            input.delimiter(),
            max_keys as usize,
        );

        Ok(ListBucketResponse {
            bucket_name: input.bucket,
            prefix: input.prefix,
            marker: input.marker,
            delimiter: input.delimiter,
            max_keys,
            is_truncated: page.is_truncated,
            next_marker: page.next_marker,
            objects: page.objects,
            common_prefixes: page.common_prefixes,
            metadata: response_metadata(),
        })
    }

    async fn put_stream(
        &self,
        bucket: &str,
        key: &str,
        stream: InputStream,
        content_type: &str,
        size: Option<u64>,
    ) -> Result<PutResponse, Error> {
        require_non_empty(ErrorKind::PutFailed, "bucket name", bucket)?;
        require_non_empty(ErrorKind::PutFailed, "key", key)?;
        self.check_online()?;

        let (body, content_length) = stream.into_body(size).await?;
        let data = body
            .collect()
            .await
            .map_err(error::from_kind(ErrorKind::PutFailed))?
            .into_bytes();
        let content_type = Some(content_type)
            .filter(|c| !c.is_empty())
            .map(str::to_owned);
        let object = StoredObject::new(data, content_type);
        let e_tag = object.e_tag.clone();

        let mut buckets = self.buckets.write().await;
        let stored = buckets
            .get_mut(bucket)
            .ok_or_else(|| no_such_bucket(ErrorKind::PutFailed, bucket))?;
        stored.objects.insert(key.to_owned(), object);
        tracing::trace!("stored {content_length} bytes at {bucket}/{key}");

        Ok(PutResponse {
            bucket_name: bucket.to_owned(),
            key: key.to_owned(),
            e_tag: Some(e_tag),
            version_id: None,
            content_length,
            metadata: response_metadata(),
        })
    }

    async fn get(&self, bucket: &str, key: &str) -> Result<GetResponse, Error> {
        self.check_online()?;
        let buckets = self.buckets.read().await;
        let object = buckets
            .get(bucket)
            .ok_or_else(|| no_such_bucket(ErrorKind::GetFailed, bucket))?
            .objects
            .get(key)
            .ok_or_else(|| no_such_key(ErrorKind::GetFailed, "NoSuchKey", key))?;

        Ok(GetResponse {
            bucket_name: bucket.to_owned(),
            key: key.to_owned(),
            body: object.data.clone(),
            object: object.metadata(),
            version_id: None,
            metadata: response_metadata(),
        })
    }

    async fn get_if_changed(
        &self,
        bucket: &str,
        key: &str,
        old_e_tag: &str,
    ) -> Result<ConditionalGetResponse, Error> {
        self.check_online()?;
        let buckets = self.buckets.read().await;
        let object = buckets
            .get(bucket)
            .ok_or_else(|| no_such_bucket(ErrorKind::GetFailed, bucket))?
            .objects
            .get(key)
            .ok_or_else(|| no_such_key(ErrorKind::GetFailed, "NoSuchKey", key))?;

        if same_e_tag(&object.e_tag, old_e_tag) {
            return Ok(ConditionalGetResponse::NotModified(NotModifiedResponse {
                bucket_name: bucket.to_owned(),
                key: key.to_owned(),
                e_tag: object.e_tag.clone(),
                metadata: response_metadata(),
            }));
        }

        Ok(ConditionalGetResponse::Modified(GetResponse {
            bucket_name: bucket.to_owned(),
            key: key.to_owned(),
            body: object.data.clone(),
            object: object.metadata(),
            version_id: None,
            metadata: response_metadata(),
        }))
    }

    async fn delete(&self, bucket: &str, key: &str) -> Result<DeleteResponse, Error> {
        require_non_empty(ErrorKind::DeleteFailed, "key", key)?;
        self.check_online()?;
        let mut buckets = self.buckets.write().await;
        let stored = buckets
            .get_mut(bucket)
            .ok_or_else(|| no_such_bucket(ErrorKind::DeleteFailed, bucket))?;
        // deleting a missing key succeeds, as it does against the service
        if stored.objects.remove(key).is_some() {
            tracing::trace!("deleted {bucket}/{key}");
        }

        Ok(DeleteResponse {
            bucket_name: bucket.to_owned(),
            key: key.to_owned(),
            version_id: None,
            delete_marker: false,
            metadata: response_metadata(),
        })
    }

    async fn head(&self, bucket: &str, key: &str) -> Result<HeadResponse, Error> {
        self.check_online()?;
        let buckets = self.buckets.read().await;
        // HEAD responses carry no body, so the service can only report a generic code
        let object = buckets
            .get(bucket)
            .and_then(|b| b.objects.get(key))
            .ok_or_else(|| no_such_key(ErrorKind::GetFailed, "NotFound", key))?;

        Ok(HeadResponse {
            bucket_name: bucket.to_owned(),
            key: key.to_owned(),
            object: object.metadata(),
            version_id: None,
            metadata: response_metadata(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{is_valid_bucket_name, InMemoryConnection};
    use crate::connection::S3Connection;
    use crate::error::ErrorKind;
    use crate::io::InputStream;
    use crate::types::S3Response;

    #[test]
    fn test_bucket_name_rules() {
        for name in ["abc", "my-bucket", "logs.example.com", "a1b2c3"] {
            assert!(is_valid_bucket_name(name), "{name} should be valid");
        }
        let too_long = "a".repeat(64);
        for name in ["", "ab", "My-Bucket", "-bucket", "bucket.", "under_score", too_long.as_str()] {
            assert!(!is_valid_bucket_name(name), "{name} should be invalid");
        }
    }

    #[tokio::test]
    async fn test_create_bucket_twice() {
        let conn = InMemoryConnection::new();
        let resp = conn.create_bucket("test-bucket").await.unwrap();
        assert_eq!("test-bucket", resp.bucket_name());
        assert!(resp.request_id().is_some());

        let err = conn.create_bucket("test-bucket").await.unwrap_err();
        assert_eq!(&ErrorKind::BucketCreateFailed, err.kind());
        assert_eq!(Some("BucketAlreadyOwnedByYou"), err.code());
    }

    #[tokio::test]
    async fn test_create_bucket_invalid_name() {
        let conn = InMemoryConnection::new();
        for name in ["", "UPPER"] {
            let err = conn.create_bucket(name).await.unwrap_err();
            assert_eq!(&ErrorKind::BucketCreateFailed, err.kind());
            assert_eq!(Some("InvalidBucketName"), err.code());
        }
    }

    #[tokio::test]
    async fn test_delete_bucket_rules() {
        let conn = InMemoryConnection::new();
        let err = conn.delete_bucket("missing").await.unwrap_err();
        assert_eq!(&ErrorKind::BucketDeleteFailed, err.kind());
        assert!(err.is_not_found());

        conn.create_bucket("test-bucket").await.unwrap();
        conn.put_bytes("test-bucket", "k", "v".into(), "", 1)
            .await
            .unwrap();
        let err = conn.delete_bucket("test-bucket").await.unwrap_err();
        assert_eq!(Some("BucketNotEmpty"), err.code());

        conn.delete("test-bucket", "k").await.unwrap();
        conn.delete_bucket("test-bucket").await.unwrap();
        assert!(conn.list_all_buckets().await.unwrap().buckets().is_empty());
    }

    #[tokio::test]
    async fn test_e_tag_is_md5_of_body() {
        let conn = InMemoryConnection::new();
        conn.create_bucket("test-bucket").await.unwrap();
        let resp = conn
            .put_stream(
                "test-bucket",
                "hello.txt",
                InputStream::from_static(b"hello world"),
                "text/plain",
                None,
            )
            .await
            .unwrap();
        assert_eq!(Some("\"5eb63bbbe01eeed093cb22bb8f5acdc3\""), resp.e_tag());

        let head = conn.head("test-bucket", "hello.txt").await.unwrap();
        assert_eq!(resp.e_tag(), head.e_tag());
        assert_eq!(Some("text/plain"), head.content_type());
        assert_eq!(11, head.content_length());
    }

    #[tokio::test]
    async fn test_put_into_missing_bucket() {
        let conn = InMemoryConnection::new();
        let err = conn
            .put_bytes("missing", "k", "v".into(), "", 1)
            .await
            .unwrap_err();
        assert_eq!(&ErrorKind::PutFailed, err.kind());
        assert_eq!(Some("NoSuchBucket"), err.code());
    }

    #[tokio::test]
    async fn test_conditional_get_accepts_unquoted_e_tag() {
        let conn = InMemoryConnection::new();
        conn.create_bucket("test-bucket").await.unwrap();
        conn.put_bytes("test-bucket", "k", "hello world".into(), "", 11)
            .await
            .unwrap();

        let resp = conn
            .get_if_changed("test-bucket", "k", "5eb63bbbe01eeed093cb22bb8f5acdc3")
            .await
            .unwrap();
        assert!(!resp.is_modified());
    }

    #[tokio::test]
    async fn test_offline() {
        let conn = InMemoryConnection::new();
        conn.create_bucket("test-bucket").await.unwrap();

        conn.set_offline(true);
        let err = conn.list_all_buckets().await.unwrap_err();
        assert_eq!(&ErrorKind::ConnectionFailed, err.kind());
        let err = conn.get("test-bucket", "k").await.unwrap_err();
        assert_eq!(&ErrorKind::ConnectionFailed, err.kind());

        conn.set_offline(false);
        assert_eq!(1, conn.list_all_buckets().await.unwrap().buckets().len());
    }
}
