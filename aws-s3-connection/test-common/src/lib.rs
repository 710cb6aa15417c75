/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::io::Write;
use std::iter;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::OnceLock;

use aws_s3_connection::error::Error;
use aws_s3_connection::in_memory::InMemoryConnection;
use aws_s3_connection::S3Connection;
use bytes::Bytes;
use uuid::Uuid;

/// Random alphanumeric payload of `size` bytes
pub fn rand_data(size: usize) -> Bytes {
    iter::repeat_with(fastrand::alphanumeric)
        .take(size)
        .map(|x| x as u8)
        .collect::<Vec<_>>()
        .into()
}

// Generate UUID for the process to be used in tests to avoid conflicts between concurrent tests runs.
pub fn global_uuid_str() -> &'static str {
    static UUID_STR: OnceLock<String> = OnceLock::new();
    UUID_STR.get_or_init(|| Uuid::new_v4().to_string())
}

/// A valid bucket name that is unique within this process and across concurrent runs
pub fn unique_bucket_name(prefix: &str) -> String {
    static COUNTER: AtomicUsize = AtomicUsize::new(0);
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}-{}-{n}", &global_uuid_str()[..8])
}

/// Write `contents` to a new temporary file, removed when the handle drops
pub fn create_test_file(contents: &[u8]) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents).unwrap();
    file.flush().unwrap();
    file
}

/// An in-memory connection holding `bucket` with one small object per key
pub async fn seeded_connection(bucket: &str, keys: &[&str]) -> InMemoryConnection {
    let conn = InMemoryConnection::new();
    conn.create_bucket(bucket).await.unwrap();
    for key in keys {
        conn.put_bytes(bucket, key, Bytes::from(key.to_string()), "text/plain", key.len() as u64)
            .await
            .unwrap();
    }
    conn
}

/// Every entry reached by following `next_marker` from the start of a listing
#[derive(Debug, Default)]
pub struct Listing {
    pub keys: Vec<String>,
    pub common_prefixes: Vec<String>,
    pub pages: usize,
}

/// Page through a bucket with at most `max_keys` entries per request
pub async fn list_to_end<C: S3Connection>(
    conn: &C,
    bucket: &str,
    prefix: &str,
    delimiter: &str,
    max_keys: i32,
) -> Result<Listing, Error> {
    let mut listing = Listing::default();
    let mut marker = String::new();
    loop {
        let page = conn
            .list_bucket_delimited(bucket, prefix, &marker, delimiter, max_keys)
            .await?;
        listing.pages += 1;
        assert!(
            page.objects().len() + page.common_prefixes().len() <= max_keys as usize,
            "page exceeds max_keys"
        );
        listing
            .keys
            .extend(page.objects().iter().map(|o| o.key().to_owned()));
        listing
            .common_prefixes
            .extend(page.common_prefixes().iter().cloned());

        match page.next_marker() {
            Some(next) if page.is_truncated() => marker = next.to_owned(),
            _ => return Ok(listing),
        }
    }
}
