/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::collections::BTreeSet;
use std::io::{Cursor, SeekFrom};
use std::sync::Arc;
use std::time::SystemTime;

use aws_s3_connection::error::ErrorKind;
use aws_s3_connection::in_memory::InMemoryConnection;
use aws_s3_connection::io::InputStream;
use aws_s3_connection::operation::get::ConditionalGetResponse;
use aws_s3_connection::operation::list_bucket::ListBucketInput;
use aws_s3_connection::types::S3Response;
use aws_s3_connection::S3Connection;
use aws_smithy_types::DateTime;
use test_common::{create_test_file, list_to_end, rand_data, seeded_connection, unique_bucket_name};
use tokio::io::AsyncSeekExt;

#[tokio::test]
async fn test_created_bucket_listed_exactly_once() {
    let conn = InMemoryConnection::new();
    let names: Vec<_> = (0..5).map(|_| unique_bucket_name("listed")).collect();
    for name in &names {
        conn.create_bucket(name).await.unwrap();
    }

    let resp = conn.list_all_buckets().await.unwrap();
    for name in &names {
        let count = resp.buckets().iter().filter(|b| b.name() == name).count();
        assert_eq!(1, count, "{name} listed {count} times");
    }
    let listed: Vec<_> = resp.buckets().iter().map(|b| b.name()).collect();
    let mut sorted = listed.clone();
    sorted.sort();
    assert_eq!(sorted, listed);
    assert!(resp.owner_id().is_some());
}

#[tokio::test]
async fn test_put_then_get_is_byte_identical() {
    let bucket = unique_bucket_name("roundtrip");
    let conn = InMemoryConnection::new();
    conn.create_bucket(&bucket).await.unwrap();

    for size in [0, 1, 1024, 64 * 1024 + 7] {
        let data = rand_data(size);
        let key = format!("objects/{size}");
        conn.put_bytes(&bucket, &key, data.clone(), "application/octet-stream", size as u64)
            .await
            .unwrap();

        let object = conn.get(&bucket, &key).await.unwrap();
        assert_eq!(&data, object.body());
        assert_eq!(size as u64, object.content_length());
        assert_eq!(Some("application/octet-stream"), object.content_type());

        let head = conn.head(&bucket, &key).await.unwrap();
        assert_eq!(size as u64, head.content_length());
        assert_eq!(object.e_tag(), head.e_tag());
    }
}

#[tokio::test]
async fn test_put_stream_sources() {
    let bucket = unique_bucket_name("streams");
    let conn = InMemoryConnection::new();
    conn.create_bucket(&bucket).await.unwrap();

    let file = create_test_file(b"contents of a file");
    conn.put_stream(&bucket, "file", InputStream::from_path(file.path()), "", None)
        .await
        .unwrap();
    assert_eq!(
        &b"contents of a file"[..],
        conn.get(&bucket, "file").await.unwrap().body()
    );

    let mut cursor = Cursor::new(b"skip:keep".to_vec());
    cursor.seek(SeekFrom::Start(5)).await.unwrap();
    let resp = conn
        .put_stream(&bucket, "seekable", InputStream::from_seekable_reader(cursor), "", None)
        .await
        .unwrap();
    assert_eq!(4, resp.content_length());
    assert_eq!(&b"keep"[..], conn.get(&bucket, "seekable").await.unwrap().body());

    conn.put_stream(
        &bucket,
        "reader",
        InputStream::from_reader(&b"forward only"[..]),
        "",
        Some(7),
    )
    .await
    .unwrap();
    assert_eq!(&b"forward"[..], conn.get(&bucket, "reader").await.unwrap().body());
}

#[tokio::test]
async fn test_unseekable_stream_without_size_stores_nothing() {
    let bucket = unique_bucket_name("unseekable");
    let conn = InMemoryConnection::new();
    conn.create_bucket(&bucket).await.unwrap();

    let err = conn
        .put_stream(&bucket, "key", InputStream::from_reader(&b"data"[..]), "", None)
        .await
        .unwrap_err();
    assert_eq!(&ErrorKind::PutFailed, err.kind());

    let err = conn.get(&bucket, "key").await.unwrap_err();
    assert!(err.is_not_found());
    assert!(conn.list_bucket(&bucket, "", "", 10).await.unwrap().objects().is_empty());
}

#[tokio::test]
async fn test_put_bytes_size_mismatch() {
    let bucket = unique_bucket_name("mismatch");
    let conn = InMemoryConnection::new();
    conn.create_bucket(&bucket).await.unwrap();

    let err = conn
        .put_bytes(&bucket, "key", "four".into(), "", 5)
        .await
        .unwrap_err();
    assert_eq!(&ErrorKind::PutFailed, err.kind());
    assert!(conn.get(&bucket, "key").await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_pagination_has_no_gaps_or_repeats() {
    let bucket = unique_bucket_name("pages");
    let keys: Vec<String> = (0..37).map(|i| format!("key-{i:03}")).collect();
    let key_refs: Vec<&str> = keys.iter().map(String::as_str).collect();
    let conn = seeded_connection(&bucket, &key_refs).await;

    for max_keys in [1, 2, 5, 36, 37, 1000] {
        let listing = list_to_end(&conn, &bucket, "", "", max_keys).await.unwrap();
        assert_eq!(keys, listing.keys, "max_keys = {max_keys}");
        let expected_pages = keys.len().div_ceil(max_keys as usize).max(1);
        assert_eq!(expected_pages, listing.pages, "max_keys = {max_keys}");
    }
}

#[tokio::test]
async fn test_delimited_pagination_has_no_gaps_or_repeats() {
    let bucket = unique_bucket_name("delimited");
    let keys = [
        "a.txt",
        "docs/guide.md",
        "docs/index.md",
        "img/1.png",
        "img/2.png",
        "img/raw/3.raw",
        "readme",
        "src/lib.rs",
        "src/main.rs",
        "z.txt",
    ];
    let conn = seeded_connection(&bucket, &keys).await;

    let full = list_to_end(&conn, &bucket, "", "/", 1000).await.unwrap();
    assert_eq!(vec!["a.txt", "readme", "z.txt"], full.keys);
    assert_eq!(vec!["docs/", "img/", "src/"], full.common_prefixes);

    for max_keys in [1, 2, 3, 4] {
        let paged = list_to_end(&conn, &bucket, "", "/", max_keys).await.unwrap();
        assert_eq!(full.keys, paged.keys, "max_keys = {max_keys}");
        assert_eq!(full.common_prefixes, paged.common_prefixes, "max_keys = {max_keys}");
    }

    let nested = list_to_end(&conn, &bucket, "img/", "/", 1).await.unwrap();
    assert_eq!(vec!["img/1.png", "img/2.png"], nested.keys);
    assert_eq!(vec!["img/raw/"], nested.common_prefixes);
}

#[tokio::test]
async fn test_listing_with_random_keys() {
    let bucket = unique_bucket_name("random");
    let conn = InMemoryConnection::new();
    conn.create_bucket(&bucket).await.unwrap();

    let mut expected = BTreeSet::new();
    for _ in 0..200 {
        let depth = fastrand::usize(1..4);
        let key = (0..depth)
            .map(|_| fastrand::choice(["a", "b", "c", "d"]).unwrap_or("a"))
            .collect::<Vec<_>>()
            .join("/");
        conn.put_bytes(&bucket, &key, "x".into(), "", 1).await.unwrap();
        expected.insert(key);
    }
    let expected: Vec<String> = expected.into_iter().collect();

    let max_keys = fastrand::i32(1..10);
    let listing = list_to_end(&conn, &bucket, "", "", max_keys).await.unwrap();
    assert_eq!(expected, listing.keys);

    let delimited = list_to_end(&conn, &bucket, "", "/", max_keys).await.unwrap();
    let entries = delimited.keys.len() + delimited.common_prefixes.len();
    let unique: BTreeSet<_> = delimited
        .keys
        .iter()
        .chain(delimited.common_prefixes.iter())
        .collect();
    assert_eq!(entries, unique.len());
}

#[tokio::test]
async fn test_list_bucket_response_echoes_request() {
    let bucket = unique_bucket_name("echo");
    let conn = seeded_connection(&bucket, &["p/1", "p/2", "p/3"]).await;

    let input = ListBucketInput::builder()
        .bucket(&bucket)
        .prefix("p/")
        .marker("p/1")
        .max_keys(1)
        .build()
        .unwrap();
    let page = conn.list_bucket_with(input).await.unwrap();
    assert_eq!(bucket, page.bucket_name());
    assert_eq!("p/", page.prefix());
    assert_eq!("p/1", page.marker());
    assert_eq!(1, page.max_keys());
    assert!(page.is_truncated());
    assert_eq!(Some("p/2"), page.next_marker());
    assert_eq!(Some("STANDARD"), page.objects()[0].storage_class());
}

#[tokio::test]
async fn test_list_invalid_max_keys() {
    let bucket = unique_bucket_name("maxkeys");
    let conn = seeded_connection(&bucket, &["k"]).await;

    let err = conn.list_bucket(&bucket, "", "", 0).await.unwrap_err();
    assert_eq!(&ErrorKind::ListFailed, err.kind());

    let err = conn.list_bucket("no-such-bucket", "", "", 10).await.unwrap_err();
    assert_eq!(&ErrorKind::ListFailed, err.kind());
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_max_keys_above_service_limit_is_clamped() {
    let bucket = unique_bucket_name("clamp");
    let conn = InMemoryConnection::new();
    conn.create_bucket(&bucket).await.unwrap();
    for i in 0..1001 {
        conn.put_bytes(&bucket, &format!("key-{i:04}"), "x".into(), "", 1)
            .await
            .unwrap();
    }

    let page = conn.list_bucket(&bucket, "", "", 5000).await.unwrap();
    assert_eq!(1000, page.max_keys());
    assert_eq!(1000, page.objects().len());
    assert!(page.is_truncated());
    assert_eq!(Some("key-0999"), page.next_marker());

    let rest = conn
        .list_bucket(&bucket, "", page.next_marker().unwrap(), 5000)
        .await
        .unwrap();
    assert_eq!(1, rest.objects().len());
    assert_eq!("key-1000", rest.objects()[0].key());
    assert!(!rest.is_truncated());
}

#[tokio::test]
async fn test_conditional_get() {
    let bucket = unique_bucket_name("conditional");
    let conn = InMemoryConnection::new();
    conn.create_bucket(&bucket).await.unwrap();
    let first = conn
        .put_bytes(&bucket, "doc", "version 1".into(), "text/plain", 9)
        .await
        .unwrap();
    let first_e_tag = first.e_tag().unwrap().to_owned();

    match conn.get_if_changed(&bucket, "doc", &first_e_tag).await.unwrap() {
        ConditionalGetResponse::NotModified(resp) => {
            assert_eq!(first_e_tag, resp.e_tag());
            assert!(resp.request_id().is_some());
        }
        other => panic!("expected not modified, got {other:?}"),
    }

    let second = conn
        .put_bytes(&bucket, "doc", "version 2!".into(), "text/plain", 10)
        .await
        .unwrap();
    assert_ne!(first.e_tag(), second.e_tag());

    let resp = conn.get_if_changed(&bucket, "doc", &first_e_tag).await.unwrap();
    let object = resp.into_modified().expect("object changed");
    assert_eq!(&b"version 2!"[..], object.body());
    assert_eq!(second.e_tag(), object.e_tag());
}

#[tokio::test]
async fn test_delete_then_get_is_not_found() {
    let bucket = unique_bucket_name("delete");
    let conn = seeded_connection(&bucket, &["gone"]).await;

    let resp = conn.delete(&bucket, "gone").await.unwrap();
    assert_eq!("gone", resp.key());

    let err = conn.get(&bucket, "gone").await.unwrap_err();
    assert_eq!(&ErrorKind::GetFailed, err.kind());
    assert!(err.is_not_found());

    let err = conn.head(&bucket, "gone").await.unwrap_err();
    assert_eq!(&ErrorKind::GetFailed, err.kind());
    assert!(err.is_not_found());

    // deleting again is not an error
    conn.delete(&bucket, "gone").await.unwrap();
}

#[tokio::test]
async fn test_each_response_has_fresh_request_id_and_date() {
    let bucket = unique_bucket_name("ids");
    let before = DateTime::from(SystemTime::now());
    let conn = seeded_connection(&bucket, &["k"]).await;

    let a = conn.head(&bucket, "k").await.unwrap();
    let b = conn.head(&bucket, "k").await.unwrap();
    assert!(a.request_id().is_some());
    assert_ne!(a.request_id(), b.request_id());

    let date = a.date().expect("date set");
    assert!(date.secs() >= before.secs());
    assert!(b.date().expect("date set") >= date);
}

#[tokio::test]
async fn test_shared_connection_concurrent_puts() {
    let bucket = unique_bucket_name("shared");
    let conn: Arc<dyn S3Connection> = Arc::new(InMemoryConnection::new());
    conn.create_bucket(&bucket).await.unwrap();

    let tasks: Vec<_> = (0..16)
        .map(|i| {
            let conn = conn.clone();
            let bucket = bucket.clone();
            tokio::spawn(async move {
                let data = rand_data(128);
                conn.put_bytes(&bucket, &format!("task-{i:02}"), data, "", 128)
                    .await
                    .unwrap();
            })
        })
        .collect();
    for task in tasks {
        task.await.unwrap();
    }

    let listing = list_to_end(&conn, &bucket, "task-", "", 5).await.unwrap();
    assert_eq!(16, listing.keys.len());
}
