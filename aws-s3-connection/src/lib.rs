/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

/* Automatically managed default lints */
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
/* End of automatically managed default lints */
#![warn(
    missing_debug_implementations,
    missing_docs,
    rustdoc::missing_crate_level_docs,
    unreachable_pub,
    rust_2018_idioms
)]

//! A typed connection to Amazon S3 for bucket and object operations.
//!
//! Each operation on an [`S3Connection`] maps onto a single Amazon S3 [service API] call and
//! returns a dedicated, immutable response type carrying exactly the metadata relevant to that
//! operation, or an [`Error`](crate::error::Error) tagged with an
//! [`ErrorKind`](crate::error::ErrorKind).
//!
//! [service API]: https://docs.aws.amazon.com/AmazonS3/latest/API/API_Operations_Amazon_Simple_Storage_Service.html
//!
//! # Examples
//!
//! Load the default configuration:
//!
//! ```no_run
//! # async fn example() {
//! let config = aws_s3_connection::from_env().load().await;
//! let client = aws_s3_connection::Client::new(config);
//! # }
//! ```
//!
//! Store an object and read it back:
//!
//! ```no_run
//! use aws_s3_connection::S3Connection;
//!
//! # async fn example() -> Result<(), aws_s3_connection::error::Error> {
//! let config = aws_s3_connection::from_env()
//!     .credentials("AKIDEXAMPLE", "secret")
//!     .load()
//!     .await;
//! let client = aws_s3_connection::Client::new(config);
//!
//! client
//!     .put_bytes("my-bucket", "greeting.txt", "hello".into(), "text/plain", 5)
//!     .await?;
//!
//! let object = client.get("my-bucket", "greeting.txt").await?;
//! assert_eq!(&b"hello"[..], object.body());
//! # Ok(())
//! # }
//! ```
//!
//! Operations are available on:
//!
//! * [`Client`] - backed by the AWS SDK for Rust
//! * [`InMemoryConnection`](crate::in_memory::InMemoryConnection) - process-local buckets for tests
//! * [`BlockingConnection`](crate::blocking::BlockingConnection) - a synchronous facade over either

/// Version of this library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default and maximum number of keys returned by a single listing request
pub(crate) const DEFAULT_MAX_KEYS: i32 = 1000;

/// Error types emitted by `aws-s3-connection`
pub mod error;

/// Common types used by `aws-s3-connection`
pub mod types;

/// Types and helpers for I/O
pub mod io;

/// The connection capability contract
pub mod connection;

/// Connection backed by the AWS SDK for Rust
pub mod client;

/// Connection operations
pub mod operation;

/// Connection configuration
pub mod config;

/// In-memory connection for tests and local development
pub mod in_memory;

/// Synchronous facade over a connection
pub mod blocking;

/// Metrics
pub mod metrics;

pub use self::client::Client;
use self::config::loader::ConfigLoader;
pub use self::config::Config;
pub use self::connection::S3Connection;

/// Create a config loader
pub fn from_env() -> ConfigLoader {
    ConfigLoader::default()
}
