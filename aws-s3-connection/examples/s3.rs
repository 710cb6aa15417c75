/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */
use std::path::PathBuf;
use std::process::ExitCode;

use aws_s3_connection::error::{Error, ErrorKind};
use aws_s3_connection::in_memory::InMemoryConnection;
use aws_s3_connection::io::InputStream;
use aws_s3_connection::types::S3Response;
use aws_s3_connection::S3Connection;
use aws_sdk_s3::error::DisplayErrorContext;
use clap::Parser;
use tokio::fs;

#[derive(Debug, Clone, clap::Parser)]
#[command(name = "s3")]
#[command(about = "Bucket and object operations against Amazon S3.")]
pub struct Args {
    #[command(subcommand)]
    command: Command,

    /// Region to send requests to
    #[arg(long)]
    region: Option<String>,

    /// Custom endpoint, e.g. an S3 compatible service
    #[arg(long)]
    endpoint_url: Option<String>,

    /// Address buckets by path rather than by virtual host
    #[arg(long, default_value_t = false, action = clap::ArgAction::SetTrue)]
    force_path_style: bool,

    /// Run against a process-local in-memory connection instead of S3
    #[arg(long, default_value_t = false, action = clap::ArgAction::SetTrue)]
    in_memory: bool,
}

#[derive(Debug, Clone, clap::Subcommand)]
enum Command {
    /// Create a bucket
    Mb { bucket: String },

    /// List all buckets, or the objects of a bucket
    Ls {
        bucket: Option<String>,

        /// Only list keys beginning with this prefix
        #[arg(long, default_value = "")]
        prefix: String,

        /// Roll keys up into common prefixes at this delimiter
        #[arg(long)]
        delimiter: Option<String>,

        /// Entries per request
        #[arg(long, default_value_t = 1000)]
        max_keys: i32,
    },

    /// Delete an empty bucket
    Rb { bucket: String },

    /// Upload a local file
    Put {
        bucket: String,
        key: String,
        path: PathBuf,

        #[arg(long, default_value = "")]
        content_type: String,
    },

    /// Download an object to a local file
    Get {
        bucket: String,
        key: String,
        path: PathBuf,

        /// Skip the download if the object still has this entity tag
        #[arg(long)]
        if_changed_from: Option<String>,
    },

    /// Delete an object
    Rm { bucket: String, key: String },

    /// Show the metadata of an object
    Head { bucket: String, key: String },

    /// Create a bucket and report the request ID.
    ///
    /// Exits with 1 if an operation failed and 2 if no connection could be made.
    Smoke { bucket: String },
}

type BoxError = Box<dyn std::error::Error + Send + Sync>;

async fn list<C: S3Connection>(
    conn: &C,
    bucket: &str,
    prefix: &str,
    delimiter: Option<&str>,
    max_keys: i32,
) -> Result<(), Error> {
    let mut marker = String::new();
    loop {
        let page = conn
            .list_bucket_delimited(bucket, prefix, &marker, delimiter.unwrap_or_default(), max_keys)
            .await?;
        for common_prefix in page.common_prefixes() {
            println!("{:>12}  {common_prefix}", "PRE");
        }
        for object in page.objects() {
            println!("{:>12}  {}", object.size(), object.key());
        }
        match page.next_marker() {
            Some(next) if page.is_truncated() => marker = next.to_owned(),
            _ => return Ok(()),
        }
    }
}

async fn run<C: S3Connection>(conn: &C, command: Command) -> Result<(), BoxError> {
    match command {
        Command::Mb { bucket } => {
            let resp = conn.create_bucket(&bucket).await?;
            println!("make_bucket: {}", resp.bucket_name());
        }
        Command::Ls {
            bucket: None,
            ..
        } => {
            let resp = conn.list_all_buckets().await?;
            for bucket in resp.buckets() {
                let created = bucket
                    .creation_date()
                    .map(ToString::to_string)
                    .unwrap_or_default();
                println!("{created:>20}  {}", bucket.name());
            }
        }
        Command::Ls {
            bucket: Some(bucket),
            prefix,
            delimiter,
            max_keys,
        } => list(conn, &bucket, &prefix, delimiter.as_deref(), max_keys).await?,
        Command::Rb { bucket } => {
            let resp = conn.delete_bucket(&bucket).await?;
            println!("remove_bucket: {}", resp.bucket_name());
        }
        Command::Put {
            bucket,
            key,
            path,
            content_type,
        } => {
            let resp = conn
                .put_stream(&bucket, &key, InputStream::from_path(&path), &content_type, None)
                .await?;
            println!(
                "upload: {} to s3://{bucket}/{key} ({} bytes, etag {})",
                path.display(),
                resp.content_length(),
                resp.e_tag().unwrap_or_default()
            );
        }
        Command::Get {
            bucket,
            key,
            path,
            if_changed_from,
        } => {
            let object = match if_changed_from {
                Some(e_tag) => match conn.get_if_changed(&bucket, &key, &e_tag).await?.into_modified() {
                    Some(object) => object,
                    None => {
                        println!("s3://{bucket}/{key} not modified");
                        return Ok(());
                    }
                },
                None => conn.get(&bucket, &key).await?,
            };
            fs::write(&path, object.body()).await?;
            println!(
                "download: s3://{bucket}/{key} to {} ({} bytes)",
                path.display(),
                object.content_length()
            );
        }
        Command::Rm { bucket, key } => {
            conn.delete(&bucket, &key).await?;
            println!("delete: s3://{bucket}/{key}");
        }
        Command::Head { bucket, key } => {
            let resp = conn.head(&bucket, &key).await?;
            println!("content-length: {}", resp.content_length());
            println!("content-type: {}", resp.content_type().unwrap_or_default());
            println!("etag: {}", resp.e_tag().unwrap_or_default());
            for (name, value) in resp.user_metadata() {
                println!("x-amz-meta-{name}: {value}");
            }
        }
        Command::Smoke { .. } => unreachable!("handled by smoke()"),
    }
    Ok(())
}

async fn smoke<C: S3Connection>(conn: &C, bucket: &str) -> ExitCode {
    println!("aws-s3-connection {}", aws_s3_connection::VERSION);
    match conn.create_bucket(bucket).await {
        Ok(resp) => {
            println!(
                "created bucket {} (request id {})",
                resp.bucket_name(),
                resp.request_id().unwrap_or("<none>")
            );
            ExitCode::SUCCESS
        }
        Err(err) if err.kind() == &ErrorKind::ConnectionFailed => {
            eprintln!("connection failed: {}", DisplayErrorContext(&err));
            ExitCode::from(2)
        }
        Err(err) => {
            eprintln!(
                "create bucket failed (request id {}): {}",
                err.request_id().unwrap_or("<none>"),
                DisplayErrorContext(&err)
            );
            ExitCode::from(1)
        }
    }
}

async fn dispatch<C: S3Connection>(conn: &C, command: Command) -> ExitCode {
    if let Command::Smoke { bucket } = &command {
        return smoke(conn, bucket).await;
    }
    match run(conn, command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("command failed: {}", DisplayErrorContext(err.as_ref()));
            let connection_failed = err
                .downcast_ref::<Error>()
                .is_some_and(|e| e.kind() == &ErrorKind::ConnectionFailed);
            if connection_failed {
                ExitCode::from(2)
            } else {
                ExitCode::from(1)
            }
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_thread_ids(true)
        .init();

    if args.in_memory {
        return dispatch(&InMemoryConnection::new(), args.command).await;
    }

    let mut loader = aws_s3_connection::from_env();
    if let Some(region) = args.region {
        loader = loader.region(region);
    }
    if let Some(endpoint_url) = args.endpoint_url {
        loader = loader.endpoint_url(endpoint_url);
    }
    if args.force_path_style {
        loader = loader.force_path_style(true);
    }
    let client = aws_s3_connection::Client::new(loader.load().await);

    let code = dispatch(&client, args.command).await;
    tracing::debug!(
        "requests sent: {}, failed: {}",
        client.metrics().requests_sent(),
        client.metrics().requests_failed()
    );
    code
}
