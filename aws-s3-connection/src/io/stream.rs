/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::fmt;
use std::io::SeekFrom;
use std::path::{Path, PathBuf};

use aws_sdk_s3::primitives::ByteStream;
use aws_smithy_types::byte_stream::Length;
use bytes::Bytes;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncSeek, AsyncSeekExt};

use crate::error::{self, ErrorKind};

/// An async reader that also supports seeking, allowing its length to be probed.
pub trait SeekableRead: AsyncRead + AsyncSeek + Send + Sync + Unpin {}

impl<T> SeekableRead for T where T: AsyncRead + AsyncSeek + Send + Sync + Unpin {}

/// Source of binary data for a single `put_stream` call.
///
/// An `InputStream` is consumed by the operation it is passed to and is read at most once.
///
/// To create an `InputStream`:
///
/// * From an in-memory source: use [`from_static`] or one of the provided `From` implementations.
/// * From a file path: use [`from_path`]
/// * From a Tokio reader that supports seeking: use [`from_seekable_reader`]
/// * From any other Tokio reader: use [`from_reader`]. The length of such a stream can not be
///   probed and must be given explicitly when uploading.
///
/// [`from_static`]: InputStream::from_static
/// [`from_path`]: InputStream::from_path
/// [`from_seekable_reader`]: InputStream::from_seekable_reader
/// [`from_reader`]: InputStream::from_reader
#[derive(Debug)]
pub struct InputStream {
    pub(super) inner: RawInputStream,
}

impl InputStream {
    /// Create a new `InputStream` from a static byte slice
    pub fn from_static(bytes: &'static [u8]) -> Self {
        let inner = RawInputStream::Buf(bytes.into());
        Self { inner }
    }

    /// Create a new `InputStream` that reads data from a given `path`.
    ///
    /// The file is not opened until the stream is uploaded. Its contents MUST not change in the
    /// meantime.
    ///
    /// # Examples
    /// ```no_run
    /// use aws_s3_connection::io::InputStream;
    ///
    /// let stream = InputStream::from_path("docs/rows.csv");
    /// ```
    pub fn from_path(path: impl AsRef<Path>) -> InputStream {
        let inner = RawInputStream::Fs(path.as_ref().to_path_buf());
        Self { inner }
    }

    /// Create a new `InputStream` from a reader whose length can be probed by seeking.
    ///
    /// Data is read from the reader's current position.
    ///
    /// The remaining contents are read into memory before the request is sent, so the
    /// allocation grows with the object size (up to 5 GiB for a single put). Use
    /// [`from_path`](InputStream::from_path) to stream large files from disk instead.
    pub fn from_seekable_reader<T: SeekableRead + 'static>(reader: T) -> Self {
        let inner = RawInputStream::Seekable(Box::new(reader));
        Self { inner }
    }

    /// Create a new `InputStream` from a reader that can only be read forward once.
    ///
    /// Exactly the given upload size is read into memory before the request is sent, and
    /// nothing past it. As with [`from_seekable_reader`](InputStream::from_seekable_reader),
    /// large payloads are better served by [`from_path`](InputStream::from_path).
    pub fn from_reader<T: AsyncRead + Send + Sync + Unpin + 'static>(reader: T) -> Self {
        let inner = RawInputStream::Reader(Box::new(reader));
        Self { inner }
    }

    /// Returns true if the length of this stream can be determined without reading it
    pub fn is_seekable(&self) -> bool {
        !matches!(self.inner, RawInputStream::Reader(_))
    }

    /// Resolve the content length and body of this stream.
    ///
    /// With `size` unset, the remaining length is probed and an unseekable reader fails. With
    /// `size` set, exactly that many bytes are taken and a shorter source fails. Both failures
    /// happen before any data is handed to the transport.
    pub(crate) async fn into_body(self, size: Option<u64>) -> Result<(ByteStream, u64), error::Error> {
        match self.inner {
            RawInputStream::Buf(bytes) => {
                let available = bytes.len() as u64;
                let len = size.unwrap_or(available);
                if len > available {
                    return Err(short_source(len, available));
                }
                Ok((ByteStream::from(bytes.slice(..len as usize)), len))
            }
            RawInputStream::Fs(path) => {
                let available = tokio::fs::metadata(&path)
                    .await
                    .map_err(|err| error::invalid_input(ErrorKind::PutFailed, err))?
                    .len();
                let len = size.unwrap_or(available);
                if len > available {
                    return Err(short_source(len, available));
                }
                let body = ByteStream::read_from()
                    .path(&path)
                    .length(Length::Exact(len))
                    .build()
                    .await
                    .map_err(|err| error::invalid_input(ErrorKind::PutFailed, err))?;
                Ok((body, len))
            }
            RawInputStream::Seekable(mut reader) => {
                let len = match size {
                    Some(len) => len,
                    None => probe_len(&mut reader)
                        .await
                        .map_err(|err| error::invalid_input(ErrorKind::PutFailed, err))?,
                };
                let data = read_exact(reader, len).await?;
                Ok((ByteStream::from(data), len))
            }
            RawInputStream::Reader(reader) => {
                let len = size.ok_or_else(|| {
                    error::invalid_input(
                        ErrorKind::PutFailed,
                        "the length of an unseekable stream can not be probed, an explicit size is required",
                    )
                })?;
                let data = read_exact(reader, len).await?;
                Ok((ByteStream::from(data), len))
            }
        }
    }
}

/// Length remaining from the current position, leaving the position unchanged
async fn probe_len<R: AsyncSeek + Unpin + ?Sized>(reader: &mut R) -> std::io::Result<u64> {
    let current = reader.stream_position().await?;
    let end = reader.seek(SeekFrom::End(0)).await?;
    reader.seek(SeekFrom::Start(current)).await?;
    Ok(end.saturating_sub(current))
}

async fn read_exact<R: AsyncRead + Unpin>(reader: R, len: u64) -> Result<Bytes, error::Error> {
    let mut data = Vec::with_capacity(len.min(8 * 1024 * 1024) as usize);
    reader
        .take(len)
        .read_to_end(&mut data)
        .await
        .map_err(|err| error::invalid_input(ErrorKind::PutFailed, err))?;
    if (data.len() as u64) < len {
        return Err(short_source(len, data.len() as u64));
    }
    Ok(data.into())
}

fn short_source(expected: u64, available: u64) -> error::Error {
    error::invalid_input(
        ErrorKind::PutFailed,
        format!("size {expected} exceeds the {available} bytes available from the stream"),
    )
}

pub(super) enum RawInputStream {
    /// In-memory buffer to read from
    Buf(Bytes),
    /// File based input
    Fs(PathBuf),
    /// User provided reader supporting seek
    Seekable(Box<dyn SeekableRead>),
    /// User provided forward-only reader
    Reader(Box<dyn AsyncRead + Send + Sync + Unpin>),
}

impl fmt::Debug for RawInputStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawInputStream::Buf(bytes) => f.debug_tuple("Buf").field(&bytes.len()).finish(),
            RawInputStream::Fs(path) => f.debug_tuple("Fs").field(path).finish(),
            RawInputStream::Seekable(_) => f.write_str("Seekable(dyn SeekableRead)"),
            RawInputStream::Reader(_) => f.write_str("Reader(dyn AsyncRead)"),
        }
    }
}

impl Default for InputStream {
    fn default() -> Self {
        Self {
            inner: RawInputStream::Buf(Bytes::default()),
        }
    }
}

impl From<Bytes> for InputStream {
    fn from(value: Bytes) -> Self {
        Self {
            inner: RawInputStream::Buf(value),
        }
    }
}

impl From<Vec<u8>> for InputStream {
    fn from(value: Vec<u8>) -> Self {
        Self::from(Bytes::from(value))
    }
}

impl From<&'static [u8]> for InputStream {
    fn from(slice: &'static [u8]) -> InputStream {
        Self::from(Bytes::from_static(slice))
    }
}

impl From<&'static str> for InputStream {
    fn from(slice: &'static str) -> InputStream {
        Self::from(Bytes::from_static(slice.as_bytes()))
    }
}
