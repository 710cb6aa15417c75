/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::fmt;

use aws_sdk_s3::error::{ProvideErrorMetadata, SdkError};
use aws_sdk_s3::operation::RequestId;
use aws_smithy_runtime_api::http::Response;

/// A boxed error that is `Send` and `Sync`.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors returned by this library
///
/// NOTE: Use [`aws_smithy_types::error::display::DisplayErrorContext`] or similar to display
/// the entire error cause/source chain.
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    code: Option<String>,
    request_id: Option<String>,
    status: Option<u16>,
    refused_locally: bool,
    source: BoxError,
}

/// Categories of connection errors.
///
/// Every operation fails with either its own kind (the request was attempted and rejected,
/// or its input was refused before sending) or [`ErrorKind::ConnectionFailed`] when no response
/// could be obtained at all.
#[derive(Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// A bucket could not be created (e.g. the name is taken or invalid)
    BucketCreateFailed,

    /// Buckets or the objects of a bucket could not be listed
    ListFailed,

    /// A bucket could not be deleted (e.g. it is not empty or does not exist)
    BucketDeleteFailed,

    /// An object could not be stored
    PutFailed,

    /// An object or its metadata could not be retrieved
    GetFailed,

    /// An object could not be deleted
    DeleteFailed,

    /// Transport level failure, no response was received
    ConnectionFailed,
}

impl Error {
    /// Creates a new [`Error`] from a known kind of error as well as an arbitrary error
    /// source.
    pub fn new<E>(kind: ErrorKind, err: E) -> Error
    where
        E: Into<BoxError>,
    {
        Error {
            kind,
            code: None,
            request_id: None,
            status: None,
            refused_locally: false,
            source: err.into(),
        }
    }

    /// Set the service error code (e.g. `NoSuchKey`)
    pub(crate) fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Set the request ID of the failed request
    pub(crate) fn with_request_id(mut self, request_id: Option<impl Into<String>>) -> Self {
        self.request_id = request_id.map(Into::into);
        self
    }

    pub(crate) fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Returns the corresponding [`ErrorKind`] for this error.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// The error code returned by the service, if any
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    /// The request ID of the failed request, if the service responded
    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }

    /// The HTTP status code of the failed response, if the service responded
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    /// True if the input was refused before any request was sent
    pub(crate) fn is_refused_locally(&self) -> bool {
        self.refused_locally
    }

    /// Returns true if the bucket or key addressed by the request does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self.code(), Some("NoSuchKey" | "NoSuchBucket" | "NotFound"))
            || self.status == Some(404)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ErrorKind::BucketCreateFailed => write!(f, "failed to create bucket")?,
            ErrorKind::ListFailed => write!(f, "failed to list")?,
            ErrorKind::BucketDeleteFailed => write!(f, "failed to delete bucket")?,
            ErrorKind::PutFailed => write!(f, "failed to put object")?,
            ErrorKind::GetFailed => write!(f, "failed to get object")?,
            ErrorKind::DeleteFailed => write!(f, "failed to delete object")?,
            ErrorKind::ConnectionFailed => write!(f, "connection failed")?,
        }
        if let Some(code) = &self.code {
            write!(f, " ({code})")?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.source.as_ref())
    }
}

/// Returns true if the SDK error is a `304 Not Modified` response
pub(crate) fn is_not_modified<E>(err: &SdkError<E, Response>) -> bool
where
    E: ProvideErrorMetadata,
{
    match err {
        SdkError::ServiceError(ctx) => {
            ctx.err().code() == Some("NotModified") || ctx.raw().status().as_u16() == 304
        }
        _ => false,
    }
}

/// Convert an SDK error into a connection [`Error`] of the given operation kind.
///
/// Dispatch and timeout failures never produced a response and are reported as
/// [`ErrorKind::ConnectionFailed`] regardless of the operation.
pub(crate) fn from_sdk<E>(kind: ErrorKind) -> impl FnOnce(SdkError<E, Response>) -> Error
where
    E: std::error::Error + ProvideErrorMetadata + Send + Sync + 'static,
{
    move |err| {
        let kind = match &err {
            SdkError::DispatchFailure(_) | SdkError::TimeoutError(_) => {
                ErrorKind::ConnectionFailed
            }
            _ => kind,
        };
        let code = err.code().map(str::to_owned);
        let request_id = err.request_id().map(str::to_owned);
        let refused_locally = matches!(err, SdkError::ConstructionFailure(_));
        let status = match &err {
            SdkError::ServiceError(ctx) => Some(ctx.raw().status().as_u16()),
            SdkError::ResponseError(ctx) => Some(ctx.raw().status().as_u16()),
            _ => None,
        };

        let mut error = Error {
            refused_locally,
            ..Error::new(kind, err)
        }
        .with_request_id(request_id);
        if let Some(code) = code {
            error = error.with_code(code);
        }
        if let Some(status) = status {
            error = error.with_status(status);
        }
        error
    }
}

/// An error for input that was refused before any request was sent
pub(crate) fn invalid_input<E>(kind: ErrorKind, err: E) -> Error
where
    E: Into<BoxError>,
{
    Error {
        refused_locally: true,
        ..Error::new(kind, err)
    }
}

pub(crate) fn from_kind<E>(kind: ErrorKind) -> impl FnOnce(E) -> Error
where
    E: Into<BoxError>,
{
    |err| Error::new(kind, err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_codes() {
        for code in ["NoSuchKey", "NoSuchBucket", "NotFound"] {
            let err = Error::new(ErrorKind::GetFailed, "missing").with_code(code);
            assert!(err.is_not_found(), "{code} should be not found");
        }

        let err = Error::new(ErrorKind::GetFailed, "denied").with_code("AccessDenied");
        assert!(!err.is_not_found());

        let err = Error::new(ErrorKind::GetFailed, "missing").with_status(404);
        assert!(err.is_not_found());
    }

    #[test]
    fn test_transport_failures_are_connection_failed() {
        use aws_sdk_s3::operation::get_object::GetObjectError;
        use aws_smithy_runtime_api::client::result::ConnectorError;

        let err: SdkError<GetObjectError, Response> =
            SdkError::dispatch_failure(ConnectorError::io("connection refused".into()));
        let err = from_sdk(ErrorKind::GetFailed)(err);
        assert_eq!(&ErrorKind::ConnectionFailed, err.kind());
        assert_eq!(None, err.status());

        let err: SdkError<GetObjectError, Response> = SdkError::timeout_error("timed out");
        let err = from_sdk(ErrorKind::PutFailed)(err);
        assert_eq!(&ErrorKind::ConnectionFailed, err.kind());
    }

    #[test]
    fn test_construction_failure_keeps_operation_kind() {
        use aws_sdk_s3::operation::delete_object::DeleteObjectError;

        let err: SdkError<DeleteObjectError, Response> =
            SdkError::construction_failure("missing key");
        let err = from_sdk(ErrorKind::DeleteFailed)(err);
        assert_eq!(&ErrorKind::DeleteFailed, err.kind());
        assert_eq!(None, err.code());
        assert!(err.is_refused_locally());
    }

    #[test]
    fn test_display_includes_code() {
        let err = Error::new(ErrorKind::BucketDeleteFailed, "not empty").with_code("BucketNotEmpty");
        assert_eq!("failed to delete bucket (BucketNotEmpty)", err.to_string());

        let err = Error::new(ErrorKind::ConnectionFailed, "dns");
        assert_eq!("connection failed", err.to_string());
    }
}
