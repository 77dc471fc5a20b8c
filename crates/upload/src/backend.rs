//! Backend trait consumed by the upload flow.
//!
//! `NasBackend` is implemented by [`crate::HttpBackend`] for real
//! servers. Keeping the flow behind a trait lets the transmitter and
//! orchestrator be tested against in-memory mocks.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use naspi_protocol::{CancelUploadRequest, ChunkFields, ListFilesResponse};

use crate::error::BackendError;

/// Boxed future returned by [`NasBackend`] methods.
pub type BackendFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, BackendError>> + Send + 'a>>;

/// The NASPi endpoints the upload flow depends on.
pub trait NasBackend: Send + Sync {
    /// `POST /api/upload_chunk`; `Ok` only for a 2xx response.
    fn upload_chunk(&self, fields: ChunkFields, data: Vec<u8>) -> BackendFuture<'_, ()>;

    /// `POST /api/cancel_upload`; best-effort cleanup of a partial file.
    fn cancel_upload(&self, request: CancelUploadRequest) -> BackendFuture<'_, ()>;

    /// `GET /api/files?path=<path>`.
    fn list_files<'a>(&'a self, path: &'a str) -> BackendFuture<'a, ListFilesResponse>;
}

impl<B: NasBackend + ?Sized> NasBackend for Arc<B> {
    fn upload_chunk(&self, fields: ChunkFields, data: Vec<u8>) -> BackendFuture<'_, ()> {
        (**self).upload_chunk(fields, data)
    }

    fn cancel_upload(&self, request: CancelUploadRequest) -> BackendFuture<'_, ()> {
        (**self).cancel_upload(request)
    }

    fn list_files<'a>(&'a self, path: &'a str) -> BackendFuture<'a, ListFilesResponse> {
        (**self).list_files(path)
    }
}
