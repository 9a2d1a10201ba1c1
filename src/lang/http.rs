// src/lang/http.rs

//! HTTP transport: the request body is a command script.
//!
//! Any method on `/` is accepted. The body is parsed and every resulting
//! operation is posted to the event loop in order; the response does not wait
//! for execution.
//!
//! | Outcome                          | Status |
//! |----------------------------------|--------|
//! | posted (possibly zero commands)  | 200    |
//! | body unreadable                  | 500    |
//! | event loop stopped               | 503    |

use super::parser::Parser;
use crate::painter::{LoopError, LoopHandle, LoopState};
use axum::body::Body;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::any;
use axum::Router;
use log::*;
use std::future::Future;
use std::io::{self, Read};
use std::sync::Arc;
use tokio::net::TcpListener;

/// Why a script could not be accepted.
#[derive(Debug)]
pub enum SubmitError {
    /// The body could not be read or was not valid UTF-8.
    Read(io::Error),
    /// The event loop refused the operations.
    Loop(LoopError),
}

impl SubmitError {
    pub fn status(&self) -> StatusCode {
        match self {
            SubmitError::Read(_) => StatusCode::INTERNAL_SERVER_ERROR,
            SubmitError::Loop(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl std::fmt::Display for SubmitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmitError::Read(e) => write!(f, "failed to read command script: {}", e),
            SubmitError::Loop(e) => write!(f, "failed to post operations: {}", e),
        }
    }
}

impl std::error::Error for SubmitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SubmitError::Read(e) => Some(e),
            SubmitError::Loop(e) => Some(e),
        }
    }
}

impl From<io::Error> for SubmitError {
    fn from(e: io::Error) -> Self {
        SubmitError::Read(e)
    }
}

impl From<LoopError> for SubmitError {
    fn from(e: LoopError) -> Self {
        SubmitError::Loop(e)
    }
}

/// Parser plus loop handle: everything a request needs.
#[derive(Debug, Clone)]
pub struct CommandService {
    handle: LoopHandle,
    parser: Parser,
    max_body_bytes: usize,
}

impl CommandService {
    pub fn new(handle: LoopHandle, parser: Parser, max_body_bytes: usize) -> Self {
        CommandService {
            handle,
            parser,
            max_body_bytes,
        }
    }

    /// Parses `body` and posts its operations in order. Returns how many were posted.
    pub fn submit<R: Read>(&self, body: R) -> Result<usize, SubmitError> {
        if self.handle.state() == LoopState::Stopped {
            return Err(LoopError::Stopped.into());
        }
        let ops = self.parser.parse(body)?;
        Ok(self.handle.post_all(ops)?)
    }
}

/// Builds the router serving `service` on `/`.
pub fn router(service: CommandService) -> Router {
    Router::new()
        .route("/", any(submit))
        .with_state(Arc::new(service))
}

async fn submit(State(service): State<Arc<CommandService>>, body: Body) -> StatusCode {
    let bytes = match axum::body::to_bytes(body, service.max_body_bytes).await {
        Ok(bytes) => bytes,
        Err(e) => {
            error!("HttpTransport: Failed to read request body: {}", e);
            return StatusCode::INTERNAL_SERVER_ERROR;
        }
    };

    match service.submit(&bytes[..]) {
        Ok(posted) => {
            debug!("HttpTransport: Posted {} operations", posted);
            StatusCode::OK
        }
        Err(e) => {
            warn!("HttpTransport: {}", e);
            e.status()
        }
    }
}

/// Resolves once `signal` fires. If the signal cannot be installed, never
/// resolves, so the server keeps running instead of stopping at once.
pub async fn shutdown_on<F>(signal: F)
where
    F: Future<Output = io::Result<()>>,
{
    match signal.await {
        Ok(()) => info!("HttpTransport: Interrupt received, shutting down"),
        Err(e) => {
            error!(
                "HttpTransport: Failed to listen for shutdown signal, serving until killed: {}",
                e
            );
            std::future::pending::<()>().await;
        }
    }
}

/// Serves `router` on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, router: Router, shutdown: F) -> io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        info!("HttpTransport: Listening on http://{}", addr);
    }
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
}
