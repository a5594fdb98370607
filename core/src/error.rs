//! Error types for the product API client.
//!
//! # Design
//! `NotFound` is reserved for a 404 from the remote: the product does not
//! exist. A 2xx success envelope that carries no payload is a different
//! outcome and gets its own variant, `MissingPayload`, tagged with the
//! operation that expected one. `is_not_found` lets callers treat both as
//! "not found" when they do not care about the difference.

use std::fmt;

use thiserror::Error;

/// The product API operation a request belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Get,
    Create,
    Update,
    Delete,
    ListByCategory,
    Search,
}

impl Operation {
    /// Short gerund used in log lines, e.g. "fetching product".
    pub fn describe(self) -> &'static str {
        match self {
            Operation::List => "fetching products",
            Operation::Get => "fetching product",
            Operation::Create => "creating product",
            Operation::Update => "updating product",
            Operation::Delete => "deleting product",
            Operation::ListByCategory => "fetching products by category",
            Operation::Search => "searching products",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

fn missing_payload_text(operation: &Operation) -> &'static str {
    match operation {
        Operation::Get => "product not found",
        Operation::Create => "failed to create product",
        Operation::Update => "failed to update product",
        _ => "response carried no payload",
    }
}

/// Errors returned by `ProductClient` parse methods and by transports.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (DNS, connect, I/O).
    #[error("transport failed: {0}")]
    Transport(String),

    /// The server returned 404.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// The server answered 2xx but the envelope reported `success: false`.
    #[error("request rejected: {message}")]
    Rejected { message: String },

    /// The server reported success but sent no payload for a single-entity
    /// operation.
    #[error("{}", missing_payload_text(.0))]
    MissingPayload(Operation),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl ApiError {
    /// True for a 404 and for an empty success envelope on get or update.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ApiError::NotFound | ApiError::MissingPayload(Operation::Get | Operation::Update)
        )
    }
}
