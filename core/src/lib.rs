//! Typed client core for the product catalog API.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). A `Transport` executes the
//! round-trip; `ProductService` joins the two and logs failures. The `card`
//! module holds the presentational product card.
//!
//! # Design
//! - `ProductClient` is stateless. It holds only `base_url`.
//! - Each operation is split into `build_*` (produces request) and `parse_*`
//!   (consumes response), so the I/O boundary is explicit.
//! - Every response body is an `Envelope`; list operations default a missing
//!   payload to an empty list, single-entity operations fail with
//!   `ApiError::MissingPayload`.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod card;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod service;
pub mod transport;
pub mod types;

pub use card::{format_price, CardView, ProductCard, StockStatus};
pub use client::ProductClient;
pub use config::ClientConfig;
pub use error::{ApiError, Operation};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use service::ProductService;
pub use transport::{Transport, UreqTransport};
pub use types::{CreateProduct, Envelope, Product, UpdateProduct};
