//! Stateless HTTP request builder and response parser for the product API.
//!
//! # Design
//! `ProductClient` holds only a `base_url` and carries no mutable state
//! between calls. Each operation is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`. The round-trip itself belongs to a transport, keeping the
//! core deterministic and free of I/O.
//!
//! Every 2xx response is expected to carry an [`Envelope`]. List operations
//! default a missing payload to an empty list; single-entity operations turn
//! it into [`ApiError::MissingPayload`].

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::Serialize;

use crate::error::{ApiError, Operation};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{
    CreateProduct, Envelope, Product, ProductEnvelope, ProductsEnvelope, UpdateProduct,
};

/// Characters left unescaped by `encodeURIComponent`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-escape a value for use as a path segment or query value.
pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, URI_COMPONENT).to_string()
}

/// Synchronous, stateless client for the product API.
#[derive(Debug, Clone)]
pub struct ProductClient {
    base_url: String,
}

impl ProductClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_list_products(&self) -> HttpRequest {
        self.get(format!("{}/products", self.base_url))
    }

    pub fn build_get_product(&self, id: &str) -> HttpRequest {
        self.get(format!("{}/products/{}", self.base_url, encode_component(id)))
    }

    pub fn build_create_product(&self, input: &CreateProduct) -> Result<HttpRequest, ApiError> {
        self.with_body(HttpMethod::Post, format!("{}/products", self.base_url), input)
    }

    pub fn build_update_product(
        &self,
        id: &str,
        input: &UpdateProduct,
    ) -> Result<HttpRequest, ApiError> {
        self.with_body(
            HttpMethod::Put,
            format!("{}/products/{}", self.base_url, encode_component(id)),
            input,
        )
    }

    pub fn build_delete_product(&self, id: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            path: format!("{}/products/{}", self.base_url, encode_component(id)),
            headers: accept_json(),
            body: None,
        }
    }

    pub fn build_list_by_category(&self, category: &str) -> HttpRequest {
        self.get(format!(
            "{}/products/category/{}",
            self.base_url,
            encode_component(category)
        ))
    }

    pub fn build_search_products(&self, query: &str) -> HttpRequest {
        self.get(format!(
            "{}/products/search?q={}",
            self.base_url,
            encode_component(query)
        ))
    }

    pub fn parse_list_products(&self, response: HttpResponse) -> Result<Vec<Product>, ApiError> {
        parse_list(&response)
    }

    pub fn parse_get_product(&self, response: HttpResponse) -> Result<Product, ApiError> {
        parse_single(&response, Operation::Get)
    }

    pub fn parse_create_product(&self, response: HttpResponse) -> Result<Product, ApiError> {
        parse_single(&response, Operation::Create)
    }

    pub fn parse_update_product(&self, response: HttpResponse) -> Result<Product, ApiError> {
        parse_single(&response, Operation::Update)
    }

    /// Any 2xx is success. A body, if present, is only inspected for an
    /// explicit `success: false`.
    pub fn parse_delete_product(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)?;
        if let Ok(envelope) = serde_json::from_str::<Envelope<IgnoredAny>>(&response.body) {
            if !envelope.success {
                return Err(rejected(envelope.message));
            }
        }
        Ok(())
    }

    pub fn parse_list_by_category(&self, response: HttpResponse) -> Result<Vec<Product>, ApiError> {
        parse_list(&response)
    }

    pub fn parse_search_products(&self, response: HttpResponse) -> Result<Vec<Product>, ApiError> {
        parse_list(&response)
    }

    fn get(&self, path: String) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path,
            headers: accept_json(),
            body: None,
        }
    }

    fn with_body<B: Serialize>(
        &self,
        method: HttpMethod,
        path: String,
        input: &B,
    ) -> Result<HttpRequest, ApiError> {
        let body =
            serde_json::to_string(input).map_err(|e| ApiError::Serialization(e.to_string()))?;
        let mut headers = accept_json();
        headers.push(("content-type".to_string(), "application/json".to_string()));
        Ok(HttpRequest {
            method,
            path,
            headers,
            body: Some(body),
        })
    }
}

fn accept_json() -> Vec<(String, String)> {
    vec![("accept".to_string(), "application/json".to_string())]
}

fn rejected(message: Option<String>) -> ApiError {
    ApiError::Rejected {
        message: message.unwrap_or_else(|| "request was not successful".to_string()),
    }
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    let message = serde_json::from_str::<Envelope<IgnoredAny>>(&response.body)
        .ok()
        .and_then(|envelope| envelope.message)
        .unwrap_or_else(|| response.body.clone());
    Err(ApiError::Http {
        status: response.status,
        message,
    })
}

fn parse_envelope<T: DeserializeOwned>(response: &HttpResponse) -> Result<Envelope<T>, ApiError> {
    check_status(response)?;
    let envelope: Envelope<T> = serde_json::from_str(&response.body)
        .map_err(|e| ApiError::Deserialization(e.to_string()))?;
    if !envelope.success {
        return Err(rejected(envelope.message));
    }
    Ok(envelope)
}

fn parse_list(response: &HttpResponse) -> Result<Vec<Product>, ApiError> {
    let envelope: ProductsEnvelope = parse_envelope(response)?;
    Ok(envelope.data.unwrap_or_default())
}

fn parse_single(response: &HttpResponse, operation: Operation) -> Result<Product, ApiError> {
    let envelope: ProductEnvelope = parse_envelope(response)?;
    envelope.data.ok_or(ApiError::MissingPayload(operation))
}
