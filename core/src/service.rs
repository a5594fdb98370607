//! One-call product operations over a `Transport`.
//!
//! Each method builds a request with `ProductClient`, executes it once and
//! parses the response. Failures are logged here, once, and returned to the
//! caller unchanged. There is no retry.

use tracing::{debug, error};

use crate::client::ProductClient;
use crate::config::ClientConfig;
use crate::error::{ApiError, Operation};
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::{Transport, UreqTransport};
use crate::types::{CreateProduct, Product, UpdateProduct};

#[derive(Clone)]
pub struct ProductService<T = UreqTransport> {
    client: ProductClient,
    transport: T,
}

impl ProductService<UreqTransport> {
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(ProductClient::new(&config.base_url), UreqTransport::new())
    }
}

impl<T: Transport> ProductService<T> {
    pub fn new(client: ProductClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &ProductClient {
        &self.client
    }

    pub fn get_all_products(&self) -> Result<Vec<Product>, ApiError> {
        let request = self.client.build_list_products();
        self.round_trip(Operation::List, Ok(request), ProductClient::parse_list_products)
    }

    pub fn get_product_by_id(&self, id: &str) -> Result<Product, ApiError> {
        let request = self.client.build_get_product(id);
        self.round_trip(Operation::Get, Ok(request), ProductClient::parse_get_product)
    }

    pub fn create_product(&self, input: &CreateProduct) -> Result<Product, ApiError> {
        let request = self.client.build_create_product(input);
        self.round_trip(Operation::Create, request, ProductClient::parse_create_product)
    }

    pub fn update_product(&self, id: &str, input: &UpdateProduct) -> Result<Product, ApiError> {
        if input.is_empty() {
            debug!(id, "update carries no fields");
        }
        let request = self.client.build_update_product(id, input);
        self.round_trip(Operation::Update, request, ProductClient::parse_update_product)
    }

    pub fn delete_product(&self, id: &str) -> Result<(), ApiError> {
        let request = self.client.build_delete_product(id);
        self.round_trip(Operation::Delete, Ok(request), ProductClient::parse_delete_product)
    }

    pub fn get_products_by_category(&self, category: &str) -> Result<Vec<Product>, ApiError> {
        let request = self.client.build_list_by_category(category);
        self.round_trip(
            Operation::ListByCategory,
            Ok(request),
            ProductClient::parse_list_by_category,
        )
    }

    pub fn search_products(&self, query: &str) -> Result<Vec<Product>, ApiError> {
        let request = self.client.build_search_products(query);
        self.round_trip(Operation::Search, Ok(request), ProductClient::parse_search_products)
    }

    fn round_trip<R>(
        &self,
        operation: Operation,
        request: Result<HttpRequest, ApiError>,
        parse: impl FnOnce(&ProductClient, HttpResponse) -> Result<R, ApiError>,
    ) -> Result<R, ApiError> {
        let result = request.and_then(|request| {
            debug!(%operation, method = %request.method, path = %request.path, "sending request");
            let response = self.transport.execute(request)?;
            parse(&self.client, response)
        });
        match &result {
            Ok(_) => debug!(%operation, "{operation} succeeded"),
            Err(e) => error!(%operation, error = %e, "error {operation}"),
        }
        result
    }
}
