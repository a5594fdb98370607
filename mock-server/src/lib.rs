use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub stock: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProduct {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub stock: u32,
    pub image_url: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProduct {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub category: Option<String>,
    pub stock: Option<u32>,
    pub image_url: Option<String>,
}

#[derive(Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    fn data(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data: Some(data),
            message: None,
        })
    }
}

impl Envelope<()> {
    fn message(success: bool, message: &str) -> Json<Self> {
        Json(Self {
            success,
            data: None,
            message: Some(message.to_string()),
        })
    }
}

type Rejection = (StatusCode, Json<Envelope<()>>);

fn not_found() -> Rejection {
    (StatusCode::NOT_FOUND, Envelope::message(false, "Product not found"))
}

/// Products in insertion order.
pub type Db = Arc<RwLock<Vec<Product>>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Vec::new()));
    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route("/products/search", get(search_products))
        .route("/products/category/{category}", get(list_by_category))
        .route(
            "/products/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn list_products(State(db): State<Db>) -> Json<Envelope<Vec<Product>>> {
    Envelope::data(db.read().await.clone())
}

async fn create_product(
    State(db): State<Db>,
    Json(input): Json<CreateProduct>,
) -> (StatusCode, Json<Envelope<Product>>) {
    let now = Utc::now();
    let product = Product {
        id: Uuid::new_v4().simple().to_string(),
        name: input.name,
        description: input.description,
        price: input.price,
        category: input.category,
        stock: input.stock,
        image_url: input.image_url,
        created_at: now,
        updated_at: now,
    };
    db.write().await.push(product.clone());
    tracing::info!(id = %product.id, "product created");
    (StatusCode::CREATED, Envelope::data(product))
}

async fn get_product(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<Json<Envelope<Product>>, Rejection> {
    let products = db.read().await;
    products
        .iter()
        .find(|p| p.id == id)
        .cloned()
        .map(Envelope::data)
        .ok_or_else(not_found)
}

async fn update_product(
    State(db): State<Db>,
    Path(id): Path<String>,
    Json(input): Json<UpdateProduct>,
) -> Result<Json<Envelope<Product>>, Rejection> {
    let mut products = db.write().await;
    let product = products
        .iter_mut()
        .find(|p| p.id == id)
        .ok_or_else(not_found)?;
    if let Some(name) = input.name {
        product.name = name;
    }
    if let Some(description) = input.description {
        product.description = description;
    }
    if let Some(price) = input.price {
        product.price = price;
    }
    if let Some(category) = input.category {
        product.category = category;
    }
    if let Some(stock) = input.stock {
        product.stock = stock;
    }
    if let Some(image_url) = input.image_url {
        product.image_url = Some(image_url);
    }
    product.updated_at = Utc::now();
    Ok(Envelope::data(product.clone()))
}

async fn delete_product(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<Json<Envelope<()>>, Rejection> {
    let mut products = db.write().await;
    let index = products
        .iter()
        .position(|p| p.id == id)
        .ok_or_else(not_found)?;
    products.remove(index);
    tracing::info!(%id, "product deleted");
    Ok(Envelope::message(true, "Product deleted"))
}

async fn list_by_category(
    State(db): State<Db>,
    Path(category): Path<String>,
) -> Json<Envelope<Vec<Product>>> {
    let products = db.read().await;
    Envelope::data(
        products
            .iter()
            .filter(|p| p.category.eq_ignore_ascii_case(&category))
            .cloned()
            .collect(),
    )
}

async fn search_products(
    State(db): State<Db>,
    Query(params): Query<SearchParams>,
) -> Json<Envelope<Vec<Product>>> {
    let needle = params.q.to_lowercase();
    let products = db.read().await;
    Envelope::data(
        products
            .iter()
            .filter(|p| {
                p.name.to_lowercase().contains(&needle)
                    || p.description.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect(),
    )
}
