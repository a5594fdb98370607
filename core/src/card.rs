//! Presentational card for a single product.
//!
//! # Design
//! `ProductCard` is a pure function of its inputs: the product, an edit
//! callback, a delete callback and a "deleting" flag owned by the caller.
//! `view()` produces a [`CardView`], which renders to HTML through an askama
//! template. The only side effects are the two callbacks.

use std::iter;

use askama::Template;
use chrono::Datelike;

use crate::types::Product;

/// Stock counts below this value (and above zero) are "low".
pub const LOW_STOCK_THRESHOLD: u32 = 10;

/// Three-way classification of a stock count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockStatus {
    OutOfStock,
    LowStock,
    InStock,
}

impl StockStatus {
    pub fn classify(stock: u32) -> Self {
        match stock {
            0 => StockStatus::OutOfStock,
            n if n < LOW_STOCK_THRESHOLD => StockStatus::LowStock,
            _ => StockStatus::InStock,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StockStatus::OutOfStock => "Out of Stock",
            StockStatus::LowStock => "Low Stock",
            StockStatus::InStock => "In Stock",
        }
    }

    /// Style classes for the status badge.
    pub fn style(self) -> &'static str {
        match self {
            StockStatus::OutOfStock => "text-red-600 bg-red-100",
            StockStatus::LowStock => "text-orange-600 bg-orange-100",
            StockStatus::InStock => "text-green-600 bg-green-100",
        }
    }
}

/// Format a price as US dollars: `$1,234.50`.
///
/// Rounds half-up to whole cents on the shortest decimal form of `price`, so
/// `1.005` prints as `$1.01`. Negative values get a leading `-`.
pub fn format_price(price: f64) -> String {
    if price.is_nan() {
        return "$NaN".to_string();
    }
    let sign = if price < 0.0 { "-" } else { "" };
    if price.is_infinite() {
        return format!("{sign}$∞");
    }

    // f64 `Display` never uses exponent notation.
    let magnitude = price.abs().to_string();
    let (whole, fraction) = magnitude
        .split_once('.')
        .unwrap_or((magnitude.as_str(), ""));
    let mut digits: Vec<u8> = whole
        .bytes()
        .chain(fraction.bytes().chain(iter::repeat(b'0')).take(2))
        .collect();
    if fraction.as_bytes().get(2).is_some_and(|&d| d >= b'5') {
        increment_digits(&mut digits);
    }

    let (dollars, cents) = digits.split_at(digits.len() - 2);
    let mut grouped = String::with_capacity(dollars.len() + dollars.len() / 3);
    for (i, &digit) in dollars.iter().enumerate() {
        if i > 0 && (dollars.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(char::from(digit));
    }

    format!(
        "{sign}${grouped}.{}{}",
        char::from(cents[0]),
        char::from(cents[1])
    )
}

/// Add one to an ASCII decimal digit string, growing it on overflow.
fn increment_digits(digits: &mut Vec<u8>) {
    for digit in digits.iter_mut().rev() {
        if *digit == b'9' {
            *digit = b'0';
        } else {
            *digit += 1;
            return;
        }
    }
    digits.insert(0, b'1');
}

/// Everything the card shows, ready for rendering.
#[derive(Debug, Clone, PartialEq, Template)]
#[template(path = "product_card.html")]
pub struct CardView<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub category: &'a str,
    pub image_url: Option<&'a str>,
    pub price: String,
    pub stock: u32,
    pub stock_label: &'static str,
    pub stock_style: &'static str,
    /// Creation date as `M/D/YYYY`, when the product has one.
    pub added_on: Option<String>,
    pub is_deleting: bool,
    pub delete_label: &'static str,
}

pub struct ProductCard<'a> {
    product: &'a Product,
    on_edit: Box<dyn FnMut(&Product) + 'a>,
    on_delete: Box<dyn FnMut(&str) + 'a>,
    is_deleting: bool,
}

impl<'a> ProductCard<'a> {
    pub fn new(
        product: &'a Product,
        on_edit: impl FnMut(&Product) + 'a,
        on_delete: impl FnMut(&str) + 'a,
    ) -> Self {
        Self {
            product,
            on_edit: Box::new(on_edit),
            on_delete: Box::new(on_delete),
            is_deleting: false,
        }
    }

    pub fn deleting(mut self, is_deleting: bool) -> Self {
        self.is_deleting = is_deleting;
        self
    }

    pub fn stock_status(&self) -> StockStatus {
        StockStatus::classify(self.product.stock)
    }

    pub fn view(&self) -> CardView<'a> {
        let product = self.product;
        let status = self.stock_status();
        CardView {
            name: &product.name,
            description: &product.description,
            category: &product.category,
            image_url: product.image_url.as_deref(),
            price: format_price(product.price),
            stock: product.stock,
            stock_label: status.label(),
            stock_style: status.style(),
            added_on: product
                .created_at
                .map(|at| format!("{}/{}/{}", at.month(), at.day(), at.year())),
            is_deleting: self.is_deleting,
            delete_label: if self.is_deleting { "Deleting..." } else { "Delete" },
        }
    }

    pub fn render(&self) -> Result<String, askama::Error> {
        self.view().render()
    }

    pub fn click_edit(&mut self) {
        (self.on_edit)(self.product);
    }

    /// Returns whether the delete callback ran. The button is disabled while
    /// a delete is in flight, and a product without an id cannot be deleted.
    pub fn click_delete(&mut self) -> bool {
        if self.is_deleting {
            return false;
        }
        match self.product.id.as_deref() {
            Some(id) => {
                (self.on_delete)(id);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn product(stock: u32) -> Product {
        Product {
            id: Some("p1".to_string()),
            name: "Desk Lamp".to_string(),
            description: "LED, dimmable".to_string(),
            price: 1299.5,
            category: "lighting".to_string(),
            stock,
            image_url: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn stock_status_boundaries() {
        assert_eq!(StockStatus::classify(0), StockStatus::OutOfStock);
        assert_eq!(StockStatus::classify(1), StockStatus::LowStock);
        assert_eq!(StockStatus::classify(9), StockStatus::LowStock);
        assert_eq!(StockStatus::classify(10), StockStatus::InStock);
        assert_eq!(StockStatus::classify(u32::MAX), StockStatus::InStock);
    }

    #[test]
    fn stock_status_labels_and_styles() {
        assert_eq!(StockStatus::OutOfStock.label(), "Out of Stock");
        assert_eq!(StockStatus::LowStock.label(), "Low Stock");
        assert_eq!(StockStatus::InStock.label(), "In Stock");
        assert_eq!(StockStatus::LowStock.style(), "text-orange-600 bg-orange-100");
    }

    #[test]
    fn format_price_usd() {
        assert_eq!(format_price(19.5), "$19.50");
        assert_eq!(format_price(0.0), "$0.00");
        assert_eq!(format_price(7.0), "$7.00");
        assert_eq!(format_price(999.0), "$999.00");
        assert_eq!(format_price(1000.0), "$1,000.00");
        assert_eq!(format_price(1234567.891), "$1,234,567.89");
        assert_eq!(format_price(-42.25), "-$42.25");
        assert_eq!(format_price(0.125), "$0.13");
    }

    #[test]
    fn format_price_rounds_ties_on_printed_digits() {
        assert_eq!(format_price(1.005), "$1.01");
        assert_eq!(format_price(0.145), "$0.15");
        assert_eq!(format_price(0.285), "$0.29");
        assert_eq!(format_price(0.144), "$0.14");
        assert_eq!(format_price(999.995), "$1,000.00");
        assert_eq!(format_price(9.999), "$10.00");
        assert_eq!(format_price(-0.001), "-$0.00");
    }

    #[test]
    fn format_price_large_values_keep_every_digit() {
        assert_eq!(format_price(1e20), "$100,000,000,000,000,000,000.00");
        assert_eq!(format_price(2e19), "$20,000,000,000,000,000,000.00");
        assert_eq!(format_price(123456789012.5), "$123,456,789,012.50");
    }

    #[test]
    fn format_price_non_finite() {
        assert_eq!(format_price(f64::NAN), "$NaN");
        assert_eq!(format_price(f64::INFINITY), "$∞");
        assert_eq!(format_price(f64::NEG_INFINITY), "-$∞");
    }

    #[test]
    fn view_reflects_product() {
        let mut product = product(3);
        product.created_at = Some(Utc.with_ymd_and_hms(2024, 1, 5, 12, 0, 0).unwrap());
        let card = ProductCard::new(&product, |_| {}, |_| {});
        let view = card.view();
        assert_eq!(view.price, "$1,299.50");
        assert_eq!(view.stock_label, "Low Stock");
        assert_eq!(view.added_on.as_deref(), Some("1/5/2024"));
        assert_eq!(view.delete_label, "Delete");
        assert!(!view.is_deleting);
    }

    #[test]
    fn render_includes_placeholder_without_image() {
        let product = product(0);
        let html = ProductCard::new(&product, |_| {}, |_| {}).render().unwrap();
        assert!(html.contains("image-placeholder"));
        assert!(!html.contains("<img"));
        assert!(html.contains("Out of Stock"));
        assert!(html.contains("Stock: 0 units"));
        assert!(!html.contains("Added:"));
        assert!(!html.contains(r#"data-action="delete" disabled"#));
    }

    #[test]
    fn render_shows_image_and_escapes_text() {
        let mut product = product(25);
        product.name = "Lamp <Pro>".to_string();
        product.image_url = Some("lamp.png".to_string());
        let html = ProductCard::new(&product, |_| {}, |_| {}).render().unwrap();
        assert!(html.contains(r#"src="lamp.png""#));
        assert!(html.contains("Lamp &#60;Pro&#62;"));
        assert!(!html.contains("<Pro>"));
        assert!(html.contains("In Stock"));
    }

    #[test]
    fn render_while_deleting_disables_button() {
        let product = product(12);
        let html = ProductCard::new(&product, |_| {}, |_| {})
            .deleting(true)
            .render()
            .unwrap();
        assert!(html.contains("Deleting..."));
        assert!(html.contains(r#"data-action="delete" disabled"#));
    }

    #[test]
    fn edit_passes_product_to_callback() {
        let product = product(12);
        let mut edited = Vec::new();
        {
            let mut card = ProductCard::new(&product, |p| edited.push(p.name.clone()), |_| {});
            card.click_edit();
        }
        assert_eq!(edited, vec!["Desk Lamp".to_string()]);
    }

    #[test]
    fn delete_passes_id_unless_deleting() {
        let product = product(12);
        let mut deleted = Vec::new();
        {
            let mut card = ProductCard::new(&product, |_| {}, |id| deleted.push(id.to_string()));
            assert!(card.click_delete());
        }
        {
            let mut card = ProductCard::new(&product, |_| {}, |id| deleted.push(id.to_string()))
                .deleting(true);
            assert!(!card.click_delete());
        }
        assert_eq!(deleted, vec!["p1".to_string()]);
    }

    #[test]
    fn delete_without_id_is_ignored() {
        let mut product = product(12);
        product.id = None;
        let mut calls = 0;
        {
            let mut card = ProductCard::new(&product, |_| {}, |_| calls += 1);
            assert!(!card.click_delete());
        }
        assert_eq!(calls, 0);
    }
}
