//! Shop endpoints: catalogue, orders, customers

use super::{ApiClient, ClientError};
use crate::types::Record;
use std::fmt::Display;

impl ApiClient {
    /// List products
    pub async fn list_products(&self) -> Result<Vec<Record>, ClientError> {
        self.get_listing("/shop/products/").await
    }

    /// Get a single product
    pub async fn get_product(&self, id: impl Display) -> Result<Record, ClientError> {
        self.get_json(&format!("/shop/products/{id}/")).await
    }

    /// List product categories
    pub async fn list_categories(&self) -> Result<Vec<Record>, ClientError> {
        self.get_listing("/shop/categories/").await
    }

    /// List orders
    pub async fn list_orders(&self) -> Result<Vec<Record>, ClientError> {
        self.get_listing("/shop/orders/").await
    }

    /// Create an order
    pub async fn create_order(&self, order: &Record) -> Result<Record, ClientError> {
        self.post_json("/shop/orders/", order).await
    }

    /// List customers
    pub async fn list_customers(&self) -> Result<Vec<Record>, ClientError> {
        self.get_listing("/shop/customers/").await
    }
}
