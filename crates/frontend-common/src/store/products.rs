//! Product catalogue

use backoffice_http::{ApiClient, Record};
use tracing::error;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductsState {
    pub products: Vec<Record>,
    pub categories: Vec<Record>,
    pub loading: bool,
}

pub enum ProductsAction {
    SetProducts(Vec<Record>),
    SetCategories(Vec<Record>),
    SetLoading(bool),
}

impl ProductsState {
    pub fn reduce(&mut self, action: ProductsAction) {
        match action {
            ProductsAction::SetProducts(products) => self.products = products,
            ProductsAction::SetCategories(categories) => self.categories = categories,
            ProductsAction::SetLoading(loading) => self.loading = loading,
        }
    }
}

pub struct ProductsModule {
    client: ApiClient,
    state: ProductsState,
}

impl ProductsModule {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            state: ProductsState::default(),
        }
    }

    pub fn state(&self) -> &ProductsState {
        &self.state
    }

    /// Reload products; on failure the previous list is kept
    pub async fn fetch_products(&mut self) {
        self.state.reduce(ProductsAction::SetLoading(true));
        match self.client.list_products().await {
            Ok(products) => self.state.reduce(ProductsAction::SetProducts(products)),
            Err(e) => error!(error = %e, "Error fetching products"),
        }
        self.state.reduce(ProductsAction::SetLoading(false));
    }

    pub async fn fetch_categories(&mut self) {
        match self.client.list_categories().await {
            Ok(categories) => self.state.reduce(ProductsAction::SetCategories(categories)),
            Err(e) => error!(error = %e, "Error fetching categories"),
        }
    }
}
