//! Domain action modules
//!
//! Each module owns a slice of view state, changed only through its
//! `reduce`, and actions that call the [`ApiClient`]. Fetch actions log a
//! failure and keep the previous list; create actions hand the error back.

pub mod accounting;
pub mod auth;
pub mod invoices;
pub mod products;
pub mod service;

pub use accounting::{AccountingModule, AccountingState};
pub use auth::{AuthModule, AuthState};
pub use invoices::{InvoicesModule, InvoicesState};
pub use products::{ProductsModule, ProductsState};
pub use service::{ServiceModule, ServiceState};

use backoffice_http::{ApiClient, AuthEvent};

/// All modules over one shared client
pub struct AppStore {
    pub auth: AuthModule,
    pub products: ProductsModule,
    pub invoices: InvoicesModule,
    pub accounting: AccountingModule,
    pub service: ServiceModule,
}

impl AppStore {
    pub fn new(client: ApiClient) -> Self {
        Self {
            auth: AuthModule::new(client.clone()),
            products: ProductsModule::new(client.clone()),
            invoices: InvoicesModule::new(client.clone()),
            accounting: AccountingModule::new(client.clone()),
            service: ServiceModule::new(client),
        }
    }

    pub fn handle_event(&mut self, event: &AuthEvent) {
        self.auth.handle_event(event);
    }
}
