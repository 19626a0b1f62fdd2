//! Back-office endpoints: invoicing, accounting, VAT, staff

use super::{ApiClient, ClientError};
use crate::types::Record;

impl ApiClient {
    /// List invoices
    pub async fn list_invoices(&self) -> Result<Vec<Record>, ClientError> {
        self.get_listing("/admin-dashboard/invoices/").await
    }

    /// Create an invoice
    pub async fn create_invoice(&self, invoice: &Record) -> Result<Record, ClientError> {
        self.post_json("/admin-dashboard/invoices/", invoice).await
    }

    /// List accounting entries
    pub async fn list_accounting_entries(&self) -> Result<Vec<Record>, ClientError> {
        self.get_listing("/admin-dashboard/entries/").await
    }

    /// Create an accounting entry
    pub async fn create_accounting_entry(&self, entry: &Record) -> Result<Record, ClientError> {
        self.post_json("/admin-dashboard/entries/", entry).await
    }

    /// Chart of accounts
    pub async fn chart_of_accounts(&self) -> Result<Vec<Record>, ClientError> {
        self.get_listing("/admin-dashboard/chart-of-accounts/").await
    }

    /// List VAT declarations
    pub async fn list_vat_declarations(&self) -> Result<Vec<Record>, ClientError> {
        self.get_listing("/admin-dashboard/vat-declarations/").await
    }

    /// Generate the VAT declaration for a period
    pub async fn generate_vat_declaration(&self, period: &Record) -> Result<Record, ClientError> {
        self.post_json(
            "/admin-dashboard/vat-declarations/generate_declaration/",
            period,
        )
        .await
    }

    /// List employees
    pub async fn list_employees(&self) -> Result<Vec<Record>, ClientError> {
        self.get_listing("/admin-dashboard/employees/").await
    }
}
