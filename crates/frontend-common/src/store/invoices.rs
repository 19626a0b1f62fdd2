//! Invoices

use backoffice_http::{ApiClient, ClientError, Record};
use tracing::error;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvoicesState {
    pub invoices: Vec<Record>,
    pub loading: bool,
}

pub enum InvoicesAction {
    SetInvoices(Vec<Record>),
    /// Newest first
    AddInvoice(Record),
    SetLoading(bool),
}

impl InvoicesState {
    pub fn reduce(&mut self, action: InvoicesAction) {
        match action {
            InvoicesAction::SetInvoices(invoices) => self.invoices = invoices,
            InvoicesAction::AddInvoice(invoice) => self.invoices.insert(0, invoice),
            InvoicesAction::SetLoading(loading) => self.loading = loading,
        }
    }
}

pub struct InvoicesModule {
    client: ApiClient,
    state: InvoicesState,
}

impl InvoicesModule {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            state: InvoicesState::default(),
        }
    }

    pub fn state(&self) -> &InvoicesState {
        &self.state
    }

    pub async fn fetch_invoices(&mut self) {
        self.state.reduce(InvoicesAction::SetLoading(true));
        match self.client.list_invoices().await {
            Ok(invoices) => self.state.reduce(InvoicesAction::SetInvoices(invoices)),
            Err(e) => error!(error = %e, "Error fetching invoices"),
        }
        self.state.reduce(InvoicesAction::SetLoading(false));
    }

    /// Create an invoice and put it at the top of the list
    pub async fn create_invoice(&mut self, invoice: &Record) -> Result<Record, ClientError> {
        let created = self.client.create_invoice(invoice).await?;
        self.state.reduce(InvoicesAction::AddInvoice(created.clone()));
        Ok(created)
    }
}
