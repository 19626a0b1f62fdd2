//! Ledger, chart of accounts and VAT declarations

use backoffice_http::{ApiClient, ClientError, Record};
use tracing::error;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccountingState {
    pub entries: Vec<Record>,
    pub chart_of_accounts: Vec<Record>,
    pub vat_declarations: Vec<Record>,
    pub loading: bool,
}

pub enum AccountingAction {
    SetEntries(Vec<Record>),
    SetChartOfAccounts(Vec<Record>),
    SetVatDeclarations(Vec<Record>),
    AddVatDeclaration(Record),
    SetLoading(bool),
}

impl AccountingState {
    pub fn reduce(&mut self, action: AccountingAction) {
        match action {
            AccountingAction::SetEntries(entries) => self.entries = entries,
            AccountingAction::SetChartOfAccounts(accounts) => self.chart_of_accounts = accounts,
            AccountingAction::SetVatDeclarations(declarations) => {
                self.vat_declarations = declarations
            }
            AccountingAction::AddVatDeclaration(declaration) => {
                self.vat_declarations.insert(0, declaration)
            }
            AccountingAction::SetLoading(loading) => self.loading = loading,
        }
    }
}

pub struct AccountingModule {
    client: ApiClient,
    state: AccountingState,
}

impl AccountingModule {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            state: AccountingState::default(),
        }
    }

    pub fn state(&self) -> &AccountingState {
        &self.state
    }

    pub async fn fetch_entries(&mut self) {
        self.state.reduce(AccountingAction::SetLoading(true));
        match self.client.list_accounting_entries().await {
            Ok(entries) => self.state.reduce(AccountingAction::SetEntries(entries)),
            Err(e) => error!(error = %e, "Error fetching entries"),
        }
        self.state.reduce(AccountingAction::SetLoading(false));
    }

    pub async fn fetch_chart_of_accounts(&mut self) {
        match self.client.chart_of_accounts().await {
            Ok(accounts) => self
                .state
                .reduce(AccountingAction::SetChartOfAccounts(accounts)),
            Err(e) => error!(error = %e, "Error fetching chart of accounts"),
        }
    }

    pub async fn fetch_vat_declarations(&mut self) {
        match self.client.list_vat_declarations().await {
            Ok(declarations) => self
                .state
                .reduce(AccountingAction::SetVatDeclarations(declarations)),
            Err(e) => error!(error = %e, "Error fetching VAT declarations"),
        }
    }

    /// Generate the declaration for `period`, e.g. `{"year": 2024, "quarter": 2}`
    pub async fn generate_vat_declaration(&mut self, period: &Record) -> Result<Record, ClientError> {
        let declaration = self.client.generate_vat_declaration(period).await?;
        self.state
            .reduce(AccountingAction::AddVatDeclaration(declaration.clone()));
        Ok(declaration)
    }
}
