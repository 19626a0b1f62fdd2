//! Appointments and support tickets

use backoffice_http::{ApiClient, ClientError, Record};
use tracing::error;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServiceState {
    pub appointments: Vec<Record>,
    pub tickets: Vec<Record>,
    pub loading: bool,
}

pub enum ServiceAction {
    SetAppointments(Vec<Record>),
    AddAppointment(Record),
    SetTickets(Vec<Record>),
    AddTicket(Record),
    SetLoading(bool),
}

impl ServiceState {
    pub fn reduce(&mut self, action: ServiceAction) {
        match action {
            ServiceAction::SetAppointments(appointments) => self.appointments = appointments,
            ServiceAction::AddAppointment(appointment) => self.appointments.insert(0, appointment),
            ServiceAction::SetTickets(tickets) => self.tickets = tickets,
            ServiceAction::AddTicket(ticket) => self.tickets.insert(0, ticket),
            ServiceAction::SetLoading(loading) => self.loading = loading,
        }
    }
}

pub struct ServiceModule {
    client: ApiClient,
    state: ServiceState,
}

impl ServiceModule {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            state: ServiceState::default(),
        }
    }

    pub fn state(&self) -> &ServiceState {
        &self.state
    }

    pub async fn fetch_appointments(&mut self) {
        self.state.reduce(ServiceAction::SetLoading(true));
        match self.client.list_appointments().await {
            Ok(appointments) => self.state.reduce(ServiceAction::SetAppointments(appointments)),
            Err(e) => error!(error = %e, "Error fetching appointments"),
        }
        self.state.reduce(ServiceAction::SetLoading(false));
    }

    pub async fn fetch_tickets(&mut self) {
        match self.client.list_support_tickets().await {
            Ok(tickets) => self.state.reduce(ServiceAction::SetTickets(tickets)),
            Err(e) => error!(error = %e, "Error fetching support tickets"),
        }
    }

    pub async fn create_appointment(&mut self, appointment: &Record) -> Result<Record, ClientError> {
        let created = self.client.create_appointment(appointment).await?;
        self.state.reduce(ServiceAction::AddAppointment(created.clone()));
        Ok(created)
    }

    pub async fn create_ticket(&mut self, ticket: &Record) -> Result<Record, ClientError> {
        let created = self.client.create_support_ticket(ticket).await?;
        self.state.reduce(ServiceAction::AddTicket(created.clone()));
        Ok(created)
    }
}
