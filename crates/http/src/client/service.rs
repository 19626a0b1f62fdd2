//! After-sales service endpoints

use super::{ApiClient, ClientError};
use crate::types::Record;

impl ApiClient {
    /// List offered services
    pub async fn list_services(&self) -> Result<Vec<Record>, ClientError> {
        self.get_listing("/service/services/").await
    }

    /// List appointments
    pub async fn list_appointments(&self) -> Result<Vec<Record>, ClientError> {
        self.get_listing("/service/appointments/").await
    }

    /// Book an appointment
    pub async fn create_appointment(&self, appointment: &Record) -> Result<Record, ClientError> {
        self.post_json("/service/appointments/", appointment).await
    }

    /// List support tickets
    pub async fn list_support_tickets(&self) -> Result<Vec<Record>, ClientError> {
        self.get_listing("/service/tickets/").await
    }

    /// Open a support ticket
    pub async fn create_support_ticket(&self, ticket: &Record) -> Result<Record, ClientError> {
        self.post_json("/service/tickets/", ticket).await
    }
}
