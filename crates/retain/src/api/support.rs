//! Support tickets.

use tracing::instrument;

use crate::Session;
use crate::error::Error;
use crate::http::ApiRequest;
use crate::http::endpoints::SUPPORT;

use super::types::{NewTicket, SupportTicket};

#[derive(Debug, Clone, Copy)]
pub struct SupportApi<'a> {
    session: &'a Session,
}

impl<'a> SupportApi<'a> {
    pub(crate) fn new(session: &'a Session) -> Self {
        Self { session }
    }

    pub async fn tickets(&self) -> Result<Vec<SupportTicket>, Error> {
        self.session.request_json(ApiRequest::get(SUPPORT)).await
    }

    #[instrument(skip(self, message))]
    pub async fn create_ticket(&self, subject: &str, message: &str) -> Result<SupportTicket, Error> {
        let request = ApiRequest::post(SUPPORT).json(&NewTicket { subject, message })?;
        self.session.request_json(request).await
    }
}
