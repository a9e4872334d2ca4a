//! User notifications.

use tracing::instrument;

use crate::Session;
use crate::error::Error;
use crate::http::ApiRequest;
use crate::http::endpoints::{NOTIFICATIONS, NOTIFICATIONS_MARK_ALL_READ, notification_mark_read};

use super::types::Notification;

#[derive(Debug, Clone, Copy)]
pub struct NotificationsApi<'a> {
    session: &'a Session,
}

impl<'a> NotificationsApi<'a> {
    pub(crate) fn new(session: &'a Session) -> Self {
        Self { session }
    }

    pub async fn list(&self) -> Result<Vec<Notification>, Error> {
        self.session
            .request_json(ApiRequest::get(NOTIFICATIONS))
            .await
    }

    #[instrument(skip(self))]
    pub async fn mark_read(&self, id: i64) -> Result<(), Error> {
        self.session
            .request(ApiRequest::post(notification_mark_read(id)))
            .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn mark_all_read(&self) -> Result<(), Error> {
        self.session
            .request(ApiRequest::post(NOTIFICATIONS_MARK_ALL_READ))
            .await?;
        Ok(())
    }
}
