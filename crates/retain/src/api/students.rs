//! Stored student records.

use tracing::instrument;

use crate::Session;
use crate::error::Error;
use crate::http::ApiRequest;
use crate::http::endpoints::{STUDENTS, student};

use super::types::{PredictionInput, Student, StudentPage};

#[derive(Debug, Clone, Copy)]
pub struct StudentsApi<'a> {
    session: &'a Session,
}

impl<'a> StudentsApi<'a> {
    pub(crate) fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// List the records visible to the logged-in user.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Student>, Error> {
        let page: StudentPage = self.session.request_json(ApiRequest::get(STUDENTS)).await?;
        Ok(page.into_students())
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i64) -> Result<Student, Error> {
        self.session.request_json(ApiRequest::get(student(id))).await
    }

    #[instrument(skip(self, input))]
    pub async fn create(&self, input: &PredictionInput) -> Result<Student, Error> {
        let request = ApiRequest::post(STUDENTS).json(input)?;
        self.session.request_json(request).await
    }

    #[instrument(skip(self, input))]
    pub async fn update(&self, id: i64, input: &PredictionInput) -> Result<Student, Error> {
        let request = ApiRequest::put(student(id)).json(input)?;
        self.session.request_json(request).await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<(), Error> {
        self.session.request(ApiRequest::delete(student(id))).await?;
        Ok(())
    }
}
