//! Dropout predictions and cohort statistics.

use tracing::{debug, instrument};

use crate::Session;
use crate::error::Error;
use crate::http::ApiRequest;
use crate::http::endpoints::{CLASS_AVERAGE, HEALTH, PREDICT, UPLOAD};

use super::types::{ClassAverage, HealthStatus, PredictRequest, PredictionInput, PredictionResult, UploadSummary};

#[derive(Debug, Clone, Copy)]
pub struct PredictionsApi<'a> {
    session: &'a Session,
}

impl<'a> PredictionsApi<'a> {
    pub(crate) fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Run the model on one student.
    ///
    /// With `save_record`, the API also stores the student and reports the
    /// new record's id in [`PredictionResult::saved_record_id`].
    #[instrument(skip(self, input))]
    pub async fn predict(
        &self,
        input: &PredictionInput,
        save_record: bool,
    ) -> Result<PredictionResult, Error> {
        let request = ApiRequest::post(PREDICT).json(&PredictRequest { input, save_record })?;
        let result: PredictionResult = self.session.request_json(request).await?;

        debug!(
            predicted_class = %result.predicted_class,
            dropout_probability = result.dropout_probability,
            "Prediction received"
        );
        Ok(result)
    }

    pub async fn class_average(&self) -> Result<ClassAverage, Error> {
        self.session
            .request_json(ApiRequest::get(CLASS_AVERAGE))
            .await
    }

    pub async fn health(&self) -> Result<HealthStatus, Error> {
        self.session.request_json(ApiRequest::get(HEALTH)).await
    }

    /// Upload a CSV file of students for bulk prediction.
    ///
    /// The file is sent as-is; the API does the parsing.
    #[instrument(skip(self, bytes), fields(len = bytes.len()))]
    pub async fn upload_csv(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadSummary, Error> {
        let request = ApiRequest::post(UPLOAD).file("file", file_name, bytes);
        self.session.request_json(request).await
    }
}
