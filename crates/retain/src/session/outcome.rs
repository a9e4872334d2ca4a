//! Result of sending a request through the session client.

use crate::error::Error;
use crate::http::ApiResponse;

/// What became of one request sent through a [`Session`](crate::Session).
///
/// A request is sent once, and replayed at most once after a credential
/// refresh. `AuthRecovered` marks responses obtained by that replay.
#[derive(Debug)]
#[must_use]
pub enum RequestOutcome {
    /// The first attempt succeeded.
    Ok(ApiResponse),
    /// The first attempt was unauthorized; the replay after a refresh succeeded.
    AuthRecovered(ApiResponse),
    /// The request failed and will not be retried.
    Failed(Error),
}

impl RequestOutcome {
    /// Classify a response that will not be replayed.
    pub(crate) fn settle(response: ApiResponse) -> Self {
        if response.is_success() {
            RequestOutcome::Ok(response)
        } else {
            RequestOutcome::Failed(Error::Api(response.into_error()))
        }
    }

    /// Returns true if the response came from a replay after a refresh.
    pub fn is_recovered(&self) -> bool {
        matches!(self, RequestOutcome::AuthRecovered(_))
    }

    pub fn response(&self) -> Option<&ApiResponse> {
        match self {
            RequestOutcome::Ok(response) | RequestOutcome::AuthRecovered(response) => Some(response),
            RequestOutcome::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&Error> {
        match self {
            RequestOutcome::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// Collapse into a `Result`, forgetting whether recovery happened.
    pub fn into_result(self) -> Result<ApiResponse, Error> {
        match self {
            RequestOutcome::Ok(response) | RequestOutcome::AuthRecovered(response) => Ok(response),
            RequestOutcome::Failed(err) => Err(err),
        }
    }
}
