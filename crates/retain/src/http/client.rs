//! HTTP client implementation.

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, instrument, trace};

use crate::auth::AccessToken;
use crate::error::Error;
use crate::types::ApiUrl;

use super::request::{ApiRequest, RequestBody};
use super::response::ApiResponse;

/// HTTP client bound to one API base URL.
#[derive(Debug, Clone)]
pub(crate) struct HttpClient {
    client: reqwest::Client,
    api: ApiUrl,
}

impl HttpClient {
    /// Create a new client for the given API.
    pub fn new(api: ApiUrl, timeout: Option<Duration>) -> Result<Self, Error> {
        let mut builder =
            reqwest::Client::builder().user_agent(concat!("retain/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            api,
        })
    }

    pub fn api(&self) -> &ApiUrl {
        &self.api
    }

    /// Send a request, attaching `token` as the bearer credential if given.
    ///
    /// Any status is returned as a response; only transport failures are errors.
    #[instrument(skip(self, request, token), fields(method = %request.method(), path = request.path()))]
    pub async fn send(
        &self,
        request: &ApiRequest,
        token: Option<&AccessToken>,
    ) -> Result<ApiResponse, Error> {
        let url = self.api.endpoint(request.path());
        debug!(authenticated = token.is_some(), "API request");

        let mut builder = self
            .client
            .request(request.method().clone(), &url)
            .headers(request.headers().clone());

        if !request.query_pairs().is_empty() {
            builder = builder.query(request.query_pairs());
        }

        if let Some(token) = token {
            builder = builder.bearer_auth(token.as_str());
        }

        builder = match request.body() {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(value),
            RequestBody::File {
                field,
                file_name,
                bytes,
            } => {
                let part = Part::bytes(bytes.clone()).file_name(file_name.clone());
                builder.multipart(Form::new().part(field.clone(), part))
            }
        };

        let response = builder.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().await?;
        trace!(status = %status, "API response");

        Ok(ApiResponse::new(status, headers, body))
    }

    /// POST a JSON body without credentials and decode a JSON reply.
    ///
    /// Non-success statuses become [`Error::Api`].
    #[instrument(skip(self, body), fields(api = %self.api))]
    pub async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, Error>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        let url = self.api.endpoint(path);
        debug!(%url, "API procedure");

        let response = self.client.post(&url).json(body).send().await?;
        let status = response.status();
        let body = response.text().await?;
        trace!(status = %status, "API response");

        let response = ApiResponse::new(status, Default::default(), body);
        if response.is_success() {
            response.json()
        } else {
            Err(Error::Api(response.into_error()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_creation() {
        let api = ApiUrl::new("https://retention.example.edu/api").unwrap();
        let client = HttpClient::new(api.clone(), Some(Duration::from_secs(5))).unwrap();
        assert_eq!(client.api(), &api);
    }
}
