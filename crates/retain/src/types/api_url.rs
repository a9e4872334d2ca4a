//! API base URL type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

use crate::error::{Error, InvalidInputError};

/// Base URL used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";

/// A validated base URL of the prediction API.
///
/// Endpoints are addressed relative to the base, so a base with a path prefix
/// (`/api`) keeps that prefix for every request.
///
/// # Example
///
/// ```
/// use retain::ApiUrl;
///
/// let api = ApiUrl::new("https://retention.example.edu/api/").unwrap();
/// assert_eq!(api.endpoint("/token/refresh/"),
///            "https://retention.example.edu/api/token/refresh/");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ApiUrl(Url);

impl ApiUrl {
    /// Create a new API URL from a string, validating the format.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL does not parse, is not absolute, or uses
    /// plain HTTP for a non-loopback host.
    pub fn new(s: impl AsRef<str>) -> Result<Self, Error> {
        let s = s.as_ref();
        let url = Url::parse(s).map_err(|e| InvalidInputError::ApiUrl {
            value: s.to_string(),
            reason: e.to_string(),
        })?;

        Self::validate(&url, s)?;

        Ok(Self(url))
    }

    /// Returns the full URL of an endpoint path such as `/students/42/`.
    pub fn endpoint(&self, path: &str) -> String {
        let base = self.0.as_str().trim_end_matches('/');
        format!("{}/{}", base, path.trim_start_matches('/'))
    }

    /// Returns the base URL as a string.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the host string.
    pub fn host(&self) -> Option<&str> {
        self.0.host_str()
    }

    fn validate(url: &Url, original: &str) -> Result<(), Error> {
        if url.cannot_be_a_base() {
            return Err(InvalidInputError::ApiUrl {
                value: original.to_string(),
                reason: "must be an absolute URL".to_string(),
            }
            .into());
        }

        let scheme = url.scheme();
        let is_loopback = url
            .host_str()
            .is_some_and(|h| h == "localhost" || h == "127.0.0.1" || h == "[::1]");

        if scheme != "https" && !(scheme == "http" && is_loopback) {
            return Err(InvalidInputError::ApiUrl {
                value: original.to_string(),
                reason: "must use HTTPS (HTTP allowed only for localhost)".to_string(),
            }
            .into());
        }

        if url.host_str().is_none() {
            return Err(InvalidInputError::ApiUrl {
                value: original.to_string(),
                reason: "must have a host".to_string(),
            }
            .into());
        }

        Ok(())
    }
}

impl fmt::Display for ApiUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ApiUrl {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for ApiUrl {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.0.as_str())
    }
}

impl<'de> Deserialize<'de> for ApiUrl {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ApiUrl::new(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_https_url() {
        let api = ApiUrl::new("https://retention.example.edu/api").unwrap();
        assert_eq!(api.host(), Some("retention.example.edu"));
    }

    #[test]
    fn default_is_local_development_endpoint() {
        let api = ApiUrl::new(DEFAULT_API_URL).unwrap();
        assert_eq!(api.endpoint("token/"), "http://localhost:8000/api/token/");
    }

    #[test]
    fn endpoint_keeps_path_prefix() {
        let api = ApiUrl::new("http://127.0.0.1:8000/api").unwrap();
        assert_eq!(
            api.endpoint("/students/7/"),
            "http://127.0.0.1:8000/api/students/7/"
        );
    }

    #[test]
    fn endpoint_normalizes_slashes() {
        let api = ApiUrl::new("https://retention.example.edu/api/").unwrap();
        assert_eq!(
            api.endpoint("health/"),
            "https://retention.example.edu/api/health/"
        );

        let root = ApiUrl::new("https://retention.example.edu").unwrap();
        assert_eq!(
            root.endpoint("/health/"),
            "https://retention.example.edu/health/"
        );
    }

    #[test]
    fn invalid_http_non_localhost() {
        assert!(ApiUrl::new("http://retention.example.edu/api").is_err());
    }

    #[test]
    fn invalid_relative_url() {
        assert!(ApiUrl::new("/api").is_err());
    }

    #[test]
    fn deserializes_with_validation() {
        let api: ApiUrl = serde_json::from_str(r#""http://localhost:8000/api""#).unwrap();
        assert_eq!(api.host(), Some("localhost"));
        assert!(serde_json::from_str::<ApiUrl>(r#""ftp://example.com""#).is_err());
    }
}
