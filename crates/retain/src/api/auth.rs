//! Credential exchange and account registration.

use tracing::{debug, info, instrument};

use crate::Session;
use crate::auth::{AccessToken, CredentialPair, Credentials, RefreshToken};
use crate::error::{AuthError, Error};
use crate::http::ApiRequest;
use crate::http::endpoints::{REGISTER, TOKEN, TokenResponse};

use super::types::{RegisterResponse, Registration};

/// Login, registration, and logout.
#[derive(Debug, Clone, Copy)]
pub struct AuthApi<'a> {
    session: &'a Session,
}

impl<'a> AuthApi<'a> {
    pub(crate) fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Exchange a username and password for a credential pair.
    ///
    /// The pair is persisted to the session's credential store before it is
    /// returned.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] if the API rejects the
    /// username or password.
    #[instrument(skip(self, credentials), fields(username = credentials.username()))]
    pub async fn login(&self, credentials: &Credentials) -> Result<CredentialPair, Error> {
        info!("Logging in");

        let request = ApiRequest::post(TOKEN).anonymous().json(credentials)?;
        let response: TokenResponse = match self.session.request_json(request).await {
            Err(Error::Api(e)) if e.is_unauthorized() => {
                return Err(AuthError::InvalidCredentials.into());
            }
            other => other?,
        };

        let pair = CredentialPair::new(
            AccessToken::new(response.access),
            RefreshToken::new(response.refresh),
        );
        self.session.store().save(&pair);

        debug!("Login succeeded");
        Ok(pair)
    }

    /// Create an account. Does not log in.
    #[instrument(skip(self, registration), fields(username = %registration.username))]
    pub async fn register(&self, registration: &Registration) -> Result<RegisterResponse, Error> {
        info!("Registering account");

        let request = ApiRequest::post(REGISTER).anonymous().json(registration)?;
        self.session.request_json(request).await
    }

    /// Create an account and log in with the same username and password.
    pub async fn register_and_login(
        &self,
        registration: &Registration,
    ) -> Result<(RegisterResponse, CredentialPair), Error> {
        let registered = self.register(registration).await?;
        let credentials = Credentials::new(&registration.username, &registration.password);
        let pair = self.login(&credentials).await?;
        Ok((registered, pair))
    }

    /// Forget the stored credentials.
    ///
    /// This is a user-initiated logout; the force-logout hook does not run.
    pub fn logout(&self) {
        self.session.store().clear();
        info!("Logged out");
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }
}
