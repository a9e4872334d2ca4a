//! The authenticated session client.
//!
//! Every API call made through a [`Session`] reads the access credential from
//! the credential store right before it is sent. When the API answers `401`,
//! the session exchanges the refresh credential for a new access credential and
//! replays the call once. Concurrent calls that hit `401` while an exchange is
//! outstanding wait on that same exchange instead of starting another.
//!
//! When no exchange is possible, or the exchange fails, the store is cleared,
//! the [`LogoutHook`] runs, and every waiting call fails.

mod outcome;
mod refresh;

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};

use crate::api::{AuthApi, NotificationsApi, PredictionsApi, StudentsApi, SupportApi};
use crate::auth::{
    AccessToken, CredentialPair, CredentialStore, LogoutHook, MemoryCredentialStore, NoopLogout,
    RefreshToken,
};
use crate::error::{ApiError, AuthError, Error};
use crate::http::endpoints::{TOKEN_REFRESH, TokenRefreshRequest, TokenRefreshResponse};
use crate::http::{ApiRequest, ApiResponse, HttpClient};
use crate::types::ApiUrl;

pub use outcome::RequestOutcome;
use refresh::{RefreshFailure, RefreshResult, RefreshSlot};

/// A client session against the prediction API.
///
/// Sessions are cheap to clone (they use internal `Arc`) and are meant to be
/// constructed once per process and handed to whatever needs to make API calls.
/// Sending requests requires a Tokio runtime.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use retain::{ApiUrl, Credentials, FileCredentialStore, Session};
///
/// # async fn example() -> Result<(), retain::Error> {
/// let api = ApiUrl::new("http://localhost:8000/api")?;
/// let session = Session::builder(api)
///     .store(Arc::new(FileCredentialStore::new("/tmp/retain/credentials.json")))
///     .on_force_logout(|| eprintln!("session expired, please log in again"))
///     .build()?;
///
/// session.auth().login(&Credentials::new("alice", "s3cret")).await?;
/// let students = session.students().list().await?;
/// println!("{} students", students.len());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    client: HttpClient,
    store: Arc<dyn CredentialStore>,
    logout: Arc<dyn LogoutHook>,
    refresh: RefreshSlot,
}

/// Configures and builds a [`Session`].
pub struct SessionBuilder {
    api: ApiUrl,
    store: Option<Arc<dyn CredentialStore>>,
    logout: Option<Arc<dyn LogoutHook>>,
    timeout: Option<Duration>,
}

impl SessionBuilder {
    /// Use `store` for credential persistence.
    ///
    /// Defaults to a [`MemoryCredentialStore`].
    pub fn store(mut self, store: Arc<dyn CredentialStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Run `hook` whenever the session is irrecoverably lost.
    pub fn on_force_logout(mut self, hook: impl LogoutHook + 'static) -> Self {
        self.logout = Some(Arc::new(hook));
        self
    }

    /// Fail requests that take longer than `timeout` with a transport error.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn build(self) -> Result<Session, Error> {
        let client = HttpClient::new(self.api, self.timeout)?;

        Ok(Session {
            inner: Arc::new(SessionInner {
                client,
                store: self
                    .store
                    .unwrap_or_else(|| Arc::new(MemoryCredentialStore::new())),
                logout: self.logout.unwrap_or_else(|| Arc::new(NoopLogout)),
                refresh: RefreshSlot::default(),
            }),
        })
    }
}

impl Session {
    /// Start configuring a session for the API at `api`.
    pub fn builder(api: ApiUrl) -> SessionBuilder {
        SessionBuilder {
            api,
            store: None,
            logout: None,
            timeout: None,
        }
    }

    /// Returns the API base URL.
    pub fn api_url(&self) -> &ApiUrl {
        self.inner.client.api()
    }

    /// Returns the credential store this session reads and writes.
    pub fn store(&self) -> &dyn CredentialStore {
        self.inner.store.as_ref()
    }

    /// Returns true if an access credential is stored.
    pub fn is_authenticated(&self) -> bool {
        self.inner.store.is_authenticated()
    }

    /// Returns true while a credential refresh is outstanding.
    pub fn is_refreshing(&self) -> bool {
        !self.inner.refresh.is_idle()
    }

    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(self)
    }

    pub fn predictions(&self) -> PredictionsApi<'_> {
        PredictionsApi::new(self)
    }

    pub fn students(&self) -> StudentsApi<'_> {
        StudentsApi::new(self)
    }

    pub fn support(&self) -> SupportApi<'_> {
        SupportApi::new(self)
    }

    pub fn notifications(&self) -> NotificationsApi<'_> {
        NotificationsApi::new(self)
    }

    /// Send a request, recovering from an expired access credential.
    ///
    /// The request is sent with the currently stored access credential. On
    /// `401` it waits for a credential refresh (starting one if none is
    /// outstanding) and is replayed exactly once. Other failures are returned
    /// as they are.
    #[instrument(skip(self, request), fields(method = %request.method(), path = request.path()))]
    pub async fn send(&self, request: ApiRequest) -> RequestOutcome {
        let sent_with = self.credential_for(&request);

        let response = match self.inner.client.send(&request, sent_with.as_ref()).await {
            Ok(response) => response,
            Err(e) => return RequestOutcome::Failed(e),
        };

        if !(response.is_unauthorized() && request.is_authenticated()) {
            return RequestOutcome::settle(response);
        }

        let rejected = response.into_error();
        debug!("Request unauthorized, recovering session");

        if let Err(e) = self.recover(sent_with.as_ref(), rejected).await {
            return RequestOutcome::Failed(e);
        }

        let access = self.credential_for(&request);
        match self.inner.client.send(&request, access.as_ref()).await {
            Ok(response) if response.is_unauthorized() => {
                warn!("Replayed request unauthorized, giving up");
                RequestOutcome::Failed(AuthError::Unauthorized(response.into_error()).into())
            }
            Ok(response) if response.is_success() => RequestOutcome::AuthRecovered(response),
            Ok(response) => RequestOutcome::Failed(Error::Api(response.into_error())),
            Err(e) => RequestOutcome::Failed(e),
        }
    }

    /// Send a request and return its response, or the error it ended with.
    pub async fn request(&self, request: ApiRequest) -> Result<ApiResponse, Error> {
        self.send(request).await.into_result()
    }

    /// Send a request and decode its JSON response.
    pub async fn request_json<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, Error> {
        self.request(request).await?.json()
    }

    fn credential_for(&self, request: &ApiRequest) -> Option<AccessToken> {
        if !request.is_authenticated() {
            return None;
        }
        self.inner.store.read().map(|pair| pair.access)
    }

    /// Wait until a fresh access credential is stored, or fail.
    async fn recover(&self, sent_with: Option<&AccessToken>, rejected: ApiError) -> Result<(), Error> {
        match (sent_with, self.inner.store.read().map(|pair| pair.access)) {
            (sent, Some(current)) if sent != Some(&current) => {
                debug!("Credential replaced since the request was sent, replaying");
                return Ok(());
            }
            (Some(_), None) => {
                debug!("Session ended since the request was sent");
                return Err(AuthError::NoRefreshCredential { rejected }.into());
            }
            _ => {}
        }

        let inner = Arc::clone(&self.inner);
        let rejected_access = sent_with.cloned();
        let (refresh, started) = self.inner.refresh.join_or_start(move || async move {
            let _settle = inner.refresh.settle_on_drop();
            inner.run_refresh(rejected_access).await
        });

        if !started {
            debug!("Joining in-flight refresh");
        }

        match refresh.await {
            Ok(()) => Ok(()),
            Err(RefreshFailure::NoCredential) => {
                Err(AuthError::NoRefreshCredential { rejected }.into())
            }
            Err(RefreshFailure::Rejected(reason)) => {
                Err(AuthError::RefreshRejected { rejected, reason }.into())
            }
        }
    }
}

impl SessionInner {
    /// Exchange the stored refresh credential for a new access credential.
    ///
    /// Runs at most once at a time per session; see [`RefreshSlot`].
    /// `rejected_access` is the credential the triggering request was sent
    /// with; if another refresh already replaced it, no exchange is made.
    #[instrument(skip_all)]
    async fn run_refresh(&self, rejected_access: Option<AccessToken>) -> RefreshResult {
        let Some(pair) = self.store.read() else {
            warn!("No refresh credential stored, forcing logout");
            self.force_logout();
            return Err(RefreshFailure::NoCredential);
        };

        if rejected_access.is_some_and(|rejected| rejected != pair.access) {
            debug!("Credential already refreshed");
            return Ok(());
        }

        info!("Refreshing access credential");

        let request = TokenRefreshRequest {
            refresh: pair.refresh.as_str(),
        };

        match self
            .client
            .post_json::<_, TokenRefreshResponse>(TOKEN_REFRESH, &request)
            .await
        {
            Ok(response) => {
                let access = AccessToken::new(response.access);
                let rotated = response.refresh.is_some();
                let next = match response.refresh {
                    Some(refresh) => CredentialPair::new(access, RefreshToken::new(refresh)),
                    None => pair.with_access(access),
                };

                self.store.save(&next);

                debug!(rotated, "Access credential refreshed");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Refresh rejected, forcing logout");
                self.force_logout();
                Err(RefreshFailure::Rejected(e.to_string()))
            }
        }
    }

    fn force_logout(&self) {
        self.store.clear();
        self.logout.force_logout();
    }
}

// Custom Debug impl that hides sensitive data
impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("api", self.api_url())
            .field("authenticated", &self.is_authenticated())
            .field("refreshing", &self.is_refreshing())
            .finish()
    }
}
