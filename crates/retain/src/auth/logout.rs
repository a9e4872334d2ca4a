//! Force-logout collaborator interface.

/// Invoked after the session client has cleared the credential store because
/// the session could not be recovered.
///
/// Implementations send the user back to the login entry point. The hook runs
/// once per failed refresh, however many requests were waiting on it.
pub trait LogoutHook: Send + Sync {
    fn force_logout(&self);
}

impl<F> LogoutHook for F
where
    F: Fn() + Send + Sync,
{
    fn force_logout(&self) {
        self()
    }
}

/// A hook that does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopLogout;

impl LogoutHook for NoopLogout {
    fn force_logout(&self) {}
}
