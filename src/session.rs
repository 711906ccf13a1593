//! Session boundary: who is signed in, and whether they may administer
//! complaints.
//!
//! Credential checking sits behind [`Authenticator`]; the bundled
//! [`FixedCredentialAuthenticator`] knows one privileged account and lets any
//! other email in as a regular citizen.

use log::{info, warn};
use uuid::Uuid;

use crate::app_response::AppResponse;
use crate::local_db_model::{Session, ADMIN_SESSION_ID};
use crate::store::ComplaintStore;

pub const DEFAULT_ADMIN_EMAIL: &str = "admin@dreamclean.com";
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

pub trait Authenticator {
    /// Resolves a credential pair to an identity, or `None` when refused.
    fn authenticate(&self, email: &str, password: &str) -> Option<Session>;

    fn is_privileged(&self, session: &Session) -> bool;
}

#[derive(Debug, Clone)]
pub struct FixedCredentialAuthenticator {
    admin_email: String,
    admin_password: String,
}

impl FixedCredentialAuthenticator {
    pub fn new(admin_email: impl Into<String>, admin_password: impl Into<String>) -> Self {
        Self {
            admin_email: admin_email.into(),
            admin_password: admin_password.into(),
        }
    }
}

impl Default for FixedCredentialAuthenticator {
    fn default() -> Self {
        Self::new(DEFAULT_ADMIN_EMAIL, DEFAULT_ADMIN_PASSWORD)
    }
}

impl Authenticator for FixedCredentialAuthenticator {
    fn authenticate(&self, email: &str, password: &str) -> Option<Session> {
        let email = email.trim();
        if email.is_empty() {
            return None;
        }

        if email == self.admin_email {
            if password != self.admin_password {
                return None;
            }
            return Some(Session {
                email: email.to_string(),
                id: ADMIN_SESSION_ID.to_string(),
            });
        }

        Some(citizen_session(email))
    }

    fn is_privileged(&self, session: &Session) -> bool {
        session.id == ADMIN_SESSION_ID && session.email == self.admin_email
    }
}

fn citizen_session(email: &str) -> Session {
    Session {
        email: email.to_string(),
        id: Uuid::new_v4().to_string(),
    }
}

/// Sign-in state persisted through a [`ComplaintStore`].
pub struct SessionManager<S, A> {
    store: S,
    authenticator: A,
}

impl<S: ComplaintStore, A: Authenticator> SessionManager<S, A> {
    pub fn new(store: S, authenticator: A) -> Self {
        Self {
            store,
            authenticator,
        }
    }

    pub fn sign_in(&self, email: &str, password: &str) -> Result<Session, AppResponse> {
        let session = self
            .authenticator
            .authenticate(email, password)
            .ok_or_else(|| {
                warn!("Sign-in refused for {email}");
                AppResponse::Unauthorized("Invalid email or password".to_string())
            })?;

        self.store.save_session(&session)?;
        info!("Signed in {} (privileged: {})", session.email, self.authenticator.is_privileged(&session));
        Ok(session)
    }

    /// Registers a citizen. Sign-up never yields a privileged identity.
    pub fn sign_up(&self, email: &str, password: &str, full_name: &str) -> Result<Session, AppResponse> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() || full_name.trim().is_empty() {
            return Err(AppResponse::ValidationError(
                "Email, password and full name are required".to_string(),
            ));
        }

        let session = citizen_session(email);
        self.store.save_session(&session)?;
        info!("Created account for {email}");
        Ok(session)
    }

    pub fn sign_out(&self) -> Result<(), AppResponse> {
        self.store.clear_session()?;
        info!("Signed out");
        Ok(())
    }

    /// The stored identity. An unreadable session record counts as signed out.
    pub fn current(&self) -> Result<Option<Session>, AppResponse> {
        match self.store.load_session() {
            Ok(session) => Ok(session),
            Err(AppResponse::CorruptState(reason)) => {
                warn!("Ignoring unreadable session record: {reason}");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    pub fn is_admin(&self) -> Result<bool, AppResponse> {
        Ok(self
            .current()?
            .is_some_and(|session| self.authenticator.is_privileged(&session)))
    }

    /// Fails with [`AppResponse::Unauthorized`] unless an administrator is signed in.
    pub fn require_admin(&self) -> Result<Session, AppResponse> {
        match self.current()? {
            Some(session) if self.authenticator.is_privileged(&session) => Ok(session),
            _ => Err(AppResponse::Unauthorized(
                "Administrator session required".to_string(),
            )),
        }
    }
}
