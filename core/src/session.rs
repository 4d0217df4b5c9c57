//! Session lifecycle: login, bootstrap, logout.
//!
//! # Design
//! `SessionManager` is the single owner of authentication state. It persists
//! through a host-supplied `SessionStore` (browser local storage, a file, or
//! `MemoryStore`) under exactly two keys. Other components never cache the
//! token; authenticated calls borrow the manager and read the store at call
//! time, so a logout takes effect for every later request.
//!
//! A store holding a token without a decodable admin record (or the reverse)
//! reads as an empty session, so callers never observe half a login.

use std::collections::HashMap;

use tracing::{debug, info};

use crate::client::BlogClient;
use crate::config::ClientConfig;
use crate::error::{ErrorKind, OperationError};
use crate::http::{send_checked, Transport};
use crate::probe::probe;
use crate::types::{
    Admin, AdminStatus, BootstrapOutcome, BootstrapRequest, Credentials, LoginRequest,
};

pub const TOKEN_KEY: &str = "token";
pub const ADMIN_KEY: &str = "admin";

/// Key/value persistence for the session. Only `TOKEN_KEY` and `ADMIN_KEY`
/// are ever touched.
pub trait SessionStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String);
    fn remove(&mut self, key: &str);
}

/// In-process store; the default for hosts without persistence and for tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.entries.insert(key.to_string(), value);
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

/// Snapshot of the authenticated identity. Token and admin are either both
/// present or both absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    inner: Option<(String, Admin)>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.is_some()
    }

    pub fn token(&self) -> Option<&str> {
        self.inner.as_ref().map(|(token, _)| token.as_str())
    }

    pub fn admin(&self) -> Option<&Admin> {
        self.inner.as_ref().map(|(_, admin)| admin)
    }
}

pub struct SessionManager<S: SessionStore = MemoryStore> {
    client: BlogClient,
    bootstrap_paths: Vec<String>,
    store: S,
}

impl SessionManager<MemoryStore> {
    pub fn in_memory(config: &ClientConfig) -> Self {
        Self::new(config, MemoryStore::default())
    }
}

impl<S: SessionStore> SessionManager<S> {
    pub fn new(config: &ClientConfig, store: S) -> Self {
        Self {
            client: BlogClient::new(&config.base_url),
            bootstrap_paths: config.bootstrap_paths.clone(),
            store,
        }
    }

    /// Current session as persisted in the store.
    pub fn current_session(&self) -> Session {
        let token = self.store.get(TOKEN_KEY).filter(|t| !t.is_empty());
        let admin = self
            .store
            .get(ADMIN_KEY)
            .and_then(|raw| serde_json::from_str::<Admin>(&raw).ok());
        match (token, admin) {
            (Some(token), Some(admin)) => Session {
                inner: Some((token, admin)),
            },
            _ => Session::anonymous(),
        }
    }

    pub fn login<T: Transport + ?Sized>(
        &mut self,
        transport: &mut T,
        email: &str,
        password: &str,
    ) -> Result<Session, OperationError> {
        self.logout();
        let request = self.client.build_login(&LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        })?;
        debug!(email, "logging in");
        let response = send_checked(transport, request)?;
        let login = self.client.parse_login(response)?;

        let token = login.token.filter(|t| !t.is_empty());
        let token = match (login.success, token) {
            (true, Some(token)) => token,
            _ => {
                let message = login
                    .message
                    .unwrap_or_else(|| "Login failed - no token received".to_string());
                return Err(OperationError::new(ErrorKind::AuthenticationRejected, message));
            }
        };
        let admin = with_email(login.admin, email);
        self.store_session(token, &admin)?;
        info!(email = %admin.email, "logged in");
        Ok(self.current_session())
    }

    /// Drop token and admin record. Local only; never fails.
    pub fn logout(&mut self) {
        if self.store.get(TOKEN_KEY).is_some() {
            info!("logged out");
        }
        self.store.remove(TOKEN_KEY);
        self.store.remove(ADMIN_KEY);
    }

    /// Create the first administrator by probing the configured bootstrap
    /// paths in order. A response carrying both a token and an admin record
    /// also logs the operator in.
    pub fn bootstrap<T: Transport + ?Sized>(
        &mut self,
        transport: &mut T,
        request: &BootstrapRequest,
    ) -> Result<BootstrapOutcome, OperationError> {
        let client = &self.client;
        let (endpoint, response) = probe(&self.bootstrap_paths, |path| {
            debug!(endpoint = %path, "trying bootstrap endpoint");
            let attempt = client.build_bootstrap(path, request)?;
            let response = send_checked(&mut *transport, attempt)?;
            client.parse_bootstrap(response)
        })?;
        let endpoint = endpoint.clone();
        info!(endpoint = %endpoint, "bootstrap endpoint accepted the request");

        let confirmed = response.success || response.token.is_some() || response.admin.is_some();
        if let (Some(token), Some(admin)) = (response.token.filter(|t| !t.is_empty()), response.admin) {
            self.store_session(token, &with_email(Some(admin), &request.email))?;
        }
        let credentials = response.credentials.unwrap_or_else(|| Credentials {
            email: request.email.clone(),
            password: request.password.clone(),
        });
        Ok(BootstrapOutcome {
            endpoint,
            credentials,
            confirmed,
        })
    }

    /// Diagnostics: how many administrators the backend knows about.
    pub fn check_admins<T: Transport + ?Sized>(
        &self,
        transport: &mut T,
    ) -> Result<AdminStatus, OperationError> {
        let response = send_checked(transport, self.client.build_check_admin())?;
        self.client.parse_check_admin(response)
    }

    /// Token for an authenticated call, read from the store now, or
    /// `Unauthenticated`.
    pub(crate) fn require_token(&self) -> Result<String, OperationError> {
        self.current_session()
            .inner
            .map(|(token, _)| token)
            .ok_or_else(OperationError::unauthenticated)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn store_session(&mut self, token: String, admin: &Admin) -> Result<(), OperationError> {
        let admin = serde_json::to_string(admin).map_err(|e| {
            OperationError::new(
                ErrorKind::MalformedResponse,
                format!("could not encode admin record: {e}"),
            )
        })?;
        self.store.set(ADMIN_KEY, admin);
        self.store.set(TOKEN_KEY, token);
        Ok(())
    }
}

/// The backend's admin record, with the address the operator signed in with
/// filling a missing email.
fn with_email(admin: Option<Admin>, email: &str) -> Admin {
    let mut admin = admin.unwrap_or_else(|| Admin {
        id: String::new(),
        email: String::new(),
        name: None,
        role: None,
    });
    if admin.email.is_empty() {
        admin.email = email.to_string();
    }
    admin
}
