use crate::api::{ApiConnector, VideoApi};
use crate::credentials::Credential;
use std::sync::Arc;
use thiserror::Error;

/// Every credential has been used up (or none were configured)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("all API credentials are exhausted")]
pub struct CredentialsExhausted;

/// Ordered list of credentials with a single forward-only cursor
///
/// The client for the active credential is built lazily on the first
/// `current()` call after construction or after `advance()`.
pub struct CredentialRotor {
    credentials: Vec<Credential>,
    cursor: usize,
    active: Option<Arc<dyn VideoApi>>,
    connector: Arc<dyn ApiConnector>,
}

impl CredentialRotor {
    pub fn new(credentials: Vec<Credential>, connector: Arc<dyn ApiConnector>) -> Self {
        Self {
            credentials,
            cursor: 0,
            active: None,
            connector,
        }
    }

    /// Builds a rotor from raw key strings
    pub fn from_tokens<I, S>(tokens: I, connector: Arc<dyn ApiConnector>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(tokens.into_iter().map(Credential::new).collect(), connector)
    }

    /// Returns the client for the active credential
    pub fn current(&mut self) -> Result<Arc<dyn VideoApi>, CredentialsExhausted> {
        if let Some(api) = &self.active {
            return Ok(Arc::clone(api));
        }

        let credential = self.credentials.get(self.cursor).ok_or(CredentialsExhausted)?;
        tracing::info!(
            "Using credential {}/{} ({})",
            self.cursor + 1,
            self.credentials.len(),
            credential
        );

        let api = self.connector.connect(credential);
        self.active = Some(Arc::clone(&api));
        Ok(api)
    }

    /// Retires the active credential and moves to the next one
    ///
    /// Returns false once no credential is left.
    pub fn advance(&mut self) -> bool {
        if let Some(retired) = self.credentials.get(self.cursor) {
            tracing::warn!("Credential {} retired, switching", retired);
            self.cursor += 1;
        }
        self.active = None;

        if self.is_exhausted() {
            tracing::error!("No credentials left ({} used)", self.credentials.len());
            false
        } else {
            true
        }
    }

    /// The active credential, if any remain
    pub fn current_credential(&self) -> Option<&Credential> {
        self.credentials.get(self.cursor)
    }

    /// Zero-based index of the active credential
    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.credentials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
    }

    /// Number of credentials not yet retired, including the active one
    pub fn remaining(&self) -> usize {
        self.credentials.len().saturating_sub(self.cursor)
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.credentials.len()
    }
}
