//! API credential handling
//!
//! - `Credential`: an API key that never prints in full
//! - `CredentialRotor`: the ordered key list and the active client
//! - `ResilientInvoker`: runs remote calls, rotating keys on quota errors

mod invoker;
mod rotor;

pub use invoker::{
    ApiOperation, ChannelStatsOperation, Invocation, ResilientInvoker, SearchOperation,
    VideoDetailsOperation,
};
pub use rotor::{CredentialRotor, CredentialsExhausted};

use std::fmt;

/// An opaque API key
///
/// `Debug` and `Display` only show the last four characters.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The full token, for building requests
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Last four characters, or `KEY` for tokens too short to abbreviate
    pub fn suffix(&self) -> &str {
        let count = self.0.chars().count();
        if count <= 4 {
            return "KEY";
        }
        match self.0.char_indices().nth(count - 4) {
            Some((start, _)) => &self.0[start..],
            None => "KEY",
        }
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "...{}", self.suffix())
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Credential(...{})", self.suffix())
    }
}
