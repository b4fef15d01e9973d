//! Remote calls with credential rotation
//!
//! Failures are sorted into three outcomes:
//! - quota errors rotate to the next credential and retry the same call
//! - any other error gives up on that one call (`Skipped`)
//! - running out of credentials is final for the whole run (`Exhausted`)

use crate::api::{ApiError, ApiResult, ChannelItem, SearchItem, SearchRequest, VideoApi, VideoItem};
use crate::credentials::{CredentialRotor, CredentialsExhausted};
use async_trait::async_trait;

/// One logical remote call that can be replayed against another credential
#[async_trait]
pub trait ApiOperation: Send + Sync {
    type Output: Send;

    /// Short description for log lines
    fn describe(&self) -> String;

    async fn execute(&self, api: &dyn VideoApi) -> ApiResult<Self::Output>;
}

/// Outcome of an invoked operation
#[derive(Debug)]
pub enum Invocation<T> {
    /// The call succeeded, possibly after rotating credentials
    Completed(T),
    /// The call failed for a reason rotation cannot fix
    Skipped(ApiError),
    /// No credential is left to try
    Exhausted,
}

impl<T> Invocation<T> {
    /// Collapses the outcome for `?` propagation: only exhaustion is an error
    pub fn into_result(self) -> Result<Option<T>, CredentialsExhausted> {
        match self {
            Self::Completed(value) => Ok(Some(value)),
            Self::Skipped(_) => Ok(None),
            Self::Exhausted => Err(CredentialsExhausted),
        }
    }
}

/// Runs operations against the rotor's active credential
pub struct ResilientInvoker {
    rotor: CredentialRotor,
    attempts: u64,
    rotations: u64,
}

impl ResilientInvoker {
    pub fn new(rotor: CredentialRotor) -> Self {
        Self {
            rotor,
            attempts: 0,
            rotations: 0,
        }
    }

    /// Runs the operation, rotating credentials on quota failures
    ///
    /// Every retry retires one credential, so the loop runs at most once per
    /// configured credential.
    pub async fn invoke<O: ApiOperation>(&mut self, operation: &O) -> Invocation<O::Output> {
        loop {
            let api = match self.rotor.current() {
                Ok(api) => api,
                Err(CredentialsExhausted) => return Invocation::Exhausted,
            };

            self.attempts += 1;
            match operation.execute(api.as_ref()).await {
                Ok(output) => return Invocation::Completed(output),
                Err(err) if err.is_quota() => {
                    tracing::warn!("API limit hit during {}: {}", operation.describe(), err);
                    self.rotations += 1;
                    if !self.rotor.advance() {
                        return Invocation::Exhausted;
                    }
                }
                Err(err) => {
                    tracing::warn!("{} failed: {}", operation.describe(), err);
                    return Invocation::Skipped(err);
                }
            }
        }
    }

    pub fn rotor(&self) -> &CredentialRotor {
        &self.rotor
    }

    /// Total calls sent, including ones that were retried
    pub fn attempts(&self) -> u64 {
        self.attempts
    }

    /// Number of credential switches caused by quota errors
    pub fn rotations(&self) -> u64 {
        self.rotations
    }
}

/// Search for one query with one sort order
pub struct SearchOperation {
    pub request: SearchRequest,
}

#[async_trait]
impl ApiOperation for SearchOperation {
    type Output = Vec<SearchItem>;

    fn describe(&self) -> String {
        format!("search '{}' ({})", self.request.query, self.request.order)
    }

    async fn execute(&self, api: &dyn VideoApi) -> ApiResult<Self::Output> {
        api.search(&self.request).await
    }
}

/// Detail fetch for one batch of video ids
pub struct VideoDetailsOperation {
    pub ids: Vec<String>,
}

#[async_trait]
impl ApiOperation for VideoDetailsOperation {
    type Output = Vec<VideoItem>;

    fn describe(&self) -> String {
        format!("video details for {} ids", self.ids.len())
    }

    async fn execute(&self, api: &dyn VideoApi) -> ApiResult<Self::Output> {
        api.videos(&self.ids).await
    }
}

/// Statistics fetch for one batch of channel ids
pub struct ChannelStatsOperation {
    pub ids: Vec<String>,
}

#[async_trait]
impl ApiOperation for ChannelStatsOperation {
    type Output = Vec<ChannelItem>;

    fn describe(&self) -> String {
        format!("channel statistics for {} ids", self.ids.len())
    }

    async fn execute(&self, api: &dyn VideoApi) -> ApiResult<Self::Output> {
        api.channels(&self.ids).await
    }
}
