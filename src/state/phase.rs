/// Phase definitions for a crawl run
///
/// The orchestrator moves through these phases in a fixed order and validates
/// every transition.
use std::fmt;

/// Represents where a crawl run currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlPhase {
    // ===== Startup =====
    /// Nothing has happened yet
    Idle,

    /// Reading the dataset and journal to rebuild run state
    LoadingState,

    // ===== Per-query loop =====
    /// Searching and enriching one query
    PerQuery,

    /// Appending one query's rows and marking it complete
    Persisting,

    // ===== Terminal States =====
    /// Every configured query was processed
    Done,

    /// Credentials ran out; the in-flight query was dropped
    FatalAbort,
}

impl CrawlPhase {
    /// Returns true if the run cannot continue from this phase
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::FatalAbort)
    }

    /// Returns true if moving to `next` is a legal step
    pub fn can_transition_to(&self, next: CrawlPhase) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::LoadingState)
                | (Self::LoadingState, Self::PerQuery)
                | (Self::LoadingState, Self::Done)
                | (Self::PerQuery, Self::Persisting)
                | (Self::PerQuery, Self::FatalAbort)
                | (Self::Persisting, Self::PerQuery)
                | (Self::Persisting, Self::Done)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::LoadingState => "loading_state",
            Self::PerQuery => "per_query",
            Self::Persisting => "persisting",
            Self::Done => "done",
            Self::FatalAbort => "fatal_abort",
        }
    }

    /// Returns all phases
    pub fn all_phases() -> Vec<Self> {
        vec![
            Self::Idle,
            Self::LoadingState,
            Self::PerQuery,
            Self::Persisting,
            Self::Done,
            Self::FatalAbort,
        ]
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
