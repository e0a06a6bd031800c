use chrono::{DateTime, Utc};
use storage::models::{Competition, Season};

use crate::error::{EngineError, Result};

/// Lifecycle phase of a competition. Derived, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompetitionStatus {
    Draft,
    Active,
    Ended,
    Cancelled,
}

impl CompetitionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompetitionStatus::Draft => "DRAFT",
            CompetitionStatus::Active => "ACTIVE",
            CompetitionStatus::Ended => "ENDED",
            CompetitionStatus::Cancelled => "CANCELLED",
        }
    }
}

impl std::fmt::Display for CompetitionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Concrete competition window after resolving the date specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompetitionWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl CompetitionWindow {
    /// Effective end for activity queries: an active window runs up to
    /// "now".
    pub fn effective_end(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.end.min(now)
    }
}

/// Applies the date-specification invariant: fixed pair XOR season key. A
/// season-dated competition needs its season row; `None` there means the
/// key is unknown.
pub fn resolve_window(
    competition: &Competition,
    season: Option<&Season>,
) -> Result<CompetitionWindow> {
    match (
        competition.start_at,
        competition.end_at,
        competition.season_key.as_deref(),
    ) {
        (Some(start), Some(end), None) => Ok(CompetitionWindow { start, end }),
        (None, None, Some(key)) => {
            let season = season.ok_or_else(|| {
                EngineError::Validation(format!(
                    "competition {} references unknown season '{key}'",
                    competition.competition_id
                ))
            })?;
            Ok(CompetitionWindow {
                start: season.start_at,
                end: season.end_at,
            })
        }
        _ => Err(EngineError::Validation(format!(
            "competition {} has a malformed date specification",
            competition.competition_id
        ))),
    }
}

/// Derives the lifecycle phase. Priority order is load-bearing:
/// cancellation wins even past the end date, and a window with
/// `start == end` is instantaneously ENDED, never ACTIVE.
pub fn resolve_status(
    is_cancelled: bool,
    window: CompetitionWindow,
    now: DateTime<Utc>,
) -> CompetitionStatus {
    if is_cancelled {
        return CompetitionStatus::Cancelled;
    }
    if now < window.start {
        return CompetitionStatus::Draft;
    }
    if now >= window.end {
        return CompetitionStatus::Ended;
    }
    CompetitionStatus::Active
}
