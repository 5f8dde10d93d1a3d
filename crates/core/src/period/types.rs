//! Reporting period state machine.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use folio_shared::types::{EntityId, ReportingPeriodId};

use super::error::{ClosedPeriodError, PeriodError};

/// Status of a reporting period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodStatus {
    /// Normal operation.
    Open,
    /// Year end done. No changes allowed.
    Closed,
    /// Closed period temporarily reopened for adjustments.
    Adjusting,
}

impl PeriodStatus {
    /// Returns true if transactions dated in the period may be changed.
    #[must_use]
    pub const fn allows_posting(self) -> bool {
        matches!(self, Self::Open | Self::Adjusting)
    }

    /// Whether `self → to` is a legal transition.
    #[must_use]
    pub const fn can_transition_to(self, to: Self) -> bool {
        matches!(
            (self, to),
            (Self::Open | Self::Adjusting, Self::Closed) | (Self::Closed, Self::Adjusting)
        )
    }
}

/// One accounting year for an entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportingPeriod {
    /// Unique identifier.
    pub id: ReportingPeriodId,
    /// Owning entity.
    pub entity_id: EntityId,
    /// Calendar year covered.
    pub year: i32,
    /// 1-based ordinal among the entity's periods. Appears in transaction numbers.
    pub period_count: u32,
    /// Current status.
    pub status: PeriodStatus,
    /// Set when moved to the recycle bin.
    pub deleted_at: Option<DateTime<Utc>>,
    /// Set when permanently destroyed.
    pub destroyed_at: Option<DateTime<Utc>>,
}

impl ReportingPeriod {
    /// Creates an open period.
    #[must_use]
    pub fn new(entity_id: EntityId, year: i32, period_count: u32) -> Self {
        Self {
            id: ReportingPeriodId::new(),
            entity_id,
            year,
            period_count,
            status: PeriodStatus::Open,
            deleted_at: None,
            destroyed_at: None,
        }
    }

    /// January 1st of the period's year.
    #[must_use]
    pub fn start_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, 1, 1)
    }

    /// December 31st of the period's year.
    #[must_use]
    pub fn end_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, 12, 31)
    }

    /// Returns true if `date` falls within the period.
    #[must_use]
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date.year() == self.year
    }

    /// Returns true unless soft-deleted or destroyed.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.deleted_at.is_none() && self.destroyed_at.is_none()
    }

    /// Moves to `to` if the transition is legal.
    ///
    /// # Errors
    ///
    /// Returns `PeriodError::InvalidTransition` for any other move.
    pub fn transition(&mut self, to: PeriodStatus) -> Result<(), PeriodError> {
        if !self.status.can_transition_to(to) {
            return Err(PeriodError::InvalidTransition {
                from: self.status,
                to,
            });
        }
        self.status = to;
        Ok(())
    }
}

/// Gate used before any ledger mutation. A year without a period is open.
///
/// # Errors
///
/// Returns `ClosedPeriodError` if the period exists and is closed.
pub fn ensure_open(period: Option<&ReportingPeriod>, date: NaiveDate) -> Result<(), ClosedPeriodError> {
    match period {
        Some(p) if !p.status.allows_posting() => Err(ClosedPeriodError { year: date.year() }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(PeriodStatus::Open, true)]
    #[case(PeriodStatus::Adjusting, true)]
    #[case(PeriodStatus::Closed, false)]
    fn test_allows_posting(#[case] status: PeriodStatus, #[case] expected: bool) {
        assert_eq!(status.allows_posting(), expected);
    }

    #[test]
    fn test_close_then_adjust_then_close() {
        let mut period = ReportingPeriod::new(EntityId::new(), 2024, 1);
        period.transition(PeriodStatus::Closed).unwrap();
        period.transition(PeriodStatus::Adjusting).unwrap();
        period.transition(PeriodStatus::Closed).unwrap();
        assert_eq!(period.status, PeriodStatus::Closed);
    }

    #[rstest]
    #[case(PeriodStatus::Open, PeriodStatus::Adjusting)]
    #[case(PeriodStatus::Open, PeriodStatus::Open)]
    #[case(PeriodStatus::Closed, PeriodStatus::Open)]
    #[case(PeriodStatus::Closed, PeriodStatus::Closed)]
    #[case(PeriodStatus::Adjusting, PeriodStatus::Open)]
    fn test_invalid_transitions(#[case] from: PeriodStatus, #[case] to: PeriodStatus) {
        let mut period = ReportingPeriod::new(EntityId::new(), 2024, 1);
        period.status = from;
        let err = period.transition(to).unwrap_err();
        assert!(matches!(err, PeriodError::InvalidTransition { .. }));
        assert_eq!(period.status, from);
    }

    #[test]
    fn test_date_bounds() {
        let period = ReportingPeriod::new(EntityId::new(), 2024, 3);
        assert_eq!(period.start_date(), NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(period.end_date(), NaiveDate::from_ymd_opt(2024, 12, 31));
        assert!(period.contains_date(NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()));
        assert!(!period.contains_date(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()));
    }

    #[test]
    fn test_ensure_open_missing_period_is_open() {
        let date = NaiveDate::from_ymd_opt(2030, 6, 1).unwrap();
        assert!(ensure_open(None, date).is_ok());

        let mut period = ReportingPeriod::new(EntityId::new(), 2030, 1);
        period.status = PeriodStatus::Closed;
        assert_eq!(ensure_open(Some(&period), date), Err(ClosedPeriodError { year: 2030 }));
    }
}
