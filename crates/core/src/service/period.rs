//! Reporting period transitions.

use chrono::{Datelike, NaiveDate};
use tracing::{debug, info, warn};

use super::Ledger;
use crate::context::{Clock, EntityContext};
use crate::period::{PeriodError, PeriodStatus, ReportingPeriod};
use crate::store::LedgerStore;
use crate::transaction::TransactionQuery;

impl<S: LedgerStore, C: Clock> Ledger<S, C> {
    /// The period covering `date`, created open if missing.
    pub fn period_for(&self, ctx: &EntityContext, date: NaiveDate) -> Result<ReportingPeriod, PeriodError> {
        let period = self.store.get_or_create_reporting_period(ctx.entity_id, date.year())?;
        debug!(
            entity_id = %ctx.entity_id,
            year = period.year,
            period_count = period.period_count,
            "Reporting period resolved"
        );
        Ok(period)
    }

    /// Closes the period for `year`.
    ///
    /// Fails while any transaction dated in the year is unposted.
    pub fn close_period(&self, ctx: &EntityContext, year: i32) -> Result<ReportingPeriod, PeriodError> {
        let period = self.store.get_or_create_reporting_period(ctx.entity_id, year)?;
        let (Some(start), Some(end)) = (period.start_date(), period.end_date()) else {
            return Err(PeriodError::InvalidTransition {
                from: period.status,
                to: PeriodStatus::Closed,
            });
        };
        let unposted = TransactionQuery {
            start_date: Some(start),
            end_date: Some(end),
            posted: Some(false),
            ..TransactionQuery::default()
        };
        let count = self.store.transactions(ctx.entity_id, &unposted)?.len();
        if count > 0 {
            warn!(entity_id = %ctx.entity_id, year, count, "Period close rejected: unposted transactions");
            return Err(PeriodError::UnpostedTransactions { year, count });
        }

        self.transition(period, PeriodStatus::Closed)
    }

    /// Reopens a closed period for adjustments.
    pub fn open_adjusting_period(&self, ctx: &EntityContext, year: i32) -> Result<ReportingPeriod, PeriodError> {
        let period = self.store.get_or_create_reporting_period(ctx.entity_id, year)?;
        self.transition(period, PeriodStatus::Adjusting)
    }

    fn transition(&self, mut period: ReportingPeriod, to: PeriodStatus) -> Result<ReportingPeriod, PeriodError> {
        let from = period.status;
        if let Err(err) = period.transition(to) {
            warn!(year = period.year, ?from, ?to, "Period transition rejected");
            return Err(err);
        }
        self.store.update_reporting_period(&period)?;
        info!(entity_id = %period.entity_id, year = period.year, ?from, ?to, "Reporting period transitioned");
        Ok(period)
    }
}
