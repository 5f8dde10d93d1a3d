//! Property tests for period transitions.

use chrono::{Datelike, Duration, NaiveDate};
use proptest::prelude::*;
use folio_shared::types::EntityId;

use super::types::{PeriodStatus, ReportingPeriod, ensure_open};

fn status_strategy() -> impl Strategy<Value = PeriodStatus> {
    prop_oneof![
        Just(PeriodStatus::Open),
        Just(PeriodStatus::Closed),
        Just(PeriodStatus::Adjusting),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Whatever sequence of transitions is requested, rejected ones leave the
    /// status untouched and a closed period never lets a posting through.
    #[test]
    fn prop_transitions_follow_state_machine(
        requests in prop::collection::vec(status_strategy(), 0..30),
    ) {
        let mut period = ReportingPeriod::new(EntityId::new(), 2024, 1);
        for to in requests {
            let before = period.status;
            match period.transition(to) {
                Ok(()) => {
                    prop_assert!(before.can_transition_to(to));
                    prop_assert_eq!(period.status, to);
                }
                Err(_) => prop_assert_eq!(period.status, before),
            }
            prop_assert_ne!(period.status == PeriodStatus::Closed, period.status.allows_posting());
        }
    }

    #[test]
    fn prop_gate_matches_status(status in status_strategy(), day in 0i64..366) {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Duration::days(day);
        let mut period = ReportingPeriod::new(EntityId::new(), date.year(), 1);
        period.status = status;
        prop_assert_eq!(ensure_open(Some(&period), date).is_ok(), status.allows_posting());
    }
}
