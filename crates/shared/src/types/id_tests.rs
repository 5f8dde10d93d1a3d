use super::*;
use std::str::FromStr;
use uuid::Uuid;

#[test]
fn test_ids_sort_in_creation_order() {
    let ids: Vec<TransactionId> = (0..50).map(|_| TransactionId::new()).collect();
    let mut sorted = ids.clone();
    sorted.sort_unstable();
    assert_eq!(sorted, ids);
}

#[test]
fn test_ids_are_version_seven() {
    assert_eq!(LedgerEntryId::new().into_inner().get_version_num(), 7);
    assert_eq!(RecycledObjectId::default().into_inner().get_version_num(), 7);
}

#[test]
fn test_uuid_roundtrip() {
    let uuid = Uuid::now_v7();
    let period = ReportingPeriodId::from_uuid(uuid);
    assert_eq!(Uuid::from(period), uuid);
    assert_eq!(period.to_string(), uuid.to_string());
    assert_eq!(ClearanceId::from_str(&uuid.to_string()).unwrap().into_inner(), uuid);
}

#[test]
fn test_from_str_rejects_garbage() {
    assert!(VatId::from_str("IN01/0001").is_err());
    assert!(EntityId::from_str("").is_err());
}
