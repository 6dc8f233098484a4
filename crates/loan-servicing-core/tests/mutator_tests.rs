use chrono::NaiveDate;
use loan_servicing_core::{
    apply_nsf, post_payment, report_line, resolve_arrears, retry_line, seed_loan, ArrearsStatus,
    CollectionMethod, CollectionStatus, ServicingError,
};
use rust_decimal_macros::dec;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ===========================================================================
// NSF
// ===========================================================================

#[test]
fn test_nsf_opens_arrears_for_planned_plus_fee() {
    let mut loan = seed_loan("demo");
    let id = apply_nsf(&mut loan, 1, None).unwrap();

    // 147.92 planned + 48 default fee = 195.92
    assert_eq!(id, "A1");
    let item = &loan.arrears_items[0];
    assert_eq!(item.source_line, 1);
    assert_eq!(item.amount, dec!(147.92));
    assert_eq!(item.fee, dec!(48));
    assert_eq!(item.total, dec!(195.92));
    assert_eq!(item.status, ArrearsStatus::Open);

    let row = loan.installment(1).unwrap();
    assert_eq!(row.status, CollectionStatus::Nsf);
    assert_eq!(row.collected_amount, dec!(0));
    assert_eq!(row.collection_date, None);
}

#[test]
fn test_nsf_uses_explicit_fee_over_config_default() {
    let mut loan = seed_loan("demo");
    apply_nsf(&mut loan, 2, Some(dec!(30))).unwrap();
    assert_eq!(loan.arrears_items[0].total, dec!(177.19));
}

#[test]
fn test_nsf_counts_redistributed_adjustment_in_the_planned_amount() {
    let mut loan = seed_loan("demo");
    apply_nsf(&mut loan, 1, None).unwrap();
    resolve_arrears(&mut loan, "A1", None, &[2], None).unwrap();

    // Line 2 now plans 147.19 + 195.92; its rejection carries both.
    apply_nsf(&mut loan, 2, None).unwrap();
    assert_eq!(loan.arrears_items[1].amount, dec!(343.11));
    assert_eq!(loan.arrears_items[1].total, dec!(391.11));
}

#[test]
fn test_nsf_rejects_unknown_line() {
    let mut loan = seed_loan("demo");
    let err = apply_nsf(&mut loan, 99, None).unwrap_err();
    assert!(matches!(err, ServicingError::InvalidLine { line: 99 }));
    assert!(loan.arrears_items.is_empty());
}

// ===========================================================================
// Retry
// ===========================================================================

#[test]
fn test_retry_reschedules_and_leaves_arrears_open() {
    let mut loan = seed_loan("demo");
    apply_nsf(&mut loan, 1, None).unwrap();
    retry_line(&mut loan, 1, Some(date(2024, 12, 1))).unwrap();

    let row = loan.installment(1).unwrap();
    assert_eq!(row.status, CollectionStatus::None);
    assert_eq!(row.collected_amount, dec!(0));
    assert_eq!(row.due_date, date(2024, 12, 1));

    let item = &loan.arrears_items[0];
    assert_eq!(item.status, ArrearsStatus::Open);
    assert_eq!(item.total, dec!(195.92));
}

#[test]
fn test_retry_without_date_keeps_the_schedule() {
    let mut loan = seed_loan("demo");
    apply_nsf(&mut loan, 1, None).unwrap();
    retry_line(&mut loan, 1, None).unwrap();
    assert_eq!(loan.installment(1).unwrap().due_date, date(2024, 11, 15));
}

#[test]
fn test_retry_requires_nsf_state() {
    let mut loan = seed_loan("demo");
    let err = retry_line(&mut loan, 1, None).unwrap_err();
    assert!(matches!(err, ServicingError::NotNsf { line: 1 }));

    post_payment(&mut loan, 2, dec!(147.19), None, None).unwrap();
    let err = retry_line(&mut loan, 2, None).unwrap_err();
    assert!(matches!(err, ServicingError::NotNsf { line: 2 }));
}

// ===========================================================================
// Posting
// ===========================================================================

#[test]
fn test_post_requires_positive_amount() {
    let mut loan = seed_loan("demo");
    assert!(matches!(
        post_payment(&mut loan, 1, dec!(0), None, None),
        Err(ServicingError::InvalidAmount { .. })
    ));
    assert!(matches!(
        post_payment(&mut loan, 1, dec!(-5), None, None),
        Err(ServicingError::InvalidAmount { .. })
    ));
    assert!(matches!(
        post_payment(&mut loan, 99, dec!(10), None, None),
        Err(ServicingError::InvalidLine { line: 99 })
    ));
    assert!(loan.ledger.is_empty());
}

#[test]
fn test_post_defaults_collection_date_to_the_scheduled_date() {
    let mut loan = seed_loan("demo");
    post_payment(&mut loan, 1, dec!(192.92), None, None).unwrap();
    let row = loan.installment(1).unwrap();
    assert_eq!(row.collection_date, Some(date(2024, 11, 15)));
    assert_eq!(row.status, CollectionStatus::Posted);
}

#[test]
fn test_post_writes_one_ledger_entry_with_the_full_split() {
    let mut loan = seed_loan("demo");
    post_payment(&mut loan, 1, dec!(192.92), Some(date(2024, 11, 15)), None).unwrap();

    assert_eq!(loan.ledger.len(), 1);
    let entry = &loan.ledger[0];
    assert_eq!(entry.line, 1);
    assert_eq!(entry.amount, dec!(192.92));
    assert_eq!(entry.allocation.to_adhesion, dec!(45.00));
    assert_eq!(entry.allocation.to_interest, dec!(17.56));
    assert_eq!(entry.allocation.to_principal, dec!(130.36));
    assert_eq!(entry.allocation.total(), dec!(192.92));
}

#[test]
fn test_reposting_a_posted_line_overrides_the_previous_entry() {
    let mut loan = seed_loan("demo");
    post_payment(&mut loan, 1, dec!(192.92), Some(date(2024, 11, 15)), None).unwrap();
    post_payment(&mut loan, 1, dec!(100.00), Some(date(2024, 11, 16)), None).unwrap();

    let row = loan.installment(1).unwrap();
    assert_eq!(row.status, CollectionStatus::Partial);
    assert_eq!(row.collected_amount, dec!(100.00));
    assert_eq!(row.collection_date, Some(date(2024, 11, 16)));
    // Both postings remain on the ledger.
    assert_eq!(loan.ledger.len(), 2);
}

// ===========================================================================
// Arrears-first closure
// ===========================================================================

#[test]
fn test_partial_post_with_arrears_first_reduces_the_oldest_item() {
    let mut loan = seed_loan("demo");
    apply_nsf(&mut loan, 1, None).unwrap();
    retry_line(&mut loan, 1, Some(date(2024, 12, 1))).unwrap();

    // 50.00 against 195.92 of open arrears: everything goes to arrears,
    // the item is reduced but stays open.
    post_payment(&mut loan, 2, dec!(50.00), Some(date(2024, 11, 29)), Some(true)).unwrap();

    let row = loan.installment(2).unwrap();
    assert_eq!(row.allocation.to_arrears, dec!(50.00));
    assert_eq!(row.allocation.to_principal, dec!(0));

    let item = &loan.arrears_items[0];
    assert_eq!(item.status, ArrearsStatus::Open);
    assert_eq!(item.total, dec!(145.92));
    assert_eq!(loan.ledger[0].allocation.to_arrears, dec!(50.00));
}

#[test]
fn test_arrears_close_fifo_across_multiple_items() {
    let mut loan = seed_loan("demo");
    apply_nsf(&mut loan, 1, None).unwrap(); // A1: 195.92
    apply_nsf(&mut loan, 2, None).unwrap(); // A2: 195.19

    post_payment(&mut loan, 3, dec!(200.00), Some(date(2024, 12, 13)), Some(true)).unwrap();

    // A1 fully absorbed, A2 reduced by the 4.08 remainder.
    assert_eq!(loan.arrears_items[0].status, ArrearsStatus::Resolved);
    assert_eq!(loan.arrears_items[0].total, dec!(0));
    assert_eq!(loan.arrears_items[1].status, ArrearsStatus::Open);
    assert_eq!(loan.arrears_items[1].total, dec!(191.11));
}

#[test]
fn test_loan_wide_arrears_first_flag_applies_without_override() {
    let mut loan = seed_loan("demo");
    loan.config.arrears_first = true;
    apply_nsf(&mut loan, 1, None).unwrap();

    post_payment(&mut loan, 2, dec!(40.00), Some(date(2024, 11, 29)), None).unwrap();
    assert_eq!(loan.arrears_items[0].total, dec!(155.92));
}

#[test]
fn test_post_without_arrears_first_leaves_arrears_untouched() {
    let mut loan = seed_loan("demo");
    apply_nsf(&mut loan, 1, None).unwrap();

    post_payment(&mut loan, 2, dec!(147.19), Some(date(2024, 11, 29)), None).unwrap();
    assert_eq!(loan.arrears_items[0].total, dec!(195.92));
    assert_eq!(loan.installment(2).unwrap().allocation.to_arrears, dec!(0));
}

// ===========================================================================
// Arrears resolution
// ===========================================================================

#[test]
fn test_resolve_to_new_line_appends_a_transfer_installment() {
    let mut loan = seed_loan("demo");
    apply_nsf(&mut loan, 1, None).unwrap();
    resolve_arrears(&mut loan, "A1", None, &[], Some(date(2025, 1, 10))).unwrap();

    let row = loan.installment(5).expect("new transfer line");
    assert_eq!(row.base, dec!(195.92));
    assert_eq!(row.adhesion, dec!(0));
    assert_eq!(row.method, CollectionMethod::Transfer);
    assert_eq!(row.status, CollectionStatus::None);

    let item = &loan.arrears_items[0];
    assert_eq!(item.status, ArrearsStatus::Resolved);
    assert_eq!(item.total, dec!(0));
}

#[test]
fn test_resolve_spreads_equal_shares_over_targets() {
    let mut loan = seed_loan("demo");
    apply_nsf(&mut loan, 1, None).unwrap();
    resolve_arrears(&mut loan, "A1", None, &[2, 3], None).unwrap();

    // 195.92 / 2 = 97.96 each.
    assert_eq!(loan.installment(2).unwrap().adjustment, dec!(97.96));
    assert_eq!(loan.installment(3).unwrap().adjustment, dec!(97.96));
    assert_eq!(loan.arrears_items[0].status, ArrearsStatus::Resolved);
}

#[test]
fn test_resolve_remainder_lands_on_the_last_target() {
    let mut loan = seed_loan("demo");
    apply_nsf(&mut loan, 1, None).unwrap();
    resolve_arrears(&mut loan, "A1", Some(dec!(100.01)), &[2, 3, 4], None).unwrap();

    // 100.01 over three lines: 33.34 + 33.34 + 33.33.
    assert_eq!(loan.installment(2).unwrap().adjustment, dec!(33.34));
    assert_eq!(loan.installment(3).unwrap().adjustment, dec!(33.34));
    assert_eq!(loan.installment(4).unwrap().adjustment, dec!(33.33));
}

#[test]
fn test_resolve_validation() {
    let mut loan = seed_loan("demo");
    apply_nsf(&mut loan, 1, None).unwrap();

    assert!(matches!(
        resolve_arrears(&mut loan, "A9", None, &[2], None),
        Err(ServicingError::ArrearsNotFound { .. })
    ));
    assert!(matches!(
        resolve_arrears(&mut loan, "A1", None, &[], None),
        Err(ServicingError::NoTargets)
    ));
    assert!(matches!(
        resolve_arrears(&mut loan, "A1", Some(dec!(0)), &[2], None),
        Err(ServicingError::InvalidAmount { .. })
    ));

    // A resolved item can no longer be targeted.
    resolve_arrears(&mut loan, "A1", None, &[2], None).unwrap();
    assert!(matches!(
        resolve_arrears(&mut loan, "A1", None, &[2], None),
        Err(ServicingError::ArrearsNotFound { .. })
    ));
}

// ===========================================================================
// Deferral
// ===========================================================================

#[test]
fn test_report_moves_the_planned_amount_and_leaves_the_fee() {
    let mut loan = seed_loan("demo");
    report_line(&mut loan, 1, None, &[2, 3]).unwrap();

    let src = loan.installment(1).unwrap();
    assert_eq!(src.base, dec!(25));
    assert_eq!(src.adhesion, dec!(0));
    assert_eq!(src.adjustment, dec!(0));
    assert_eq!(src.status, CollectionStatus::None);

    // 147.92 / 2 = 73.96 onto each target.
    assert_eq!(loan.installment(2).unwrap().adjustment, dec!(73.96));
    assert_eq!(loan.installment(3).unwrap().adjustment, dec!(73.96));
}

#[test]
fn test_report_validation() {
    let mut loan = seed_loan("demo");
    assert!(matches!(
        report_line(&mut loan, 99, None, &[2]),
        Err(ServicingError::InvalidLine { line: 99 })
    ));
    assert!(matches!(
        report_line(&mut loan, 1, None, &[]),
        Err(ServicingError::NoTargets)
    ));
    assert!(matches!(
        report_line(&mut loan, 1, Some(dec!(-1)), &[2]),
        Err(ServicingError::InvalidAmount { .. })
    ));
}

// ===========================================================================
// Audit trail
// ===========================================================================

#[test]
fn test_mutators_append_audit_events() {
    let mut loan = seed_loan("demo");
    let seeded_events = loan.events.len();

    apply_nsf(&mut loan, 1, None).unwrap();
    retry_line(&mut loan, 1, None).unwrap();
    post_payment(&mut loan, 2, dec!(50.00), None, Some(true)).unwrap();

    assert_eq!(loan.events.len(), seeded_events + 3);
    assert_eq!(loan.events[seeded_events].title, "NSF");
    assert_eq!(loan.events[seeded_events + 1].title, "Retry");
    assert_eq!(loan.events[seeded_events + 2].title, "Payment posted");
}
