use std::cell::{Cell, RefCell};

use futures::executor::block_on;

use super::*;

#[test]
fn default_policy_delays_double_and_cap() {
    let policy = RetryPolicy { max_attempts: 6, base_delay_ms: 500, max_delay_ms: 4_000 };
    assert_eq!(policy.delay_before(1), 0);
    assert_eq!(policy.delay_before(2), 500);
    assert_eq!(policy.delay_before(3), 1_000);
    assert_eq!(policy.delay_before(4), 2_000);
    assert_eq!(policy.delay_before(5), 4_000);
    assert_eq!(policy.delay_before(6), 4_000);
}

#[test]
fn delay_does_not_overflow_on_huge_attempts() {
    let policy = RetryPolicy { max_attempts: u32::MAX, base_delay_ms: u64::MAX / 2, max_delay_ms: 10 };
    assert_eq!(policy.delay_before(u32::MAX), 10);
}

#[test]
fn succeeds_on_first_attempt_without_retry_notice() {
    let retries = RefCell::new(Vec::new());
    let result: Result<u32, String> =
        block_on(with_retry(RetryPolicy::default(), || async { Ok(7) }, |n| retries.borrow_mut().push(n)));
    assert_eq!(result, Ok(7));
    assert!(retries.borrow().is_empty());
}

#[test]
fn succeeds_on_third_attempt_reporting_each_retry() {
    let calls = Cell::new(0);
    let retries = RefCell::new(Vec::new());
    let result: Result<&str, String> = block_on(with_retry(
        RetryPolicy::default(),
        || {
            calls.set(calls.get() + 1);
            let n = calls.get();
            async move { if n < 3 { Err(format!("boom {n}")) } else { Ok("ok") } }
        },
        |n| retries.borrow_mut().push(n),
    ));
    assert_eq!(result, Ok("ok"));
    assert_eq!(calls.get(), 3);
    assert_eq!(*retries.borrow(), vec![2, 3]);
}

#[test]
fn surfaces_last_error_after_budget_is_spent() {
    let calls = Cell::new(0);
    let result: Result<(), String> = block_on(with_retry(
        RetryPolicy::default(),
        || {
            calls.set(calls.get() + 1);
            let n = calls.get();
            async move { Err(format!("boom {n}")) }
        },
        |_| {},
    ));
    assert_eq!(result, Err("boom 3".to_owned()));
    assert_eq!(calls.get(), 3);
}

#[test]
fn zero_attempts_still_runs_once() {
    let calls = Cell::new(0);
    let policy = RetryPolicy { max_attempts: 0, ..RetryPolicy::default() };
    let _: Result<(), String> = block_on(with_retry(
        policy,
        || {
            calls.set(calls.get() + 1);
            async { Err("nope".to_owned()) }
        },
        |_| {},
    ));
    assert_eq!(calls.get(), 1);
}

#[test]
fn none_policy_is_single_attempt() {
    assert_eq!(RetryPolicy::none().max_attempts, 1);
    assert_eq!(RetryPolicy::none().delay_before(2), 0);
}
