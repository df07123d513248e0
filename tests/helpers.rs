//! Propagation helpers: traced!/throw!/rethrow!, the extension trait, and
//! interop with common error crates.

use std::io;

use rethrow::{location, rethrow, throw, traced, Failure, Result, Traced, TracedExt};
use thiserror::Error;

#[derive(Debug, Error)]
enum StoreError {
    #[error("disk full")]
    DiskFull,
    #[error("corrupt record {0}")]
    Corrupt(u32),
}

// Operation A calls B; B raises a foreign failure, A adds a frame.
fn operation_b() -> Result<()> {
    throw!(StoreError::DiskFull)
}

fn operation_a() -> Result<()> {
    traced! { operation_b()? }
}

#[test]
fn a_wrap_over_a_failing_callee_yields_one_chain_with_two_frames() {
    let node = operation_a().unwrap_err();

    assert_eq!(node.depth(), 2);
    assert!(node.cause().is_none());
    assert_eq!(node.original().describe().as_deref(), Some("disk full"));
    assert!(node.trace()[0].function().ends_with("operation_b"));
    assert!(node.trace()[1].function().ends_with("operation_a"));
    assert!(node.downcast_original::<StoreError>().is_some());
}

#[test]
fn traced_block_passes_success_through() {
    let value: Result<i32> = traced! { 40 + 2 };
    assert_eq!(value.unwrap(), 42);
}

#[test]
fn traced_block_accepts_mixed_error_types() {
    fn body(text: &str) -> Result<u64> {
        traced! {
            let parsed: u64 = text.parse()?;
            if parsed == 0 {
                return Err(StoreError::Corrupt(0).into());
            }
            parsed
        }
    }

    let parse = body("x").unwrap_err();
    assert!(parse.downcast_original::<std::num::ParseIntError>().is_some());

    let corrupt = body("0").unwrap_err();
    assert_eq!(
        corrupt.original().describe().as_deref(),
        Some("corrupt record 0")
    );
}

#[test]
fn traced_block_extends_an_already_chained_failure() {
    fn inner() -> Result<()> {
        throw!(StoreError::DiskFull)
    }
    fn outer() -> Result<()> {
        traced! { inner()? }
    }
    fn outermost() -> Result<()> {
        traced! { outer()? }
    }

    let node = outermost().unwrap_err();
    assert_eq!(node.depth(), 3);
    assert!(node.cause().is_none());
}

#[test]
fn cleanup_failure_records_the_primary_as_cause() {
    fn step() -> Result<()> {
        throw!(StoreError::DiskFull)
    }
    fn cleanup(in_flight: Failure) -> Result<()> {
        traced!(after in_flight; Err(io::Error::new(io::ErrorKind::Other, "close failed"))?)
    }

    let primary = step().unwrap_err();
    let node = cleanup(Failure::new(primary.clone())).unwrap_err();

    assert_eq!(node.original().describe().as_deref(), Some("close failed"));
    let cause = node.cause().expect("primary demoted to cause");
    assert_eq!(cause.rendered(), primary.rendered());
}

#[test]
fn rethrow_extends_the_trace_without_a_new_cause_level() {
    fn boundary() -> Result<()> {
        match operation_b() {
            Ok(()) => Ok(()),
            Err(node) => rethrow!(node),
        }
    }

    let node = boundary().unwrap_err();
    assert_eq!(node.depth(), 2);
    assert!(node.cause().is_none());
    assert!(node.trace()[1].function().ends_with("boundary"));
}

#[test]
fn fresh_throw_with_a_previous_chain_attaches_it_as_cause() {
    fn translate(previous: Traced) -> Result<()> {
        throw!(StoreError::Corrupt(7), after previous)
    }

    let primary = operation_b().unwrap_err();
    let node = translate(primary).unwrap_err();

    assert_eq!(
        node.original().describe().as_deref(),
        Some("corrupt record 7")
    );
    assert!(node.cause().is_some());
    assert_eq!(node.depth(), 1);
}

#[test]
fn throw_accepts_a_bare_message() {
    fn forbidden() -> Result<()> {
        throw!("operation not permitted")
    }

    let node = forbidden().unwrap_err();
    assert_eq!(
        node.original().describe().as_deref(),
        Some("operation not permitted")
    );
}

#[test]
fn ext_traced_adds_a_caller_frame() {
    fn read() -> std::result::Result<String, io::Error> {
        Err(io::Error::new(io::ErrorKind::Other, "gone"))
    }

    let node = read().traced().unwrap_err();
    assert_eq!(node.depth(), 1);
    // track_caller captures file/line/column but no function name.
    assert!(node.trace()[0].function().is_empty());
    assert!(node.trace()[0].is_captured());

    let node = Err::<(), Traced>(node).traced().unwrap_err();
    assert_eq!(node.depth(), 2);
}

#[test]
fn ext_traced_at_carries_the_function_name() {
    fn read() -> std::result::Result<String, io::Error> {
        Err(io::Error::new(io::ErrorKind::Other, "gone"))
    }

    let node = read().traced_at(location!()).unwrap_err();
    assert!(node.trace()[0]
        .function()
        .ends_with("ext_traced_at_carries_the_function_name"));
}

#[test]
fn ext_or_cause_demotes_a_previous_chain() {
    let primary = operation_b().unwrap_err();

    let node = Err::<(), io::Error>(io::Error::new(io::ErrorKind::Other, "close failed"))
        .or_cause(Failure::new(primary))
        .unwrap_err();

    assert!(node.cause().is_some());
    assert_eq!(node.original().describe().as_deref(), Some("close failed"));
}

#[test]
fn anyhow_errors_enter_the_chain_through_from_boxed() {
    let report = anyhow::anyhow!("upstream failed");
    let node = Traced::new(None, Failure::from_boxed(report.into()), location!());

    assert_eq!(
        node.original().describe().as_deref(),
        Some("upstream failed")
    );
    assert_eq!(node.depth(), 1);
}

#[test]
fn boxed_traced_keeps_its_chain_identity() {
    let inner = operation_b().unwrap_err();
    let boxed: rethrow::BoxedError = Box::new(inner.clone());

    let node = Traced::new(None, Failure::from_boxed(boxed), location!());
    assert_eq!(node.depth(), inner.depth() + 1);
    assert!(node.original().ptr_eq(inner.original()));
}
