//! Propagation helpers: wrap a block, rethrow in place, throw fresh.
//!
//! Each helper exists twice: a function taking an explicit [`Location`]
//! and a macro that captures `location!()` at the call site. All of them
//! funnel into [`Traced::new`]; none hide control flow behind a panic.

use crate::location::Location;
use crate::traced::{BoxedError, Failure, Traced};

/// Wrap-block function form: run `block`, chaining any error at `location`.
///
/// `previous` is whatever failure was already in flight when the block ran
/// (typically captured at the start of a cleanup path); it becomes the
/// cause if the block fails with a foreign error.
pub fn wrap_traced<T>(
    previous: Option<Failure>,
    location: Location,
    block: impl FnOnce() -> Result<T, BoxedError>,
) -> Result<T, Traced> {
    block().map_err(|error| Traced::new(previous, Failure::from_boxed(error), location))
}

/// Rethrow-in-place function form: attach one more trace frame to the
/// currently handled failure without introducing a new cause level.
pub fn rethrow_at(failure: impl Into<Failure>, location: Location) -> Traced {
    Traced::new(None, failure.into(), location)
}

/// Fresh-throw function form: raise an explicit failure value, demoting an
/// already-in-flight failure to the cause if there is one.
pub fn throw_at(
    previous: Option<Failure>,
    failure: impl Into<Failure>,
    location: Location,
) -> Traced {
    Traced::new(previous, failure.into(), location)
}

/// Run a block, wrapping any error into a traced chain at this call site.
///
/// The body runs inside a closure returning `Result<_, BoxedError>`, so `?`
/// works across mixed error types. The result is `Result<T, Traced>`.
///
/// ```
/// use rethrow::{traced, Traced};
///
/// fn parse(text: &str) -> Result<i32, Traced> {
///     traced! { text.trim().parse::<i32>()? }
/// }
///
/// assert_eq!(parse(" 7 ").unwrap(), 7);
/// assert_eq!(parse("x").unwrap_err().depth(), 1);
/// ```
///
/// Inside a cleanup path, name the failure that was already propagating
/// with `after`; it becomes the cause if the body fails with a foreign
/// error:
///
/// ```
/// use rethrow::{traced, Failure};
///
/// fn cleanup(in_flight: Failure) -> rethrow::Result<()> {
///     traced!(after in_flight; std::fs::remove_file("missing.tmp")?)
/// }
/// ```
#[macro_export]
macro_rules! traced {
    (after $previous:expr; $($body:tt)*) => {
        $crate::wrap_traced(
            ::core::option::Option::Some($crate::Failure::from($previous)),
            $crate::location!(),
            || -> ::core::result::Result<_, $crate::BoxedError> {
                ::core::result::Result::Ok({ $($body)* })
            },
        )
    };
    ($($body:tt)*) => {
        $crate::wrap_traced(
            ::core::option::Option::None,
            $crate::location!(),
            || -> ::core::result::Result<_, $crate::BoxedError> {
                ::core::result::Result::Ok({ $($body)* })
            },
        )
    };
}

/// Raise a fresh failure as `Err(Traced)`, capturing this call site.
///
/// With `after`, an already-in-flight failure is recorded as the cause.
/// A string literal becomes a message failure.
///
/// ```
/// use rethrow::{throw, Result};
///
/// fn forbidden() -> Result<()> {
///     throw!("operation not permitted")
/// }
///
/// let traced = forbidden().unwrap_err();
/// assert_eq!(traced.depth(), 1);
/// ```
#[macro_export]
macro_rules! throw {
    ($message:literal $(,)?) => {
        ::core::result::Result::Err($crate::throw_at(
            ::core::option::Option::None,
            $crate::Failure::msg($message),
            $crate::location!(),
        ))
    };
    ($failure:expr, after $previous:expr $(,)?) => {
        ::core::result::Result::Err($crate::throw_at(
            ::core::option::Option::Some($crate::Failure::from($previous)),
            $failure,
            $crate::location!(),
        ))
    };
    ($failure:expr $(,)?) => {
        ::core::result::Result::Err($crate::throw_at(
            ::core::option::Option::None,
            $failure,
            $crate::location!(),
        ))
    };
}

/// Rethrow the currently handled failure as `Err(Traced)`, extending its
/// trace with this call site. Never introduces a new cause level.
///
/// ```
/// use rethrow::{rethrow, traced, Result};
///
/// fn boundary() -> Result<i32> {
///     match traced! { "x".parse::<i32>()? } {
///         Ok(v) => Ok(v),
///         Err(e) => rethrow!(e),
///     }
/// }
///
/// assert_eq!(boundary().unwrap_err().depth(), 2);
/// ```
#[macro_export]
macro_rules! rethrow {
    ($failure:expr $(,)?) => {
        ::core::result::Result::Err($crate::rethrow_at($failure, $crate::location!()))
    };
}
