//! Platform error-code entry points.
//!
//! The sole place raw OS error codes enter the chain mechanism. Wrappers
//! around platform calls translate a code (or the thread's last OS error)
//! into a [`Failure`] over `std::io::Error` and raise it as a fresh throw.

use std::io;

use crate::location::Location;
use crate::traced::{Failure, Traced};

/// A failure carrying a raw OS error code.
#[inline]
pub fn os_failure(code: i32) -> Failure {
    Failure::new(io::Error::from_raw_os_error(code))
}

/// Fresh-throw a raw OS error code.
pub fn raise_os_error(previous: Option<Failure>, code: i32, location: Location) -> Traced {
    Traced::new(previous, os_failure(code), location)
}

/// Fresh-throw the calling thread's last OS error.
pub fn raise_last_os_error(previous: Option<Failure>, location: Location) -> Traced {
    Traced::new(previous, Failure::new(io::Error::last_os_error()), location)
}

/// Raise `code` unless it is zero (the platform success code).
pub fn check_os_code(code: i32, location: Location) -> Result<(), Traced> {
    if code != 0 {
        Err(raise_os_error(None, code, location))
    } else {
        Ok(())
    }
}

/// Raise the last OS error when a platform call reported failure.
pub fn check_os_bool(ok: bool, location: Location) -> Result<(), Traced> {
    if ok {
        Ok(())
    } else {
        Err(raise_last_os_error(None, location))
    }
}

/// Raise the last OS error when a platform call returned null.
pub fn check_os_ptr<T>(pointer: *const T, location: Location) -> Result<(), Traced> {
    if pointer.is_null() {
        Err(raise_last_os_error(None, location))
    } else {
        Ok(())
    }
}

/// Raise `code` when `condition` holds.
pub fn raise_os_error_if(code: i32, condition: bool, location: Location) -> Result<(), Traced> {
    if condition {
        Err(raise_os_error(None, code, location))
    } else {
        Ok(())
    }
}

/// Fresh-throw a raw OS error code as `Err(Traced)`, capturing this call
/// site. With `after`, an in-flight failure is recorded as the cause.
#[macro_export]
macro_rules! throw_os {
    ($code:expr, after $previous:expr $(,)?) => {
        ::core::result::Result::Err($crate::os::raise_os_error(
            ::core::option::Option::Some($crate::Failure::from($previous)),
            $code,
            $crate::location!(),
        ))
    };
    ($code:expr $(,)?) => {
        ::core::result::Result::Err($crate::os::raise_os_error(
            ::core::option::Option::None,
            $code,
            $crate::location!(),
        ))
    };
}

/// Fresh-throw the calling thread's last OS error as `Err(Traced)`.
#[macro_export]
macro_rules! throw_last_os {
    (after $previous:expr $(,)?) => {
        ::core::result::Result::Err($crate::os::raise_last_os_error(
            ::core::option::Option::Some($crate::Failure::from($previous)),
            $crate::location!(),
        ))
    };
    () => {
        ::core::result::Result::Err($crate::os::raise_last_os_error(
            ::core::option::Option::None,
            $crate::location!(),
        ))
    };
}
