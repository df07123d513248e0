//! Extension trait for Result types.

use crate::location::Location;
use crate::traced::{Failure, Traced};

/// Extension trait for turning `Result` errors into traced chains.
pub trait TracedExt<T> {
    /// Add a trace frame at the caller, wrapping the error into a chain.
    ///
    /// The frame carries file, line and column only; use
    /// [`traced_at`](TracedExt::traced_at) with `location!()` when the
    /// function name should appear in the rendering.
    fn traced(self) -> Result<T, Traced>;

    /// Add a trace frame at an explicitly captured location.
    fn traced_at(self, location: Location) -> Result<T, Traced>;

    /// Wrap the error, demoting `previous` to the cause if the error is
    /// foreign. An error that is already a chain keeps its own cause.
    fn or_cause(self, previous: Failure) -> Result<T, Traced>;
}

impl<T, E: Into<Failure>> TracedExt<T> for Result<T, E> {
    #[track_caller]
    fn traced(self) -> Result<T, Traced> {
        let location = Location::caller();
        self.map_err(|error| Traced::new(None, error.into(), location))
    }

    fn traced_at(self, location: Location) -> Result<T, Traced> {
        self.map_err(|error| Traced::new(None, error.into(), location))
    }

    #[track_caller]
    fn or_cause(self, previous: Failure) -> Result<T, Traced> {
        let location = Location::caller();
        self.map_err(|error| Traced::new(Some(previous), error.into(), location))
    }
}
