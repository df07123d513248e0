//! Call-site capture.

use core::fmt;

/// A captured call site: function, file, line, column.
///
/// Produced by [`location!`](crate::location!) (full capture including the
/// function name) or [`Location::caller`] (cheap `#[track_caller]` capture,
/// no function name). A `Location` with an empty file is "not a real
/// capture" and is never appended to a trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    function: &'static str,
    file: &'static str,
    line: u32,
    column: u32,
}

impl Location {
    /// Build a location from explicit parts. Prefer [`location!`](crate::location!).
    #[inline]
    pub const fn new(
        function: &'static str,
        file: &'static str,
        line: u32,
        column: u32,
    ) -> Self {
        Self {
            function,
            file,
            line,
            column,
        }
    }

    /// Capture the caller's file, line and column.
    ///
    /// The function name is not recoverable through `#[track_caller]`, so
    /// it is left empty here; use [`location!`](crate::location!) when the
    /// name matters for rendering.
    #[track_caller]
    #[inline]
    pub fn caller() -> Self {
        let location = core::panic::Location::caller();
        Self {
            function: "",
            file: location.file(),
            line: location.line(),
            column: location.column(),
        }
    }

    /// A location that is not a capture. Excluded from traces.
    #[inline]
    pub const fn empty() -> Self {
        Self {
            function: "",
            file: "",
            line: 0,
            column: 0,
        }
    }

    /// Function name, possibly empty.
    #[inline]
    pub const fn function(&self) -> &'static str {
        self.function
    }

    /// Source file name. Empty marks a non-capture.
    #[inline]
    pub const fn file(&self) -> &'static str {
        self.file
    }

    /// Line number.
    #[inline]
    pub const fn line(&self) -> u32 {
        self.line
    }

    /// Column number.
    #[inline]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Whether this location refers to a real call site.
    #[inline]
    pub const fn is_captured(&self) -> bool {
        !self.file.is_empty()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.function.is_empty() {
            write!(f, "({}:{}:{})", self.file, self.line, self.column)
        } else {
            write!(
                f,
                "{} ({}:{}:{})",
                self.function, self.file, self.line, self.column
            )
        }
    }
}

/// Capture a [`Location`] at the call site.
///
/// The enclosing function's path is recovered from the type name of a local
/// marker type; file, line and column come from the corresponding built-in
/// macros.
///
/// ```
/// let location = rethrow::location!();
/// assert!(location.is_captured());
/// assert!(location.file().ends_with(".rs"));
/// ```
#[macro_export]
macro_rules! location {
    () => {{
        struct Here;
        let name = ::core::any::type_name::<Here>();
        $crate::Location::new(
            name.strip_suffix("::Here").unwrap_or(name),
            ::core::file!(),
            ::core::line!(),
            ::core::column!(),
        )
    }};
}

#[cfg(test)]
mod tests {
    use super::Location;

    #[test]
    fn macro_capture_names_the_enclosing_function() {
        let location = location!();
        assert!(location.function().ends_with("macro_capture_names_the_enclosing_function"));
        assert!(location.file().ends_with("location.rs"));
        assert!(location.is_captured());
    }

    #[test]
    fn caller_capture_has_no_function_name() {
        let location = Location::caller();
        assert!(location.function().is_empty());
        assert!(location.is_captured());
    }

    #[test]
    fn empty_location_is_not_a_capture() {
        assert!(!Location::empty().is_captured());
    }

    #[test]
    fn display_omits_a_missing_function_name() {
        let full = Location::new("alpha", "src/a.rs", 3, 7);
        let bare = Location::new("", "src/a.rs", 3, 7);
        assert_eq!(full.to_string(), "alpha (src/a.rs:3:7)");
        assert_eq!(bare.to_string(), "(src/a.rs:3:7)");
    }
}
