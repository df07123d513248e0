//! Failure values and the traced chain node.

use core::any::Any;
use core::fmt;
use std::error::Error as StdError;
use std::fmt::Write as _;
use std::sync::Arc;

use smallvec::SmallVec;

use crate::location::Location;

/// Boxed error alias used by the [`traced!`](crate::traced!) block macro.
pub type BoxedError = Box<dyn StdError + Send + Sync + 'static>;

/// Trace frames stay inline for shallow chains, which covers most wraps.
pub(crate) type TraceVec = SmallVec<[Location; 4]>;

// ============================================================
// Failure - a shared, type-erased error condition
// ============================================================

/// Any error condition entering the chain mechanism.
///
/// A `Failure` is a cheap, shared handle: cloning bumps a reference count,
/// never duplicates the error. It exposes two capabilities the mechanism
/// relies on: [`describe`](Failure::describe) and
/// [`as_chain`](Failure::as_chain).
///
/// `Failure` intentionally does not implement `std::error::Error`; that is
/// what makes the blanket `From<E>` conversion below legal.
#[derive(Clone)]
pub struct Failure {
    inner: Arc<FailureInner>,
}

struct FailureInner {
    kind: &'static str,
    repr: Repr,
}

enum Repr {
    Described(Box<dyn StdError + Send + Sync + 'static>),
    Opaque,
}

impl Failure {
    /// Wrap a concrete error. The kind label is the error's type name.
    #[inline]
    pub fn new<E: StdError + Send + Sync + 'static>(error: E) -> Self {
        Self {
            inner: Arc::new(FailureInner {
                kind: core::any::type_name::<E>(),
                repr: Repr::Described(Box::new(error)),
            }),
        }
    }

    /// Wrap a plain message.
    #[inline]
    pub fn msg(message: impl Into<String>) -> Self {
        Self::new(StringError(message.into()))
    }

    /// A failure with no description capability. Renders as the fixed
    /// `Unknown exception` placeholder.
    #[inline]
    pub fn opaque() -> Self {
        Self {
            inner: Arc::new(FailureInner {
                kind: "unknown",
                repr: Repr::Opaque,
            }),
        }
    }

    /// Wrap a panic payload from `std::panic::catch_unwind`.
    ///
    /// String payloads keep their message; anything else becomes an
    /// [`opaque`](Failure::opaque) failure, since chain data must stay
    /// shareable across threads and an arbitrary payload is neither
    /// inspectable nor `Sync`.
    pub fn from_panic(payload: Box<dyn Any + Send + 'static>) -> Self {
        let description = payload
            .downcast_ref::<&'static str>()
            .map(|s| (*s).to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned());
        match description {
            Some(message) => Self {
                inner: Arc::new(FailureInner {
                    kind: "panic",
                    repr: Repr::Described(Box::new(StringError(message))),
                }),
            },
            None => Self::opaque(),
        }
    }

    /// Wrap a boxed error, unwrapping a boxed [`Traced`] first so an
    /// already-chained failure keeps its chain identity.
    pub fn from_boxed(error: BoxedError) -> Self {
        match error.downcast::<Traced>() {
            Ok(traced) => Self::new(*traced),
            Err(error) => Self {
                inner: Arc::new(FailureInner {
                    kind: "dyn std::error::Error",
                    repr: Repr::Described(error),
                }),
            },
        }
    }

    /// Kind label used by the renderer, captured at construction.
    #[inline]
    pub fn kind(&self) -> &'static str {
        self.inner.kind
    }

    /// Textual description, if this failure carries one.
    pub fn describe(&self) -> Option<String> {
        match &self.inner.repr {
            Repr::Described(error) => Some(error.to_string()),
            Repr::Opaque => None,
        }
    }

    /// The chain node inside this failure, if it is one.
    #[inline]
    pub fn as_chain(&self) -> Option<&Traced> {
        self.downcast_ref::<Traced>()
    }

    /// Whether this failure is already part of a chain.
    #[inline]
    pub fn is_chain(&self) -> bool {
        self.as_chain().is_some()
    }

    /// Typed access to the wrapped error.
    #[inline]
    pub fn downcast_ref<T: StdError + 'static>(&self) -> Option<&T> {
        match &self.inner.repr {
            Repr::Described(error) => error.downcast_ref::<T>(),
            Repr::Opaque => None,
        }
    }

    /// The wrapped error as a trait object, when described.
    #[inline]
    pub fn as_error(&self) -> Option<&(dyn StdError + 'static)> {
        match &self.inner.repr {
            Repr::Described(error) => Some(error.as_ref()),
            Repr::Opaque => None,
        }
    }

    /// Whether two handles share the same underlying error.
    #[inline]
    pub fn ptr_eq(&self, other: &Failure) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Failure")
            .field("kind", &self.inner.kind)
            .field("description", &self.describe())
            .finish()
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.describe() {
            Some(description) => f.write_str(&description),
            None => f.write_str("Unknown exception"),
        }
    }
}

// Legal because Failure itself does not implement Error.
impl<E: StdError + Send + Sync + 'static> From<E> for Failure {
    fn from(error: E) -> Self {
        Failure::new(error)
    }
}

// ============================================================
// StringError helper
// ============================================================

/// Message-only error used by [`Failure::msg`].
#[derive(Debug)]
pub struct StringError(pub(crate) String);

impl fmt::Display for StringError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl StdError for StringError {}

// ============================================================
// InvalidState
// ============================================================

/// Chain construction was attempted with no current failure.
///
/// Reported by [`Traced::from_flight`]; the mechanism never synthesizes a
/// null original.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidState;

impl fmt::Display for InvalidState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("chain construction with no current failure")
    }
}

impl StdError for InvalidState {}

// ============================================================
// Traced - the chain node
// ============================================================

/// A failure wrapped with a call-site trace and an optional cause chain.
///
/// A `Traced` records three things, all fixed at construction:
///
/// - `original` - the root failure that started this chain
/// - `cause` - an unrelated failure that was already propagating when the
///   original occurred, itself a `Traced`, forming a singly linked chain
/// - `trace` - call sites the failure passed through, oldest first
///
/// The rendered text is computed once, eagerly, and shared by every clone:
/// cloning a `Traced` bumps a reference count, so copies held across
/// threads or stored in an enclosing chain all observe identical data.
#[derive(Clone)]
pub struct Traced {
    data: Arc<ChainData>,
}

struct ChainData {
    original: Failure,
    cause: Option<Traced>,
    trace: TraceVec,
    rendered: String,
}

impl Traced {
    /// Build a chain node from an in-flight state and a capture site.
    ///
    /// If `current` is already a chain, its original, cause and trace are
    /// taken over (the data is shared, the trace copied) and `location` is
    /// appended; `previous` is not consulted, because a chained failure
    /// already resolved its original/cause pair. Otherwise `current`
    /// becomes the original, `previous` becomes the cause if it is itself
    /// a chain (a non-chain previous carries no trace worth preserving and
    /// is discarded), and the trace starts at `location`.
    ///
    /// A `location` that is not a real capture is not appended.
    pub fn new(previous: Option<Failure>, current: Failure, location: Location) -> Self {
        let chain = current.as_chain().cloned();
        let (original, cause, mut trace) = match chain {
            Some(chain) => (
                chain.data.original.clone(),
                chain.data.cause.clone(),
                chain.data.trace.clone(),
            ),
            None => {
                let cause = previous.and_then(|p| p.as_chain().cloned());
                (current, cause, TraceVec::new())
            }
        };
        if location.is_captured() {
            trace.push(location);
        }
        let rendered = render(&original, cause.as_ref(), &trace);
        Self {
            data: Arc::new(ChainData {
                original,
                cause,
                trace,
                rendered,
            }),
        }
    }

    /// Fallible construction for callers holding both slots as optionals.
    ///
    /// A missing current failure is a programming error and is reported as
    /// [`InvalidState`] rather than swallowed.
    pub fn from_flight(
        previous: Option<Failure>,
        current: Option<Failure>,
        location: Location,
    ) -> Result<Self, InvalidState> {
        match current {
            Some(current) => Ok(Self::new(previous, current, location)),
            None => Err(InvalidState),
        }
    }

    /// The root failure that started this chain.
    #[inline]
    pub fn original(&self) -> &Failure {
        &self.data.original
    }

    /// The failure that was already propagating when the original occurred.
    #[inline]
    pub fn cause(&self) -> Option<&Traced> {
        self.data.cause.as_ref()
    }

    /// Call sites the failure passed through, oldest first.
    #[inline]
    pub fn trace(&self) -> &[Location] {
        &self.data.trace
    }

    /// Number of trace frames.
    #[inline]
    pub fn depth(&self) -> usize {
        self.data.trace.len()
    }

    /// The cached multi-line rendering. Diagnostic text, not a format to
    /// parse.
    #[inline]
    pub fn rendered(&self) -> &str {
        &self.data.rendered
    }

    /// A shared handle to the original, e.g. for re-raising it bare.
    #[inline]
    pub fn original_failure(&self) -> Failure {
        self.data.original.clone()
    }

    /// A shared handle to the cause chain, wrapped back into a failure.
    #[inline]
    pub fn cause_failure(&self) -> Option<Failure> {
        self.data.cause.clone().map(Failure::new)
    }

    /// Typed access to the original.
    #[inline]
    pub fn downcast_original<T: StdError + 'static>(&self) -> Option<&T> {
        self.data.original.downcast_ref::<T>()
    }
}

impl fmt::Debug for Traced {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Traced")
            .field("original", &self.data.original)
            .field("cause", &self.data.cause)
            .field("trace", &self.data.trace)
            .finish()
    }
}

impl fmt::Display for Traced {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.rendered())
    }
}

impl StdError for Traced {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.data.original.as_error()
    }
}

// ============================================================
// Renderer
// ============================================================

fn render(original: &Failure, cause: Option<&Traced>, trace: &[Location]) -> String {
    let mut message = String::new();
    append_original(&mut message, original);
    append_trace(&mut message, trace);
    let mut next = cause;
    while let Some(chain) = next {
        append_cause(&mut message, chain.original());
        append_trace(&mut message, chain.trace());
        next = chain.cause();
    }
    message
}

fn append_original(message: &mut String, original: &Failure) {
    let thread = std::thread::current().id();
    match original.describe() {
        Some(description) => {
            let _ = write!(
                message,
                "Exception in thread {:?} {}: {}",
                thread,
                original.kind(),
                description
            );
        }
        None => {
            let _ = write!(message, "Exception in thread {:?}: Unknown exception", thread);
        }
    }
}

fn append_cause(message: &mut String, original: &Failure) {
    match original.describe() {
        Some(description) => {
            let _ = write!(message, "\nCaused by {}: {}", original.kind(), description);
        }
        None => {
            message.push_str("\nCaused by: Unknown exception");
        }
    }
}

fn append_trace(message: &mut String, trace: &[Location]) {
    for location in trace {
        let _ = write!(message, "\n    at {}", location);
    }
}
