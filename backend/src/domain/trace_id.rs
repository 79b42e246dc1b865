//! Request-scoped trace identifier for correlating logs, errors and responses.
//!
//! The identifier lives in Tokio task-local storage so error constructors can
//! pick it up without threading it through every call. Task locals are not
//! inherited by spawned tasks; wrap spawned futures in [`TraceId::scope`].

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use tokio::task_local;
use uuid::Uuid;

task_local! {
    static CURRENT: TraceId;
}

/// Header used to echo (and optionally accept) the trace identifier.
pub const TRACE_ID_HEADER: &str = "trace-id";

/// Per-request correlation identifier.
///
/// # Examples
/// ```
/// use saveablood::domain::TraceId;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let id: TraceId = "00000000-0000-0000-0000-000000000000".parse().expect("uuid");
/// let seen = TraceId::scope(id, async { TraceId::current() }).await;
/// assert_eq!(seen, Some(id));
/// # });
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TraceId(Uuid);

impl TraceId {
    /// Fresh random identifier for a request that did not supply one.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Accept a caller-supplied header value, ignoring anything that is not a
    /// UUID so clients cannot inject arbitrary text into logs.
    pub fn from_header(value: &str) -> Option<Self> {
        value.trim().parse().ok()
    }

    /// The identifier for the task currently executing, if any.
    pub fn current() -> Option<Self> {
        CURRENT.try_with(|id| *id).ok()
    }

    /// Run `fut` with `trace_id` in scope.
    pub async fn scope<Fut>(trace_id: Self, fut: Fut) -> Fut::Output
    where
        Fut: Future,
    {
        CURRENT.scope(trace_id, fut).await
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for TraceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}
