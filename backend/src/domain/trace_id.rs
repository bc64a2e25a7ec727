//! Request correlation id shared by logs, error bodies and file tasks.
//!
//! The id is stored task-locally while a request is handled. Record files are
//! read and written on the blocking pool, where task-locals do not follow, so
//! file work is wrapped with [`TraceId::carry`] to keep the same id in scope.

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use tokio::task_local;
use uuid::Uuid;

task_local! {
    pub(crate) static TRACE_ID: TraceId;
}

/// Correlation id for one API request.
///
/// # Examples
/// ```
/// use salon_crm::TraceId;
///
/// async fn save_visit() {
///     if let Some(id) = TraceId::current() {
///         tracing::info!(trace_id = %id, "saving visit");
///     }
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceId(Uuid);

impl TraceId {
    /// Fresh random id.
    #[must_use]
    pub(crate) fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Id supplied by the caller in the `trace-id` request header.
    ///
    /// Only non-nil UUIDs are accepted, so a front desk client can correlate
    /// its own logs but cannot collapse every request onto one id.
    #[must_use]
    pub(crate) fn adopt(header: &str) -> Option<Self> {
        header
            .trim()
            .parse::<Self>()
            .ok()
            .filter(|id| !id.0.is_nil())
    }

    /// Id of the request being handled, if any.
    #[must_use]
    pub fn current() -> Option<Self> {
        TRACE_ID.try_with(|id| *id).ok()
    }

    /// Run `fut` with `trace_id` in scope.
    ///
    /// # Examples
    /// ```
    /// use salon_crm::TraceId;
    ///
    /// # tokio::runtime::Runtime::new().expect("runtime").block_on(async {
    /// let trace_id: TraceId = "6a1f0c7e-2b1d-4c55-9d3e-0f8b7a6c5d4e"
    ///     .parse()
    ///     .expect("valid UUID");
    /// let seen = TraceId::scope(trace_id, async { TraceId::current() }).await;
    /// assert_eq!(seen, Some(trace_id));
    /// # });
    /// ```
    pub async fn scope<Fut>(trace_id: Self, fut: Fut) -> Fut::Output
    where
        Fut: Future,
    {
        TRACE_ID.scope(trace_id, fut).await
    }

    /// Wrap blocking `task` so it runs with the caller's id in scope.
    pub(crate) fn carry<F, R>(task: F) -> impl FnOnce() -> R + Send + 'static
    where
        F: FnOnce() -> R + Send + 'static,
    {
        let current = Self::current();
        move || match current {
            Some(id) => TRACE_ID.sync_scope(id, task),
            None => task(),
        }
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

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[tokio::test]
    async fn current_follows_the_request_scope() {
        let expected = TraceId::generate();
        let observed = TraceId::scope(expected, async { TraceId::current() }).await;
        assert_eq!(observed, Some(expected));
        assert!(TraceId::current().is_none());
    }

    #[tokio::test]
    async fn carried_tasks_see_the_request_id_on_the_blocking_pool() {
        let expected = TraceId::generate();
        let observed = TraceId::scope(expected, async {
            tokio::task::spawn_blocking(TraceId::carry(TraceId::current)).await
        })
        .await
        .expect("blocking task");
        assert_eq!(observed, Some(expected));
    }

    #[tokio::test]
    async fn carried_tasks_outside_a_request_have_no_id() {
        let observed = tokio::task::spawn_blocking(TraceId::carry(TraceId::current))
            .await
            .expect("blocking task");
        assert_eq!(observed, None);
    }

    #[rstest]
    #[case(" 6a1f0c7e-2b1d-4c55-9d3e-0f8b7a6c5d4e ", true)]
    #[case("00000000-0000-0000-0000-000000000000", false)]
    #[case("turno-14", false)]
    #[case("", false)]
    fn adopts_only_real_uuids(#[case] header: &str, #[case] adopted: bool) {
        assert_eq!(TraceId::adopt(header).is_some(), adopted);
    }
}
