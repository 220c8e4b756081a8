use crate::{prelude::*, store::Slice};

/// Number of in-flight requests of a slice, never negative.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, derive_more::Display)]
pub struct PendingCounter(u32);

impl PendingCounter {
    pub const fn get(self) -> u32 {
        self.0
    }

    pub const fn is_pending(self) -> bool {
        self.0 != 0
    }

    pub const fn increment(&mut self) {
        self.0 = self.0.saturating_add(1);
    }

    pub const fn decrement(&mut self) {
        self.0 = self.0.saturating_sub(1);
    }
}

/// Outcome of the latest completed request of a slice.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum FetchStatus {
    /// Nothing completed yet.
    #[default]
    Idle,

    Loaded,

    /// The error is kept for display; the data is left as it was.
    Failed(String),
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RequestMeta {
    pub pending: PendingCounter,
    pub status: FetchStatus,
}

impl RequestMeta {
    pub const fn start_request(&mut self) {
        self.pending.increment();
    }

    pub const fn end_request(&mut self) {
        self.pending.decrement();
    }
}

/// Sequence number of an issued request.
#[must_use]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub struct Ticket(u64);

/// Fetched data together with its request sequence.
///
/// A response is applied only when it was issued after the one currently applied,
/// so a slow earlier request never overwrites a fresher one.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Fetched<T> {
    pub data: T,
    issued: u64,
    applied: u64,
}

impl<T> Fetched<T> {
    pub const fn new(data: T) -> Self {
        Self { data, issued: 0, applied: 0 }
    }

    pub const fn issue(&mut self) -> Ticket {
        self.issued += 1;
        Ticket(self.issued)
    }

    /// Overwrite the data unless a later request has already been applied.
    pub fn apply(&mut self, ticket: Ticket, data: T) -> bool {
        if ticket.0 > self.applied {
            self.data = data;
            self.applied = ticket.0;
            true
        } else {
            false
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum FetchOutcome {
    /// The response overwrote the slice data.
    Applied,

    /// The range was missing or reversed, nothing was sent.
    Skipped,

    /// The response arrived after a fresher one and was discarded.
    Stale,
}

/// Run one request against a slice.
///
/// Counts the request as pending for its whole duration, writes a successful response into
/// the selected [`Fetched`], and records a failure in [`RequestMeta::status`] leaving the data
/// untouched.
pub async fn track<S, T>(
    slice: &Slice<S>,
    meta: fn(&mut S) -> &mut RequestMeta,
    fetched: fn(&mut S) -> &mut Fetched<T>,
    request: impl Future<Output = Result<T>>,
) -> Result<FetchOutcome> {
    let ticket = slice.update(|state| {
        meta(state).start_request();
        fetched(state).issue()
    });
    let result = request.await;
    slice.update(|state| {
        meta(state).end_request();
        match result {
            Ok(data) => {
                if fetched(state).apply(ticket, data) {
                    meta(state).status = FetchStatus::Loaded;
                    Ok(FetchOutcome::Applied)
                } else {
                    debug!(?ticket, "discarding the stale response");
                    Ok(FetchOutcome::Stale)
                }
            }
            Err(error) => {
                error!("failed to fetch: {error:#}");
                meta(state).status = FetchStatus::Failed(format!("{error:#}"));
                Err(error)
            }
        }
    })
}

/// Finish a fetch at the page boundary, so that the remaining fetches go on.
///
/// A failure is already logged by [`track`] and recorded in the slice status.
pub fn settle(result: Result<FetchOutcome>) {
    match result {
        Ok(FetchOutcome::Applied) | Err(_) => {}
        Ok(outcome) => debug!(?outcome, "nothing applied"),
    }
}
