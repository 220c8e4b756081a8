mod request;
mod slice;

use std::sync::Arc;

use chrono::{DateTime, Local};

pub use self::{
    request::{FetchOutcome, FetchStatus, Fetched, RequestMeta, settle, track},
    slice::Slice,
};
use crate::pages::{
    all_time::AllTimeState,
    dashboard::DashboardState,
    day::DayState,
    temporal_bounds::TemporalBoundsState,
};

/// Application-lifetime state, one slice per page.
#[derive(Clone)]
pub struct Store {
    pub dashboard: Arc<Slice<DashboardState>>,
    pub all_time: Arc<Slice<AllTimeState>>,
    pub day: Arc<Slice<DayState>>,
    pub temporal_bounds: Arc<Slice<TemporalBoundsState>>,
}

impl Store {
    pub fn new(now: DateTime<Local>) -> Self {
        let today = now.date_naive();
        Self {
            dashboard: Arc::new(Slice::new(DashboardState::new(today))),
            all_time: Arc::new(Slice::new(AllTimeState::new(today))),
            day: Arc::new(Slice::new(DayState::default())),
            temporal_bounds: Arc::new(Slice::new(TemporalBoundsState::default())),
        }
    }
}
