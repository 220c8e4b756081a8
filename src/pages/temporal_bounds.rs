//! Overall first and last dates for which the service has data.

use chrono::NaiveDate;

use crate::{
    api::{HistoryApi, history::models::TemporalBounds},
    prelude::*,
    store::{FetchOutcome, Fetched, RequestMeta, Slice, track},
};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TemporalBoundsState {
    pub meta: RequestMeta,
    pub bounds: Fetched<Option<TemporalBounds>>,
}

impl TemporalBoundsState {
    pub fn is_daily_loaded(&self) -> bool {
        self.bounds.data.as_ref().is_some_and(|bounds| bounds.daily.is_some())
    }

    pub fn daily_upper(&self) -> Option<NaiveDate> {
        self.bounds.data.as_ref()?.daily_upper()
    }
}

const fn meta(state: &mut TemporalBoundsState) -> &mut RequestMeta {
    &mut state.meta
}

const fn bounds(state: &mut TemporalBoundsState) -> &mut Fetched<Option<TemporalBounds>> {
    &mut state.bounds
}

/// Fetch the bounds of all granularities.
#[instrument(skip_all)]
pub async fn fetch_bounds(
    slice: &Slice<TemporalBoundsState>,
    api: &dyn HistoryApi,
) -> Result<FetchOutcome> {
    track(slice, meta, bounds, async { Ok(Some(api.fetch_temporal_bounds().await?)) }).await
}
