//! All-time statistics.

use chrono::{Months, NaiveDate};

use crate::{
    api::{
        HistoryApi,
        history::models::{DetailedStatsDatum, SocStatsDatum},
    },
    core::date_range::{DateRange, TimestampFormat},
    prelude::*,
    store::{FetchOutcome, Fetched, RequestMeta, Slice, track},
};

#[derive(Clone, Debug, PartialEq)]
pub struct AllTimeState {
    pub meta: RequestMeta,
    pub range: DateRange,
    pub soc_stats: Fetched<Vec<SocStatsDatum>>,

    /// Bands are derived on read, see [`DetailedStatsDatum::band`].
    pub detailed_stats: Fetched<Vec<DetailedStatsDatum>>,
}

impl AllTimeState {
    /// A range wide enough to cover any data: a century back and a millennium forward.
    pub fn new(today: NaiveDate) -> Self {
        let first = today.checked_sub_months(Months::new(100 * 12)).unwrap_or(NaiveDate::MIN);
        let last = today.checked_add_months(Months::new(1000 * 12)).unwrap_or(NaiveDate::MAX);
        Self {
            meta: RequestMeta::default(),
            range: DateRange::days(first, last),
            soc_stats: Fetched::new(Vec::new()),
            detailed_stats: Fetched::new(Vec::new()),
        }
    }
}

const fn meta(state: &mut AllTimeState) -> &mut RequestMeta {
    &mut state.meta
}

const fn soc_stats(state: &mut AllTimeState) -> &mut Fetched<Vec<SocStatsDatum>> {
    &mut state.soc_stats
}

const fn detailed_stats(state: &mut AllTimeState) -> &mut Fetched<Vec<DetailedStatsDatum>> {
    &mut state.detailed_stats
}

#[instrument(skip_all)]
pub async fn fetch_soc_stats(
    slice: &Slice<AllTimeState>,
    api: &dyn HistoryApi,
) -> Result<FetchOutcome> {
    let Some(range) = slice.select(|state| state.range.format(TimestampFormat::Minutes)) else {
        return Ok(FetchOutcome::Skipped);
    };
    track(slice, meta, soc_stats, async { Ok(api.fetch_soc_stats(&range.into()).await?.data) })
        .await
}

#[instrument(skip_all)]
pub async fn fetch_detailed_stats(
    slice: &Slice<AllTimeState>,
    api: &dyn HistoryApi,
) -> Result<FetchOutcome> {
    let Some(range) = slice.select(|state| state.range.format(TimestampFormat::Minutes)) else {
        return Ok(FetchOutcome::Skipped);
    };
    track(slice, meta, detailed_stats, async {
        Ok(api.fetch_detailed_stats(&range.into()).await?.data)
    })
    .await
}

/// Fetch everything the page shows on open.
pub async fn fetch_data(slice: &Slice<AllTimeState>, api: &dyn HistoryApi) -> Result<FetchOutcome> {
    fetch_detailed_stats(slice, api).await
}
