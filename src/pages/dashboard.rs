//! Dashboard: detailed history, state-of-charge statistics, and the history overview.

use chrono::{DateTime, Days, Local, NaiveDate};
use itertools::Itertools;

use crate::{
    api::{
        HistoryApi,
        history::models::{
            BandedSocStats,
            DetailedHistoryDatum,
            Granularity,
            HistoryDatum,
            HistoryRequest,
        },
    },
    core::date_range::{DateRange, TimestampFormat},
    prelude::*,
    store::{FetchOutcome, Fetched, RequestMeta, Slice, track},
};

/// Length of the default SOC statistics and history ranges.
const DEFAULT_SPAN: Days = Days::new(30);

/// Date range together with the data fetched for it.
#[derive(Clone, Debug, PartialEq)]
pub struct Widget<T> {
    pub range: DateRange,
    pub fetched: Fetched<Vec<T>>,
}

impl<T> Widget<T> {
    pub const fn new(range: DateRange) -> Self {
        Self { range, fetched: Fetched::new(Vec::new()) }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DashboardState {
    pub meta: RequestMeta,
    pub detailed_history: Widget<DetailedHistoryDatum>,
    pub soc_stats: Widget<BandedSocStats>,
    pub history: Widget<HistoryDatum>,
    pub history_granularity: Granularity,
}

impl DashboardState {
    pub fn new(today: NaiveDate) -> Self {
        let span_end = today.checked_add_days(DEFAULT_SPAN).unwrap_or(today);
        Self {
            meta: RequestMeta::default(),
            detailed_history: Widget::new(DateRange::day_of(today)),
            soc_stats: Widget::new(DateRange::days(today, span_end)),
            history: Widget::new(DateRange::days(today, span_end)),
            history_granularity: Granularity::Daily,
        }
    }

    pub const fn detailed_history_range(&self) -> (DateTime<Local>, DateTime<Local>) {
        self.detailed_history.range.bounds()
    }

    pub const fn soc_stats_range(&self) -> (DateTime<Local>, DateTime<Local>) {
        self.soc_stats.range.bounds()
    }

    pub const fn history_range(&self) -> (DateTime<Local>, DateTime<Local>) {
        self.history.range.bounds()
    }
}

const fn meta(state: &mut DashboardState) -> &mut RequestMeta {
    &mut state.meta
}

const fn detailed_history(state: &mut DashboardState) -> &mut Fetched<Vec<DetailedHistoryDatum>> {
    &mut state.detailed_history.fetched
}

const fn soc_stats(state: &mut DashboardState) -> &mut Fetched<Vec<BandedSocStats>> {
    &mut state.soc_stats.fetched
}

const fn history(state: &mut DashboardState) -> &mut Fetched<Vec<HistoryDatum>> {
    &mut state.history.fetched
}

/// Fetch the detailed history, at a 5-minute interval, ordered by timestamp.
#[instrument(skip_all)]
pub async fn fetch_detailed_history(
    slice: &Slice<DashboardState>,
    api: &dyn HistoryApi,
) -> Result<FetchOutcome> {
    let range = slice.select(|state| state.detailed_history.range.format(TimestampFormat::Minutes));
    let Some(range) = range else {
        return Ok(FetchOutcome::Skipped);
    };
    track(slice, meta, detailed_history, async {
        let response = api.fetch_detailed_history(&range.into()).await?;
        Ok(response
            .into_iter()
            .sorted_by(|lhs, rhs| lhs.timestamp.cmp(&rhs.timestamp))
            .collect())
    })
    .await
}

/// Collapse the detailed history range to the day and fetch it.
pub async fn set_detailed_history_start_date(
    slice: &Slice<DashboardState>,
    api: &dyn HistoryApi,
    date: NaiveDate,
) -> Result<FetchOutcome> {
    slice.update(|state| state.detailed_history.range = DateRange::day_of(date));
    fetch_detailed_history(slice, api).await
}

pub async fn set_detailed_history_end_date(
    slice: &Slice<DashboardState>,
    api: &dyn HistoryApi,
    date: NaiveDate,
) -> Result<FetchOutcome> {
    slice.update(|state| {
        state.detailed_history.range = state.detailed_history.range.with_end_of(date);
    });
    fetch_detailed_history(slice, api).await
}

/// Fetch the SOC statistics and derive their spread bands.
#[instrument(skip_all)]
pub async fn fetch_soc_stats(
    slice: &Slice<DashboardState>,
    api: &dyn HistoryApi,
) -> Result<FetchOutcome> {
    let Some(range) = slice.select(|state| state.soc_stats.range.format(TimestampFormat::Minutes))
    else {
        return Ok(FetchOutcome::Skipped);
    };
    track(slice, meta, soc_stats, async {
        let response = api.fetch_soc_stats(&range.into()).await?;
        Ok(response.into_iter().map(BandedSocStats::from).collect())
    })
    .await
}

/// Collapse the SOC statistics range to the day and fetch it.
pub async fn set_soc_stats_start_date(
    slice: &Slice<DashboardState>,
    api: &dyn HistoryApi,
    date: NaiveDate,
) -> Result<FetchOutcome> {
    slice.update(|state| state.soc_stats.range = DateRange::day_of(date));
    fetch_soc_stats(slice, api).await
}

pub async fn set_soc_stats_end_date(
    slice: &Slice<DashboardState>,
    api: &dyn HistoryApi,
    date: NaiveDate,
) -> Result<FetchOutcome> {
    slice.update(|state| state.soc_stats.range = state.soc_stats.range.with_end_of(date));
    fetch_soc_stats(slice, api).await
}

/// Fetch the history overview at the selected granularity.
#[instrument(skip_all)]
pub async fn fetch_history(
    slice: &Slice<DashboardState>,
    api: &dyn HistoryApi,
) -> Result<FetchOutcome> {
    let Some(request) = slice.select(|state| {
        state
            .history
            .range
            .format(TimestampFormat::Date)
            .map(|range| HistoryRequest::new(state.history_granularity, range))
    }) else {
        return Ok(FetchOutcome::Skipped);
    };
    track(slice, meta, history, async { Ok(api.fetch_history(&request).await?.data) }).await
}

/// Move the start of the history range, keeping its end.
pub async fn set_history_start_date(
    slice: &Slice<DashboardState>,
    api: &dyn HistoryApi,
    date: NaiveDate,
) -> Result<FetchOutcome> {
    slice.update(|state| state.history.range = state.history.range.with_start_of(date));
    fetch_history(slice, api).await
}

pub async fn set_history_end_date(
    slice: &Slice<DashboardState>,
    api: &dyn HistoryApi,
    date: NaiveDate,
) -> Result<FetchOutcome> {
    slice.update(|state| state.history.range = state.history.range.with_end_of(date));
    fetch_history(slice, api).await
}

pub async fn set_history_granularity(
    slice: &Slice<DashboardState>,
    api: &dyn HistoryApi,
    granularity: Granularity,
) -> Result<FetchOutcome> {
    slice.update(|state| state.history_granularity = granularity);
    fetch_history(slice, api).await
}
