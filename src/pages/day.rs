//! Single-day view with debounced paging.

use std::{sync::Arc, time::Duration};

use chrono::{Days, Local, NaiveDate};

use crate::{
    api::{
        HistoryApi,
        history::models::{BandedSocStats, DetailedHistoryDatum, TimestampRangeRequest},
    },
    core::{
        date_range::{DateRange, TimestampFormat},
        debounce::Debouncer,
    },
    pages::temporal_bounds::{self, TemporalBoundsState},
    prelude::*,
    store::{FetchOutcome, Fetched, RequestMeta, Slice, settle, track},
};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DayState {
    pub meta: RequestMeta,

    /// Selected day, unset until chosen or bootstrapped from the temporal bounds.
    pub date: Option<NaiveDate>,

    pub detailed_history: Fetched<Vec<DetailedHistoryDatum>>,
    pub soc_stats: Fetched<Vec<BandedSocStats>>,
}

const fn meta(state: &mut DayState) -> &mut RequestMeta {
    &mut state.meta
}

const fn detailed_history(state: &mut DayState) -> &mut Fetched<Vec<DetailedHistoryDatum>> {
    &mut state.detailed_history
}

const fn soc_stats(state: &mut DayState) -> &mut Fetched<Vec<BandedSocStats>> {
    &mut state.soc_stats
}

/// Return the selected date, defaulting it on the first call.
///
/// When no date is selected and the daily bounds are not loaded yet, the bounds get fetched once.
/// The default is the last day with data, or today when the bounds are unavailable.
#[instrument(skip_all)]
pub async fn ensure_date_is_set(
    slice: &Slice<DayState>,
    bounds: &Slice<TemporalBoundsState>,
    api: &dyn HistoryApi,
) -> NaiveDate {
    if let Some(date) = slice.select(|state| state.date) {
        return date;
    }
    if !bounds.select(TemporalBoundsState::is_daily_loaded)
        && let Err(error) = temporal_bounds::fetch_bounds(bounds, api).await
    {
        warn!("falling back to today: {error:#}");
    }
    let date = bounds
        .select(TemporalBoundsState::daily_upper)
        .unwrap_or_else(|| Local::now().date_naive());
    info!(%date, "defaulting the date");
    slice.update(|state| *state.date.get_or_insert(date))
}

/// Range of the selected day, defaulting the date first.
async fn day_range(
    slice: &Slice<DayState>,
    bounds: &Slice<TemporalBoundsState>,
    api: &dyn HistoryApi,
) -> Result<TimestampRangeRequest> {
    let date = ensure_date_is_set(slice, bounds, api).await;
    let range = DateRange::day_of(date)
        .format(TimestampFormat::Minutes)
        .with_context(|| format!("empty range of {date}"))?;
    Ok(range.into())
}

/// Fetch the detailed history of the selected day, at a 5-minute interval.
///
/// The request is pending from before the date bootstrap.
#[instrument(skip_all)]
pub async fn fetch_detailed_history(
    slice: &Slice<DayState>,
    bounds: &Slice<TemporalBoundsState>,
    api: &dyn HistoryApi,
) -> Result<FetchOutcome> {
    track(slice, meta, detailed_history, async {
        let request = day_range(slice, bounds, api).await?;
        Ok(api.fetch_detailed_history(&request).await?.data)
    })
    .await
}

/// Fetch the SOC statistics of the selected day.
#[instrument(skip_all)]
pub async fn fetch_soc_stats(
    slice: &Slice<DayState>,
    bounds: &Slice<TemporalBoundsState>,
    api: &dyn HistoryApi,
) -> Result<FetchOutcome> {
    track(slice, meta, soc_stats, async {
        let request = day_range(slice, bounds, api).await?;
        let response = api.fetch_soc_stats(&request).await?;
        Ok(response.into_iter().map(BandedSocStats::from).collect())
    })
    .await
}

/// Day page wiring: the slices, the service, and the paging debouncer.
#[derive(bon::Builder)]
pub struct DayPage {
    slice: Arc<Slice<DayState>>,
    bounds: Arc<Slice<TemporalBoundsState>>,
    api: Arc<dyn HistoryApi>,

    #[builder(default = Debouncer::new(DayPage::DEBOUNCE))]
    debouncer: Debouncer,
}

impl DayPage {
    /// Default delay between the last date change and the fetch.
    pub const DEBOUNCE: Duration = Duration::from_millis(300);

    pub fn date(&self) -> Option<NaiveDate> {
        self.slice.select(|state| state.date)
    }

    /// Load the page: the detailed history and the SOC statistics of the selected day.
    ///
    /// A failing fetch does not prevent the other one.
    pub async fn open(&self) {
        settle(fetch_detailed_history(&self.slice, &self.bounds, self.api.as_ref()).await);
        settle(fetch_soc_stats(&self.slice, &self.bounds, self.api.as_ref()).await);
    }

    /// Select the day and schedule a debounced fetch of its detailed history.
    pub fn set_date(&self, date: NaiveDate) {
        self.slice.update(|state| state.date = Some(date));
        let slice = Arc::clone(&self.slice);
        let bounds = Arc::clone(&self.bounds);
        let api = Arc::clone(&self.api);
        self.debouncer.call(async move {
            settle(fetch_detailed_history(&slice, &bounds, api.as_ref()).await);
        });
    }

    /// Page by the number of days, from today when no date is selected yet.
    pub fn shift_date(&self, n_days: i64) -> Result {
        let date = self.date().unwrap_or_else(|| Local::now().date_naive());
        let days = Days::new(n_days.unsigned_abs());
        let shifted =
            if n_days >= 0 { date.checked_add_days(days) } else { date.checked_sub_days(days) };
        self.set_date(shifted.with_context(|| format!("cannot shift {date} by {n_days} days"))?);
        Ok(())
    }
}
