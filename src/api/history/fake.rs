use std::{sync::Mutex, time::Duration};

use async_trait::async_trait;

use super::{
    HistoryApi,
    models::{
        DataResponse,
        DetailedHistoryDatum,
        DetailedStatsDatum,
        Granularity,
        HistoryDatum,
        HistoryRequest,
        SocStatsDatum,
        TemporalBounds,
        TimestampRangeRequest,
    },
};
use crate::prelude::*;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Call {
    DetailedHistory(TimestampRangeRequest),
    History(HistoryRequest),
    SocStats(TimestampRangeRequest),
    DetailedStats(TimestampRangeRequest),
    TemporalBounds,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Endpoint {
    DetailedHistory,
    History,
    SocStats,
    DetailedStats,
}

impl Call {
    const fn endpoint(&self) -> Option<Endpoint> {
        match self {
            Self::DetailedHistory(_) => Some(Endpoint::DetailedHistory),
            Self::History(_) => Some(Endpoint::History),
            Self::SocStats(_) => Some(Endpoint::SocStats),
            Self::DetailedStats(_) => Some(Endpoint::DetailedStats),
            Self::TemporalBounds => None,
        }
    }
}

/// Recording in-memory service.
#[derive(Default)]
pub struct FakeHistoryApi {
    pub detailed_history: Vec<DetailedHistoryDatum>,
    pub history: Vec<HistoryDatum>,
    pub soc_stats: Vec<SocStatsDatum>,
    pub detailed_stats: Vec<DetailedStatsDatum>,

    /// `None` makes the bounds endpoint fail.
    pub temporal_bounds: Option<TemporalBounds>,

    /// Fail every endpoint.
    pub is_failing: bool,

    /// Fail only these data endpoints.
    pub failing: Vec<Endpoint>,

    /// Delay of every response, after the call is recorded.
    pub latency: Option<Duration>,

    pub calls: Mutex<Vec<Call>>,
}

impl FakeHistoryApi {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    async fn record(&self, call: Call) -> Result {
        let endpoint = call.endpoint();
        self.calls.lock().unwrap().push(call);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if self.is_failing || endpoint.is_some_and(|endpoint| self.failing.contains(&endpoint)) {
            bail!("HTTP status server error (500 Internal Server Error)");
        }
        Ok(())
    }
}

#[async_trait]
impl HistoryApi for FakeHistoryApi {
    async fn fetch_detailed_history(
        &self,
        request: &TimestampRangeRequest,
    ) -> Result<DataResponse<DetailedHistoryDatum>> {
        self.record(Call::DetailedHistory(request.clone())).await?;
        Ok(DataResponse { data: self.detailed_history.clone() })
    }

    async fn fetch_history(&self, request: &HistoryRequest) -> Result<DataResponse<HistoryDatum>> {
        self.record(Call::History(request.clone())).await?;
        Ok(DataResponse { data: self.history.clone() })
    }

    async fn fetch_soc_stats(
        &self,
        request: &TimestampRangeRequest,
    ) -> Result<DataResponse<SocStatsDatum>> {
        self.record(Call::SocStats(request.clone())).await?;
        Ok(DataResponse { data: self.soc_stats.clone() })
    }

    async fn fetch_detailed_stats(
        &self,
        request: &TimestampRangeRequest,
    ) -> Result<DataResponse<DetailedStatsDatum>> {
        self.record(Call::DetailedStats(request.clone())).await?;
        Ok(DataResponse { data: self.detailed_stats.clone() })
    }

    async fn fetch_temporal_bounds(&self) -> Result<TemporalBounds> {
        self.record(Call::TemporalBounds).await?;
        self.temporal_bounds.clone().context("no temporal bounds")
    }
}

pub fn detailed_history_datum(timestamp: &str, soc: f64) -> DetailedHistoryDatum {
    DetailedHistoryDatum {
        plant: "home".into(),
        granularity: Granularity::Detailed,
        timestamp: timestamp.into(),
        production: 1.5,
        consumption: 0.5,
        grid: -1.0,
        grid_draw: 0.0,
        grid_feed: 1.0,
        battery: 0.0,
        battery_charge: 0.0,
        battery_discharge: 0.0,
        soc,
    }
}

pub fn history_datum(date: &str, granularity: Granularity) -> HistoryDatum {
    HistoryDatum {
        plant: "home".into(),
        date: date.into(),
        granularity,
        production: 20.0,
        consumption: 10.0,
        grid_feed: 12.0,
        grid_draw: 2.0,
        battery_discharge: 3.0,
        battery_charge: 3.5,
        self_sufficiency: 0.8,
    }
}

pub fn soc_stats_datum(time: &str, min: f64, max: f64, avg: f64, std_dev: f64) -> SocStatsDatum {
    SocStatsDatum {
        time: time.into(),
        min,
        max,
        avg,
        median: avg,
        variance: std_dev * std_dev,
        std_dev,
    }
}

pub fn detailed_stats_datum(time: &str) -> DetailedStatsDatum {
    DetailedStatsDatum {
        time: time.into(),
        min_production: 0.0,
        max_production: 4.0,
        avg_production: 2.0,
        median_production: 2.0,
        std_dev_production: 1.0,
        min_consumption: 0.2,
        max_consumption: 2.0,
        avg_consumption: 0.5,
        median_consumption: 0.5,
        std_dev_consumption: 0.5,
        min_grid: -3.0,
        max_grid: 1.0,
        avg_grid: -1.0,
        median_grid: -1.0,
        std_dev_grid: 0.5,
        min_battery: -1.0,
        max_battery: 1.0,
        avg_battery: 0.0,
        median_battery: 0.0,
        std_dev_battery: 0.25,
        min_soc: 0.2,
        max_soc: 0.9,
        avg_soc: 0.5,
        median_soc: 0.5,
        std_dev_soc: 0.4,
    }
}
