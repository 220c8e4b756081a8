use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::{
    band::{Band, Statistics},
    date_range::FormattedRange,
};

/// Temporal resolution of a series.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// 5-minute resolution.
    Detailed,
    Daily,
    Monthly,
    Yearly,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimestampRangeRequest {
    pub start_timestamp: String,
    pub end_timestamp: String,
}

impl From<FormattedRange> for TimestampRangeRequest {
    fn from(range: FormattedRange) -> Self {
        Self { start_timestamp: range.start, end_timestamp: range.end }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRequest {
    pub granularity: Granularity,
    pub start_date: String,
    pub end_date: String,
}

impl HistoryRequest {
    pub fn new(granularity: Granularity, range: FormattedRange) -> Self {
        Self { granularity, start_date: range.start, end_date: range.end }
    }
}

#[must_use]
#[derive(Deserialize, derive_more::IntoIterator)]
pub struct DataResponse<T> {
    pub data: Vec<T>,
}

#[must_use]
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedHistoryDatum {
    pub plant: String,
    pub granularity: Granularity,

    /// Local timestamp, ordered lexicographically.
    pub timestamp: String,

    pub production: f64,
    pub consumption: f64,
    pub grid: f64,
    pub grid_draw: f64,
    pub grid_feed: f64,
    pub battery: f64,
    pub battery_charge: f64,
    pub battery_discharge: f64,

    /// State of charge, `0..=1`.
    pub soc: f64,
}

#[must_use]
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryDatum {
    pub plant: String,
    pub date: String,
    pub granularity: Granularity,
    pub production: f64,
    pub consumption: f64,
    pub grid_feed: f64,
    pub grid_draw: f64,
    pub battery_discharge: f64,
    pub battery_charge: f64,
    pub self_sufficiency: f64,
}

#[must_use]
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocStatsDatum {
    pub time: String,
    pub min: f64,
    pub max: f64,
    pub avg: f64,
    pub median: f64,
    pub variance: f64,
    pub std_dev: f64,
}

impl SocStatsDatum {
    pub const fn statistics(&self) -> Statistics {
        Statistics {
            min: self.min,
            max: self.max,
            avg: self.avg,
            median: self.median,
            std_dev: self.std_dev,
        }
    }
}

/// SOC statistics with the spread band derived at write time.
#[must_use]
#[derive(Clone, Debug, PartialEq, derive_more::Deref)]
pub struct BandedSocStats {
    #[deref]
    pub stats: SocStatsDatum,
    pub std_dev_range: Band,
}

impl From<SocStatsDatum> for BandedSocStats {
    fn from(stats: SocStatsDatum) -> Self {
        let std_dev_range = stats.statistics().band();
        Self { stats, std_dev_range }
    }
}

/// Measured channel in the detailed statistics.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Channel {
    Production,
    Consumption,
    Grid,
    Battery,
    Soc,
}

impl Channel {
    pub const ALL: [Self; 5] =
        [Self::Production, Self::Consumption, Self::Grid, Self::Battery, Self::Soc];
}

#[must_use]
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedStatsDatum {
    /// Time of day of the bucket.
    pub time: String,

    pub min_production: f64,
    pub max_production: f64,
    pub avg_production: f64,
    pub median_production: f64,
    pub std_dev_production: f64,

    pub min_consumption: f64,
    pub max_consumption: f64,
    pub avg_consumption: f64,
    pub median_consumption: f64,
    pub std_dev_consumption: f64,

    pub min_grid: f64,
    pub max_grid: f64,
    pub avg_grid: f64,
    pub median_grid: f64,
    pub std_dev_grid: f64,

    pub min_battery: f64,
    pub max_battery: f64,
    pub avg_battery: f64,
    pub median_battery: f64,
    pub std_dev_battery: f64,

    pub min_soc: f64,
    pub max_soc: f64,
    pub avg_soc: f64,
    pub median_soc: f64,
    pub std_dev_soc: f64,
}

impl DetailedStatsDatum {
    pub const fn channel(&self, channel: Channel) -> Statistics {
        let (min, max, avg, median, std_dev) = match channel {
            Channel::Production => (
                self.min_production,
                self.max_production,
                self.avg_production,
                self.median_production,
                self.std_dev_production,
            ),
            Channel::Consumption => (
                self.min_consumption,
                self.max_consumption,
                self.avg_consumption,
                self.median_consumption,
                self.std_dev_consumption,
            ),
            Channel::Grid => {
                (self.min_grid, self.max_grid, self.avg_grid, self.median_grid, self.std_dev_grid)
            }
            Channel::Battery => (
                self.min_battery,
                self.max_battery,
                self.avg_battery,
                self.median_battery,
                self.std_dev_battery,
            ),
            Channel::Soc => {
                (self.min_soc, self.max_soc, self.avg_soc, self.median_soc, self.std_dev_soc)
            }
        };
        Statistics { min, max, avg, median, std_dev }
    }

    /// Spread band of the channel, derived on read.
    pub const fn band(&self, channel: Channel) -> Band {
        self.channel(channel).band()
    }
}

/// First and last timestamps for which the service has data.
pub type Bound = (String, String);

#[must_use]
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct TemporalBounds {
    #[serde(default)]
    pub detailed: Option<Bound>,

    #[serde(default)]
    pub daily: Option<Bound>,

    #[serde(default)]
    pub monthly: Option<Bound>,

    #[serde(default)]
    pub yearly: Option<Bound>,
}

impl TemporalBounds {
    /// Last date of the daily series.
    ///
    /// Accepts both plain dates and ISO timestamps.
    pub fn daily_upper(&self) -> Option<NaiveDate> {
        let (_, upper) = self.daily.as_ref()?;
        NaiveDate::parse_from_str(upper.get(..10)?, "%Y-%m-%d").ok()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::prelude::*;

    #[test]
    fn serialize_timestamp_range_request_ok() -> Result {
        let request = TimestampRangeRequest {
            start_timestamp: "2024-05-01T00:00".into(),
            end_timestamp: "2024-05-01T23:59".into(),
        };
        assert_eq!(
            serde_json::to_string(&request)?,
            r#"{"startTimestamp":"2024-05-01T00:00","endTimestamp":"2024-05-01T23:59"}"#,
        );
        Ok(())
    }

    #[test]
    fn serialize_history_request_ok() -> Result {
        let request = HistoryRequest {
            granularity: Granularity::Monthly,
            start_date: "2024-01-01".into(),
            end_date: "2024-12-31".into(),
        };
        assert_eq!(
            serde_json::to_string(&request)?,
            r#"{"granularity":"monthly","startDate":"2024-01-01","endDate":"2024-12-31"}"#,
        );
        Ok(())
    }

    #[test]
    fn deserialize_detailed_history_ok() -> Result {
        // language=JSON
        const RESPONSE: &str = r#"
            {
                "data": [
                    {
                        "plant": "home",
                        "granularity": "detailed",
                        "timestamp": "2024-05-01T12:05",
                        "production": 3.2,
                        "consumption": 0.8,
                        "grid": -1.4,
                        "gridDraw": 0.0,
                        "gridFeed": 1.4,
                        "battery": -1.0,
                        "batteryCharge": 1.0,
                        "batteryDischarge": 0.0,
                        "soc": 0.64
                    }
                ]
            }
        "#;
        let response = serde_json::from_str::<DataResponse<DetailedHistoryDatum>>(RESPONSE)?;
        let datum = response.into_iter().next().unwrap();
        assert_eq!(datum.granularity, Granularity::Detailed);
        assert_eq!(datum.timestamp, "2024-05-01T12:05");
        assert_abs_diff_eq!(datum.grid_feed, 1.4);
        assert_abs_diff_eq!(datum.soc, 0.64);
        Ok(())
    }

    #[test]
    fn deserialize_history_ok() -> Result {
        // language=JSON
        const RESPONSE: &str = r#"
            {
                "data": [
                    {
                        "plant": "home",
                        "date": "2024-05-01",
                        "granularity": "daily",
                        "production": 24.5,
                        "consumption": 11.25,
                        "gridFeed": 14.0,
                        "gridDraw": 0.75,
                        "batteryDischarge": 4.5,
                        "batteryCharge": 5.0,
                        "selfSufficiency": 0.93
                    }
                ]
            }
        "#;
        let response = serde_json::from_str::<DataResponse<HistoryDatum>>(RESPONSE)?;
        assert_eq!(response.data.len(), 1);
        assert_eq!(response.data[0].granularity, Granularity::Daily);
        assert_abs_diff_eq!(response.data[0].self_sufficiency, 0.93);
        Ok(())
    }

    #[test]
    fn banded_soc_stats_ok() -> Result {
        // language=JSON
        const RESPONSE: &str = r#"
            {
                "time": "12:00",
                "min": 0.2,
                "max": 0.9,
                "avg": 0.5,
                "median": 0.55,
                "variance": 0.16,
                "stdDev": 0.4
            }
        "#;
        let stats = BandedSocStats::from(serde_json::from_str::<SocStatsDatum>(RESPONSE)?);
        assert_eq!(stats.time, "12:00");
        assert_abs_diff_eq!(stats.std_dev_range.lower, 0.2);
        assert_abs_diff_eq!(stats.std_dev_range.upper, 0.9);
        Ok(())
    }

    #[test]
    fn detailed_stats_channels_ok() -> Result {
        // language=JSON
        const RESPONSE: &str = r#"
            {
                "time": "12:00",
                "minProduction": 0.0, "maxProduction": 4.0, "avgProduction": 2.0,
                "medianProduction": 2.1, "stdDevProduction": 1.0,
                "minConsumption": 0.1, "maxConsumption": 2.0, "avgConsumption": 0.5,
                "medianConsumption": 0.4, "stdDevConsumption": 0.5,
                "minGrid": -3.0, "maxGrid": 1.0, "avgGrid": -1.0,
                "medianGrid": -1.2, "stdDevGrid": 0.5,
                "minBattery": -1.0, "maxBattery": 1.0, "avgBattery": 0.0,
                "medianBattery": 0.0, "stdDevBattery": 2.0,
                "minSoc": 0.1, "maxSoc": 1.0, "avgSoc": 0.6,
                "medianSoc": 0.65, "stdDevSoc": 0.1
            }
        "#;
        let datum = serde_json::from_str::<DetailedStatsDatum>(RESPONSE)?;

        let production = datum.band(Channel::Production);
        assert_abs_diff_eq!(production.lower, 1.0);
        assert_abs_diff_eq!(production.upper, 3.0);

        let consumption = datum.band(Channel::Consumption);
        assert_abs_diff_eq!(consumption.lower, 0.1);
        assert_abs_diff_eq!(consumption.upper, 1.0);

        let battery = datum.band(Channel::Battery);
        assert_abs_diff_eq!(battery.lower, -1.0);
        assert_abs_diff_eq!(battery.upper, 1.0);

        assert_abs_diff_eq!(datum.channel(Channel::Soc).median, 0.65);
        Ok(())
    }

    #[test]
    fn deserialize_temporal_bounds_ok() -> Result {
        // language=JSON
        const RESPONSE: &str = r#"
            {
                "detailed": ["2023-06-01T00:00", "2024-05-01T23:55"],
                "daily": ["2023-06-01", "2024-05-01"],
                "monthly": ["2023-06", "2024-05"],
                "yearly": ["2023", "2024"]
            }
        "#;
        let bounds = serde_json::from_str::<TemporalBounds>(RESPONSE)?;
        assert_eq!(bounds.yearly, Some(("2023".into(), "2024".into())));
        assert_eq!(bounds.daily_upper(), NaiveDate::from_ymd_opt(2024, 5, 1));
        Ok(())
    }

    #[test]
    fn daily_upper_accepts_timestamps() {
        let bounds = TemporalBounds {
            daily: Some(("2023-06-01T00:00:00".into(), "2024-05-01T00:00:00".into())),
            ..TemporalBounds::default()
        };
        assert_eq!(bounds.daily_upper(), NaiveDate::from_ymd_opt(2024, 5, 1));
    }

    #[test]
    fn daily_upper_missing() {
        assert_eq!(TemporalBounds::default().daily_upper(), None);
        let bounds = TemporalBounds { daily: Some(("".into(), "n/a".into())), ..Default::default() };
        assert_eq!(bounds.daily_upper(), None);
    }
}
