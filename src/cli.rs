use std::time::Duration;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use reqwest::Url;

use crate::{
    api::{HistoryService, history::models::Granularity},
    pages::day::DayPage,
    prelude::*,
};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    #[clap(flatten)]
    pub api: ApiArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Detailed history, state-of-charge statistics, and the history overview.
    #[clap(name = "dashboard")]
    Dashboard(DashboardArgs),

    /// All-time detailed and state-of-charge statistics.
    #[clap(name = "all-time")]
    AllTime,

    /// Detailed history and state-of-charge statistics of a single day.
    #[clap(name = "day")]
    Day(DayArgs),

    /// Page through days interactively: type a date, `+N` or `-N`, or `q` to quit.
    #[clap(name = "browse")]
    Browse(BrowseArgs),

    /// First and last dates with data, per granularity.
    #[clap(name = "bounds")]
    Bounds,
}

#[derive(Parser)]
pub struct ApiArgs {
    /// History service base URL.
    #[clap(
        long = "api-base-url",
        env = "SUNBOARD_API_BASE_URL",
        default_value = "http://localhost:11111"
    )]
    pub base_url: Url,
}

impl ApiArgs {
    pub fn new_client(&self) -> Result<HistoryService> {
        HistoryService::try_new(self.base_url.clone())
    }
}

#[derive(Parser)]
pub struct DashboardArgs {
    /// Day of the detailed history and the state-of-charge statistics. Defaults to today.
    #[clap(long)]
    pub date: Option<NaiveDate>,

    /// Start of the history overview. Defaults to today.
    #[clap(long = "history-since")]
    pub history_since: Option<NaiveDate>,

    /// End of the history overview, inclusive. Defaults to 30 days from today.
    #[clap(long = "history-until")]
    pub history_until: Option<NaiveDate>,

    #[clap(long, value_enum, default_value = "daily", env = "SUNBOARD_GRANULARITY")]
    pub granularity: Granularity,
}

#[derive(Parser)]
pub struct DayArgs {
    /// Defaults to the last day with data.
    #[clap(long)]
    pub date: Option<NaiveDate>,
}

#[derive(Parser)]
pub struct BrowseArgs {
    /// Initial day. Defaults to the last day with data.
    #[clap(long)]
    pub date: Option<NaiveDate>,

    /// Quiet period after the last date change before the day gets fetched.
    #[clap(long = "debounce-millis", env = "SUNBOARD_DEBOUNCE_MILLIS")]
    pub debounce_millis: Option<u64>,
}

impl BrowseArgs {
    pub fn debounce(&self) -> Duration {
        self.debounce_millis.map_or(DayPage::DEBOUNCE, Duration::from_millis)
    }
}
