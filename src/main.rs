mod api;
mod browse;
mod cli;
mod core;
mod pages;
mod prelude;
mod store;
mod tables;

use std::sync::Arc;

use chrono::{DateTime, Local};
use clap::{Parser, crate_version};

use crate::{
    api::HistoryApi,
    cli::{Args, Command, DashboardArgs, DayArgs},
    pages::{all_time, dashboard, day::DayPage, temporal_bounds},
    prelude::*,
    store::{RequestMeta, Store, settle},
    tables::{
        build_bounds_table,
        build_detailed_history_table,
        build_detailed_stats_table,
        build_history_table,
        build_soc_stats_table,
        format_status,
    },
};

#[tokio::main]
async fn main() -> Result {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().without_time().compact().init();
    info!(version = crate_version!(), "starting…");

    let args = Args::parse();
    let api: Arc<dyn HistoryApi> = Arc::new(args.api.new_client()?);
    let store = Store::new(Local::now());

    match args.command {
        Command::Dashboard(args) => show_dashboard(&store, api.as_ref(), &args).await,
        Command::AllTime => show_all_time(&store, api.as_ref()).await,
        Command::Day(args) => show_day(&store, api, &args).await,
        Command::Browse(args) => browse::browse(&store, api, &args).await?,
        Command::Bounds => show_bounds(&store, api.as_ref()).await,
    }

    info!("done!");
    Ok(())
}

fn print_range(title: &str, (start, end): (DateTime<Local>, DateTime<Local>)) {
    println!("{title}: {} – {}", start.format("%Y-%m-%d"), end.format("%Y-%m-%d"));
}

fn print_status(page: &str, meta: &RequestMeta) {
    let status = format_status(&meta.status);
    println!("{status}");
    info!(page, %status, "fetched");
}

/// Every widget gets fetched, a failing one is shown stale.
#[instrument(skip_all)]
async fn show_dashboard(store: &Store, api: &dyn HistoryApi, args: &DashboardArgs) {
    let slice = &store.dashboard;

    if let Some(date) = args.date {
        settle(dashboard::set_detailed_history_start_date(slice, api, date).await);
        settle(dashboard::set_soc_stats_start_date(slice, api, date).await);
    } else {
        settle(dashboard::fetch_detailed_history(slice, api).await);
        settle(dashboard::fetch_soc_stats(slice, api).await);
    }

    slice.update(|state| {
        if let Some(since) = args.history_since {
            state.history.range = state.history.range.with_start_of(since);
        }
        if let Some(until) = args.history_until {
            state.history.range = state.history.range.with_end_of(until);
        }
    });
    settle(dashboard::set_history_granularity(slice, api, args.granularity).await);

    let state = slice.snapshot();
    print_range("Detailed history", state.detailed_history_range());
    println!("{}", build_detailed_history_table(&state.detailed_history.fetched.data));
    print_range("State of charge", state.soc_stats_range());
    println!("{}", build_soc_stats_table(&state.soc_stats.fetched.data));
    print_range("History", state.history_range());
    println!("{}", build_history_table(&state.history.fetched.data));
    print_status("dashboard", &state.meta);
}

#[instrument(skip_all)]
async fn show_all_time(store: &Store, api: &dyn HistoryApi) {
    settle(all_time::fetch_data(&store.all_time, api).await);
    settle(all_time::fetch_soc_stats(&store.all_time, api).await);

    let state = store.all_time.snapshot();
    println!("{}", build_detailed_stats_table(&state.detailed_stats.data));
    let soc_stats: Vec<_> = state.soc_stats.data.into_iter().map(Into::into).collect();
    println!("{}", build_soc_stats_table(&soc_stats));
    print_status("all-time", &state.meta);
}

#[instrument(skip_all)]
async fn show_day(store: &Store, api: Arc<dyn HistoryApi>, args: &DayArgs) {
    if let Some(date) = args.date {
        store.day.update(|state| state.date = Some(date));
    }
    DayPage::builder()
        .slice(Arc::clone(&store.day))
        .bounds(Arc::clone(&store.temporal_bounds))
        .api(api)
        .build()
        .open()
        .await;

    let state = store.day.snapshot();
    if let Some(date) = state.date {
        println!("{date}");
    }
    println!("{}", build_detailed_history_table(&state.detailed_history.data));
    println!("{}", build_soc_stats_table(&state.soc_stats.data));
    print_status("day", &state.meta);
}

#[instrument(skip_all)]
async fn show_bounds(store: &Store, api: &dyn HistoryApi) {
    settle(temporal_bounds::fetch_bounds(&store.temporal_bounds, api).await);

    let state = store.temporal_bounds.snapshot();
    println!("{}", build_bounds_table(&state.bounds.data.unwrap_or_default()));
    print_status("bounds", &state.meta);
}
