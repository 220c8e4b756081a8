//! Interactive day paging on top of [`DayPage`].

use std::{str::FromStr, sync::Arc};

use chrono::NaiveDate;
use tokio::{
    io::{AsyncBufReadExt, BufReader, stdin},
    sync::watch,
    time::sleep,
};

use crate::{
    api::{HistoryApi, history::models::DetailedHistoryDatum},
    cli::BrowseArgs,
    core::debounce::Debouncer,
    pages::day::{DayPage, DayState},
    prelude::*,
    store::{FetchStatus, Fetched, Store},
    tables::{build_detailed_history_table, format_status},
};

/// One line of user input.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Input {
    Date(NaiveDate),
    Shift(i64),
    Quit,
}

impl FromStr for Input {
    type Err = Error;

    fn from_str(line: &str) -> Result<Self> {
        let line = line.trim();
        match line {
            "q" | "quit" => Ok(Self::Quit),
            "n" | "next" => Ok(Self::Shift(1)),
            "p" | "prev" | "previous" => Ok(Self::Shift(-1)),
            _ if line.starts_with(['+', '-']) => {
                Ok(Self::Shift(line.parse().with_context(|| format!("invalid offset: `{line}`"))?))
            }
            _ => Ok(Self::Date(line.parse().with_context(|| format!("invalid date: `{line}`"))?)),
        }
    }
}

pub async fn browse(store: &Store, api: Arc<dyn HistoryApi>, args: &BrowseArgs) -> Result {
    let debounce = args.debounce();
    let page = DayPage::builder()
        .slice(Arc::clone(&store.day))
        .bounds(Arc::clone(&store.temporal_bounds))
        .api(api)
        .debouncer(Debouncer::new(debounce))
        .build();
    let renderer = tokio::spawn(render_on_completion(store.day.subscribe()));

    match args.date {
        Some(date) => page.set_date(date),
        None => page.open().await,
    }

    let mut lines = BufReader::new(stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        if !handle_line(&page, &line) {
            break;
        }
    }

    // Let the last debounced fetch go out and complete.
    sleep(debounce * 2).await;
    store.day.subscribe().wait_for(|state| !state.meta.pending.is_pending()).await?;
    renderer.abort();
    Ok(())
}

/// Apply one input line, returning `false` once the user quits.
///
/// Invalid input is reported and the session goes on.
fn handle_line(page: &DayPage, line: &str) -> bool {
    match line.parse::<Input>() {
        Ok(Input::Date(date)) => page.set_date(date),
        Ok(Input::Shift(n_days)) => {
            if let Err(error) = page.shift_date(n_days) {
                warn!("{error:#}");
            }
        }
        Ok(Input::Quit) => return false,
        Err(error) => warn!("{error:#}"),
    }
    true
}

/// Print the day whenever a settled state differs from the one printed last.
async fn render_on_completion(mut receiver: watch::Receiver<DayState>) {
    let mut rendered: (Fetched<Vec<DetailedHistoryDatum>>, FetchStatus) = {
        let initial = receiver.borrow_and_update();
        (initial.detailed_history.clone(), initial.meta.status.clone())
    };
    while receiver.changed().await.is_ok() {
        let state = receiver.borrow_and_update().clone();
        if state.meta.pending.is_pending() {
            continue;
        }
        let current = (state.detailed_history, state.meta.status);
        if rendered == current {
            continue;
        }
        if let Some(date) = state.date {
            println!("{date}");
        }
        println!("{}", build_detailed_history_table(&current.0.data));
        info!(status = format_status(&current.1), "rendered");
        rendered = current;
    }
}
