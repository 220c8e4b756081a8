use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};

use crate::{
    api::history::models::{
        BandedSocStats,
        Channel,
        DetailedHistoryDatum,
        DetailedStatsDatum,
        HistoryDatum,
        TemporalBounds,
    },
    core::band::Band,
    store::FetchStatus,
};

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .apply_modifier(modifiers::UTF8_ROUND_CORNERS)
        .enforce_styling();
    table
}

fn kilowatts(value: f64) -> Cell {
    Cell::new(format!("{value:.3} kW")).set_alignment(CellAlignment::Right)
}

fn kilowatt_hours(value: f64) -> Cell {
    Cell::new(format!("{value:.2} kWh")).set_alignment(CellAlignment::Right)
}

fn percent(value: f64) -> Cell {
    Cell::new(format!("{:.1}%", value * 100.0)).set_alignment(CellAlignment::Right)
}

fn percent_band(band: Band) -> Cell {
    Cell::new(format!("{:.1}%…{:.1}%", band.lower * 100.0, band.upper * 100.0))
        .set_alignment(CellAlignment::Right)
        .add_attribute(Attribute::Dim)
}

/// Drawing from the grid is red, feeding into it is green.
fn grid(value: f64) -> Cell {
    kilowatts(value).fg(if value > 0.0 {
        Color::Red
    } else if value < 0.0 {
        Color::Green
    } else {
        Color::Reset
    })
}

fn soc(value: f64) -> Cell {
    percent(value).fg(if value < 0.2 {
        Color::Red
    } else if value < 0.5 {
        Color::DarkYellow
    } else {
        Color::Green
    })
}

pub fn build_detailed_history_table(data: &[DetailedHistoryDatum]) -> Table {
    let mut table = new_table();
    table.set_header(vec![
        "Timestamp",
        "Production",
        "Consumption",
        "Grid",
        "Battery",
        "Charge",
        "Discharge",
        "SoC",
    ]);
    for datum in data {
        table.add_row(vec![
            Cell::new(&datum.timestamp).add_attribute(Attribute::Dim),
            kilowatts(datum.production).fg(Color::Yellow),
            kilowatts(datum.consumption),
            grid(datum.grid),
            kilowatts(datum.battery),
            kilowatts(datum.battery_charge),
            kilowatts(datum.battery_discharge),
            soc(datum.soc),
        ]);
    }
    table
}

pub fn build_history_table(data: &[HistoryDatum]) -> Table {
    let mut table = new_table();
    table.set_header(vec![
        "Date",
        "Production",
        "Consumption",
        "Feed",
        "Draw",
        "Charge",
        "Discharge",
        "Self-sufficiency",
    ]);
    for datum in data {
        table.add_row(vec![
            Cell::new(&datum.date),
            kilowatt_hours(datum.production).fg(Color::Yellow),
            kilowatt_hours(datum.consumption),
            kilowatt_hours(datum.grid_feed).fg(Color::Green),
            kilowatt_hours(datum.grid_draw).fg(Color::Red),
            kilowatt_hours(datum.battery_charge),
            kilowatt_hours(datum.battery_discharge),
            percent(datum.self_sufficiency),
        ]);
    }
    table
}

pub fn build_soc_stats_table(data: &[BandedSocStats]) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Time", "Min", "Avg.", "Median", "Max", "Spread"]);
    for stats in data {
        table.add_row(vec![
            Cell::new(&stats.time).add_attribute(Attribute::Dim),
            percent(stats.min).fg(Color::Red),
            soc(stats.avg).add_attribute(Attribute::Bold),
            percent(stats.median),
            percent(stats.max).fg(Color::Blue),
            percent_band(stats.std_dev_range),
        ]);
    }
    table
}

pub fn build_detailed_stats_table(data: &[DetailedStatsDatum]) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Time", "Production", "Consumption", "Grid", "Battery", "SoC", "Spread"]);
    for datum in data {
        let mut row = vec![Cell::new(&datum.time).add_attribute(Attribute::Dim)];
        for channel in Channel::ALL {
            let statistics = datum.channel(channel);
            row.push(match channel {
                Channel::Soc => soc(statistics.avg),
                Channel::Grid => grid(statistics.avg),
                Channel::Production | Channel::Consumption | Channel::Battery => {
                    let band = statistics.band();
                    Cell::new(format!(
                        "{:.3} ({:.3}…{:.3}) kW",
                        statistics.avg, band.lower, band.upper,
                    ))
                    .set_alignment(CellAlignment::Right)
                }
            });
        }
        row.push(percent_band(datum.band(Channel::Soc)));
        table.add_row(row);
    }
    table
}

pub fn build_bounds_table(bounds: &TemporalBounds) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Granularity", "Since", "Until"]);
    for (name, bound) in [
        ("detailed", &bounds.detailed),
        ("daily", &bounds.daily),
        ("monthly", &bounds.monthly),
        ("yearly", &bounds.yearly),
    ] {
        let (since, until) =
            bound.as_ref().map_or(("–", "–"), |(since, until)| (since.as_str(), until.as_str()));
        table.add_row(vec![Cell::new(name), Cell::new(since), Cell::new(until)]);
    }
    table
}

/// One-line status for the footer of a page.
pub fn format_status(status: &FetchStatus) -> String {
    match status {
        FetchStatus::Idle => "no data yet".to_owned(),
        FetchStatus::Loaded => "up to date".to_owned(),
        FetchStatus::Failed(error) => format!("showing stale data: {error}"),
    }
}
