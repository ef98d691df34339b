//! Terminal rendering of the dashboard: headliner, sidebar summary,
//! forecast tiles, recent searches. Layout only; all weather state comes
//! from the coordinator.

use chrono::{Local, NaiveDate};
use skycast_core::model::{icon_url, wind_kph, wind_label};
use skycast_core::{Coordinator, FetchError, ForecastDay, SkyTheme};

pub fn dashboard(coord: &Coordinator) {
    let Some(bundle) = coord.bundle() else {
        println!("No weather loaded yet. Search for a city to get started.");
        return;
    };
    let Some(displayed) = coord.displayed_weather() else {
        return;
    };

    let theme = SkyTheme::from_description(&displayed.snapshot.weather.description);

    println!();
    println!(
        "{} {}, {}  ({})",
        theme_glyph(theme),
        bundle.city_name,
        bundle.country_code,
        headline_date(displayed.datetime),
    );
    println!();

    let snap = displayed.snapshot;
    println!(
        "  {}°  {}   H {}°  L {}°",
        snap.temp.round(),
        snap.weather.description,
        displayed.high_temp.round(),
        displayed.low_temp.round(),
    );
    println!(
        "  Wind      {} km/h  {} • from {}",
        wind_kph(snap.wind_spd),
        wind_label(snap.wind_spd),
        snap.wind_cdir.to_lowercase(),
    );
    println!(
        "  Humidity  {}%  dew point {}°",
        snap.rh.round(),
        snap.dewpt.round(),
    );
    println!("  UV index  {}", snap.uv.round());
    println!("  Pressure  {} mb", snap.pres.round());
    println!("  Icon      {}", icon_url(&snap.weather.icon));
    println!();

    if !bundle.forecast.is_empty() {
        println!("  Upcoming forecast:");
        for day in bundle.forecast.iter().take(7) {
            let marker = if coord.selected_day() == Some(day.datetime.as_str()) {
                ">"
            } else {
                " "
            };
            println!(
                "  {marker} {}  {:>3}°  {}",
                weekday(&day.datetime),
                day.snapshot.temp.round(),
                day.snapshot.weather.description,
            );
        }
        println!();
    }

    let visible = coord.visible_recent_searches();
    if !visible.is_empty() {
        println!("  Recently searched:");
        for record in visible {
            println!("    {}  {}°  {}", record.city, record.temp, record.description);
        }
        let hidden = coord.recent_searches().len() - visible.len();
        if hidden > 0 {
            println!("    … see all ({hidden} more)");
        }
        println!();
    }
}

pub fn fetch_error(err: &FetchError) {
    eprintln!("! Search failed: {err}");
}

/// Option label for the day picker; the date key stays the first token so
/// the selection can be mapped back.
pub fn day_option(day: &ForecastDay, selected: Option<&str>) -> String {
    let marker = if selected == Some(day.datetime.as_str()) {
        " (selected)"
    } else {
        ""
    };
    format!(
        "{} {}  {}°/{}°  {}{marker}",
        day.datetime,
        weekday(&day.datetime),
        day.high_temp.round(),
        day.low_temp.round(),
        day.snapshot.weather.description,
    )
}

fn headline_date(selected: Option<&str>) -> String {
    match selected.and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()) {
        Some(date) => date.format("%A, %d %B %Y").to_string(),
        None => Local::now().format("%A, %d %B %Y").to_string(),
    }
}

fn weekday(datetime: &str) -> String {
    NaiveDate::parse_from_str(datetime, "%Y-%m-%d")
        .map(|date| date.format("%a").to_string())
        .unwrap_or_else(|_| datetime.to_string())
}

fn theme_glyph(theme: SkyTheme) -> &'static str {
    match theme {
        SkyTheme::ClearSky => "☀",
        SkyTheme::BrokenClouds => "⛅",
        SkyTheme::LightRain => "🌧",
        SkyTheme::Snow => "❄",
        SkyTheme::Dramatic => "⛈",
        SkyTheme::Default => "🌍",
    }
}
