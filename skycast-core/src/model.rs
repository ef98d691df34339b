use serde::{Deserialize, Serialize};

/// Weather condition as reported by the upstream API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub description: String,
    pub icon: String,
    pub code: i64,
}

/// One point-in-time observation. Deserialized straight from the upstream
/// JSON and re-serialized unchanged into the session cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub temp: f64,
    /// Wind speed in m/s as delivered upstream; see [`wind_kph`] for display.
    pub wind_spd: f64,
    pub wind_cdir: String,
    /// Relative humidity, percent.
    pub rh: f64,
    pub uv: f64,
    /// Pressure, millibars.
    pub pres: f64,
    #[serde(default)]
    pub dewpt: f64,
    pub weather: Condition,
}

/// One day of the daily forecast: a snapshot plus the date key and the
/// day's temperature range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    /// Date key in `YYYY-MM-DD` form; identity of the day for selection.
    pub datetime: String,
    pub high_temp: f64,
    pub low_temp: f64,
    #[serde(flatten)]
    pub snapshot: WeatherSnapshot,
}

/// Aggregate weather for one city: current conditions plus the chronological
/// daily forecast (index 0 is today). City identity is case-insensitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityWeatherBundle {
    pub city_name: String,
    pub country_code: String,
    pub current: WeatherSnapshot,
    pub forecast: Vec<ForecastDay>,
}

/// One row of the recently-searched list: the city plus a snapshot of its
/// weather at search time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentSearchRecord {
    pub city: String,
    pub temp: i64,
    pub description: String,
    pub icon: String,
    pub timestamp: i64,
}

/// Background theme keyed to a weather description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkyTheme {
    ClearSky,
    BrokenClouds,
    LightRain,
    Snow,
    Dramatic,
    Default,
}

impl SkyTheme {
    /// Classify a free-form weather description by substring match.
    pub fn from_description(description: &str) -> Self {
        let desc = description.to_lowercase();
        if desc.contains("clear") {
            SkyTheme::ClearSky
        } else if desc.contains("broken") {
            SkyTheme::BrokenClouds
        } else if desc.contains("rain") {
            SkyTheme::LightRain
        } else if desc.contains("snow") {
            SkyTheme::Snow
        } else if desc.contains("storm")
            || desc.contains("thunder")
            || desc.contains("lightning")
            || desc.contains("overcast")
        {
            SkyTheme::Dramatic
        } else {
            SkyTheme::Default
        }
    }
}

/// Resolve a condition icon code to its hosted image URL.
pub fn icon_url(icon_code: &str) -> String {
    format!("https://cdn.weatherbit.io/static/img/icons/{icon_code}.png")
}

/// Wind speed for display, m/s converted to km/h and rounded.
pub fn wind_kph(wind_mps: f64) -> i64 {
    (wind_mps * 3.6).round() as i64
}

/// Coarse wind strength label for the sidebar subtitle.
pub fn wind_label(wind_mps: f64) -> &'static str {
    if wind_mps < 5.0 { "Light" } else { "Moderate" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forecast_day_deserializes_flattened_snapshot() {
        let json = r#"{
            "datetime": "2024-01-21",
            "high_temp": 23.4,
            "low_temp": 12.1,
            "temp": 18.0,
            "wind_spd": 4.2,
            "wind_cdir": "NW",
            "rh": 61.0,
            "uv": 5.0,
            "pres": 1013.0,
            "dewpt": 10.4,
            "weather": { "description": "Broken clouds", "icon": "c03d", "code": 803 }
        }"#;

        let day: ForecastDay = serde_json::from_str(json).expect("forecast day must parse");
        assert_eq!(day.datetime, "2024-01-21");
        assert_eq!(day.snapshot.weather.icon, "c03d");
        assert_eq!(day.high_temp, 23.4);
    }

    #[test]
    fn snapshot_tolerates_missing_dewpoint() {
        let json = r#"{
            "temp": 7.0,
            "wind_spd": 8.0,
            "wind_cdir": "S",
            "rh": 80.0,
            "uv": 1.0,
            "pres": 998.0,
            "weather": { "description": "Snow", "icon": "s02d", "code": 601 }
        }"#;

        let snap: WeatherSnapshot = serde_json::from_str(json).expect("snapshot must parse");
        assert_eq!(snap.dewpt, 0.0);
    }

    #[test]
    fn theme_classification_covers_description_families() {
        assert_eq!(SkyTheme::from_description("Clear sky"), SkyTheme::ClearSky);
        assert_eq!(SkyTheme::from_description("Broken clouds"), SkyTheme::BrokenClouds);
        assert_eq!(SkyTheme::from_description("Light rain"), SkyTheme::LightRain);
        assert_eq!(SkyTheme::from_description("Heavy snow"), SkyTheme::Snow);
        assert_eq!(SkyTheme::from_description("Thunderstorm"), SkyTheme::Dramatic);
        assert_eq!(SkyTheme::from_description("Overcast clouds"), SkyTheme::Dramatic);
        assert_eq!(SkyTheme::from_description("Haze"), SkyTheme::Default);
    }

    #[test]
    fn icon_url_interpolates_code() {
        assert_eq!(
            icon_url("c01d"),
            "https://cdn.weatherbit.io/static/img/icons/c01d.png"
        );
    }

    #[test]
    fn wind_helpers() {
        assert_eq!(wind_kph(4.2), 15);
        assert_eq!(wind_label(4.9), "Light");
        assert_eq!(wind_label(5.0), "Moderate");
    }
}
