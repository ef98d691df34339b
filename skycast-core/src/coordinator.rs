use anyhow::Result;

use crate::config::Config;
use crate::fetcher::{FetchError, WeatherFetcher};
use crate::model::{CityWeatherBundle, RecentSearchRecord, WeatherSnapshot};
use crate::store::{RecentSearches, SessionCache};

/// Recent searches shown before the list is expanded.
pub const COLLAPSED_RECENTS: usize = 2;

/// How a call to [`Coordinator::fetch_data`] (or [`Coordinator::start`])
/// resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Fresh data was fetched and applied.
    Fetched,
    /// The requested city is already the current one; nothing happened.
    CacheHit,
    /// State was restored from the session cache without any network I/O.
    Hydrated,
    /// A newer fetch was issued while this one was in flight; the result
    /// was discarded.
    Superseded,
}

/// The weather to render right now: either the current conditions or, when a
/// forecast day is selected, that day's snapshot with its temperature range.
#[derive(Debug, Clone, Copy)]
pub struct DisplayedWeather<'a> {
    pub snapshot: &'a WeatherSnapshot,
    /// `Some` when a forecast day is selected, `None` for current conditions.
    pub datetime: Option<&'a str>,
    pub high_temp: f64,
    pub low_temp: f64,
}

/// Central mediator between the UI layer and the fetch/cache/recents stack.
/// Owns all weather-related state; UI code holds it by explicit reference and
/// mutates only through these operations. `&mut self` keeps mutation
/// single-writer, so overlapping fetches on one instance cannot interleave.
#[derive(Debug)]
pub struct Coordinator {
    fetcher: WeatherFetcher,
    cache: SessionCache,
    recents: RecentSearches,
    default_city: String,
    bundle: Option<CityWeatherBundle>,
    city: Option<String>,
    selected_day: Option<String>,
    show_all_recents: bool,
    fetch_seq: u64,
}

impl Coordinator {
    pub fn new(
        fetcher: WeatherFetcher,
        cache: SessionCache,
        recents: RecentSearches,
        default_city: String,
    ) -> Self {
        Self {
            fetcher,
            cache,
            recents,
            default_city,
            bundle: None,
            city: None,
            selected_day: None,
            show_all_recents: false,
            fetch_seq: 0,
        }
    }

    /// Build the whole stack from config: fetcher against the configured
    /// endpoints, stores under the platform store directory.
    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = config.require_api_key()?.to_string();
        let store_dir = Config::store_dir()?;

        Ok(Self::new(
            WeatherFetcher::new(api_key, config.endpoints.clone()),
            SessionCache::open(&store_dir),
            RecentSearches::open(&store_dir),
            config.default_city.clone(),
        ))
    }

    /// Startup policy: hydrate from the session cache when it holds a fresh
    /// entry; otherwise fetch the default city.
    pub async fn start(&mut self) -> Result<FetchOutcome, FetchError> {
        if let Some(entry) = self.cache.get() {
            tracing::debug!(city = %entry.city, "hydrated from session cache");
            self.bundle = Some(entry.data);
            self.city = Some(entry.city);
            return Ok(FetchOutcome::Hydrated);
        }

        let city = self.default_city.clone();
        self.fetch_data(&city).await
    }

    /// Fetch weather for `city` and make it current. A repeat search for the
    /// city already shown (any case) is a no-op cache hit with no network
    /// call and no state change. On failure every piece of state is left as
    /// it was and the error is handed to the caller.
    pub async fn fetch_data(&mut self, city: &str) -> Result<FetchOutcome, FetchError> {
        let lowered = city.to_lowercase();
        if self
            .city
            .as_ref()
            .is_some_and(|current| current.to_lowercase() == lowered)
        {
            tracing::debug!(city, "repeat search for current city, skipping fetch");
            return Ok(FetchOutcome::CacheHit);
        }

        let seq = self.begin_fetch();
        let bundle = self.fetcher.fetch_all(city).await?;
        Ok(self.apply_fetch(seq, city, bundle))
    }

    /// Issue a sequence token for a fetch. Tokens are monotonically
    /// increasing; only the latest one may apply its result.
    fn begin_fetch(&mut self) -> u64 {
        self.fetch_seq += 1;
        self.fetch_seq
    }

    /// Apply a completed fetch. Only the latest issued token may apply its
    /// result; anything older is discarded.
    fn apply_fetch(&mut self, seq: u64, city: &str, bundle: CityWeatherBundle) -> FetchOutcome {
        if seq != self.fetch_seq {
            tracing::debug!(city, seq, latest = self.fetch_seq, "discarding superseded fetch");
            return FetchOutcome::Superseded;
        }

        self.selected_day = None;

        // A failed store write must not fail a successful fetch.
        if let Err(err) = self.cache.put(city, &bundle) {
            tracing::warn!(city, %err, "failed to write session cache");
        }
        if let Err(err) = self.recents.record(city, &bundle.current) {
            tracing::warn!(city, %err, "failed to record recent search");
        }

        self.bundle = Some(bundle);
        self.city = Some(city.to_string());
        FetchOutcome::Fetched
    }

    /// Select a forecast day by its date key. Selecting the day that is
    /// already selected toggles the selection off again.
    pub fn select_day(&mut self, datetime: &str) {
        if self.selected_day.as_deref() == Some(datetime) {
            self.selected_day = None;
        } else {
            self.selected_day = Some(datetime.to_string());
        }
    }

    /// Pure projection of what to render: the selected forecast day when one
    /// is set and present in the bundle, otherwise the current conditions
    /// with today's temperature range.
    pub fn displayed_weather(&self) -> Option<DisplayedWeather<'_>> {
        let bundle = self.bundle.as_ref()?;

        if let Some(selected) = self.selected_day.as_deref()
            && let Some(day) = bundle.forecast.iter().find(|d| d.datetime == selected)
        {
            return Some(DisplayedWeather {
                snapshot: &day.snapshot,
                datetime: Some(&day.datetime),
                high_temp: day.high_temp,
                low_temp: day.low_temp,
            });
        }

        let (high_temp, low_temp) = bundle
            .forecast
            .first()
            .map(|today| (today.high_temp, today.low_temp))
            .unwrap_or((bundle.current.temp, bundle.current.temp));

        Some(DisplayedWeather {
            snapshot: &bundle.current,
            datetime: None,
            high_temp,
            low_temp,
        })
    }

    pub fn bundle(&self) -> Option<&CityWeatherBundle> {
        self.bundle.as_ref()
    }

    pub fn city(&self) -> Option<&str> {
        self.city.as_deref()
    }

    pub fn selected_day(&self) -> Option<&str> {
        self.selected_day.as_deref()
    }

    pub fn recent_searches(&self) -> &[RecentSearchRecord] {
        self.recents.list()
    }

    /// The recents rows the UI should show: the full list when expanded,
    /// otherwise the first [`COLLAPSED_RECENTS`].
    pub fn visible_recent_searches(&self) -> &[RecentSearchRecord] {
        let list = self.recents.list();
        if self.show_all_recents {
            list
        } else {
            &list[..list.len().min(COLLAPSED_RECENTS)]
        }
    }

    pub fn show_all_recents(&self) -> bool {
        self.show_all_recents
    }

    pub fn toggle_show_all_recents(&mut self) {
        self.show_all_recents = !self.show_all_recents;
    }
}
