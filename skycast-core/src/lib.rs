//! Core library for the `skycast` weather dashboard.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The remote fetcher for the current-conditions and forecast endpoints
//! - Session-scoped persistence (weather cache, recent searches)
//! - The coordinator owning weather state on behalf of a UI layer
//!
//! It is used by `skycast-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod coordinator;
pub mod fetcher;
pub mod model;
pub mod store;

pub use config::{Config, Endpoints};
pub use coordinator::{Coordinator, DisplayedWeather, FetchOutcome};
pub use fetcher::{Endpoint, FetchError, WeatherFetcher};
pub use model::{
    CityWeatherBundle, Condition, ForecastDay, RecentSearchRecord, SkyTheme, WeatherSnapshot,
    icon_url,
};
pub use store::{CacheEntry, RecentSearches, SessionCache};
