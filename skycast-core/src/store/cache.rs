use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::model::CityWeatherBundle;
use crate::store::{now_millis, read_json, write_json};

/// Cached entries older than this are treated as absent.
pub const CACHE_TTL_MILLIS: i64 = 30 * 60 * 1000;

const CACHE_FILE: &str = "weather_data.json";

/// The single persisted record: the last successfully fetched city with its
/// bundle and fetch time. Field names match the session-storage record the
/// dashboard UI reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub city: String,
    pub data: CityWeatherBundle,
    pub timestamp: i64,
}

impl CacheEntry {
    pub fn is_fresh(&self, now: i64) -> bool {
        now - self.timestamp < CACHE_TTL_MILLIS
    }
}

/// Session-scoped cache holding at most one city's weather. Fetching a new
/// city overwrites the previous entry.
#[derive(Debug, Clone)]
pub struct SessionCache {
    path: PathBuf,
}

impl SessionCache {
    pub fn open(store_dir: &Path) -> Self {
        Self {
            path: store_dir.join(CACHE_FILE),
        }
    }

    /// Return the cached entry if present and still within the TTL. A stale
    /// entry is purged so the next read is a clean miss.
    pub fn get(&self) -> Option<CacheEntry> {
        let entry: CacheEntry = read_json(&self.path)?;

        if entry.is_fresh(now_millis()) {
            Some(entry)
        } else {
            tracing::debug!(city = %entry.city, "purging stale cache entry");
            let _ = fs::remove_file(&self.path);
            None
        }
    }

    pub fn put(&self, city: &str, bundle: &CityWeatherBundle) -> anyhow::Result<()> {
        let entry = CacheEntry {
            city: city.to_string(),
            data: bundle.clone(),
            timestamp: now_millis(),
        };
        write_json(&self.path, &entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Condition, WeatherSnapshot};

    fn bundle(city: &str, temp: f64) -> CityWeatherBundle {
        CityWeatherBundle {
            city_name: city.to_string(),
            country_code: "NZ".to_string(),
            current: snapshot(temp),
            forecast: Vec::new(),
        }
    }

    fn snapshot(temp: f64) -> WeatherSnapshot {
        WeatherSnapshot {
            temp,
            wind_spd: 4.2,
            wind_cdir: "NW".to_string(),
            rh: 61.0,
            uv: 5.0,
            pres: 1013.0,
            dewpt: 10.4,
            weather: Condition {
                description: "Broken clouds".to_string(),
                icon: "c03d".to_string(),
                code: 803,
            },
        }
    }

    #[test]
    fn freshness_boundary() {
        let entry = CacheEntry {
            city: "Wellington".to_string(),
            data: bundle("Wellington", 18.0),
            timestamp: 0,
        };

        // 29min59s old: fresh. 30min01s old: stale.
        assert!(entry.is_fresh(CACHE_TTL_MILLIS - 1_000));
        assert!(!entry.is_fresh(CACHE_TTL_MILLIS + 1_000));
        assert!(!entry.is_fresh(CACHE_TTL_MILLIS));
    }

    #[test]
    fn put_then_get_round_trips() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cache = SessionCache::open(dir.path());

        cache
            .put("Wellington", &bundle("Wellington", 18.0))
            .expect("put must succeed");

        let entry = cache.get().expect("entry must be fresh");
        assert_eq!(entry.city, "Wellington");
        assert_eq!(entry.data.current.temp, 18.0);
    }

    #[test]
    fn new_city_overwrites_the_previous_entry() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cache = SessionCache::open(dir.path());

        cache.put("Paris", &bundle("Paris", 9.0)).expect("put");
        cache.put("Tokyo", &bundle("Tokyo", 14.0)).expect("put");

        let entry = cache.get().expect("entry must exist");
        assert_eq!(entry.city, "Tokyo");
    }

    #[test]
    fn stale_entry_is_purged_on_read() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cache = SessionCache::open(dir.path());

        let stale = CacheEntry {
            city: "Wellington".to_string(),
            data: bundle("Wellington", 18.0),
            timestamp: now_millis() - CACHE_TTL_MILLIS - 60_000,
        };
        write_json(&dir.path().join(CACHE_FILE), &stale).expect("seed stale entry");

        assert!(cache.get().is_none());
        assert!(!dir.path().join(CACHE_FILE).exists());
    }

    #[test]
    fn malformed_record_is_a_miss() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join(CACHE_FILE), "{ not json").expect("seed corrupt file");

        let cache = SessionCache::open(dir.path());
        assert!(cache.get().is_none());
        // Discarded, not retried on the next read.
        assert!(!dir.path().join(CACHE_FILE).exists());
    }

    #[test]
    fn missing_file_is_a_miss() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cache = SessionCache::open(dir.path());
        assert!(cache.get().is_none());
    }
}
