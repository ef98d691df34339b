use std::path::{Path, PathBuf};

use crate::model::{RecentSearchRecord, WeatherSnapshot};
use crate::store::{now_millis, read_json, write_json};

/// Upper bound on the recent-searches list; the oldest record is evicted.
pub const MAX_RECENT_SEARCHES: usize = 10;

const RECENTS_FILE: &str = "recent_searches.json";

/// Ordered, de-duplicated, size-bounded list of previously searched cities,
/// persisted independently of the weather cache. Most recent first.
#[derive(Debug)]
pub struct RecentSearches {
    path: PathBuf,
    entries: Vec<RecentSearchRecord>,
}

impl RecentSearches {
    /// Open the tracker, loading whatever list survived in the store. A
    /// missing or malformed file starts the list empty.
    pub fn open(store_dir: &Path) -> Self {
        let path = store_dir.join(RECENTS_FILE);
        let entries = read_json(&path).unwrap_or_default();
        Self { path, entries }
    }

    /// Record a search. A repeat search refreshes the city's position to the
    /// front rather than duplicating it; city comparison is case-insensitive.
    pub fn record(&mut self, city: &str, snapshot: &WeatherSnapshot) -> anyhow::Result<()> {
        let lowered = city.to_lowercase();
        self.entries
            .retain(|entry| entry.city.to_lowercase() != lowered);

        self.entries.insert(
            0,
            RecentSearchRecord {
                city: city.to_string(),
                temp: snapshot.temp.round() as i64,
                description: snapshot.weather.description.clone(),
                icon: snapshot.weather.icon.clone(),
                timestamp: now_millis(),
            },
        );
        self.entries.truncate(MAX_RECENT_SEARCHES);

        write_json(&self.path, &self.entries)
    }

    pub fn list(&self) -> &[RecentSearchRecord] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Condition;

    fn snapshot(temp: f64) -> WeatherSnapshot {
        WeatherSnapshot {
            temp,
            wind_spd: 3.0,
            wind_cdir: "SW".to_string(),
            rh: 55.0,
            uv: 4.0,
            pres: 1009.0,
            dewpt: 8.0,
            weather: Condition {
                description: "Clear sky".to_string(),
                icon: "c01d".to_string(),
                code: 800,
            },
        }
    }

    #[test]
    fn repeat_search_moves_city_to_front_without_duplicating() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut recents = RecentSearches::open(dir.path());

        recents.record("Paris", &snapshot(9.0)).expect("record");
        recents.record("London", &snapshot(7.0)).expect("record");
        recents.record("Paris", &snapshot(10.0)).expect("record");

        let cities: Vec<_> = recents.list().iter().map(|r| r.city.as_str()).collect();
        assert_eq!(cities, ["Paris", "London"]);
        assert_eq!(recents.list()[0].temp, 10);
    }

    #[test]
    fn dedup_is_case_insensitive() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut recents = RecentSearches::open(dir.path());

        recents.record("paris", &snapshot(9.0)).expect("record");
        recents.record("PARIS", &snapshot(11.0)).expect("record");

        assert_eq!(recents.list().len(), 1);
        assert_eq!(recents.list()[0].city, "PARIS");
    }

    #[test]
    fn eleventh_city_evicts_the_oldest() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut recents = RecentSearches::open(dir.path());

        for i in 0..11 {
            recents
                .record(&format!("City{i}"), &snapshot(i as f64))
                .expect("record");
        }

        assert_eq!(recents.list().len(), MAX_RECENT_SEARCHES);
        assert_eq!(recents.list()[0].city, "City10");
        assert!(recents.list().iter().all(|r| r.city != "City0"));
    }

    #[test]
    fn list_survives_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");

        {
            let mut recents = RecentSearches::open(dir.path());
            recents.record("Tokyo", &snapshot(14.0)).expect("record");
        }

        let recents = RecentSearches::open(dir.path());
        assert_eq!(recents.list().len(), 1);
        assert_eq!(recents.list()[0].city, "Tokyo");
        assert_eq!(recents.list()[0].description, "Clear sky");
    }

    #[test]
    fn malformed_store_starts_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join(RECENTS_FILE), "[{ broken").expect("seed corrupt file");

        let recents = RecentSearches::open(dir.path());
        assert!(recents.list().is_empty());
    }
}
