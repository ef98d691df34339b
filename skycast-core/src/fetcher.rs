use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::config::Endpoints;
use crate::model::{CityWeatherBundle, ForecastDay, WeatherSnapshot};

/// Alias of one of the two upstream requests, carried inside errors so the
/// caller can tell which leg of the fetch failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Current,
    Forecast,
}

impl Endpoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::Current => "current",
            Endpoint::Forecast => "forecast",
        }
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Request to the {endpoint} endpoint failed: {source}")]
    Network {
        endpoint: Endpoint,
        #[source]
        source: reqwest::Error,
    },

    #[error("The {endpoint} endpoint responded with status {status}: {body}")]
    HttpStatus {
        endpoint: Endpoint,
        status: StatusCode,
        body: String,
    },

    #[error("Failed to parse the {endpoint} endpoint response: {source}")]
    Decode {
        endpoint: Endpoint,
        #[source]
        source: serde_json::Error,
    },

    #[error("The {endpoint} endpoint returned no observations")]
    EmptyResponse { endpoint: Endpoint },
}

impl FetchError {
    pub fn endpoint(&self) -> Endpoint {
        match self {
            FetchError::Network { endpoint, .. }
            | FetchError::HttpStatus { endpoint, .. }
            | FetchError::Decode { endpoint, .. }
            | FetchError::EmptyResponse { endpoint } => *endpoint,
        }
    }
}

/// Stateless client for the two upstream weather endpoints. One attempt per
/// call; retry policy belongs to the caller.
#[derive(Debug, Clone)]
pub struct WeatherFetcher {
    api_key: String,
    endpoints: Endpoints,
    http: Client,
}

impl WeatherFetcher {
    pub fn new(api_key: String, endpoints: Endpoints) -> Self {
        Self {
            api_key,
            endpoints,
            http: Client::new(),
        }
    }

    /// Fetch current conditions and the daily forecast for `city` in one
    /// logical call. The two requests run concurrently; if either fails the
    /// whole call fails and no partial bundle is returned.
    pub async fn fetch_all(&self, city: &str) -> Result<CityWeatherBundle, FetchError> {
        let (current, forecast) =
            tokio::try_join!(self.fetch_current(city), self.fetch_forecast(city))?;

        tracing::debug!(city, days = forecast.data.len(), "fetched weather bundle");

        Ok(CityWeatherBundle {
            city_name: forecast.city_name,
            country_code: forecast.country_code,
            current,
            forecast: forecast.data,
        })
    }

    async fn fetch_current(&self, city: &str) -> Result<WeatherSnapshot, FetchError> {
        let body = self
            .get(Endpoint::Current, &self.endpoints.current, city)
            .await?;

        let parsed: CurrentResponse =
            serde_json::from_str(&body).map_err(|source| FetchError::Decode {
                endpoint: Endpoint::Current,
                source,
            })?;

        parsed
            .data
            .into_iter()
            .next()
            .ok_or(FetchError::EmptyResponse {
                endpoint: Endpoint::Current,
            })
    }

    async fn fetch_forecast(&self, city: &str) -> Result<ForecastResponse, FetchError> {
        let body = self
            .get(Endpoint::Forecast, &self.endpoints.forecast, city)
            .await?;

        let parsed: ForecastResponse =
            serde_json::from_str(&body).map_err(|source| FetchError::Decode {
                endpoint: Endpoint::Forecast,
                source,
            })?;

        if parsed.data.is_empty() {
            return Err(FetchError::EmptyResponse {
                endpoint: Endpoint::Forecast,
            });
        }

        Ok(parsed)
    }

    async fn get(&self, endpoint: Endpoint, url: &str, city: &str) -> Result<String, FetchError> {
        let res = self
            .http
            .get(url)
            .query(&[("city", city), ("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|source| FetchError::Network { endpoint, source })?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|source| FetchError::Network { endpoint, source })?;

        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                endpoint,
                status,
                body: truncate_body(&body),
            });
        }

        Ok(body)
    }
}

#[derive(Debug, Deserialize)]
struct CurrentResponse {
    data: Vec<WeatherSnapshot>,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    city_name: String,
    country_code: String,
    data: Vec<ForecastDay>,
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        // Cut at a char boundary so multibyte bodies cannot panic the slice.
        let cut = (0..=MAX).rev().find(|&i| body.is_char_boundary(i)).unwrap_or(0);
        format!("{}...", &body[..cut])
    } else {
        body.to_string()
    }
}
