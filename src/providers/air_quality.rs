use serde_json::Value;
use url::Url;

use super::FetchError;

const API_URL: &str = "https://api.openaq.org/v2/latest";

pub const POLLUTANT: &str = "pm25";

/// Latest PM2.5 reading for a city.
#[derive(Debug, Clone, PartialEq)]
pub struct Pm25Reading {
    pub value: f64,
}

pub fn url(city: &str, api_key: &str) -> Result<Url, FetchError> {
    let url = Url::parse_with_params(
        API_URL,
        &[("city", city), ("parameter", POLLUTANT), ("api_key", api_key)],
    )?;
    Ok(url)
}

/// First `results` entry, measurement with `parameter == "pm25"`.
pub fn extract(payload: &Value) -> Result<Pm25Reading, FetchError> {
    let first = payload
        .get("results")
        .and_then(Value::as_array)
        .and_then(|list| list.first())
        .ok_or_else(|| FetchError::missing("results[0]"))?;

    let value = first
        .get("measurements")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .find(|m| m.get("parameter").and_then(Value::as_str) == Some(POLLUTANT))
        .and_then(|m| m.get("value").and_then(Value::as_f64))
        .ok_or_else(|| FetchError::missing("measurements[pm25].value"))?;

    Ok(Pm25Reading { value })
}
