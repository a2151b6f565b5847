use serde_json::Value;
use url::Url;

use super::FetchError;

const API_URL: &str = "https://api.openweathermap.org/data/2.5/weather";
const ICON_URL: &str = "http://openweathermap.org/img/w/";

/// Fields extracted from a current-conditions payload. `sunrise`/`sunset`
/// and the coordinates are not guaranteed by the provider and stay optional.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentConditions {
    pub temperature: f64,
    pub description: String,
    pub icon_url: String,
    pub sunrise: Option<i64>,
    pub sunset: Option<i64>,
    pub lon: Option<f64>,
    pub lat: Option<f64>,
}

pub fn url(city: &str, api_key: &str) -> Result<Url, FetchError> {
    let url = Url::parse_with_params(
        API_URL,
        &[("q", city), ("units", "metric"), ("appid", api_key)],
    )?;
    Ok(url)
}

/// Pulls the fixed field set out of a provider payload: the first entry of
/// the `weather` array plus `main.temp`. Anything required that is absent
/// fails the whole lookup; nothing partial is returned.
pub fn extract(payload: &Value) -> Result<CurrentConditions, FetchError> {
    let entry = payload
        .get("weather")
        .and_then(Value::as_array)
        .and_then(|list| list.first())
        .ok_or_else(|| FetchError::missing("weather[0]"))?;

    let description = entry
        .get("description")
        .and_then(Value::as_str)
        .ok_or_else(|| FetchError::missing("weather[0].description"))?
        .to_string();
    let icon = entry
        .get("icon")
        .and_then(Value::as_str)
        .ok_or_else(|| FetchError::missing("weather[0].icon"))?;

    let temperature = payload
        .pointer("/main/temp")
        .and_then(Value::as_f64)
        .ok_or_else(|| FetchError::missing("main.temp"))?;

    Ok(CurrentConditions {
        temperature,
        description,
        icon_url: format!("{ICON_URL}{icon}.png"),
        sunrise: payload.pointer("/sys/sunrise").and_then(Value::as_i64),
        sunset: payload.pointer("/sys/sunset").and_then(Value::as_i64),
        lon: payload.pointer("/coord/lon").and_then(Value::as_f64),
        lat: payload.pointer("/coord/lat").and_then(Value::as_f64),
    })
}
