use serde_json::Value;
use url::Url;

use super::FetchError;

const API_URL: &str = "https://api.exchangerate-api.com/v4/latest";

pub fn url(from_currency: &str, api_key: &str) -> Result<Url, FetchError> {
    let base = format!("{API_URL}/{}", from_currency.to_uppercase());
    let url = Url::parse_with_params(&base, &[("apiKey", api_key)])?;
    Ok(url)
}

/// The rate keyed by the target currency code inside the `rates` object.
pub fn extract(payload: &Value, to_currency: &str) -> Result<f64, FetchError> {
    let rates = payload
        .get("rates")
        .and_then(Value::as_object)
        .ok_or_else(|| FetchError::missing("rates"))?;
    rates
        .get(&to_currency.to_uppercase())
        .and_then(Value::as_f64)
        .ok_or_else(|| FetchError::missing(format!("rates.{}", to_currency.to_uppercase())))
}
