use serde_json::Value;
use url::Url;

use super::FetchError;

const API_URL: &str = "https://newsapi.org/v2/top-headlines";

#[derive(Debug, Clone, PartialEq)]
pub struct Headline {
    pub title: String,
    pub url: Option<String>,
    pub source: Option<String>,
}

pub fn url(api_key: &str) -> Result<Url, FetchError> {
    let url = Url::parse_with_params(API_URL, &[("country", "us"), ("apiKey", api_key)])?;
    Ok(url)
}

/// Headline titles from the `articles` array. Entries without a title are
/// skipped; an absent array fails the lookup.
pub fn extract(payload: &Value) -> Result<Vec<Headline>, FetchError> {
    let articles = payload
        .get("articles")
        .and_then(Value::as_array)
        .ok_or_else(|| FetchError::missing("articles"))?;

    Ok(articles
        .iter()
        .filter_map(|article| {
            let title = article.get("title").and_then(Value::as_str)?;
            Some(Headline {
                title: title.to_string(),
                url: article
                    .get("url")
                    .and_then(Value::as_str)
                    .map(str::to_string),
                source: article
                    .pointer("/source/name")
                    .and_then(Value::as_str)
                    .map(str::to_string),
            })
        })
        .collect())
}
