//! Thin client for the recipe search API. One GET per search, no retries; the
//! caller decides on timeouts and runs the future off its interactive path.

use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

use crate::config::RecipeApiConfig;
use crate::error::RecipeError;
use crate::models::{PantryItem, RecipeSummary};

#[derive(Debug, Deserialize)]
struct SearchResponse {
    hits: Vec<Hit>,
}

#[derive(Debug, Deserialize)]
struct Hit {
    recipe: RecipeSummary,
}

#[derive(Debug, Clone)]
pub struct RecipeClient {
    http: reqwest::Client,
    base_url: Url,
    app_id: String,
    app_key: String,
    meal_type: String,
}

impl RecipeClient {
    /// Validate the configuration up front so a missing key never turns into
    /// an unauthenticated request.
    pub fn new(config: &RecipeApiConfig) -> Result<Self, RecipeError> {
        if !config.has_credentials() {
            return Err(RecipeError::Config(
                "recipe_api.app_id and recipe_api.app_key must be set".to_string(),
            ));
        }
        let base_url = Url::parse(&config.base_url)
            .map_err(|err| RecipeError::Config(format!("invalid base_url: {err}")))?;

        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            http,
            base_url,
            app_id: config.app_id.clone().unwrap_or_default(),
            app_key: config.app_key.clone().unwrap_or_default(),
            meal_type: config.meal_type.clone(),
        })
    }

    /// Full request URL for a query, with every parameter percent-encoded.
    pub fn search_url(&self, query: &str) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("type", "public")
            .append_pair("q", query)
            .append_pair("app_id", &self.app_id)
            .append_pair("app_key", &self.app_key)
            .append_pair("mealType", &self.meal_type);
        url
    }

    pub async fn search(&self, query: &str) -> Result<Vec<RecipeSummary>, RecipeError> {
        debug!(query, "searching recipes");
        let response = self
            .http
            .get(self.search_url(query))
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .inspect_err(|err| warn!(error = %err, query, "recipe request failed"))?;

        let body = response.bytes().await?;
        parse_recipes(&body).inspect_err(|err| warn!(error = %err, "recipe response did not decode"))
    }

    /// Recipes built around one pantry item, searched by its name.
    pub async fn search_for_item(&self, item: &PantryItem) -> Result<Vec<RecipeSummary>, RecipeError> {
        self.search(&item.name).await
    }
}

/// Decode `{ "hits": [{ "recipe": { label, ingredientLines, url } }] }` into
/// the simplified records. Extra fields are ignored.
pub fn parse_recipes(body: &[u8]) -> Result<Vec<RecipeSummary>, RecipeError> {
    let response: SearchResponse = serde_json::from_slice(body)?;
    Ok(response.hits.into_iter().map(|hit| hit.recipe).collect())
}

#[cfg(test)]
mod tests {
    use std::net::TcpListener;

    use super::*;

    fn config(base_url: &str) -> RecipeApiConfig {
        RecipeApiConfig {
            base_url: base_url.to_string(),
            app_id: Some("app-123".to_string()),
            app_key: Some("key-456".to_string()),
            meal_type: "Dinner".to_string(),
        }
    }

    #[test]
    fn search_url_encodes_query() {
        let client = RecipeClient::new(&config("https://api.edamam.com/api/recipes/v2")).unwrap();
        let url = client.search_url("Ice Cream (coffee flavor)");

        assert_eq!(
            url.as_str(),
            "https://api.edamam.com/api/recipes/v2?type=public&q=Ice+Cream+%28coffee+flavor%29\
             &app_id=app-123&app_key=key-456&mealType=Dinner"
        );
    }

    #[test]
    fn missing_credentials_are_rejected() {
        let mut cfg = config("https://api.edamam.com/api/recipes/v2");
        cfg.app_key = None;
        assert!(matches!(RecipeClient::new(&cfg), Err(RecipeError::Config(_))));
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        assert!(matches!(
            RecipeClient::new(&config("not a url")),
            Err(RecipeError::Config(_))
        ));
    }

    #[test]
    fn parses_hits_and_ignores_extra_fields() {
        let body = br#"{
            "from": 1,
            "hits": [
                {"recipe": {"label": "Banana Bread", "ingredientLines": ["3 bananas", "2 cups flour"],
                            "url": "https://example.com/banana-bread", "calories": 2400.5}},
                {"recipe": {"label": "Banana Smoothie", "ingredientLines": [],
                            "url": "https://example.com/smoothie"}}
            ]
        }"#;

        let recipes = parse_recipes(body).unwrap();
        assert_eq!(recipes.len(), 2);
        assert_eq!(recipes[0].label, "Banana Bread");
        assert_eq!(recipes[0].ingredient_lines.len(), 2);
        assert_eq!(recipes[1].url, "https://example.com/smoothie");
    }

    #[test]
    fn unexpected_shape_is_a_decode_error() {
        let body = br#"{"hits": [{"recipe": {"label": "No url"}}]}"#;
        assert!(matches!(parse_recipes(body), Err(RecipeError::Decode(_))));
        assert!(matches!(parse_recipes(b"<html>"), Err(RecipeError::Decode(_))));
    }

    #[tokio::test]
    async fn refused_connection_is_a_network_error() {
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let client = RecipeClient::new(&config(&format!("http://127.0.0.1:{port}/search"))).unwrap();

        let err = client.search("Lemon").await.unwrap_err();
        assert!(matches!(err, RecipeError::Network(_)));
    }
}
