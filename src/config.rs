use std::path::PathBuf;

use directories::ProjectDirs;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// Optional config file looked up in the working directory.
const CONFIG_FILE: &str = "pantry.toml";
/// Prefix for environment overrides. Nested keys use `__`, for example
/// `PANTRY_RECIPE_API__APP_KEY`.
const ENV_PREFIX: &str = "PANTRY_";
/// File name of the bundled database inside `resource_dir`.
const DEFAULT_DATABASE_NAME: &str = "groceryitems.db";
const DEFAULT_RECIPE_BASE_URL: &str = "https://api.edamam.com/api/recipes/v2";

/// Application configuration managed by Figment: defaults, then
/// `pantry.toml`, then `PANTRY_*` environment variables.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Directory holding the bundled database file.
    pub resource_dir: PathBuf,

    /// Logical name of the bundled database.
    pub database_name: String,

    /// Default tracing filter when `RUST_LOG` is unset.
    pub log_level: String,

    #[serde(default)]
    pub recipe_api: RecipeApiConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            resource_dir: default_resource_dir(),
            database_name: DEFAULT_DATABASE_NAME.to_string(),
            log_level: "info".to_string(),
            recipe_api: RecipeApiConfig::default(),
        }
    }
}

/// Credentials and fixed query parameters for the recipe search endpoint.
/// The id and key have no defaults; they must come from the file or the
/// environment.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RecipeApiConfig {
    pub base_url: String,
    #[serde(default)]
    pub app_id: Option<String>,
    #[serde(default)]
    pub app_key: Option<String>,
    pub meal_type: String,
}

impl Default for RecipeApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_RECIPE_BASE_URL.to_string(),
            app_id: None,
            app_key: None,
            meal_type: "Dinner".to_string(),
        }
    }
}

impl RecipeApiConfig {
    /// Both credentials present and non-blank.
    pub fn has_credentials(&self) -> bool {
        let present = |value: &Option<String>| value.as_deref().is_some_and(|v| !v.trim().is_empty());
        present(&self.app_id) && present(&self.app_key)
    }
}

impl Config {
    pub fn figment() -> Figment {
        let figment = Figment::new().merge(Serialized::defaults(Config::default()));
        let figment = if PathBuf::from(CONFIG_FILE).is_file() {
            figment.merge(Toml::file(CONFIG_FILE))
        } else {
            figment
        };
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn load() -> Result<Self, figment::Error> {
        Self::figment().extract()
    }

    /// Full path of the bundled database file.
    pub fn database_path(&self) -> PathBuf {
        self.resource_dir.join(&self.database_name)
    }
}

fn default_resource_dir() -> PathBuf {
    ProjectDirs::from("", "", "pantry-tracker")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("resources"))
}
