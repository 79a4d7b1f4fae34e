//! Binary entry point that brings up the data layer end to end: load config,
//! install logging, open the bundled database, create and seed any missing
//! table and report what is in them. With recipe credentials configured it also
//! runs one recipe search for a random pantry item.
use anyhow::Context;
use pantry_tracker::{Config, ConnectionHolder, PantryStore, RecipeClient, ShoppingListStore};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("failed to load configuration")?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_level(true)
                .with_target(false),
        )
        .init();

    let holder = ConnectionHolder::from_config(&config).with_context(|| {
        format!(
            "failed to open bundled database {}",
            config.database_path().display()
        )
    })?;
    holder.initialize().context("failed to prepare schema")?;

    let pantry = PantryStore::new(&holder);
    let shopping = ShoppingListStore::new(&holder);

    let items = pantry.read_all()?;
    let depleted = items.iter().filter(|item| item.is_depleted()).count();
    let list = shopping.read_all()?;
    info!(
        items = items.len(),
        depleted,
        shopping_list = list.len(),
        "pantry loaded"
    );

    if !config.recipe_api.has_credentials() {
        info!("recipe API credentials not configured; skipping recipe search");
        return Ok(());
    }

    let client = RecipeClient::new(&config.recipe_api)?;
    if let Some(item) = pantry.random()? {
        match client.search_for_item(&item).await {
            Ok(recipes) => match recipes.first() {
                Some(recipe) => {
                    info!(item = %item, recipe = %recipe.label, url = %recipe.url, "suggested recipe")
                }
                None => info!(item = %item, "no recipes found"),
            },
            Err(err) => warn!(error = %err, item = %item, "recipe search failed"),
        }
    }

    Ok(())
}
