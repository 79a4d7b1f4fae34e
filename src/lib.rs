//! Core library for the pantry tracker: a small data-access layer over one
//! embedded SQLite database (pantry items and a shopping list) plus a thin
//! client for the recipe search API.
//!
//! UI code constructs one `ConnectionHolder` at startup and hands references
//! to the stores it needs.
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod recipes;

/// Convenience re-exports for the persistence layer.
pub use db::{
    copy_depleted_to_shopping_list, ConnectionHolder, PantryStore, SchemaStatus, ShoppingListStore,
};

pub use config::{Config, RecipeApiConfig};
pub use error::{RecipeError, StoreError, StoreResult};

/// The domain records callers pass around.
pub use models::{NewPantryItem, NewShoppingListItem, PantryItem, RecipeSummary, ShoppingListItem};

pub use recipes::RecipeClient;
