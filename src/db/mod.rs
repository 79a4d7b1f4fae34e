//! Persistence module split across logical submodules. Every store borrows the
//! one `ConnectionHolder`; none of them ever closes it.

mod connection;
mod pantry;
pub mod schema;
mod shopping;
mod transfer;

pub use connection::{ConnectionHolder, SchemaStatus};
pub use pantry::PantryStore;
pub use shopping::ShoppingListStore;
pub use transfer::copy_depleted_to_shopping_list;
