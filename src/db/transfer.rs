use tracing::info;

use crate::db::ConnectionHolder;
use crate::error::{StoreError, StoreResult};

/// Copy every depleted pantry item onto the shopping list with quantity 1.
///
/// Source rows are left untouched and existing shopping list entries are not
/// deduplicated. The copy runs in its own transaction, so callers see either
/// all qualifying rows or none. Returns the number of rows copied.
pub fn copy_depleted_to_shopping_list(holder: &ConnectionHolder) -> StoreResult<usize> {
    let conn = holder.connection()?;
    let tx = conn
        .unchecked_transaction()
        .map_err(|err| StoreError::exec("begin depleted item transfer", err))?;

    let copied = {
        let mut stmt = tx
            .prepare(
                "INSERT INTO ShoppingItems (ItemName, Quantity)
                 SELECT FoodName, 1
                 FROM pantryitems
                 WHERE COALESCE(Servings, 0) = 0
                 ORDER BY FoodID",
            )
            .map_err(|err| StoreError::prepare("depleted item transfer", err))?;
        stmt.execute([])
            .map_err(|err| StoreError::exec("copy depleted items", err))?
    };

    tx.commit()
        .map_err(|err| StoreError::exec("commit depleted item transfer", err))?;
    info!(copied, "copied depleted pantry items to shopping list");
    Ok(copied)
}
