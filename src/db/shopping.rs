use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::{debug, info};

use crate::db::{schema, ConnectionHolder};
use crate::error::{StoreError, StoreResult};
use crate::models::{NewShoppingListItem, ShoppingListItem};

/// CRUD access to the `ShoppingItems` table over the shared connection.
#[derive(Debug, Clone, Copy)]
pub struct ShoppingListStore<'a> {
    holder: &'a ConnectionHolder,
}

impl<'a> ShoppingListStore<'a> {
    /// Borrow the shared holder. The store never closes it.
    pub fn new(holder: &'a ConnectionHolder) -> Self {
        Self { holder }
    }

    fn conn(&self) -> StoreResult<&'a Connection> {
        self.holder.connection()
    }

    /// Insert a new row and return it with the id SQLite assigned.
    pub fn add(&self, item: NewShoppingListItem) -> StoreResult<ShoppingListItem> {
        validate(&item)?;
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare("INSERT INTO ShoppingItems (ItemName, Quantity) VALUES (?1, ?2)")
            .map_err(|err| StoreError::prepare("shopping list insert", err))?;

        stmt.execute(params![item.name, item.quantity])
            .map_err(|err| StoreError::exec("insert shopping list item", err))?;

        let id = conn.last_insert_rowid();
        debug!(id, name = %item.name, "added shopping list item");
        Ok(item.with_id(id))
    }

    /// Fetch one row by id, `Ok(None)` when nothing matches.
    pub fn read(&self, id: i64) -> StoreResult<Option<ShoppingListItem>> {
        let mut stmt = self
            .conn()?
            .prepare("SELECT ID, ItemName, Quantity FROM ShoppingItems WHERE ID = ?1")
            .map_err(|err| StoreError::prepare("shopping list lookup", err))?;

        stmt.query_row([id], shopping_from_row)
            .optional()
            .map_err(|err| StoreError::exec("read shopping list item", err))
    }

    /// Every row in id order, fully materialized.
    pub fn read_all(&self) -> StoreResult<Vec<ShoppingListItem>> {
        let mut stmt = self
            .conn()?
            .prepare("SELECT ID, ItemName, Quantity FROM ShoppingItems ORDER BY ID")
            .map_err(|err| StoreError::prepare("shopping list query", err))?;

        let items = stmt
            .query_map([], shopping_from_row)
            .map_err(|err| StoreError::exec("read shopping list", err))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| StoreError::exec("read shopping list", err))?;

        Ok(items)
    }

    /// Overwrite name and quantity. An unknown id is a silent no-op.
    pub fn update(&self, id: i64, item: NewShoppingListItem) -> StoreResult<()> {
        validate(&item)?;
        let mut stmt = self
            .conn()?
            .prepare("UPDATE ShoppingItems SET ItemName = ?1, Quantity = ?2 WHERE ID = ?3")
            .map_err(|err| StoreError::prepare("shopping list update", err))?;

        let updated = stmt
            .execute(params![item.name, item.quantity, id])
            .map_err(|err| StoreError::exec("update shopping list item", err))?;

        if updated == 0 {
            debug!(id, "shopping list update matched no row");
        }
        Ok(())
    }

    /// Remove the matching row. An unknown id is a silent no-op.
    pub fn delete(&self, id: i64) -> StoreResult<()> {
        let mut stmt = self
            .conn()?
            .prepare("DELETE FROM ShoppingItems WHERE ID = ?1")
            .map_err(|err| StoreError::prepare("shopping list delete", err))?;

        let deleted = stmt
            .execute([id])
            .map_err(|err| StoreError::exec("delete shopping list item", err))?;

        if deleted == 0 {
            debug!(id, "shopping list delete matched no row");
        }
        Ok(())
    }

    /// Delete every row but keep the table.
    pub fn clear(&self) -> StoreResult<()> {
        let removed = self
            .conn()?
            .execute("DELETE FROM ShoppingItems", [])
            .map_err(|err| StoreError::exec("clear shopping list", err))?;
        info!(removed, "cleared shopping list");
        Ok(())
    }

    /// Drop and recreate the table with the three starter rows.
    pub fn reset(&self) -> StoreResult<()> {
        let seeded = schema::reset_shopping_list(self.conn()?)?;
        info!(seeded, "reset shopping list table");
        Ok(())
    }
}

fn validate(item: &NewShoppingListItem) -> StoreResult<()> {
    if item.name.trim().is_empty() {
        return Err(StoreError::InvalidInput(
            "shopping list item name must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn shopping_from_row(row: &Row<'_>) -> rusqlite::Result<ShoppingListItem> {
    Ok(ShoppingListItem {
        id: row.get(0)?,
        name: row.get(1)?,
        quantity: row.get::<_, Option<i64>>(2)?.unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn holder() -> ConnectionHolder {
        let holder = ConnectionHolder::open_in_memory().unwrap();
        holder.ensure_schema().unwrap();
        holder
    }

    fn item(name: &str, quantity: i64) -> NewShoppingListItem {
        NewShoppingListItem {
            name: name.to_string(),
            quantity,
        }
    }

    #[test]
    fn add_read_update_delete() {
        let holder = holder();
        let store = ShoppingListStore::new(&holder);

        let added = store.add(item("Coffee", 2)).unwrap();
        assert_eq!(store.read(added.id).unwrap(), Some(added.clone()));

        store.update(added.id, item("Decaf Coffee", 3)).unwrap();
        let updated = store.read(added.id).unwrap().unwrap();
        assert_eq!((updated.name.as_str(), updated.quantity), ("Decaf Coffee", 3));

        store.delete(added.id).unwrap();
        assert_eq!(store.read(added.id).unwrap(), None);
    }

    #[test]
    fn unknown_id_update_and_delete_are_no_ops() {
        let holder = holder();
        let store = ShoppingListStore::new(&holder);
        let added = store.add(item("Rice", 1)).unwrap();

        store.update(999, item("Pasta", 4)).unwrap();
        store.delete(999).unwrap();

        assert_eq!(store.read_all().unwrap(), vec![added]);
    }

    #[test]
    fn reset_seeds_starter_list() {
        let holder = holder();
        let store = ShoppingListStore::new(&holder);
        store.add(item("Flour", 2)).unwrap();

        store.reset().unwrap();
        let names: Vec<_> = store
            .read_all()
            .unwrap()
            .into_iter()
            .map(|item| (item.name, item.quantity))
            .collect();
        assert_eq!(
            names,
            vec![
                ("Milk".to_string(), 1),
                ("Bread".to_string(), 1),
                ("Eggs".to_string(), 1)
            ]
        );
    }

    #[test]
    fn clear_then_add_yields_only_new_rows() {
        let holder = holder();
        let store = ShoppingListStore::new(&holder);
        store.reset().unwrap();

        store.clear().unwrap();
        assert!(store.read_all().unwrap().is_empty());

        let added = store.add(item("Butter", 1)).unwrap();
        assert_eq!(store.read_all().unwrap(), vec![added]);
    }

    #[test]
    fn negative_or_null_quantity_does_not_break_the_scan() {
        let holder = holder();
        let store = ShoppingListStore::new(&holder);
        store.add(item("Yogurt", 2)).unwrap();
        holder
            .connection()
            .unwrap()
            .execute_batch(
                "INSERT INTO ShoppingItems (ItemName, Quantity) VALUES ('Returned Jam', -1);
                 INSERT INTO ShoppingItems (ItemName, Quantity) VALUES ('Napkins', NULL);",
            )
            .unwrap();

        let quantities: Vec<_> = store
            .read_all()
            .unwrap()
            .into_iter()
            .map(|item| item.quantity)
            .collect();
        assert_eq!(quantities, vec![2, -1, 0]);
    }

    #[test]
    fn blank_name_is_rejected() {
        let holder = holder();
        let store = ShoppingListStore::new(&holder);
        assert!(matches!(
            store.add(item("", 1)),
            Err(StoreError::InvalidInput(_))
        ));
    }
}
