//! Table definitions and the literal seed rows that `reset` reloads. The seed
//! data is part of the contract: callers and tests rely on the exact rows.

use rusqlite::{params, Connection};

use crate::error::{StoreError, StoreResult};

pub(crate) const CREATE_PANTRY_TABLE: &str = "CREATE TABLE IF NOT EXISTS pantryitems (
        FoodID INTEGER PRIMARY KEY AUTOINCREMENT,
        FoodName TEXT NOT NULL,
        FoodBrand TEXT,
        Calories INTEGER,
        ProteinGrams INTEGER,
        CarbGrams INTEGER,
        FatGrams INTEGER,
        Servings INTEGER DEFAULT 0
    )";

pub(crate) const CREATE_SHOPPING_TABLE: &str = "CREATE TABLE IF NOT EXISTS ShoppingItems (
        ID INTEGER PRIMARY KEY AUTOINCREMENT,
        ItemName TEXT NOT NULL,
        Quantity INTEGER
    )";

const DROP_PANTRY_TABLE: &str = "DROP TABLE IF EXISTS pantryitems";
const DROP_SHOPPING_TABLE: &str = "DROP TABLE IF EXISTS ShoppingItems";

/// A pantry seed row: name, brand, calories, protein, carbs, fat, servings.
pub type PantrySeed = (&'static str, &'static str, u32, u32, u32, u32, u32);

pub const PANTRY_SEED: [PantrySeed; 12] = [
    ("Banana", "Dole", 27, 1, 30, 0, 0),
    ("Black Beans", "Generic", 109, 7, 20, 1, 0),
    ("Crackers", "Trisket", 120, 3, 20, 4, 0),
    ("Egg", "Walmart", 72, 6, 1, 5, 0),
    ("French Fries (medium)", "McDonald's", 320, 5, 43, 15, 0),
    ("Hummus", "Sabra", 150, 4, 9, 11, 0),
    ("Ice Cream (coffee flavor)", "Breyers", 130, 2, 15, 7, 0),
    ("Kobe Ribeye", "Vons", 270, 21, 0, 21, 0),
    ("Lemon", "Generic", 19, 1, 6, 1, 0),
    ("Pork Rinds", "Juan Chicharron", 167, 17, 0, 11, 0),
    ("Shrimp Scampi", "Red Lobster", 240, 17, 3, 17, 0),
    ("Zebra Popcorn", "Popcornopolis", 280, 2, 40, 14, 0),
];

/// Starter shopping list: name and quantity.
pub const SHOPPING_SEED: [(&str, i64); 3] = [("Milk", 1), ("Bread", 1), ("Eggs", 1)];

/// Drop, recreate and seed the pantry table in one transaction.
pub(crate) fn reset_pantry(conn: &Connection) -> StoreResult<usize> {
    let tx = conn
        .unchecked_transaction()
        .map_err(|err| StoreError::exec("begin pantry reset", err))?;

    tx.execute_batch(DROP_PANTRY_TABLE)
        .map_err(|err| StoreError::exec("drop pantry table", err))?;
    tx.execute_batch(CREATE_PANTRY_TABLE)
        .map_err(|err| StoreError::exec("create pantry table", err))?;

    {
        let mut stmt = tx
            .prepare(
                "INSERT INTO pantryitems
                 (FoodName, FoodBrand, Calories, ProteinGrams, CarbGrams, FatGrams, Servings)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )
            .map_err(|err| StoreError::prepare("pantry seed insert", err))?;

        for (name, brand, calories, protein, carbs, fat, servings) in PANTRY_SEED {
            stmt.execute(params![name, brand, calories, protein, carbs, fat, servings])
                .map_err(|err| StoreError::exec("seed pantry item", err))?;
        }
    }

    tx.commit()
        .map_err(|err| StoreError::exec("commit pantry reset", err))?;
    Ok(PANTRY_SEED.len())
}

/// Drop, recreate and seed the shopping list table in one transaction.
pub(crate) fn reset_shopping_list(conn: &Connection) -> StoreResult<usize> {
    let tx = conn
        .unchecked_transaction()
        .map_err(|err| StoreError::exec("begin shopping list reset", err))?;

    tx.execute_batch(DROP_SHOPPING_TABLE)
        .map_err(|err| StoreError::exec("drop shopping list table", err))?;
    tx.execute_batch(CREATE_SHOPPING_TABLE)
        .map_err(|err| StoreError::exec("create shopping list table", err))?;

    {
        let mut stmt = tx
            .prepare("INSERT INTO ShoppingItems (ItemName, Quantity) VALUES (?1, ?2)")
            .map_err(|err| StoreError::prepare("shopping list seed insert", err))?;

        for (name, quantity) in SHOPPING_SEED {
            stmt.execute(params![name, quantity])
                .map_err(|err| StoreError::exec("seed shopping list item", err))?;
        }
    }

    tx.commit()
        .map_err(|err| StoreError::exec("commit shopping list reset", err))?;
    Ok(SHOPPING_SEED.len())
}
