use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::{debug, info, warn};

use crate::db::{schema, ConnectionHolder};
use crate::error::{StoreError, StoreResult};
use crate::models::{NewPantryItem, PantryItem};

const PANTRY_COLUMNS: &str =
    "FoodID, FoodName, FoodBrand, Calories, ProteinGrams, CarbGrams, FatGrams, Servings";

/// CRUD access to the `pantryitems` table over the shared connection.
#[derive(Debug, Clone, Copy)]
pub struct PantryStore<'a> {
    holder: &'a ConnectionHolder,
}

impl<'a> PantryStore<'a> {
    pub fn new(holder: &'a ConnectionHolder) -> Self {
        Self { holder }
    }

    fn conn(&self) -> StoreResult<&'a Connection> {
        self.holder.connection()
    }

    /// Insert a new row and hand back the stored record with its assigned id.
    pub fn add(&self, item: NewPantryItem) -> StoreResult<PantryItem> {
        validate(&item)?;
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(
                "INSERT INTO pantryitems
                 (FoodName, FoodBrand, Calories, ProteinGrams, CarbGrams, FatGrams, Servings)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )
            .map_err(|err| StoreError::prepare("pantry insert", err))?;

        stmt.execute(params![
            item.name,
            item.brand,
            item.calories,
            item.protein,
            item.carbs,
            item.fat,
            item.servings
        ])
        .map_err(|err| StoreError::exec("insert pantry item", err))?;

        let id = conn.last_insert_rowid();
        debug!(id, name = %item.name, "added pantry item");
        Ok(item.with_id(id))
    }

    /// Fetch one row. A missing id is `Ok(None)`, not an error.
    pub fn read(&self, id: i64) -> StoreResult<Option<PantryItem>> {
        let mut stmt = self
            .conn()?
            .prepare(&format!("SELECT {PANTRY_COLUMNS} FROM pantryitems WHERE FoodID = ?1"))
            .map_err(|err| StoreError::prepare("pantry lookup", err))?;

        stmt.query_row([id], pantry_from_row)
            .optional()
            .map_err(|err| StoreError::exec("read pantry item", err))
    }

    /// Every row in id order, fully materialized.
    pub fn read_all(&self) -> StoreResult<Vec<PantryItem>> {
        self.collect(
            &format!("SELECT {PANTRY_COLUMNS} FROM pantryitems ORDER BY FoodID"),
            "read pantry items",
        )
    }

    /// Items with no servings left, in id order.
    pub fn read_depleted(&self) -> StoreResult<Vec<PantryItem>> {
        self.collect(
            &format!(
                "SELECT {PANTRY_COLUMNS} FROM pantryitems
                 WHERE COALESCE(Servings, 0) = 0
                 ORDER BY FoodID"
            ),
            "read depleted pantry items",
        )
    }

    /// Overwrite every field of the matching row. An unknown id touches
    /// nothing and still succeeds.
    pub fn update(&self, id: i64, item: NewPantryItem) -> StoreResult<()> {
        validate(&item)?;
        let mut stmt = self
            .conn()?
            .prepare(
                "UPDATE pantryitems
                 SET FoodName = ?1, FoodBrand = ?2, Calories = ?3, ProteinGrams = ?4,
                     CarbGrams = ?5, FatGrams = ?6, Servings = ?7
                 WHERE FoodID = ?8",
            )
            .map_err(|err| StoreError::prepare("pantry update", err))?;

        let updated = stmt
            .execute(params![
                item.name,
                item.brand,
                item.calories,
                item.protein,
                item.carbs,
                item.fat,
                item.servings,
                id
            ])
            .map_err(|err| StoreError::exec("update pantry item", err))?;

        if updated == 0 {
            debug!(id, "pantry update matched no row");
        }
        Ok(())
    }

    /// Remove the matching row. Like `update`, an unknown id is a no-op.
    pub fn delete(&self, id: i64) -> StoreResult<()> {
        let mut stmt = self
            .conn()?
            .prepare("DELETE FROM pantryitems WHERE FoodID = ?1")
            .map_err(|err| StoreError::prepare("pantry delete", err))?;

        let deleted = stmt
            .execute([id])
            .map_err(|err| StoreError::exec("delete pantry item", err))?;

        if deleted == 0 {
            debug!(id, "pantry delete matched no row");
        }
        Ok(())
    }

    /// Delete every row but keep the table.
    pub fn clear(&self) -> StoreResult<()> {
        let removed = self
            .conn()?
            .execute("DELETE FROM pantryitems", [])
            .map_err(|err| StoreError::exec("clear pantry", err))?;
        info!(removed, "cleared pantry");
        Ok(())
    }

    /// Drop and recreate the table, then load the fixed seed set.
    pub fn reset(&self) -> StoreResult<()> {
        let seeded = schema::reset_pantry(self.conn()?)?;
        info!(seeded, "reset pantry table");
        Ok(())
    }

    /// One arbitrary row, or `None` when the pantry is empty.
    pub fn random(&self) -> StoreResult<Option<PantryItem>> {
        let mut stmt = self
            .conn()?
            .prepare(&format!(
                "SELECT {PANTRY_COLUMNS} FROM pantryitems ORDER BY RANDOM() LIMIT 1"
            ))
            .map_err(|err| StoreError::prepare("random pantry pick", err))?;

        stmt.query_row([], pantry_from_row)
            .optional()
            .map_err(|err| StoreError::exec("pick random pantry item", err))
    }

    fn collect(&self, sql: &str, context: &'static str) -> StoreResult<Vec<PantryItem>> {
        let mut stmt = self
            .conn()?
            .prepare(sql)
            .map_err(|err| StoreError::prepare(context, err))?;

        let items = stmt
            .query_map([], pantry_from_row)
            .map_err(|err| StoreError::exec(context, err))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| StoreError::exec(context, err))?;

        Ok(items)
    }
}

fn validate(item: &NewPantryItem) -> StoreResult<()> {
    if item.name.trim().is_empty() {
        return Err(StoreError::InvalidInput(
            "pantry item name must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// Nullable columns read as empty/zero so rows written by other tools still load.
fn pantry_from_row(row: &Row<'_>) -> rusqlite::Result<PantryItem> {
    Ok(PantryItem {
        id: row.get(0)?,
        name: row.get(1)?,
        brand: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        calories: count_column(row, 3)?,
        protein: count_column(row, 4)?,
        carbs: count_column(row, 5)?,
        fat: count_column(row, 6)?,
        servings: count_column(row, 7)?,
    })
}

/// Read a non-negative count. NULL is zero; values outside the `u32` range are
/// clamped so one bad row cannot make the whole table unreadable.
fn count_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<u32> {
    let Some(raw) = row.get::<_, Option<i64>>(idx)? else {
        return Ok(0);
    };
    u32::try_from(raw).or_else(|_| {
        let clamped = if raw < 0 { 0 } else { u32::MAX };
        warn!(column = idx, value = raw, clamped, "pantry count out of range");
        Ok(clamped)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schema::PANTRY_SEED;

    fn holder() -> ConnectionHolder {
        let holder = ConnectionHolder::open_in_memory().unwrap();
        holder.ensure_schema().unwrap();
        holder
    }

    fn oats(servings: u32) -> NewPantryItem {
        NewPantryItem {
            name: "Rolled Oats".to_string(),
            brand: "Quaker".to_string(),
            calories: 150,
            protein: 5,
            carbs: 27,
            fat: 3,
            servings,
        }
    }

    #[test]
    fn add_then_read_round_trips_every_field() {
        let holder = holder();
        let store = PantryStore::new(&holder);

        let added = store.add(oats(4)).unwrap();
        let read = store.read(added.id).unwrap().unwrap();

        assert_eq!(read, added);
        assert_eq!(read.details(), oats(4));
    }

    #[test]
    fn empty_brand_is_kept_as_empty() {
        let holder = holder();
        let store = PantryStore::new(&holder);

        let mut apple = oats(1);
        apple.name = "Apple".to_string();
        apple.brand = String::new();
        let added = store.add(apple).unwrap();

        assert_eq!(store.read(added.id).unwrap().unwrap().brand, "");
    }

    #[test]
    fn blank_name_is_rejected_before_insert() {
        let holder = holder();
        let store = PantryStore::new(&holder);

        let mut item = oats(1);
        item.name = "   ".to_string();
        assert!(matches!(store.add(item), Err(StoreError::InvalidInput(_))));
        assert!(store.read_all().unwrap().is_empty());
    }

    #[test]
    fn read_missing_id_is_none() {
        let holder = holder();
        let store = PantryStore::new(&holder);
        assert_eq!(store.read(42).unwrap(), None);
    }

    #[test]
    fn update_overwrites_all_fields() {
        let holder = holder();
        let store = PantryStore::new(&holder);
        let added = store.add(oats(4)).unwrap();

        let replacement = NewPantryItem {
            name: "Steel Cut Oats".to_string(),
            brand: "Bob's Red Mill".to_string(),
            calories: 170,
            protein: 7,
            carbs: 29,
            fat: 3,
            servings: 0,
        };
        store.update(added.id, replacement.clone()).unwrap();

        let read = store.read(added.id).unwrap().unwrap();
        assert_eq!(read.id, added.id);
        assert_eq!(read.details(), replacement);
    }

    #[test]
    fn update_and_delete_of_unknown_id_succeed_without_changes() {
        let holder = holder();
        let store = PantryStore::new(&holder);
        let added = store.add(oats(2)).unwrap();

        store.update(added.id + 100, oats(9)).unwrap();
        store.delete(added.id + 100).unwrap();

        assert_eq!(store.read_all().unwrap(), vec![added]);
    }

    #[test]
    fn delete_removes_row() {
        let holder = holder();
        let store = PantryStore::new(&holder);
        let added = store.add(oats(2)).unwrap();

        store.delete(added.id).unwrap();
        assert_eq!(store.read(added.id).unwrap(), None);
    }

    #[test]
    fn clear_keeps_schema_usable() {
        let holder = holder();
        let store = PantryStore::new(&holder);
        store.reset().unwrap();

        store.clear().unwrap();
        assert!(store.read_all().unwrap().is_empty());

        let added = store.add(oats(3)).unwrap();
        assert_eq!(store.read_all().unwrap(), vec![added]);
    }

    #[test]
    fn reset_restores_seed_rows_in_order() {
        let holder = holder();
        let store = PantryStore::new(&holder);
        store.add(oats(8)).unwrap();

        store.reset().unwrap();
        let items = store.read_all().unwrap();

        assert_eq!(items.len(), PANTRY_SEED.len());
        for (item, (name, brand, calories, protein, carbs, fat, servings)) in
            items.iter().zip(PANTRY_SEED)
        {
            assert_eq!(item.name, name);
            assert_eq!(item.brand, brand);
            assert_eq!(
                (item.calories, item.protein, item.carbs, item.fat, item.servings),
                (calories, protein, carbs, fat, servings)
            );
        }
        assert_eq!(items[0].id, 1);
    }

    #[test]
    fn reset_creates_missing_table() {
        let holder = ConnectionHolder::open_in_memory().unwrap();
        let store = PantryStore::new(&holder);

        assert!(matches!(store.read_all(), Err(StoreError::Prepare { .. })));
        store.reset().unwrap();
        assert_eq!(store.read_all().unwrap().len(), 12);
    }

    #[test]
    fn read_depleted_filters_on_zero_servings() {
        let holder = holder();
        let store = PantryStore::new(&holder);
        let empty = store.add(oats(0)).unwrap();
        store.add(oats(5)).unwrap();

        assert_eq!(store.read_depleted().unwrap(), vec![empty]);
    }

    #[test]
    fn null_servings_count_as_depleted_everywhere() {
        let holder = holder();
        let store = PantryStore::new(&holder);
        holder
            .connection()
            .unwrap()
            .execute(
                "INSERT INTO pantryitems (FoodName, FoodBrand, Calories, Servings)
                 VALUES ('Honey', NULL, 60, NULL)",
                [],
            )
            .unwrap();

        let all = store.read_all().unwrap();
        assert_eq!(all.len(), 1);
        assert!(all[0].is_depleted());
        assert_eq!(all[0].brand, "");
        assert_eq!(store.read_depleted().unwrap(), all);
    }

    #[test]
    fn out_of_range_counts_are_clamped_instead_of_failing_the_scan() {
        let holder = holder();
        let store = PantryStore::new(&holder);
        let good = store.add(oats(2)).unwrap();
        holder
            .connection()
            .unwrap()
            .execute(
                "INSERT INTO pantryitems
                 (FoodName, FoodBrand, Calories, ProteinGrams, CarbGrams, FatGrams, Servings)
                 VALUES ('Mystery Jar', '', -1, 5000000000, 3, 4, 1)",
                [],
            )
            .unwrap();

        let all = store.read_all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0], good);
        assert_eq!((all[1].calories, all[1].protein), (0, u32::MAX));
        assert_eq!((all[1].carbs, all[1].fat, all[1].servings), (3, 4, 1));
    }

    #[test]
    fn random_is_none_when_empty_and_a_member_otherwise() {
        let holder = holder();
        let store = PantryStore::new(&holder);
        assert_eq!(store.random().unwrap(), None);

        store.reset().unwrap();
        let all = store.read_all().unwrap();
        for _ in 0..20 {
            let pick = store.random().unwrap().unwrap();
            assert!(all.contains(&pick));
        }
    }

    #[test]
    fn closed_holder_surfaces_closed_error() {
        let mut holder = holder();
        holder.close();
        let store = PantryStore::new(&holder);
        assert!(matches!(store.read_all(), Err(StoreError::Closed)));
    }
}
