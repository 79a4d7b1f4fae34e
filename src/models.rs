//! Domain records that mirror the two SQLite tables plus the simplified recipe
//! shape returned by the search API. These stay plain data holders: every
//! value handed back by a store is an owned copy with no tie to the
//! connection it came from.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// A row of the `pantryitems` table.
pub struct PantryItem {
    /// Surrogate key assigned by SQLite on insert. Never changes afterwards.
    pub id: i64,
    pub name: String,
    /// May be empty for unbranded produce.
    pub brand: String,
    /// Nutrition is stored per serving.
    pub calories: u32,
    pub protein: u32,
    pub carbs: u32,
    pub fat: u32,
    /// Servings remaining in stock. Zero means the item is depleted.
    pub servings: u32,
}

impl PantryItem {
    /// True when no servings are left, which makes the row eligible for the
    /// shopping list transfer.
    pub fn is_depleted(&self) -> bool {
        self.servings == 0
    }

    /// Editable view of the row, handy for edit forms that tweak one field and
    /// write the whole record back through `PantryStore::update`.
    pub fn details(&self) -> NewPantryItem {
        NewPantryItem {
            name: self.name.clone(),
            brand: self.brand.clone(),
            calories: self.calories,
            protein: self.protein,
            carbs: self.carbs,
            fat: self.fat,
            servings: self.servings,
        }
    }
}

impl fmt::Display for PantryItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.brand.trim().is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{} ({})", self.name, self.brand)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Field set used when inserting or overwriting a pantry row. The id is
/// omitted because SQLite assigns it.
pub struct NewPantryItem {
    pub name: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub calories: u32,
    #[serde(default)]
    pub protein: u32,
    #[serde(default)]
    pub carbs: u32,
    #[serde(default)]
    pub fat: u32,
    #[serde(default)]
    pub servings: u32,
}

impl NewPantryItem {
    /// Attach a store-assigned id, producing the record as it now exists.
    pub(crate) fn with_id(self, id: i64) -> PantryItem {
        PantryItem {
            id,
            name: self.name,
            brand: self.brand,
            calories: self.calories,
            protein: self.protein,
            carbs: self.carbs,
            fat: self.fat,
            servings: self.servings,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// A row of the `ShoppingItems` table.
pub struct ShoppingListItem {
    pub id: i64,
    /// What to buy.
    pub name: String,
    /// Desired purchase count, stored as a plain SQLite integer.
    pub quantity: i64,
}

impl fmt::Display for ShoppingListItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x{}", self.name, self.quantity)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewShoppingListItem {
    pub name: String,
    pub quantity: i64,
}

impl NewShoppingListItem {
    pub(crate) fn with_id(self, id: i64) -> ShoppingListItem {
        ShoppingListItem {
            id,
            name: self.name,
            quantity: self.quantity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// The three recipe fields the app actually displays.
pub struct RecipeSummary {
    pub label: String,
    #[serde(rename = "ingredientLines")]
    pub ingredient_lines: Vec<String>,
    pub url: String,
}
