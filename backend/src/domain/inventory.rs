//! Clinic stock items and low-stock detection.

use chrono::{DateTime, Utc};

use super::InventoryItemId;
use super::validation::{ValidationError, optional_text, required_text};

const NAME_MAX: usize = 100;
const DESCRIPTION_MAX: usize = 1_000;
const UNIT_MAX: usize = 20;

/// Reorder threshold applied when none is supplied.
pub const DEFAULT_THRESHOLD: u32 = 25;

/// Validate an item name.
pub fn item_name(raw: &str) -> Result<String, ValidationError> {
    required_text("name", raw, NAME_MAX)
}

/// Validate an optional description.
pub fn item_description(raw: Option<&str>) -> Result<Option<String>, ValidationError> {
    optional_text("description", raw, DESCRIPTION_MAX)
}

/// Validate an optional unit of measure.
pub fn item_unit(raw: Option<&str>) -> Result<Option<String>, ValidationError> {
    optional_text("unit", raw, UNIT_MAX)
}

/// Validated input for a new stock item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryItemDraft {
    pub name: String,
    pub description: Option<String>,
    pub quantity: u32,
    pub threshold: u32,
    pub unit: Option<String>,
}

/// A stock item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryItem {
    pub id: InventoryItemId,
    pub name: String,
    pub description: Option<String>,
    pub quantity: u32,
    pub threshold: u32,
    pub unit: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl InventoryItem {
    /// Stock has fallen strictly below the reorder threshold.
    #[must_use]
    pub fn is_low_stock(&self) -> bool {
        self.quantity < self.threshold
    }
}

/// Partial stock item update.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InventoryChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub quantity: Option<u32>,
    pub threshold: Option<u32>,
    pub unit: Option<String>,
}

impl InventoryChanges {
    /// Apply supplied fields and stamp `updated_at`.
    pub fn apply_to(self, item: &mut InventoryItem, at: DateTime<Utc>) {
        if let Some(name) = self.name {
            item.name = name;
        }
        if let Some(description) = self.description {
            item.description = Some(description);
        }
        if let Some(quantity) = self.quantity {
            item.quantity = quantity;
        }
        if let Some(threshold) = self.threshold {
            item.threshold = threshold;
        }
        if let Some(unit) = self.unit {
            item.unit = Some(unit);
        }
        item.updated_at = Some(at);
    }
}
