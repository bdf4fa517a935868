//! The cart store: an ordered line-item sequence behind a narrow mutation
//! API. Every mutation is followed by a full rewrite of the durable slot;
//! loading tolerates anything the slot throws at it.

use catalog::{AddOns, Catalog, SizeVariant};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    error::CartError,
    pricing::{self, Totals},
    storage::CartSlot,
};

/// Gift notes are truncated, never rejected.
pub const NOTE_LIMIT: usize = 100;

const SCHEMA_VERSION: u32 = 1;

/// One configured, quantified entry in the cart. `unit_price` is computed
/// at creation and frozen; changing add-ons means adding a new line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub line_id: u64,
    pub product_id: String,
    #[serde(rename = "sizeVariant")]
    pub size: SizeVariant,
    pub note: String,
    #[serde(flatten)]
    pub add_ons: AddOns,
    pub quantity: u32,
    pub unit_price: Decimal,
}

impl LineItem {
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

#[derive(Serialize)]
struct SnapshotRef<'a> {
    version: u32,
    items: &'a [LineItem],
}

#[derive(Deserialize)]
struct Snapshot {
    version: u32,
    items: Vec<LineItem>,
}

pub struct CartStore {
    catalog: Catalog,
    slot: Box<dyn CartSlot>,
    items: Vec<LineItem>,
    next_line_id: u64,
}

impl CartStore {
    /// Opens the cart from the slot. Absent, malformed or version-mismatched
    /// content starts an empty cart; a broken slot never blocks the shop.
    pub fn open(catalog: Catalog, slot: Box<dyn CartSlot>) -> Self {
        let items = load_items(slot.as_ref());
        let next_line_id = items.iter().map(|i| i.line_id).max().unwrap_or(0) + 1;

        Self {
            catalog,
            slot,
            items,
            next_line_id,
        }
    }

    /// Appends a new line item, never merging with an existing one, and
    /// persists. Quantity is clamped to at least 1, the note trimmed and
    /// truncated to [`NOTE_LIMIT`] characters.
    pub fn add_item(
        &mut self,
        product_id: &str,
        size: SizeVariant,
        note: &str,
        add_ons: AddOns,
        quantity: u32,
    ) -> Result<LineItem, CartError> {
        let unit_price = pricing::unit_price(&self.catalog, product_id, size, add_ons)?;

        let item = LineItem {
            line_id: self.next_line_id,
            product_id: product_id.to_owned(),
            size,
            note: clip_note(note),
            add_ons,
            quantity: quantity.max(1),
            unit_price,
        };
        self.next_line_id += 1;

        self.items.push(item.clone());
        self.persist()?;
        Ok(item)
    }

    /// Adjusts a line's quantity by `delta`, clamped so it never drops
    /// below 1. Unknown line ids are silently ignored.
    pub fn change_quantity(&mut self, line_id: u64, delta: i64) -> Result<(), CartError> {
        let Some(item) = self.items.iter_mut().find(|i| i.line_id == line_id) else {
            debug!("change_quantity on unknown line {line_id}, ignoring");
            return Ok(());
        };

        let quantity = i64::from(item.quantity)
            .saturating_add(delta)
            .clamp(1, i64::from(u32::MAX));
        item.quantity = quantity as u32;

        self.persist()
    }

    /// Removes the matching line if present; absent ids are ignored.
    pub fn remove_item(&mut self, line_id: u64) -> Result<(), CartError> {
        self.items.retain(|i| i.line_id != line_id);
        self.persist()
    }

    pub fn clear(&mut self) -> Result<(), CartError> {
        self.items.clear();
        self.persist()
    }

    /// Final totals for a non-empty cart, which is then emptied and
    /// persisted. An empty cart reports [`CartError::EmptyCart`] with no
    /// state change.
    pub fn checkout(&mut self) -> Result<Totals, CartError> {
        if self.items.is_empty() {
            return Err(CartError::EmptyCart);
        }

        let totals = self.totals();
        self.items.clear();
        self.persist()?;
        Ok(totals)
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn totals(&self) -> Totals {
        pricing::cart_totals(&self.items)
    }

    /// Total unit count across all lines, shown on the cart badge.
    pub fn total_quantity(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    fn persist(&mut self) -> Result<(), CartError> {
        let payload = serde_json::to_string(&SnapshotRef {
            version: SCHEMA_VERSION,
            items: &self.items,
        })?;
        self.slot.write(&payload)?;
        Ok(())
    }
}

fn load_items(slot: &dyn CartSlot) -> Vec<LineItem> {
    let raw = match slot.read() {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            warn!("failed to read saved cart, starting empty: {e}");
            return Vec::new();
        }
    };

    let snapshot: Snapshot = match serde_json::from_str(&raw) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            warn!("discarding unreadable saved cart: {e}");
            return Vec::new();
        }
    };

    if snapshot.version != SCHEMA_VERSION {
        warn!(
            "discarding saved cart with unsupported version {}",
            snapshot.version
        );
        return Vec::new();
    }

    let mut items = snapshot.items;
    for item in &mut items {
        // quantity >= 1 holds even for a hand-edited slot
        item.quantity = item.quantity.max(1);
    }
    items
}

fn clip_note(note: &str) -> String {
    note.trim().chars().take(NOTE_LIMIT).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemorySlot;
    use rust_decimal_macros::dec;

    fn open_store() -> (CartStore, MemorySlot) {
        let slot = MemorySlot::new();
        let store = CartStore::open(Catalog::standard(), Box::new(slot.clone()));
        (store, slot)
    }

    fn balloon() -> AddOns {
        AddOns {
            balloon: true,
            ..AddOns::NONE
        }
    }

    #[test]
    fn fresh_store_is_empty() {
        let (store, _slot) = open_store();
        assert!(store.is_empty());
        assert_eq!(store.total_quantity(), 0);
        assert_eq!(store.totals().grand, Decimal::ZERO);
    }

    #[test]
    fn identical_adds_never_merge() {
        let (mut store, _slot) = open_store();
        let first = store
            .add_item("tulips", SizeVariant::HalfDozen, "", balloon(), 1)
            .expect("add");
        let second = store
            .add_item("tulips", SizeVariant::HalfDozen, "", balloon(), 1)
            .expect("add");

        assert_eq!(store.items().len(), 2);
        assert_ne!(first.line_id, second.line_id);
        assert_eq!(first.unit_price, second.unit_price);
    }

    #[test]
    fn add_clamps_zero_quantity_to_one() {
        let (mut store, _slot) = open_store();
        let item = store
            .add_item("daisies", SizeVariant::Single, "", AddOns::NONE, 0)
            .expect("add");
        assert_eq!(item.quantity, 1);
    }

    #[test]
    fn add_rejects_unknown_product_without_persisting() {
        let (mut store, slot) = open_store();
        let err = store
            .add_item("orchids", SizeVariant::Single, "", AddOns::NONE, 1)
            .unwrap_err();

        assert!(matches!(err, CartError::UnknownProduct(_)));
        assert!(store.is_empty());
        assert_eq!(slot.read().expect("readable"), None);
    }

    #[test]
    fn note_is_trimmed_and_clipped() {
        let (mut store, _slot) = open_store();
        let long = format!("  {}  ", "x".repeat(140));
        let item = store
            .add_item("lilies", SizeVariant::Dozen, &long, AddOns::NONE, 1)
            .expect("add");

        assert_eq!(item.note.chars().count(), NOTE_LIMIT);
        assert!(!item.note.starts_with(' '));
    }

    #[test]
    fn change_quantity_clamps_at_one() {
        let (mut store, _slot) = open_store();
        let item = store
            .add_item("tulips", SizeVariant::Single, "", AddOns::NONE, 2)
            .expect("add");

        store.change_quantity(item.line_id, -100).expect("change");
        assert_eq!(store.items()[0].quantity, 1);

        store.change_quantity(item.line_id, 3).expect("change");
        assert_eq!(store.items()[0].quantity, 4);
    }

    #[test]
    fn change_quantity_on_unknown_line_is_a_noop() {
        let (mut store, _slot) = open_store();
        store
            .add_item("tulips", SizeVariant::Single, "", AddOns::NONE, 2)
            .expect("add");

        store.change_quantity(999, 5).expect("noop");
        assert_eq!(store.items()[0].quantity, 2);
    }

    #[test]
    fn remove_item_and_remove_of_absent_line() {
        let (mut store, _slot) = open_store();
        let keep = store
            .add_item("tulips", SizeVariant::Single, "", AddOns::NONE, 1)
            .expect("add");
        let drop = store
            .add_item("daisies", SizeVariant::Single, "", AddOns::NONE, 1)
            .expect("add");

        store.remove_item(drop.line_id).expect("remove");
        assert_eq!(store.items().len(), 1);
        assert_eq!(store.items()[0].line_id, keep.line_id);

        store.remove_item(999).expect("noop");
        assert_eq!(store.items().len(), 1);
    }

    #[test]
    fn clear_persists_an_empty_item_array() {
        let (mut store, slot) = open_store();
        store
            .add_item("corsages", SizeVariant::Single, "", AddOns::NONE, 2)
            .expect("add");
        store.clear().expect("clear");

        assert!(store.is_empty());
        assert_eq!(store.totals().subtotal, Decimal::ZERO);

        let raw = slot.read().expect("readable").expect("persisted");
        let value: serde_json::Value = serde_json::from_str(&raw).expect("valid json");
        assert_eq!(value["version"], 1);
        assert_eq!(value["items"].as_array().expect("array").len(), 0);
    }

    #[test]
    fn round_trip_preserves_order_and_fields() {
        let (mut store, slot) = open_store();
        store
            .add_item(
                "tulips",
                SizeVariant::HalfDozen,
                "happy birthday",
                balloon(),
                2,
            )
            .expect("add");
        store
            .add_item(
                "corsages",
                SizeVariant::Single,
                "",
                AddOns {
                    teddy: true,
                    ..AddOns::NONE
                },
                3,
            )
            .expect("add");

        let reopened = CartStore::open(Catalog::standard(), Box::new(slot.clone()));
        assert_eq!(reopened.items(), store.items());
        assert_eq!(reopened.totals(), store.totals());
    }

    #[test]
    fn line_ids_stay_unique_across_reload() {
        let (mut store, slot) = open_store();
        store
            .add_item("tulips", SizeVariant::Single, "", AddOns::NONE, 1)
            .expect("add");
        store
            .add_item("daisies", SizeVariant::Single, "", AddOns::NONE, 1)
            .expect("add");

        let mut reopened = CartStore::open(Catalog::standard(), Box::new(slot.clone()));
        let third = reopened
            .add_item("lilies", SizeVariant::Single, "", AddOns::NONE, 1)
            .expect("add");

        let mut ids: Vec<u64> = reopened.items().iter().map(|i| i.line_id).collect();
        assert_eq!(ids.len(), 3);
        ids.dedup();
        assert_eq!(ids.len(), 3);
        assert_eq!(third.line_id, 3);
    }

    #[test]
    fn corrupt_payload_loads_as_empty() {
        let mut slot = MemorySlot::new();
        slot.write("definitely not json").expect("writable");

        let store = CartStore::open(Catalog::standard(), Box::new(slot));
        assert!(store.is_empty());
    }

    #[test]
    fn version_mismatch_loads_as_empty() {
        let mut slot = MemorySlot::new();
        slot.write("{\"version\":2,\"items\":[]}").expect("writable");

        let store = CartStore::open(Catalog::standard(), Box::new(slot));
        assert!(store.is_empty());
    }

    #[test]
    fn tampered_quantity_is_clamped_on_load() {
        let (mut store, slot) = open_store();
        store
            .add_item("tulips", SizeVariant::Single, "", AddOns::NONE, 2)
            .expect("add");

        let raw = slot.read().expect("readable").expect("persisted");
        let mut slot = MemorySlot::new();
        slot.write(&raw.replace("\"quantity\":2", "\"quantity\":0"))
            .expect("writable");

        let reopened = CartStore::open(Catalog::standard(), Box::new(slot));
        assert_eq!(reopened.items()[0].quantity, 1);
    }

    #[test]
    fn checkout_of_empty_cart_is_benign() {
        let (mut store, slot) = open_store();
        let err = store.checkout().unwrap_err();
        assert!(matches!(err, CartError::EmptyCart));
        assert_eq!(slot.read().expect("readable"), None);
    }

    #[test]
    fn checkout_reports_totals_then_empties() {
        let (mut store, slot) = open_store();
        store
            .add_item("tulips", SizeVariant::HalfDozen, "", balloon(), 2)
            .expect("add");

        let totals = store.checkout().expect("checkout");
        assert_eq!(totals.grand, dec!(53.50));
        assert!(store.is_empty());

        let raw = slot.read().expect("readable").expect("persisted");
        let value: serde_json::Value = serde_json::from_str(&raw).expect("valid json");
        assert_eq!(value["items"].as_array().expect("array").len(), 0);
    }

    #[test]
    fn persisted_layout_uses_the_documented_field_names() {
        let (mut store, slot) = open_store();
        store
            .add_item("tulips", SizeVariant::HalfDozen, "hi", balloon(), 2)
            .expect("add");

        let raw = slot.read().expect("readable").expect("persisted");
        let value: serde_json::Value = serde_json::from_str(&raw).expect("valid json");
        let item = &value["items"][0];

        assert_eq!(item["lineId"], 1);
        assert_eq!(item["productId"], "tulips");
        assert_eq!(item["sizeVariant"], 6);
        assert_eq!(item["note"], "hi");
        assert_eq!(item["balloon"], true);
        assert_eq!(item["chocolate"], false);
        assert_eq!(item["teddy"], false);
        assert_eq!(item["quantity"], 2);
    }
}
