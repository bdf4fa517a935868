//! Core of the petal flower shop.
//!
//! The cart store owns the ordered line-item sequence and is the only
//! mutation surface; every mutation ends with a full rewrite of the durable
//! slot. Pricing is pure arithmetic over the static catalog. The
//! presentation layer renders from `items()` and `totals()` and re-renders
//! after every mutation returns; it owns markup, formatting and asset
//! resolution, none of which live here.

pub mod cart;
pub mod config;
pub mod error;
pub mod pricing;
pub mod storage;

pub use cart::{CartStore, LineItem};
pub use config::Config;
pub use error::CartError;
pub use pricing::{Totals, cart_totals, unit_price};
pub use storage::{CartSlot, FileSlot, MemorySlot};
