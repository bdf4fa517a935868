//! Pure price arithmetic over the static catalog. No state, no rounding:
//! amounts are exact decimals, display formatting belongs to the caller.

use catalog::{AddOns, Catalog, SizeVariant, TAX_RATE};
use rust_decimal::Decimal;

use crate::{cart::LineItem, error::CartError};

/// Per-unit price for one configured bouquet: the size's table price plus
/// the flat surcharge of every selected add-on.
pub fn unit_price(
    catalog: &Catalog,
    product_id: &str,
    size: SizeVariant,
    add_ons: AddOns,
) -> Result<Decimal, CartError> {
    let product = catalog
        .get(product_id)
        .ok_or_else(|| CartError::UnknownProduct(product_id.to_owned()))?;

    Ok(product.prices.price(size) + add_ons.surcharge())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Totals {
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub grand: Decimal,
}

pub fn cart_totals(items: &[LineItem]) -> Totals {
    let subtotal: Decimal = items.iter().map(LineItem::line_total).sum();
    let tax = subtotal * TAX_RATE;

    Totals {
        subtotal,
        tax,
        grand: subtotal + tax,
    }
}
