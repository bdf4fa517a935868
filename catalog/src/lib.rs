//! Static shop data: the bouquet catalog, size variants, add-on surcharges
//! and the sales tax rate. Nothing in here mutates after startup.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Sales tax applied to the cart subtotal.
pub const TAX_RATE: Decimal = dec!(0.07);

pub const BALLOON_SURCHARGE: Decimal = dec!(5);
pub const CHOCOLATE_SURCHARGE: Decimal = dec!(7);
pub const TEDDY_SURCHARGE: Decimal = dec!(8);

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("invalid bouquet size: {0} stems")]
pub struct InvalidSize(pub u32);

/// Bouquet bundle size. Persisted and displayed as the raw stem count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum SizeVariant {
    Single,
    HalfDozen,
    Dozen,
    TwoDozen,
}

impl SizeVariant {
    pub const ALL: [SizeVariant; 4] = [
        SizeVariant::Single,
        SizeVariant::HalfDozen,
        SizeVariant::Dozen,
        SizeVariant::TwoDozen,
    ];

    pub fn stems(self) -> u32 {
        match self {
            SizeVariant::Single => 1,
            SizeVariant::HalfDozen => 6,
            SizeVariant::Dozen => 12,
            SizeVariant::TwoDozen => 24,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SizeVariant::Single => "single",
            SizeVariant::HalfDozen => "half dozen",
            SizeVariant::Dozen => "dozen",
            SizeVariant::TwoDozen => "two dozen",
        }
    }
}

impl From<SizeVariant> for u32 {
    fn from(size: SizeVariant) -> u32 {
        size.stems()
    }
}

impl TryFrom<u32> for SizeVariant {
    type Error = InvalidSize;

    fn try_from(stems: u32) -> Result<Self, InvalidSize> {
        match stems {
            1 => Ok(SizeVariant::Single),
            6 => Ok(SizeVariant::HalfDozen),
            12 => Ok(SizeVariant::Dozen),
            24 => Ok(SizeVariant::TwoDozen),
            other => Err(InvalidSize(other)),
        }
    }
}

/// A selection of flat-priced extras, attachable to any line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AddOns {
    #[serde(default)]
    pub balloon: bool,
    #[serde(default)]
    pub chocolate: bool,
    #[serde(default)]
    pub teddy: bool,
}

impl AddOns {
    pub const NONE: AddOns = AddOns {
        balloon: false,
        chocolate: false,
        teddy: false,
    };

    pub fn surcharge(self) -> Decimal {
        let mut total = Decimal::ZERO;
        if self.balloon {
            total += BALLOON_SURCHARGE;
        }
        if self.chocolate {
            total += CHOCOLATE_SURCHARGE;
        }
        if self.teddy {
            total += TEDDY_SURCHARGE;
        }
        total
    }

    pub fn labels(self) -> Vec<&'static str> {
        let mut labels = Vec::new();
        if self.balloon {
            labels.push("balloon");
        }
        if self.chocolate {
            labels.push("chocolate");
        }
        if self.teddy {
            labels.push("teddy");
        }
        labels
    }

    pub fn is_empty(self) -> bool {
        !(self.balloon || self.chocolate || self.teddy)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceTable {
    pub single: Decimal,
    pub half_dozen: Decimal,
    pub dozen: Decimal,
    pub two_dozen: Decimal,
}

impl PriceTable {
    pub fn price(&self, size: SizeVariant) -> Decimal {
        match size {
            SizeVariant::Single => self.single,
            SizeVariant::HalfDozen => self.half_dozen,
            SizeVariant::Dozen => self.dozen,
            SizeVariant::TwoDozen => self.two_dozen,
        }
    }

    /// Lowest listed price, shown as "from $X" on the product card.
    pub fn starting_at(&self) -> Decimal {
        self.single
    }
}

#[derive(Debug, Clone)]
pub struct Product {
    pub id: &'static str,
    pub name: &'static str,
    /// Display asset reference, resolved by the presentation layer.
    pub image_ref: &'static str,
    pub prices: PriceTable,
}

#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// The fixed shop lineup, display order significant.
    pub fn standard() -> Self {
        Self {
            products: vec![
                Product {
                    id: "tulips",
                    name: "Tulips",
                    image_ref: "img/tulips.jpg",
                    prices: table(dec!(5), dec!(20), dec!(40), dec!(60)),
                },
                Product {
                    id: "red_roses",
                    name: "Red Roses",
                    image_ref: "img/red_roses.jpg",
                    prices: table(dec!(5), dec!(20), dec!(40), dec!(60)),
                },
                Product {
                    id: "yellow_roses",
                    name: "Yellow Roses",
                    image_ref: "img/yellow_roses.jpg",
                    prices: table(dec!(5), dec!(20), dec!(40), dec!(60)),
                },
                Product {
                    id: "lilies",
                    name: "Lilies",
                    image_ref: "img/lilies.jpg",
                    prices: table(dec!(6), dec!(24), dec!(48), dec!(72)),
                },
                Product {
                    id: "daisies",
                    name: "Daisies",
                    image_ref: "img/daisies.jpg",
                    prices: table(dec!(5), dec!(20), dec!(40), dec!(60)),
                },
                Product {
                    id: "corsages",
                    name: "Corsages",
                    image_ref: "img/corsages.jpg",
                    prices: table(dec!(15), dec!(60), dec!(120), dec!(180)),
                },
            ],
        }
    }

    pub fn get(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}

fn table(single: Decimal, half_dozen: Decimal, dozen: Decimal, two_dozen: Decimal) -> PriceTable {
    PriceTable {
        single,
        half_dozen,
        dozen,
        two_dozen,
    }
}
