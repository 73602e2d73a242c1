//! Classification values for market orders
//!
//! An order is quoted in a primary [`Currency`] and classified along at most
//! one axis: the good it sells, the currency it sells, or the class of
//! property it sells.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Currencies issued by the central banks of the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Currency {
    Euro,
    UsDollar,
    Yen,
}

impl Currency {
    pub const ALL: [Currency; 3] = [Currency::Euro, Currency::UsDollar, Currency::Yen];

    /// ISO 4217 code
    pub fn iso_code(&self) -> &'static str {
        match self {
            Currency::Euro => "EUR",
            Currency::UsDollar => "USD",
            Currency::Yen => "JPY",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.iso_code())
    }
}

/// Goods produced and consumed by agents
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GoodType {
    LabourHour,
    KiloWatt,
    Wheat,
    Coal,
    Iron,
    Cotton,
    Clothing,
    Steel,
    Machine,
    RealEstate,
}

impl GoodType {
    pub const ALL: [GoodType; 10] = [
        GoodType::LabourHour,
        GoodType::KiloWatt,
        GoodType::Wheat,
        GoodType::Coal,
        GoodType::Iron,
        GoodType::Cotton,
        GoodType::Clothing,
        GoodType::Steel,
        GoodType::Machine,
        GoodType::RealEstate,
    ];
}

impl fmt::Display for GoodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Classes of tradeable property
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PropertyClass {
    Share,
    FixedRateBond,
    ZeroCouponBond,
}

impl fmt::Display for PropertyClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// The single classification tag an order may carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "axis", content = "value")]
pub enum Classification {
    #[serde(rename = "GOOD_TYPE")]
    GoodType(GoodType),
    #[serde(rename = "CURRENCY")]
    Currency(Currency),
    #[serde(rename = "PROPERTY")]
    Property(PropertyClass),
}

impl From<GoodType> for Classification {
    fn from(good_type: GoodType) -> Self {
        Classification::GoodType(good_type)
    }
}

impl From<Currency> for Classification {
    fn from(currency: Currency) -> Self {
        Classification::Currency(currency)
    }
}

impl From<PropertyClass> for Classification {
    fn from(property_class: PropertyClass) -> Self {
        Classification::Property(property_class)
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Classification::GoodType(g) => write!(f, "good:{}", g),
            Classification::Currency(c) => write!(f, "currency:{}", c),
            Classification::Property(p) => write!(f, "property:{}", p),
        }
    }
}
