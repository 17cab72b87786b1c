use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use medstock_core::{DomainError, DomainResult, Entity, ItemId};

/// Attributes shared by every inventory artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDetails {
    id: ItemId,
    name: String,
    /// Free-text classification label (e.g. "Painkiller").
    item_type: String,
    unit_price: Decimal,
}

impl ItemDetails {
    /// Validated constructor: non-empty name, non-negative unit price.
    pub fn new(
        name: impl Into<String>,
        item_type: impl Into<String>,
        unit_price: Decimal,
    ) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("item name cannot be empty"));
        }
        if unit_price.is_sign_negative() && !unit_price.is_zero() {
            return Err(DomainError::validation(format!(
                "unit price of '{name}' cannot be negative (got {unit_price})"
            )));
        }
        Ok(Self {
            id: ItemId::new(),
            name,
            item_type: item_type.into(),
            unit_price,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn item_type(&self) -> &str {
        &self.item_type
    }

    pub fn unit_price(&self) -> Decimal {
        self.unit_price
    }
}

impl Entity for ItemDetails {
    type Id = ItemId;

    fn id(&self) -> &ItemId {
        &self.id
    }
}

/// What makes a consumable a medicine, serum or vaccine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ConsumableKind {
    /// Form is free text: tablet, capsule, syrup, ...
    Medicine { form: String },
    Serum { capacity_ml: f64 },
    Vaccine { dosage_ml: f64 },
}

impl ConsumableKind {
    pub fn label(&self) -> &'static str {
        match self {
            ConsumableKind::Medicine { .. } => "Medicine",
            ConsumableKind::Serum { .. } => "Serum",
            ConsumableKind::Vaccine { .. } => "Vaccine",
        }
    }
}

/// An artifact depleted by use; tracked through a stock record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Consumable {
    details: ItemDetails,
    kind: ConsumableKind,
}

impl Consumable {
    pub fn medicine(
        name: impl Into<String>,
        item_type: impl Into<String>,
        unit_price: Decimal,
        form: impl Into<String>,
    ) -> DomainResult<Self> {
        Ok(Self {
            details: ItemDetails::new(name, item_type, unit_price)?,
            kind: ConsumableKind::Medicine { form: form.into() },
        })
    }

    pub fn serum(
        name: impl Into<String>,
        item_type: impl Into<String>,
        unit_price: Decimal,
        capacity_ml: f64,
    ) -> DomainResult<Self> {
        let details = ItemDetails::new(name, item_type, unit_price)?;
        ensure_positive(&details, "capacity", capacity_ml)?;
        Ok(Self {
            details,
            kind: ConsumableKind::Serum { capacity_ml },
        })
    }

    pub fn vaccine(
        name: impl Into<String>,
        item_type: impl Into<String>,
        unit_price: Decimal,
        dosage_ml: f64,
    ) -> DomainResult<Self> {
        let details = ItemDetails::new(name, item_type, unit_price)?;
        ensure_positive(&details, "dosage", dosage_ml)?;
        Ok(Self {
            details,
            kind: ConsumableKind::Vaccine { dosage_ml },
        })
    }

    pub fn details(&self) -> &ItemDetails {
        &self.details
    }

    pub fn kind(&self) -> &ConsumableKind {
        &self.kind
    }

    pub fn name(&self) -> &str {
        self.details.name()
    }

    pub fn item_type(&self) -> &str {
        self.details.item_type()
    }

    pub fn unit_price(&self) -> Decimal {
        self.details.unit_price()
    }
}

impl Entity for Consumable {
    type Id = ItemId;

    fn id(&self) -> &ItemId {
        &self.details.id
    }
}

fn ensure_positive(details: &ItemDetails, what: &str, value: f64) -> DomainResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(DomainError::validation(format!(
            "{what} of '{}' must be a positive number of ml (got {value})",
            details.name
        )))
    }
}

/// Any inventory artifact: a consumable, or the descriptor of a reusable device.
///
/// Devices carry runtime state elsewhere; here they are only described.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "lowercase")]
pub enum Item {
    Consumable(Consumable),
    Device(ItemDetails),
}

impl Item {
    pub fn details(&self) -> &ItemDetails {
        match self {
            Item::Consumable(c) => &c.details,
            Item::Device(d) => d,
        }
    }

    pub fn name(&self) -> &str {
        self.details().name()
    }

    pub fn item_type(&self) -> &str {
        self.details().item_type()
    }

    pub fn unit_price(&self) -> Decimal {
        self.details().unit_price()
    }

    /// Concrete variant name ("Medicine", "Serum", "Vaccine", "Device").
    pub fn variant(&self) -> &'static str {
        match self {
            Item::Consumable(c) => c.kind.label(),
            Item::Device(_) => "Device",
        }
    }

    pub fn as_consumable(&self) -> Option<&Consumable> {
        match self {
            Item::Consumable(c) => Some(c),
            Item::Device(_) => None,
        }
    }
}

impl Entity for Item {
    type Id = ItemId;

    fn id(&self) -> &ItemId {
        &self.details().id
    }
}

impl From<Consumable> for Item {
    fn from(value: Consumable) -> Self {
        Item::Consumable(value)
    }
}

impl core::fmt::Display for Item {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} ({})", self.name(), self.variant())
    }
}
