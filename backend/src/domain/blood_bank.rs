//! Blood bank aggregate.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{Inventory, Location};

/// Stable bank identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BloodBankId(Uuid);

impl BloodBankId {
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for BloodBankId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for BloodBankId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

impl Serialize for BloodBankId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&self.0)
    }
}

/// Named, located facility holding an [`Inventory`].
///
/// ## Invariants
/// - `name` is unique across banks.
/// - `inventory` always carries all eight counters.
///
/// Banks are created by seeding and never deleted. Only repository adapters
/// mutate the inventory, through [`Inventory::apply`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BloodBank {
    #[schema(value_type = String, example = "0b7a6c1e-4c3f-4b9e-9a55-7f0f3f2d1c11")]
    id: BloodBankId,
    #[schema(example = "Central")]
    name: String,
    #[schema(value_type = String, example = "Downtown")]
    location: Location,
    #[schema(value_type = Object)]
    inventory: Inventory,
}

impl BloodBank {
    pub fn new(
        id: BloodBankId,
        name: impl Into<String>,
        location: Location,
        inventory: Inventory,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            location,
            inventory,
        }
    }

    pub fn id(&self) -> BloodBankId {
        self.id
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// Mutable access for adapters that hold the bank's lock.
    pub fn inventory_mut(&mut self) -> &mut Inventory {
        &mut self.inventory
    }
}

/// Seed definition for a default bank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BankSeed {
    pub name: &'static str,
    pub location: &'static str,
}

/// Banks created at start-up when seeding is enabled.
pub const DEFAULT_BANKS: [BankSeed; 4] = [
    BankSeed {
        name: "Central",
        location: "Downtown",
    },
    BankSeed {
        name: "North",
        location: "North",
    },
    BankSeed {
        name: "South",
        location: "South",
    },
    BankSeed {
        name: "East Side",
        location: "East",
    },
];
