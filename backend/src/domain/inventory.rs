//! Per-bank blood unit counters and the ledger rules that mutate them.
//!
//! [`Inventory`] is a plain value: it knows how a donation or a request
//! changes the counts, but not how to make that change atomic. Repository
//! adapters load an inventory under a per-bank lock, call
//! [`Inventory::donate`] or [`Inventory::request`] on a copy, and persist the
//! copy together with the ledger record before releasing the lock.

use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use super::BloodType;

/// Errors raised while building or mutating an [`Inventory`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InventoryError {
    /// A persisted counter was negative.
    #[error("{blood_type} units must not be negative (got {value})")]
    NegativeUnits { blood_type: BloodType, value: i64 },
    /// A counter cannot be represented by the storage column.
    #[error("{blood_type} units exceed the storable maximum of {max}")]
    UnitsOverflow { blood_type: BloodType, max: u32 },
}

/// Largest count a counter may hold; matches a PostgreSQL `INTEGER` column.
pub const MAX_UNITS: u32 = i32::MAX as u32;

/// Result of a `request` against one counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Fulfilment {
    /// A unit was available and has been taken.
    Fulfilled,
    /// The counter was already zero; nothing changed.
    Unfulfilled,
}

impl Fulfilment {
    pub fn is_fulfilled(self) -> bool {
        matches!(self, Self::Fulfilled)
    }
}

impl From<Fulfilment> for bool {
    fn from(value: Fulfilment) -> Self {
        value.is_fulfilled()
    }
}

/// Unit counts for all eight blood types.
///
/// ## Invariants
/// - Every [`BloodType`] has an entry (enforced by the fixed-size array).
/// - Counts are never negative and never exceed [`MAX_UNITS`].
///
/// # Examples
/// ```
/// use saveablood::domain::{BloodType, Fulfilment, Inventory};
///
/// let mut inventory = Inventory::empty();
/// inventory.donate(BloodType::ONegative).expect("room for one more");
/// assert_eq!(inventory.request(BloodType::ONegative), Fulfilment::Fulfilled);
/// assert_eq!(inventory.request(BloodType::ONegative), Fulfilment::Unfulfilled);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Inventory {
    units: [u32; 8],
}

impl Inventory {
    /// An inventory with every counter at zero.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build an inventory from explicit counts; types not listed start at 0.
    pub fn from_counts(
        counts: impl IntoIterator<Item = (BloodType, u32)>,
    ) -> Result<Self, InventoryError> {
        let mut inventory = Self::empty();
        for (blood_type, units) in counts {
            if units > MAX_UNITS {
                return Err(InventoryError::UnitsOverflow {
                    blood_type,
                    max: MAX_UNITS,
                });
            }
            inventory.units[blood_type.index()] = units;
        }
        Ok(inventory)
    }

    /// Build an inventory from storage columns ordered as [`BloodType::ALL`].
    pub fn from_columns(columns: [i32; 8]) -> Result<Self, InventoryError> {
        let mut units = [0_u32; 8];
        for (blood_type, value) in BloodType::ALL.into_iter().zip(columns) {
            units[blood_type.index()] =
                u32::try_from(value).map_err(|_| InventoryError::NegativeUnits {
                    blood_type,
                    value: i64::from(value),
                })?;
        }
        Ok(Self { units })
    }

    /// Counts as storage columns ordered as [`BloodType::ALL`].
    pub fn to_columns(&self) -> [i32; 8] {
        // MAX_UNITS keeps every count inside i32.
        self.units.map(|units| i32::try_from(units).unwrap_or(i32::MAX))
    }

    /// Current count for one blood type.
    pub fn units(&self, blood_type: BloodType) -> u32 {
        self.units[blood_type.index()]
    }

    /// Add one donated unit. Donations have no business upper bound; only the
    /// storage limit can refuse one.
    pub fn donate(&mut self, blood_type: BloodType) -> Result<u32, InventoryError> {
        let slot = &mut self.units[blood_type.index()];
        if *slot >= MAX_UNITS {
            return Err(InventoryError::UnitsOverflow {
                blood_type,
                max: MAX_UNITS,
            });
        }
        *slot += 1;
        Ok(*slot)
    }

    /// Take one unit if any is available.
    ///
    /// An empty counter is a normal outcome, not an error: the request is
    /// reported as [`Fulfilment::Unfulfilled`] and the counter stays at zero.
    pub fn request(&mut self, blood_type: BloodType) -> Fulfilment {
        let slot = &mut self.units[blood_type.index()];
        if *slot == 0 {
            return Fulfilment::Unfulfilled;
        }
        *slot -= 1;
        Fulfilment::Fulfilled
    }

    /// All eight counts keyed by type, in canonical order.
    pub fn snapshot(&self) -> BTreeMap<BloodType, u32> {
        BloodType::ALL
            .into_iter()
            .map(|blood_type| (blood_type, self.units(blood_type)))
            .collect()
    }

    /// Iterate `(type, count)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (BloodType, u32)> + '_ {
        BloodType::ALL
            .into_iter()
            .map(|blood_type| (blood_type, self.units(blood_type)))
    }
}

/// Serialises as a JSON object keyed by type label, e.g. `{"O-": 3, ...}`.
impl Serialize for Inventory {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(BloodType::ALL.len()))?;
        for (blood_type, units) in self.iter() {
            map.serialize_entry(blood_type.label(), &units)?;
        }
        map.end()
    }
}
