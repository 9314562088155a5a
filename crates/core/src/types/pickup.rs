//! Pickup location enumeration.
//!
//! Orders are fulfilled by pickup or local delivery. The commerce backend
//! identifies locations by small integer ids, fixed at:
//!
//! | id | location |
//! |----|----------|
//! | 1  | Farm pickup (Mount Airy, NC) |
//! | 2  | Farmers market |
//! | 3  | Delivery (contact for details) |

use serde::{Deserialize, Serialize};

/// Error returned when an integer does not map to a known pickup location.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("unknown pickup location id: {0}")]
pub struct PickupLocationError(pub i32);

/// Fulfillment option chosen at checkout.
///
/// Serialized as its integer id on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(try_from = "i32", into = "i32")]
pub enum PickupLocation {
    /// Pickup at the farm in Mount Airy, NC.
    #[default]
    FarmPickup,
    /// Pickup at the farmers market stand.
    FarmersMarket,
    /// Local delivery, arranged by contact.
    Delivery,
}

impl PickupLocation {
    /// All selectable locations, in display order.
    pub const ALL: [Self; 3] = [Self::FarmPickup, Self::FarmersMarket, Self::Delivery];

    /// The backend's integer id for this location.
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        match self {
            Self::FarmPickup => 1,
            Self::FarmersMarket => 2,
            Self::Delivery => 3,
        }
    }

    /// Human-readable label for checkout forms.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::FarmPickup => "Farm Pickup - Mount Airy, NC",
            Self::FarmersMarket => "Farmers Market",
            Self::Delivery => "Delivery (contact for details)",
        }
    }
}

impl TryFrom<i32> for PickupLocation {
    type Error = PickupLocationError;

    fn try_from(id: i32) -> Result<Self, Self::Error> {
        match id {
            1 => Ok(Self::FarmPickup),
            2 => Ok(Self::FarmersMarket),
            3 => Ok(Self::Delivery),
            other => Err(PickupLocationError(other)),
        }
    }
}

impl From<PickupLocation> for i32 {
    fn from(location: PickupLocation) -> Self {
        location.as_i32()
    }
}
