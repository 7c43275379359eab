//! Order lifecycle domain types.
//!
//! ```text
//! pending -> confirmed -> preparing -> ready -> picked_up          (pickup)
//!                                         \-> out_for_delivery -> delivered   (delivery)
//! any non-terminal state -> cancelled | refused
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How the customer receives the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryType {
    Pickup,
    Delivery,
}

impl fmt::Display for DeliveryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pickup => "pickup",
            Self::Delivery => "delivery",
        })
    }
}

impl FromStr for DeliveryType {
    type Err = UnknownOrderValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pickup" => Ok(Self::Pickup),
            "delivery" => Ok(Self::Delivery),
            other => Err(UnknownOrderValue(other.to_owned())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Preparing,
    Ready,
    PickedUp,
    OutForDelivery,
    Delivered,
    Cancelled,
    Refused,
}

/// Transition requested by a restaurant (or by the customer, for cancel).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderAction {
    Confirm,
    StartPreparing,
    MarkReady,
    PickUp,
    Dispatch,
    Deliver,
    Cancel,
    Refuse,
}

/// Error returned when a stored or submitted string is not a known variant.
#[derive(Debug, Error)]
#[error("unknown order value: {0:?}")]
pub struct UnknownOrderValue(pub String);

impl OrderStatus {
    pub const ALL: [OrderStatus; 9] = [
        Self::Pending,
        Self::Confirmed,
        Self::Preparing,
        Self::Ready,
        Self::PickedUp,
        Self::OutForDelivery,
        Self::Delivered,
        Self::Cancelled,
        Self::Refused,
    ];

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Delivered | Self::PickedUp | Self::Cancelled | Self::Refused
        )
    }

    /// Statuses an order can still move out of.
    pub fn active() -> impl Iterator<Item = OrderStatus> {
        Self::ALL.into_iter().filter(|s| !s.is_terminal())
    }

    /// Next status for `action`, or `None` when the transition is not allowed.
    /// Transitions only move forward; terminal states accept nothing.
    pub fn apply(self, action: OrderAction, delivery: DeliveryType) -> Option<OrderStatus> {
        if self.is_terminal() {
            return None;
        }
        use DeliveryType::*;
        use OrderAction::*;
        use OrderStatus::*;
        match (self, action, delivery) {
            (_, Cancel, _) => Some(Cancelled),
            (_, Refuse, _) => Some(Refused),
            (Pending, Confirm, _) => Some(Confirmed),
            (Confirmed, StartPreparing, _) => Some(Preparing),
            (Preparing, MarkReady, _) => Some(Ready),
            (Ready, PickUp, Pickup) => Some(PickedUp),
            (Ready, Dispatch, Delivery) => Some(OutForDelivery),
            (OutForDelivery, Deliver, Delivery) => Some(Delivered),
            _ => None,
        }
    }

    /// Statuses in which the counter may hand over a pickup order by code.
    pub fn accepts_pickup_code(self) -> bool {
        matches!(self, Self::Pending | Self::Ready)
    }

    /// Whether the customer should hear about entering this status.
    pub fn notifies_customer(self) -> bool {
        matches!(self, Self::Confirmed | Self::Ready)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Preparing => "preparing",
            Self::Ready => "ready",
            Self::PickedUp => "picked_up",
            Self::OutForDelivery => "out_for_delivery",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
            Self::Refused => "refused",
        };
        f.write_str(s)
    }
}

impl fmt::Display for OrderAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Confirm => "confirm",
            Self::StartPreparing => "start_preparing",
            Self::MarkReady => "mark_ready",
            Self::PickUp => "pick_up",
            Self::Dispatch => "dispatch",
            Self::Deliver => "deliver",
            Self::Cancel => "cancel",
            Self::Refuse => "refuse",
        };
        f.write_str(s)
    }
}

impl FromStr for OrderStatus {
    type Err = UnknownOrderValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.to_string() == s)
            .ok_or_else(|| UnknownOrderValue(s.to_owned()))
    }
}
