//! Menu dish domain types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Menu section a dish is listed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DishCategory {
    Starter,
    Main,
    Dessert,
    Drink,
    Side,
}

impl fmt::Display for DishCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Starter => "starter",
            Self::Main => "main",
            Self::Dessert => "dessert",
            Self::Drink => "drink",
            Self::Side => "side",
        };
        f.write_str(s)
    }
}

/// Error returned when a string cannot be parsed as a [`DishCategory`].
#[derive(Debug, Error)]
#[error("unknown dish category: {0:?}")]
pub struct UnknownDishCategory(pub String);

impl FromStr for DishCategory {
    type Err = UnknownDishCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "starter" => Ok(Self::Starter),
            "main" => Ok(Self::Main),
            "dessert" => Ok(Self::Dessert),
            "drink" => Ok(Self::Drink),
            "side" => Ok(Self::Side),
            other => Err(UnknownDishCategory(other.to_owned())),
        }
    }
}
