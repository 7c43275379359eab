pub mod dish;
pub mod order;
pub mod restaurant;
pub mod views;

use std::str::FromStr;

use bigdecimal::BigDecimal;
use serde::{Deserialize, Deserializer, de};

/// Amounts arrive as JSON strings (`"25.90"`) or numbers (`25.9`). Numbers go
/// through their shortest decimal rendering so `25.9` is not read as the
/// nearest binary float. At most two fractional digits are accepted.
pub fn deserialize_money<'de, D>(deserializer: D) -> Result<BigDecimal, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(f64),
    }

    let text = match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) if n.is_finite() => n.to_string(),
        Raw::Number(_) => return Err(de::Error::custom("amount must be finite")),
    };
    let value = BigDecimal::from_str(text.trim()).map_err(de::Error::custom)?;
    let (_, scale) = value.normalized().as_bigint_and_exponent();
    if scale > 2 {
        return Err(de::Error::custom("amount has more than two decimal places"));
    }
    Ok(value.with_scale(2))
}

pub fn deserialize_money_opt<'de, D>(deserializer: D) -> Result<Option<BigDecimal>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Wrapped(#[serde(deserialize_with = "deserialize_money")] BigDecimal);

    Ok(Option::<Wrapped>::deserialize(deserializer)?.map(|Wrapped(v)| v))
}
