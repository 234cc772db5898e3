//! Serde helpers for tabular inputs.

use serde::{Deserialize, Deserializer};

/// Read an empty numeric cell as NaN instead of failing the whole table.
pub fn float_or_nan<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<f64> = Option::deserialize(deserializer)?;
    Ok(value.unwrap_or(f64::NAN))
}
