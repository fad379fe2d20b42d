use serde::{Deserialize, de};

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

/// Accepts a coordinate written either as a JSON number or a numeric string
pub(super) fn deserialize_coordinate<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = match NumberOrText::deserialize(deserializer)? {
        NumberOrText::Number(v) => v,
        NumberOrText::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|e| de::Error::custom(format!("invalid coordinate '{s}': {e}")))?,
    };

    if value.is_finite() {
        Ok(value)
    } else {
        Err(de::Error::custom("coordinate is not finite"))
    }
}

/// Treats `null` like a missing string
pub(super) fn deserialize_nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
