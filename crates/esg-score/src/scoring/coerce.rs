use super::domain::MsciFlag;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Reads a number or numeric string, yielding `0.0` for anything else.
pub(crate) fn lenient_score<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map(score_from_value).unwrap_or(0.0))
}

pub(crate) fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(text_from_value).unwrap_or_default())
}

pub(crate) fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .and_then(text_from_value)
        .filter(|text| !text.trim().is_empty()))
}

pub(crate) fn optional_flag<'de, D>(deserializer: D) -> Result<Option<MsciFlag>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .and_then(text_from_value)
        .and_then(|text| text.parse().ok()))
}

pub(crate) fn score_from_value(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|score| score.is_finite()).unwrap_or(0.0)
}

fn text_from_value(value: Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn score_accepts_numbers_and_numeric_strings() {
        assert_eq!(score_from_value(&json!(3)), 3.0);
        assert_eq!(score_from_value(&json!(2.5)), 2.5);
        assert_eq!(score_from_value(&json!(" 1.5 ")), 1.5);
    }

    #[test]
    fn score_coerces_garbage_to_zero() {
        assert_eq!(score_from_value(&json!("N/A")), 0.0);
        assert_eq!(score_from_value(&json!("")), 0.0);
        assert_eq!(score_from_value(&json!(true)), 0.0);
        assert_eq!(score_from_value(&json!([1, 2])), 0.0);
        assert_eq!(score_from_value(&json!("NaN")), 0.0);
        assert_eq!(score_from_value(&Value::Null), 0.0);
    }
}
