use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

/// Converts a filter struct into GET parameters.
///
/// Fields serialized as `null` or as an empty string are left out. Integers
/// are rendered in base 10 and booleans as `true`/`false`. The filter is
/// expected to be validated already.
pub fn encode_filter<T: Serialize>(filter: &T) -> Result<BTreeMap<String, String>, serde_json::Error> {
    let Value::Object(fields) = serde_json::to_value(filter)? else {
        return Ok(BTreeMap::new());
    };

    let params = fields
        .into_iter()
        .filter_map(|(key, value)| {
            let rendered = match value {
                Value::Null => return None,
                Value::String(s) if s.is_empty() => return None,
                Value::String(s) => s,
                Value::Bool(b) => b.to_string(),
                Value::Number(n) => n.to_string(),
                other => other.to_string(),
            };
            Some((key, rendered))
        })
        .collect();

    Ok(params)
}
