//! Request key normalisation: clients may send camelCase (`fullName`) or snake_case (`full_name`);
//! both are folded to snake_case before deserialising or matching filter names.

use serde_json::{Map, Value};

/// Convert a single identifier from camelCase to snake_case.
/// e.g. "fullName" -> "full_name", "iCareBetter" -> "i_care_better"
pub fn to_snake_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    for (i, c) in s.chars().enumerate() {
        if c.is_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Convert all keys of a JSON object from camelCase to snake_case (in place).
/// A key already present in snake_case wins over its camelCase twin.
pub fn object_keys_to_snake_case(obj: &mut Map<String, Value>) {
    let keys: Vec<String> = obj.keys().cloned().collect();
    for k in keys {
        let snake = to_snake_case(&k);
        if snake != k {
            if let Some(v) = obj.remove(&k) {
                obj.entry(snake).or_insert(v);
            }
        }
    }
}

/// Apply snake_case conversion to a request body. Non-objects are returned unchanged.
pub fn value_keys_to_snake_case(mut value: Value) -> Value {
    if let Value::Object(ref mut map) = value {
        object_keys_to_snake_case(map);
    }
    value
}
