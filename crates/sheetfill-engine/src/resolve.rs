use sheetfill_common::Scalar;

use crate::flatten::ValueMap;
use crate::placeholder::Binding;

/// Resolve one binding against one record's value map.
///
/// A path with no entry resolves to [`Scalar::Empty`]. A condition turns
/// the cell into a flag: `Int(1)` when the value's text form equals the
/// condition case-insensitively, `Empty` otherwise, the raw value itself
/// discarded. Never fails; templates routinely carry more placeholders
/// than a record has data.
pub fn resolve(binding: &Binding, values: &ValueMap) -> Scalar {
    let value = values.get(&binding.path);
    match &binding.condition {
        None => value.cloned().unwrap_or(Scalar::Empty),
        Some(condition) => {
            let text = value.map(|v| v.to_string()).unwrap_or_default();
            if text.to_lowercase() == condition.to_lowercase() {
                Scalar::Int(1)
            } else {
                Scalar::Empty
            }
        }
    }
}
