use serde_json::Value;

/// Flattens arbitrarily nested JSON arrays into their leaves, in order.
///
/// `[[1, 2, 3], 4, 5, [6, [7, 8], 9], 10]` becomes `[1, 2, ..., 10]`; a
/// non-array value yields itself.
pub fn flatten(value: &Value) -> Vec<Value> {
    let mut leaves = Vec::new();
    collect_leaves(value, &mut leaves);
    leaves
}

fn collect_leaves(value: &Value, leaves: &mut Vec<Value>) {
    match value {
        Value::Array(items) => items.iter().for_each(|item| collect_leaves(item, leaves)),
        other => leaves.push(other.clone()),
    }
}
