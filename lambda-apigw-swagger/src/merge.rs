use serde_json::{Map, Value};

/// Recursively fill any keys missing from `target` with the corresponding values in `defaults`.
///
/// Existing values in `target` are never replaced. When both sides hold a JSON object under the
/// same key, the merge descends into it; every other combination (arrays, scalars, mismatched
/// types) keeps the `target` value as-is. A `null` in `target` counts as set.
pub fn default_merge(target: &mut Value, defaults: &Value) {
  if let (Value::Object(target), Value::Object(defaults)) = (target, defaults) {
    default_merge_object(target, defaults);
  }
}

/// Same as [`default_merge`], for a `target` already known to be an object.
pub fn default_merge_object(target: &mut Map<String, Value>, defaults: &Map<String, Value>) {
  for (key, default_value) in defaults {
    match target.get_mut(key) {
      Some(existing) => default_merge(existing, default_value),
      None => {
        target.insert(key.to_owned(), default_value.clone());
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::default_merge;

  use pretty_assertions::assert_eq;
  use serde_json::json;

  #[test]
  fn test_fills_missing_keys_recursively() {
    let mut target = json!({
      "description": "explicit",
      "x-amazon-apigateway-integration": { "uri": "arn:explicit" }
    });
    default_merge(
      &mut target,
      &json!({
        "description": "template",
        "produces": ["application/json"],
        "x-amazon-apigateway-integration": { "uri": "arn:template", "type": "aws_proxy" }
      }),
    );

    assert_eq!(
      target,
      json!({
        "description": "explicit",
        "x-amazon-apigateway-integration": { "uri": "arn:explicit", "type": "aws_proxy" },
        "produces": ["application/json"]
      })
    );
  }

  #[test]
  fn test_arrays_and_scalars_are_leaves() {
    let mut target = json!({ "parameters": [{ "name": "id" }], "deprecated": null });
    default_merge(
      &mut target,
      &json!({
        "parameters": [{ "name": "id", "in": "path" }, { "name": "q" }],
        "deprecated": true
      }),
    );

    assert_eq!(target, json!({ "parameters": [{ "name": "id" }], "deprecated": null }));
  }

  #[test]
  fn test_idempotent() {
    let original = json!({ "a": { "b": [1, 2], "c": { "d": "e" } }, "f": 1 });
    let mut target = original.clone();
    default_merge(&mut target, &original);
    assert_eq!(target, original);

    default_merge(&mut target, &json!({ "a": { "c": {} } }));
    assert_eq!(target, original);
  }

  #[test]
  fn test_non_object_target_untouched() {
    let mut target = json!("leaf");
    default_merge(&mut target, &json!({ "a": 1 }));
    assert_eq!(target, json!("leaf"));
  }
}
