//! Recursive merging of nested key-value mappings.
use serde_json::{Map, Value};

/// Merge `override_map` over `base`, returning a new mapping.
///
/// For each key in `override_map`: if both sides hold a nested mapping,
/// the mappings are merged recursively; otherwise the override value
/// wins outright (including sequences, which are replaced wholesale).
/// Keys only present in `base` pass through unchanged. Neither input is
/// mutated.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use dotfiles_bundle_cli::merge::deep_merge;
///
/// let base = json!({"user": {"name": "John"}, "theme": "dark"});
/// let over = json!({"user": {"email": "john@work.com"}});
///
/// let merged = deep_merge(
///     base.as_object().unwrap(),
///     over.as_object().unwrap(),
/// );
/// assert_eq!(
///     serde_json::Value::Object(merged),
///     json!({"user": {"name": "John", "email": "john@work.com"}, "theme": "dark"}),
/// );
/// ```
#[must_use]
pub fn deep_merge(base: &Map<String, Value>, override_map: &Map<String, Value>) -> Map<String, Value> {
    let mut merged = base.clone();
    for (key, override_value) in override_map {
        match (merged.get(key), override_value) {
            (Some(Value::Object(base_inner)), Value::Object(override_inner)) => {
                let inner = deep_merge(base_inner, override_inner);
                merged.insert(key.clone(), Value::Object(inner));
            }
            _ => {
                merged.insert(key.clone(), override_value.clone());
            }
        }
    }
    merged
}
