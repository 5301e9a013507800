//! `Instance.effective_config` derivation (I8): a typed, shallow merge —
//! never a deep merge of nested objects.

use serde_json::{Map, Value};

/// `merge(defaults, {limits: plan.limits}, overrides)`. Each subsequent
/// object's top-level keys win over the previous one; nested objects are
/// replaced wholesale, not recursively merged.
pub fn effective_config(defaults: &Value, plan_limits: &Value, overrides: &Value) -> Value {
    let mut out = as_object(defaults);
    out.insert("limits".to_string(), plan_limits.clone());
    shallow_merge_into(&mut out, overrides);
    Value::Object(out)
}

fn as_object(v: &Value) -> Map<String, Value> {
    match v {
        Value::Object(m) => m.clone(),
        _ => Map::new(),
    }
}

fn shallow_merge_into(base: &mut Map<String, Value>, overrides: &Value) {
    if let Value::Object(over) = overrides {
        for (k, v) in over {
            base.insert(k.clone(), v.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn merge_sets_limits_from_plan() {
        let defaults = json!({"max_steps": 10});
        let limits = json!({"max_tokens": 4096});
        let overrides = json!({});
        let merged = effective_config(&defaults, &limits, &overrides);
        assert_eq!(merged["max_steps"], json!(10));
        assert_eq!(merged["limits"], json!({"max_tokens": 4096}));
    }

    #[test]
    fn overrides_win_last_write_wins() {
        let defaults = json!({"max_steps": 10, "theme": "dark"});
        let limits = json!({"max_tokens": 4096});
        let overrides = json!({"theme": "light"});
        let merged = effective_config(&defaults, &limits, &overrides);
        assert_eq!(merged["theme"], json!("light"));
        assert_eq!(merged["max_steps"], json!(10));
    }

    #[test]
    fn overrides_can_replace_limits_wholesale() {
        let defaults = json!({});
        let limits = json!({"max_tokens": 4096, "max_steps": 5});
        let overrides = json!({"limits": {"max_tokens": 1}});
        let merged = effective_config(&defaults, &limits, &overrides);
        // shallow merge: overrides.limits replaces the whole limits object,
        // it does not merge max_steps in alongside it.
        assert_eq!(merged["limits"], json!({"max_tokens": 1}));
    }

    #[test]
    fn non_object_defaults_become_empty_base() {
        let merged = effective_config(&Value::Null, &json!({}), &Value::Null);
        assert_eq!(merged["limits"], json!({}));
    }
}
