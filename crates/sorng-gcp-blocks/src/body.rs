//! Request body assembly.

use crate::descriptor::{BodyMode, InputField};
use serde_json::{Map, Value};

/// Input name carrying the pre-structured payload in whole-body mode.
pub const REQUEST_BODY_FIELD: &str = "requestBody";

/// Build the JSON payload for an operation, or `None` when nothing should be sent.
///
/// In `assembledFields` mode an object with zero keys is reported as `None`:
/// update-mask driven calls treat an explicit `{}` differently from no body.
pub fn assemble(mode: BodyMode, fields: &[InputField], values: &Map<String, Value>) -> Option<Value> {
    match mode {
        BodyMode::None => None,
        BodyMode::WholeBody => match values.get(REQUEST_BODY_FIELD) {
            None | Some(Value::Null) => None,
            Some(body) => Some(body.clone()),
        },
        BodyMode::AssembledFields => {
            let mut body = Map::new();
            for field in fields {
                if let Some(v) = values.get(&field.name) {
                    body.insert(field.name.clone(), v.clone());
                }
            }
            if body.is_empty() {
                None
            } else {
                Some(Value::Object(body))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::FieldShape;
    use serde_json::json;

    fn fields() -> Vec<InputField> {
        vec![
            InputField::new("displayName", FieldShape::String).required(),
            InputField::new("labels", FieldShape::Object),
            InputField::new("conditions", FieldShape::Array),
        ]
    }

    fn values(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn none_mode_never_sends_a_body() {
        let v = values(json!({"requestBody": {"a": 1}, "displayName": "x"}));
        assert_eq!(assemble(BodyMode::None, &fields(), &v), None);
    }

    #[test]
    fn whole_body_is_passed_through() {
        let v = values(json!({"requestBody": {"labels": {"env": "prod"}}, "name": "ignored"}));
        assert_eq!(
            assemble(BodyMode::WholeBody, &[], &v),
            Some(json!({"labels": {"env": "prod"}}))
        );
    }

    #[test]
    fn whole_body_absent_means_no_body() {
        assert_eq!(assemble(BodyMode::WholeBody, &[], &Map::new()), None);
        let v = values(json!({"requestBody": null}));
        assert_eq!(assemble(BodyMode::WholeBody, &[], &v), None);
    }

    #[test]
    fn empty_values_yield_no_body() {
        assert_eq!(assemble(BodyMode::AssembledFields, &fields(), &Map::new()), None);
    }

    #[test]
    fn only_present_keys_are_kept() {
        // displayName is required but absent: still omitted, never defaulted.
        let v = values(json!({"labels": {"team": "a"}, "unrelated": 1}));
        assert_eq!(
            assemble(BodyMode::AssembledFields, &fields(), &v),
            Some(json!({"labels": {"team": "a"}}))
        );
    }

    #[test]
    fn undeclared_only_values_yield_no_body() {
        let v = values(json!({"name": "projects/p/topics/t"}));
        assert_eq!(assemble(BodyMode::AssembledFields, &fields(), &v), None);
    }

    #[test]
    fn declared_order_and_nested_values_preserved() {
        let v = values(json!({
            "conditions": [{"displayName": "cpu", "conditionThreshold": {"comparison": "COMPARISON_GT"}}],
            "displayName": "High CPU",
            "labels": null
        }));
        let body = assemble(BodyMode::AssembledFields, &fields(), &v).unwrap();
        let keys: Vec<&String> = body.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["displayName", "labels", "conditions"]);
        assert_eq!(body["labels"], Value::Null);
        assert_eq!(body["conditions"][0]["conditionThreshold"]["comparison"], "COMPARISON_GT");
    }
}
