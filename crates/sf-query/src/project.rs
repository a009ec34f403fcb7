//! Projection of heterogeneous API records onto a fixed column schema.
//!
//! Salesforce records are JSON objects whose relationship fields nest a
//! child object (`"Parent": {"attributes": ..., "Type": ...}`). The
//! projector flattens those into dotted columns (`Parent.Type`) and pins
//! the column order to the first record seen, so every row comes out in
//! the same shape no matter how later records order or omit their keys.

use serde_json::Value;

/// A projected record: scalar values in column-schema order.
pub type Row = Vec<Value>;

/// The per-record metadata key Salesforce attaches to every (nested) record.
const ATTRIBUTES_KEY: &str = "attributes";

/// Projects result batches onto the column schema derived from the first
/// record of the first non-empty batch.
///
/// Values keep their API-native representation; any coercion is left to
/// the sink.
#[derive(Debug, Default)]
pub struct RowProjector {
    schema: Option<Vec<String>>,
}

impl RowProjector {
    pub fn new() -> Self {
        Self::default()
    }

    /// The column schema, once derived. `None` until the first non-empty
    /// batch has been projected.
    pub fn schema(&self) -> Option<&[String]> {
        self.schema.as_deref()
    }

    /// Project one batch of records into ordered rows.
    ///
    /// Records missing a schema column project a null value for it; extra
    /// fields on later records are ignored. The schema never changes once
    /// set.
    pub fn project_batch(&mut self, records: &[Value]) -> Vec<Row> {
        if self.schema.is_none() {
            if let Some(first) = records.first() {
                self.schema = Some(derive_schema(first));
            }
        }

        let Some(schema) = self.schema.as_deref() else {
            return Vec::new();
        };

        records
            .iter()
            .map(|record| {
                schema
                    .iter()
                    .map(|column| resolve_path(record, column))
                    .collect()
            })
            .collect()
    }
}

/// Derive dotted column names from a record, in key order.
fn derive_schema(record: &Value) -> Vec<String> {
    let mut columns = Vec::new();
    collect_columns(record, None, &mut columns);
    columns
}

fn collect_columns(value: &Value, prefix: Option<&str>, columns: &mut Vec<String>) {
    let Value::Object(map) = value else {
        return;
    };

    for (key, child) in map {
        if key.eq_ignore_ascii_case(ATTRIBUTES_KEY) {
            continue;
        }
        let name = match prefix {
            Some(prefix) => format!("{prefix}.{key}"),
            None => key.clone(),
        };
        if child.is_object() {
            collect_columns(child, Some(&name), columns);
        } else {
            columns.push(name);
        }
    }
}

/// Resolve a dotted field path against a record.
///
/// A missing segment, or a path through a non-object, yields null.
fn resolve_path(record: &Value, path: &str) -> Value {
    let mut current = record;
    for segment in path.split('.') {
        match current {
            Value::Object(map) => match map.get(segment) {
                Some(child) => current = child,
                None => return Value::Null,
            },
            _ => return Value::Null,
        }
    }
    current.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_schema_from_first_record_in_key_order() {
        let records = vec![json!({
            "attributes": {"type": "Account"},
            "Id": "001",
            "Name": "Acme",
            "IsDeleted": false
        })];

        let mut projector = RowProjector::new();
        let rows = projector.project_batch(&records);

        assert_eq!(projector.schema().unwrap(), &["Id", "Name", "IsDeleted"]);
        assert_eq!(rows, vec![vec![json!("001"), json!("Acme"), json!(false)]]);
    }

    #[test]
    fn test_nested_relationship_fields_flatten_to_dotted_columns() {
        let records = vec![json!({
            "attributes": {"type": "Case"},
            "Id": "500",
            "Parent": {
                "attributes": {"type": "Case"},
                "Type": "Problem",
                "Owner": {"attributes": {"type": "User"}, "Alias": "jdoe"}
            }
        })];

        let mut projector = RowProjector::new();
        let rows = projector.project_batch(&records);

        assert_eq!(
            projector.schema().unwrap(),
            &["Id", "Parent.Type", "Parent.Owner.Alias"]
        );
        assert_eq!(
            rows,
            vec![vec![json!("500"), json!("Problem"), json!("jdoe")]]
        );
    }

    #[test]
    fn test_later_key_order_does_not_change_projection() {
        let first = vec![json!({"Id": "001", "Name": "Acme"})];
        let second = vec![json!({"Name": "Globex", "Id": "002"})];

        let mut projector = RowProjector::new();
        projector.project_batch(&first);
        let rows = projector.project_batch(&second);

        // Values still come out in the schema order from the first record.
        assert_eq!(rows, vec![vec![json!("002"), json!("Globex")]]);
    }

    #[test]
    fn test_missing_fields_project_null() {
        let first = vec![json!({"Id": "001", "Parent": {"Type": "Problem"}})];
        let second = vec![json!({"Id": "002"}), json!({"Id": "003", "Parent": null})];

        let mut projector = RowProjector::new();
        projector.project_batch(&first);
        let rows = projector.project_batch(&second);

        assert_eq!(rows[0], vec![json!("002"), Value::Null]);
        assert_eq!(rows[1], vec![json!("003"), Value::Null]);
    }

    #[test]
    fn test_empty_batch_leaves_schema_unset() {
        let mut projector = RowProjector::new();
        assert!(projector.project_batch(&[]).is_empty());
        assert!(projector.schema().is_none());

        // Schema comes from the first non-empty batch instead.
        projector.project_batch(&[json!({"Id": "001"})]);
        assert_eq!(projector.schema().unwrap(), &["Id"]);
    }

    #[test]
    fn test_scalar_values_not_coerced() {
        let records = vec![json!({
            "Id": "001",
            "Amount": 1234.5,
            "IsWon": true,
            "CloseDate": "2020-01-02"
        })];

        let mut projector = RowProjector::new();
        let rows = projector.project_batch(&records);

        assert_eq!(
            rows[0],
            vec![json!("001"), json!(1234.5), json!(true), json!("2020-01-02")]
        );
    }
}
