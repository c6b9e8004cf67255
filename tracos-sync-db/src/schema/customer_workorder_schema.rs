use jsonschema::{Draft, JSONSchema};
use serde_json::{json, Value};

use tracos_sync_api::SyncError;

const STATUS_FLAGS: [&str; 6] = [
    "isActive",
    "isCanceled",
    "isDeleted",
    "isDone",
    "isOnHold",
    "isPending",
];

/// JSON Schema for a workorder file exchanged with the customer ERP.
///
/// Exactly one status flag is true: each `oneOf` branch pins one flag to
/// `true`, and since all six are required booleans, a document matches one
/// branch per flag that is set.
pub fn customer_workorder_schema() -> Value {
    let one_of: Vec<Value> = STATUS_FLAGS
        .iter()
        .map(|flag| {
            json!({
                "required": [flag],
                "properties": { *flag: { "const": true } }
            })
        })
        .collect();

    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "title": "Client ERP JSON Schema",
        "type": "object",
        "properties": {
            "orderNo": { "type": "integer" },
            "isActive": { "type": "boolean" },
            "isCanceled": { "type": "boolean" },
            "isDeleted": { "type": "boolean" },
            "isDone": { "type": "boolean" },
            "isOnHold": { "type": "boolean" },
            "isPending": { "type": "boolean" },
            "isSynced": { "type": "boolean" },
            "summary": { "type": "string" },
            "creationDate": { "type": "string", "format": "date-time" },
            "lastUpdateDate": { "type": "string", "format": "date-time" },
            "deletedDate": { "type": ["string", "null"], "format": "date-time" }
        },
        "oneOf": one_of,
        "required": [
            "orderNo", "isActive", "isCanceled", "isDeleted", "isDone", "isOnHold",
            "isPending", "isSynced", "summary", "creationDate", "lastUpdateDate", "deletedDate"
        ],
        "additionalProperties": false
    })
}

/// Compiled customer schema, applied to inbound documents before model
/// construction and to translated records before they are written out.
pub struct CustomerSchemaValidator {
    compiled: JSONSchema,
}

impl std::fmt::Debug for CustomerSchemaValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustomerSchemaValidator").finish_non_exhaustive()
    }
}

impl CustomerSchemaValidator {
    pub fn new() -> Result<Self, SyncError> {
        let schema = customer_workorder_schema();
        let compiled = JSONSchema::options()
            .with_draft(Draft::Draft7)
            .compile(&schema)
            .map_err(|e| SyncError::StructuralValidation {
                subject: "customer workorder schema".to_string(),
                errors: vec![e.to_string()],
            })?;
        Ok(Self { compiled })
    }

    /// Checks `instance` against the schema, reporting every violation.
    pub fn validate(&self, subject: &str, instance: &Value) -> Result<(), SyncError> {
        let result = self.compiled.validate(instance);
        if let Err(errors) = result {
            let errors: Vec<String> = errors
                .map(|e| {
                    let path = e.instance_path.to_string();
                    if path.is_empty() {
                        e.to_string()
                    } else {
                        format!("{path}: {e}")
                    }
                })
                .collect();
            return Err(SyncError::StructuralValidation {
                subject: subject.to_string(),
                errors,
            });
        }
        Ok(())
    }

    pub fn is_valid(&self, instance: &Value) -> bool {
        self.compiled.is_valid(instance)
    }
}
