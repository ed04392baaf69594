//! Outline entries for operations of embedded Swagger 2.0 schemas.

use serde::Deserialize;
use serde_yaml::{Mapping, Value};

const METHODS: [&str; 8] = [
    "get", "put", "post", "delete", "options", "head", "patch", "trace",
];

/// One operation found in a schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    pub operation_id: String,
    pub title: String,
    pub long_title: String,
    pub content: String,
}

#[derive(Debug, Deserialize)]
struct SchemaDocument {
    #[serde(default)]
    swagger: Option<String>,
    #[serde(default)]
    paths: Mapping,
}

/// Operations of a YAML or JSON schema, in document order.
///
/// Only Swagger 2.0 documents are understood; other versions yield no
/// operations. Operations without an `operationId` are left out.
pub fn operations(schema: &str) -> Result<Vec<Operation>, serde_yaml::Error> {
    let document: SchemaDocument = serde_yaml::from_str(schema)?;
    if document.swagger.as_deref() != Some("2.0") {
        return Ok(Vec::new());
    }

    let mut out = Vec::new();
    for (path, item) in &document.paths {
        let (Some(path), Some(item)) = (path.as_str(), item.as_mapping()) else {
            continue;
        };
        for (method, operation) in item {
            let Some(method) = method.as_str().filter(|m| METHODS.contains(m)) else {
                continue;
            };
            let Some(operation) = operation.as_mapping() else {
                continue;
            };
            if let Some(op) = read_operation(path, method, operation) {
                out.push(op);
            }
        }
    }
    Ok(out)
}

fn read_operation(path: &str, method: &str, operation: &Mapping) -> Option<Operation> {
    let field = |name: &str| {
        operation
            .get(name)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    };
    let operation_id = field("operationId")?;
    let summary = field("summary");
    let description = field("description");

    let title = summary.map(str::trim).unwrap_or(operation_id).to_string();
    let long_title = match summary {
        Some(summary) => format!("{title} - {summary}"),
        None => title.clone(),
    };

    let mut content = vec![method, path, operation_id];
    content.extend(summary);
    content.extend(description);

    Some(Operation {
        operation_id: operation_id.to_string(),
        title,
        long_title,
        content: content.join(", "),
    })
}
