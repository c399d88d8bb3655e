//! Unknown-key stripping.
//!
//! Walks a candidate alongside its JSON Schema document and drops object keys
//! that no applicable subschema lists. Everything else is returned as given:
//! numbers keep their representation and absent optional fields stay absent.

use serde_json::{Map, Value};

/// Bound on `$ref` hops at one instance location.
const MAX_REF_HOPS: usize = 32;

/// Copy `candidate`, dropping object keys `root` does not describe.
///
/// The candidate is expected to have passed validation against `root`.
pub(crate) fn strip_unknown(root: &Value, candidate: &Value) -> Value {
    strip(root, &[root], candidate)
}

fn strip(root: &Value, schemas: &[&Value], candidate: &Value) -> Value {
    let mut nodes = Vec::new();
    for schema in schemas {
        collect(root, schema, 0, &mut nodes);
    }

    match candidate {
        Value::Object(fields) => strip_object(root, &nodes, fields),
        Value::Array(items) => strip_array(root, &nodes, items),
        other => other.clone(),
    }
}

/// Flatten `$ref` targets and combinator branches into the nodes that apply
/// at one location.
fn collect<'a>(root: &'a Value, schema: &'a Value, hops: usize, out: &mut Vec<&'a Value>) {
    out.push(schema);
    let Value::Object(keywords) = schema else {
        return;
    };

    if let Some(Value::String(reference)) = keywords.get("$ref")
        && hops < MAX_REF_HOPS
        && let Some(target) = reference
            .strip_prefix('#')
            .and_then(|pointer| root.pointer(pointer))
    {
        collect(root, target, hops + 1, out);
    }

    for combinator in ["allOf", "anyOf", "oneOf"] {
        if let Some(Value::Array(branches)) = keywords.get(combinator) {
            for branch in branches {
                collect(root, branch, hops, out);
            }
        }
    }
}

/// How one schema node treats object keys.
enum ObjectRule<'a> {
    /// Says nothing about objects (a `$ref` wrapper, a combinator, a scalar type).
    Silent,
    /// Any key is allowed and kept as is.
    Open,
    Keys {
        properties: Option<&'a Map<String, Value>>,
        additional: Option<&'a Value>,
    },
}

fn object_rule(node: &Value) -> ObjectRule<'_> {
    let keywords = match node {
        Value::Bool(true) => return ObjectRule::Open,
        Value::Object(keywords) => keywords,
        _ => return ObjectRule::Silent,
    };

    let allows_object = match keywords.get("type") {
        None => None,
        Some(Value::String(ty)) => Some(ty == "object"),
        Some(Value::Array(types)) => Some(types.iter().any(|ty| ty == "object")),
        Some(_) => Some(false),
    };
    if allows_object == Some(false) {
        return ObjectRule::Silent;
    }
    if keywords.contains_key("patternProperties") {
        return ObjectRule::Open;
    }

    let properties = keywords.get("properties").and_then(Value::as_object);
    let additional = keywords.get("additionalProperties");
    match (properties, additional, allows_object) {
        (None, None, Some(true)) => ObjectRule::Open,
        (None, None, _) => ObjectRule::Silent,
        _ => ObjectRule::Keys {
            properties,
            additional,
        },
    }
}

fn strip_object(root: &Value, nodes: &[&Value], fields: &Map<String, Value>) -> Value {
    let rules: Vec<ObjectRule<'_>> = nodes.iter().map(|node| object_rule(node)).collect();
    let open = rules.iter().any(|rule| matches!(rule, ObjectRule::Open));
    let constrained = rules
        .iter()
        .any(|rule| matches!(rule, ObjectRule::Keys { .. }));

    let mut out = Map::new();
    for (key, value) in fields {
        let mut subschemas = Vec::new();
        let mut keep = open || !constrained;
        for rule in &rules {
            let ObjectRule::Keys {
                properties,
                additional,
            } = rule
            else {
                continue;
            };
            if let Some(schema) = properties.and_then(|properties| properties.get(key)) {
                subschemas.push(schema);
                continue;
            }
            match additional {
                Some(Value::Bool(true)) => keep = true,
                Some(schema @ Value::Object(_)) => subschemas.push(schema),
                _ => {}
            }
        }

        if !subschemas.is_empty() {
            out.insert(key.clone(), strip(root, &subschemas, value));
        } else if keep {
            out.insert(key.clone(), value.clone());
        }
    }
    Value::Object(out)
}

fn strip_array(root: &Value, nodes: &[&Value], items: &[Value]) -> Value {
    let stripped = items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let subschemas: Vec<&Value> = nodes
                .iter()
                .filter_map(|node| item_schema(node, index))
                .collect();
            if subschemas.is_empty() {
                item.clone()
            } else {
                strip(root, &subschemas, item)
            }
        })
        .collect();
    Value::Array(stripped)
}

/// Subschema for the array element at `index`: `prefixItems` first, then `items`.
fn item_schema(node: &Value, index: usize) -> Option<&Value> {
    if let Some(schema) = node.get("prefixItems").and_then(|prefix| prefix.get(index)) {
        return Some(schema);
    }
    node.get("items").filter(|items| items.is_object())
}
