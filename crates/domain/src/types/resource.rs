//! Resource types and sampled timelines

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::{PlanError, Result};
use crate::utils::duration::{parse_offset, serde_offset, Offset};
use crate::wire::{ApiProfile, ApiResourceType};

/// Shape of the values a resource takes.
///
/// Keys beside the tag and its children (`metadata` carrying units, for
/// instance) are kept in `extra` and written back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub struct ValueSchema {
    pub kind: SchemaKind,
    pub extra: BTreeMap<String, Value>,
}

/// The `type` tag of a schema node and the children it requires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaKind {
    Real,
    String,
    Int,
    Boolean,
    Struct { items: BTreeMap<String, ValueSchema> },
    Series { items: Box<ValueSchema> },
    Variant { variants: Vec<VariantOption> },
}

impl From<SchemaKind> for ValueSchema {
    fn from(kind: SchemaKind) -> Self {
        Self { kind, extra: BTreeMap::new() }
    }
}

impl TryFrom<Value> for ValueSchema {
    type Error = String;

    fn try_from(value: Value) -> std::result::Result<Self, Self::Error> {
        let mut node = match value {
            Value::Object(node) => node,
            other => return Err(format!("schema node must be an object, got {other}")),
        };
        let tag = match node.remove("type") {
            Some(Value::String(tag)) => tag,
            Some(other) => return Err(format!("schema `type` must be a string, got {other}")),
            None => return Err("schema node has no `type`".to_string()),
        };

        let kind = match tag.as_str() {
            "real" => SchemaKind::Real,
            "string" => SchemaKind::String,
            "int" => SchemaKind::Int,
            "boolean" => SchemaKind::Boolean,
            "struct" => SchemaKind::Struct { items: take_child(&mut node, &tag, "items")? },
            "series" => {
                let items: Self = take_child(&mut node, &tag, "items")?;
                SchemaKind::Series { items: Box::new(items) }
            }
            "variant" => SchemaKind::Variant { variants: take_child(&mut node, &tag, "variants")? },
            other => return Err(format!("unknown schema type `{other}`")),
        };

        Ok(Self { kind, extra: node.into_iter().collect() })
    }
}

fn take_child<T: serde::de::DeserializeOwned>(
    node: &mut Map<String, Value>,
    tag: &str,
    key: &str,
) -> std::result::Result<T, String> {
    let child = node.remove(key).ok_or_else(|| format!("{tag} schema has no `{key}`"))?;
    serde_json::from_value(child).map_err(|e| format!("{tag} schema `{key}`: {e}"))
}

impl From<ValueSchema> for Value {
    fn from(schema: ValueSchema) -> Self {
        let mut node: Map<String, Value> = schema.extra.into_iter().collect();
        let tag = match schema.kind {
            SchemaKind::Real => "real",
            SchemaKind::String => "string",
            SchemaKind::Int => "int",
            SchemaKind::Boolean => "boolean",
            SchemaKind::Struct { items } => {
                let items = items.into_iter().map(|(name, item)| (name, Self::from(item)));
                node.insert("items".into(), Self::Object(items.collect()));
                "struct"
            }
            SchemaKind::Series { items } => {
                node.insert("items".into(), Self::from(*items));
                "series"
            }
            SchemaKind::Variant { variants } => {
                let options = variants.into_iter().map(VariantOption::into_value).collect();
                node.insert("variants".into(), Self::Array(options));
                "variant"
            }
        };
        node.insert("type".into(), Self::String(tag.into()));
        Self::Object(node)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantOption {
    pub key: String,
    pub label: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl VariantOption {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self { key: key.into(), label: label.into(), extra: BTreeMap::new() }
    }

    fn into_value(self) -> Value {
        let mut option: Map<String, Value> = self.extra.into_iter().collect();
        option.insert("key".into(), Value::String(self.key));
        option.insert("label".into(), Value::String(self.label));
        Value::Object(option)
    }
}

/// A named resource of a mission model. Names are `/`-separated paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceType {
    pub name: String,
    pub schema: ValueSchema,
}

impl ResourceType {
    /// # Errors
    /// Returns `PlanError::SchemaValidation` for unknown or malformed schema
    /// nodes.
    pub fn from_wire(wire: &ApiResourceType) -> Result<Self> {
        let schema = serde_json::from_value(wire.schema.clone()).map_err(|e| {
            PlanError::SchemaValidation(format!("resource '{}' has invalid schema: {e}", wire.name))
        })?;
        Ok(Self { name: wire.name.clone(), schema })
    }

    /// # Errors
    /// Returns `PlanError::SchemaValidation` if the schema cannot be encoded.
    pub fn to_wire(&self) -> Result<ApiResourceType> {
        Ok(ApiResourceType { name: self.name.clone(), schema: Value::from(self.schema.clone()) })
    }
}

/// Value of a resource from `offset` until the next sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceSample {
    #[serde(with = "serde_offset")]
    pub offset: Offset,
    pub value: Value,
}

/// Samples per resource name, each ordered by offset.
pub type ResourceTimelines = BTreeMap<String, Vec<ResourceSample>>;

/// Whether `name` is selected by `filter`.
///
/// An entry selects a resource by its full name or by its last path segment,
/// so `hardwareState` selects `/imager/hardwareState`. An empty filter
/// selects everything.
pub fn resource_matches(name: &str, filter: &[String]) -> bool {
    if filter.is_empty() {
        return true;
    }
    let leaf = name.rsplit('/').next().unwrap_or(name);
    filter.iter().any(|entry| entry == name || entry == leaf)
}

/// Build sampled timelines from simulated profiles.
///
/// When `end_offset` is known each timeline gets a closing sample there
/// carrying the last segment's value, so consumers can tell where the final
/// segment stops.
///
/// # Errors
/// Returns `PlanError::SchemaValidation` for malformed segment offsets.
pub fn timelines_from_profiles(
    profiles: &[ApiProfile],
    filter: &[String],
    end_offset: Option<Offset>,
) -> Result<ResourceTimelines> {
    let mut timelines = ResourceTimelines::new();

    for profile in profiles.iter().filter(|p| resource_matches(&p.name, filter)) {
        let mut samples = profile
            .profile_segments
            .iter()
            .map(|segment| {
                Ok(ResourceSample {
                    offset: parse_offset(&segment.start_offset)?,
                    value: segment.dynamics.clone(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        samples.sort_by_key(|s| s.offset);

        if let (Some(end), Some(last)) = (end_offset, samples.last()) {
            if end > last.offset {
                let closing = ResourceSample { offset: end, value: last.value.clone() };
                samples.push(closing);
            }
        }

        timelines.insert(profile.name.clone(), samples);
    }

    Ok(timelines)
}
