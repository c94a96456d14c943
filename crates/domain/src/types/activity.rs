//! Activity directives

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{ActivityId, PlanId};
use crate::errors::{PlanError, Result};
use crate::utils::duration::{format_offset, parse_offset, serde_offset, Offset};
use crate::wire::{ApiActivityBody, ApiActivityDraft, ApiActivityInsert, ApiActivityRead};

/// An activity placed in a plan.
///
/// `start_offset` is relative to the plan start, or to the anchor when
/// `anchor_id` is set (its start or its end, per `anchored_to_start`).
/// `anchor_id` is a weak reference: it is only meaningful inside the plan
/// that owns both activities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ActivityId>,
    #[serde(rename = "type")]
    pub activity_type: String,
    #[serde(with = "serde_offset")]
    pub start_offset: Offset,
    #[serde(default)]
    pub arguments: BTreeMap<String, Value>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default)]
    pub metadata: BTreeMap<String, Value>,
    #[serde(default)]
    pub anchor_id: Option<ActivityId>,
    #[serde(default = "crate::wire::default_true")]
    pub anchored_to_start: bool,
}

impl Activity {
    /// Unanchored activity with no arguments, named after its type.
    pub fn new(activity_type: impl Into<String>, start_offset: Offset) -> Self {
        let activity_type = activity_type.into();
        Self {
            id: None,
            name: activity_type.clone(),
            activity_type,
            start_offset,
            arguments: BTreeMap::new(),
            tags: BTreeSet::new(),
            metadata: BTreeMap::new(),
            anchor_id: None,
            anchored_to_start: true,
        }
    }

    /// # Errors
    /// Returns `PlanError::SchemaValidation` when the offset is malformed.
    pub fn from_wire_body(id: Option<ActivityId>, body: &ApiActivityBody) -> Result<Self> {
        Ok(Self {
            id,
            activity_type: body.activity_type.clone(),
            start_offset: parse_offset(&body.start_offset)?,
            arguments: body.arguments.clone(),
            name: body.name.clone(),
            tags: body.tags.iter().cloned().collect(),
            metadata: body.metadata.clone(),
            anchor_id: body.anchor_id,
            anchored_to_start: body.anchored_to_start,
        })
    }

    /// # Errors
    /// Returns `PlanError::SchemaValidation` when the offset is malformed.
    pub fn from_wire(read: &ApiActivityRead) -> Result<Self> {
        Self::from_wire_body(Some(read.id), &read.body)
    }

    pub fn to_wire_body(&self) -> ApiActivityBody {
        ApiActivityBody {
            activity_type: self.activity_type.clone(),
            start_offset: format_offset(&self.start_offset),
            arguments: self.arguments.clone(),
            name: self.name.clone(),
            tags: self.tags.iter().cloned().collect(),
            metadata: self.metadata.clone(),
            anchor_id: self.anchor_id,
            anchored_to_start: self.anchored_to_start,
        }
    }

    /// # Errors
    /// Returns `PlanError::SchemaValidation` when the activity has no id.
    pub fn to_wire_read(&self) -> Result<ApiActivityRead> {
        Ok(ApiActivityRead { id: self.require_id()?, body: self.to_wire_body() })
    }

    pub fn to_wire_draft(&self) -> ApiActivityDraft {
        ApiActivityDraft { id: self.id, body: self.to_wire_body() }
    }

    pub fn to_wire_insert(&self, plan_id: PlanId) -> ApiActivityInsert {
        ApiActivityInsert { plan_id, body: self.to_wire_body() }
    }

    /// # Errors
    /// Returns `PlanError::SchemaValidation` when the activity has no id.
    pub fn require_id(&self) -> Result<ActivityId> {
        self.id.ok_or_else(|| {
            PlanError::SchemaValidation(format!(
                "activity '{}' of type {} has no id",
                self.name, self.activity_type
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;
    use serde_json::json;

    use super::*;

    fn wire_read() -> ApiActivityRead {
        serde_json::from_value(json!({
            "id": 7,
            "type": "GrowBanana",
            "start_offset": "-00:15:00",
            "arguments": {"quantity": 2},
            "name": "grow",
            "tags": ["b", "a", "a"],
            "metadata": {"owner": "ops"},
            "anchor_id": 3,
            "anchored_to_start": false,
        }))
        .unwrap()
    }

    #[test]
    fn from_wire_parses_offset_and_collapses_tags() {
        let activity = Activity::from_wire(&wire_read()).unwrap();

        assert_eq!(activity.id, Some(7));
        assert_eq!(activity.start_offset, TimeDelta::minutes(-15));
        assert_eq!(activity.tags.len(), 2);
        assert_eq!(activity.anchor_id, Some(3));
        assert!(!activity.anchored_to_start);
    }

    #[test]
    fn round_trips_through_wire_read() {
        let activity = Activity::from_wire(&wire_read()).unwrap();
        let back = Activity::from_wire(&activity.to_wire_read().unwrap()).unwrap();
        assert_eq!(back, activity);
    }

    #[test]
    fn update_path_requires_id() {
        let activity = Activity::new("NoOp", TimeDelta::zero());
        let err = activity.to_wire_read().unwrap_err();
        assert!(matches!(err, PlanError::SchemaValidation(_)));
    }

    #[test]
    fn bad_offset_is_schema_error() {
        let mut read = wire_read();
        read.body.start_offset = "soon".into();
        assert!(matches!(Activity::from_wire(&read), Err(PlanError::SchemaValidation(_))));
    }

    #[test]
    fn serializes_type_and_offset_like_the_wire() {
        let activity = Activity::new("NoOp", TimeDelta::hours(2));
        let value = serde_json::to_value(&activity).unwrap();
        assert_eq!(value["type"], "NoOp");
        assert_eq!(value["start_offset"], "02:00:00");
        assert!(value.get("id").is_none());
    }
}
