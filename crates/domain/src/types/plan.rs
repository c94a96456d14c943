//! Activity plans

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::{Activity, ActivityId, ModelId, PlanId, SimulationId};
use crate::errors::{PlanError, Result};
use crate::utils::duration::PlanDuration;
use crate::utils::timestamp::{format_timestamp, parse_timestamp, serde_timestamp, Timestamp};
use crate::wire::{
    ApiActivityPlanCreate, ApiActivityPlanRead, ApiPlanCreatePayload, ApiPlanPatch,
    ApiSimulationRef,
};

/// A plan as stored by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityPlanRead {
    pub id: PlanId,
    pub model_id: ModelId,
    pub name: String,
    #[serde(with = "serde_timestamp")]
    pub start_time: Timestamp,
    pub duration: PlanDuration,
    #[serde(default)]
    pub activities: Vec<Activity>,
    #[serde(default)]
    pub simulations: Vec<SimulationId>,
}

impl ActivityPlanRead {
    /// # Errors
    /// Returns `PlanError::SchemaValidation` for malformed times, durations
    /// or activity offsets.
    pub fn from_wire(wire: &ApiActivityPlanRead) -> Result<Self> {
        Ok(Self {
            id: wire.id,
            model_id: wire.model_id,
            name: wire.name.clone(),
            start_time: parse_timestamp(&wire.start_time)?,
            duration: PlanDuration::parse(&wire.duration)?,
            activities: wire
                .activity_directives
                .iter()
                .map(Activity::from_wire)
                .collect::<Result<_>>()?,
            simulations: wire.simulations.iter().map(|s| s.id).collect(),
        })
    }

    /// # Errors
    /// Returns `PlanError::SchemaValidation` when an activity has no id.
    pub fn to_wire(&self) -> Result<ApiActivityPlanRead> {
        Ok(ApiActivityPlanRead {
            id: self.id,
            model_id: self.model_id,
            name: self.name.clone(),
            start_time: format_timestamp(&self.start_time),
            duration: self.duration.to_string(),
            simulations: self.simulations.iter().map(|id| ApiSimulationRef { id: *id }).collect(),
            activity_directives: self
                .activities
                .iter()
                .map(Activity::to_wire_read)
                .collect::<Result<_>>()?,
        })
    }

    /// # Errors
    /// Returns `PlanError::SchemaValidation` when the end is past the
    /// representable range.
    pub fn end_time(&self) -> Result<Timestamp> {
        plan_end(&self.start_time, self.duration)
    }

    pub fn activity(&self, id: ActivityId) -> Option<&Activity> {
        self.activities.iter().find(|a| a.id == Some(id))
    }
}

fn plan_end(start: &Timestamp, duration: PlanDuration) -> Result<Timestamp> {
    start.checked_add_signed(duration.as_delta()).ok_or_else(|| {
        PlanError::SchemaValidation(format!(
            "plan starting {} with duration {duration} ends out of range",
            format_timestamp(start)
        ))
    })
}

/// A plan that does not exist on the server yet.
///
/// Activity ids, when present, are local references used only to resolve
/// `anchor_id` within this plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityPlanCreate {
    pub name: String,
    #[serde(with = "serde_timestamp")]
    pub start_time: Timestamp,
    pub duration: PlanDuration,
    #[serde(default)]
    pub activities: Vec<Activity>,
}

impl ActivityPlanCreate {
    /// Copy a stored plan for re-upload, dropping its id and simulations.
    pub fn from_plan_read(plan: &ActivityPlanRead) -> Self {
        Self {
            name: plan.name.clone(),
            start_time: plan.start_time,
            duration: plan.duration,
            activities: plan.activities.clone(),
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Suffix the name with `now` so repeated uploads stay distinguishable.
    pub fn append_time_tag(&mut self, now: &Timestamp) {
        self.name.push_str(&format_timestamp(now));
    }

    /// # Errors
    /// See [`ActivityPlanRead::end_time`].
    pub fn end_time(&self) -> Result<Timestamp> {
        plan_end(&self.start_time, self.duration)
    }

    pub fn to_wire(&self, model_id: ModelId) -> ApiPlanCreatePayload {
        ApiPlanCreatePayload {
            plan: ApiActivityPlanCreate {
                model_id,
                name: self.name.clone(),
                start_time: format_timestamp(&self.start_time),
                duration: self.duration.to_string(),
            },
            activities: self.activities.iter().map(Activity::to_wire_draft).collect(),
        }
    }

    /// # Errors
    /// Returns `PlanError::SchemaValidation` for malformed times, durations
    /// or activity offsets.
    pub fn from_wire(payload: &ApiPlanCreatePayload) -> Result<Self> {
        Ok(Self {
            name: payload.plan.name.clone(),
            start_time: parse_timestamp(&payload.plan.start_time)?,
            duration: PlanDuration::parse(&payload.plan.duration)?,
            activities: payload
                .activities
                .iter()
                .map(|draft| Activity::from_wire_body(draft.id, &draft.body))
                .collect::<Result<_>>()?,
        })
    }

    /// Indices of `activities` in an order where every anchor precedes the
    /// activities anchored to it. Unconstrained activities keep their
    /// relative order.
    ///
    /// # Errors
    /// Returns `PlanError::SchemaValidation` for duplicate local ids, anchors
    /// that name no other activity in the plan, or anchor cycles.
    pub fn insertion_order(&self) -> Result<Vec<usize>> {
        let mut local_ids = BTreeMap::new();
        for (index, activity) in self.activities.iter().enumerate() {
            if let Some(id) = activity.id {
                if local_ids.insert(id, index).is_some() {
                    return Err(PlanError::SchemaValidation(format!(
                        "duplicate activity id {id} in plan '{}'",
                        self.name
                    )));
                }
            }
        }

        for activity in &self.activities {
            if let Some(anchor) = activity.anchor_id {
                if activity.id == Some(anchor) || !local_ids.contains_key(&anchor) {
                    return Err(PlanError::SchemaValidation(format!(
                        "activity '{}' is anchored to unknown activity {anchor}",
                        activity.name
                    )));
                }
            }
        }

        let mut order = Vec::with_capacity(self.activities.len());
        let mut placed: BTreeSet<ActivityId> = BTreeSet::new();
        let mut pending: Vec<usize> = (0..self.activities.len()).collect();

        while !pending.is_empty() {
            let before = pending.len();
            pending.retain(|&index| {
                let activity = &self.activities[index];
                let ready = activity.anchor_id.map_or(true, |anchor| placed.contains(&anchor));
                if ready {
                    order.push(index);
                    if let Some(id) = activity.id {
                        placed.insert(id);
                    }
                }
                !ready
            });

            if pending.len() == before {
                return Err(PlanError::SchemaValidation(format!(
                    "anchor cycle among {} activities in plan '{}'",
                    pending.len(),
                    self.name
                )));
            }
        }

        Ok(order)
    }
}

/// Partial update of a stored plan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanPatch {
    pub name: Option<String>,
    pub start_time: Option<Timestamp>,
    pub duration: Option<PlanDuration>,
}

impl PlanPatch {
    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.start_time.is_none() && self.duration.is_none()
    }

    pub fn to_wire(&self) -> ApiPlanPatch {
        ApiPlanPatch {
            name: self.name.clone(),
            start_time: self.start_time.as_ref().map(format_timestamp),
            duration: self.duration.map(|d| d.to_string()),
        }
    }
}
