//! Plan and activity operations

use std::collections::BTreeMap;

use plansim_domain::utils::timestamp::{format_timestamp, Timestamp};
use plansim_domain::wire::{ApiActivityPlanRead, ApiSimulationInsert};
use plansim_domain::{
    Activity, ActivityId, ActivityPlanCreate, ActivityPlanRead, ModelId, PlanError, PlanId,
    PlanPatch, Result,
};
use serde_json::json;
use tracing::{info, instrument};

use super::{envelope, queries, PlanningClient};

impl PlanningClient {
    /// All plans, oldest first. Activities are not selected.
    #[instrument(skip(self))]
    pub async fn list_activity_plans(&self) -> Result<Vec<ActivityPlanRead>> {
        let rows = self.request(queries::LIST_PLANS, json!({}), "plan").await?;
        let wire: Vec<ApiActivityPlanRead> = envelope::decode(rows, "plan list")?;
        wire.iter().map(ActivityPlanRead::from_wire).collect()
    }

    #[instrument(skip(self))]
    pub async fn get_activity_plan_by_id(&self, plan_id: PlanId) -> Result<ActivityPlanRead> {
        let what = format!("plan {plan_id}");
        let row = self.request(queries::GET_PLAN, json!({ "id": plan_id }), "plan_by_pk").await?;
        let wire: ApiActivityPlanRead = envelope::decode(envelope::required(row, &what)?, &what)?;
        ActivityPlanRead::from_wire(&wire)
    }

    /// Create a plan with its simulation row and activities.
    ///
    /// Anchors are checked before anything is sent. Activities are inserted
    /// anchors-first and their `anchor_id`s rewritten to the ids the server
    /// assigns. A failure once the plan row exists is reported as
    /// `PartialPlanCreation` carrying the new plan id; nothing is rolled back.
    #[instrument(skip(self, plan), fields(plan_name = %plan.name, activities = plan.activities.len()))]
    pub async fn create_activity_plan(
        &self,
        model_id: ModelId,
        plan: &ActivityPlanCreate,
    ) -> Result<PlanId> {
        let order = plan.insertion_order()?;
        let end_time = plan.end_time()?;
        let payload = plan.to_wire(model_id);

        let plan_id = self
            .request_id(
                queries::CREATE_PLAN,
                json!({ "plan": payload.plan }),
                "insert_plan_one",
                "created plan",
            )
            .await?;

        self.populate_plan(plan_id, plan, &end_time, &order)
            .await
            .map_err(|e| e.after_plan_created(plan_id))?;

        info!(plan_id, "created activity plan");
        Ok(plan_id)
    }

    async fn populate_plan(
        &self,
        plan_id: PlanId,
        plan: &ActivityPlanCreate,
        end_time: &Timestamp,
        order: &[usize],
    ) -> Result<()> {
        let simulation = ApiSimulationInsert {
            plan_id,
            arguments: BTreeMap::new(),
            simulation_start_time: format_timestamp(&plan.start_time),
            simulation_end_time: format_timestamp(end_time),
        };
        self.request_id(
            queries::CREATE_SIMULATION,
            json!({ "simulation": simulation }),
            "insert_simulation_one",
            "created simulation",
        )
        .await?;

        let mut server_ids: BTreeMap<ActivityId, ActivityId> = BTreeMap::new();
        for &index in order {
            let mut activity = plan.activities[index].clone();
            if let Some(local) = activity.anchor_id {
                let anchor = server_ids.get(&local).copied().ok_or_else(|| {
                    PlanError::SchemaValidation(format!("anchor {local} was not created"))
                })?;
                activity.anchor_id = Some(anchor);
            }

            let created = self.create_activity(&activity, plan_id).await?;
            if let Some(local) = activity.id {
                server_ids.insert(local, created);
            }
        }
        Ok(())
    }

    /// Patch a plan's name, start time or duration.
    #[instrument(skip(self))]
    pub async fn update_activity_plan(&self, plan_id: PlanId, patch: &PlanPatch) -> Result<PlanId> {
        if patch.is_empty() {
            return Err(PlanError::SchemaValidation("plan update sets no fields".to_string()));
        }
        self.request_id(
            queries::UPDATE_PLAN,
            json!({ "id": plan_id, "plan": patch.to_wire() }),
            "update_plan_by_pk",
            &format!("plan {plan_id}"),
        )
        .await
    }

    /// Delete a plan and its simulation configuration.
    #[instrument(skip(self))]
    pub async fn delete_activity_plan(&self, plan_id: PlanId) -> Result<PlanId> {
        let deleted = self
            .request_id(
                queries::DELETE_PLAN,
                json!({ "id": plan_id }),
                "delete_plan_by_pk",
                &format!("plan {plan_id}"),
            )
            .await?;
        info!(plan_id = deleted, "deleted activity plan");
        Ok(deleted)
    }

    /// Delete every plan, stopping at the first failure.
    #[instrument(skip(self))]
    pub async fn delete_all_activity_plans(&self) -> Result<Vec<PlanId>> {
        let plans = self.list_activity_plans().await?;
        let mut deleted = Vec::with_capacity(plans.len());
        for plan in plans {
            deleted.push(self.delete_activity_plan(plan.id).await?);
        }
        Ok(deleted)
    }

    /// Insert one activity into an existing plan. Its own id is ignored.
    #[instrument(skip(self, activity), fields(activity_type = %activity.activity_type))]
    pub async fn create_activity(&self, activity: &Activity, plan_id: PlanId) -> Result<ActivityId> {
        self.request_id(
            queries::CREATE_ACTIVITY,
            json!({ "activity": activity.to_wire_insert(plan_id) }),
            "insert_activity_directive_one",
            "created activity",
        )
        .await
    }

    /// Overwrite an activity in place; `activity.id` selects the row.
    #[instrument(skip(self, activity), fields(activity_id = ?activity.id))]
    pub async fn update_activity(&self, activity: &Activity, plan_id: PlanId) -> Result<ActivityId> {
        let id = activity.require_id()?;
        self.request_id(
            queries::UPDATE_ACTIVITY,
            json!({ "id": id, "planId": plan_id, "activity": activity.to_wire_body() }),
            "update_activity_directive_by_pk",
            &format!("activity {id} in plan {plan_id}"),
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn delete_activity(&self, activity_id: ActivityId, plan_id: PlanId) -> Result<ActivityId> {
        self.request_id(
            queries::DELETE_ACTIVITY,
            json!({ "id": activity_id, "planId": plan_id }),
            "delete_activity_directive_by_pk",
            &format!("activity {activity_id} in plan {plan_id}"),
        )
        .await
    }
}
