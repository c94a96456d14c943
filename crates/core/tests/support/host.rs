use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use plansim_core::client::queries::operation_name;
use plansim_core::HostSession;
use plansim_domain::{FileId, PlanError, Result as DomainResult};
use serde_json::{json, Map, Value};

#[derive(Default)]
struct State {
    next_id: i64,
    plans: BTreeMap<i64, Map<String, Value>>,
    activities: BTreeMap<i64, Vec<Map<String, Value>>>,
    simulations: Vec<Value>,
    activity_inserts: usize,
    log: Vec<String>,
}

/// In-memory stand-in for the planning service.
///
/// Understands just enough of the plan and activity operations to check
/// that what goes in comes back out. Ids are assigned from 100 upwards so
/// they never collide with local ids used in test plans.
#[derive(Default)]
pub struct FakePlanningHost {
    state: Mutex<State>,
    fail_activity_insert: Option<usize>,
}

impl FakePlanningHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer the `n`th activity insert (1-based) with a GraphQL error.
    pub fn failing_activity_insert(n: usize) -> Self {
        Self { fail_activity_insert: Some(n), ..Self::default() }
    }

    pub fn operations(&self) -> Vec<String> {
        self.state.lock().unwrap().log.clone()
    }

    pub fn plan_count(&self) -> usize {
        self.state.lock().unwrap().plans.len()
    }

    pub fn simulations(&self) -> Vec<Value> {
        self.state.lock().unwrap().simulations.clone()
    }

    fn assign_id(state: &mut State) -> i64 {
        state.next_id += 1;
        state.next_id + 99
    }
}

#[async_trait]
impl HostSession for FakePlanningHost {
    async fn send(&self, query: &str, variables: Value) -> DomainResult<Value> {
        let operation = operation_name(query).to_string();
        let mut state = self.state.lock().unwrap();
        state.log.push(operation.clone());

        let response = match operation.as_str() {
            "CreatePlan" => {
                let id = Self::assign_id(&mut state);
                let mut plan = variables["plan"].as_object().cloned().unwrap();
                plan.insert("id".into(), json!(id));
                state.plans.insert(id, plan);
                state.activities.insert(id, Vec::new());
                json!({"data": {"insert_plan_one": {"id": id}}})
            }
            "CreateSimulation" => {
                let id = Self::assign_id(&mut state);
                state.simulations.push(variables["simulation"].clone());
                json!({"data": {"insert_simulation_one": {"id": id}}})
            }
            "CreateActivity" => {
                state.activity_inserts += 1;
                if self.fail_activity_insert == Some(state.activity_inserts) {
                    json!({"errors": [{"message": "Foreign key violation", "extensions": {"code": "constraint-violation"}}]})
                } else {
                    let id = Self::assign_id(&mut state);
                    let mut activity = variables["activity"].as_object().cloned().unwrap();
                    let plan_id = activity.remove("plan_id").and_then(|v| v.as_i64()).unwrap();
                    activity.insert("id".into(), json!(id));
                    state.activities.get_mut(&plan_id).unwrap().push(activity);
                    json!({"data": {"insert_activity_directive_one": {"id": id}}})
                }
            }
            "GetPlan" => {
                let id = variables["id"].as_i64().unwrap();
                let plan = state.plans.get(&id).cloned().map(|mut plan| {
                    plan.insert("simulations".into(), json!([]));
                    plan.insert("activity_directives".into(), json!(state.activities[&id]));
                    Value::Object(plan)
                });
                json!({"data": {"plan_by_pk": plan}})
            }
            other => return Err(PlanError::Transport(format!("fake host cannot answer {other}"))),
        };
        Ok(response)
    }

    async fn upload_file(&self, _file_name: &str, _contents: Vec<u8>) -> DomainResult<FileId> {
        Err(PlanError::Transport("fake host has no gateway".into()))
    }
}
