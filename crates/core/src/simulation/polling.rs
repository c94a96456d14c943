//! Status-driven polling of simulation datasets
//!
//! A submitted simulation is polled by dataset id until it reaches a
//! terminal status. Each round sleeps for the configured period first and
//! then issues exactly one status query. `Failed` ends the wait immediately
//! with `SimulationFailed`; `Complete` hands back the dataset.

use std::time::Duration;

use plansim_domain::config::PollConfig;
use plansim_domain::{
    DatasetId, PlanError, PlanId, Result, SimulationDataset, SimulationResults, SimulationStatus,
};
use tracing::{debug, info, instrument, warn};

use crate::client::PlanningClient;

/// How long to wait between polls and when to give up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollOptions {
    pub period: Duration,
    /// Status queries allowed after submission; `None` waits forever.
    pub max_polls: Option<u32>,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self::from(&PollConfig::default())
    }
}

impl From<&PollConfig> for PollOptions {
    fn from(config: &PollConfig) -> Self {
        Self { period: Duration::from_secs(config.period_secs), max_polls: config.max_polls }
    }
}

/// Last observation of a dataset.
struct Observation {
    dataset_id: DatasetId,
    status: SimulationStatus,
    reason: Option<String>,
    dataset: Option<SimulationDataset>,
}

impl Observation {
    fn from_dataset(dataset: SimulationDataset) -> Self {
        Self {
            dataset_id: dataset.id,
            status: dataset.status,
            reason: dataset.reason.clone(),
            dataset: Some(dataset),
        }
    }
}

impl PlanningClient {
    /// Simulate a plan, wait for it and fetch the full results.
    ///
    /// # Errors
    /// `SimulationFailed` if the dataset fails, `PollLimitExceeded` if a
    /// bounded wait runs out, plus any request error.
    #[instrument(skip(self))]
    pub async fn simulate_plan(
        &self,
        plan_id: PlanId,
        options: &PollOptions,
    ) -> Result<SimulationResults> {
        let dataset_id = self.simulate_until_terminal(plan_id, options).await?.dataset_id;
        self.get_simulation_results(dataset_id).await
    }

    /// Like [`Self::simulate_plan`] but return only the terminal dataset record.
    #[instrument(skip(self))]
    pub async fn simulate_plan_summary(
        &self,
        plan_id: PlanId,
        options: &PollOptions,
    ) -> Result<SimulationDataset> {
        let last = self.simulate_until_terminal(plan_id, options).await?;
        match last.dataset {
            Some(dataset) => Ok(dataset),
            None => self.get_simulation_dataset(last.dataset_id).await,
        }
    }

    /// Wait on a dataset that is already running.
    #[instrument(skip(self))]
    pub async fn await_simulation_dataset(
        &self,
        dataset_id: DatasetId,
        options: &PollOptions,
    ) -> Result<SimulationDataset> {
        let first = Observation::from_dataset(self.get_simulation_dataset(dataset_id).await?);
        let last = self.poll_until_terminal(first, options).await?;
        match last.dataset {
            Some(dataset) => Ok(dataset),
            None => self.get_simulation_dataset(last.dataset_id).await,
        }
    }

    async fn simulate_until_terminal(
        &self,
        plan_id: PlanId,
        options: &PollOptions,
    ) -> Result<Observation> {
        let report = self.submit_simulation(plan_id).await?;
        let first = Observation {
            dataset_id: report.dataset_id,
            status: report.status,
            reason: report.reason,
            dataset: None,
        };
        self.poll_until_terminal(first, options).await
    }

    async fn poll_until_terminal(
        &self,
        mut current: Observation,
        options: &PollOptions,
    ) -> Result<Observation> {
        let mut polls: u32 = 0;

        while !current.status.is_terminal() {
            if options.max_polls.is_some_and(|limit| polls >= limit) {
                return Err(PlanError::PollLimitExceeded { dataset_id: current.dataset_id, polls });
            }

            self.sleeper.sleep(options.period).await;
            polls += 1;

            let next = Observation::from_dataset(self.get_simulation_dataset(current.dataset_id).await?);
            if !current.status.can_transition_to(next.status) {
                warn!(
                    dataset_id = current.dataset_id,
                    from = %current.status,
                    to = %next.status,
                    "unexpected simulation status transition"
                );
            }
            debug!(dataset_id = current.dataset_id, polls, status = %next.status, "polled simulation");
            current = next;
        }

        if current.status == SimulationStatus::Failed {
            return Err(PlanError::SimulationFailed {
                dataset_id: current.dataset_id,
                reason: current.reason.unwrap_or_else(|| "no reason reported".to_string()),
            });
        }

        info!(dataset_id = current.dataset_id, polls, "simulation complete");
        Ok(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_poll_every_five_seconds_without_limit() {
        let options = PollOptions::default();
        assert_eq!(options.period, Duration::from_secs(5));
        assert_eq!(options.max_polls, None);
    }

    #[test]
    fn options_follow_config() {
        let config = PollConfig { period_secs: 1, max_polls: Some(10) };
        let options = PollOptions::from(&config);
        assert_eq!(options.period, Duration::from_secs(1));
        assert_eq!(options.max_polls, Some(10));
    }
}
