//! `plansim plans ...`

use std::io::Write;

use anyhow::Context;
use chrono::Utc;
use plansim_core::SimulationArguments;
use plansim_domain::{ActivityPlanCreate, ActivityPlanRead};

use super::{read_json, write_json};
use crate::cli::PlanCommands;
use crate::context::CommandContext;

/// # Errors
/// Returns service, file and encoding errors with context attached.
pub async fn execute<W: Write>(
    ctx: &CommandContext,
    command: PlanCommands,
    out: &mut W,
) -> anyhow::Result<()> {
    let client = &ctx.client;

    match command {
        PlanCommands::List => {
            let plans = client.list_activity_plans().await?;
            writeln!(out, "ID\tNAME\tSTART\tEND\tMODEL")?;
            for plan in &plans {
                write_plan_row(out, plan)?;
            }
        }
        PlanCommands::Download { id, output } => {
            let plan = client.get_activity_plan_by_id(id).await?;
            write_json(&output, &plan)?;
            writeln!(out, "Wrote activity plan to {}", output.display())?;
        }
        PlanCommands::Upload { input, model_id, time_tag } => {
            let mut plan: ActivityPlanCreate = read_json(&input)?;
            if time_tag {
                plan.append_time_tag(&Utc::now().fixed_offset());
            }
            let plan_id = client.create_activity_plan(model_id, &plan).await?;
            writeln!(out, "Created plan {plan_id}")?;
        }
        PlanCommands::Duplicate { id, name } => {
            let source = client.get_activity_plan_by_id(id).await?;
            let copy = ActivityPlanCreate::from_plan_read(&source).with_name(name);
            let plan_id = client.create_activity_plan(source.model_id, &copy).await?;
            writeln!(out, "Duplicated plan {id} as plan {plan_id}")?;
        }
        PlanCommands::Simulate { id, output, poll, summary } => {
            let options = ctx.poll_options(&poll);
            writeln!(out, "Simulating plan {id}")?;
            out.flush()?;
            if summary {
                let dataset = client.simulate_plan_summary(id, &options).await?;
                writeln!(out, "Simulation dataset {} is {}", dataset.id, dataset.status)?;
            } else {
                let results = client.simulate_plan(id, &options).await?;
                writeln!(out, "Simulated plan {id} (dataset {})", results.dataset.id)?;
                if let Some(path) = output {
                    write_json(&path, &results)?;
                    writeln!(out, "Wrote results to {}", path.display())?;
                }
            }
        }
        PlanCommands::AwaitSimulation { dataset_id, poll } => {
            let options = ctx.poll_options(&poll);
            let dataset = client.await_simulation_dataset(dataset_id, &options).await?;
            writeln!(out, "Simulation dataset {} is {}", dataset.id, dataset.status)?;
        }
        PlanCommands::DownloadResources { id, dataset_id, resources, output } => {
            let timelines = match (dataset_id, id) {
                (Some(dataset_id), _) => {
                    client.get_resource_samples_for_dataset(dataset_id, &resources).await?
                }
                (None, Some(plan_id)) => client.get_resource_samples(plan_id, &resources).await?,
                (None, None) => anyhow::bail!("either --id or --dataset-id is required"),
            };
            write_json(&output, &timelines)?;
            writeln!(out, "Wrote {} resource timelines to {}", timelines.len(), output.display())?;
        }
        PlanCommands::DownloadSimulation { dataset_id, output } => {
            let results = client.get_simulation_results(dataset_id).await?;
            write_json(&output, &results)?;
            writeln!(out, "Wrote results to {}", output.display())?;
        }
        PlanCommands::Delete { id } => {
            let deleted = client.delete_activity_plan(id).await?;
            writeln!(out, "Deleted plan {deleted}")?;
        }
        PlanCommands::Clean => {
            let deleted = client.delete_all_activity_plans().await?;
            writeln!(out, "Deleted {} plans", deleted.len())?;
        }
        PlanCommands::CreateConfig { id, arg_file } => {
            let arguments: SimulationArguments =
                read_json(&arg_file).context("simulation arguments must be a JSON object")?;
            let stored = client.create_config(id, &arguments).await?;
            write_arguments(out, id, &stored)?;
        }
        PlanCommands::UpdateConfig { id, arg_file } => {
            let arguments: SimulationArguments =
                read_json(&arg_file).context("simulation arguments must be a JSON object")?;
            let stored = client.update_config(id, &arguments).await?;
            write_arguments(out, id, &stored)?;
        }
    }

    Ok(())
}

fn write_plan_row<W: Write>(out: &mut W, plan: &ActivityPlanRead) -> anyhow::Result<()> {
    writeln!(
        out,
        "{}\t{}\t{}\t{}\t{}",
        plan.id,
        plan.name,
        plansim_domain::utils::format_timestamp(&plan.start_time),
        plansim_domain::utils::format_timestamp(&plan.end_time()?),
        plan.model_id
    )?;
    Ok(())
}

fn write_arguments<W: Write>(
    out: &mut W,
    plan_id: i64,
    arguments: &SimulationArguments,
) -> anyhow::Result<()> {
    writeln!(out, "Simulation arguments of plan {plan_id}:")?;
    writeln!(out, "{}", serde_json::to_string_pretty(arguments)?)?;
    Ok(())
}
