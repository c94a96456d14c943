//! `plansim models ...`

use std::io::Write;

use anyhow::Context;
use plansim_domain::MissionModelUpload;

use crate::cli::ModelCommands;
use crate::context::CommandContext;

/// # Errors
/// Returns service and file errors with context attached.
pub async fn execute<W: Write>(
    ctx: &CommandContext,
    command: ModelCommands,
    out: &mut W,
) -> anyhow::Result<()> {
    let client = &ctx.client;

    match command {
        ModelCommands::Upload { jar, name, version, mission } => {
            let bytes =
                std::fs::read(&jar).with_context(|| format!("failed to read {}", jar.display()))?;
            let jar_name = jar
                .file_name()
                .and_then(|n| n.to_str())
                .map_or_else(|| format!("{name}.jar"), str::to_string);
            let upload = MissionModelUpload { name, version, mission, jar_name, jar: bytes };
            let model_id = client.upload_mission_model(&upload).await?;
            writeln!(out, "Created mission model {model_id}")?;
        }
        ModelCommands::List => {
            let models = client.list_mission_models().await?;
            writeln!(out, "ID\tNAME\tVERSION\tMISSION")?;
            for model in &models {
                writeln!(out, "{}\t{}\t{}\t{}", model.id, model.name, model.version, model.mission)?;
            }
        }
        ModelCommands::Delete { id } => {
            let deleted = client.delete_mission_model(id).await?;
            writeln!(out, "Deleted mission model {deleted}")?;
        }
        ModelCommands::ResourceTypes { model_id } => {
            let types = client.get_resource_types(model_id).await?;
            for resource in &types {
                writeln!(out, "{}\t{}", resource.name, serde_json::to_string(&resource.schema)?)?;
            }
        }
    }

    Ok(())
}
