//! `plansim metadata ...`

use std::io::Write;

use plansim_domain::MetadataSchema;
use serde::Deserialize;

use super::read_json;
use crate::cli::MetadataCommands;
use crate::context::CommandContext;

/// Layout of a schema upload file.
#[derive(Debug, Deserialize)]
struct SchemaFile {
    schemas: Vec<MetadataSchema>,
}

/// # Errors
/// Returns service and file errors with context attached.
pub async fn execute<W: Write>(
    ctx: &CommandContext,
    command: MetadataCommands,
    out: &mut W,
) -> anyhow::Result<()> {
    let client = &ctx.client;

    match command {
        MetadataCommands::Upload { schema_file } => {
            let file: SchemaFile = read_json(&schema_file)?;
            let added = client.add_metadata_schemas(&file.schemas).await?;
            for schema in &added {
                writeln!(
                    out,
                    "Added metadata schema `{}` ({})",
                    schema.key,
                    schema.schema.type_name()
                )?;
            }
        }
        MetadataCommands::List => {
            let schemas = client.list_metadata_schemas().await?;
            writeln!(out, "KEY\tTYPE")?;
            for schema in &schemas {
                writeln!(out, "{}\t{}", schema.key, schema.schema.type_name())?;
            }
        }
        MetadataCommands::Delete { key } => {
            let removed = client.delete_metadata_schema(&key).await?;
            writeln!(out, "Schema `{removed}` has been removed.")?;
        }
    }

    Ok(())
}
