//! `plansim sequences ...`

use std::io::Write;

use anyhow::Context;

use super::write_json;
use crate::cli::SequenceCommands;
use crate::context::CommandContext;

/// # Errors
/// Returns service and file errors with context attached.
pub async fn execute<W: Write>(
    ctx: &CommandContext,
    command: SequenceCommands,
    out: &mut W,
) -> anyhow::Result<()> {
    match command {
        SequenceCommands::Compile { dictionary_id, input, output } => {
            let edsl = std::fs::read_to_string(&input)
                .with_context(|| format!("failed to read {}", input.display()))?;
            let sequence = ctx.client.get_sequence_json(dictionary_id, &edsl).await?;
            match output {
                Some(path) => {
                    write_json(&path, &sequence)?;
                    writeln!(out, "Wrote sequence JSON to {}", path.display())?;
                }
                None => writeln!(out, "{}", serde_json::to_string_pretty(&sequence)?)?,
            }
        }
    }

    Ok(())
}
