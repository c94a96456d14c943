//! Command-line argument parsing with clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// plansim - plan, simulate and inspect missions on a planning service.
#[derive(Parser, Debug, Clone)]
#[command(name = "plansim")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Command group to run.
    #[command(subcommand)]
    pub command: Commands,
}

/// Connection and logging options shared by every command.
///
/// Anything left unset comes from the environment or a config file.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// GraphQL endpoint of the deployment.
    #[arg(long, global = true)]
    pub graphql_url: Option<String>,

    /// Gateway base URL used for file uploads.
    #[arg(long, global = true)]
    pub gateway_url: Option<String>,

    /// Bearer token sent with every request.
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Hasura admin secret.
    #[arg(long, global = true)]
    pub admin_secret: Option<String>,

    /// Hasura role to request.
    #[arg(long, global = true)]
    pub role: Option<String>,

    /// Explicit config file (JSON or TOML).
    #[arg(long, global = true, env = "PLANSIM_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log output format.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Top-level command groups.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Activity plans and their simulations.
    Plans {
        #[command(subcommand)]
        command: PlanCommands,
    },

    /// Mission models.
    Models {
        #[command(subcommand)]
        command: ModelCommands,
    },

    /// Activity metadata schemas.
    Metadata {
        #[command(subcommand)]
        command: MetadataCommands,
    },

    /// Command sequences.
    Sequences {
        #[command(subcommand)]
        command: SequenceCommands,
    },
}

impl Commands {
    /// Stable `group.command` identifier for logs.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Plans { command } => command.name(),
            Self::Models { command } => command.name(),
            Self::Metadata { command } => command.name(),
            Self::Sequences { command } => command.name(),
        }
    }
}

/// Polling overrides for commands that wait on a simulation.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct PollArgs {
    /// Seconds between status polls.
    #[arg(long)]
    pub poll_period: Option<u64>,

    /// Give up after this many status polls.
    #[arg(long)]
    pub max_polls: Option<u32>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum PlanCommands {
    /// List plans on the server.
    List,

    /// Save a plan as JSON.
    Download {
        /// Plan id.
        #[arg(long)]
        id: i64,

        /// Destination file.
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Create a plan from a JSON file.
    Upload {
        /// Plan JSON file.
        #[arg(short, long)]
        input: PathBuf,

        /// Mission model the plan belongs to.
        #[arg(long)]
        model_id: i64,

        /// Append the current time to the plan name.
        #[arg(long)]
        time_tag: bool,
    },

    /// Copy a plan under a new name.
    Duplicate {
        /// Plan to copy.
        #[arg(long)]
        id: i64,

        /// Name of the copy.
        #[arg(long)]
        name: String,
    },

    /// Simulate a plan and wait for it to finish.
    Simulate {
        /// Plan id.
        #[arg(long)]
        id: i64,

        /// Write the simulation results to this file.
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        poll: PollArgs,

        /// Report the final dataset record instead of downloading results.
        #[arg(long, conflicts_with = "output")]
        summary: bool,
    },

    /// Wait for an already running simulation dataset.
    AwaitSimulation {
        /// Dataset id.
        #[arg(long)]
        dataset_id: i64,

        #[command(flatten)]
        poll: PollArgs,
    },

    /// Save simulated resource timelines as JSON.
    DownloadResources {
        /// Plan whose latest simulation is used.
        #[arg(long, required_unless_present = "dataset_id")]
        id: Option<i64>,

        /// Use this dataset instead of the plan's latest.
        #[arg(long, conflicts_with = "id")]
        dataset_id: Option<i64>,

        /// Resource to include; repeat for more. Defaults to all.
        #[arg(short, long = "resource")]
        resources: Vec<String>,

        /// Destination file.
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Save the full results of a simulation dataset as JSON.
    DownloadSimulation {
        /// Dataset id.
        #[arg(long)]
        dataset_id: i64,

        /// Destination file.
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Delete a plan.
    Delete {
        /// Plan id.
        #[arg(long)]
        id: i64,
    },

    /// Delete every plan on the server.
    Clean,

    /// Replace a plan's simulation arguments with a JSON object.
    CreateConfig {
        /// Plan id.
        #[arg(long)]
        id: i64,

        /// JSON file holding an object of arguments.
        #[arg(long)]
        arg_file: PathBuf,
    },

    /// Merge a JSON object into a plan's simulation arguments.
    UpdateConfig {
        /// Plan id.
        #[arg(long)]
        id: i64,

        /// JSON file holding an object of arguments.
        #[arg(long)]
        arg_file: PathBuf,
    },
}

impl PlanCommands {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::List => "plans.list",
            Self::Download { .. } => "plans.download",
            Self::Upload { .. } => "plans.upload",
            Self::Duplicate { .. } => "plans.duplicate",
            Self::Simulate { .. } => "plans.simulate",
            Self::AwaitSimulation { .. } => "plans.await_simulation",
            Self::DownloadResources { .. } => "plans.download_resources",
            Self::DownloadSimulation { .. } => "plans.download_simulation",
            Self::Delete { .. } => "plans.delete",
            Self::Clean => "plans.clean",
            Self::CreateConfig { .. } => "plans.create_config",
            Self::UpdateConfig { .. } => "plans.update_config",
        }
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum ModelCommands {
    /// Upload a mission model jar and register it.
    Upload {
        /// Compiled model jar.
        #[arg(long)]
        jar: PathBuf,

        /// Model name.
        #[arg(long)]
        name: String,

        /// Model version.
        #[arg(long)]
        version: String,

        /// Mission the model belongs to.
        #[arg(long, default_value = "")]
        mission: String,
    },

    /// List mission models.
    List,

    /// Delete a mission model.
    Delete {
        /// Model id.
        #[arg(long)]
        id: i64,
    },

    /// Show the resource types a model declares.
    ResourceTypes {
        /// Model id.
        #[arg(long)]
        model_id: i64,
    },
}

impl ModelCommands {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Upload { .. } => "models.upload",
            Self::List => "models.list",
            Self::Delete { .. } => "models.delete",
            Self::ResourceTypes { .. } => "models.resource_types",
        }
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum MetadataCommands {
    /// Add metadata schemas from a JSON file with a `schemas` array.
    Upload {
        /// Schema file.
        #[arg(long)]
        schema_file: PathBuf,
    },

    /// List metadata schemas.
    List,

    /// Delete a metadata schema by key.
    Delete {
        /// Schema key.
        #[arg(long)]
        key: String,
    },
}

impl MetadataCommands {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Upload { .. } => "metadata.upload",
            Self::List => "metadata.list",
            Self::Delete { .. } => "metadata.delete",
        }
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum SequenceCommands {
    /// Compile an EDSL sequence to JSON.
    Compile {
        /// Command dictionary to compile against.
        #[arg(long)]
        dictionary_id: i64,

        /// EDSL source file.
        #[arg(short, long)]
        input: PathBuf,

        /// Destination file; stdout when omitted.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

impl SequenceCommands {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Compile { .. } => "sequences.compile",
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_plan_download() {
        let cli = Cli::parse_from(["plansim", "plans", "download", "--id", "4", "-o", "plan.json"]);
        match cli.command {
            Commands::Plans { command: PlanCommands::Download { id, output } } => {
                assert_eq!(id, 4);
                assert_eq!(output, PathBuf::from("plan.json"));
            }
            other => panic!("expected plans download, got {other:?}"),
        }
    }

    #[test]
    fn global_flags_are_accepted_after_the_subcommand() {
        let cli = Cli::parse_from([
            "plansim",
            "models",
            "list",
            "--graphql-url",
            "http://aerie:8080/v1/graphql",
            "--log-format",
            "json",
        ]);
        assert_eq!(cli.global.graphql_url.as_deref(), Some("http://aerie:8080/v1/graphql"));
        assert_eq!(cli.global.log_format, LogFormat::Json);
        assert_eq!(cli.command.name(), "models.list");
    }

    #[test]
    fn simulate_takes_poll_overrides() {
        let cli = Cli::parse_from([
            "plansim", "plans", "simulate", "--id", "1", "--poll-period", "2", "--max-polls", "9",
        ]);
        match cli.command {
            Commands::Plans { command: PlanCommands::Simulate { poll, summary, output, .. } } => {
                assert_eq!(poll, PollArgs { poll_period: Some(2), max_polls: Some(9) });
                assert!(!summary);
                assert!(output.is_none());
            }
            other => panic!("expected plans simulate, got {other:?}"),
        }
    }

    #[test]
    fn summary_and_output_are_exclusive() {
        let result = Cli::try_parse_from([
            "plansim", "plans", "simulate", "--id", "1", "--summary", "-o", "out.json",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn download_resources_needs_a_plan_or_dataset() {
        assert!(Cli::try_parse_from(["plansim", "plans", "download-resources", "-o", "r.json"])
            .is_err());

        let cli = Cli::parse_from([
            "plansim",
            "plans",
            "download-resources",
            "--dataset-id",
            "8",
            "-r",
            "batteryCharge",
            "-r",
            "/imager/mode",
            "-o",
            "r.json",
        ]);
        match cli.command {
            Commands::Plans { command: PlanCommands::DownloadResources { id, dataset_id, resources, .. } } => {
                assert_eq!(id, None);
                assert_eq!(dataset_id, Some(8));
                assert_eq!(resources, vec!["batteryCharge".to_string(), "/imager/mode".to_string()]);
            }
            other => panic!("expected download-resources, got {other:?}"),
        }
    }

    #[test]
    fn model_upload_defaults_mission_to_empty() {
        let cli = Cli::parse_from([
            "plansim", "models", "upload", "--jar", "banana.jar", "--name", "banananation",
            "--version", "1.0",
        ]);
        match cli.command {
            Commands::Models { command: ModelCommands::Upload { mission, .. } } => {
                assert_eq!(mission, "");
            }
            other => panic!("expected models upload, got {other:?}"),
        }
    }
}
