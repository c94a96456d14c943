//! Config resolution and client construction for a command run.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use plansim_core::{PlanningClient, PollOptions};
use plansim_domain::ClientConfig;
use plansim_infra::config::{apply_env_overrides, load, load_from_file};
use plansim_infra::{HttpHostSession, TokioSleeper};

use crate::cli::{GlobalArgs, PollArgs};

/// Everything a command needs: the resolved config and a ready client.
pub struct CommandContext {
    pub config: ClientConfig,
    pub client: PlanningClient,
}

impl CommandContext {
    /// # Errors
    /// Fails when the configuration cannot be loaded or the session cannot
    /// be built from it.
    pub fn from_args(args: &GlobalArgs) -> anyhow::Result<Self> {
        let config = resolve_config(args)?;
        let session = HttpHostSession::from_config(&config)
            .context("failed to set up the host session")?;
        let client = PlanningClient::new(Arc::new(session), Arc::new(TokioSleeper));
        Ok(Self { config, client })
    }

    /// Poll settings from config with command-line overrides applied.
    pub fn poll_options(&self, args: &PollArgs) -> PollOptions {
        let mut options = PollOptions::from(&self.config.poll);
        if let Some(period) = args.poll_period {
            options.period = Duration::from_secs(period);
        }
        if let Some(max_polls) = args.max_polls {
            options.max_polls = Some(max_polls);
        }
        options
    }
}

/// Load config from `--config` or the usual sources, then apply flags.
///
/// # Errors
/// Fails when a config source is present but invalid.
pub fn resolve_config(args: &GlobalArgs) -> anyhow::Result<ClientConfig> {
    let mut config = match &args.config {
        Some(path) => apply_env_overrides(
            load_from_file(Some(path.clone()))
                .with_context(|| format!("failed to load config from {}", path.display()))?,
        ),
        None => load().context("failed to load configuration")?,
    };

    if let Some(url) = &args.graphql_url {
        config.graphql_url.clone_from(url);
    }
    if let Some(url) = &args.gateway_url {
        config.gateway_url.clone_from(url);
    }
    if let Some(token) = &args.token {
        config.auth.token = Some(token.clone());
    }
    if let Some(secret) = &args.admin_secret {
        config.auth.admin_secret = Some(secret.clone());
    }
    if let Some(role) = &args.role {
        config.auth.role = Some(role.clone());
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn config_file() -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "graphql_url = \"http://file/v1/graphql\"\ngateway_url = \"http://file:9000\"\n\n[poll]\nperiod_secs = 9\nmax_polls = 4"
        )
        .unwrap();
        file
    }

    #[test]
    fn flags_override_the_config_file() {
        let file = config_file();
        let args = GlobalArgs {
            config: Some(file.path().to_path_buf()),
            graphql_url: Some("http://flag/v1/graphql".into()),
            role: Some("viewer".into()),
            ..GlobalArgs::default()
        };

        let config = resolve_config(&args).unwrap();
        assert_eq!(config.graphql_url, "http://flag/v1/graphql");
        assert_eq!(config.gateway_url, "http://file:9000");
        assert_eq!(config.auth.role.as_deref(), Some("viewer"));
    }

    #[test]
    fn poll_flags_override_poll_config() {
        let file = config_file();
        let args = GlobalArgs { config: Some(file.path().to_path_buf()), ..GlobalArgs::default() };
        let ctx = CommandContext::from_args(&args).unwrap();

        let defaults = ctx.poll_options(&PollArgs::default());
        assert_eq!(defaults.period, Duration::from_secs(9));
        assert_eq!(defaults.max_polls, Some(4));

        let overridden = ctx.poll_options(&PollArgs { poll_period: Some(1), max_polls: None });
        assert_eq!(overridden.period, Duration::from_secs(1));
        assert_eq!(overridden.max_polls, Some(4));
    }

    #[test]
    fn missing_config_file_is_reported() {
        let args = GlobalArgs {
            config: Some("/nonexistent/plansim.toml".into()),
            ..GlobalArgs::default()
        };
        let err = resolve_config(&args).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/plansim.toml"));
    }
}
