//! CLI subcommand handlers.

use crate::render::{self, OutputFormat};
use crate::{Commands, ConfigAction};
use insightsynth_core::config::{InsightConfig, init_workspace_config, load_config, workspace_config_path};
use insightsynth_core::gateway::run_gateway;
use insightsynth_core::{InsightError, ResearchEngine, ResearchError};
use std::path::Path;

/// Handle a CLI subcommand.
pub async fn handle_command(command: Commands, workspace: &Path) -> anyhow::Result<()> {
    match command {
        Commands::Serve { host, port } => handle_serve(workspace, host, port).await,
        Commands::Research {
            topic,
            max_sources,
            format,
        } => handle_research(workspace, &topic, max_sources, format).await,
        Commands::Sources {
            topic,
            max_sources,
            format,
        } => handle_sources(workspace, &topic, max_sources, format).await,
        Commands::Config { action } => handle_config(action, workspace).await,
    }
}

fn load(workspace: &Path) -> anyhow::Result<InsightConfig> {
    let config = load_config(Some(workspace), None).map_err(InsightError::from)?;
    for warning in config.validate() {
        tracing::warn!("{}", warning);
    }
    Ok(config)
}

fn build_engine(config: &InsightConfig) -> anyhow::Result<ResearchEngine> {
    Ok(ResearchEngine::from_config(config).map_err(InsightError::from)?)
}

/// Pipeline errors keep their classification in the CLI message.
fn describe(err: ResearchError) -> anyhow::Error {
    let class = match err {
        ResearchError::InvalidRequest { .. } => "invalid request",
        ResearchError::NotFound { .. } => "not found",
        ResearchError::Internal { .. } => "internal error",
    };
    anyhow::anyhow!("{} ({})", err, class)
}

async fn handle_serve(
    workspace: &Path,
    host: Option<String>,
    port: Option<u16>,
) -> anyhow::Result<()> {
    let mut config = load(workspace)?;
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    let engine = build_engine(&config)?;
    println!(
        "InsightSynth gateway on http://{}",
        config.server.bind_addr()
    );
    run_gateway(engine, &config.server).await?;
    Ok(())
}

async fn handle_research(
    workspace: &Path,
    topic: &str,
    max_sources: Option<usize>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let config = load(workspace)?;
    let engine = build_engine(&config)?;
    let max_sources = max_sources.unwrap_or_else(|| engine.default_max_sources());
    let report = engine
        .assemble(topic, max_sources)
        .await
        .map_err(describe)?;
    println!("{}", render::render_report(&report, format)?);
    Ok(())
}

async fn handle_sources(
    workspace: &Path,
    topic: &str,
    max_sources: Option<usize>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let config = load(workspace)?;
    let engine = build_engine(&config)?;
    let max_sources = max_sources.unwrap_or_else(|| engine.default_max_sources());
    let listing = engine
        .list_sources(topic, max_sources)
        .await
        .map_err(describe)?;
    println!("{}", render::render_listing(&listing, format)?);
    Ok(())
}

async fn handle_config(action: ConfigAction, workspace: &Path) -> anyhow::Result<()> {
    match action {
        ConfigAction::Init => {
            match init_workspace_config(workspace)? {
                Some(path) => println!("Created default configuration at: {}", path.display()),
                None => println!(
                    "Configuration file already exists at: {}",
                    workspace_config_path(workspace).display()
                ),
            }
            Ok(())
        }
        ConfigAction::Show => {
            let config = load_config(Some(workspace), None).map_err(InsightError::from)?;
            println!("{}", config.to_toml().map_err(InsightError::from)?);

            for warning in config.validate() {
                println!("# warning: {}", warning);
            }

            let mode = build_engine(&config)?.mode();
            println!("# sources:     {}", mode.sources);
            println!("# summarizer:  {}", mode.summarizer);
            println!("# synthesizer: {}", mode.synthesizer);
            println!("# reasoning:   {}", mode.reasoning);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_config_init_creates_file() {
        let dir = TempDir::new().unwrap();
        let workspace = dir.path();

        let command = Commands::Config {
            action: ConfigAction::Init,
        };
        handle_command(command, workspace).await.unwrap();

        let config_path = workspace.join(".insightsynth").join("config.toml");
        assert!(config_path.exists());

        let content = std::fs::read_to_string(&config_path).unwrap();
        let parsed: InsightConfig = toml::from_str(&content).unwrap();
        assert_eq!(parsed.research.default_max_sources, 3);
        assert_eq!(parsed.server.port, 8000);
    }

    #[tokio::test]
    async fn test_config_init_idempotent() {
        let dir = TempDir::new().unwrap();
        let workspace = dir.path();

        let command = Commands::Config {
            action: ConfigAction::Init,
        };
        handle_command(command, workspace).await.unwrap();

        let config_path = workspace.join(".insightsynth").join("config.toml");
        std::fs::write(&config_path, "[research]\ndemo_mode = true\n").unwrap();

        let command = Commands::Config {
            action: ConfigAction::Init,
        };
        handle_command(command, workspace).await.unwrap();
        let content = std::fs::read_to_string(&config_path).unwrap();
        assert_eq!(content, "[research]\ndemo_mode = true\n");
    }

    #[test]
    fn test_load_reports_bad_config() {
        let dir = TempDir::new().unwrap();
        let path = workspace_config_path(dir.path());
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "[research]\ndefault_max_sources = \"many\"\n").unwrap();

        let err = load(dir.path()).unwrap_err();
        assert!(err.to_string().starts_with("Configuration error: "));
        assert!(err.downcast_ref::<InsightError>().is_some());
    }

    #[test]
    fn test_describe_keeps_class() {
        let err = describe(ResearchError::invalid("topic must not be empty"));
        assert_eq!(
            err.to_string(),
            "Invalid request: topic must not be empty (invalid request)"
        );
    }
}
