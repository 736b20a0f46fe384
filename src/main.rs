mod cli;

use anyhow::Result;
use clap::Parser;
use entity_console::config::Config;
use entity_console::logging::init_tracing;
use entity_console::resources::{Contexts, ResourceKind};

use crate::cli::{execute, execute_service, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(url) = cli.api_url {
        config.api.base_url = url;
        config.validate()?;
    }

    let contexts = Contexts::from_config(&config)?;
    let list = &config.list;

    let output = match cli.resource {
        ResourceKind::Dictionaries => execute(&contexts.dictionaries, list, cli.command).await?,
        ResourceKind::MedicalBrands => execute(&contexts.medical_brands, list, cli.command).await?,
        ResourceKind::Services => execute_service(&contexts.services, list, cli.command).await?,
        ResourceKind::ClinicSpecializations => {
            execute(&contexts.clinic_specializations, list, cli.command).await?
        }
        ResourceKind::Food => execute(&contexts.food, list, cli.command).await?,
        ResourceKind::Tasks => execute(&contexts.tasks, list, cli.command).await?,
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
