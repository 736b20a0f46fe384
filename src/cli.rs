use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use entity_console::config::ListDefaults;
use entity_console::context::EntityContext;
use entity_console::entity::{ListQuery, Record, RecordId, SortOrder};
use entity_console::mvi::Reducer;
use entity_console::resources::{ResourceKind, ServiceContext};
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::info;

#[derive(Debug, Parser)]
#[command(
    name = "entity-console",
    version,
    about = "List, create, edit and delete console records over the REST API"
)]
pub struct Cli {
    /// Config file (default: <config dir>/entity-console/config.toml).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Override `api.base_url`.
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    #[arg(value_enum)]
    pub resource: ResourceKind,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print one page of records.
    List {
        #[arg(long, default_value_t = 0)]
        skip: u64,
        #[arg(long)]
        limit: Option<u64>,
        #[arg(long)]
        filter: Option<String>,
        #[arg(long)]
        sort_field: Option<String>,
        #[arg(long)]
        sort_order: Option<SortOrder>,
    },
    /// Print one record.
    Get { id: String },
    /// Create a record from a JSON object.
    Create { json: String },
    /// Replace the record at ID with a JSON object.
    Update { id: String, json: String },
    /// Delete a record after confirmation.
    Delete {
        id: String,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
    /// Print the lookup tables configured for the resource.
    Refs,
    /// Run the health check of a service.
    Check { id: String },
    /// Print the metrics of a service.
    Metrics { id: String },
}

/// Run a command against a service context, which also supports check/metrics.
pub async fn execute_service(
    context: &ServiceContext,
    list: &ListDefaults,
    command: Command,
) -> Result<Value> {
    match command {
        Command::Check { id } => {
            let check = context.check(RecordId::parse(&id)).await?;
            Ok(serde_json::to_value(check)?)
        }
        Command::Metrics { id } => Ok(context.metrics(RecordId::parse(&id)).await?),
        other => execute(context, list, other).await,
    }
}

pub async fn execute<T, X>(
    context: &EntityContext<T, X>,
    list: &ListDefaults,
    command: Command,
) -> Result<Value>
where
    T: Record,
    X: Reducer + 'static,
{
    match command {
        Command::List {
            skip,
            limit,
            filter,
            sort_field,
            sort_order,
        } => {
            let query = ListQuery::new(skip, limit.unwrap_or(list.page_size))
                .filter(filter)
                .sort(
                    sort_field.unwrap_or_else(|| list.sort_field.clone()),
                    sort_order.unwrap_or(list.sort_order),
                );
            let page = context.fetch(query).await?;
            Ok(serde_json::to_value(page)?)
        }
        Command::Get { id } => {
            let record = context.find(RecordId::parse(&id)).await?;
            Ok(serde_json::to_value(record)?)
        }
        Command::Create { json } => {
            let payload = parse_payload(&json)?;
            let record = context
                .create(
                    payload,
                    |_: &T| info!("record created"),
                    |message: &str| eprintln!("Create failed: {}", message),
                )
                .await?;
            Ok(serde_json::to_value(record)?)
        }
        Command::Update { id, json } => {
            let payload = parse_payload(&json)?;
            let record = context
                .update(
                    RecordId::parse(&id),
                    payload,
                    |_: &T| info!("record updated"),
                    |message: &str| eprintln!("Update failed: {}", message),
                )
                .await?;
            Ok(serde_json::to_value(record)?)
        }
        Command::Delete { id, yes } => {
            let id = RecordId::parse(&id);
            context.open_confirm(id.clone());

            if !yes && !confirm(&format!("Delete {} {}?", context.actions().path(), id)).await? {
                context.close_confirm();
                return Ok(json!({ "deleted": false, "id": id }));
            }

            match context.delete_confirmed() {
                Some(delete) => delete.await?,
                None => bail!("no delete is pending"),
            }
            Ok(json!({ "deleted": true, "id": id }))
        }
        Command::Refs => {
            let refs = context.load_references().await?;
            Ok(serde_json::to_value(refs)?)
        }
        Command::Check { .. } | Command::Metrics { .. } => {
            bail!("check and metrics are only available for {}", ResourceKind::Services)
        }
    }
}

fn parse_payload(raw: &str) -> Result<Value> {
    let value: Value = serde_json::from_str(raw).context("payload is not valid JSON")?;
    if !value.is_object() {
        bail!("payload must be a JSON object");
    }
    Ok(value)
}

async fn confirm(prompt: &str) -> Result<bool> {
    let mut stderr = tokio::io::stderr();
    stderr.write_all(format!("{} [y/N] ", prompt).as_bytes()).await?;
    stderr.flush().await?;

    let mut line = String::new();
    BufReader::new(tokio::io::stdin()).read_line(&mut line).await?;
    Ok(matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}
