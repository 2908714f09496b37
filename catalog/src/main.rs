use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use serde_json::json;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use catalog::{CatalogClient, CatalogSettings, CollectionStatus, Dependencies};

#[derive(Parser)]
#[command(name = "catalog")]
#[command(about = "Load employee CSV exports into a search index and query them", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a collection if it does not exist
    Create { collection: String },
    /// Index the employee CSV into a collection
    Index {
        collection: String,
        /// Column to drop from every row
        #[arg(long)]
        exclude: String,
        /// CSV file to read instead of the configured one
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Search a collection by a single column
    Search {
        collection: String,
        column: String,
        value: String,
    },
    /// Count the documents in a collection
    Count { collection: String },
    /// Delete employees by id
    Delete { collection: String, id: String },
    /// Document counts per department
    Facets { collection: String },
    /// Check the search service health
    Health,
}

fn init_tracing(json_logs: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json_logs {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    if let Err(e) = run(cli.command).await {
        error!("Command failed: {}", e);
        eprintln!("Error: {}", e);

        for cause in e.chain().skip(1) {
            eprintln!("  Caused by: {}", cause);
        }
        process::exit(1);
    }
}

async fn run(command: Commands) -> Result<()> {
    let settings = CatalogSettings::from_env().context("Failed to load settings")?;
    let deps = Dependencies::new(settings)
        .await
        .context("Failed to initialize dependencies")?;

    let output = execute(&deps.client, command).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

async fn execute(client: &CatalogClient, command: Commands) -> Result<serde_json::Value> {
    let output = match command {
        Commands::Create { collection } => {
            let name = CatalogClient::collection_name(&collection)?;
            let status = client
                .create_collection(&collection)
                .await
                .with_context(|| format!("Error creating collection {}", collection))?;
            let status = match status {
                CollectionStatus::Created => "created",
                CollectionStatus::AlreadyExists => "already_exists",
            };
            json!({ "collection": name.as_str(), "status": status })
        }
        Commands::Index {
            collection,
            exclude,
            csv,
        } => {
            let name = CatalogClient::collection_name(&collection)?;
            let report = match csv {
                Some(path) => client.index_file(&collection, &exclude, &path).await,
                None => client.index_data(&collection, &exclude).await,
            }
            .with_context(|| format!("Error indexing data into {}", collection))?;

            if !report.is_complete() {
                for failure in &report.failures {
                    if let Some(err) = &failure.error {
                        error!(position = failure.position, error = %err, "Document was not indexed");
                    }
                }
            }

            json!({
                "collection": name.as_str(),
                "total_rows": report.total_rows,
                "dropped_rows": report.dropped_rows,
                "indexed": report.indexed,
                "failed": report.failed,
            })
        }
        Commands::Search {
            collection,
            column,
            value,
        } => {
            let result = client
                .search_by_column(&collection, &column, &value)
                .await
                .with_context(|| format!("Error searching collection {}", collection))?;
            serde_json::to_value(result)?
        }
        Commands::Count { collection } => {
            let name = CatalogClient::collection_name(&collection)?;
            let count = client
                .get_emp_count(&collection)
                .await
                .context("Error getting employee count")?;
            json!({ "collection": name.as_str(), "count": count })
        }
        Commands::Delete { collection, id } => {
            let deleted = client
                .del_emp_by_id(&collection, &id)
                .await
                .with_context(|| format!("Error deleting employee with ID {}", id))?;
            info!("Employee with ID {} deleted successfully.", id);
            json!({ "id": id, "deleted": deleted })
        }
        Commands::Facets { collection } => {
            let buckets = client
                .get_dep_facet(&collection)
                .await
                .context("Error getting department facets")?;
            serde_json::to_value(buckets)?
        }
        Commands::Health => {
            let healthy = client
                .health_check()
                .await
                .context("Search service health check failed")?;
            json!({ "healthy": healthy })
        }
    };

    Ok(output)
}
