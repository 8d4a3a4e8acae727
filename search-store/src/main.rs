use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::Value;
use tracing::info;

use search_store::telemetry::init_tracing;
use search_store::{Dependencies, Settings};
use search_store_repository::{DocumentIndexProvider, SearchIndexStore};
use search_store_shared::{Item, ItemStore, JsonDocument, ListOptions, SortOrder};

#[derive(Parser)]
#[command(name = "search-store")]
#[command(about = "Store and list JSON documents in an OpenSearch index", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report the cluster health without requiring it to be healthy
    Health,
    /// Create (or overwrite) a document
    Put {
        /// JSON file to read; stdin when omitted
        file: Option<PathBuf>,
    },
    /// Fetch a document by identity
    Get {
        namespace: String,
        id: String,
    },
    /// Merge fields into an existing document
    Update {
        /// JSON file to read; stdin when omitted
        file: Option<PathBuf>,
    },
    /// Delete a document by identity
    Delete {
        namespace: String,
        id: String,
    },
    /// List the documents of a namespace
    List {
        namespace: String,

        /// Zero-based page number
        #[arg(long, default_value = "0")]
        page: u64,

        /// Page size; 0 uses the engine's default window
        #[arg(long, default_value = "0")]
        limit: u64,

        /// Result order
        #[arg(long, value_enum, default_value = "natural")]
        sort: SortArg,
    },
    /// Close the index
    Close,
}

#[derive(Clone, Copy, ValueEnum)]
enum SortArg {
    Natural,
    CreatedAsc,
    CreatedDesc,
    UpdatedAsc,
    UpdatedDesc,
}

impl From<SortArg> for SortOrder {
    fn from(sort: SortArg) -> Self {
        match sort {
            SortArg::Natural => SortOrder::Natural,
            SortArg::CreatedAsc => SortOrder::CreatedAsc,
            SortArg::CreatedDesc => SortOrder::CreatedDesc,
            SortArg::UpdatedAsc => SortOrder::UpdatedAsc,
            SortArg::UpdatedDesc => SortOrder::UpdatedDesc,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let settings = Settings::from_env()?;

    match cli.command {
        Commands::Health => {
            // Built directly: the store's startup check would reject an unhealthy cluster.
            let provider = settings.connect().await?;
            let healthy = provider.health_check().await?;
            print_json(&serde_json::json!({ "healthy": healthy }))
        }
        command => {
            let deps = Dependencies::from_settings(settings)
                .await
                .context("Failed to initialize dependencies")?;
            run(command, &deps.store).await
        }
    }
}

async fn run(command: Commands, store: &SearchIndexStore) -> Result<()> {
    match command {
        Commands::Health => {
            let healthy = store.provider().health_check().await?;
            print_json(&serde_json::json!({ "healthy": healthy }))?;
        }
        Commands::Put { file } => {
            let mut doc = read_document(file)?;
            store.create(&mut doc).await?;
            info!(doc_id = %doc.id, namespace = %doc.namespace, "Stored document");
            print_json(&serde_json::to_value(&doc)?)?;
        }
        Commands::Get { namespace, id } => {
            let mut doc = JsonDocument::new(namespace, id);
            store.read(&mut doc).await?;
            print_json(&serde_json::to_value(&doc)?)?;
        }
        Commands::Update { file } => {
            let mut doc = read_document(file)?;
            if doc.id.is_empty() {
                bail!("update requires an \"id\" field");
            }
            store.update(&mut doc).await?;
            print_json(&serde_json::to_value(&doc)?)?;
        }
        Commands::Delete { namespace, id } => {
            store.delete(&JsonDocument::new(namespace, id)).await?;
        }
        Commands::List {
            namespace,
            page,
            limit,
            sort,
        } => {
            let options = ListOptions::new(page, limit).with_sort(sort.into());
            let items = store
                .list(&JsonDocument::factory(namespace), &options)
                .await?;

            let values = items
                .iter()
                .map(|item| to_value(item.as_ref()))
                .collect::<Result<Vec<_>>>()?;
            print_json(&Value::Array(values))?;
        }
        Commands::Close => {
            store.close().await?;
        }
    }

    Ok(())
}

fn read_document(file: Option<PathBuf>) -> Result<JsonDocument> {
    let raw = match file {
        Some(path) => fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let value: Value = serde_json::from_str(&raw).context("Input is not valid JSON")?;
    Ok(JsonDocument::from_value(value)?)
}

fn to_value(item: &dyn Item) -> Result<Value> {
    let Some(serializable) = item.as_serializable() else {
        bail!("listed item is not serializable");
    };
    Ok(serde_json::from_slice(&serializable.marshal()?)?)
}

fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
