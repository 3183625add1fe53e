//! assetdesk: command-line client for the asset API.
//!
//! Set ASSETDESK_API_TOKEN and ASSETDESK_API_URL (or API_URL). Uses Bearer auth.

use std::path::PathBuf;

use anyhow::Context;
use assetdesk_api_client::ApiClient;
use assetdesk_cli::{ensure_any_succeeded, init_tracing, print_asset_table, print_outcome};
use assetdesk_core::models::{group_by_category, Asset, AssetKind, PendingFilePatch};
use assetdesk_core::{
    AssetDesk, DeskConfig, DirectoryTarget, ErrorMetadata, FileSource, LocalFile,
};
use clap::{Parser, Subcommand};
use serde::Serialize;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "assetdesk", about = "Upload, list, download and delete brand assets")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode local files and upload them as assets
    Upload {
        /// Files to upload
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Override the detected type: image, video, audio, document
        #[arg(long)]
        r#type: Option<String>,
        /// Override the detected category
        #[arg(long)]
        category: Option<String>,
        /// Description applied to every file
        #[arg(long)]
        description: Option<String>,
        /// Asset name (only when uploading a single file)
        #[arg(long)]
        name: Option<String>,
    },
    /// List stored assets
    List {
        /// Filter by type: image, video, audio, document
        #[arg(long)]
        r#type: Option<String>,
        /// Filter by category
        #[arg(long)]
        category: Option<String>,
        /// Output format: json or table
        #[arg(long, default_value = "table")]
        format: String,
        /// Group the table by category
        #[arg(long)]
        group: bool,
    },
    /// Delete assets by ID
    Delete {
        /// Asset UUIDs
        #[arg(required_unless_present = "all", conflicts_with = "all")]
        ids: Vec<Uuid>,
        /// Delete every asset
        #[arg(long)]
        all: bool,
    },
    /// Save asset content into a directory
    Download {
        /// Asset UUIDs
        #[arg(required_unless_present = "all", conflicts_with = "all")]
        ids: Vec<Uuid>,
        /// Download every asset
        #[arg(long)]
        all: bool,
        /// Output directory
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

fn parse_kind(value: Option<&str>) -> anyhow::Result<Option<AssetKind>> {
    Ok(value.map(str::parse::<AssetKind>).transpose()?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = DeskConfig::from_env().context("Invalid configuration")?;
    let client = ApiClient::from_config(&config).context(
        "Failed to create API client. Set ASSETDESK_API_TOKEN and ASSETDESK_API_URL (or API_URL)",
    )?;
    tracing::debug!(api_url = %client.build_url("/assets"), "Using asset API");
    let mut desk = AssetDesk::new(client, &config);

    match cli.command {
        Commands::Upload {
            files,
            r#type,
            category,
            description,
            name,
        } => {
            let kind = parse_kind(r#type.as_deref())?;

            let mut opened = Vec::new();
            for path in &files {
                match LocalFile::open(path).await {
                    Ok(file) => opened.push(file),
                    Err(e) => println!("[error] {}: {}", path.display(), e.client_message()),
                }
            }
            let sources: Vec<&dyn FileSource> =
                opened.iter().map(|f| f as &dyn FileSource).collect();
            let report = desk.ingest(&sources).await;
            for (file, err) in &report.rejected {
                println!("[error] {}: {}", file, err.client_message());
            }
            if report.accepted.is_empty() {
                anyhow::bail!("No files were accepted for upload");
            }

            if kind.is_some() || category.is_some() || description.is_some() {
                for id in &report.accepted {
                    desk.queue_mut().update(
                        id,
                        PendingFilePatch {
                            name: None,
                            kind,
                            category: category.clone(),
                            description: description.clone().map(Some),
                        },
                    );
                }
            }
            if let Some(name) = name {
                match report.accepted.as_slice() {
                    [only] => desk.queue_mut().update(only, PendingFilePatch::name(name)),
                    _ => println!("[info] --name ignored: more than one file was accepted"),
                }
            }

            let outcome = desk.submit().await?;
            print_outcome(desk.notifier().current(), &outcome);
            let created: Vec<&Asset> = outcome.created.iter().collect();
            if !created.is_empty() {
                print_asset_table("Uploaded", &created);
            }
            ensure_any_succeeded(&outcome, "uploads")?;
        }
        Commands::List {
            r#type,
            category,
            format,
            group,
        } => {
            let kind = parse_kind(r#type.as_deref())?;
            desk.refresh().await.context("Failed to list assets")?;

            let assets: Vec<Asset> = desk
                .gallery()
                .assets()
                .iter()
                .filter(|a| kind.map_or(true, |k| a.kind == k))
                .filter(|a| category.as_deref().map_or(true, |c| a.category == c))
                .cloned()
                .collect();

            match (format.as_str(), group) {
                ("json", false) => print_json(&assets)?,
                ("json", true) => print_json(&group_by_category(&assets))?,
                ("table", false) => {
                    print_asset_table("Assets", &assets.iter().collect::<Vec<_>>())
                }
                ("table", true) => {
                    for (category, members) in group_by_category(&assets) {
                        print_asset_table(category, &members);
                    }
                }
                (other, _) => anyhow::bail!("Invalid format '{}'. Must be: table or json", other),
            }
        }
        Commands::Delete { ids, all } => {
            let ids = if all {
                desk.refresh().await.context("Failed to list assets")?;
                desk.gallery_mut().select_all();
                desk.gallery().selected_ids()
            } else {
                ids
            };
            if ids.is_empty() {
                println!("[info] Nothing to delete");
                return Ok(());
            }

            let outcome = desk.bulk_delete(&ids).await?;
            print_outcome(desk.notifier().current(), &outcome);
            ensure_any_succeeded(&outcome, "deletions")?;
        }
        Commands::Download { ids, all, out } => {
            desk.refresh().await.context("Failed to list assets")?;
            let ids = if all {
                desk.gallery_mut().select_all();
                desk.gallery().selected_ids()
            } else {
                ids
            };
            if ids.is_empty() {
                println!("[info] Nothing to download");
                return Ok(());
            }

            let target = DirectoryTarget::new(out.clone());
            let outcome = desk.bulk_download(&ids, &target).await;
            print_outcome(desk.notifier().current(), &outcome);
            println!("Saved to {}", out.display());
            ensure_any_succeeded(&outcome, "downloads")?;
        }
    }

    Ok(())
}
