//! Output helpers shared by the `assetdesk` binary.

use assetdesk_core::models::Asset;
use assetdesk_core::{BatchOutcome, Notice};

/// Truncate a string to max_len characters, appending "..." if truncated.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Human-readable byte count, e.g. `1.50 MB`.
pub fn format_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    let b = bytes as f64;
    if b >= MB {
        format!("{:.2} MB", b / MB)
    } else if b >= KB {
        format!("{:.1} KB", b / KB)
    } else {
        format!("{} B", bytes)
    }
}

pub fn print_asset_table(title: &str, assets: &[&Asset]) {
    println!("\n=== {} ===\n", title);
    println!("Total: {} assets", assets.len());

    if assets.is_empty() {
        println!("\nNo assets found.");
        return;
    }

    println!(
        "\n{:<36} {:<9} {:<10} {:<30} {:>10} {:>20}",
        "ID", "Type", "Category", "Name", "Size", "Created At"
    );
    println!("{}", "-".repeat(120));

    for asset in assets {
        let size = asset
            .file_size
            .and_then(|s| u64::try_from(s).ok())
            .map(format_size)
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<36} {:<9} {:<10} {:<30} {:>10} {:>20}",
            asset.id,
            asset.kind,
            truncate_string(&asset.category, 10),
            truncate_string(&asset.name, 30),
            size,
            asset.created_at.format("%Y-%m-%d %H:%M:%S")
        );
    }
    println!();
}

/// Print the summary notice and one line per failed entry.
pub fn print_outcome(notice: Option<Notice>, outcome: &BatchOutcome) {
    if let Some(notice) = notice {
        println!("{}", notice);
    }
    for failure in &outcome.failures {
        println!("  {}: {}", failure.name, failure.message);
    }
}

/// Err when a non-empty batch had no successes, so the process exits non-zero.
pub fn ensure_any_succeeded(outcome: &BatchOutcome, action: &str) -> anyhow::Result<()> {
    if outcome.succeeded == 0 && outcome.failed > 0 {
        anyhow::bail!("All {} {} failed", outcome.failed, action);
    }
    Ok(())
}

/// Initialize tracing for the CLI.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}
