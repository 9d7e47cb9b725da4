use anyhow::Context;
use clap::Parser;
use faces_sync::config::{Cli, Command};
use faces_sync::core::upsert;
use faces_sync::domain::model::{FormSubmission, ImportSummary};
use faces_sync::utils::{logger, validation::Validate};
use faces_sync::{HubSpotClient, ImportPipeline, SupabaseStore, SyncConfig};
use std::path::Path;
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    logger::init_cli_logger(cli.verbose);
    tracing::info!("Starting faces-sync");

    let config =
        SyncConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    match cli.command {
        Command::Import {
            file,
            dry_run,
            import,
        } => run_import(&config, &file, dry_run, import).await?,
        Command::Submit { file } => run_submit(&config, &file).await?,
        Command::SetupProperties => run_setup_properties(&config).await?,
    }

    Ok(())
}

async fn run_import(
    config: &SyncConfig,
    file: &Path,
    dry_run: bool,
    import: bool,
) -> anyhow::Result<()> {
    let token = if import {
        config.require_token().context("--import needs a CRM token")?
    } else {
        ""
    };

    let crm = HubSpotClient::new(&config.hubspot.base_url, token);
    let pipeline = ImportPipeline::new(
        &crm,
        config.hubspot.batch_size,
        Duration::from_millis(config.hubspot.batch_delay_ms),
    );

    let summary = pipeline.run(file, import).await?;
    print_summary(&summary, import);

    if !dry_run && !import {
        println!();
        println!("Use --import to upload to the CRM, or --dry-run to just validate");
    }

    Ok(())
}

fn print_summary(summary: &ImportSummary, imported: bool) {
    println!();
    println!("=== Import Summary ===");
    println!("Total rows:      {}", summary.total);
    println!("Valid contacts:  {}", summary.valid);
    println!("Invalid rows:    {}", summary.invalid);
    println!("Duplicates:      {}", summary.duplicates);
    println!("Ready to import: {}", summary.ready);

    if !summary.warnings.is_empty() {
        println!("Degraded fields: {}", summary.warnings.len());
    }

    if !summary.errors.is_empty() {
        println!();
        println!("=== Errors ===");
        for error in summary.errors.iter().take(20) {
            println!("  {}", error);
        }
        if summary.errors.len() > 20 {
            println!("  ... and {} more errors", summary.errors.len() - 20);
        }
    }

    if imported {
        println!();
        println!("✅ Created {} contacts", summary.created);
    }
}

async fn run_submit(config: &SyncConfig, file: &Path) -> anyhow::Result<()> {
    let token = config.require_token().context("submit needs a CRM token")?;

    let content = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let form: FormSubmission =
        serde_json::from_str(&content).context("failed to parse submission JSON")?;

    let crm = HubSpotClient::new(&config.hubspot.base_url, token);

    let outcome = match &config.supabase {
        Some(supabase) => {
            let store = SupabaseStore::new(&supabase.base_url, &supabase.api_key, &supabase.table);
            upsert::submit_application(&crm, &store, &form).await
        }
        None => {
            tracing::warn!("No store configured; syncing to the CRM only");
            upsert::sync_submission(&crm, &form, None).await
        }
    };

    if outcome.success {
        let verb = if outcome.updated { "Updated" } else { "Created" };
        println!(
            "✅ {} contact {}",
            verb,
            outcome.contact_id.as_deref().unwrap_or("?")
        );
    } else {
        eprintln!(
            "❌ CRM sync failed: {}",
            outcome.error.as_deref().unwrap_or("unknown error")
        );
        std::process::exit(1);
    }

    Ok(())
}

async fn run_setup_properties(config: &SyncConfig) -> anyhow::Result<()> {
    let token = config
        .require_token()
        .context("setup-properties needs a CRM token")?;
    let crm = HubSpotClient::new(&config.hubspot.base_url, token);

    println!("=== CRM Properties Setup ===");
    crm.ensure_property_group()
        .await
        .context("failed to create the property group")?;

    let report = crm.ensure_contact_properties().await?;
    println!();
    println!("Created: {}", report.created);
    println!("Skipped: {}", report.skipped);

    if !report.is_success() {
        println!("Failed:  {}", report.failed.len());
        for failure in &report.failed {
            println!("  {}", failure);
        }
        std::process::exit(1);
    }

    println!();
    println!("✅ CRM properties are in place");
    Ok(())
}
