use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use crate::api::AuthenticatedClient;
use crate::cli;
use crate::config::TargetStore;
use crate::push::PushActor;

pub async fn run_push(
    path: Option<String>,
    app_guid: String,
    dry_run: bool,
    config_dir: Option<String>,
) -> Result<()> {
    let app_path = cli::resolve_app_path(path)?;

    let target = TargetStore::new(config_dir)?
        .get_target()?
        .context("No target configured. Run 'appbits target set' first.")?;
    let client = AuthenticatedClient::from_target(&target)?;
    let actor = PushActor::new(Arc::new(client));

    println!("Preparing {}\n", app_path.display());

    let actor_ref = &actor;
    let app_guid = app_guid.as_str();
    actor
        .process_path(&app_path, |app_dir| async move {
            let prepared = actor_ref.prepare_upload(&app_dir).await?;
            let plan = &prepared.plan;

            let upload_bytes: u64 = plan.files_to_upload.iter().map(|f| f.size).sum();
            let reused_bytes: u64 = plan.present_files.iter().map(|f| f.size).sum();

            println!("Summary:");
            println!(
                "  Files to upload: {} ({})",
                plan.files_to_upload.len(),
                cli::format_size(upload_bytes)
            );
            println!(
                "  Files already on the platform: {} ({})",
                plan.present_files.len(),
                cli::format_size(reused_bytes)
            );

            if !plan.has_changes {
                println!("\n  Nothing new to send; only the reuse list will be uploaded.");
            }

            if dry_run {
                println!("\nDry run: not uploading.");
                return Ok(());
            }

            actor_ref
                .upload_app(app_guid, &prepared.zip_path(), &plan.present_files)
                .await?;
            info!("Upload for app {} complete", app_guid);
            println!("\n✅ Uploaded application bits for {}", app_guid);
            Ok(())
        })
        .await?;

    Ok(())
}
