//! Site management commands

use colored::Colorize;
use std::sync::Arc;

use crate::cli::CliError;
use crate::storage::{SeaOrmStorage, Site};
use crate::utils::new_site_id;

pub async fn add_site(
    storage: Arc<SeaOrmStorage>,
    name: String,
    domain: String,
    timeout_min: i32,
) -> Result<(), CliError> {
    if timeout_min <= 0 {
        return Err(CliError::ParseError(
            "timeout-min must be positive".to_string(),
        ));
    }

    let site = Site {
        id: new_site_id(),
        name,
        domain,
        created_at: chrono::Utc::now().timestamp_millis(),
        is_active: true,
        session_timeout_min: timeout_min,
    };

    storage
        .put_site(site.clone())
        .await
        .map_err(|e| CliError::CommandError(format!("Failed to add site: {}", e)))?;

    println!(
        "{} Site added: {} ({} / {})",
        "✓".bold().green(),
        site.id.cyan(),
        site.name,
        site.domain.blue()
    );
    println!("  Use this id as site_id in your tracking snippet.");
    Ok(())
}

pub async fn list_sites(storage: Arc<SeaOrmStorage>) -> Result<(), CliError> {
    let sites = storage
        .list_sites()
        .await
        .map_err(|e| CliError::CommandError(format!("Failed to load sites: {}", e)))?;

    if sites.is_empty() {
        println!("{} No sites registered", "ℹ".bold().blue());
        return Ok(());
    }

    println!("{}", "Registered sites:".bold().green());
    println!();
    for site in &sites {
        let hit_count = storage.count_hits(&site.id).await.unwrap_or(0);
        let mut info_parts = vec![format!(
            "{} -> {} ({})",
            site.id.cyan(),
            site.name,
            site.domain.blue().underline()
        )];
        if !site.is_active {
            info_parts.push("(inactive)".dimmed().yellow().to_string());
        }
        if hit_count > 0 {
            info_parts.push(format!("(hits: {})", hit_count).dimmed().cyan().to_string());
        }
        println!("  {}", info_parts.join(" "));
    }
    println!();
    println!(
        "{} Total {} sites",
        "ℹ".bold().blue(),
        sites.len().to_string().green()
    );
    Ok(())
}

pub async fn remove_site(storage: Arc<SeaOrmStorage>, site_id: String) -> Result<(), CliError> {
    if !crate::utils::is_valid_id(&site_id) {
        return Err(CliError::ParseError(format!("invalid site id: {}", site_id)));
    }

    storage
        .delete_site(&site_id)
        .await
        .map_err(|e| CliError::CommandError(format!("Failed to remove site: {}", e)))?;

    println!(
        "{} Site removed: {} (all of its hits deleted)",
        "✓".bold().green(),
        site_id.cyan()
    );
    Ok(())
}
