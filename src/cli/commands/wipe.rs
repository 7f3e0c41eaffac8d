//! Full-store wipe command

use colored::Colorize;
use std::io::Write;
use std::sync::Arc;

use crate::cli::CliError;
use crate::storage::SeaOrmStorage;

pub async fn wipe_store(storage: Arc<SeaOrmStorage>, yes: bool) -> Result<(), CliError> {
    if !yes {
        print!(
            "{} This deletes every site and hit. Type 'yes' to continue: ",
            "!".bold().red()
        );
        std::io::stdout().flush().ok();

        let mut answer = String::new();
        std::io::stdin()
            .read_line(&mut answer)
            .map_err(|e| CliError::CommandError(format!("Failed to read input: {}", e)))?;
        if answer.trim() != "yes" {
            println!("{} Aborted", "ℹ".bold().blue());
            return Ok(());
        }
    }

    storage
        .wipe_all()
        .await
        .map_err(|e| CliError::CommandError(format!("Wipe failed: {}", e)))?;

    println!("{} Store wiped", "✓".bold().green());
    Ok(())
}
