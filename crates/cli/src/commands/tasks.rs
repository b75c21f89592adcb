//! `taskpilot tasks` — list or search stored tasks.

use std::path::Path;
use taskpilot_core::task::TaskStore;

pub async fn run(path: Option<&Path>, search: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config(path)?;
    let store = taskpilot_store::open(&config.store).await?;

    let tasks = match search.as_deref() {
        Some(query) => store.search(query).await?,
        None => store.list().await?,
    };

    if tasks.is_empty() {
        println!("No tasks.");
        return Ok(());
    }

    for task in tasks {
        println!(
            "{:>4}  {}  {}",
            task.id,
            task.created_at.format("%Y-%m-%d %H:%M"),
            task.text
        );
    }

    Ok(())
}
