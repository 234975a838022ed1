//! `batepapo sweep`: run a single presence sweep.

use anyhow::Result;
use batepapo_types::config::timeout_from_secs;
use console::style;

use crate::state::AppState;

pub async fn sweep_once(state: &AppState, timeout_secs: Option<u64>, json: bool) -> Result<()> {
    let timeout = match timeout_secs {
        Some(secs) => timeout_from_secs(secs)?,
        None => state.config.inactivity_timeout()?,
    };

    let evicted = state.presence_service.sweep_stale(timeout).await?;

    if json {
        println!(
            "{}",
            serde_json::json!({ "timeout_secs": timeout.num_seconds(), "evicted": evicted })
        );
        return Ok(());
    }

    if evicted.is_empty() {
        println!(
            "  {} No participant idle for more than {}s",
            style("✓").green().bold(),
            timeout.num_seconds()
        );
    } else {
        for name in &evicted {
            println!("  {} Evicted {}", style("✗").red(), style(name).cyan());
        }
        println!(
            "  {} {} participant(s) removed",
            style("✓").green().bold(),
            evicted.len()
        );
    }

    Ok(())
}
