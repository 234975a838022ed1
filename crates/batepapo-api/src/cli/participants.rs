//! `batepapo participants`: print who is in the room.

use anyhow::Result;
use chrono::Utc;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use crate::state::AppState;

pub async fn list_participants(state: &AppState, json: bool) -> Result<()> {
    let participants = state.presence_service.list_participants().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&participants)?);
        return Ok(());
    }

    if participants.is_empty() {
        println!();
        println!("  {} The room is empty.", style("i").blue().bold());
        println!();
        return Ok(());
    }

    let now = Utc::now();
    let timeout = state.config.inactivity_timeout()?;

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Name").fg(Color::White),
        Cell::new("Last seen").fg(Color::White),
        Cell::new("Idle").fg(Color::White),
    ]);

    for p in &participants {
        let idle = (now - p.last_status).num_seconds().max(0);
        let idle_cell = if p.is_inactive(now, timeout) {
            Cell::new(format!("{idle}s (stale)")).fg(Color::Yellow)
        } else {
            Cell::new(format!("{idle}s"))
        };
        table.add_row(vec![
            Cell::new(&p.name).fg(Color::Cyan),
            Cell::new(p.last_status.format("%Y-%m-%d %H:%M:%S").to_string()),
            idle_cell,
        ]);
    }

    println!();
    println!("{table}");
    println!();
    println!("  {} participant(s)", style(participants.len()).bold());
    println!();

    Ok(())
}
