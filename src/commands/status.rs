//! `snapsync status` - capacity report and retained snapshots

use anyhow::Result;

use crate::config::RunConfig;
use crate::{capacity, snapshot, ui};

pub fn run(cfg: &RunConfig) -> Result<()> {
    ui::header("Status");
    ui::kv("Source root", &cfg.source_root.display().to_string());
    ui::kv("Destination root", &cfg.destination_root.display().to_string());

    let source = snapshot::list(&cfg.source_root)?;
    match source.last() {
        Some(newest) => {
            let report = capacity::check(&newest.path, &cfg.destination_root)?;
            ui::kv("Next backup", &newest.name);
            ui::kv("Source size", &ui::format_size(report.source_size_bytes));
            ui::kv("Destination free", &ui::format_size(report.free_space_bytes));
            if !report.sufficient {
                ui::warn("Not enough free space in the destination drive.");
            }
        }
        None => ui::warn("No dated folders found under the source root."),
    }

    ui::section("Retained snapshots");
    let dest = snapshot::list(&cfg.destination_root)?;
    if dest.is_empty() {
        ui::dim("(none)");
    }
    for snap in &dest {
        ui::dim(&snap.name);
    }

    Ok(())
}
