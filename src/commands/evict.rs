//! `snapsync evict` - delete the oldest retained snapshot

use anyhow::Result;

use crate::capacity::{self, EvictionOutcome};
use crate::config::RunConfig;
use crate::prompt::{AutoConfirm, DecisionProvider, TermPrompts};
use crate::ui;

pub fn run(cfg: &RunConfig, yes: bool) -> Result<()> {
    let mut term = TermPrompts;
    let mut auto = AutoConfirm;
    let decisions: &mut dyn DecisionProvider = if yes { &mut auto } else { &mut term };

    let outcome = capacity::evict_oldest(&cfg.destination_root, decisions)?;
    report_outcome(&outcome);
    Ok(())
}

pub fn report_outcome(outcome: &EvictionOutcome) {
    match outcome {
        EvictionOutcome::Deleted(name) => ui::success(&format!("Deleted folder '{name}'.")),
        EvictionOutcome::NoneFound => {
            ui::error("No folders with the specified date pattern found.");
        }
        EvictionOutcome::UserDeclined => ui::warn("Oldest folder not deleted."),
        EvictionOutcome::AlreadyGone(name) => {
            ui::warn(&format!("Folder '{name}' not found, possibly already deleted."));
        }
    }
}
