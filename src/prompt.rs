//! Interactive decisions.
//!
//! Every prompt the tool asks goes through [`DecisionProvider`], so the
//! orchestration can run against scripted answers in tests instead of a
//! live terminal.

use anyhow::{Context, Result};
use dialoguer::{Confirm, Select};

/// First prompt: copy the snapshot, or only compare existing hashes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyChoice {
    Copy,
    CompareOnly,
}

/// Second prompt: regenerate both manifests, or compare the existing ones.
///
/// `Unrecognized` cannot come from the terminal selector, but a scripted
/// provider may return it; the orchestrator reports it and skips the step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestChoice {
    Regenerate,
    CompareExisting,
    Unrecognized,
}

/// Interactive choices the backup flow needs answered
pub trait DecisionProvider {
    fn ask_copy_or_compare(&mut self) -> Result<CopyChoice>;
    fn ask_regenerate_or_compare(&mut self) -> Result<ManifestChoice>;
    fn confirm_eviction(&mut self, folder_name: &str) -> Result<bool>;
}

/// Terminal prompts via dialoguer
pub struct TermPrompts;

impl DecisionProvider for TermPrompts {
    fn ask_copy_or_compare(&mut self) -> Result<CopyChoice> {
        let idx = Select::new()
            .with_prompt("Copy the files, or only compare existing hashes?")
            .items(&["Copy files", "Compare existing hashes only"])
            .default(0)
            .interact()
            .context("Failed to read user input")?;
        Ok(if idx == 0 {
            CopyChoice::Copy
        } else {
            CopyChoice::CompareOnly
        })
    }

    fn ask_regenerate_or_compare(&mut self) -> Result<ManifestChoice> {
        let idx = Select::new()
            .with_prompt("Manifests exist on both sides. Re-generate hashes or compare existing ones?")
            .items(&["Re-generate hashes", "Compare existing hashes"])
            .default(1)
            .interact()
            .context("Failed to read user input")?;
        Ok(if idx == 0 {
            ManifestChoice::Regenerate
        } else {
            ManifestChoice::CompareExisting
        })
    }

    fn confirm_eviction(&mut self, folder_name: &str) -> Result<bool> {
        Confirm::new()
            .with_prompt(format!(
                "The oldest folder is '{folder_name}'. Delete it to free up space?"
            ))
            .default(false)
            .interact()
            .context("Failed to read user input")
    }
}

/// Non-interactive provider for `--yes` paths: affirms everything
pub struct AutoConfirm;

impl DecisionProvider for AutoConfirm {
    fn ask_copy_or_compare(&mut self) -> Result<CopyChoice> {
        Ok(CopyChoice::Copy)
    }

    fn ask_regenerate_or_compare(&mut self) -> Result<ManifestChoice> {
        Ok(ManifestChoice::Regenerate)
    }

    fn confirm_eviction(&mut self, _folder_name: &str) -> Result<bool> {
        Ok(true)
    }
}

/// Scripted answers for orchestration tests
#[cfg(test)]
pub struct Scripted {
    pub copy: CopyChoice,
    pub manifests: ManifestChoice,
    pub evict: bool,
    /// Folder names eviction confirmation was asked for
    pub eviction_prompts: Vec<String>,
}

#[cfg(test)]
impl Scripted {
    pub fn new(copy: CopyChoice, manifests: ManifestChoice, evict: bool) -> Self {
        Self {
            copy,
            manifests,
            evict,
            eviction_prompts: Vec::new(),
        }
    }
}

#[cfg(test)]
impl DecisionProvider for Scripted {
    fn ask_copy_or_compare(&mut self) -> Result<CopyChoice> {
        Ok(self.copy)
    }

    fn ask_regenerate_or_compare(&mut self) -> Result<ManifestChoice> {
        Ok(self.manifests)
    }

    fn confirm_eviction(&mut self, folder_name: &str) -> Result<bool> {
        self.eviction_prompts.push(folder_name.to_string());
        Ok(self.evict)
    }
}
