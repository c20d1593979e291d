//! Catalog installation on top of a package manager.
//!
//! Every entry is queried before anything is installed, so running the
//! installer twice issues no mutating command the second time.

mod homebrew;

use async_trait::async_trait;

pub use homebrew::Homebrew;

use crate::catalog::{CatalogEntry, InstallSource, PackageKind};
use crate::context::Context;
use crate::error::Result;
use crate::git::CloneMode;
use crate::tui::spinner;

#[async_trait]
pub trait PackageManager: Send + Sync {
    /// Get the package manager name
    fn name(&self) -> &'static str;

    /// Whether a package is installed. Pure query.
    async fn is_installed(&self, kind: PackageKind, name: &str) -> bool;

    /// Install several packages of one kind with a single command.
    async fn install(&self, kind: PackageKind, ids: &[&str]) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallStatus {
    AlreadyInstalled,
    Installed,
    Failed(String),
}

/// Per-entry outcome of a batch install.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct InstallReport {
    pub installed: Vec<&'static str>,
    pub skipped: Vec<&'static str>,
    pub failed: Vec<(&'static str, String)>,
}

impl InstallReport {
    pub fn summary(&self) -> String {
        format!(
            "{} installed, {} already present, {} failed",
            self.installed.len(),
            self.skipped.len(),
            self.failed.len()
        )
    }
}

pub struct PackageInstaller<'a, 'ctx> {
    ctx: &'a Context<'ctx>,
}

impl<'a, 'ctx> PackageInstaller<'a, 'ctx> {
    pub fn new(ctx: &'a Context<'ctx>) -> Self {
        Self { ctx }
    }

    pub async fn is_installed(&self, entry: &CatalogEntry) -> bool {
        if let InstallSource::SourceClone { dest, .. } = entry.source {
            return self.ctx.paths.in_home(dest).exists();
        }
        match (entry.package(), entry.query_name()) {
            (Some((kind, _)), Some(name)) => self.ctx.packages.is_installed(kind, name).await,
            _ => false,
        }
    }

    /// Install a single entry unless it is already present.
    pub async fn install(&self, entry: &CatalogEntry) -> InstallStatus {
        if self.is_installed(entry).await {
            self.ctx
                .journal
                .success(format!("{} already installed", entry.id));
            return InstallStatus::AlreadyInstalled;
        }

        let result = match entry.package() {
            Some((kind, id)) => {
                let pb = spinner(format!("Installing {}...", entry.id));
                let result = self.ctx.packages.install(kind, &[id]).await;
                pb.finish_and_clear();
                result
            }
            None => self.clone_source(entry).await,
        };

        match result {
            Ok(()) => {
                self.ctx.journal.success(format!("{} installed", entry.id));
                InstallStatus::Installed
            }
            Err(e) => {
                self.ctx
                    .journal
                    .error(format!("Failed to install {}: {}", entry.id, e));
                InstallStatus::Failed(e.to_string())
            }
        }
    }

    /// Install a confirmed selection with one package-manager command per kind.
    ///
    /// Entries already present are reported individually and left out of the batch.
    pub async fn install_batch(&self, selection: &[&'static CatalogEntry]) -> InstallReport {
        tracing::debug!(
            "Installing {} entries with {}",
            selection.len(),
            self.ctx.packages.name()
        );
        let mut report = InstallReport::default();
        let mut casks: Vec<&'static CatalogEntry> = Vec::new();
        let mut formulae: Vec<&'static CatalogEntry> = Vec::new();
        let mut clones: Vec<&'static CatalogEntry> = Vec::new();

        for &entry in selection {
            if self.is_installed(entry).await {
                self.ctx
                    .journal
                    .success(format!("{} already installed", entry.id));
                report.skipped.push(entry.id);
                continue;
            }
            match entry.package() {
                Some((PackageKind::Cask, _)) => casks.push(entry),
                Some((PackageKind::Formula, _)) => formulae.push(entry),
                None => clones.push(entry),
            }
        }

        for (kind, group) in [(PackageKind::Cask, casks), (PackageKind::Formula, formulae)] {
            if group.is_empty() {
                continue;
            }
            self.install_group(kind, &group, &mut report).await;
        }

        for entry in clones {
            match self.install(entry).await {
                InstallStatus::Installed => report.installed.push(entry.id),
                InstallStatus::AlreadyInstalled => report.skipped.push(entry.id),
                InstallStatus::Failed(reason) => report.failed.push((entry.id, reason)),
            }
        }

        report
    }

    async fn install_group(
        &self,
        kind: PackageKind,
        group: &[&'static CatalogEntry],
        report: &mut InstallReport,
    ) {
        let ids: Vec<&str> = group
            .iter()
            .filter_map(|entry| entry.package().map(|(_, id)| id))
            .collect();

        let pb = spinner(format!(
            "Installing {} {}: {}",
            ids.len(),
            kind.label(),
            ids.join(", ")
        ));
        let result = self.ctx.packages.install(kind, &ids).await;
        pb.finish_and_clear();

        match result {
            Ok(()) => {
                for entry in group {
                    self.ctx.journal.success(format!("{} installed", entry.id));
                    report.installed.push(entry.id);
                }
            }
            Err(e) => {
                self.ctx
                    .journal
                    .error(format!("Installing {} failed: {}", kind.label(), e));
                // A failed batch may still have installed part of the group.
                for &entry in group {
                    if self.is_installed(entry).await {
                        self.ctx.journal.success(format!("{} installed", entry.id));
                        report.installed.push(entry.id);
                    } else {
                        self.ctx
                            .journal
                            .error(format!("{} was not installed", entry.id));
                        report.failed.push((entry.id, e.to_string()));
                    }
                }
            }
        }
    }

    async fn clone_source(&self, entry: &CatalogEntry) -> Result<()> {
        if let InstallSource::SourceClone { url, dest } = entry.source {
            let pb = spinner(format!("Cloning {}...", entry.id));
            let result = self
                .ctx
                .vcs
                .clone_repo(url, &self.ctx.paths.in_home(dest), CloneMode::Shallow)
                .await;
            pb.finish_and_clear();
            result
        } else {
            Ok(())
        }
    }
}
