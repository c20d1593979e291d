//! Scripted collaborators for workflow tests.

use std::collections::{HashMap, HashSet, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::catalog::PackageKind;
use crate::config::{AppConfig, Paths};
use crate::context::Context;
use crate::error::{DevstrapError, Result};
use crate::git::{CloneMode, Vcs};
use crate::host::{Host, RemoteScript};
use crate::journal::Journal;
use crate::package::PackageManager;
use crate::tui::Prompter;

/// Answers prompts from queues; an empty queue falls back to the prompt's default.
#[derive(Default)]
pub struct FakePrompter {
    confirms: Mutex<VecDeque<bool>>,
    inputs: Mutex<VecDeque<String>>,
    multi_selects: Mutex<VecDeque<Vec<usize>>>,
    selects: Mutex<VecDeque<usize>>,
    pub confirm_prompts: Mutex<Vec<String>>,
    pub multi_select_defaults: Mutex<Vec<Vec<bool>>>,
    pub keys_waited: Mutex<usize>,
}

impl FakePrompter {
    pub fn answer_confirms(&self, answers: &[bool]) {
        self.confirms.lock().unwrap().extend(answers.iter().copied());
    }

    pub fn answer_inputs(&self, answers: &[&str]) {
        self.inputs
            .lock()
            .unwrap()
            .extend(answers.iter().map(|s| s.to_string()));
    }

    pub fn answer_multi_selects(&self, answers: Vec<Vec<usize>>) {
        self.multi_selects.lock().unwrap().extend(answers);
    }

    pub fn answer_selects(&self, answers: &[usize]) {
        self.selects.lock().unwrap().extend(answers.iter().copied());
    }

    pub fn confirm_count(&self) -> usize {
        self.confirm_prompts.lock().unwrap().len()
    }
}

impl Prompter for FakePrompter {
    fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        self.confirm_prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.confirms.lock().unwrap().pop_front().unwrap_or(default))
    }

    fn input(&self, _prompt: &str, _placeholder: &str) -> Result<String> {
        Ok(self.inputs.lock().unwrap().pop_front().unwrap_or_default())
    }

    fn multi_select(
        &self,
        _prompt: &str,
        _items: &[String],
        preselected: &[bool],
    ) -> Result<Vec<usize>> {
        self.multi_select_defaults
            .lock()
            .unwrap()
            .push(preselected.to_vec());
        Ok(self
            .multi_selects
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                preselected
                    .iter()
                    .enumerate()
                    .filter(|(_, on)| **on)
                    .map(|(i, _)| i)
                    .collect()
            }))
    }

    fn select(&self, _prompt: &str, _items: &[&str], default: usize) -> Result<usize> {
        Ok(self.selects.lock().unwrap().pop_front().unwrap_or(default))
    }

    fn wait_for_key(&self, _prompt: &str) -> Result<()> {
        *self.keys_waited.lock().unwrap() += 1;
        Ok(())
    }
}

/// In-memory package database that records every command issued.
#[derive(Default)]
pub struct FakePackageManager {
    installed: Mutex<HashSet<(PackageKind, String)>>,
    failing: Mutex<HashSet<PackageKind>>,
    pub install_calls: Mutex<Vec<(PackageKind, Vec<String>)>>,
    pub queries: Mutex<Vec<String>>,
}

impl FakePackageManager {
    pub fn mark_installed(&self, kind: PackageKind, name: &str) {
        self.installed
            .lock()
            .unwrap()
            .insert((kind, name.to_string()));
    }

    pub fn fail_kind(&self, kind: PackageKind) {
        self.failing.lock().unwrap().insert(kind);
    }

    pub fn install_calls(&self) -> Vec<(PackageKind, Vec<String>)> {
        self.install_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PackageManager for FakePackageManager {
    fn name(&self) -> &'static str {
        "FakeBrew"
    }

    async fn is_installed(&self, kind: PackageKind, name: &str) -> bool {
        self.queries.lock().unwrap().push(name.to_string());
        self.installed
            .lock()
            .unwrap()
            .contains(&(kind, name.to_string()))
    }

    async fn install(&self, kind: PackageKind, ids: &[&str]) -> Result<()> {
        self.install_calls
            .lock()
            .unwrap()
            .push((kind, ids.iter().map(|s| s.to_string()).collect()));

        if self.failing.lock().unwrap().contains(&kind) {
            return Err(DevstrapError::CommandFailed {
                program: "brew install".to_string(),
                message: "simulated failure".to_string(),
            });
        }

        let mut installed = self.installed.lock().unwrap();
        for id in ids {
            let name = id.rsplit('/').next().unwrap_or(id);
            installed.insert((kind, name.to_string()));
        }
        Ok(())
    }
}

/// Git double: clones create the destination directory, checkouts follow a script.
#[derive(Default)]
pub struct FakeVcs {
    checkout_results: Mutex<VecDeque<bool>>,
    conflicts: Mutex<Vec<PathBuf>>,
    fail_clone: Mutex<bool>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeVcs {
    /// Outcomes for successive `checkout` calls; once exhausted checkouts succeed.
    pub fn script_checkouts(&self, results: &[bool]) {
        self.checkout_results
            .lock()
            .unwrap()
            .extend(results.iter().copied());
    }

    pub fn report_conflicts(&self, paths: &[&str]) {
        *self.conflicts.lock().unwrap() = paths.iter().map(PathBuf::from).collect();
    }

    pub fn fail_clones(&self) {
        *self.fail_clone.lock().unwrap() = true;
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }
}

#[async_trait]
impl Vcs for FakeVcs {
    async fn clone_repo(&self, url: &str, dest: &Path, mode: CloneMode) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("clone {:?} {}", mode, url));
        if *self.fail_clone.lock().unwrap() {
            return Err(DevstrapError::CommandFailed {
                program: "git clone".to_string(),
                message: "simulated failure".to_string(),
            });
        }
        std::fs::create_dir_all(dest)?;
        Ok(())
    }

    async fn checkout(&self, _git_dir: &Path, _work_tree: &Path) -> Result<()> {
        self.calls.lock().unwrap().push("checkout".to_string());
        if self.checkout_results.lock().unwrap().pop_front().unwrap_or(true) {
            Ok(())
        } else {
            Err(DevstrapError::CommandFailed {
                program: "git checkout".to_string(),
                message: "would be overwritten".to_string(),
            })
        }
    }

    async fn checkout_conflicts(&self, _git_dir: &Path, _work_tree: &Path) -> Result<Vec<PathBuf>> {
        self.calls.lock().unwrap().push("conflicts".to_string());
        Ok(self.conflicts.lock().unwrap().clone())
    }

    async fn set_config(&self, _git_dir: &Path, key: &str, value: &str) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("config {} {}", key, value));
        Ok(())
    }
}

/// Machine double: tracks which tools exist and which installers ran.
#[derive(Default)]
pub struct FakeHost {
    available: Mutex<HashSet<String>>,
    provides: Mutex<HashMap<String, String>>,
    failing: Mutex<HashSet<String>>,
    pub runs: Mutex<Vec<String>>,
}

impl FakeHost {
    pub fn make_available(&self, binary: &str) {
        self.available.lock().unwrap().insert(binary.to_string());
    }

    /// A successful run of `runnable` (script name or program) makes `binary` available.
    pub fn installs(&self, runnable: &str, binary: &str) {
        self.provides
            .lock()
            .unwrap()
            .insert(runnable.to_string(), binary.to_string());
    }

    pub fn fail(&self, runnable: &str) {
        self.failing.lock().unwrap().insert(runnable.to_string());
    }

    pub fn runs(&self) -> Vec<String> {
        self.runs.lock().unwrap().clone()
    }

    fn run(&self, runnable: &str) -> Result<()> {
        self.runs.lock().unwrap().push(runnable.to_string());
        if self.failing.lock().unwrap().contains(runnable) {
            return Err(DevstrapError::CommandFailed {
                program: runnable.to_string(),
                message: "simulated failure".to_string(),
            });
        }
        if let Some(binary) = self.provides.lock().unwrap().get(runnable) {
            self.available.lock().unwrap().insert(binary.clone());
        }
        Ok(())
    }
}

#[async_trait]
impl Host for FakeHost {
    async fn tool_available(&self, binary: &str) -> bool {
        self.available.lock().unwrap().contains(binary)
    }

    async fn run_script(&self, script: &RemoteScript) -> Result<()> {
        self.run(script.name)
    }

    async fn run_command(&self, program: &str, _args: &[&str]) -> Result<()> {
        self.run(program)
    }
}

/// A throwaway home directory wired to fake collaborators.
pub struct TestEnv {
    pub home: tempfile::TempDir,
    pub config: AppConfig,
    pub paths: Paths,
    pub journal: Journal,
    pub prompter: FakePrompter,
    pub packages: FakePackageManager,
    pub vcs: FakeVcs,
    pub host: FakeHost,
}

impl TestEnv {
    pub fn new() -> Self {
        let home = tempfile::tempdir().unwrap();
        let config = AppConfig::default();
        let paths = config.paths_in(home.path());
        let journal = Journal::new(&paths.log_file);
        Self {
            home,
            config,
            paths,
            journal,
            prompter: FakePrompter::default(),
            packages: FakePackageManager::default(),
            vcs: FakeVcs::default(),
            host: FakeHost::default(),
        }
    }

    pub fn context(&self) -> Context<'_> {
        Context {
            config: &self.config,
            paths: &self.paths,
            journal: &self.journal,
            prompter: &self.prompter,
            packages: &self.packages,
            vcs: &self.vcs,
            host: &self.host,
            dotfiles_repo: None,
        }
    }

    pub fn context_with_repo(&self, repo: &str) -> Context<'_> {
        Context {
            dotfiles_repo: Some(repo.to_string()),
            ..self.context()
        }
    }

    pub fn write_home_file(&self, relative: &str, contents: &str) -> PathBuf {
        let path = self.home.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, contents).unwrap();
        path
    }

    pub fn journal_text(&self) -> String {
        std::fs::read_to_string(&self.paths.log_file).unwrap_or_default()
    }
}
