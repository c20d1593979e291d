//! The fixed list of tools devstrap knows how to install.
//!
//! Each entry carries its install source, which decides once and for all who
//! handles it: the Homebrew cask namespace, the formula namespace, or a plain
//! git clone. Any id remapping lives in the table row, never at call sites.

/// How a catalog entry gets onto the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallSource {
    /// GUI application installed with `brew install --cask`.
    Cask { token: &'static str },
    /// Command-line package installed with `brew install --formula`.
    Formula { name: &'static str },
    /// Repository cloned into a home-relative directory.
    SourceClone {
        url: &'static str,
        dest: &'static str,
    },
}

/// Homebrew namespace of a package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PackageKind {
    Cask,
    Formula,
}

impl PackageKind {
    pub fn flag(&self) -> &'static str {
        match self {
            PackageKind::Cask => "--cask",
            PackageKind::Formula => "--formula",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PackageKind::Cask => "applications",
            PackageKind::Formula => "command-line tools",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    pub id: &'static str,
    pub description: &'static str,
    pub source: InstallSource,
}

impl CatalogEntry {
    /// Package namespace and the identifier passed to `brew install`, if Homebrew handles it.
    pub fn package(&self) -> Option<(PackageKind, &'static str)> {
        match self.source {
            InstallSource::Cask { token } => Some((PackageKind::Cask, token)),
            InstallSource::Formula { name } => Some((PackageKind::Formula, name)),
            InstallSource::SourceClone { .. } => None,
        }
    }

    /// Name Homebrew lists the package under once installed.
    ///
    /// Tap-qualified ids (`owner/tap/name`) are listed by their last segment.
    pub fn query_name(&self) -> Option<&'static str> {
        self.package()
            .map(|(_, id)| id.rsplit('/').next().unwrap_or(id))
    }

    pub fn label(&self) -> String {
        format!("{:<20} {}", self.id, self.description)
    }
}

pub const CATALOG: &[CatalogEntry] = &[
    CatalogEntry {
        id: "visual-studio-code",
        description: "Code editor",
        source: InstallSource::Cask {
            token: "visual-studio-code",
        },
    },
    CatalogEntry {
        id: "iterm2",
        description: "Terminal emulator",
        source: InstallSource::Cask { token: "iterm2" },
    },
    CatalogEntry {
        id: "raycast",
        description: "Launcher and productivity tools",
        source: InstallSource::Cask { token: "raycast" },
    },
    CatalogEntry {
        id: "aerospace",
        description: "Tiling window manager",
        source: InstallSource::Cask {
            token: "nikitabobko/tap/aerospace",
        },
    },
    CatalogEntry {
        id: "docker",
        description: "Docker Desktop",
        source: InstallSource::Cask { token: "docker" },
    },
    CatalogEntry {
        id: "font-jetbrains-mono-nerd-font",
        description: "Patched programming font",
        source: InstallSource::Cask {
            token: "font-jetbrains-mono-nerd-font",
        },
    },
    CatalogEntry {
        id: "git",
        description: "Version control",
        source: InstallSource::Formula { name: "git" },
    },
    CatalogEntry {
        id: "gh",
        description: "GitHub CLI",
        source: InstallSource::Formula { name: "gh" },
    },
    CatalogEntry {
        id: "neovim",
        description: "Modal text editor",
        source: InstallSource::Formula { name: "neovim" },
    },
    CatalogEntry {
        id: "fzf",
        description: "Fuzzy finder",
        source: InstallSource::Formula { name: "fzf" },
    },
    CatalogEntry {
        id: "ripgrep",
        description: "Fast recursive grep",
        source: InstallSource::Formula { name: "ripgrep" },
    },
    CatalogEntry {
        id: "bat",
        description: "Cat with syntax highlighting",
        source: InstallSource::Formula { name: "bat" },
    },
    CatalogEntry {
        id: "eza",
        description: "Modern ls replacement",
        source: InstallSource::Formula { name: "eza" },
    },
    CatalogEntry {
        id: "zoxide",
        description: "Smarter cd command",
        source: InstallSource::Formula { name: "zoxide" },
    },
    CatalogEntry {
        id: "powerlevel10k",
        description: "Zsh prompt theme for Oh My Zsh",
        source: InstallSource::SourceClone {
            url: "https://github.com/romkatv/powerlevel10k.git",
            dest: "~/.oh-my-zsh/custom/themes/powerlevel10k",
        },
    },
];

#[cfg(test)]
pub fn find(id: &str) -> Option<&'static CatalogEntry> {
    CATALOG.iter().find(|entry| entry.id == id)
}

/// The one entry installed by cloning a repository, reported by `devstrap status`.
pub fn source_clone_entry() -> Option<&'static CatalogEntry> {
    CATALOG
        .iter()
        .find(|entry| matches!(entry.source, InstallSource::SourceClone { .. }))
}
