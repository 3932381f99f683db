use crate::config::{PhaseDef, SystemConfig, ThemeDef};
use crate::context::{PathOverrides, Workspace};
use std::path::{Path, PathBuf};
use std::sync::{LazyLock, Mutex, MutexGuard};
use tempfile::TempDir;

static CWD_LOCK: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

pub(crate) struct DirGuard {
    original: PathBuf,
    _lock: MutexGuard<'static, ()>,
}

impl DirGuard {
    pub(crate) fn new(new_dir: &Path) -> Self {
        // Changing the process current working directory is global and not thread-safe.
        // Lock it so tests don't race even if a #[serial] annotation is missed.
        let lock = CWD_LOCK.lock().unwrap_or_else(|poison| poison.into_inner());
        let original = std::env::current_dir().unwrap();
        std::env::set_current_dir(new_dir).unwrap();
        Self {
            original,
            _lock: lock,
        }
    }
}

impl Drop for DirGuard {
    fn drop(&mut self) {
        let _ = std::env::set_current_dir(&self.original);
    }
}

/// A system config with the given phases and themes.
///
/// Phase `X` is labelled `Phase X`; theme `n` is named `Theme n`.
pub(crate) fn system_with_phases(phases: &[(&str, &[&str])]) -> SystemConfig {
    SystemConfig {
        phases: phases
            .iter()
            .map(|(id, themes)| PhaseDef {
                id: id.to_string(),
                label: format!("Phase {}", id),
                themes: themes
                    .iter()
                    .map(|theme| ThemeDef {
                        id: theme.to_string(),
                        name: format!("Theme {}", theme),
                        main_question: format!("Question for theme {}", theme),
                    })
                    .collect(),
            })
            .collect(),
        ..SystemConfig::default()
    }
}

/// Write `<dir>/<phase>/<theme>_step<step>.md` and return its path.
pub(crate) fn write_template(dir: &Path, phase: &str, theme: &str, step: u32, text: &str) -> PathBuf {
    let phase_dir = dir.join(phase);
    std::fs::create_dir_all(&phase_dir).unwrap();
    let path = phase_dir.join(format!("{}_step{}.md", theme, step));
    std::fs::write(&path, text).unwrap();
    path
}

/// A throwaway research workspace in a temp directory.
pub(crate) struct TestWorkspace {
    dir: TempDir,
}

impl TestWorkspace {
    pub(crate) fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub(crate) fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `project_config.md` with one bullet per entry.
    pub(crate) fn with_project(self, entries: &[(&str, &str)]) -> Self {
        let mut content = String::from("# Project\n\n");
        for (key, value) in entries {
            content.push_str(&format!("- {}: {}\n", key, value));
        }
        std::fs::write(self.path().join("project_config.md"), content).unwrap();
        self
    }

    /// Write `config/system_config.json`.
    pub(crate) fn with_system(self, system: &SystemConfig) -> Self {
        let config_dir = self.path().join("config");
        std::fs::create_dir_all(&config_dir).unwrap();
        std::fs::write(config_dir.join("system_config.json"), system.to_json().unwrap()).unwrap();
        self
    }

    /// Write a template under `prompts/`.
    pub(crate) fn with_template(self, phase: &str, theme: &str, step: u32, text: &str) -> Self {
        write_template(&self.path().join("prompts"), phase, theme, step, text);
        self
    }

    pub(crate) fn workspace(&self) -> Workspace {
        Workspace::resolve_from(self.path(), &PathOverrides::default()).unwrap()
    }

    /// Files below `outputs/<topic-slug>/<phase>/`, sorted by name.
    pub(crate) fn outputs(&self, topic_slug: &str, phase: &str) -> Vec<String> {
        let dir = self.path().join("outputs").join(topic_slug).join(phase);
        let Ok(entries) = std::fs::read_dir(dir) else {
            return Vec::new();
        };
        let mut names: Vec<String> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        names
    }
}
