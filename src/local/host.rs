//! Host backend that keeps all host state in one JSON file.
//!
//! The file holds the option store, the known layouts, the active layout and
//! the hotkey table:
//!
//! ```json
//! {
//!   "options": { "dsWorkspaceToggle": "{\"workspaces\":[\"Modeling\"]}" },
//!   "layouts": ["General", "Modeling", "Animation"],
//!   "active": "General",
//!   "hotkeys": [
//!     { "binding": { "key": "w", "ctl": true, "alt": false, "shift": false },
//!       "action": "toggle_workspaces" }
//!   ]
//! }
//! ```
//!
//! A missing file is an empty host.  Every mutating call rewrites the file;
//! the in-memory state only changes once the write has succeeded.

use crate::preferences::HotkeyBinding;
use crate::traits::{HotkeyManager, NamedAction, OptionStore, WorkspaceManager};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Errors that can occur in the local host.
#[derive(Debug, thiserror::Error)]
#[error("local host error: {0}")]
pub struct LocalHostError(String);

/// One row of the hotkey table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct HotkeyEntry {
    binding: HotkeyBinding,
    action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    command: Option<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    annotation: String,
}

/// Everything persisted in the state file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct HostState {
    options: BTreeMap<String, Value>,
    layouts: Vec<String>,
    active: Option<String>,
    hotkeys: Vec<HotkeyEntry>,
}

/// JSON-file-backed host.
///
/// Implements [`OptionStore`], [`WorkspaceManager`] and [`HotkeyManager`].
pub struct LocalHost {
    path: Option<PathBuf>,
    state: RefCell<HostState>,
}

impl LocalHost {
    /// A host that lives only in memory.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            state: RefCell::new(HostState::default()),
        }
    }

    /// Open the state file at `path`, starting empty if it does not exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, LocalHostError> {
        let path = path.as_ref().to_path_buf();
        let state = if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| LocalHostError(format!("read {}: {}", path.display(), e)))?;
            serde_json::from_str(&contents)
                .map_err(|e| LocalHostError(format!("parse {}: {}", path.display(), e)))?
        } else {
            debug!("{} does not exist, starting empty", path.display());
            HostState::default()
        };
        Ok(Self {
            path: Some(path),
            state: RefCell::new(state),
        })
    }

    /// The backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Add a layout to the host.  Returns `false` if it was already known.
    pub fn register_layout(&self, name: &str) -> Result<bool, LocalHostError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LocalHostError("layout name is empty".into()));
        }
        if self.state.borrow().layouts.iter().any(|l| l == name) {
            return Ok(false);
        }
        self.update(|state| {
            state.layouts.push(name.to_string());
            Ok(())
        })?;
        info!("registered layout {:?}", name);
        Ok(true)
    }

    /// The action bound to `binding`, if any.
    pub fn bound_action(&self, binding: &HotkeyBinding) -> Option<String> {
        self.state
            .borrow()
            .hotkeys
            .iter()
            .find(|e| e.binding.same_combination(binding))
            .map(|e| e.action.clone())
    }

    /// Apply `change` to a copy of the state, write the copy, then adopt it.
    fn update<T>(
        &self,
        change: impl FnOnce(&mut HostState) -> Result<T, LocalHostError>,
    ) -> Result<T, LocalHostError> {
        let mut next = self.state.borrow().clone();
        let out = change(&mut next)?;
        self.persist(&next)?;
        *self.state.borrow_mut() = next;
        Ok(out)
    }

    /// Write `state` to disk (no-op for in-memory hosts).
    fn persist(&self, state: &HostState) -> Result<(), LocalHostError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| LocalHostError(format!("create {}: {}", parent.display(), e)))?;
            }
        }
        let json = serde_json::to_string_pretty(state)
            .map_err(|e| LocalHostError(format!("encode: {}", e)))?;
        std::fs::write(path, json)
            .map_err(|e| LocalHostError(format!("write {}: {}", path.display(), e)))
    }
}

//  OptionStore implementation

impl OptionStore for LocalHost {
    type Error = LocalHostError;

    fn get(&self, key: &str) -> Result<Option<Value>, Self::Error> {
        Ok(self.state.borrow().options.get(key).cloned())
    }

    fn set(&self, key: &str, value: Value) -> Result<(), Self::Error> {
        self.update(|state| {
            state.options.insert(key.to_string(), value);
            Ok(())
        })
    }
}

//  WorkspaceManager implementation

impl WorkspaceManager for LocalHost {
    type Error = LocalHostError;

    fn current(&self) -> Result<String, Self::Error> {
        Ok(self.state.borrow().active.clone().unwrap_or_default())
    }

    fn list_all(&self) -> Result<Vec<String>, Self::Error> {
        Ok(self.state.borrow().layouts.clone())
    }

    fn activate(&self, name: &str) -> Result<(), Self::Error> {
        self.update(|state| {
            if !state.layouts.iter().any(|l| l == name) {
                return Err(LocalHostError(format!("unknown workspace layout: {:?}", name)));
            }
            state.active = Some(name.to_string());
            Ok(())
        })
    }
}

//  HotkeyManager implementation

impl HotkeyManager for LocalHost {
    type Error = LocalHostError;

    fn check_conflict(&self, binding: &HotkeyBinding) -> Result<Option<String>, Self::Error> {
        Ok(self.bound_action(binding))
    }

    fn bind(&self, binding: &HotkeyBinding, action: &NamedAction) -> Result<(), Self::Error> {
        if !binding.is_enabled() {
            return Err(LocalHostError("cannot bind an empty key".into()));
        }
        self.update(|state| {
            // One combination per action, one action per combination.
            state
                .hotkeys
                .retain(|e| e.action != action.name && !e.binding.same_combination(binding));
            state.hotkeys.push(HotkeyEntry {
                binding: binding.clone(),
                action: action.name.clone(),
                command: Some(action.command.clone()),
                annotation: action.annotation.clone(),
            });
            Ok(())
        })?;
        debug!("{} -> {} ({})", binding, action.name, action.annotation);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::PreferenceStore;
    use crate::toggle::WorkspaceToggler;

    fn action(name: &str) -> NamedAction {
        NamedAction {
            name: name.into(),
            annotation: String::new(),
            command: format!("run {}", name),
        }
    }

    #[test]
    fn missing_file_is_empty_host() {
        let dir = tempfile::tempdir().unwrap();
        let host = LocalHost::open(dir.path().join("host.json")).unwrap();
        assert!(host.list_all().unwrap().is_empty());
        assert_eq!(host.current().unwrap(), "");
        assert_eq!(OptionStore::get(&host, "anything").unwrap(), None);
    }

    #[test]
    fn state_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("host.json");
        {
            let host = LocalHost::open(&path).unwrap();
            host.register_layout("General").unwrap();
            host.register_layout("Modeling").unwrap();
            host.activate("Modeling").unwrap();
            host.set("k", Value::from("v")).unwrap();
            host.bind(&HotkeyBinding::ctrl('w'), &action("toggle")).unwrap();
        }
        let host = LocalHost::open(&path).unwrap();
        assert_eq!(host.list_all().unwrap(), vec!["General", "Modeling"]);
        assert_eq!(host.current().unwrap(), "Modeling");
        assert_eq!(OptionStore::get(&host, "k").unwrap(), Some(Value::from("v")));
        assert_eq!(host.bound_action(&HotkeyBinding::ctrl('w')).as_deref(), Some("toggle"));
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("host.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(LocalHost::open(&path).is_err());
    }

    #[test]
    fn register_layout_ignores_duplicates() {
        let host = LocalHost::in_memory();
        assert!(host.register_layout("General").unwrap());
        assert!(!host.register_layout("General").unwrap());
        assert!(host.register_layout("  ").is_err());
        assert_eq!(host.list_all().unwrap(), vec!["General"]);
    }

    #[test]
    fn activate_unknown_layout_fails() {
        let host = LocalHost::in_memory();
        host.register_layout("General").unwrap();
        assert!(host.activate("Missing").is_err());
        assert_eq!(host.current().unwrap(), "");
    }

    #[test]
    fn conflict_check_compares_all_modifiers() {
        let host = LocalHost::in_memory();
        host.bind(&HotkeyBinding::ctrl('w'), &action("close")).unwrap();
        assert_eq!(
            host.check_conflict(&"Ctrl+W".parse().unwrap()).unwrap().as_deref(),
            Some("close")
        );
        assert_eq!(host.check_conflict(&"ctrl+shift+w".parse().unwrap()).unwrap(), None);
        assert_eq!(host.check_conflict(&"w".parse().unwrap()).unwrap(), None);
    }

    #[test]
    fn rebinding_moves_the_action() {
        let host = LocalHost::in_memory();
        let toggle = action("toggle");
        host.bind(&HotkeyBinding::ctrl('w'), &toggle).unwrap();
        host.bind(&"alt+w".parse().unwrap(), &toggle).unwrap();
        assert_eq!(host.bound_action(&HotkeyBinding::ctrl('w')), None);
        assert_eq!(host.bound_action(&"alt+w".parse().unwrap()).as_deref(), Some("toggle"));

        // Binding a taken combination replaces the previous owner.
        host.bind(&"alt+w".parse().unwrap(), &action("other")).unwrap();
        assert_eq!(host.bound_action(&"alt+w".parse().unwrap()).as_deref(), Some("other"));
        assert_eq!(host.state.borrow().hotkeys.len(), 1);
    }

    #[test]
    fn bind_stores_command_and_annotation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("host.json");
        let toggle = NamedAction {
            name: "toggle".into(),
            annotation: "Toggle favorited workspaces".into(),
            command: "wstoggle toggle".into(),
        };
        LocalHost::open(&path)
            .unwrap()
            .bind(&HotkeyBinding::ctrl('w'), &toggle)
            .unwrap();

        let host = LocalHost::open(&path).unwrap();
        let state = host.state.borrow();
        assert_eq!(state.hotkeys.len(), 1);
        assert_eq!(state.hotkeys[0].command.as_deref(), Some("wstoggle toggle"));
        assert_eq!(state.hotkeys[0].annotation, "Toggle favorited workspaces");
    }

    #[test]
    fn failed_write_leaves_state_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        // The state file's parent is a regular file, so every write fails.
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        let host = LocalHost::open(blocker.join("host.json")).unwrap();

        assert!(host.register_layout("General").is_err());
        assert!(host.list_all().unwrap().is_empty());

        assert!(host.set("k", Value::from(1)).is_err());
        assert_eq!(OptionStore::get(&host, "k").unwrap(), None);

        assert!(host.bind(&HotkeyBinding::ctrl('w'), &action("toggle")).is_err());
        assert_eq!(host.check_conflict(&HotkeyBinding::ctrl('w')).unwrap(), None);
    }

    #[test]
    fn failed_activate_write_keeps_previous_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("host.json");
        let host = LocalHost::open(&path).unwrap();
        host.register_layout("General").unwrap();
        host.register_layout("Modeling").unwrap();
        host.activate("General").unwrap();

        // Replace the state file with a directory so the next write fails.
        std::fs::remove_file(&path).unwrap();
        std::fs::create_dir(&path).unwrap();
        assert!(host.activate("Modeling").is_err());
        assert_eq!(host.current().unwrap(), "General");
    }

    #[test]
    fn bind_rejects_disabled_binding() {
        let host = LocalHost::in_memory();
        assert!(host.bind(&HotkeyBinding::default(), &action("toggle")).is_err());
    }

    #[test]
    fn toggles_through_file_backed_host() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("host.json");
        let host = LocalHost::open(&path).unwrap();
        for name in ["General", "Modeling", "Animation"] {
            host.register_layout(name).unwrap();
        }
        host.activate("General").unwrap();

        let store = PreferenceStore::new(&host);
        store
            .save(&crate::preferences::PreferenceRecord {
                workspaces: vec!["Modeling".into(), "Animation".into()],
                ..Default::default()
            })
            .unwrap();

        let toggler = WorkspaceToggler::new(PreferenceStore::new(&host), &host);
        assert_eq!(toggler.toggle().unwrap().as_deref(), Some("Modeling"));
        assert_eq!(toggler.toggle().unwrap().as_deref(), Some("Animation"));
        assert_eq!(toggler.toggle().unwrap().as_deref(), Some("Modeling"));

        let reopened = LocalHost::open(&path).unwrap();
        assert_eq!(reopened.current().unwrap(), "Modeling");
    }
}
