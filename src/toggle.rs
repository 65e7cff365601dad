//! Cycling through the curated workspace list.
//!
//! [`advance`] is the pure cycle step.  [`WorkspaceToggler`] is what a hotkey
//! press runs: it loads the record, asks the [`WorkspaceManager`] which
//! layout is active, and activates the next one.

use crate::preferences::PreferenceRecord;
use crate::store::{PreferenceStore, StoreError};
use crate::traits::{OptionStore, WorkspaceManager};
use log::{debug, info};

/// Possible errors from a toggle.
#[derive(Debug, thiserror::Error)]
pub enum ToggleError {
    #[error(transparent)]
    Preferences(#[from] StoreError),

    /// The workspace manager returned an error.
    #[error("workspace manager error: {0}")]
    WorkspaceManager(String),
}

/// Pick the layout that follows `current` in `record.workspaces`.
///
/// * Empty list: `None`.
/// * `current` not in the list: the first entry.
/// * Otherwise the entry after the first occurrence of `current`, wrapping
///   to the start after the last one.
pub fn advance<'a>(record: &'a PreferenceRecord, current: &str) -> Option<&'a str> {
    let workspaces = &record.workspaces;
    let first = workspaces.first()?;
    let target = match workspaces.iter().position(|w| w == current) {
        Some(i) => &workspaces[(i + 1) % workspaces.len()],
        None => first,
    };
    Some(target.as_str())
}

/// Runs one toggle step against a host.
///
/// Generic over the [`OptionStore`] the record is read from and the
/// [`WorkspaceManager`] that is queried and switched.
///
/// ```ignore
/// let host = LocalHost::open(path)?;
/// let toggler = WorkspaceToggler::new(PreferenceStore::new(&host), &host);
/// toggler.toggle()?;
/// ```
pub struct WorkspaceToggler<S: OptionStore, W: WorkspaceManager> {
    store: PreferenceStore<S>,
    wm: W,
}

impl<S: OptionStore, W: WorkspaceManager> WorkspaceToggler<S, W> {
    pub fn new(store: PreferenceStore<S>, wm: W) -> Self {
        Self { store, wm }
    }

    /// Activate the next curated layout.
    ///
    /// Returns the name passed to [`WorkspaceManager::activate`], or `None`
    /// when the curated list is empty (the host is not touched at all).  The
    /// target is not checked against the host's known layouts.
    pub fn toggle(&self) -> Result<Option<String>, ToggleError> {
        let record = self.store.load()?;
        if record.workspaces.is_empty() {
            debug!("toggle list is empty, nothing to do");
            return Ok(None);
        }

        let current = self
            .wm
            .current()
            .map_err(|e| ToggleError::WorkspaceManager(e.to_string()))?;

        let Some(target) = advance(&record, &current) else {
            return Ok(None);
        };

        info!("toggle {:?} -> {:?}", current, target);
        self.wm
            .activate(target)
            .map_err(|e| ToggleError::WorkspaceManager(e.to_string()))?;
        Ok(Some(target.to_string()))
    }
}
