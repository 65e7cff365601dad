//! Toolkit-independent model of the settings surface.
//!
//! [`SettingsForm`] holds the draft state a settings dialog edits: the hotkey
//! fields, the curated toggle list, and the host's available layouts.  Every
//! hotkey field change is followed by [`SettingsForm::validate`], which asks
//! the host for conflicts and runs the pure [`classify_hotkey`] to produce a
//! [`HotkeyStatus`] a front end can render.
//!
//! [`SettingsWindow`] is the caller-held handle that owns a form while it is
//! shown.  Whatever owns the host menu action keeps one of these and calls
//! [`SettingsWindow::display`] each time the action fires.

use crate::preferences::{HotkeyBinding, PreferenceRecord};
use crate::store::{PreferenceStore, StoreError};
use crate::traits::{HotkeyManager, NamedAction, OptionStore, WorkspaceManager};
use log::{debug, info};

/// Possible errors from the settings surface.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error(transparent)]
    Preferences(#[from] StoreError),

    /// Saving needs a non-blank hotkey key.
    #[error("hotkey key is empty")]
    EmptyHotkey,

    /// The key field holds more than one character.
    #[error("hotkey key {0:?} must be a single character")]
    InvalidKey(String),

    /// The window has no form to operate on.
    #[error("settings window is not shown")]
    NotShown,

    #[error("workspace manager error: {0}")]
    WorkspaceManager(String),

    #[error("hotkey manager error: {0}")]
    HotkeyManager(String),
}

/// Availability of the hotkey currently entered in the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HotkeyStatus {
    /// No key entered; saving is disabled.
    Empty,
    /// The key field holds more than one character; saving is disabled.
    Invalid,
    /// The combination is free (or already ours).
    Available,
    /// The combination is bound to another action, named here.
    Conflict(String),
}

/// Classify `binding` given the host's conflict answer.
///
/// A conflict naming `own_action` is not a conflict: it is the binding a
/// previous save created.
pub fn classify_hotkey(
    binding: &HotkeyBinding,
    conflict: Option<&str>,
    own_action: &str,
) -> HotkeyStatus {
    if !binding.is_enabled() {
        return HotkeyStatus::Empty;
    }
    if !binding.is_single_key() {
        return HotkeyStatus::Invalid;
    }
    match conflict {
        Some(name) if name != own_action => HotkeyStatus::Conflict(name.to_string()),
        _ => HotkeyStatus::Available,
    }
}

/// Draft state of the settings surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsForm {
    hotkey: HotkeyBinding,
    toggle_list: Vec<String>,
    available: Vec<String>,
    status: HotkeyStatus,
}

impl SettingsForm {
    /// Populate the fields from a stored record.
    ///
    /// The available-layout list starts empty; call
    /// [`refresh_available`](Self::refresh_available).
    pub fn from_record(record: &PreferenceRecord) -> Self {
        let mut form = Self {
            hotkey: HotkeyBinding::default(),
            toggle_list: record.workspaces.clone(),
            available: Vec::new(),
            status: HotkeyStatus::Empty,
        };
        form.set_key_text(&record.hotkey.key);
        form.set_modifiers(record.hotkey.ctl, record.hotkey.alt, record.hotkey.shift);
        form
    }

    pub fn hotkey(&self) -> &HotkeyBinding {
        &self.hotkey
    }

    pub fn toggle_list(&self) -> &[String] {
        &self.toggle_list
    }

    pub fn available(&self) -> &[String] {
        &self.available
    }

    /// Status from the last [`validate`](Self::validate).
    pub fn status(&self) -> &HotkeyStatus {
        &self.status
    }

    /// Re-query the host for every known layout.
    pub fn refresh_available<W: WorkspaceManager>(&mut self, wm: &W) -> Result<(), SettingsError> {
        self.available = wm
            .list_all()
            .map_err(|e| SettingsError::WorkspaceManager(e.to_string()))?;
        debug!("{} layout(s) available", self.available.len());
        Ok(())
    }

    /// Append `selected` to the toggle list in order.
    ///
    /// Names already in the list are skipped.  Returns how many were added.
    pub fn add_to_toggle_list(&mut self, selected: &[String]) -> usize {
        let mut added = 0;
        for name in selected {
            if self.toggle_list.contains(name) {
                debug!("{:?} already in toggle list", name);
                continue;
            }
            self.toggle_list.push(name.clone());
            added += 1;
        }
        added
    }

    /// Remove every entry matching one of `selected`.  Returns how many were
    /// removed.
    pub fn remove_from_toggle_list(&mut self, selected: &[String]) -> usize {
        let before = self.toggle_list.len();
        self.toggle_list.retain(|name| !selected.contains(name));
        before - self.toggle_list.len()
    }

    /// Set the key field.  Input is lowercased.
    pub fn set_key_text(&mut self, text: &str) {
        self.hotkey.key = text.trim().to_lowercase();
    }

    pub fn set_modifiers(&mut self, ctl: bool, alt: bool, shift: bool) {
        self.hotkey.ctl = ctl;
        self.hotkey.alt = alt;
        self.hotkey.shift = shift;
    }

    /// Replace the whole hotkey draft.
    pub fn set_hotkey(&mut self, binding: &HotkeyBinding) {
        self.set_key_text(&binding.key);
        self.set_modifiers(binding.ctl, binding.alt, binding.shift);
    }

    /// Saving is allowed once exactly one key character is entered.
    pub fn can_save(&self) -> bool {
        self.hotkey.is_single_key()
    }

    /// Check the drafted hotkey against the host and update [`status`](Self::status).
    pub fn validate<H: HotkeyManager>(
        &mut self,
        hotkeys: &H,
        own_action: &str,
    ) -> Result<&HotkeyStatus, SettingsError> {
        let conflict = if self.hotkey.is_single_key() {
            hotkeys
                .check_conflict(&self.hotkey)
                .map_err(|e| SettingsError::HotkeyManager(e.to_string()))?
        } else {
            None
        };
        self.status = classify_hotkey(&self.hotkey, conflict.as_deref(), own_action);
        debug!("hotkey {} is {:?}", self.hotkey, self.status);
        Ok(&self.status)
    }

    /// The record this form would save.
    pub fn to_record(&self) -> PreferenceRecord {
        PreferenceRecord {
            workspaces: self.toggle_list.clone(),
            hotkey: self.hotkey.clone(),
        }
    }

    /// Write the record, then bind the hotkey to `action`.
    pub fn save<S: OptionStore, H: HotkeyManager>(
        &self,
        store: &PreferenceStore<S>,
        hotkeys: &H,
        action: &NamedAction,
    ) -> Result<PreferenceRecord, SettingsError> {
        if !self.hotkey.is_enabled() {
            return Err(SettingsError::EmptyHotkey);
        }
        if !self.can_save() {
            return Err(SettingsError::InvalidKey(self.hotkey.key.clone()));
        }
        let record = self.to_record();
        store.save(&record)?;
        hotkeys
            .bind(&record.hotkey, action)
            .map_err(|e| SettingsError::HotkeyManager(e.to_string()))?;
        info!("bound {} to {}", record.hotkey, action.name);
        Ok(record)
    }
}

/// Outcome of [`SettingsWindow::display`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presentation {
    /// The window was hidden and has been shown with freshly loaded fields.
    Shown,
    /// The window was already visible and has been brought to the front.
    Raised,
}

/// Caller-held handle to the settings surface.
#[derive(Debug, Default)]
pub struct SettingsWindow {
    form: Option<SettingsForm>,
}

impl SettingsWindow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self) -> bool {
        self.form.is_some()
    }

    /// Show the window, or raise it if it is already visible.
    ///
    /// Showing reloads the form from `store` and re-queries the available
    /// layouts; raising leaves the current draft untouched.
    pub fn display<S: OptionStore, W: WorkspaceManager>(
        &mut self,
        store: &PreferenceStore<S>,
        wm: &W,
    ) -> Result<Presentation, SettingsError> {
        if self.form.is_some() {
            return Ok(Presentation::Raised);
        }
        let mut form = SettingsForm::from_record(&store.load()?);
        form.refresh_available(wm)?;
        self.form = Some(form);
        Ok(Presentation::Shown)
    }

    pub fn form(&self) -> Option<&SettingsForm> {
        self.form.as_ref()
    }

    pub fn form_mut(&mut self) -> Option<&mut SettingsForm> {
        self.form.as_mut()
    }

    /// Hide the window, discarding unsaved edits.
    pub fn close(&mut self) {
        self.form = None;
    }

    /// Save the draft and close.  The window stays open if saving fails.
    pub fn save<S: OptionStore, H: HotkeyManager>(
        &mut self,
        store: &PreferenceStore<S>,
        hotkeys: &H,
        action: &NamedAction,
    ) -> Result<PreferenceRecord, SettingsError> {
        let form = self.form.as_ref().ok_or(SettingsError::NotShown)?;
        let record = form.save(store, hotkeys, action)?;
        self.close();
        Ok(record)
    }
}
