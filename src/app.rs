//! Executes [`Command`]s against a [`LocalHost`].
//!
//! [`App`] wires the [`PreferenceStore`], the [`WorkspaceToggler`] and the
//! [`SettingsWindow`] to one host and writes human-readable output to the
//! supplied writer.

use crate::command::{Command, USAGE};
use crate::local::host::{LocalHost, LocalHostError};
use crate::preferences::HotkeyBinding;
use crate::settings::{HotkeyStatus, SettingsError, SettingsWindow};
use crate::store::{PreferenceStore, StoreError};
use crate::toggle::{ToggleError, WorkspaceToggler};
use crate::traits::{NamedAction, WorkspaceManager};
use log::{info, warn};
use std::io::Write;

/// Possible errors from running a command.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Toggle(#[from] ToggleError),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    Preferences(#[from] StoreError),

    #[error(transparent)]
    Host(#[from] LocalHostError),

    /// A layout name the host does not know.
    #[error("unknown workspace layout: {0}")]
    UnknownLayout(String),

    /// The requested hotkey belongs to another action.
    #[error("{binding} is already bound to {owner} (use --force to take it)")]
    HotkeyConflict {
        binding: HotkeyBinding,
        owner: String,
    },

    #[error("output error: {0}")]
    Io(#[from] std::io::Error),
}

/// Command executor bound to one host.
pub struct App<'h> {
    host: &'h LocalHost,
    store: PreferenceStore<&'h LocalHost>,
    action: NamedAction,
}

impl<'h> App<'h> {
    pub fn new(host: &'h LocalHost, action: NamedAction) -> Self {
        Self {
            host,
            store: PreferenceStore::new(host),
            action,
        }
    }

    /// Run one command, writing its output to `out`.
    pub fn handle(&self, cmd: Command, out: &mut impl Write) -> Result<(), AppError> {
        match cmd {
            Command::Toggle => {
                let toggler = WorkspaceToggler::new(PreferenceStore::new(self.host), self.host);
                match toggler.toggle()? {
                    Some(name) => writeln!(out, "{}", name)?,
                    None => info!("toggle list is empty"),
                }
            }

            Command::Show => {
                let record = self.store.load()?;
                let active = self.host.current()?;
                writeln!(out, "hotkey: {}", record.hotkey)?;
                writeln!(out, "active: {}", if active.is_empty() { "-" } else { active.as_str() })?;
                writeln!(out, "toggle list:")?;
                if record.workspaces.is_empty() {
                    writeln!(out, "  (empty)")?;
                }
                for (i, name) in record.workspaces.iter().enumerate() {
                    let marker = if *name == active { '*' } else { ' ' };
                    writeln!(out, "{} {}. {}", marker, i + 1, name)?;
                }
            }

            Command::Layouts => {
                for name in self.host.list_all()? {
                    writeln!(out, "{}", name)?;
                }
            }

            Command::Add(names) => {
                let mut window = self.open_settings()?;
                let form = window.form_mut().ok_or(SettingsError::NotShown)?;
                if let Some(unknown) = names.iter().find(|n| !form.available().contains(n)) {
                    return Err(AppError::UnknownLayout(unknown.clone()));
                }
                let added = form.add_to_toggle_list(&names);
                if added < names.len() {
                    warn!("{} layout(s) already in the toggle list", names.len() - added);
                }
                let record = window.save(&self.store, self.host, &self.action)?;
                writeln!(out, "toggle list: {}", record.workspaces.join(", "))?;
            }

            Command::Remove(names) => {
                let mut window = self.open_settings()?;
                let form = window.form_mut().ok_or(SettingsError::NotShown)?;
                if form.remove_from_toggle_list(&names) == 0 {
                    warn!("none of {:?} is in the toggle list", names);
                }
                let record = window.save(&self.store, self.host, &self.action)?;
                writeln!(out, "toggle list: {}", record.workspaces.join(", "))?;
            }

            Command::Hotkey { binding, force } => {
                let mut window = self.open_settings()?;
                let form = window.form_mut().ok_or(SettingsError::NotShown)?;
                form.set_hotkey(&binding);
                if let HotkeyStatus::Conflict(owner) = form.validate(self.host, &self.action.name)? {
                    if !force {
                        return Err(AppError::HotkeyConflict {
                            binding,
                            owner: owner.clone(),
                        });
                    }
                    warn!("taking {} from {}", binding, owner);
                }
                let record = window.save(&self.store, self.host, &self.action)?;
                writeln!(out, "hotkey: {}", record.hotkey)?;
            }

            Command::Check(binding) => {
                let mut window = self.open_settings()?;
                let form = window.form_mut().ok_or(SettingsError::NotShown)?;
                form.set_hotkey(&binding);
                match form.validate(self.host, &self.action.name)? {
                    HotkeyStatus::Empty => writeln!(out, "no key entered")?,
                    HotkeyStatus::Invalid => writeln!(out, "{} is not a single key", binding)?,
                    HotkeyStatus::Available => writeln!(out, "{} is available", binding)?,
                    HotkeyStatus::Conflict(owner) => {
                        writeln!(out, "{} is bound to {}", binding, owner)?
                    }
                }
                window.close();
            }

            Command::Register(names) => {
                for name in &names {
                    if !self.host.register_layout(name)? {
                        warn!("layout {:?} already registered", name);
                    }
                }
            }

            Command::Activate(name) => {
                self.host.activate(&name)?;
                writeln!(out, "{}", name)?;
            }

            Command::Help => writeln!(out, "{}", USAGE)?,
        }
        Ok(())
    }

    fn open_settings(&self) -> Result<SettingsWindow, AppError> {
        let mut window = SettingsWindow::new();
        window.display(&self.store, self.host)?;
        Ok(window)
    }
}
