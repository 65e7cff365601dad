//! **wstoggle** — cycle through a curated list of workspace layouts.
//!
//! The user picks an ordered list of the host application's named workspace
//! layouts and binds one hotkey.  Each press activates the next layout in
//! the list, wrapping around after the last one.
//!
//! # Architecture
//!
//! The host application is reached only through the traits in [`traits`]:
//!
//! * [`traits::OptionStore`] — persistent key-value storage holding the
//!   [`preferences::PreferenceRecord`].
//! * [`traits::WorkspaceManager`] — query, list and activate layouts.
//! * [`traits::HotkeyManager`] — conflict check and binding.
//!
//! On top of those, [`store`] loads and saves the record, [`toggle`] holds
//! the cycle step, and [`settings`] models the settings surface.  The
//! JSON-file backend in [`local`] and the [`app`] command executor make up
//! the `wstoggle` binary.

pub mod app;
pub mod command;
pub mod config;
pub mod local;
pub mod preferences;
pub mod settings;
pub mod store;
pub mod toggle;
pub mod traits;
