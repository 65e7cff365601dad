//! Commands accepted by the `wstoggle` binary.
//!
//! [`Command`] is the vocabulary shared by the argument parser and the
//! [`App`](crate::app::App) that executes it.  Hotkeys are given in text
//! form (`"ctrl+w"`, `"alt+shift+q"`) and parsed with
//! [`HotkeyBinding`]'s `FromStr`.

use crate::preferences::{HotkeyBinding, HotkeyParseError};
use std::fmt;

/// Usage text printed by `wstoggle help`.
pub const USAGE: &str = "\
usage: wstoggle <command> [args]

commands:
  toggle                 activate the next layout in the toggle list
  show                   print the toggle list, hotkey and active layout
  layouts                list every layout the host knows
  add <name>...          append layouts to the toggle list
  remove <name>...       remove layouts from the toggle list
  hotkey <combo> [--force]
                         set and bind the hotkey (e.g. ctrl+w)
  check <combo>          report whether a hotkey is free
  register <name>...     add layouts to the local host
  activate <name>        switch the local host to a layout
  help                   print this message";

/// Every action the binary can perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Cycle to the next curated layout.
    Toggle,

    /// Print the preference record and the active layout.
    Show,

    /// List all host layouts.
    Layouts,

    /// Append layouts to the toggle list.
    Add(Vec<String>),

    /// Remove layouts from the toggle list.
    Remove(Vec<String>),

    /// Set the hotkey.  A combination owned by another action is refused
    /// unless `force` is set.
    Hotkey { binding: HotkeyBinding, force: bool },

    /// Report the status of a hotkey without saving it.
    Check(HotkeyBinding),

    /// Add layouts to the local host.
    Register(Vec<String>),

    /// Switch the local host to a layout.
    Activate(String),

    Help,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Toggle => write!(f, "toggle"),
            Command::Show => write!(f, "show"),
            Command::Layouts => write!(f, "layouts"),
            Command::Add(names) => write!(f, "add {:?}", names),
            Command::Remove(names) => write!(f, "remove {:?}", names),
            Command::Hotkey { binding, force } => {
                write!(f, "hotkey {}", binding)?;
                if *force {
                    write!(f, " --force")?;
                }
                Ok(())
            }
            Command::Check(binding) => write!(f, "check {}", binding),
            Command::Register(names) => write!(f, "register {:?}", names),
            Command::Activate(name) => write!(f, "activate {:?}", name),
            Command::Help => write!(f, "help"),
        }
    }
}

/// Error from parsing command-line arguments.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("unknown command: {0}")]
    Unknown(String),
    #[error("{command}: missing {what}")]
    MissingArgument {
        command: &'static str,
        what: &'static str,
    },
    #[error("{command}: unexpected argument {arg:?}")]
    UnexpectedArgument { command: &'static str, arg: String },
    #[error(transparent)]
    Hotkey(#[from] HotkeyParseError),
}

impl Command {
    /// Parse the arguments that follow the program name.
    ///
    /// No arguments means [`Command::Toggle`], so the binary can be bound
    /// directly as the hotkey's command.
    pub fn parse<I, S>(args: I) -> Result<Command, CommandError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut args = args.into_iter().map(Into::into);
        let Some(name) = args.next() else {
            return Ok(Command::Toggle);
        };
        let rest: Vec<String> = args.collect();

        match name.trim().to_lowercase().as_str() {
            "toggle" | "next" => no_args("toggle", rest).map(|_| Command::Toggle),
            "show" | "status" => no_args("show", rest).map(|_| Command::Show),
            "layouts" | "list" => no_args("layouts", rest).map(|_| Command::Layouts),
            "add" => at_least_one("add", rest).map(Command::Add),
            "remove" | "rm" => at_least_one("remove", rest).map(Command::Remove),
            "register" => at_least_one("register", rest).map(Command::Register),
            "activate" => {
                let mut names = at_least_one("activate", rest)?;
                if names.len() > 1 {
                    return Err(CommandError::UnexpectedArgument {
                        command: "activate",
                        arg: names.swap_remove(1),
                    });
                }
                Ok(Command::Activate(names.swap_remove(0)))
            }
            "hotkey" => {
                let mut force = false;
                let mut combo = None;
                for arg in rest {
                    if arg == "--force" || arg == "-f" {
                        force = true;
                    } else if combo.is_none() {
                        combo = Some(arg);
                    } else {
                        return Err(CommandError::UnexpectedArgument {
                            command: "hotkey",
                            arg,
                        });
                    }
                }
                let combo = combo.ok_or(CommandError::MissingArgument {
                    command: "hotkey",
                    what: "key combination",
                })?;
                Ok(Command::Hotkey {
                    binding: combo.parse()?,
                    force,
                })
            }
            "check" => {
                let mut combos = at_least_one("check", rest)?;
                if combos.len() > 1 {
                    return Err(CommandError::UnexpectedArgument {
                        command: "check",
                        arg: combos.swap_remove(1),
                    });
                }
                Ok(Command::Check(combos[0].parse()?))
            }
            "help" | "-h" | "--help" => Ok(Command::Help),
            _ => Err(CommandError::Unknown(name)),
        }
    }
}

fn no_args(command: &'static str, rest: Vec<String>) -> Result<(), CommandError> {
    match rest.into_iter().next() {
        Some(arg) => Err(CommandError::UnexpectedArgument { command, arg }),
        None => Ok(()),
    }
}

fn at_least_one(command: &'static str, rest: Vec<String>) -> Result<Vec<String>, CommandError> {
    if rest.is_empty() {
        return Err(CommandError::MissingArgument {
            command,
            what: "layout name",
        });
    }
    Ok(rest)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Command, CommandError> {
        Command::parse(args.iter().copied())
    }

    #[test]
    fn no_arguments_toggles() {
        assert_eq!(parse(&[]), Ok(Command::Toggle));
        assert_eq!(parse(&["toggle"]), Ok(Command::Toggle));
        assert_eq!(parse(&["NEXT"]), Ok(Command::Toggle));
    }

    #[test]
    fn parse_list_commands() {
        assert_eq!(
            parse(&["add", "Modeling", "UV Editing"]),
            Ok(Command::Add(vec!["Modeling".into(), "UV Editing".into()]))
        );
        assert_eq!(parse(&["rm", "Modeling"]), Ok(Command::Remove(vec!["Modeling".into()])));
        assert_eq!(
            parse(&["register", "General"]),
            Ok(Command::Register(vec!["General".into()]))
        );
        assert_eq!(parse(&["activate", "General"]), Ok(Command::Activate("General".into())));
    }

    #[test]
    fn parse_hotkey_with_force() {
        assert_eq!(
            parse(&["hotkey", "ctrl+w"]),
            Ok(Command::Hotkey {
                binding: HotkeyBinding::ctrl('w'),
                force: false
            })
        );
        assert_eq!(
            parse(&["hotkey", "--force", "Ctrl+W"]),
            Ok(Command::Hotkey {
                binding: HotkeyBinding::ctrl('w'),
                force: true
            })
        );
        assert_eq!(parse(&["check", "ctrl+w"]), Ok(Command::Check(HotkeyBinding::ctrl('w'))));
        assert_eq!(parse(&["check", "ctrl+-"]), Ok(Command::Check(HotkeyBinding::ctrl('-'))));
    }

    #[test]
    fn parse_errors() {
        assert_eq!(parse(&["frobnicate"]), Err(CommandError::Unknown("frobnicate".into())));
        assert!(matches!(parse(&["add"]), Err(CommandError::MissingArgument { command: "add", .. })));
        assert!(matches!(parse(&["hotkey"]), Err(CommandError::MissingArgument { .. })));
        assert!(matches!(
            parse(&["hotkey", "ctrl+w", "alt+q"]),
            Err(CommandError::UnexpectedArgument { .. })
        ));
        assert!(matches!(
            parse(&["show", "extra"]),
            Err(CommandError::UnexpectedArgument { command: "show", .. })
        ));
        assert!(matches!(
            parse(&["activate", "a", "b"]),
            Err(CommandError::UnexpectedArgument { .. })
        ));
        assert!(matches!(parse(&["hotkey", "ctrl+alt"]), Err(CommandError::Hotkey(_))));
    }

    #[test]
    fn display_round_trips_names() {
        assert_eq!(Command::Toggle.to_string(), "toggle");
        assert_eq!(
            Command::Hotkey {
                binding: HotkeyBinding::ctrl('w'),
                force: true
            }
            .to_string(),
            "hotkey Ctrl+w --force"
        );
    }
}
