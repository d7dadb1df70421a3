//! Keyword to handler table

use punch_api::CommandKeyword;
use punch_util::Moment;
use thiserror::Error;

use crate::{handlers, CommandInput, SessionContext};

/// Signature every command handler shares
pub type Handler = fn(&mut SessionContext, &CommandInput, Moment);

/// Immutable pairing of a keyword with its handler
#[derive(Clone, Copy)]
pub struct Command {
    pub keyword: CommandKeyword,
    pub handler: Handler,
}

impl Command {
    pub fn new(keyword: CommandKeyword, handler: Handler) -> Self {
        Self { keyword, handler }
    }
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Command").field("keyword", &self.keyword).finish()
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Keyword {0} registered more than once")]
    Duplicate(CommandKeyword),

    #[error("Keyword {0} has no handler")]
    Missing(CommandKeyword),
}

/// Table holding exactly one handler per keyword, in dispatch order
#[derive(Debug, Clone)]
pub struct CommandRegistry {
    commands: Vec<Command>,
}

impl CommandRegistry {
    /// Build and validate a registry
    pub fn new(entries: Vec<Command>) -> Result<Self, RegistryError> {
        let mut slots: Vec<Option<Command>> = vec![None; CommandKeyword::ALL.len()];

        for command in entries {
            let slot = &mut slots[command.keyword.index() - 1];
            if slot.is_some() {
                return Err(RegistryError::Duplicate(command.keyword));
            }
            *slot = Some(command);
        }

        let commands = slots
            .into_iter()
            .zip(CommandKeyword::ALL)
            .map(|(slot, keyword)| slot.ok_or(RegistryError::Missing(keyword)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { commands })
    }

    /// Registry wired to the built-in handlers
    pub fn standard() -> Self {
        Self {
            commands: CommandKeyword::ALL
                .iter()
                .map(|k| Command::new(*k, handlers::handler_for(*k)))
                .collect(),
        }
    }

    pub fn handler(&self, keyword: CommandKeyword) -> Handler {
        self.commands[keyword.index() - 1].handler
    }

    /// Commands in dispatch order
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_: &mut SessionContext, _: &CommandInput, _: Moment) {}

    fn all_noop() -> Vec<Command> {
        CommandKeyword::ALL.iter().map(|k| Command::new(*k, noop)).collect()
    }

    #[test]
    fn complete_table_validates() {
        let registry = CommandRegistry::new(all_noop()).unwrap();
        assert_eq!(registry.commands().len(), 19);
        assert_eq!(registry.commands()[0].keyword, CommandKeyword::Post);
        assert_eq!(registry.commands()[18].keyword, CommandKeyword::End);
    }

    #[test]
    fn missing_keyword_rejected() {
        let mut entries = all_noop();
        entries.retain(|c| c.keyword != CommandKeyword::Help);
        assert_eq!(
            CommandRegistry::new(entries).unwrap_err(),
            RegistryError::Missing(CommandKeyword::Help)
        );
    }

    #[test]
    fn duplicate_keyword_rejected() {
        let mut entries = all_noop();
        entries.push(Command::new(CommandKeyword::Out, noop));
        assert_eq!(
            CommandRegistry::new(entries).unwrap_err(),
            RegistryError::Duplicate(CommandKeyword::Out)
        );
    }

    #[test]
    fn standard_registry_is_ordered() {
        let registry = CommandRegistry::standard();
        let keywords: Vec<_> = registry.commands().iter().map(|c| c.keyword).collect();
        assert_eq!(keywords, CommandKeyword::ALL.to_vec());
    }
}
