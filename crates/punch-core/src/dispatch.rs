//! Fire-all-matches command dispatch

use punch_api::CommandKeyword;
use punch_util::Moment;
use tracing::debug;

use crate::{CommandInput, CommandRegistry, SessionContext};

/// Routes tokenized input to every handler whose keyword it contains
pub struct CommandDispatcher {
    registry: CommandRegistry,
    context: SessionContext,
}

impl CommandDispatcher {
    pub fn new(registry: CommandRegistry, context: SessionContext) -> Self {
        Self { registry, context }
    }

    /// Keywords contained in `token`, in dispatch order.
    ///
    /// Matching is a case-insensitive substring test, so one token may
    /// match several keywords (`PUNCHOUTREST` matches OUT and REST).
    pub fn matches(token: &str) -> Vec<CommandKeyword> {
        let token = token.to_uppercase();
        CommandKeyword::ALL
            .into_iter()
            .filter(|k| token.contains(k.keyword()))
            .collect()
    }

    /// Run every handler matching the command token and return the keywords fired.
    ///
    /// System-affecting commands are skipped while system events are off.
    /// Input matching nothing is ignored.
    pub fn dispatch(&mut self, input: &CommandInput, now: Moment) -> Vec<CommandKeyword> {
        let Some(token) = input.command() else {
            return Vec::new();
        };

        let mut fired = Vec::new();
        for keyword in Self::matches(token) {
            if keyword.is_system() && !self.context.system_events {
                debug!(%keyword, "System events off, command ignored");
                continue;
            }
            debug!(%keyword, token, "Dispatching command");
            (self.registry.handler(keyword))(&mut self.context, input, now);
            fired.push(keyword);
        }

        if fired.is_empty() {
            debug!(token, "No command matched");
        }
        fired
    }

    /// Command bound to an ALT hotkey
    pub fn hotkey(&self, key: char) -> Option<CommandKeyword> {
        self.context.hotkeys.get(&key.to_ascii_uppercase()).copied()
    }

    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut SessionContext {
        &mut self.context
    }

    /// Whether END has been processed
    pub fn is_finished(&self) -> bool {
        self.context.session.is_finished()
    }
}
