//! The closed command vocabulary

use serde::{Deserialize, Serialize};
use std::fmt;

/// Every command the dispatcher understands.
///
/// Declaration order is significant: the dispatcher fires every keyword
/// contained in the input token, in this order. Each keyword also keeps
/// its stable numeric index (1-based; 0 is reserved) which HOTKEY uses to
/// refer to a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandKeyword {
    Post,
    In,
    Rest,
    Resume,
    Out,
    Open,
    Close,
    Hotkey,
    SysListen,
    LogTarget,
    SessionTime,
    Print,
    NewAlias,
    GenAliasKey,
    GetHours,
    GetMinutes,
    GetSeconds,
    Help,
    End,
}

impl CommandKeyword {
    /// All keywords in dispatch order
    pub const ALL: [CommandKeyword; 19] = [
        CommandKeyword::Post,
        CommandKeyword::In,
        CommandKeyword::Rest,
        CommandKeyword::Resume,
        CommandKeyword::Out,
        CommandKeyword::Open,
        CommandKeyword::Close,
        CommandKeyword::Hotkey,
        CommandKeyword::SysListen,
        CommandKeyword::LogTarget,
        CommandKeyword::SessionTime,
        CommandKeyword::Print,
        CommandKeyword::NewAlias,
        CommandKeyword::GenAliasKey,
        CommandKeyword::GetHours,
        CommandKeyword::GetMinutes,
        CommandKeyword::GetSeconds,
        CommandKeyword::Help,
        CommandKeyword::End,
    ];

    /// Uppercase text matched against the input token
    pub fn keyword(&self) -> &'static str {
        match self {
            CommandKeyword::Post => "POST",
            CommandKeyword::In => "IN",
            CommandKeyword::Rest => "REST",
            CommandKeyword::Resume => "RESUME",
            CommandKeyword::Out => "OUT",
            CommandKeyword::Open => "OPEN",
            CommandKeyword::Close => "CLOSE",
            CommandKeyword::Hotkey => "HOTKEY",
            CommandKeyword::SysListen => "SYSLIS",
            CommandKeyword::LogTarget => "LOGTAR",
            CommandKeyword::SessionTime => "SESTIM",
            CommandKeyword::Print => "PRINT",
            CommandKeyword::NewAlias => "NEWALI",
            CommandKeyword::GenAliasKey => "GENALIKEY",
            CommandKeyword::GetHours => "GETHRS",
            CommandKeyword::GetMinutes => "GETMINS",
            CommandKeyword::GetSeconds => "GETSECS",
            CommandKeyword::Help => "HELP",
            CommandKeyword::End => "END",
        }
    }

    /// Stable 1-based index of this keyword
    pub fn index(&self) -> usize {
        Self::ALL
            .iter()
            .position(|k| k == self)
            .map(|p| p + 1)
            .unwrap_or(0)
    }

    /// Look up a keyword by its 1-based index; 0 and out-of-range yield None
    pub fn from_index(index: usize) -> Option<Self> {
        index.checked_sub(1).and_then(|i| Self::ALL.get(i).copied())
    }

    /// Whether the command touches OS state and is gated on system events
    pub fn is_system(&self) -> bool {
        matches!(
            self,
            CommandKeyword::Open
                | CommandKeyword::Close
                | CommandKeyword::Hotkey
                | CommandKeyword::NewAlias
                | CommandKeyword::GenAliasKey
        )
    }

    /// One-line usage shown by HELP
    pub fn usage(&self) -> &'static str {
        match self {
            CommandKeyword::Post => "post \"message\"        add a note to the time log",
            CommandKeyword::In => "in                    punch in",
            CommandKeyword::Rest => "rest                  take a break (timers pause)",
            CommandKeyword::Resume => "resume                come back from a break",
            CommandKeyword::Out => "out                   punch out",
            CommandKeyword::Open => "open \"target|alias\"   start one or more processes",
            CommandKeyword::Close => "close \"name\"          stop tracked processes by name",
            CommandKeyword::Hotkey => "hotkey <key> <index>  bind ALT+key to a command index",
            CommandKeyword::SysListen => "syslis [true|false]   enable or disable system events",
            CommandKeyword::LogTarget => "logtar \"dir\"          write the time log to another directory",
            CommandKeyword::SessionTime => "sestim                show segment and cumulative runtime",
            CommandKeyword::Print => "print                 print a summary of this session",
            CommandKeyword::NewAlias => "newali \"targets\" \"name\" register an alias",
            CommandKeyword::GenAliasKey => "genalikey             create the alias store",
            CommandKeyword::GetHours => "gethrs [1]            runtime in hours (1 = segment)",
            CommandKeyword::GetMinutes => "getmins [1]           runtime in minutes (1 = segment)",
            CommandKeyword::GetSeconds => "getsecs [1]           runtime in seconds (1 = segment)",
            CommandKeyword::Help => "help                  list commands",
            CommandKeyword::End => "end                   end the time logging session",
        }
    }
}

impl fmt::Display for CommandKeyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_are_one_based_and_round_trip() {
        assert_eq!(CommandKeyword::Post.index(), 1);
        assert_eq!(CommandKeyword::End.index(), 19);
        assert_eq!(CommandKeyword::from_index(0), None);
        assert_eq!(CommandKeyword::from_index(20), None);
        for keyword in CommandKeyword::ALL {
            assert_eq!(CommandKeyword::from_index(keyword.index()), Some(keyword));
        }
    }

    #[test]
    fn keywords_are_unique_uppercase() {
        let mut seen = std::collections::HashSet::new();
        for keyword in CommandKeyword::ALL {
            let text = keyword.keyword();
            assert_eq!(text, text.to_uppercase());
            assert!(seen.insert(text), "duplicate keyword {text}");
        }
    }

    #[test]
    fn system_commands() {
        let system: Vec<_> = CommandKeyword::ALL
            .into_iter()
            .filter(|k| k.is_system())
            .collect();
        assert_eq!(
            system,
            vec![
                CommandKeyword::Open,
                CommandKeyword::Close,
                CommandKeyword::Hotkey,
                CommandKeyword::NewAlias,
                CommandKeyword::GenAliasKey,
            ]
        );
    }
}
