//! Command table: names, aliases, required levels and usage.

use crate::moderation::Level;

/// Every command the bot understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandId {
    Start,
    Help,
    Profile,
    Stats,
    Top,
    Warn,
    Unwarn,
    Kick,
    Mute,
    Unmute,
    Rights,
    Ban,
    Unban,
    Settings,
    Reload,
    Leave,
    Global,
    Logs,
}

/// Static description of one command.
#[derive(Debug)]
pub struct CommandSpec {
    pub id: CommandId,
    pub name: &'static str,
    /// Russian alias.
    pub alias: &'static str,
    /// `None` means anyone may run it, Blocked users included.
    pub required: Option<Level>,
    /// The first argument (or the replied-to author) names a user.
    pub takes_target: bool,
    pub usage: &'static str,
    pub summary: &'static str,
}

/// Commands under the standard prefix.
pub const STANDARD_COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        id: CommandId::Start,
        name: "start",
        alias: "старт",
        required: None,
        takes_target: false,
        usage: "start",
        summary: "activate the bot in this chat",
    },
    CommandSpec {
        id: CommandId::Help,
        name: "help",
        alias: "помощь",
        required: None,
        takes_target: false,
        usage: "help",
        summary: "this list",
    },
    CommandSpec {
        id: CommandId::Profile,
        name: "profile",
        alias: "профиль",
        required: None,
        takes_target: true,
        usage: "profile [@user]",
        summary: "level, warnings and restrictions",
    },
    CommandSpec {
        id: CommandId::Stats,
        name: "stats",
        alias: "стата",
        required: None,
        takes_target: false,
        usage: "stats",
        summary: "chat statistics",
    },
    CommandSpec {
        id: CommandId::Top,
        name: "top",
        alias: "топ",
        required: Some(Level::Member),
        takes_target: false,
        usage: "top",
        summary: "most active members",
    },
    CommandSpec {
        id: CommandId::Warn,
        name: "warn",
        alias: "варн",
        required: Some(Level::Moderator),
        takes_target: true,
        usage: "warn @user [reason]",
        summary: "issue a warning",
    },
    CommandSpec {
        id: CommandId::Unwarn,
        name: "unwarn",
        alias: "снятьварн",
        required: Some(Level::Moderator),
        takes_target: true,
        usage: "unwarn @user",
        summary: "clear warnings",
    },
    CommandSpec {
        id: CommandId::Kick,
        name: "kick",
        alias: "кик",
        required: Some(Level::Moderator),
        takes_target: true,
        usage: "kick @user [reason]",
        summary: "remove from the chat",
    },
    CommandSpec {
        id: CommandId::Mute,
        name: "mute",
        alias: "мут",
        required: Some(Level::Moderator),
        takes_target: true,
        usage: "mute @user [duration]",
        summary: "delete their messages for a while (30m, 2h, 1d)",
    },
    CommandSpec {
        id: CommandId::Unmute,
        name: "unmute",
        alias: "размут",
        required: Some(Level::Moderator),
        takes_target: true,
        usage: "unmute @user",
        summary: "lift a mute",
    },
    CommandSpec {
        id: CommandId::Rights,
        name: "rights",
        alias: "права",
        required: Some(Level::Administrator),
        takes_target: true,
        usage: "rights @user <0-7>",
        summary: "change a permission level",
    },
    CommandSpec {
        id: CommandId::Ban,
        name: "ban",
        alias: "бан",
        required: Some(Level::Administrator),
        takes_target: true,
        usage: "ban @user [duration] [reason]",
        summary: "remove and keep out, permanently without a duration",
    },
    CommandSpec {
        id: CommandId::Unban,
        name: "unban",
        alias: "разбан",
        required: Some(Level::Administrator),
        takes_target: true,
        usage: "unban @user",
        summary: "lift a ban",
    },
    CommandSpec {
        id: CommandId::Settings,
        name: "settings",
        alias: "настройки",
        required: Some(Level::Administrator),
        takes_target: false,
        usage: "settings [key value]",
        summary: "show or change chat settings",
    },
];

/// Commands under the developer prefix.
pub const DEVELOPER_COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        id: CommandId::Reload,
        name: "reload",
        alias: "обновить",
        required: Some(Level::Developer),
        takes_target: false,
        usage: "reload",
        summary: "reload content filters from the config file",
    },
    CommandSpec {
        id: CommandId::Leave,
        name: "leave",
        alias: "выйти",
        required: Some(Level::Developer),
        takes_target: false,
        usage: "leave <chat_id>",
        summary: "make the bot leave a chat",
    },
    CommandSpec {
        id: CommandId::Global,
        name: "global",
        alias: "глобал",
        required: Some(Level::Developer),
        takes_target: false,
        usage: "global <text>",
        summary: "broadcast to every chat",
    },
    CommandSpec {
        id: CommandId::Logs,
        name: "logs",
        alias: "логи",
        required: Some(Level::Developer),
        takes_target: false,
        usage: "logs [count]",
        summary: "recent moderation actions (max 50)",
    },
];

/// Find a command by English name or alias, case-insensitively.
pub fn lookup(command: &str, privileged: bool) -> Option<&'static CommandSpec> {
    let table = if privileged {
        DEVELOPER_COMMANDS
    } else {
        STANDARD_COMMANDS
    };
    let command = command.to_lowercase();
    table
        .iter()
        .find(|spec| spec.name == command || spec.alias == command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_name_and_alias() {
        assert_eq!(lookup("warn", false).map(|s| s.id), Some(CommandId::Warn));
        assert_eq!(lookup("ВАРН", false).map(|s| s.id), Some(CommandId::Warn));
        assert_eq!(lookup("Права", false).map(|s| s.id), Some(CommandId::Rights));
        assert_eq!(lookup("логи", true).map(|s| s.id), Some(CommandId::Logs));
    }

    #[test]
    fn test_namespaces_are_separate() {
        assert!(lookup("reload", false).is_none());
        assert!(lookup("warn", true).is_none());
        assert!(lookup("nonsense", false).is_none());
    }

    #[test]
    fn test_required_levels() {
        let required = |name| lookup(name, false).and_then(|s| s.required);
        assert_eq!(required("start"), None);
        assert_eq!(required("top"), Some(Level::Member));
        assert_eq!(required("mute"), Some(Level::Moderator));
        assert_eq!(required("ban"), Some(Level::Administrator));
        assert!(
            DEVELOPER_COMMANDS
                .iter()
                .all(|s| s.required == Some(Level::Developer))
        );
    }

    #[test]
    fn test_names_are_unique() {
        for table in [STANDARD_COMMANDS, DEVELOPER_COMMANDS] {
            for (i, a) in table.iter().enumerate() {
                for b in &table[i + 1..] {
                    assert_ne!(a.name, b.name);
                    assert_ne!(a.alias, b.alias);
                }
            }
        }
    }
}
