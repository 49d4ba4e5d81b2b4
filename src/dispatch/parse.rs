//! Command prefix and target parsing.

use crate::config::BotConfig;
use regex::Regex;

/// Platform mention markup, `[id123|Display Name]`.
const MENTION_PATTERN: &str = r"^\[id(\d+)\|[^\]]*\]";

/// A message split into command word and arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedCommand<'a> {
    /// Sent under the developer prefix.
    pub privileged: bool,
    pub command: &'a str,
    pub args: &'a str,
}

/// Recognizes commands and their target users.
#[derive(Debug)]
pub struct CommandParser {
    command_prefix: String,
    dev_prefix: String,
    mention: Regex,
}

impl CommandParser {
    pub fn new(bot: &BotConfig) -> Result<Self, regex::Error> {
        Ok(Self {
            command_prefix: bot.command_prefix.clone(),
            dev_prefix: bot.dev_prefix.clone(),
            mention: Regex::new(MENTION_PATTERN)?,
        })
    }

    pub fn command_prefix(&self) -> &str {
        &self.command_prefix
    }

    pub fn dev_prefix(&self) -> &str {
        &self.dev_prefix
    }

    /// Split `text` into a command, or `None` for ordinary chat.
    ///
    /// The longer prefix is tried first so `!!reload` never reads as `!`
    /// followed by `!reload`. The command word must follow the prefix
    /// directly.
    pub fn parse<'a>(&self, text: &'a str) -> Option<ParsedCommand<'a>> {
        let text = text.trim_start();

        let dev = (true, self.dev_prefix.as_str());
        let standard = (false, self.command_prefix.as_str());
        let order = if self.dev_prefix.len() >= self.command_prefix.len() {
            [dev, standard]
        } else {
            [standard, dev]
        };
        let (privileged, rest) = order
            .into_iter()
            .find_map(|(privileged, prefix)| text.strip_prefix(prefix).map(|rest| (privileged, rest)))?;

        if rest.starts_with(char::is_whitespace) {
            return None;
        }
        let (command, args) = match rest.split_once(char::is_whitespace) {
            Some((command, args)) => (command, args.trim()),
            None => (rest, ""),
        };
        if command.is_empty() {
            return None;
        }

        Some(ParsedCommand {
            privileged,
            command,
            args,
        })
    }

    /// Pick the target user of a command and the arguments left after it.
    ///
    /// In order: a leading mention (consumed), the author of the replied-to
    /// message (arguments untouched), a leading numeric id (consumed).
    pub fn split_target<'a>(
        &self,
        args: &'a str,
        reply_from_id: Option<i64>,
    ) -> (Option<i64>, &'a str) {
        let args = args.trim();

        if let Some(caps) = self.mention.captures(args)
            && let Some(id) = caps.get(1).and_then(|m| m.as_str().parse::<i64>().ok())
        {
            return (Some(id), args[caps[0].len()..].trim_start());
        }

        if reply_from_id.is_some() {
            return (reply_from_id, args);
        }

        let (first, rest) = args.split_once(char::is_whitespace).unwrap_or((args, ""));
        match first.parse::<i64>() {
            Ok(id) if id > 0 => (Some(id), rest.trim_start()),
            _ => (None, args),
        }
    }
}
