//! # Command System
//!
//! Slash command (/) parsing and handling.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.3.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Recognize /command@BotName addressing
//! - 1.0.0: Initial creation with handler trait, context, and registry

pub mod context;
pub mod handler;
pub mod handlers;
pub mod registry;

// Re-export handler infrastructure
pub use context::BotContext;
pub use handler::ChatCommandHandler;
pub use registry::CommandRegistry;

/// Build the registry with every built-in handler registered.
pub fn default_registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new();
    for handler in handlers::create_all_handlers() {
        registry.register(handler);
    }
    registry
}

/// Split a message into a command name and its arguments.
///
/// Returns `None` for plain text, a bare `/`, and commands addressed to a
/// different bot (`/schedule@SomeOtherBot`). Group chats append `@BotName`
/// to disambiguate, so the comparison is case-insensitive per Telegram's
/// username rules.
pub fn parse_command<'a>(text: &'a str, bot_name: &str) -> Option<(&'a str, &'a str)> {
    let rest = text.trim().strip_prefix('/')?;
    let (head, args) = match rest.split_once(char::is_whitespace) {
        Some((head, args)) => (head, args.trim()),
        None => (rest, ""),
    };
    let name = match head.split_once('@') {
        Some((name, target)) if target.eq_ignore_ascii_case(bot_name) => name,
        Some(_) => return None,
        None => head,
    };
    if name.is_empty() {
        return None;
    }
    Some((name, args))
}
