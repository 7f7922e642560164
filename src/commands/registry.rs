//! # Command Registry
//!
//! Name-to-handler lookup table for slash command dispatch.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.3.0
//!
//! ## Changelog
//! - 1.0.0: Initial implementation for handler dispatch

use std::collections::HashMap;
use std::sync::Arc;

use super::handler::ChatCommandHandler;

/// Lookup table from command names to their handlers.
///
/// A handler claims one or more names through
/// [`ChatCommandHandler::command_names`], and registering it files the same
/// `Arc` under each of them. That lets `/help` and `/cancel` land on a single
/// handler without duplicating anything. Registering a name twice replaces
/// the earlier handler.
#[derive(Clone, Default)]
pub struct CommandRegistry {
    handlers: HashMap<&'static str, Arc<dyn ChatCommandHandler>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// File `handler` under every name it declares.
    pub fn register(&mut self, handler: Arc<dyn ChatCommandHandler>) {
        for name in handler.command_names() {
            self.handlers.insert(name, Arc::clone(&handler));
        }
    }

    /// Look up the handler for `name`, if one is registered.
    pub fn get(&self, name: &str) -> Option<Arc<dyn ChatCommandHandler>> {
        self.handlers.get(name).map(Arc::clone)
    }

    /// Whether `name` is a registered command.
    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Every registered command name, in no particular order.
    pub fn command_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.handlers.keys().copied()
    }
}
