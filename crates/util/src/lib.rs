//! Utilities shared by the navtree engine, TUI and CLI.

pub mod state_store;

use std::path::PathBuf;

use dirs_next::{config_dir, home_dir};

pub use state_store::{
    InMemoryStateStore, JsonStateStore, STATE_FILE_NAME, STATE_PATH_ENV, StateStore, StateStoreError,
};

/// Directory name used under the platform config directory.
pub const APP_DIR_NAME: &str = "navtree";

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(input: &str) -> PathBuf {
    let trimmed = input.trim();
    if trimmed == "~" {
        return home_dir().unwrap_or_else(|| PathBuf::from("~"));
    }
    if let Some(rest) = trimmed.strip_prefix("~/").or_else(|| trimmed.strip_prefix("~\\")) {
        return home_dir().unwrap_or_else(|| PathBuf::from("~")).join(rest);
    }
    PathBuf::from(trimmed)
}

/// `<config_dir>/navtree/<file_name>`, falling back to the working directory.
pub fn default_app_file(file_name: &str) -> PathBuf {
    config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
        .join(file_name)
}
