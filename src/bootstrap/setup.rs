//! Setup/initialization module - handles application startup tasks
//!
//! Includes:
//! - Logger initialization
//! - Folder structure initialization

use env_logger::Builder;
use log::kv::Key;
use std::io::Write;

use crate::config::APP_CONFIG;

// ────────────────────────────────────────────────────────────────
// Folder Initialization
// ────────────────────────────────────────────────────────────────

/// Create required folder structure for the application
pub fn initialize_folder() {
    std::fs::create_dir_all(&APP_CONFIG.upload_folder).unwrap();
    std::fs::create_dir_all(&APP_CONFIG.output_folder).unwrap();
}

// ────────────────────────────────────────────────────────────────
// Logger Initialization
// ────────────────────────────────────────────────────────────────

/// Initialize the logger with an optional `duration` key-value field.
pub fn initialize_logger() {
    Builder::new()
        .format(|buf, record| {
            let ts = buf.timestamp();

            // Duration attached as a key-value pair, if any
            let dur = record
                .key_values()
                .get(Key::from("duration"))
                .map(|v| format!(" [{}]", v))
                .unwrap_or_default();

            writeln!(
                buf,
                "{} {} {}{} {}",
                ts,
                record.level(),
                record.target(),
                dur,
                record.args()
            )
        })
        // Only show INFO+ globally, WARN+ for Rocket
        .filter(None, log::LevelFilter::Info)
        .filter(Some("rocket"), log::LevelFilter::Warn)
        .init();
}

pub fn initialize() {
    initialize_logger();
    initialize_folder();
}
