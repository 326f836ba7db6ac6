use dotenv::dotenv;
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::LazyLock;

use crate::common::ARCHIVE_FILE_NAME;

/// Process-wide configuration, read once from the environment
/// (`UPLOAD_FOLDER`, `OUTPUT_FOLDER`).
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Declared for parity with the upload form; the pipeline reads
    /// uploads from the request stream and never writes here.
    #[serde(default = "default_upload_folder")]
    pub upload_folder: PathBuf,
    /// Holds the PNGs of the most recent batch plus the archive.
    #[serde(default = "default_output_folder")]
    pub output_folder: PathBuf,
}

fn default_upload_folder() -> PathBuf {
    PathBuf::from("./uploads")
}

fn default_output_folder() -> PathBuf {
    PathBuf::from("./converted")
}

impl AppConfig {
    pub fn archive_path(&self) -> PathBuf {
        self.output_folder.join(ARCHIVE_FILE_NAME)
    }
}

pub static APP_CONFIG: LazyLock<AppConfig> = LazyLock::new(|| {
    dotenv().ok();
    envy::from_env::<AppConfig>().expect("Failed to load configuration from environment")
});
