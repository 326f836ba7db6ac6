use std::sync::LazyLock;

use rayon::{ThreadPool, ThreadPoolBuilder};

/// Extensions the upload form advertises. The pipeline itself decodes
/// whatever the image crate accepts.
pub const VALID_INPUT_EXTENSIONS: &'static [&'static str] = &["jpg", "jpeg"];

pub const ARCHIVE_FILE_NAME: &'static str = "converted_images.zip";

pub const PNG_EXTENSION: &'static str = ".png";

pub static CURRENT_NUM_THREADS: LazyLock<usize> = LazyLock::new(|| rayon::current_num_threads());

// Rayon thread pool for per-file image conversions.
// Dedicated pool so batch work does not interfere with the request threads.
pub static CONVERT_RAYON_POOL: LazyLock<ThreadPool> = LazyLock::new(|| {
    ThreadPoolBuilder::new()
        .num_threads(*CURRENT_NUM_THREADS)
        .thread_name(|i| format!("convert-worker-{}", i))
        .build()
        .expect("Failed to build conversion Rayon pool")
});
