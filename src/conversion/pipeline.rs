use anyhow::{Context, Result};
use log::error;
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use std::fs;
use std::path::{Path, PathBuf};

use super::codec::ImageCodec;
use crate::common::{CONVERT_RAYON_POOL, PNG_EXTENSION};

/// One uploaded file, fully read into memory, with its extension already
/// stripped from the name.
#[derive(Debug)]
pub struct InputFile {
    pub stem: String,
    pub bytes: Vec<u8>,
}

/// Per-file result of a batch conversion. Failures are reported to the
/// server log only; the client never sees them.
#[derive(Debug)]
pub enum ConversionOutcome {
    Converted { file_name: String, path: PathBuf },
    Failed { file_name: String, reason: String },
}

/// Remove every entry of the output folder so it reflects exactly one
/// batch at a time.
pub fn clear_output_folder(output_folder: &Path) -> Result<()> {
    for entry in fs::read_dir(output_folder)
        .context(format!("failed to read output folder {:?}", output_folder))?
    {
        let entry = entry?;
        fs::remove_file(entry.path())
            .context(format!("failed to remove {:?}", entry.path()))?;
    }
    Ok(())
}

/// Convert a batch of uploaded files, fanning the per-file work out across
/// the conversion pool and joining before returning. A file that fails to
/// decode or encode is logged and dropped; it never aborts the batch.
pub fn convert_batch(
    codec: &dyn ImageCodec,
    inputs: Vec<InputFile>,
    output_folder: &Path,
) -> Vec<ConversionOutcome> {
    CONVERT_RAYON_POOL.install(|| {
        inputs
            .par_iter()
            .map(|input| convert_one(codec, input, output_folder))
            .collect()
    })
}

fn convert_one(
    codec: &dyn ImageCodec,
    input: &InputFile,
    output_folder: &Path,
) -> ConversionOutcome {
    let file_name = format!("{}{}", input.stem, PNG_EXTENSION);
    let target = output_folder.join(&file_name);
    match try_convert(codec, &input.bytes, &target) {
        Ok(()) => ConversionOutcome::Converted {
            file_name,
            path: target,
        },
        Err(error) => {
            error!("Error converting '{}': {:#}", input.stem, error);
            ConversionOutcome::Failed {
                file_name,
                reason: format!("{:#}", error),
            }
        }
    }
}

fn try_convert(codec: &dyn ImageCodec, bytes: &[u8], target: &Path) -> Result<()> {
    let image = codec.decode(bytes)?;
    // Encode fully in memory first so a failure leaves no partial file.
    let encoded = codec.encode_png(&image)?;
    fs::write(target, encoded).context(format!("failed to write {:?}", target))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversion::codec::ImageCrateCodec;
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([10, 200, 90])));
        let mut buffer = Cursor::new(Vec::new());
        image
            .write_to(&mut buffer, ImageFormat::Jpeg)
            .expect("failed to encode test JPEG");
        buffer.into_inner()
    }

    #[test]
    fn converts_valid_files_and_drops_failures() {
        let dir = tempfile::tempdir().unwrap();
        let inputs = vec![
            InputFile {
                stem: "good".to_string(),
                bytes: jpeg_bytes(4, 4),
            },
            InputFile {
                stem: "broken".to_string(),
                bytes: b"not an image".to_vec(),
            },
        ];

        let outcomes = convert_batch(&ImageCrateCodec, inputs, dir.path());

        assert_eq!(outcomes.len(), 2);
        let converted: Vec<_> = outcomes
            .iter()
            .filter_map(|outcome| match outcome {
                ConversionOutcome::Converted { file_name, path } => {
                    assert!(path.is_file());
                    Some(file_name.as_str())
                }
                ConversionOutcome::Failed { .. } => None,
            })
            .collect();
        assert_eq!(converted, vec!["good.png"]);

        // The failed file left nothing behind
        assert!(!dir.path().join("broken.png").exists());
    }

    #[test]
    fn colliding_stems_produce_a_single_file() {
        let dir = tempfile::tempdir().unwrap();
        let inputs = vec![
            InputFile {
                stem: "a".to_string(),
                bytes: jpeg_bytes(2, 2),
            },
            InputFile {
                stem: "a".to_string(),
                bytes: jpeg_bytes(3, 3),
            },
        ];

        let outcomes = convert_batch(&ImageCrateCodec, inputs, dir.path());

        assert!(outcomes
            .iter()
            .all(|outcome| matches!(outcome, ConversionOutcome::Converted { .. })));
        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn clear_output_folder_removes_every_entry() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("stale.png"), b"old").unwrap();
        fs::write(dir.path().join("stale.zip"), b"old").unwrap();

        clear_output_folder(dir.path()).unwrap();

        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
