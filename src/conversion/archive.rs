use anyhow::{Context, Result};
use log::info;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::common::PNG_EXTENSION;

/// Bundle every PNG in the output folder into a single zip archive,
/// overwriting any previous archive. An output folder with no PNGs still
/// produces a valid (empty) archive.
pub fn write_archive(output_folder: &Path, archive_path: &Path) -> Result<()> {
    let file = File::create(archive_path)
        .context(format!("failed to create archive {:?}", archive_path))?;
    let mut zip = ZipWriter::new(file);

    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);

    for entry in fs::read_dir(output_folder)
        .context(format!("failed to read output folder {:?}", output_folder))?
    {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.ends_with(PNG_EXTENSION) {
            zip.start_file(name.as_str(), options)?;
            let data = fs::read(entry.path())
                .context(format!("failed to read {:?}", entry.path()))?;
            zip.write_all(&data)?;
        }
    }

    zip.finish()?;

    info!("Created archive: {:?}", archive_path);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use zip::ZipArchive;

    #[test]
    fn archive_contains_only_png_entries() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("one.png"), b"png bytes").unwrap();
        fs::write(dir.path().join("two.png"), b"more png bytes").unwrap();
        fs::write(dir.path().join("notes.txt"), b"not an image").unwrap();

        let archive_path = dir.path().join("converted_images.zip");
        write_archive(dir.path(), &archive_path).unwrap();

        let bytes = fs::read(&archive_path).unwrap();
        let archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut names: Vec<_> = archive.file_names().map(str::to_owned).collect();
        names.sort();
        assert_eq!(names, vec!["one.png", "two.png"]);
    }

    #[test]
    fn empty_output_folder_yields_empty_archive() {
        let dir = tempfile::tempdir().unwrap();
        let archive_path = dir.path().join("converted_images.zip");

        write_archive(dir.path(), &archive_path).unwrap();

        let bytes = fs::read(&archive_path).unwrap();
        let archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 0);
    }

    #[test]
    fn rewriting_overwrites_the_previous_archive() {
        let dir = tempfile::tempdir().unwrap();
        let archive_path = dir.path().join("converted_images.zip");

        fs::write(dir.path().join("first.png"), b"first").unwrap();
        write_archive(dir.path(), &archive_path).unwrap();

        fs::remove_file(dir.path().join("first.png")).unwrap();
        fs::write(dir.path().join("second.png"), b"second").unwrap();
        write_archive(dir.path(), &archive_path).unwrap();

        let bytes = fs::read(&archive_path).unwrap();
        let archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let names: Vec<_> = archive.file_names().collect();
        assert_eq!(names, vec!["second.png"]);
    }
}
