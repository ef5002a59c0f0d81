use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::convert::ConvertedFile;
use crate::error::CodeswitchError;

/// Archive name used when no output path is given.
pub const DEFAULT_ARCHIVE_NAME: &str = "converted_sql.zip";

/// Resolve the archive output path from a user-supplied path.
///
/// - `.zip` → accepted as-is
/// - no extension → appends `.zip`
/// - anything else → error (fail fast, before any API call)
pub fn resolve_archive_path(path: &Path) -> Result<PathBuf, CodeswitchError> {
    match path.extension() {
        None => {
            let mut p = path.to_path_buf();
            p.set_extension("zip");
            Ok(p)
        }
        Some(ext) if ext.to_ascii_lowercase() == "zip" => Ok(path.to_path_buf()),
        Some(other) => Err(CodeswitchError::Archive {
            message: format!(
                "unsupported archive extension \".{}\" — only .zip output is supported",
                other.to_string_lossy()
            ),
        }),
    }
}

/// Write the converted files into a deflate-compressed zip archive, one entry
/// per file keyed by its original base name.
pub fn write_archive(files: &[ConvertedFile], path: &Path) -> Result<(), CodeswitchError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        return Err(CodeswitchError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("parent directory does not exist: {}", parent.display()),
        )));
    }

    let out = File::create(path)?;
    let mut writer = ZipWriter::new(out);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for file in files {
        writer
            .start_file(file.name.as_str(), options)
            .map_err(|e| CodeswitchError::Archive {
                message: format!("cannot add {} to archive: {}", file.name, e),
            })?;
        writer.write_all(file.sql.as_bytes())?;
    }

    writer.finish().map_err(|e| CodeswitchError::Archive {
        message: format!("cannot finalize archive: {}", e),
    })?;

    Ok(())
}
