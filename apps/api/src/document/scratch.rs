use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use super::extension_of;

/// An uploaded document parked on disk for the decoder.
///
/// The file lives exactly as long as this value: dropping it deletes the
/// file, whichever way the request ends.
#[derive(Debug)]
pub struct ScratchFile {
    file: NamedTempFile,
}

impl ScratchFile {
    /// Writes `bytes` to a fresh temp file that keeps the upload's extension.
    pub fn write(file_name: &str, bytes: &[u8]) -> std::io::Result<Self> {
        let suffix = extension_of(file_name)
            .map(|ext| format!(".{ext}"))
            .unwrap_or_default();

        let mut file = tempfile::Builder::new()
            .prefix("resume-upload-")
            .suffix(&suffix)
            .tempfile()?;
        file.write_all(bytes)?;
        file.flush()?;

        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}
