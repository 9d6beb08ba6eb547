use std::io::{self, Seek, SeekFrom, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// An uploaded receipt image parked on disk for the OCR engine.
///
/// The file is removed when the value is dropped, whichever way the request ends.
#[derive(Debug)]
pub struct ScratchImage {
    file: NamedTempFile,
}

impl ScratchImage {
    /// Create `<dir>/receipt-XXXXXX.<ext>` holding `data`. `dir` is created if missing.
    pub fn create_in(dir: &Path, ext: &str, data: &[u8]) -> io::Result<Self> {
        std::fs::create_dir_all(dir)?;
        let suffix = format!(".{}", sanitize_ext(ext));
        let mut file = tempfile::Builder::new()
            .prefix("receipt-")
            .suffix(&suffix)
            .tempfile_in(dir)?;
        file.write_all(data)?;
        file.flush()?;
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Replace the stored bytes, e.g. with a normalized rendition.
    pub fn overwrite(&mut self, data: &[u8]) -> io::Result<()> {
        let f = self.file.as_file_mut();
        f.set_len(0)?;
        f.seek(SeekFrom::Start(0))?;
        f.write_all(data)?;
        f.flush()
    }
}

/// Keep extensions short and alphanumeric; anything else becomes `bin`.
fn sanitize_ext(ext: &str) -> String {
    let ext = ext.trim_start_matches('.').to_lowercase();
    if !ext.is_empty() && ext.len() <= 8 && ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        ext
    } else {
        "bin".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_exists_while_held_and_is_removed_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let scratch = ScratchImage::create_in(dir.path(), "png", b"data").unwrap();
        let path = scratch.path().to_path_buf();
        assert!(path.exists());
        assert_eq!(std::fs::read(&path).unwrap(), b"data");
        drop(scratch);
        assert!(!path.exists());
    }

    #[test]
    fn creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("images").join("receipts");
        let scratch = ScratchImage::create_in(&nested, "jpg", b"x").unwrap();
        assert!(scratch.path().starts_with(&nested));
    }

    #[test]
    fn keeps_extension_and_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let scratch = ScratchImage::create_in(dir.path(), ".JPG", b"x").unwrap();
        let name = scratch.path().file_name().unwrap().to_str().unwrap().to_string();
        assert!(name.starts_with("receipt-"));
        assert!(name.ends_with(".jpg"));
    }

    #[test]
    fn overwrite_replaces_contents() {
        let dir = tempfile::tempdir().unwrap();
        let mut scratch = ScratchImage::create_in(dir.path(), "png", b"original bytes").unwrap();
        scratch.overwrite(b"new").unwrap();
        assert_eq!(std::fs::read(scratch.path()).unwrap(), b"new");
    }

    #[test]
    fn sanitize_ext_rejects_path_tricks() {
        assert_eq!(sanitize_ext("png"), "png");
        assert_eq!(sanitize_ext("../../etc"), "bin");
        assert_eq!(sanitize_ext(""), "bin");
        assert_eq!(sanitize_ext("averyveryverylongext"), "bin");
    }
}
