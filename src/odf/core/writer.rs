//! ODF package writing.
//!
//! A package is a zip archive whose first entry is an uncompressed
//! `mimetype` file; every other stream is deflated.

use crate::common::{Error, Result};
use std::io::{Cursor, Seek, Write};
use zip::write::{SimpleFileOptions, ZipWriter};

/// Writes the streams of one ODF package
///
/// # Examples
///
/// ```
/// # use odfgen::odf::core::PackageWriter;
/// # fn example() -> odfgen::Result<()> {
/// let mut writer = PackageWriter::new();
/// writer.set_mimetype("application/vnd.oasis.opendocument.text")?;
/// writer.add_file("content.xml", b"<office:document-content/>")?;
/// let bytes = writer.finish_to_bytes()?;
/// assert!(!bytes.is_empty());
/// # Ok(())
/// # }
/// # example().unwrap();
/// ```
pub struct PackageWriter<W: Write + Seek> {
    zip_writer: ZipWriter<W>,
    has_mimetype: bool,
}

impl PackageWriter<Cursor<Vec<u8>>> {
    /// Create a new package writer that writes to memory
    pub fn new() -> Self {
        Self::with_writer(Cursor::new(Vec::new()))
    }

    /// Finish writing and return the bytes
    pub fn finish_to_bytes(self) -> Result<Vec<u8>> {
        Ok(self.finish()?.into_inner())
    }
}

impl Default for PackageWriter<Cursor<Vec<u8>>> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write + Seek> PackageWriter<W> {
    /// Create a new package writer with a custom writer
    pub fn with_writer(writer: W) -> Self {
        Self {
            zip_writer: ZipWriter::new(writer),
            has_mimetype: false,
        }
    }

    /// Write the `mimetype` entry.
    ///
    /// Must be called once, before any other file.
    pub fn set_mimetype(&mut self, mimetype: &str) -> Result<()> {
        if self.has_mimetype {
            return Err(Error::InvalidState("mimetype already written".to_string()));
        }
        let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
        self.zip_writer.start_file("mimetype", options)?;
        self.zip_writer.write_all(mimetype.as_bytes())?;
        self.has_mimetype = true;
        Ok(())
    }

    /// Add a deflated file to the package
    ///
    /// # Arguments
    ///
    /// * `path` - Path within the archive (e.g. "content.xml", "Object 1/content.xml")
    /// * `content` - File content as bytes
    pub fn add_file(&mut self, path: &str, content: &[u8]) -> Result<()> {
        if !self.has_mimetype {
            return Err(Error::InvalidState(format!(
                "mimetype must be written before {}",
                path
            )));
        }
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
        self.zip_writer.start_file(path, options)?;
        self.zip_writer.write_all(content)?;
        Ok(())
    }

    /// Finish the archive and return the underlying writer
    pub fn finish(self) -> Result<W> {
        if !self.has_mimetype {
            return Err(Error::InvalidState("MIME type not set".to_string()));
        }
        Ok(self.zip_writer.finish()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn test_mimetype_first_and_stored() {
        let mut writer = PackageWriter::new();
        writer.set_mimetype("application/vnd.oasis.opendocument.text").unwrap();
        writer.add_file("content.xml", b"<x/>").unwrap();
        let bytes = writer.finish_to_bytes().unwrap();

        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let first = archive.by_index(0).unwrap();
        assert_eq!(first.name(), "mimetype");
        assert_eq!(first.compression(), zip::CompressionMethod::Stored);
        drop(first);

        let mut content = String::new();
        archive.by_name("content.xml").unwrap().read_to_string(&mut content).unwrap();
        assert_eq!(content, "<x/>");
    }

    #[test]
    fn test_file_before_mimetype_is_rejected() {
        let mut writer = PackageWriter::new();
        assert!(writer.add_file("content.xml", b"").is_err());
        assert!(writer.set_mimetype("a").is_ok());
        assert!(writer.set_mimetype("a").is_err());
    }
}
