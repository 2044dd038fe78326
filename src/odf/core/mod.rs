//! Output plumbing shared by every document kind.
//!
//! - [`DocumentHandler`] is the sink serialization drives; [`XmlWriter`]
//!   renders to text and [`ElementCollector`] records into an element tree.
//! - [`Manifest`], [`write_metadata`] and [`write_settings`] produce the
//!   auxiliary package streams.
//! - [`PackageWriter`] zips the streams into an `.odt`/`.ods`/... package.

/// Output handlers
mod handler;
/// Package manifest
mod manifest;
/// Metadata stream content
mod metadata;
/// Settings stream content
mod settings;
/// Zip package writing
#[cfg(feature = "package")]
mod writer;

pub use handler::{DocumentHandler, ElementCollector, XmlWriter};
pub use manifest::{Manifest, ManifestEntry};
pub use metadata::{normalize_date, write_metadata};
pub use settings::write_settings;
#[cfg(feature = "package")]
pub use writer::PackageWriter;
