/// Configuration of a document generator.
///
/// # Examples
///
/// ```rust
/// use odfgen::odf::generator::{GeneratorOptions, OutputLayout};
///
/// let options = GeneratorOptions::new()
///     .with_layout(OutputLayout::Flat)
///     .with_generator("my-converter/1.0")
///     .with_default_styles(false);
/// assert_eq!(options.office_version, "1.3");
/// ```
#[derive(Debug, Clone)]
pub struct GeneratorOptions {
    /// How the document (and the sub-documents embedded in it) is laid out
    pub layout: OutputLayout,
    /// Value of `meta:generator`
    pub generator: String,
    /// Value of `office:version`
    pub office_version: String,
    /// Whether text documents carry the built-in named paragraph styles
    pub write_default_styles: bool,
    /// Units of `svg:viewBox` per inch for polylines, polygons and paths
    pub viewbox_units_per_inch: f64,
}

/// Output shape of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputLayout {
    /// One self-contained `office:document`
    Flat,
    /// Separate content, styles, meta, settings and manifest streams
    #[default]
    Package,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            layout: OutputLayout::default(),
            generator: concat!("odfgen/", env!("CARGO_PKG_VERSION")).to_string(),
            office_version: "1.3".to_string(),
            write_default_styles: true,
            viewbox_units_per_inch: 2540.0,
        }
    }
}

impl GeneratorOptions {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the output layout.
    ///
    /// Embedded sub-documents follow the layout of the outer document:
    /// inline `office:document` elements when flat, `Object N` streams
    /// otherwise.
    #[inline]
    pub fn with_layout(mut self, layout: OutputLayout) -> Self {
        self.layout = layout;
        self
    }

    #[inline]
    pub fn with_generator(mut self, generator: impl Into<String>) -> Self {
        self.generator = generator.into();
        self
    }

    #[inline]
    pub fn with_office_version(mut self, version: impl Into<String>) -> Self {
        self.office_version = version.into();
        self
    }

    /// Set whether "Standard", "Text body" and the other built-in paragraph
    /// styles are written, and used as parents of paragraphs in table cells,
    /// headers, footers and notes.
    #[inline]
    pub fn with_default_styles(mut self, write: bool) -> Self {
        self.write_default_styles = write;
        self
    }

    #[inline]
    pub fn with_viewbox_units(mut self, units_per_inch: f64) -> Self {
        self.viewbox_units_per_inch = units_per_inch;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = GeneratorOptions::default();
        assert_eq!(options.layout, OutputLayout::Package);
        assert!(options.generator.starts_with("odfgen/"));
        assert!(options.write_default_styles);
        assert_eq!(options.viewbox_units_per_inch, 2540.0);
    }
}
