//! PDF grid rendering.
//!
//! Layout: a centered title line, a 10 mm gap, then a header row and one row
//! per record as bordered fixed-width cells with centered text. Rows that
//! would cross the bottom margin continue on a new page under a repeated
//! header. The page is widened when the grid does not fit on A4.

use anomaly_watch_core::{ExportConfig, Table};
use printpdf::{
    IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference, Point,
};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{ExportError, Result};

const A4_WIDTH_MM: f32 = 210.0;
const A4_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 10.0;
const PT_TO_MM: f32 = 0.352_778;
const ELLIPSIS: char = '…';

/// A TrueType font loaded fully into memory.
#[derive(Clone)]
pub struct FontResource {
    path: PathBuf,
    bytes: Vec<u8>,
}

impl std::fmt::Debug for FontResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontResource")
            .field("path", &self.path)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

impl FontResource {
    /// Reads and validates the font at `path`.
    ///
    /// # Errors
    /// [`ExportError::FontNotFound`] when the file does not exist,
    /// [`ExportError::FontUnreadable`] on other IO failures, and
    /// [`ExportError::InvalidFont`] when the bytes are not a TrueType font.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                ExportError::FontNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                ExportError::FontUnreadable {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        let font = Self {
            path: path.to_path_buf(),
            bytes,
        };
        font.measure()?;
        Ok(font)
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parses the glyph tables once for repeated width queries.
    ///
    /// # Errors
    /// Returns [`ExportError::InvalidFont`] when the bytes are not a TrueType
    /// font.
    pub fn measure(&self) -> Result<TextMeasure<'_>> {
        let face = ttf_parser::Face::parse(&self.bytes, 0)
            .map_err(|e| ExportError::InvalidFont {
                path: self.path.clone(),
                reason: e.to_string(),
            })?;
        let units_per_em = f32::from(face.units_per_em());
        Ok(TextMeasure { face, units_per_em })
    }
}

/// Glyph advance metrics of a parsed font face.
pub struct TextMeasure<'a> {
    face: ttf_parser::Face<'a>,
    units_per_em: f32,
}

impl TextMeasure<'_> {
    fn char_width_mm(&self, c: char, size_pt: f32) -> f32 {
        // glyphs missing from the font count as half an em
        let units = self
            .face
            .glyph_index(c)
            .and_then(|id| self.face.glyph_hor_advance(id))
            .map_or(self.units_per_em / 2.0, f32::from);
        units / self.units_per_em * size_pt * PT_TO_MM
    }

    /// Rendered width of `text` in millimetres at `size_pt`.
    #[must_use]
    pub fn width_mm(&self, text: &str, size_pt: f32) -> f32 {
        text.chars().map(|c| self.char_width_mm(c, size_pt)).sum()
    }

    /// `text` shortened with an ellipsis so it fits within `max_mm`; empty
    /// when not even the ellipsis fits.
    #[must_use]
    pub fn fit(&self, text: &str, size_pt: f32, max_mm: f32) -> String {
        let widths: Vec<f32> = text.chars().map(|c| self.char_width_mm(c, size_pt)).collect();
        if widths.iter().sum::<f32>() <= max_mm {
            return text.to_string();
        }

        let budget = max_mm - self.char_width_mm(ELLIPSIS, size_pt);
        if budget < 0.0 {
            return String::new();
        }
        let mut fitted = String::new();
        let mut used = 0.0;
        for (c, width) in text.chars().zip(widths) {
            used += width;
            if used > budget {
                break;
            }
            fitted.push(c);
        }
        fitted.push(ELLIPSIS);
        fitted
    }
}

struct Grid<'a> {
    doc: &'a PdfDocumentReference,
    measure: TextMeasure<'a>,
    font_ref: IndirectFontRef,
    config: &'a ExportConfig,
    page_width: f32,
    layer: PdfLayerReference,
    cursor: f32,
}

impl Grid<'_> {
    fn new_page(&mut self) {
        let (page, layer) = self.doc.add_page(Mm(self.page_width), Mm(A4_HEIGHT_MM), "Layer 1");
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.layer.set_outline_thickness(0.2);
        self.cursor = A4_HEIGHT_MM - MARGIN_MM;
    }

    fn centered_text(&self, text: &str, left: f32, width: f32, top: f32, height: f32) {
        let size = self.config.font_size;
        let fitted = self.measure.fit(text, size, width - 2.0);
        let text_width = self.measure.width_mm(&fitted, size);
        let cap_height = size * PT_TO_MM * 0.7;
        let x = left + (width - text_width) / 2.0;
        let y = top - (height + cap_height) / 2.0;
        self.layer.use_text(fitted, size, Mm(x), Mm(y), &self.font_ref);
    }

    fn cell_border(&self, left: f32, width: f32, top: f32, height: f32) {
        let corners = [
            (left, top),
            (left + width, top),
            (left + width, top - height),
            (left, top - height),
        ];
        self.layer.add_line(Line {
            points: corners
                .iter()
                .map(|&(x, y)| (Point::new(Mm(x), Mm(y)), false))
                .collect(),
            is_closed: true,
        });
    }

    fn row(&mut self, cells: &[String]) {
        let height = self.config.row_height_mm;
        if self.cursor - height < MARGIN_MM {
            self.new_page();
        }
        let width = self.config.column_width_mm;
        for (i, text) in cells.iter().enumerate() {
            #[allow(clippy::cast_precision_loss)]
            let left = MARGIN_MM + width * i as f32;
            self.cell_border(left, width, self.cursor, height);
            self.centered_text(text, left, width, self.cursor, height);
        }
        self.cursor -= height;
    }
}

/// Renders `table` as a PDF grid using `font`.
///
/// # Errors
/// Returns [`ExportError::InvalidFont`] if the font cannot be parsed, and
/// [`ExportError::Document`] if it cannot be embedded or the document cannot
/// be serialized.
pub fn render_document(
    table: &Table,
    config: &ExportConfig,
    font: &FontResource,
) -> Result<Vec<u8>> {
    let table = table.to_naive();
    #[allow(clippy::cast_precision_loss)]
    let grid_width = config.column_width_mm * table.columns().len() as f32;
    let page_width = A4_WIDTH_MM.max(grid_width + 2.0 * MARGIN_MM);

    let (doc, page, layer) = PdfDocument::new(
        config.title.as_str(),
        Mm(page_width),
        Mm(A4_HEIGHT_MM),
        "Layer 1",
    );
    let font_ref = doc
        .add_external_font(font.bytes.as_slice())
        .map_err(|e| ExportError::Document(format!("cannot embed font: {e:?}")))?;
    let layer = doc.get_page(page).get_layer(layer);
    layer.set_outline_thickness(0.2);

    let mut grid = Grid {
        doc: &doc,
        measure: font.measure()?,
        font_ref,
        config,
        page_width,
        layer,
        cursor: A4_HEIGHT_MM - MARGIN_MM,
    };

    // title spans the printable width and is followed by a 10 mm gap
    let title_height = config.row_height_mm;
    grid.centered_text(
        &config.title,
        MARGIN_MM,
        page_width - 2.0 * MARGIN_MM,
        grid.cursor,
        title_height,
    );
    grid.cursor -= title_height + 10.0;

    let header: Vec<String> = table.columns().to_vec();
    grid.row(&header);
    for row in table.rows() {
        let cells: Vec<String> = row.iter().map(ToString::to_string).collect();
        if grid.cursor - config.row_height_mm < MARGIN_MM {
            grid.new_page();
            grid.row(&header);
        }
        grid.row(&cells);
    }

    let bytes = doc
        .save_to_bytes()
        .map_err(|e| ExportError::Document(format!("cannot serialize document: {e:?}")))?;
    debug!(rows = table.len(), bytes = bytes.len(), "rendered document");
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SYSTEM_FONTS: [&str; 3] = [
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
    ];

    #[test]
    fn test_missing_font_reports_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("DejaVuSans.ttf");

        let err = FontResource::load(&path).unwrap_err();

        assert!(matches!(&err, ExportError::FontNotFound { path: p } if *p == path));
        assert!(err.is_configuration());
    }

    #[test]
    fn test_non_font_bytes_are_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fake.ttf");
        std::fs::write(&path, b"definitely not a font").unwrap();

        let err = FontResource::load(&path).unwrap_err();
        assert!(matches!(err, ExportError::InvalidFont { .. }));
    }

    #[test]
    fn test_fit_truncates_long_text_with_ellipsis() {
        // Skip when no DejaVu font is installed
        let Some(font) = SYSTEM_FONTS
            .iter()
            .map(Path::new)
            .find_map(|p| FontResource::load(p).ok())
        else {
            return;
        };
        let measure = font.measure().unwrap();

        assert_eq!(measure.fit("ABC", 12.0, 38.0), "ABC");

        let long = "Cảnh báo dòng tiền khối ngoại ".repeat(200);
        let fitted = measure.fit(&long, 12.0, 38.0);
        assert!(fitted.ends_with(ELLIPSIS));
        assert!(fitted.chars().count() > 1);
        assert!(measure.width_mm(&fitted, 12.0) <= 38.0 + 1e-3);
        assert!(long.starts_with(fitted.trim_end_matches(ELLIPSIS)));

        assert_eq!(measure.fit(&long, 12.0, 0.5), "");
    }
}
