//! PDF rendering for the consolidated shopping list.
//!
//! Fixed A4 layout: a title at the top margin, one numbered line per
//! aggregated ingredient, and a page break with a cursor reset whenever
//! the cursor reaches the bottom margin. Font setup is re-applied on
//! every page since each page gets its own text layer.

use printpdf::{BuiltinFont, Mm, PdfDocument};
use thiserror::Error;

use super::CartLine;

/// Fixed name the PDF is served under.
pub const ATTACHMENT_FILENAME: &str = "yourcart.pdf";

const PAGE_WIDTH: Mm = Mm(210.0);
const PAGE_HEIGHT: Mm = Mm(297.0);
const LEFT_MARGIN: Mm = Mm(20.0);
const TOP_CURSOR: Mm = Mm(277.0);
const BOTTOM_MARGIN: Mm = Mm(20.0);
const LINE_ADVANCE: Mm = Mm(7.0);

#[derive(Error, Debug)]
pub enum ReportError {
    /// No fallback font: report generation is fatal without the built-in
    /// face.
    #[error("failed to register report font: {0}")]
    Font(printpdf::Error),

    #[error("failed to serialize document: {0}")]
    Save(printpdf::Error),
}

/// Render the aggregated shopping list as PDF bytes. An empty list
/// renders a single "list is empty" line instead of a table.
pub fn render_shopping_list(lines: &[CartLine]) -> Result<Vec<u8>, ReportError> {
    let (doc, first_page, first_layer) =
        PdfDocument::new("Shopping list", PAGE_WIDTH, PAGE_HEIGHT, "text");
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(ReportError::Font)?;

    let mut layer = doc.get_page(first_page).get_layer(first_layer);
    let mut cursor = TOP_CURSOR;

    if lines.is_empty() {
        layer.use_text("Shopping list is empty", 20.0, LEFT_MARGIN, cursor, &font);
        return doc.save_to_bytes().map_err(ReportError::Save);
    }

    layer.use_text("Shopping list:", 20.0, LEFT_MARGIN, cursor, &font);

    for (i, line) in lines.iter().enumerate() {
        cursor = cursor - LINE_ADVANCE;
        if cursor < BOTTOM_MARGIN {
            let (page, page_layer) = doc.add_page(PAGE_WIDTH, PAGE_HEIGHT, "text");
            layer = doc.get_page(page).get_layer(page_layer);
            cursor = TOP_CURSOR;
        }
        let text = format!(
            "{}. {} - {} {}",
            i + 1,
            line.name,
            line.total,
            line.measurement_unit
        );
        layer.use_text(text, 16.0, LEFT_MARGIN, cursor, &font);
    }

    doc.save_to_bytes().map_err(ReportError::Save)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(name: &str, total: i64) -> CartLine {
        CartLine {
            name: name.to_string(),
            measurement_unit: "g".to_string(),
            total,
        }
    }

    #[test]
    fn test_empty_list_renders_a_pdf() {
        let bytes = render_shopping_list(&[]).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_single_line_renders_a_pdf() {
        let bytes = render_shopping_list(&[line("Salt", 5)]).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_long_list_spills_onto_further_pages() {
        let lines: Vec<CartLine> = (0..120).map(|i| line(&format!("Item {i}"), i)).collect();
        let many = render_shopping_list(&lines).unwrap();
        let few = render_shopping_list(&lines[..3]).unwrap();
        assert!(many.starts_with(b"%PDF"));
        // More pages means a strictly larger document.
        assert!(many.len() > few.len());
    }
}
