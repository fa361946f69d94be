//! Completion certificate rendering.
//!
//! Produces a single landscape A4 page with a gold border and centered lines of text.
//! Builtin Helvetica fonts keep the document self-contained.

use chrono::{DateTime, Utc};
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point, Rgb,
};

use crate::server::error::AppError;

const PAGE_WIDTH: f32 = 297.0;
const PAGE_HEIGHT: f32 = 210.0;
const BORDER_INSET: f32 = 7.0;
const ACADEMY_NAME: &str = "KavyaLearn Academy";

/// Average Helvetica glyph width as a fraction of the font size.
const GLYPH_WIDTH_RATIO: f32 = 0.5;
const PT_TO_MM: f32 = 0.3528;

/// Renders a course completion certificate.
///
/// # Arguments
/// - `student_name` - Learner shown on the certificate
/// - `course_title` - Completed course
/// - `issued_at` - Date printed in the footer
///
/// # Returns
/// - `Ok(Vec<u8>)` - PDF bytes
/// - `Err(AppError::InternalError)` - Font loading or serialization failed
pub fn render_certificate(
    student_name: &str,
    course_title: &str,
    issued_at: DateTime<Utc>,
) -> Result<Vec<u8>, AppError> {
    let (doc, page, layer) = PdfDocument::new(
        "Certificate of Completion",
        Mm(PAGE_WIDTH),
        Mm(PAGE_HEIGHT),
        "Certificate",
    );
    let layer = doc.get_page(page).get_layer(layer);

    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(pdf_error)?;
    let oblique = doc
        .add_builtin_font(BuiltinFont::HelveticaOblique)
        .map_err(pdf_error)?;
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(pdf_error)?;

    draw_border(&layer);

    centered(&layer, "Certificate of Completion", 32.0, 165.0, &bold, rgb(0x1B, 0x33, 0x7F));
    centered(
        &layer,
        "This certificate is proudly presented to",
        16.0,
        145.0,
        &oblique,
        rgb(0, 0, 0),
    );
    centered(&layer, student_name, 26.0, 127.0, &bold, rgb(0x1B, 0x33, 0x7F));
    centered(
        &layer,
        "for successfully completing the course",
        16.0,
        108.0,
        &regular,
        rgb(0, 0, 0),
    );
    centered(&layer, course_title, 20.0, 92.0, &bold, rgb(0x3C, 0x3C, 0x3C));
    centered(
        &layer,
        &format!("Date: {}", issued_at.format("%d/%m/%Y")),
        14.0,
        65.0,
        &regular,
        rgb(0x55, 0x55, 0x55),
    );
    centered(&layer, ACADEMY_NAME, 16.0, 50.0, &bold, rgb(0x66, 0x66, 0x66));

    doc.save_to_bytes().map_err(pdf_error)
}

fn draw_border(layer: &PdfLayerReference) {
    let (left, bottom) = (BORDER_INSET, BORDER_INSET);
    let (right, top) = (PAGE_WIDTH - BORDER_INSET, PAGE_HEIGHT - BORDER_INSET);

    layer.set_outline_color(rgb(0xD4, 0xAF, 0x37));
    layer.set_outline_thickness(4.0);
    layer.add_line(Line {
        points: vec![
            (Point::new(Mm(left), Mm(bottom)), false),
            (Point::new(Mm(right), Mm(bottom)), false),
            (Point::new(Mm(right), Mm(top)), false),
            (Point::new(Mm(left), Mm(top)), false),
        ],
        is_closed: true,
    });
}

fn centered(
    layer: &PdfLayerReference,
    text: &str,
    size: f32,
    y: f32,
    font: &IndirectFontRef,
    color: Color,
) {
    let width = text.chars().count() as f32 * size * GLYPH_WIDTH_RATIO * PT_TO_MM;
    let x = ((PAGE_WIDTH - width) / 2.0).max(BORDER_INSET * 2.0);

    layer.set_fill_color(color);
    layer.use_text(text, size, Mm(x), Mm(y), font);
}

fn rgb(r: u8, g: u8, b: u8) -> Color {
    Color::Rgb(Rgb::new(
        r as f32 / 255.0,
        g as f32 / 255.0,
        b as f32 / 255.0,
        None,
    ))
}

fn pdf_error(err: impl std::fmt::Display) -> AppError {
    AppError::InternalError(format!("Failed to render certificate: {}", err))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_a_pdf_document() {
        let bytes = render_certificate("Riya Sharma", "Rust Basics", Utc::now()).unwrap();

        assert!(bytes.starts_with(b"%PDF"));
    }
}
