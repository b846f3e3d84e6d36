//! QR code rendering for short links.

use qrcode::QrCode;
use qrcode::render::svg;
use qrcode::types::QrError;

/// Minimum rendered edge length, in pixels.
pub const QR_SIZE: u32 = 256;

/// Renders `content` as a square SVG QR image of at least [`QR_SIZE`] pixels.
///
/// # Errors
///
/// Returns [`QrError`] if the content does not fit into any QR version.
pub fn render_qr_svg(content: &str) -> Result<Vec<u8>, QrError> {
    let code = QrCode::new(content.as_bytes())?;

    let image = code
        .render::<svg::Color<'_>>()
        .min_dimensions(QR_SIZE, QR_SIZE)
        .dark_color(svg::Color("#000000"))
        .light_color(svg::Color("#ffffff"))
        .build();

    Ok(image.into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renders_svg_document() {
        let bytes = render_qr_svg("https://sho.rt/l/b").unwrap();
        let svg = String::from_utf8(bytes).unwrap();

        assert!(svg.contains("<svg"));
        assert!(svg.contains("#000000"));
    }

    #[test]
    fn test_distinct_content_renders_differently() {
        let a = render_qr_svg("https://sho.rt/l/b").unwrap();
        let b = render_qr_svg("https://sho.rt/l/c").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_oversized_content_fails() {
        let content = "x".repeat(8_000);
        assert!(render_qr_svg(&content).is_err());
    }
}
