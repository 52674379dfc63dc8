//! Terminal rendering of pairing QR codes.

use qrcode::render::unicode::Dense1x2;
use qrcode::QrCode;

pub use qrcode::types::QrError;

/// Render a QR payload as half-block characters, two modules per line.
pub fn render_qr(payload: &str) -> Result<String, QrError> {
    let code = QrCode::new(payload.as_bytes())?;

    Ok(code
        .render::<Dense1x2>()
        .quiet_zone(true)
        .build())
}

/// Frame a rendered code with scan instructions.
pub fn framed(rendered: &str) -> String {
    let rule = "=".repeat(40);
    format!(
        "\n{rule}\n📱 SCAN QR CODE WITH WHATSAPP\n{rule}\n{rendered}\n{rule}\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_is_square_block() {
        let rendered = render_qr("2@ABCDEF,ghijkl,mnopqr,stuvwx").unwrap();
        let lines: Vec<&str> = rendered.lines().collect();

        assert!(!lines.is_empty());
        let width = lines[0].chars().count();
        assert!(lines.iter().all(|l| l.chars().count() == width));
        // Two modules per character row
        assert!(lines.len() * 2 >= width);
    }

    #[test]
    fn test_render_uses_block_characters() {
        let rendered = render_qr("hello").unwrap();
        assert!(rendered.chars().any(|c| matches!(c, '█' | '▀' | '▄')));
    }

    #[test]
    fn test_oversized_payload_rejected() {
        let payload = "x".repeat(8000);
        assert!(render_qr(&payload).is_err());
    }

    #[test]
    fn test_framed_contains_instructions() {
        let out = framed("QR");
        assert!(out.contains("SCAN QR CODE WITH WHATSAPP"));
        assert!(out.contains("\nQR\n"));
    }
}
