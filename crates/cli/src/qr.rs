//! Terminal QR codes for WireGuard configs
//!
//! Mobile WireGuard apps import tunnels by scanning a QR code of the
//! config text. Each output character packs two vertically stacked QR
//! modules into Unicode half blocks, which keeps the code small enough to
//! scan straight off a terminal.

use qrcode::types::{Color, QrError};
use qrcode::QrCode;

const QUIET_ZONE: usize = 1;

/// Render arbitrary text as a scannable terminal QR code
pub fn render_qr(data: &str) -> Result<String, QrError> {
    let code = QrCode::new(data.as_bytes())?;
    Ok(render_half_blocks(&code))
}

fn render_half_blocks(code: &QrCode) -> String {
    let width = code.width();
    let modules = code.to_colors();
    let total = width + 2 * QUIET_ZONE;

    let dark_at = |row: usize, col: usize| {
        let in_code = (QUIET_ZONE..QUIET_ZONE + width).contains(&row)
            && (QUIET_ZONE..QUIET_ZONE + width).contains(&col);
        in_code && modules[(row - QUIET_ZONE) * width + (col - QUIET_ZONE)] == Color::Dark
    };

    let mut out = String::with_capacity((total + 1) * total.div_ceil(2));
    for row in (0..total).step_by(2) {
        for col in 0..total {
            let top = dark_at(row, col);
            let bottom = row + 1 < total && dark_at(row + 1, col);
            out.push(match (top, bottom) {
                (true, true) => '█',
                (true, false) => '▀',
                (false, true) => '▄',
                (false, false) => ' ',
            });
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_render_nonempty() {
        let rendered = render_qr("[Interface]\nPrivateKey=aaaa").unwrap();
        assert!(rendered.contains('\n'));
        assert!(rendered.chars().any(|c| "█▀▄".contains(c)));
    }

    #[test]
    fn test_rows_are_half_height() {
        let code = QrCode::new(b"wgvault").unwrap();
        let rendered = render_half_blocks(&code);

        let total = code.width() + 2 * QUIET_ZONE;
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), total.div_ceil(2));
        assert!(lines.iter().all(|l| l.chars().count() == total));
    }

    #[test]
    fn test_render_is_deterministic() {
        assert_eq!(render_qr("same input"), render_qr("same input"));
    }
}
