//! Byte-level VT sequence writers used on the per-cell hot path.
//!
//! These append to a caller-owned buffer and never allocate once the buffer
//! has capacity.

use crate::types::{Pos, Style, StyleProps};

const CSI: &[u8] = b"\x1b[";

/// `ESC [ row ; col H`
pub fn push_move_to(out: &mut Vec<u8>, pos: Pos) {
    out.extend_from_slice(CSI);
    push_u16(out, pos.row);
    out.push(b';');
    push_u16(out, pos.col);
    out.push(b'H');
}

/// `ESC [ 0 ; <props...> ; <fg> ; <bg> m`
///
/// The leading reset makes the transition independent of whatever the
/// terminal had before.
pub fn push_style(out: &mut Vec<u8>, style: Style) {
    out.extend_from_slice(CSI);
    out.push(b'0');
    for (flag, code) in StyleProps::SGR_CODES {
        if style.props.contains(flag) {
            out.push(b';');
            push_u16(out, code as u16);
        }
    }
    out.push(b';');
    push_u16(out, style.fg.fg_code() as u16);
    out.push(b';');
    push_u16(out, style.bg.bg_code() as u16);
    out.push(b'm');
}

pub fn push_char(out: &mut Vec<u8>, ch: char) {
    let mut utf8 = [0u8; 4];
    out.extend_from_slice(ch.encode_utf8(&mut utf8).as_bytes());
}

fn push_u16(out: &mut Vec<u8>, mut n: u16) {
    let mut digits = [0u8; 5];
    let mut i = digits.len();
    loop {
        i -= 1;
        digits[i] = b'0' + (n % 10) as u8;
        n /= 10;
        if n == 0 {
            break;
        }
    }
    out.extend_from_slice(&digits[i..]);
}
