//! NEON scan primitives for ARM64.
//!
//! Processes 16 bytes per iteration. NEON is mandatory on aarch64, so this
//! tier is always selected there; SVE/SVE2 feature masks land here as well.

use core::arch::aarch64::*;

use crate::simd::swar;

/// ASCII byte constants
const DOUBLE_QUOTE: u8 = b'"';
const BACKSLASH: u8 = b'\\';

/// Extract a bitmask from the high bit of each byte in a NEON vector.
/// Returns a u16 where bit i is set if byte i has its high bit set.
#[inline]
#[target_feature(enable = "neon")]
unsafe fn neon_movemask(v: uint8x16_t) -> u16 {
    unsafe {
        // Shift each byte right by 7 to get just the high bit
        let high_bits = vshrq_n_u8::<7>(v);

        // Create shift amounts: [0,1,2,3,4,5,6,7, 0,1,2,3,4,5,6,7]
        let shift_amounts: [i8; 16] = [0, 1, 2, 3, 4, 5, 6, 7, 0, 1, 2, 3, 4, 5, 6, 7];
        let shifts = vld1q_s8(shift_amounts.as_ptr());

        // Shift each byte left by its lane index
        let shifted = vshlq_u8(high_bits, shifts);

        // Split into low and high halves
        let low = vget_low_u8(shifted);
        let high = vget_high_u8(shifted);

        // Horizontal add within each half to get a single byte
        let low_sum = vaddv_u8(low) as u16;
        let high_sum = vaddv_u8(high) as u16;

        low_sum | (high_sum << 8)
    }
}

/// Bitmask of bytes that end a plain string run: `"`, `\`, or < 0x20.
#[inline]
#[target_feature(enable = "neon")]
unsafe fn string_special_mask(chunk: uint8x16_t) -> u16 {
    unsafe {
        let eq_quote = vceqq_u8(chunk, vdupq_n_u8(DOUBLE_QUOTE));
        let eq_backslash = vceqq_u8(chunk, vdupq_n_u8(BACKSLASH));
        let is_control = vcltq_u8(chunk, vdupq_n_u8(0x20));
        let special = vorrq_u8(vorrq_u8(eq_quote, eq_backslash), is_control);
        neon_movemask(special)
    }
}

/// Bitmask of bytes that are one of `{ } [ ] : , "`.
#[inline]
#[target_feature(enable = "neon")]
unsafe fn structural_mask(chunk: uint8x16_t) -> u16 {
    unsafe {
        let eq_open_brace = vceqq_u8(chunk, vdupq_n_u8(b'{'));
        let eq_close_brace = vceqq_u8(chunk, vdupq_n_u8(b'}'));
        let eq_open_bracket = vceqq_u8(chunk, vdupq_n_u8(b'['));
        let eq_close_bracket = vceqq_u8(chunk, vdupq_n_u8(b']'));
        let eq_colon = vceqq_u8(chunk, vdupq_n_u8(b':'));
        let eq_comma = vceqq_u8(chunk, vdupq_n_u8(b','));
        let eq_quote = vceqq_u8(chunk, vdupq_n_u8(DOUBLE_QUOTE));

        let braces = vorrq_u8(eq_open_brace, eq_close_brace);
        let brackets = vorrq_u8(eq_open_bracket, eq_close_bracket);
        let delims = vorrq_u8(eq_colon, eq_comma);
        let structural = vorrq_u8(vorrq_u8(braces, brackets), vorrq_u8(delims, eq_quote));
        neon_movemask(structural)
    }
}

/// NEON counterpart of [`scalar::scan_string`](super::scalar::scan_string).
pub fn scan_string(bytes: &[u8]) -> usize {
    unsafe { scan_string_neon(bytes) }
}

#[target_feature(enable = "neon")]
unsafe fn scan_string_neon(bytes: &[u8]) -> usize {
    unsafe {
        let mut offset = 0;
        while offset + 16 <= bytes.len() {
            let chunk = vld1q_u8(bytes.as_ptr().add(offset));
            let mask = string_special_mask(chunk);
            if mask != 0 {
                return offset + mask.trailing_zeros() as usize;
            }
            offset += 16;
        }

        if offset < bytes.len() {
            let remaining = bytes.len() - offset;
            let mut padded = [b' '; 16];
            padded[..remaining].copy_from_slice(&bytes[offset..]);

            let chunk = vld1q_u8(padded.as_ptr());
            let mask = string_special_mask(chunk) & ((1u32 << remaining) - 1) as u16;
            if mask != 0 {
                return offset + mask.trailing_zeros() as usize;
            }
        }

        bytes.len()
    }
}

/// NEON counterpart of [`scalar::find_structural`](super::scalar::find_structural).
pub fn find_structural(bytes: &[u8], mask: &mut u64) -> usize {
    unsafe { find_structural_neon(bytes, mask) }
}

#[target_feature(enable = "neon")]
unsafe fn find_structural_neon(bytes: &[u8], mask: &mut u64) -> usize {
    unsafe {
        let count = bytes.len().min(64);
        let mut m = 0u64;
        let mut offset = 0;

        while offset + 16 <= count {
            let chunk = vld1q_u8(bytes.as_ptr().add(offset));
            m |= u64::from(structural_mask(chunk)) << offset;
            offset += 16;
        }

        if offset < count {
            let remaining = count - offset;
            let mut padded = [b' '; 16];
            padded[..remaining].copy_from_slice(&bytes[offset..count]);

            let chunk = vld1q_u8(padded.as_ptr());
            let tail = structural_mask(chunk) & ((1u32 << remaining) - 1) as u16;
            m |= u64::from(tail) << offset;
        }

        *mask = m;
        count
    }
}

/// Integer lane parse for this tier: the shared SWAR digit fold.
pub fn parse_int(bytes: &[u8]) -> (i64, usize) {
    swar::parse_int(bytes)
}
