//! SSE4.2 scan primitives for x86_64.
//!
//! Processes 16 bytes per iteration. SSE4.2 is available on Intel Nehalem
//! (2008+) and AMD Bulldozer (2011+); the dispatch selects this tier when
//! AVX2 is absent.
//!
//! Tail bytes are copied into a padded buffer before loading, so the
//! primitives never read past the supplied length. The padding byte is a
//! space, which is neither a string terminator nor a structural character;
//! tail masks clip the result anyway.

#[cfg(target_arch = "x86_64")]
use core::arch::x86_64::*;

use crate::simd::swar;

/// ASCII byte constants
const DOUBLE_QUOTE: i8 = b'"' as i8;
const BACKSLASH: i8 = b'\\' as i8;

/// Unsigned less-than-or-equal comparison for SSE2.
/// Returns 0xFF for bytes where a <= b (unsigned), 0x00 otherwise.
#[inline]
#[target_feature(enable = "sse2")]
#[cfg(target_arch = "x86_64")]
unsafe fn unsigned_le(a: __m128i, b: __m128i) -> __m128i {
    unsafe {
        let min_ab = _mm_min_epu8(a, b);
        _mm_cmpeq_epi8(min_ab, a)
    }
}

/// Bitmask of bytes that end a plain string run: `"`, `\`, or < 0x20.
#[inline]
#[target_feature(enable = "sse4.2")]
#[cfg(target_arch = "x86_64")]
unsafe fn string_special_mask(chunk: __m128i) -> u16 {
    unsafe {
        let eq_quote = _mm_cmpeq_epi8(chunk, _mm_set1_epi8(DOUBLE_QUOTE));
        let eq_backslash = _mm_cmpeq_epi8(chunk, _mm_set1_epi8(BACKSLASH));
        let is_control = unsigned_le(chunk, _mm_set1_epi8(0x1F));
        let special = _mm_or_si128(_mm_or_si128(eq_quote, eq_backslash), is_control);
        _mm_movemask_epi8(special) as u16
    }
}

/// Bitmask of bytes that are one of `{ } [ ] : , "`.
#[inline]
#[target_feature(enable = "sse4.2")]
#[cfg(target_arch = "x86_64")]
unsafe fn structural_mask(chunk: __m128i) -> u16 {
    unsafe {
        let eq_open_brace = _mm_cmpeq_epi8(chunk, _mm_set1_epi8(b'{' as i8));
        let eq_close_brace = _mm_cmpeq_epi8(chunk, _mm_set1_epi8(b'}' as i8));
        let eq_open_bracket = _mm_cmpeq_epi8(chunk, _mm_set1_epi8(b'[' as i8));
        let eq_close_bracket = _mm_cmpeq_epi8(chunk, _mm_set1_epi8(b']' as i8));
        let eq_colon = _mm_cmpeq_epi8(chunk, _mm_set1_epi8(b':' as i8));
        let eq_comma = _mm_cmpeq_epi8(chunk, _mm_set1_epi8(b',' as i8));
        let eq_quote = _mm_cmpeq_epi8(chunk, _mm_set1_epi8(DOUBLE_QUOTE));

        let braces = _mm_or_si128(eq_open_brace, eq_close_brace);
        let brackets = _mm_or_si128(eq_open_bracket, eq_close_bracket);
        let delims = _mm_or_si128(eq_colon, eq_comma);
        let structural =
            _mm_or_si128(_mm_or_si128(braces, brackets), _mm_or_si128(delims, eq_quote));
        _mm_movemask_epi8(structural) as u16
    }
}

/// SSE4.2 counterpart of [`scalar::scan_string`](super::scalar::scan_string).
///
/// The dispatch only installs this when SSE4.2 was detected.
#[cfg(target_arch = "x86_64")]
pub fn scan_string(bytes: &[u8]) -> usize {
    unsafe { scan_string_sse42(bytes) }
}

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "sse4.2")]
unsafe fn scan_string_sse42(bytes: &[u8]) -> usize {
    unsafe {
        let mut offset = 0;
        while offset + 16 <= bytes.len() {
            let chunk = _mm_loadu_si128(bytes.as_ptr().add(offset) as *const __m128i);
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

            let chunk = _mm_loadu_si128(padded.as_ptr() as *const __m128i);
            let mask = string_special_mask(chunk) & ((1u32 << remaining) - 1) as u16;
            if mask != 0 {
                return offset + mask.trailing_zeros() as usize;
            }
        }

        bytes.len()
    }
}

/// SSE4.2 counterpart of [`scalar::find_structural`](super::scalar::find_structural).
#[cfg(target_arch = "x86_64")]
pub fn find_structural(bytes: &[u8], mask: &mut u64) -> usize {
    unsafe { find_structural_sse42(bytes, mask) }
}

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "sse4.2")]
unsafe fn find_structural_sse42(bytes: &[u8], mask: &mut u64) -> usize {
    unsafe {
        let count = bytes.len().min(64);
        let mut m = 0u64;
        let mut offset = 0;

        while offset + 16 <= count {
            let chunk = _mm_loadu_si128(bytes.as_ptr().add(offset) as *const __m128i);
            m |= u64::from(structural_mask(chunk)) << offset;
            offset += 16;
        }

        if offset < count {
            let remaining = count - offset;
            let mut padded = [b' '; 16];
            padded[..remaining].copy_from_slice(&bytes[offset..count]);

            let chunk = _mm_loadu_si128(padded.as_ptr() as *const __m128i);
            let tail = structural_mask(chunk) & ((1u32 << remaining) - 1) as u16;
            m |= u64::from(tail) << offset;
        }

        *mask = m;
        count
    }
}

/// Integer lane parse for this tier: the shared SWAR digit fold.
#[cfg(target_arch = "x86_64")]
pub fn parse_int(bytes: &[u8]) -> (i64, usize) {
    swar::parse_int(bytes)
}
