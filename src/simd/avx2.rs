//! AVX2 scan primitives for x86_64.
//!
//! Processes 32 bytes per iteration. AVX2 is available on Intel Haswell
//! (2013+) and AMD Excavator (2015+); the dispatch prefers this tier, and
//! AVX-512 feature masks also land here (every AVX-512 part implements
//! AVX2).

#[cfg(target_arch = "x86_64")]
use core::arch::x86_64::*;

use crate::simd::swar;

/// ASCII byte constants
const DOUBLE_QUOTE: i8 = b'"' as i8;
const BACKSLASH: i8 = b'\\' as i8;

/// Unsigned less-than-or-equal comparison for AVX2.
/// Returns 0xFF for bytes where a <= b (unsigned), 0x00 otherwise.
#[inline]
#[target_feature(enable = "avx2")]
#[cfg(target_arch = "x86_64")]
unsafe fn unsigned_le(a: __m256i, b: __m256i) -> __m256i {
    unsafe {
        let min_ab = _mm256_min_epu8(a, b);
        _mm256_cmpeq_epi8(min_ab, a)
    }
}

/// Bitmask of bytes that end a plain string run: `"`, `\`, or < 0x20.
#[inline]
#[target_feature(enable = "avx2")]
#[cfg(target_arch = "x86_64")]
unsafe fn string_special_mask(chunk: __m256i) -> u32 {
    unsafe {
        let eq_quote = _mm256_cmpeq_epi8(chunk, _mm256_set1_epi8(DOUBLE_QUOTE));
        let eq_backslash = _mm256_cmpeq_epi8(chunk, _mm256_set1_epi8(BACKSLASH));
        let is_control = unsigned_le(chunk, _mm256_set1_epi8(0x1F));
        let special = _mm256_or_si256(_mm256_or_si256(eq_quote, eq_backslash), is_control);
        _mm256_movemask_epi8(special) as u32
    }
}

/// Bitmask of bytes that are one of `{ } [ ] : , "`.
#[inline]
#[target_feature(enable = "avx2")]
#[cfg(target_arch = "x86_64")]
unsafe fn structural_mask(chunk: __m256i) -> u32 {
    unsafe {
        let eq_open_brace = _mm256_cmpeq_epi8(chunk, _mm256_set1_epi8(b'{' as i8));
        let eq_close_brace = _mm256_cmpeq_epi8(chunk, _mm256_set1_epi8(b'}' as i8));
        let eq_open_bracket = _mm256_cmpeq_epi8(chunk, _mm256_set1_epi8(b'[' as i8));
        let eq_close_bracket = _mm256_cmpeq_epi8(chunk, _mm256_set1_epi8(b']' as i8));
        let eq_colon = _mm256_cmpeq_epi8(chunk, _mm256_set1_epi8(b':' as i8));
        let eq_comma = _mm256_cmpeq_epi8(chunk, _mm256_set1_epi8(b',' as i8));
        let eq_quote = _mm256_cmpeq_epi8(chunk, _mm256_set1_epi8(DOUBLE_QUOTE));

        let braces = _mm256_or_si256(eq_open_brace, eq_close_brace);
        let brackets = _mm256_or_si256(eq_open_bracket, eq_close_bracket);
        let delims = _mm256_or_si256(eq_colon, eq_comma);
        let structural = _mm256_or_si256(
            _mm256_or_si256(braces, brackets),
            _mm256_or_si256(delims, eq_quote),
        );
        _mm256_movemask_epi8(structural) as u32
    }
}

/// AVX2 counterpart of [`scalar::scan_string`](super::scalar::scan_string).
///
/// The dispatch only installs this when AVX2 was detected.
#[cfg(target_arch = "x86_64")]
pub fn scan_string(bytes: &[u8]) -> usize {
    unsafe { scan_string_avx2(bytes) }
}

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2")]
unsafe fn scan_string_avx2(bytes: &[u8]) -> usize {
    unsafe {
        let mut offset = 0;
        while offset + 32 <= bytes.len() {
            let chunk = _mm256_loadu_si256(bytes.as_ptr().add(offset) as *const __m256i);
            let mask = string_special_mask(chunk);
            if mask != 0 {
                return offset + mask.trailing_zeros() as usize;
            }
            offset += 32;
        }

        if offset < bytes.len() {
            let remaining = bytes.len() - offset;
            let mut padded = [b' '; 32];
            padded[..remaining].copy_from_slice(&bytes[offset..]);

            let chunk = _mm256_loadu_si256(padded.as_ptr() as *const __m256i);
            let mask = string_special_mask(chunk) & (((1u64 << remaining) - 1) as u32);
            if mask != 0 {
                return offset + mask.trailing_zeros() as usize;
            }
        }

        bytes.len()
    }
}

/// AVX2 counterpart of [`scalar::find_structural`](super::scalar::find_structural).
#[cfg(target_arch = "x86_64")]
pub fn find_structural(bytes: &[u8], mask: &mut u64) -> usize {
    unsafe { find_structural_avx2(bytes, mask) }
}

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2")]
unsafe fn find_structural_avx2(bytes: &[u8], mask: &mut u64) -> usize {
    unsafe {
        let count = bytes.len().min(64);
        let mut m = 0u64;
        let mut offset = 0;

        while offset + 32 <= count {
            let chunk = _mm256_loadu_si256(bytes.as_ptr().add(offset) as *const __m256i);
            m |= u64::from(structural_mask(chunk)) << offset;
            offset += 32;
        }

        if offset < count {
            let remaining = count - offset;
            let mut padded = [b' '; 32];
            padded[..remaining].copy_from_slice(&bytes[offset..count]);

            let chunk = _mm256_loadu_si256(padded.as_ptr() as *const __m256i);
            let tail = structural_mask(chunk) & (((1u64 << remaining) - 1) as u32);
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
