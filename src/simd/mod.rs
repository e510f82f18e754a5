//! SIMD-accelerated scan primitives and their runtime dispatch.
//!
//! The parser's hot loops go through three primitives — string scanning,
//! structural-character detection, and integer lane parsing — plus a scalar
//! float conversion. Each has a scalar reference implementation and
//! vectorized tiers that must produce identical results on every input:
//!
//! - **x86_64**: AVX2 (32 bytes/iteration) and SSE4.2 (16 bytes/iteration).
//!   AVX-512 feature masks select the AVX2 tier, which their feature set
//!   implies.
//! - **aarch64**: NEON (16 bytes/iteration, mandatory on aarch64). SVE/SVE2
//!   masks select it as well.
//! - Everything else: the scalar reference.
//!
//! The vectorized character classification follows Langdale & Lemire,
//! ["Parsing Gigabytes of JSON per Second"](https://arxiv.org/abs/1902.08318) (2019).
//!
//! Tier selection consumes only an opaque feature bitmask (see
//! [`crate::cpu`]); the chosen table is published once through a
//! [`OnceLock`](std::sync::OnceLock) and stays fixed for the process
//! lifetime. Without the `std` feature there is no runtime detection and
//! the scalar table is used directly.

pub mod scalar;
pub mod swar;

#[cfg(target_arch = "x86_64")]
pub mod avx2;

#[cfg(target_arch = "x86_64")]
pub mod sse42;

#[cfg(target_arch = "aarch64")]
pub mod neon;

#[cfg(any(test, feature = "std"))]
use crate::cpu;

/// Dispatch table of the scan primitives.
///
/// `parse_float` is scalar in every tier; decimal-to-double conversion does
/// not vectorize usefully.
#[derive(Clone, Copy)]
pub struct Ops {
    /// Index of the first `"`, `\`, or byte < 0x20 (input length if none).
    pub scan_string: fn(&[u8]) -> usize,
    /// Bitmask of `{ } [ ] : , "` over up to 64 bytes; returns bytes examined.
    pub find_structural: fn(&[u8], &mut u64) -> usize,
    /// Optionally-signed digit run, at most 19 digits; `(value, consumed)`.
    pub parse_int: fn(&[u8]) -> (i64, usize),
    /// Decimal-to-double over a pre-qualified span; `(value, consumed)`.
    pub parse_float: fn(&[u8]) -> (f64, usize),
}

const SCALAR_OPS: Ops = Ops {
    scan_string: scalar::scan_string,
    find_structural: scalar::find_structural,
    parse_int: scalar::parse_int,
    parse_float: scalar::parse_float,
};

/// Select the highest implementation tier whose required features are all
/// present in `features`.
#[cfg(any(test, feature = "std"))]
pub fn select(features: u32) -> Ops {
    #[cfg(target_arch = "x86_64")]
    {
        let avx512 = cpu::AVX512F | cpu::AVX512BW;
        if features & avx512 == avx512 || features & cpu::AVX2 != 0 {
            return Ops {
                scan_string: avx2::scan_string,
                find_structural: avx2::find_structural,
                parse_int: avx2::parse_int,
                parse_float: scalar::parse_float,
            };
        }
        if features & cpu::SSE42 != 0 {
            return Ops {
                scan_string: sse42::scan_string,
                find_structural: sse42::find_structural,
                parse_int: sse42::parse_int,
                parse_float: scalar::parse_float,
            };
        }
        return SCALAR_OPS;
    }

    #[cfg(target_arch = "aarch64")]
    {
        if features & (cpu::NEON | cpu::SVE | cpu::SVE2) != 0 {
            return Ops {
                scan_string: neon::scan_string,
                find_structural: neon::find_structural,
                parse_int: neon::parse_int,
                parse_float: scalar::parse_float,
            };
        }
        return SCALAR_OPS;
    }

    #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
    {
        let _ = features;
        SCALAR_OPS
    }
}

/// The process-wide dispatch table, initialized from the detected CPU
/// features on first use.
#[cfg(any(test, feature = "std"))]
pub fn ops() -> &'static Ops {
    use std::sync::OnceLock;
    static OPS: OnceLock<Ops> = OnceLock::new();
    OPS.get_or_init(|| select(cpu::detect()))
}

/// Without `std` there is no runtime feature detection; every call uses the
/// scalar reference tier.
#[cfg(not(any(test, feature = "std")))]
pub fn ops() -> &'static Ops {
    &SCALAR_OPS
}
