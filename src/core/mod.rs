//! Numeric primitives shared across every other module.
//!
//! | Item | Purpose |
//! |------|---------|
//! | [`Real`]    | Library-wide scalar: `f32` by default, `f64` with the `f64` feature |
//! | [`Complex`] | Interleaved `{re, im}` complex pair |
//! | [`DspError`] / [`DspResult`] | Closed error taxonomy for fallible construction |

mod complex;
mod status;

pub use complex::Complex;
pub use status::{DspError, DspResult};

/// The library-wide real scalar.
///
/// Selected at compile time by the `f64` Cargo feature; there is no per-call
/// override, matching the single compile-time switch in spec §6.
#[cfg(not(feature = "f64"))]
pub type Real = f32;

/// The library-wide real scalar (double precision build).
#[cfg(feature = "f64")]
pub type Real = f64;

/// `2 * PI` in the active [`Real`] precision.
#[cfg(not(feature = "f64"))]
pub const TAU: Real = std::f32::consts::TAU;
#[cfg(feature = "f64")]
pub const TAU: Real = std::f64::consts::TAU;

/// `PI` in the active [`Real`] precision.
#[cfg(not(feature = "f64"))]
pub const PI: Real = std::f32::consts::PI;
#[cfg(feature = "f64")]
pub const PI: Real = std::f64::consts::PI;
