//! Interleaved complex pair.
//!
//! Storage is `{re, im}`, matching spec §3's "interleaved re/im" layout —
//! this is load-bearing for the R2C/C2R Hermitian packing in
//! [`crate::spectral::fft`], which reinterprets buffers of `Complex` as flat
//! `Real` pairs when handing them to a backend.

use super::Real;
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

/// A single complex sample.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[repr(C)]
pub struct Complex {
    /// Real part.
    pub re: Real,
    /// Imaginary part.
    pub im: Real,
}

impl Complex {
    /// The additive identity `0 + 0i`.
    pub const ZERO: Self = Self { re: 0.0, im: 0.0 };
    /// The multiplicative identity `1 + 0i`.
    pub const ONE: Self = Self { re: 1.0, im: 0.0 };

    /// Construct from real and imaginary parts.
    #[must_use]
    #[inline]
    pub const fn new(re: Real, im: Real) -> Self {
        Self { re, im }
    }

    /// A purely real value.
    #[must_use]
    #[inline]
    pub const fn from_real(re: Real) -> Self {
        Self { re, im: 0.0 }
    }

    /// Complex conjugate.
    #[must_use]
    #[inline]
    pub const fn conj(self) -> Self {
        Self { re: self.re, im: -self.im }
    }

    /// Squared magnitude — avoids the `sqrt` in [`Complex::abs`].
    #[must_use]
    #[inline]
    pub fn norm_sqr(self) -> Real {
        self.re * self.re + self.im * self.im
    }

    /// Magnitude (Euclidean norm).
    #[must_use]
    #[inline]
    pub fn abs(self) -> Real {
        self.norm_sqr().sqrt()
    }

    /// Phase angle in radians, `atan2(im, re)`.
    #[must_use]
    #[inline]
    pub fn arg(self) -> Real {
        self.im.atan2(self.re)
    }

    /// `e^(i*theta)`.
    #[must_use]
    #[inline]
    pub fn from_polar(r: Real, theta: Real) -> Self {
        Self { re: r * theta.cos(), im: r * theta.sin() }
    }

    /// Scale both components by a real factor.
    #[must_use]
    #[inline]
    pub fn scale(self, k: Real) -> Self {
        Self { re: self.re * k, im: self.im * k }
    }
}

impl Add for Complex {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self { re: self.re + rhs.re, im: self.im + rhs.im }
    }
}

impl Sub for Complex {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self { re: self.re - rhs.re, im: self.im - rhs.im }
    }
}

impl Neg for Complex {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Self { re: -self.re, im: -self.im }
    }
}

impl Mul for Complex {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Self {
            re: self.re * rhs.re - self.im * rhs.im,
            im: self.re * rhs.im + self.im * rhs.re,
        }
    }
}

impl AddAssign for Complex {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for Complex {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl MulAssign for Complex {
    #[inline]
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}
