//! FFT planner and reference backend (spec §4.D).
//!
//! Grounded on `momoto-audio/src/physical/fft.rs`'s shape: precompute
//! twiddle factors and a bit-reversal table once in a long-lived plan, then
//! run `fft`/`ifft` allocation-free against that plan. This module
//! generalizes that single power-of-two-only C2C plan into the spec's three
//! kinds (`C2C`, `R2C`, `C2R`) and adds the naive-DFT fallback, backend
//! vtable, and plan cache the teacher's narrower crate never needed.
//!
//! **Scaling convention (load-bearing, spec §4.D).** Forward transforms are
//! unscaled; backward transforms carry the `1/n` factor. This is the
//! opposite of some FFT libraries' convention (symmetric `1/sqrt(n)` scaling)
//! — callers porting code from such a library must adjust.

use crate::core::{Complex, DspError, DspResult, Real};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Transform kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FftKind {
    /// Complex-to-complex.
    C2C,
    /// Real-to-complex (forward only; produces the Hermitian half-spectrum).
    R2C,
    /// Complex-to-real (backward only; consumes the Hermitian half-spectrum).
    C2R,
}

/// Transform direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Forward,
    Backward,
}

/// Identifies which backend executes a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendId {
    /// Iterative radix-2 Cooley-Tukey (powers of two) falling back to the
    /// naive O(n^2) DFT otherwise — always available.
    Reference,
}

/// Process-wide backend selection (spec §5: "Mutating the backend must be
/// serialized against plan creation and destruction"). New plans are bound
/// to whatever [`get_backend`] returns at the time of [`FftPlan::make_plan`];
/// an existing plan's [`FftPlan::backend`] never changes retroactively.
static GLOBAL_BACKEND: Mutex<BackendId> = Mutex::new(BackendId::Reference);

/// Query whether `id` can be selected in this build.
///
/// This crate carries only the reference backend, so this is always `true`
/// for `BackendId::Reference`; it exists so callers can probe availability
/// before calling [`set_backend`] instead of matching on its error.
#[must_use]
pub fn is_backend_available(id: BackendId) -> bool {
    matches!(id, BackendId::Reference)
}

/// Switch the process-wide default backend used by subsequently created
/// plans. Returns [`DspError::Unsupported`] if `id` is not
/// [`is_backend_available`]; the global selection is left unchanged.
pub fn set_backend(id: BackendId) -> DspResult<()> {
    if !is_backend_available(id) {
        return Err(DspError::Unsupported("backend not available in this build"));
    }
    *GLOBAL_BACKEND.lock().unwrap() = id;
    Ok(())
}

/// Currently selected process-wide default backend.
#[must_use]
pub fn get_backend() -> BackendId {
    *GLOBAL_BACKEND.lock().unwrap()
}

/// An immutable, reusable FFT plan.
///
/// Owns precomputed twiddle factors and (for power-of-two `n`) a
/// bit-reversal permutation table, exactly as `momoto-audio::FftPlan` does
/// for its single supported kind — generalized here across `kind`/`dir`.
pub struct FftPlan {
    n: usize,
    kind: FftKind,
    dir: Direction,
    backend: BackendId,
    twiddles: Box<[Complex]>,
    bit_reversal: Option<Box<[usize]>>,
}

impl FftPlan {
    /// Create a plan for a length-`n` transform of the given `kind`/`dir`.
    ///
    /// `n = 0` → [`DspError::InvalidSize`]. The returned plan may be
    /// executed any number of times via [`FftPlan::execute`].
    pub fn make_plan(n: usize, kind: FftKind, dir: Direction) -> DspResult<Self> {
        if n == 0 {
            return Err(DspError::invalid_size("fft length must be >= 1"));
        }
        let stages = n.trailing_zeros();
        let is_pow2 = n.is_power_of_two();
        let twiddles = make_twiddles(n, dir);
        let bit_reversal = is_pow2.then(|| bit_reversal_table(n, stages));
        Ok(Self { n, kind, dir, backend: get_backend(), twiddles, bit_reversal })
    }

    /// Transform length.
    #[must_use]
    pub fn len(&self) -> usize {
        self.n
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Which backend this plan is bound to (fixed at construction; switching
    /// the global backend selection never retroactively changes an existing
    /// plan — spec §4.D).
    #[must_use]
    pub fn backend(&self) -> BackendId {
        self.backend
    }

    /// Execute the plan. Buffer shapes depend on `kind`:
    /// - `C2C`: `input.len() == output.len() == n`.
    /// - `R2C`: handled by [`r2c`] instead (different element types).
    /// - `C2R`: handled by [`c2r`] instead.
    ///
    /// Panics if `kind != C2C` or buffer lengths mismatch `n` — these are
    /// caller bugs on an already-constructed plan, not recoverable statuses.
    pub fn execute(&self, input: &[Complex], output: &mut [Complex]) {
        assert_eq!(self.kind, FftKind::C2C, "execute() is for C2C plans; use r2c()/c2r()");
        assert_eq!(input.len(), self.n, "input length must equal plan length");
        assert_eq!(output.len(), self.n, "output length must equal plan length");
        output.copy_from_slice(input);
        self.transform_in_place(output);
    }

    /// Core in-place radix-2 DIT (power-of-two `n`) or naive DFT fallback.
    fn transform_in_place(&self, buf: &mut [Complex]) {
        if let Some(rev) = &self.bit_reversal {
            for (i, &j) in rev.iter().enumerate() {
                if i < j {
                    buf.swap(i, j);
                }
            }
            let stages = self.n.trailing_zeros();
            let mut size = 2usize;
            for _stage in 0..stages {
                let half = size / 2;
                let stride = self.n / size;
                for start in (0..self.n).step_by(size) {
                    for k in 0..half {
                        let tw = self.twiddles[k * stride];
                        let a = buf[start + k];
                        let b = buf[start + k + half] * tw;
                        buf[start + k] = a + b;
                        buf[start + k + half] = a - b;
                    }
                }
                size *= 2;
            }
        } else {
            naive_dft_in_place(buf, self.dir);
        }
        if matches!(self.dir, Direction::Backward) {
            let scale = 1.0 / self.n as Real;
            for c in buf.iter_mut() {
                *c = c.scale(scale);
            }
        }
    }
}

fn make_twiddles(n: usize, dir: Direction) -> Box<[Complex]> {
    let sign: Real = match dir {
        Direction::Forward => -1.0,
        Direction::Backward => 1.0,
    };
    (0..n.max(1))
        .map(|k| {
            let theta = sign * crate::core::TAU * k as Real / n as Real;
            Complex::new(theta.cos(), theta.sin())
        })
        .collect()
}

fn bit_reversal_table(n: usize, stages: u32) -> Box<[usize]> {
    (0..n)
        .map(|i| {
            let mut x = i;
            let mut r = 0usize;
            for _ in 0..stages {
                r = (r << 1) | (x & 1);
                x >>= 1;
            }
            r
        })
        .collect()
}

fn naive_dft_in_place(buf: &mut [Complex], dir: Direction) {
    let n = buf.len();
    let sign: Real = match dir {
        Direction::Forward => -1.0,
        Direction::Backward => 1.0,
    };
    let input: Vec<Complex> = buf.to_vec();
    for (k, out) in buf.iter_mut().enumerate() {
        let mut acc = Complex::ZERO;
        for (t, &x) in input.iter().enumerate() {
            let theta = sign * crate::core::TAU * (k * t) as Real / n as Real;
            acc += x * Complex::new(theta.cos(), theta.sin());
        }
        *out = acc;
    }
}

/// Forward real-to-complex transform. `input.len() == n`, `output.len() ==
/// n/2 + 1` (Hermitian-packed, bin 0 = DC, last bin = Nyquist for even `n`).
pub fn r2c(plan: &FftPlan, input: &[Real], output: &mut [Complex]) {
    assert_eq!(plan.kind, FftKind::R2C, "r2c() requires an R2C plan");
    assert_eq!(input.len(), plan.n, "input length must equal plan length");
    assert_eq!(output.len(), plan.n / 2 + 1, "output length must be n/2 + 1");
    let mut full: Vec<Complex> = input.iter().map(|&x| Complex::from_real(x)).collect();
    plan.transform_in_place(&mut full);
    output.copy_from_slice(&full[..plan.n / 2 + 1]);
}

/// Backward complex-to-real transform. `input.len() == n/2 + 1`,
/// `output.len() == n`. Imaginary remainder after reconstruction is
/// discarded per spec §4.D.
pub fn c2r(plan: &FftPlan, input: &[Complex], output: &mut [Real]) {
    assert_eq!(plan.kind, FftKind::C2R, "c2r() requires a C2R plan");
    assert_eq!(input.len(), plan.n / 2 + 1, "input length must be n/2 + 1");
    assert_eq!(output.len(), plan.n, "output length must equal plan length");
    let n = plan.n;
    let mut full = vec![Complex::ZERO; n];
    full[..input.len()].copy_from_slice(input);
    for k in (n / 2 + 1)..n {
        full[k] = full[n - k].conj();
    }
    plan.transform_in_place(&mut full);
    for (o, c) in output.iter_mut().zip(full.iter()) {
        *o = c.re;
    }
}

/// Convenience allocating wrapper around [`FftPlan::execute`] for one-shot
/// use; prefer building a plan once and reusing it on a hot path.
pub fn fft(input: &[Complex]) -> DspResult<Vec<Complex>> {
    let plan = FftPlan::make_plan(input.len(), FftKind::C2C, Direction::Forward)?;
    let mut out = vec![Complex::ZERO; input.len()];
    plan.execute(input, &mut out);
    Ok(out)
}

/// Convenience allocating wrapper for a one-shot inverse C2C transform.
pub fn ifft(input: &[Complex]) -> DspResult<Vec<Complex>> {
    let plan = FftPlan::make_plan(input.len(), FftKind::C2C, Direction::Backward)?;
    let mut out = vec![Complex::ZERO; input.len()];
    plan.execute(input, &mut out);
    Ok(out)
}

/// A bounded LRU cache of plans keyed by `(n, kind, dir)`, for callers who
/// repeatedly request transforms of the same shape without holding the plan
/// themselves. Entries are reference-counted via `Arc`; eviction only drops
/// the cache's own handle, never a plan still held by a caller.
pub struct PlanCache {
    capacity: usize,
    order: Mutex<Vec<(usize, FftKind, Direction)>>,
    entries: Mutex<HashMap<(usize, FftKind, Direction), Arc<FftPlan>>>,
}

impl PlanCache {
    /// Create an empty cache holding at most `capacity` plans.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self { capacity: capacity.max(1), order: Mutex::new(Vec::new()), entries: Mutex::new(HashMap::new()) }
    }

    /// Fetch a cached plan for `(n, kind, dir)`, building and inserting one
    /// if absent, evicting the least-recently-used entry if at capacity.
    pub fn get_or_make(&self, n: usize, kind: FftKind, dir: Direction) -> DspResult<Arc<FftPlan>> {
        let key = (n, kind, dir);
        {
            let mut entries = self.entries.lock().unwrap();
            if let Some(plan) = entries.get(&key).cloned() {
                drop(entries);
                self.touch(key);
                return Ok(plan);
            }
            let plan = Arc::new(FftPlan::make_plan(n, kind, dir)?);
            if entries.len() >= self.capacity {
                let mut order = self.order.lock().unwrap();
                if let Some(lru_key) = order.first().copied() {
                    entries.remove(&lru_key);
                    order.remove(0);
                }
            }
            entries.insert(key, plan.clone());
            drop(entries);
            self.order.lock().unwrap().push(key);
            Ok(plan)
        }
    }

    fn touch(&self, key: (usize, FftKind, Direction)) {
        let mut order = self.order.lock().unwrap();
        if let Some(pos) = order.iter().position(|k| *k == key) {
            let k = order.remove(pos);
            order.push(k);
        }
    }

    /// Drop every cached plan. Plans still referenced by callers remain
    /// valid (the `Arc` keeps them alive); only the cache's handle is freed.
    pub fn flush(&self) {
        self.entries.lock().unwrap().clear();
        self.order.lock().unwrap().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: &[Complex], b: &[Complex], eps: Real) {
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(b.iter()) {
            assert!((x.re - y.re).abs() < eps, "{} vs {}", x.re, y.re);
            assert!((x.im - y.im).abs() < eps, "{} vs {}", x.im, y.im);
        }
    }

    #[test]
    fn zero_length_is_invalid_size() {
        assert!(FftPlan::make_plan(0, FftKind::C2C, Direction::Forward).is_err());
    }

    #[test]
    fn impulse_forward_is_flat_ones() {
        let n = 16;
        let mut x = vec![Complex::ZERO; n];
        x[0] = Complex::ONE;
        let y = fft(&x).unwrap();
        for c in y {
            assert!((c.re - 1.0).abs() < 1e-5);
            assert!(c.im.abs() < 1e-5);
        }
    }

    #[test]
    fn roundtrip_power_of_two() {
        let n = 64;
        let x: Vec<Complex> = (0..n)
            .map(|i| Complex::new((i as Real * 0.3).sin(), 0.0))
            .collect();
        let y = fft(&x).unwrap();
        let z = ifft(&y).unwrap();
        approx_eq(&x, &z, 1e-4);
    }

    #[test]
    fn roundtrip_non_power_of_two_naive_dft() {
        let n = 17;
        let x: Vec<Complex> = (0..n).map(|i| Complex::new(i as Real, 0.0)).collect();
        let y = fft(&x).unwrap();
        let z = ifft(&y).unwrap();
        approx_eq(&x, &z, 1e-3);
    }

    #[test]
    fn r2c_c2r_roundtrip() {
        let n = 32;
        let x: Vec<Real> = (0..n).map(|i| (i as Real * 0.2).cos()).collect();
        let fwd = FftPlan::make_plan(n, FftKind::R2C, Direction::Forward).unwrap();
        let mut spec = vec![Complex::ZERO; n / 2 + 1];
        r2c(&fwd, &x, &mut spec);
        let bwd = FftPlan::make_plan(n, FftKind::C2R, Direction::Backward).unwrap();
        let mut y = vec![0.0; n];
        c2r(&bwd, &spec, &mut y);
        for (a, b) in x.iter().zip(y.iter()) {
            assert!((a - b).abs() < 1e-4);
        }
    }

    #[test]
    fn backward_scales_by_one_over_n() {
        let n = 8;
        let mut x = vec![Complex::ZERO; n];
        x[0] = Complex::new(n as Real, 0.0);
        let fwd = FftPlan::make_plan(n, FftKind::C2C, Direction::Forward).unwrap();
        let mut spec = vec![Complex::ZERO; n];
        fwd.execute(&x, &mut spec);
        let bwd = FftPlan::make_plan(n, FftKind::C2C, Direction::Backward).unwrap();
        let mut back = vec![Complex::ZERO; n];
        bwd.execute(&spec, &mut back);
        assert!((back[0].re - n as Real).abs() < 1e-4);
    }

    #[test]
    #[should_panic]
    fn execute_rejects_wrong_length() {
        let plan = FftPlan::make_plan(8, FftKind::C2C, Direction::Forward).unwrap();
        let input = vec![Complex::ZERO; 4];
        let mut output = vec![Complex::ZERO; 4];
        plan.execute(&input, &mut output);
    }

    #[test]
    fn reference_backend_is_always_available() {
        assert!(is_backend_available(BackendId::Reference));
    }

    #[test]
    fn set_backend_reference_succeeds_and_round_trips() {
        set_backend(BackendId::Reference).unwrap();
        assert_eq!(get_backend(), BackendId::Reference);
        let plan = FftPlan::make_plan(8, FftKind::C2C, Direction::Forward).unwrap();
        assert_eq!(plan.backend(), BackendId::Reference);
    }

    #[test]
    fn plan_cache_reuses_and_evicts() {
        let cache = PlanCache::new(1);
        let a = cache.get_or_make(16, FftKind::C2C, Direction::Forward).unwrap();
        let b = cache.get_or_make(16, FftKind::C2C, Direction::Forward).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        let _c = cache.get_or_make(32, FftKind::C2C, Direction::Forward).unwrap();
        cache.flush();
    }
}
