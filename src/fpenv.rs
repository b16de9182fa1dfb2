//! Flush-to-zero / denormals-are-zero control (spec §4.B, §5).
//!
//! Enables or queries FTZ/DAZ on the *calling thread only* — these are CPU
//! control-register bits (MXCSR on x86/x86_64, FPCR on AArch64), not process-
//! global state. On architectures without a known control register the
//! functions are a documented no-op and [`get_flush_denormals_mode`] always
//! reports `false`.
//!
//! No corpus exemplar implements this (the teacher is WASM/portable-only and
//! never touches a control register); the bit layouts below follow the
//! public ISA manuals referenced in each function's doc comment.

/// Enable or disable flush-to-zero and denormals-are-zero on the calling
/// thread. Idempotent — calling with the same value twice is a no-op after
/// the first call.
///
/// Returns the previous mode, so callers can restore it:
/// ```
/// # use vv_dsp::fpenv::{set_flush_denormals, get_flush_denormals_mode};
/// let prev = set_flush_denormals(true);
/// assert!(get_flush_denormals_mode());
/// set_flush_denormals(prev);
/// ```
pub fn set_flush_denormals(enabled: bool) -> bool {
    let prev = get_flush_denormals_mode();
    imp::set(enabled);
    prev
}

/// Query whether FTZ/DAZ is currently enabled on the calling thread.
///
/// Always returns `false` on architectures without a supported control
/// register.
#[must_use]
pub fn get_flush_denormals_mode() -> bool {
    imp::get()
}

/// Run `f` with FTZ/DAZ forced to `enabled` for the duration of the call,
/// restoring the previous mode afterwards — even if `f` panics.
pub fn with_flush_denormals<R>(enabled: bool, f: impl FnOnce() -> R) -> R {
    struct Restore(bool);
    impl Drop for Restore {
        fn drop(&mut self) {
            imp::set(self.0);
        }
    }
    let _restore = Restore(get_flush_denormals_mode());
    imp::set(enabled);
    f()
}

#[cfg(target_arch = "x86_64")]
mod imp {
    // MXCSR bit 15 = FTZ, bit 6 = DAZ (SSE2 control/status register).
    const FTZ_BIT: u32 = 1 << 15;
    const DAZ_BIT: u32 = 1 << 6;

    #[inline]
    pub(super) fn set(enabled: bool) {
        unsafe {
            let mut mxcsr: u32;
            std::arch::asm!("stmxcsr [{}]", in(reg) &mut mxcsr, options(nostack));
            if enabled {
                mxcsr |= FTZ_BIT | DAZ_BIT;
            } else {
                mxcsr &= !(FTZ_BIT | DAZ_BIT);
            }
            std::arch::asm!("ldmxcsr [{}]", in(reg) &mxcsr, options(nostack, readonly));
        }
    }

    #[inline]
    pub(super) fn get() -> bool {
        unsafe {
            let mxcsr: u32;
            std::arch::asm!("stmxcsr [{}]", in(reg) &mxcsr, options(nostack));
            (mxcsr & (FTZ_BIT | DAZ_BIT)) == (FTZ_BIT | DAZ_BIT)
        }
    }
}

#[cfg(target_arch = "aarch64")]
mod imp {
    // FPCR bit 24 = FZ (flush-to-zero, covers both FTZ and DAZ on AArch64).
    const FZ_BIT: u64 = 1 << 24;

    #[inline]
    pub(super) fn set(enabled: bool) {
        unsafe {
            let mut fpcr: u64;
            std::arch::asm!("mrs {}, fpcr", out(reg) fpcr, options(nostack));
            if enabled {
                fpcr |= FZ_BIT;
            } else {
                fpcr &= !FZ_BIT;
            }
            std::arch::asm!("msr fpcr, {}", in(reg) fpcr, options(nostack));
        }
    }

    #[inline]
    pub(super) fn get() -> bool {
        unsafe {
            let fpcr: u64;
            std::arch::asm!("mrs {}, fpcr", out(reg) fpcr, options(nostack));
            (fpcr & FZ_BIT) == FZ_BIT
        }
    }
}

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
mod imp {
    #[inline]
    pub(super) fn set(_enabled: bool) {}

    #[inline]
    pub(super) fn get() -> bool {
        false
    }
}
