//! The one module allowed to touch registers and raw stack memory.
//!
//! Everything here is 32-bit x86 specific. The walker itself only speaks
//! [`StackSource`] and never sees an `asm!` block.

use core::arch::asm;

use crate::walk::{StackBounds, StackSource};

/// A [`StackSource`] over the calling thread's live stack: the frame
/// pointer and stack bounds are snapshotted at construction, chain reads go
/// straight to memory.
#[derive(Debug, Clone, Copy)]
pub struct ThreadStack {
    frame_base: usize,
    bounds: StackBounds,
}

impl ThreadStack {
    /// Snapshots `ebp` and the thread's stack bounds.
    ///
    /// `#[inline(always)]` so the register read lands in the caller's own
    /// frame: the walk then starts at the caller, not at a helper frame of
    /// unpredictable depth.
    ///
    /// # Safety
    ///
    /// The returned source reads raw stack memory on the walker's behalf.
    /// The caller asserts that the code on this thread's stack keeps frame
    /// pointers; otherwise following the chain may read unmapped memory.
    #[inline(always)]
    pub unsafe fn current() -> Self {
        Self {
            frame_base: frame_base(),
            bounds: stack_bounds(),
        }
    }
}

impl StackSource for ThreadStack {
    fn frame_base(&self) -> usize {
        self.frame_base
    }

    fn read_word(&self, addr: usize) -> usize {
        // SAFETY: the walker only asks for words it pulled out of the live
        // chain, after the null and bounds checks. A corrupted chain can
        // still send this into unmapped memory; that is the documented
        // limitation of frame-pointer walking.
        unsafe { (addr as *const usize).read_volatile() }
    }

    fn stack_bounds(&self) -> StackBounds {
        self.bounds
    }
}

#[inline(always)]
fn frame_base() -> usize {
    let mut out;
    unsafe {
        asm!(
            "mov {out}, ebp",
            out = out(reg) out,
            options(nostack, readonly)
        );
    }
    out
}

/// On windows the thread environment block publishes the stack limits at
/// `fs:[0x04]` (base) and `fs:[0x08]` (limit).
#[cfg(target_os = "windows")]
#[inline(always)]
fn stack_bounds() -> StackBounds {
    let mut top;
    let mut bottom;
    unsafe {
        asm!(
            "mov {top}, dword ptr fs:[0x04]",
            "mov {bottom}, dword ptr fs:[0x08]",
            top = out(reg) top,
            bottom = out(reg) bottom,
            options(nostack, readonly)
        );
    }
    StackBounds {
        top: Some(top),
        bottom: Some(bottom),
    }
}

/// Nothing as convenient as the TEB exists elsewhere, so the walk relies on
/// null termination alone.
#[cfg(not(target_os = "windows"))]
#[inline(always)]
fn stack_bounds() -> StackBounds {
    StackBounds::unknown()
}
