//! The frame-pointer chain walker.
//!
//! Code compiled with frame pointers keeps a linked list threaded through
//! the stack: each frame starts with the saved base of the caller's frame,
//! and the word right after that link is the return address `call` pushed.
//!
//! ```text
//! ebp ─► ┌─────────────────┐
//!        │ saved caller ebp│ ─► ┌─────────────────┐
//!        │ return address  │    │ saved caller ebp│ ─► ...
//!        │ locals ...      │    │ return address  │
//!        └─────────────────┘    │ locals ...      │
//!                               └─────────────────┘
//! ```
//!
//! Walking is two loads per frame, with every step distrusted: a null link,
//! a null return address, or a base outside the thread's stack means the
//! chain is done (or was never real), and the walk stops with whatever it
//! has collected so far.

use alloc::vec::Vec;
use core::fmt;
use core::mem;
use core::slice;

use crate::frame::Frame;
use crate::symbols::SymbolResolver;


/// Hard ceiling on walked frames, recorded or skipped. A corrupted chain
/// can cycle without ever reaching a null link; no legitimate stack is
/// deeper than this.
pub const MAX_FRAMES: usize = 128;

/// The platform capabilities the walk is written against. The real
/// implementation reads registers and live memory; tests hand the walker
/// fabricated chains.
pub trait StackSource {
    /// Frame-base address the walk starts from.
    fn frame_base(&self) -> usize;

    /// The machine word stored at `addr`.
    fn read_word(&self, addr: usize) -> usize;

    /// Bounds of the thread's stack region, where known.
    fn stack_bounds(&self) -> StackBounds;
}

/// Limits of the thread's stack region, each optional. An unknown bound
/// disables that check rather than failing the walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StackBounds {
    /// High end; a frame base at or above it is out of range.
    pub top: Option<usize>,
    /// Low end; a frame base below it is out of range.
    pub bottom: Option<usize>,
}

impl StackBounds {
    /// Bounds that admit every address.
    pub const fn unknown() -> Self {
        Self {
            top: None,
            bottom: None,
        }
    }

    fn contains(&self, frame_base: usize) -> bool {
        self.top.map_or(true, |top| frame_base < top)
            && self.bottom.map_or(true, |bottom| frame_base >= bottom)
    }
}

/// An eagerly captured snapshot of a thread's call chain, innermost frame
/// first.
///
/// A `StackTrace` never fails to exist: on a hostile or truncated stack it
/// just comes back short, possibly empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackTrace {
    frames: Vec<Frame>,
}

impl StackTrace {
    /// Captures the calling thread's stack by walking its live frame-pointer
    /// chain, resolving symbols through the dynamic linker where the target
    /// has one.
    ///
    /// `frames_to_skip` drops that many frames off the innermost end, so
    /// capture plumbing can keep itself out of its own report. Skipping
    /// more frames than exist yields an empty trace.
    ///
    /// Only the calling thread's stack is inspected; the register and TEB
    /// reads are thread-local, so concurrent captures on different threads
    /// never interfere.
    ///
    /// # Safety
    ///
    /// The caller asserts that the code on this thread's stack keeps frame
    /// pointers (see the crate docs for the build flags). If it does not,
    /// the walk chases garbage values and may read unmapped memory.
    #[cfg(target_arch = "x86")]
    #[inline(never)]
    pub unsafe fn capture(frames_to_skip: usize) -> Self {
        // SAFETY: forwarded to the caller. This function is never inlined,
        // so the snapshot inside it makes the walk start right here.
        let source = unsafe { crate::arch::ThreadStack::current() };

        #[cfg(unix)]
        let resolver = crate::symbols::OsSymbols;
        #[cfg(not(unix))]
        let resolver = crate::symbols::NoSymbols;

        Self::capture_with(&source, &resolver, frames_to_skip)
    }

    /// Walks whatever chain `source` describes. This is the portable entry
    /// point: every rule of the walk (termination, bounds, skipping, the
    /// frame cap) behaves identically to [`StackTrace::capture`], only the
    /// three platform primitives differ.
    pub fn capture_with<S, R>(source: &S, resolver: &R, frames_to_skip: usize) -> Self
    where
        S: StackSource,
        R: SymbolResolver,
    {
        Self {
            frames: walk(source, resolver, frames_to_skip),
        }
    }

    /// The captured frames, innermost first.
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, Frame> {
        self.frames.iter()
    }
}

impl<'a> IntoIterator for &'a StackTrace {
    type Item = &'a Frame;
    type IntoIter = slice::Iter<'a, Frame>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.iter()
    }
}

/// One frame per line, innermost first, each line formatted like
/// [`Frame`]'s `Display`.
impl fmt::Display for StackTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for frame in &self.frames {
            writeln!(f, "{frame}")?;
        }
        Ok(())
    }
}

fn walk<S, R>(source: &S, resolver: &R, frames_to_skip: usize) -> Vec<Frame>
where
    S: StackSource,
    R: SymbolResolver,
{
    let bounds = source.stack_bounds();
    let mut frame_base = source.frame_base();
    let mut frames = Vec::new();
    let mut walked = 0;

    trace!("walk from fp={frame_base:#010x} bounds={bounds:?} skip={frames_to_skip}");

    while walked < MAX_FRAMES {
        if frame_base == 0 || !bounds.contains(frame_base) {
            break;
        }

        // The word right after the saved link is what `call` pushed.
        let Some(return_slot) = frame_base.checked_add(mem::size_of::<usize>()) else {
            break;
        };
        let return_address = source.read_word(return_slot);
        if return_address == 0 {
            break;
        }

        // Follow the link before deciding whether to keep the frame:
        // skipped frames still advance the walk and still face every
        // termination check above.
        frame_base = source.read_word(frame_base);
        walked += 1;

        trace!("walk fp={frame_base:#010x} ra={return_address:#010x}");

        if walked <= frames_to_skip {
            continue;
        }

        let symbol = resolver.resolve(return_address).unwrap_or_default();
        frames.push(Frame::new(frame_base, return_address, symbol));
    }

    debug!("captured {} frames ({walked} walked)", frames.len());

    frames
}
