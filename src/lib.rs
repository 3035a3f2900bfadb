//! Stack capture for 32-bit x86 by walking the frame-pointer chain.
//!
//! When code is compiled with frame pointers, `ebp` heads a linked list
//! threaded through the stack: every frame stores the previous frame base,
//! with the return address in the word beside it. This crate follows that
//! list, needing no unwind tables and no debug info, and materializes the
//! result as an ordered [`StackTrace`] of [`Frame`]s, each rendering as a
//! classic backtrace line:
//!
//! ```text
//! 0804f3c2 in handle_signal ()
//! 08051be0 in ?? ()
//! ```
//!
//! # Capturing
//!
//! [`StackTrace::capture`] walks the calling thread's own stack. It exists
//! only on 32-bit x86 and is `unsafe`: without frame pointers the chain is
//! fiction, so build with `-Cforce-frame-pointers=yes` (this repository's
//! `.cargo/config.toml` sets it for x86 targets). Pass the number of
//! innermost frames to skip so the capture machinery stays out of its own
//! report.
//!
//! [`StackTrace::capture_with`] is the portable entry point: it walks
//! anything implementing [`StackSource`] and names frames through any
//! [`SymbolResolver`], which is also how the tests feed the walker
//! fabricated (and sabotaged) chains.
//!
//! # Limits
//!
//! Frame-pointer walking is best effort. Code compiled without frame
//! pointers, hand-written assembly without a prologue, or a smashed stack
//! ends the trace early; where the platform exposes no stack bounds (only
//! windows does, via the TEB), a corrupted link can send a read into
//! unmapped memory. Every anomaly the walker can detect (null links, null
//! return addresses, out-of-bounds frame bases, chains longer than
//! [`MAX_FRAMES`]) terminates the walk quietly: a short or empty trace is
//! a result, not an error.

#![cfg_attr(not(test), no_std)]

extern crate alloc;

#[macro_use]
extern crate tracing;

#[cfg(target_arch = "x86")]
mod arch;
mod frame;
mod symbols;
mod walk;

#[cfg(target_arch = "x86")]
pub use arch::ThreadStack;
pub use frame::Frame;
#[cfg(unix)]
pub use symbols::OsSymbols;
pub use symbols::{NoSymbols, SymbolResolver};
pub use walk::{StackBounds, StackSource, StackTrace, MAX_FRAMES};
