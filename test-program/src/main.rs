//! Walks its own stack through a small chain of non-inlined calls and
//! prints the result. Build for a 32-bit x86 target, for example:
//!
//! ```text
//! cargo run -p test-program --target i686-unknown-linux-gnu
//! ```

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() {
    let registry = tracing_subscriber::Registry::default().with(
        EnvFilter::builder()
            .with_default_directive(tracing::Level::TRACE.into())
            .from_env()
            .unwrap(),
    );

    let tree_layer = tracing_tree::HierarchicalLayer::new(2)
        .with_targets(true)
        .with_bracketed_fields(true);

    registry.with(tree_layer).init();

    let frames = outer();
    println!("captured {frames} frames");
}

#[inline(never)]
fn outer() -> usize {
    middle()
}

#[inline(never)]
fn middle() -> usize {
    inner()
}

#[cfg(target_arch = "x86")]
#[inline(never)]
fn inner() -> usize {
    // Skip nothing: the first line should be the return into this function.
    let trace = unsafe { x86trace::StackTrace::capture(0) };
    for frame in &trace {
        println!("{frame}");
    }
    trace.len()
}

#[cfg(not(target_arch = "x86"))]
fn inner() -> usize {
    eprintln!("live capture only exists on 32-bit x86; see the crate docs");
    0
}
