use alloc::string::String;
use core::fmt;

/// A single captured stack frame: where the frame lives, where execution
/// resumes when it returns, and the best-effort name of the function that
/// return address falls in.
///
/// Frames are immutable once built. The walker creates exactly one per
/// discovered frame and never touches it again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    frame_base: usize,
    return_address: usize,
    symbol: String,
}

impl Frame {
    /// Stores the three fields verbatim. Validation is the walker's
    /// business, not this type's.
    pub fn new(frame_base: usize, return_address: usize, symbol: String) -> Self {
        Self {
            frame_base,
            return_address,
            symbol,
        }
    }

    /// Base address of the frame, as followed through the saved-link chain.
    ///
    /// The outermost captured frame can report `0` here: the walk records a
    /// frame after following its link, and the final link in a well-formed
    /// chain is null.
    pub fn frame_base(&self) -> usize {
        self.frame_base
    }

    /// Address execution resumes at when this frame returns.
    pub fn return_address(&self) -> usize {
        self.return_address
    }

    /// Resolved symbol name, empty when resolution found nothing.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }
}

/// Renders the frame as one classic backtrace line: the return address as
/// eight hex digits, then the symbol, with `??` standing in for a name
/// nothing could resolve.
///
/// ```text
/// 0804f3c2 in handle_signal ()
/// 08051be0 in ?? ()
/// ```
impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.symbol.is_empty() {
            write!(f, "{:08x} in ?? ()", self.return_address)
        } else {
            write!(f, "{:08x} in {} ()", self.return_address, self.symbol)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Frame;

    #[test]
    fn renders_unresolved_symbol_as_question_marks() {
        let frame = Frame::new(0x0012_ff80, 0x0040_1234, String::new());
        assert_eq!(frame.to_string(), "00401234 in ?? ()");
    }

    #[test]
    fn renders_short_address_zero_padded() {
        let frame = Frame::new(0, 0x1, "main".into());
        assert_eq!(frame.to_string(), "00000001 in main ()");
    }

    #[test]
    fn accessors_return_what_was_captured() {
        let frame = Frame::new(0x0012_ff80, 0x0040_1234, "do_work".into());
        assert_eq!(frame.frame_base(), 0x0012_ff80);
        assert_eq!(frame.return_address(), 0x0040_1234);
        assert_eq!(frame.symbol(), "do_work");
    }
}
