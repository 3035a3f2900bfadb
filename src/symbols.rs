//! Turning return addresses into names.
//!
//! Resolution is a collaborator of the walker, not part of it. The walker
//! asks exactly one question per frame, and "no idea" is an answer rather
//! than an error: an unresolved frame still gets captured, it just renders
//! as `?? ()`.

use alloc::string::String;

/// Best-effort lookup of the function containing an address.
pub trait SymbolResolver {
    /// The name of the function containing `addr`, if anything knows it.
    fn resolve(&self, addr: usize) -> Option<String>;
}

/// Resolver for targets with no lookup mechanism, and for callers that only
/// want addresses. Never names anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSymbols;

impl SymbolResolver for NoSymbols {
    fn resolve(&self, _addr: usize) -> Option<String> {
        None
    }
}

/// Resolver backed by the dynamic linker via `dladdr`, demangling what it
/// finds so Rust frames read as paths instead of mangled blobs.
///
/// `dladdr` only sees the dynamic symbol table, so statically linked
/// functions usually come back unnamed. Linking with `-rdynamic` (or
/// `-Clink-args=-Wl,--export-dynamic`) makes most of a binary's own
/// functions visible to it.
#[cfg(unix)]
#[derive(Debug, Default, Clone, Copy)]
pub struct OsSymbols;

#[cfg(unix)]
impl SymbolResolver for OsSymbols {
    fn resolve(&self, addr: usize) -> Option<String> {
        use alloc::string::ToString;
        use core::ffi::CStr;

        // SAFETY: dladdr tolerates arbitrary addresses and only fills `info`
        // on success; dli_sname, when set, points at a NUL-terminated name
        // owned by the loaded object, so it outlives this borrow.
        unsafe {
            let mut info: libc::Dl_info = core::mem::zeroed();

            if libc::dladdr(addr as _, &mut info) == 0 {
                return None;
            }
            if info.dli_sname.is_null() {
                return None;
            }

            let sym_name = CStr::from_ptr(info.dli_sname).to_str().ok()?;
            Some(rustc_demangle::demangle(sym_name).to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_symbols_never_resolves() {
        assert_eq!(NoSymbols.resolve(0x0040_1234), None);
    }

    #[cfg(unix)]
    #[test]
    fn dladdr_survives_arbitrary_addresses() {
        // Null never names anything; a live code address may or may not,
        // depending on how the test binary was linked.
        assert_eq!(OsSymbols.resolve(0), None);
        let _ = OsSymbols.resolve(dladdr_survives_arbitrary_addresses as usize);
    }
}
