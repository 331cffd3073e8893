//! Per-architecture parameters for the stage-one bootstrap
//!
//! Everything the architecture dictates is collected here: the packed
//! `r_info` pattern that marks a RELATIVE relocation, whether the
//! target uses function-descriptor position-independent code, whether
//! the GOT needs a prefix fixup before relocation processing, and the
//! system call numbers used by the diagnostics channel. The entry
//! trampolines themselves live with the loader binary; they are the
//! only other architecture-specific code in the crate.

#[cfg(target_arch = "x86_64")]
mod x86_64;
#[cfg(target_arch = "x86_64")]
pub use x86_64::*;

#[cfg(target_arch = "aarch64")]
mod aarch64;
#[cfg(target_arch = "aarch64")]
pub use aarch64::*;

#[cfg(target_arch = "riscv64")]
mod riscv64;
#[cfg(target_arch = "riscv64")]
pub use riscv64::*;

#[cfg(not(any(
    target_arch = "x86_64",
    target_arch = "aarch64",
    target_arch = "riscv64"
)))]
compile_error!("ld-veloxa: no architecture parameters for this target");

/// Resolve a local function's address with PC-relative addressing only.
///
/// Stage one must not load addresses through the GOT: entries the
/// RELATIVE pass does not touch still hold link-time values when the
/// next stage is called. This is the only sanctioned way to build a
/// function pointer before relocation is known to be complete, and it
/// must not be used anywhere else.
#[cfg(target_arch = "x86_64")]
#[macro_export]
macro_rules! fn_addr_local {
    ($sym:path) => {{
        let addr: usize;
        core::arch::asm!(
            "lea {addr}, [rip + {target}]",
            addr = out(reg) addr,
            target = sym $sym,
            options(nostack, nomem, preserves_flags),
        );
        addr
    }};
}

#[cfg(target_arch = "aarch64")]
#[macro_export]
macro_rules! fn_addr_local {
    ($sym:path) => {{
        let addr: usize;
        core::arch::asm!(
            "adrp {addr}, {target}",
            "add {addr}, {addr}, :lo12:{target}",
            addr = out(reg) addr,
            target = sym $sym,
            options(nostack, nomem, preserves_flags),
        );
        addr
    }};
}

#[cfg(target_arch = "riscv64")]
#[macro_export]
macro_rules! fn_addr_local {
    ($sym:path) => {{
        let addr: usize;
        core::arch::asm!(
            "lla {addr}, {target}",
            addr = out(reg) addr,
            target = sym $sym,
            options(nostack, nomem, preserves_flags),
        );
        addr
    }};
}
