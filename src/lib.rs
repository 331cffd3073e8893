//! Veloxa Dynamic Loader / Stage One (ld-veloxa)
//!
//! The stage-one bootstrap of the Veloxa dynamic loader: the code that
//! runs at the loader's own entry point, before the loader can perform
//! any normal dynamic linking. At that point even the loader's own
//! global pointers may still hold link-time values.
//!
//! From the raw stack pointer and the address of its own `.dynamic`
//! section, stage one:
//! 1. Walks the boot stack record to the auxiliary vector
//! 2. Decodes auxv and `.dynamic` into fixed-size tables
//! 3. Determines the load bias (or the per-segment load map on
//!    function-descriptor targets)
//! 4. Applies the loader's own RELATIVE relocations, in place
//! 5. Tail-calls stage two through a PC-relative function address
//!
//! Everything past that call, starting with symbol resolution and
//! library loading, belongs to the later stages. They are the first
//! code allowed to allocate, diagnose errors, or touch the GOT freely.

#![no_std]

pub mod arch;
pub mod constants;
pub mod diag;
pub mod dynv;
pub mod elf;
pub mod reloc;
pub mod segments;
pub mod stack;
pub mod stage;
pub mod syscall;
