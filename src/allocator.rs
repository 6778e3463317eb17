//! Global allocator for the `sweetpgp` binary.
//!
//! Messages are processed in memory as a handful of large buffers plus many
//! short-lived block-sized vectors from the cipher modes; mimalloc handles
//! that mix well.

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;
