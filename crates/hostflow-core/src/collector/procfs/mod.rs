//! Counter readers for the Linux `/proc` filesystem.
//!
//! This module provides parsers and readers that turn the `/proc` text
//! sources into typed counter records.

pub mod cpu;
pub mod memory;
pub mod parser;

pub use cpu::CpuReader;
pub use memory::MemoryReader;

use std::path::{Path, PathBuf};

use crate::collector::error::CollectError;
use crate::collector::traits::FileSystem;

/// Reads `<proc_path>/<name>`, returning the resolved path with the content.
fn read_source<F: FileSystem>(
    fs: &F,
    proc_path: &str,
    name: &str,
) -> Result<(PathBuf, String), CollectError> {
    let path = Path::new(proc_path).join(name);
    match fs.read_to_string(&path) {
        Ok(content) => Ok((path, content)),
        Err(e) => Err(CollectError::unavailable(path, e)),
    }
}
