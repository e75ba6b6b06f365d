//! Fixtures for the `preview-gate` smoke benchmarks.

use preview_gate_core::SelectedFile;

/// Builds a synthetic file of `size` bytes with the given declared type.
pub fn synthetic_file(media_type: &str, size: usize) -> SelectedFile {
    let bytes: Vec<u8> = (0..size).map(|index| (index % 251) as u8).collect();
    SelectedFile::new("synthetic", media_type, bytes)
}
