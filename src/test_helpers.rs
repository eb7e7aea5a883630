//! Shared test utilities for the thumbsmith test suite.
//!
//! Provides synthetic image fixtures and small helpers for building and
//! snapshotting directory trees.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! write_tree(tmp.path(), &[("a.txt", "a"), ("sub/b.txt", "b")]);
//! assert_eq!(read_tree(tmp.path()).len(), 3); // a.txt, sub/, sub/b.txt
//! ```

use image::{ImageEncoder, RgbImage};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

// =========================================================================
// Image fixtures
// =========================================================================

fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    })
}

/// Create a small valid JPEG file with the given dimensions.
pub fn create_test_jpeg(path: &Path, width: u32, height: u32) {
    let img = gradient(width, height);
    let file = fs::File::create(path).unwrap();
    let writer = std::io::BufWriter::new(file);
    image::codecs::jpeg::JpegEncoder::new(writer)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
}

// =========================================================================
// Directory trees
// =========================================================================

/// Write `(relative path, contents)` files under `root`, creating parents.
pub fn write_tree(root: &Path, files: &[(&str, &str)]) {
    for (relative, contents) in files {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, contents).unwrap();
    }
}

/// Snapshot a tree as `relative path → contents`. Directories map to `"/"`.
pub fn read_tree(root: &Path) -> BTreeMap<String, String> {
    WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .map(|entry| entry.unwrap())
        .map(|entry| {
            let relative = entry
                .path()
                .strip_prefix(root)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/");
            let contents = if entry.file_type().is_dir() {
                "/".to_string()
            } else {
                fs::read_to_string(entry.path()).unwrap()
            };
            (relative, contents)
        })
        .collect()
}
