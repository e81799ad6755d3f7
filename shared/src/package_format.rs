//! Package format specification for compiled material packages.
//!
//! `PackageFormat` is the single source of truth for the package file constants
//! (extension, magic bytes, format version).
//!
//! # Example
//!
//! ```
//! use matforge_shared::MATERIAL_PACKAGE_FORMAT;
//!
//! assert_eq!(MATERIAL_PACKAGE_FORMAT.extension, "matpkg");
//! assert_eq!(MATERIAL_PACKAGE_FORMAT.magic, b"MATP");
//! ```

/// Package format specification.
#[derive(Debug, Clone, Copy)]
pub struct PackageFormat {
    /// Package file extension without dot (e.g., "matpkg")
    pub extension: &'static str,

    /// Magic bytes at start of a package file (4 bytes)
    pub magic: &'static [u8; 4],

    /// Format version for backward compatibility
    pub version: u32,
}

impl PackageFormat {
    /// Create a new package format specification.
    pub const fn new(extension: &'static str, magic: &'static [u8; 4], version: u32) -> Self {
        Self {
            extension,
            magic,
            version,
        }
    }
}

/// Material package format specification.
///
/// - Extension: `.matpkg`
/// - Magic bytes: `MATP`
/// - Version: `1`
pub const MATERIAL_PACKAGE_FORMAT: PackageFormat = PackageFormat::new("matpkg", b"MATP", 1);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_format_extension() {
        assert_eq!(MATERIAL_PACKAGE_FORMAT.extension, "matpkg");
    }

    #[test]
    fn test_package_format_magic() {
        assert_eq!(MATERIAL_PACKAGE_FORMAT.magic, b"MATP");
        assert_eq!(MATERIAL_PACKAGE_FORMAT.magic.len(), 4);
    }

    #[test]
    fn test_package_format_version() {
        assert_eq!(MATERIAL_PACKAGE_FORMAT.version, 1);
    }
}
