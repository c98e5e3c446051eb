//! Source identity extraction.
//!
//! This module turns the raw bytes of a recovered file into an [`Extracted`]
//! value: the declared package, the best guess at the principal type and the
//! decoded text.
//!
//! ## Algorithm Overview
//!
//! 1. Decode the bytes with the first encoding in the configured order that
//!    accepts the whole input
//! 2. Find the first line shaped like `package a.b.c;`; without one the file
//!    is not recognizable and is skipped
//! 3. Scan for a public class, interface or enum, in that order
//! 4. Failing that, scan for a non-public class, interface or enum
//!
//! Each pattern is a full scan of the text and the first pattern that
//! matches anywhere wins. A file with several top-level types may therefore
//! be named after a type that is not the first one declared.

mod encoding;

use crate::error::{Error, Result};
use regex::Regex;
use std::fmt;
use std::path::Path;
use std::sync::LazyLock;
use tracing::{debug, trace};

pub use encoding::{decode_first, TextEncoding};

/// Package declaration: dotted name of letters, digits and dots only.
/// A leading byte order mark counts as whitespace on the first line.
///
/// All patterns run in CRLF mode: `\r`, `\n` and `\r\n` each end a line, so
/// files saved with classic Mac line endings are matched line by line too.
static PACKAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?mR)^[\s\x{FEFF}]*package\s+([a-zA-Z0-9.]+)\s*;\s*$")
        .expect("valid package regex")
});

/// Ordered type declaration patterns, public tier first
static TYPE_PATTERNS: LazyLock<Vec<TypePattern>> = LazyLock::new(|| {
    use TypeKind::{Class, Enum, Interface};
    use Visibility::{NonPublic, Public};

    vec![
        TypePattern::new(
            Public,
            Class,
            r"(?mR)^\s*public\s+(?:(?:abstract|final)\s+)?class\s+([a-zA-Z0-9.]+)",
        ),
        TypePattern::new(
            Public,
            Interface,
            r"(?mR)^\s*public\s+interface\s+([a-zA-Z0-9.]+)",
        ),
        TypePattern::new(
            Public,
            Enum,
            r"(?mR)^\s*public\s+enum\s+([a-zA-Z0-9.]+)",
        ),
        TypePattern::new(
            NonPublic,
            Class,
            r"(?mR)^\s*(?:(?:abstract|final)\s+)?class\s+([a-zA-Z0-9.]+)",
        ),
        TypePattern::new(NonPublic, Interface, r"(?mR)^\s*interface\s+([a-zA-Z0-9.]+)"),
        TypePattern::new(NonPublic, Enum, r"(?mR)^\s*enum\s+([a-zA-Z0-9.]+)"),
    ]
});

/// Kind of a top-level type declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    /// `class`, optionally `abstract` or `final`
    Class,
    /// `interface`
    Interface,
    /// `enum`
    Enum,
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Class => "class",
            Self::Interface => "interface",
            Self::Enum => "enum",
        })
    }
}

/// Which detection tier produced a type name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Declared `public`
    Public,
    /// Declared without a visibility qualifier
    NonPublic,
}

struct TypePattern {
    visibility: Visibility,
    kind: TypeKind,
    regex: Regex,
}

impl TypePattern {
    fn new(visibility: Visibility, kind: TypeKind, pattern: &str) -> Self {
        Self {
            visibility,
            kind,
            regex: Regex::new(pattern).expect("valid type declaration regex"),
        }
    }
}

/// A type declaration found in the source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredType {
    /// Declared name
    pub name: String,
    /// Declaration keyword
    pub kind: TypeKind,
}

/// Best guess at the type a file is named after
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrincipalType {
    /// Matched by the public tier
    Public(DeclaredType),
    /// Matched only by the non-public fallback tier
    NonPublic(DeclaredType),
    /// No declaration matched
    Unknown,
}

impl PrincipalType {
    /// Returns the detected type name, if any
    pub fn name(&self) -> Option<&str> {
        self.declared().map(|d| d.name.as_str())
    }

    /// Returns the tier that matched, if any
    pub fn visibility(&self) -> Option<Visibility> {
        match self {
            Self::Public(_) => Some(Visibility::Public),
            Self::NonPublic(_) => Some(Visibility::NonPublic),
            Self::Unknown => None,
        }
    }

    fn declared(&self) -> Option<&DeclaredType> {
        match self {
            Self::Public(d) | Self::NonPublic(d) => Some(d),
            Self::Unknown => None,
        }
    }
}

/// Identity extracted from a file with a package declaration
#[derive(Debug, Clone)]
pub struct Extracted {
    /// Declared package, e.g. `com.example.app`
    pub package: String,
    /// Principal type guess
    pub principal: PrincipalType,
    /// Decoded file content
    pub content: String,
    /// Encoding that decoded the content
    pub encoding: TextEncoding,
}

/// Configuration for the extractor
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// Encodings to try, in order of preference
    pub encodings: Vec<TextEncoding>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            encodings: TextEncoding::DEFAULT_ORDER.to_vec(),
        }
    }
}

impl ExtractorConfig {
    /// Creates a new extractor config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the encoding preference order
    pub fn encodings(mut self, encodings: impl IntoIterator<Item = TextEncoding>) -> Self {
        self.encodings = encodings.into_iter().collect();
        self
    }
}

/// Decodes recovered files and classifies them by package and type
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    config: ExtractorConfig,
}

impl Extractor {
    /// Creates a new extractor with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new extractor with custom configuration
    pub fn with_config(config: ExtractorConfig) -> Self {
        Self { config }
    }

    /// Reads and classifies the file at `path`.
    ///
    /// Returns `Ok(None)` when the file has no package declaration.
    pub fn extract(&self, path: &Path) -> Result<Option<Extracted>> {
        let bytes = std::fs::read(path).map_err(|e| Error::file_read(path, e))?;
        trace!("Read {} bytes from {}", bytes.len(), path.display());
        self.extract_bytes(path, &bytes)
    }

    /// Classifies already-read bytes. `path` is only used for errors and
    /// diagnostics.
    pub fn extract_bytes(&self, path: &Path, bytes: &[u8]) -> Result<Option<Extracted>> {
        let (content, encoding) = decode_first(bytes, &self.config.encodings)
            .ok_or_else(|| Error::undecodable(path, &self.config.encodings))?;
        trace!("Decoded {} as {}", path.display(), encoding);

        let Some(package) = find_package(&content) else {
            debug!("No package declaration in {}, skipping", path.display());
            return Ok(None);
        };
        debug!("Found package {}", package);
        let package = package.to_string();

        let principal = find_principal_type(&content);
        match &principal {
            PrincipalType::Public(d) => debug!("Public item: {} {}", d.kind, d.name),
            PrincipalType::NonPublic(d) => debug!("Non-public item: {} {}", d.kind, d.name),
            PrincipalType::Unknown => debug!("No type declaration in {}", path.display()),
        }

        Ok(Some(Extracted {
            package,
            principal,
            content,
            encoding,
        }))
    }
}

/// Returns the package named by the first package declaration line
pub fn find_package(text: &str) -> Option<&str> {
    PACKAGE_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Finds the principal type, preferring public declarations
pub fn find_principal_type(text: &str) -> PrincipalType {
    for pattern in TYPE_PATTERNS.iter() {
        let Some(name) = pattern.regex.captures(text).and_then(|caps| caps.get(1)) else {
            continue;
        };
        let declared = DeclaredType {
            name: name.as_str().to_string(),
            kind: pattern.kind,
        };
        return match pattern.visibility {
            Visibility::Public => PrincipalType::Public(declared),
            Visibility::NonPublic => PrincipalType::NonPublic(declared),
        };
    }
    PrincipalType::Unknown
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn public(name: &str, kind: TypeKind) -> PrincipalType {
        PrincipalType::Public(DeclaredType {
            name: name.to_string(),
            kind,
        })
    }

    fn non_public(name: &str, kind: TypeKind) -> PrincipalType {
        PrincipalType::NonPublic(DeclaredType {
            name: name.to_string(),
            kind,
        })
    }

    #[test]
    fn test_find_package() {
        assert_eq!(find_package("package com.example.app;\n"), Some("com.example.app"));
        assert_eq!(find_package("  package  a.b ;  \r\nclass X {}"), Some("a.b"));
        assert_eq!(find_package("// header\n\npackage x;"), Some("x"));
        assert_eq!(find_package("\u{feff}package bom.first;\n"), Some("bom.first"));
    }

    #[test]
    fn test_find_package_with_carriage_return_line_endings() {
        let text = "// header\rpackage com.example;\rpublic class Foo {}\r";
        assert_eq!(find_package(text), Some("com.example"));
        assert_eq!(find_package("package a;\r\nclass B {}\r\n"), Some("a"));
        // a lone CR still ends the statement's line, trailing text does not
        assert_eq!(find_package("package a.b; x\rclass B {}"), None);
    }

    #[test]
    fn test_principal_with_carriage_return_line_endings() {
        assert_eq!(
            find_principal_type("package a;\rpublic class Foo {}\r"),
            public("Foo", TypeKind::Class)
        );
        assert_eq!(
            find_principal_type("package a;\r// note\r  enum Mode { A }\r"),
            non_public("Mode", TypeKind::Enum)
        );
    }

    #[test]
    fn test_find_package_takes_first_match() {
        let text = "package first.one;\npackage second.one;\n";
        assert_eq!(find_package(text), Some("first.one"));
    }

    #[test]
    fn test_find_package_rejects_other_shapes() {
        assert_eq!(find_package(""), None);
        assert_eq!(find_package("import java.util.List;"), None);
        // underscores are outside the detector's alphabet
        assert_eq!(find_package("package my_pkg;"), None);
        // trailing content after the terminator
        assert_eq!(find_package("package a.b; // comment"), None);
        assert_eq!(find_package("package a.b"), None);
        assert_eq!(find_package("// package a.b;"), None);
    }

    #[test]
    fn test_principal_prefers_public() {
        let text = "class Helper {}\npublic class Foo {}\n";
        assert_eq!(find_principal_type(text), public("Foo", TypeKind::Class));
    }

    #[test]
    fn test_principal_pattern_order_beats_position() {
        // a public class anywhere beats an earlier public interface
        let text = "public interface Api {}\npublic class Impl implements Api {}\n";
        assert_eq!(find_principal_type(text), public("Impl", TypeKind::Class));

        let text = "public enum Color { RED }\npublic interface Paint {}\n";
        assert_eq!(find_principal_type(text), public("Paint", TypeKind::Interface));
    }

    #[test]
    fn test_principal_class_modifiers() {
        assert_eq!(
            find_principal_type("public abstract class Base {}"),
            public("Base", TypeKind::Class)
        );
        assert_eq!(
            find_principal_type("public final class Util {}"),
            public("Util", TypeKind::Class)
        );
        assert_eq!(
            find_principal_type("abstract class Shape {}"),
            non_public("Shape", TypeKind::Class)
        );
    }

    #[test]
    fn test_principal_non_public_fallback() {
        assert_eq!(
            find_principal_type("class Helper { }"),
            non_public("Helper", TypeKind::Class)
        );
        assert_eq!(
            find_principal_type("  interface Callback {}"),
            non_public("Callback", TypeKind::Interface)
        );
        assert_eq!(
            find_principal_type("enum State { ON, OFF }"),
            non_public("State", TypeKind::Enum)
        );
    }

    #[test]
    fn test_principal_unknown() {
        let principal = find_principal_type("// nothing declared here\nint x = 1;\n");
        assert_eq!(principal, PrincipalType::Unknown);
        assert_eq!(principal.name(), None);
        assert_eq!(principal.visibility(), None);
    }

    #[test]
    fn test_principal_ignores_private_and_inline_mentions() {
        // keywords must start the line (after whitespace)
        let text = "/* the class Foo is gone */\nprivate class Inner {}\n";
        assert_eq!(find_principal_type(text), PrincipalType::Unknown);
    }

    #[test]
    fn test_extract_bytes_full() {
        let extractor = Extractor::new();
        let source = "package com.example.app;\npublic class Foo { }\n";
        let extracted = extractor
            .extract_bytes(Path::new("f1.java"), source.as_bytes())
            .unwrap()
            .unwrap();

        assert_eq!(extracted.package, "com.example.app");
        assert_eq!(extracted.principal.name(), Some("Foo"));
        assert_eq!(extracted.principal.visibility(), Some(Visibility::Public));
        assert_eq!(extracted.content, source);
        assert_eq!(extracted.encoding, TextEncoding::Utf8);
    }

    #[test]
    fn test_extract_bytes_skips_without_package() {
        let extractor = Extractor::new();
        let result = extractor
            .extract_bytes(Path::new("f2.txt"), b"public class Foo {}\n")
            .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_extract_bytes_latin1_fallback() {
        let extractor = Extractor::new();
        let bytes = b"package a;\n// Fran\xe7ois\nclass B {}\n";
        let extracted = extractor
            .extract_bytes(Path::new("f3"), bytes)
            .unwrap()
            .unwrap();
        assert_eq!(extracted.encoding, TextEncoding::Latin1);
        assert!(extracted.content.contains("Fran\u{e7}ois"));
    }

    #[test]
    fn test_extract_bytes_undecodable() {
        let extractor =
            Extractor::with_config(ExtractorConfig::new().encodings([TextEncoding::Utf8]));
        let err = extractor
            .extract_bytes(Path::new("broken.bin"), b"package a;\n\xff\n")
            .unwrap_err();
        assert!(matches!(err, Error::Undecodable { ref tried, .. } if tried.len() == 1));
    }

    #[test]
    fn test_extract_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = Extractor::new()
            .extract(&dir.path().join("missing.java"))
            .unwrap_err();
        assert!(matches!(err, Error::FileRead { .. }));
    }
}
