//! Sheetfrag - streaming parse/serialize engine for OOXML spreadsheet
//! markup fragments
//!
//! This library provides the shared machinery behind the many near-identical
//! element kinds of OOXML spreadsheet markup: a tolerant recursive-descent
//! parse protocol over a single forward-only token stream, deterministic
//! re-serialization to fragment strings, and resolution of markup color
//! references (indexed, RGB, theme+tint, auto) to concrete RGB values.
//!
//! # Features
//!
//! - **Element protocol**: one shared streaming tokenizer per fragment,
//!   tag-stack tracking so nested same-named tags close correctly,
//!   unknown children skipped, premature end of input tolerated
//! - **Best effort, never abort**: malformed markup is logged and yields
//!   partial values; a broken element cannot sink a document
//! - **Color resolution**: legacy indexed palette, theme slots with the
//!   fixed-point integer HSL tint algorithm preserved bit-for-bit
//!
//! # Example - Parsing a border fragment
//!
//! ```
//! use sheetfrag::color::{resolve, ColorUsage, Theme};
//! use sheetfrag::elements::{parse_fragment, Border, Element};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let border: Border = parse_fragment(
//!     r#"<border><left style="thin"><color rgb="FF000000"/></left></border>"#,
//! )?;
//!
//! let left = border.left.as_ref().expect("left side");
//! assert_eq!(left.legacy_style_index(), 1);
//!
//! let theme = Theme::new();
//! let color = resolve(left.color.as_ref().unwrap(), ColorUsage::Font, &theme).unwrap();
//! assert_eq!(color.rgb, [0, 0, 0]);
//!
//! // Serialization is the inverse of parsing.
//! let xml = border.to_xml();
//! assert!(xml.starts_with("<border>"));
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Resolving a tinted theme color
//!
//! ```
//! use sheetfrag::color::{resolve, ColorSpec, ColorUsage, Theme};
//!
//! let theme = Theme::new();
//! let spec = ColorSpec::Theme { slot: 4, tint: 0.4 };
//! let resolved = resolve(&spec, ColorUsage::Fill, &theme).unwrap();
//! // accent1 lightened toward white
//! assert!(resolved.rgb[0] > 0x4F);
//! ```

/// Color specifications, the legacy palette, theme tables and resolution
pub mod color;

/// Concrete element kinds and the shared parse/serialize protocol
pub mod elements;

/// Error types for fragment operations
pub mod error;

/// XML escaping at the serialization boundary
pub mod escape;

/// Shared streaming token source and tag-stack bookkeeping
pub mod stream;

// Re-export commonly used types for convenience
pub use color::{ColorSpec, ColorUsage, ResolvedColor, Theme, resolve};
pub use elements::{Element, parse_fragment};
pub use error::{FragError, Result};
pub use stream::{FragmentReader, TagStack};
