//! A single-pass scanner for date-time format patterns.
//!
//! A pattern such as `yyyy-MM-dd` is split into components: runs of one
//! symbol letter, literal text and quoted sections. Each run is checked
//! against the width limits of its symbol and, where the width selects a
//! rendering, refined into a [`SymbolKind`].
//!
//! # Example
//!
//! ```rust
//! use chronopat::{Component, ComponentKind, SymbolKind, tokenize};
//!
//! let tokens = tokenize("dd MMM yyyy");
//!
//! assert_eq!(
//!     tokens[2].component,
//!     Component::Symbol {
//!         kind: ComponentKind::MonthOfYear,
//!         width: 3,
//!         symbol: SymbolKind::ShortText,
//!     }
//! );
//!
//! // Over-wide runs are reported, not rejected.
//! assert!(tokenize("ddd")[0].component.is_illegal());
//! ```

pub mod collect;
pub mod component;
pub mod scanner;
pub mod validate;

pub use collect::{Token, TokenCollector, tokenize};
pub use component::{ComponentKind, KindSpec, Strategy, SymbolKind, classify};
pub use scanner::{Component, FnVisitor, PatternVisitor, ScanError, Visiting, scan, try_scan};
pub use validate::{PatternError, illegal_components, validate};
