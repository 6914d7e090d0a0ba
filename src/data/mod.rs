/// Data layer: the `.spt` record and its parser.
///
/// Architecture:
/// ```text
///     .spt file
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  tokenise lines → per-column values
///   └──────────┘
///        │
///        ▼
///   ┌────────────────┐
///   │ SpectrumRecord  │  columns, continuum rescale, residuals
///   └────────────────┘
/// ```

pub mod error;
pub mod loader;
pub mod model;
