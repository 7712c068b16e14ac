/// Data layer: loading, column selection, and train/test splitting.
///
/// Architecture:
/// ```text
///  .csv (with or without header)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  select   │  column contract → Design (X, y)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  split    │  seeded shuffle → train / test Subsets
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod select;
pub mod split;
