/// Data layer: core types, loading, and filtering.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → RawRecord rows
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Dataset  │  median fill, Vec<Record>, distinct genders
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  GenderFilter → matching records, in order
///   └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
