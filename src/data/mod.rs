/// Data layer: core types, loading, filtering and normalization.
///
/// Architecture:
/// ```text
///  .csv / .xlsx / .xls / .ods
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → AbsorptionDataset  (≥ 4 numeric columns)
///   └──────────┘
///        │
///        ▼
///   ┌──────────────────┐
///   │ AbsorptionDataset │  theoretical: Series, experimental: Series
///   └──────────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  Bounds → filtered Series → max-normalized Comparison
///   └──────────┘
/// ```

pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
