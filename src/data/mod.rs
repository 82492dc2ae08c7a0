/// Data layer: core types, loading, and feature extraction.
///
/// Architecture:
/// ```text
///  .xlsx / .csv / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → RawDataset
///   └──────────┘
///        │
///        ▼
///   ┌────────────┐
///   │ RawDataset │  header names, Vec<Vec<f64>>
///   └────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ features  │  first 36 columns → FeatureMatrix
///   └──────────┘
/// ```

pub mod features;
pub mod loader;
pub mod model;
