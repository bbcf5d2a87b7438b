/// Data layer: core types, loading, filtering and chart views.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet  (local path or http(s) URL)
///        │
///        ▼
///   ┌──────────┐
///   │  loader  │  parse + validate → LaunchDataset
///   └──────────┘
///        │
///        ▼
///   ┌───────────────┐
///   │ LaunchDataset │  Vec<LaunchRecord>, payload bounds, site list
///   └───────────────┘
///        │
///        ▼
///   ┌──────────┐     ┌──────────┐
///   │  filter  │ ──▶ │   view   │  selection → pie / scatter chart data
///   └──────────┘     └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod view;
