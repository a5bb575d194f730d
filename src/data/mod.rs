/// Data layer: core types, loading, column inference, filtering, export.
///
/// Architecture:
/// ```text
///  .xlsx / .xls / .ods / .csv / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse files → SheetTable (headers + rows)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ columns   │  headers → name / phone column   (text::normalize)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  criteria → visible row indices  (phone, text)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  export   │  visible rows → .xlsx / .csv
///   └──────────┘
/// ```

pub mod columns;
pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
pub mod phone;
pub mod text;
