//! Report renderers for portfolio views.
//!
//! - [`terminal`] — colored tables and a summary box; respects `--verbose` / `--quiet`.
//! - [`pdf`] — multi-page PDF with a stat-card cover, the ranking table, and
//!   the risk heatmap.
//!
//! JSON output needs no renderer: every view type is `Serialize`.

pub mod pdf;
pub mod terminal;
