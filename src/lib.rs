//! hover-chart: multi-series time/value line chart with a snapping hover cursor.
//!
//! The pure cursor resolver lives in [`core`]: scales, table lookups and
//! bounds checks. [`api::LineChart`] is the thin stateful driver a UI layer
//! embeds; it turns pointer events into [`render::RenderFrame`]s for any
//! [`render::Renderer`] backend.

pub mod api;
pub mod core;
pub mod error;
pub mod interaction;
pub mod render;
pub mod telemetry;

pub use api::{ChartConfig, LineChart};
pub use error::{ChartError, ChartResult};
