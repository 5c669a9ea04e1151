mod chart;
mod config;
mod frame_builder;
mod layout_helpers;
mod readout;
mod scheduler;

pub use chart::LineChart;
pub use config::{ChartConfig, default_palette};
pub use frame_builder::{FrameInput, build_frame};
pub use readout::{CursorReadout, SeriesReadout};
pub use scheduler::RedrawScheduler;
