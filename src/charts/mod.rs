//! Charts module - chart specs, previews and static rendering

pub mod preview;
pub mod renderer;
pub mod scale;
pub mod spec;

pub use preview::TablePreview;
pub use renderer::{RenderError, StaticChartRenderer};
pub use spec::{BarChartOptions, ChartSpec};
