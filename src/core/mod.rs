pub mod resolver;
pub mod scale;
pub mod table;
pub mod types;

pub use resolver::{
    ResolvedRow, YScaleMode, YScales, build_shared_y_scale, build_x_scale, build_y_scale,
    build_y_scales, highlight_points, is_inside_bounds, resolve_row,
};
pub use scale::LinearScale;
pub use table::{Column, ColumnUnit, Field, Row, Table};
pub use types::{PlotArea, Point, Viewport};
