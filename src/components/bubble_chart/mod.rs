mod component;
mod config;
mod data;
mod detail;
mod error;
mod layout;
mod nodes;
mod render;
mod scale;
mod simulation;
mod state;
mod types;

pub use component::BubbleChart;
pub use config::ChartConfig;
pub use data::fetch_rows;
pub use error::ChartError;
pub use layout::LayoutMode;
pub use state::BubbleChartState;
pub use types::RawRow;
