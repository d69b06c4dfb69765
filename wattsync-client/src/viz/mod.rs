pub mod donut;
pub mod graph;

pub use donut::{build_donut, DonutChart, DonutSegment};
pub use graph::{build_usage_graph, BarLevel, MonitorSignal, UsageBar, UsageGraph};
