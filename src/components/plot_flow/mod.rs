mod component;
mod render;
mod scale;
mod state;
mod types;

pub use component::PlotFlowDiagram;
pub use types::MovieRecord;
