pub mod ability_matrix;
pub mod plot_flow;
pub mod svg_layer;
pub mod tooltip;
