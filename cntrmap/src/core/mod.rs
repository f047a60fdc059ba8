pub mod endpoint;
pub mod hosts;
pub mod matrix;
pub mod placement;
pub mod render;
pub mod topology;
