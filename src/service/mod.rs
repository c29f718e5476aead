pub mod datefmt;
pub mod render;
pub mod routing;
