pub mod geometry;
pub mod template;
