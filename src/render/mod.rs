pub mod carousel;
pub mod gradient;
pub mod logo;
pub mod pipeline;
pub mod text;
