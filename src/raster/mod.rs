pub mod blur;
pub mod composite;
pub mod decode;
pub mod surface;
