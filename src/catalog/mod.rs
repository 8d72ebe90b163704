pub mod categories;
pub mod panels;
pub mod system_map;
