//! Writers for converted instances

pub mod dxf;
pub mod json;

pub use self::dxf::write_dxf;
pub use self::json::write_instance;
