pub mod instance;
pub mod point;
pub mod ring;
pub mod shape;
pub mod zone;

pub use instance::{Bin, Instance, Item, Strip};
pub use point::Point;
pub use ring::Ring;
pub use shape::Shape;
pub use zone::Zone;
