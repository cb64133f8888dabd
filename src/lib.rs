//! shapeclean - Repair and convert cutting and packing benchmark polygons

pub mod cleaning;
pub mod config;
pub mod domain;
pub mod error;
pub mod formats;
pub mod geometry;
pub mod output;
