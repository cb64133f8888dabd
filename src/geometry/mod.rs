pub mod cyclic;
pub mod segment;

pub use segment::{
    edges, is_near_edges, nearest_vertex, point_distance, point_segment_distance,
    segments_intersect,
};
