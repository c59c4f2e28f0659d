//! Region growing over triangle adjacency.

mod flood_fill;

pub use flood_fill::{flood_fill, Adjacency, Inclusion};
