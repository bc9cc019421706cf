//! Built-in optimization passes, in pipeline order.

mod depth;
mod optimization;
mod remap;

pub use depth::ComputeDepth;
pub use optimization::{CancelInverses, CommuteRotations, FuseRotations};
pub use remap::RemapWires;
