pub mod document;
pub mod layer;
pub mod transform;
