//! Render boundary
//!
//! The simulation never touches sprites. It exposes animation keys, frame
//! counts, render layers and a read-only snapshot per piece; whatever draws
//! the board consumes those.

pub mod animation;
pub mod snapshot;

pub use animation::{AnimationCatalog, AnimationKey, AnimationVariant};
pub use snapshot::{PieceSnapshot, RenderLayer, layer_for, shadow_visible, snapshot};
