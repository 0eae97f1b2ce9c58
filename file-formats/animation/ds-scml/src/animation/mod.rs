//! SCML animation sampling
//!
//! This module turns keyframed bone and sprite timelines into flattened,
//! per-tick sprite placements:
//! - Keyframe bracketing and blend factors, including loop wrap-around
//! - Shortest-arc angle interpolation
//! - Bone hierarchy flattening into world space
//! - Per-frame bounding boxes
//! - The frame sampler driving all of the above

mod annotate;
mod bone;
mod bounds;
mod interpolation;
mod sampler;

pub use annotate::{AnimationAnnotations, KeyAnnotation};
pub use bone::{BoneFrame, Pose, find_parent_cycle, flatten_bones, trans_rot_scale_pivot};
pub use bounds::{BoundingBoxAccumulator, Extent};
pub use interpolation::{KeyBlend, lerp, lerp_angle, resolve_key_blend};
pub use sampler::{FrameSampler, SpriteSample, layer_name, sprite_transform};
