//! Bone poses and hierarchy flattening

use std::collections::HashMap;

use glam::{Affine2, Vec2};

use crate::document::BoneRef;

/// Interpolated 2D pose, angle in radians
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub x: f32,
    pub y: f32,
    pub scale_x: f32,
    pub scale_y: f32,
    pub angle: f32,
}

impl Pose {
    /// Re-express this pose, given relative to `parent`, in the parent's space
    ///
    /// Scale multiplies component-wise, the position is scaled and rotated by
    /// the parent before being offset by the parent's position, and the
    /// angles add up.
    pub fn apply_parent(&mut self, parent: &Pose) {
        self.scale_x *= parent.scale_x;
        self.scale_y *= parent.scale_y;

        let sx = self.x * parent.scale_x;
        let sy = self.y * parent.scale_y;
        let (s, c) = parent.angle.sin_cos();

        self.x = parent.x + sx * c - sy * s;
        self.y = parent.y + sx * s + sy * c;
        self.angle += parent.angle;
    }
}

/// A bone's pose at one sampling tick
#[derive(Debug, Clone, PartialEq)]
pub struct BoneFrame {
    pub id: i32,
    /// Parent bone id, -1 for roots
    pub parent_id: i32,
    /// Local pose until flattened, world pose afterwards
    pub pose: Pose,
    /// Spin of the key the pose was blended towards
    pub spin: i32,
    /// Local transform built from the interpolated pose
    pub local: Affine2,
    pub flattened: bool,
}

impl BoneFrame {
    pub fn new(id: i32, parent_id: i32, pose: Pose, spin: i32) -> Self {
        Self {
            id,
            parent_id,
            pose,
            spin,
            local: trans_rot_scale_pivot(
                Vec2::new(pose.x, pose.y),
                pose.angle,
                Vec2::new(pose.scale_x, pose.scale_y),
                Vec2::ZERO,
            ),
            flattened: false,
        }
    }
}

/// Translate, rotate, scale, then offset by a pivot
pub fn trans_rot_scale_pivot(translation: Vec2, angle: f32, scale: Vec2, pivot: Vec2) -> Affine2 {
    Affine2::from_translation(translation)
        * Affine2::from_angle(angle)
        * Affine2::from_scale(scale)
        * Affine2::from_translation(pivot)
}

/// Convert every bone of a tick into world space, in place
///
/// Parents are flattened before their children and each bone is flattened
/// once, however many children share it. A bone whose parent is not part of
/// `frames` is left as a root for this tick. The parent graph must be a
/// forest (see [`find_parent_cycle`]); a chain deeper than the number of
/// bones stops flattening instead of recursing forever.
pub fn flatten_bones(frames: &mut [BoneFrame]) {
    for index in 0..frames.len() {
        flatten_at(frames, index, 0);
    }
}

fn flatten_at(frames: &mut [BoneFrame], index: usize, depth: usize) {
    if frames[index].flattened || frames[index].parent_id == -1 {
        frames[index].flattened = true;
        return;
    }
    if depth > frames.len() {
        return;
    }

    let parent_id = frames[index].parent_id;
    if let Some(parent_index) = frames.iter().position(|f| f.id == parent_id) {
        flatten_at(frames, parent_index, depth + 1);
        let parent = frames[parent_index].pose;
        frames[index].pose.apply_parent(&parent);
    }
    frames[index].flattened = true;
}

/// Find a bone whose parent chain loops back on itself
///
/// Returns the id of a bone on the cycle, or `None` when the references
/// form a forest.
pub fn find_parent_cycle<'a>(refs: impl IntoIterator<Item = &'a BoneRef>) -> Option<i32> {
    let parents: HashMap<i32, i32> = refs.into_iter().map(|r| (r.id, r.parent)).collect();

    for &start in parents.keys() {
        let mut current = start;
        for _ in 0..=parents.len() {
            match parents.get(&current) {
                Some(&parent) if parent != -1 => current = parent,
                _ => break,
            }
            if current == start {
                return Some(start);
            }
        }
    }
    None
}
