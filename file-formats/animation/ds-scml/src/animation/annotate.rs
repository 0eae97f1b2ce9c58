//! Per-animation cross references, computed once before sampling
//!
//! The parsed project stays read-only; everything the sampler needs to look
//! up repeatedly lives in side tables keyed by timeline and key id.

use std::collections::HashMap;

use glam::Vec2;

use crate::document::{Animation, AtlasFile, BoneRef, Folder, ObjectRef, Project, Timeline};
use crate::error::{Error, Result};

use super::bone::find_parent_cycle;

/// Cross references of one sprite key
#[derive(Debug, Clone, Copy)]
pub struct KeyAnnotation<'a> {
    /// Folder named by the key, the symbol
    pub folder: Option<&'a Folder>,
    /// Atlas file named by the key
    pub file: Option<&'a AtlasFile>,
    /// Declared pivot minus the atlas file's own pivot
    pub pivot_delta: Vec2,
    /// Mainline reference carrying parent bone and z-index
    pub object_ref: ObjectRef,
}

/// Side tables for one animation
#[derive(Debug, Default)]
pub struct AnimationAnnotations<'a> {
    keys: HashMap<(u32, u32), KeyAnnotation<'a>>,
    bones: HashMap<u32, BoneRef>,
}

impl<'a> AnimationAnnotations<'a> {
    /// Resolve bone hierarchy references and sprite key cross references
    ///
    /// Fails when a bone timeline is never referenced by the mainline, when
    /// the first key of a sprite timeline is never referenced, or when the
    /// bone parent graph is not a forest.
    pub fn build(
        project: &'a Project,
        entity: &str,
        animation: &'a Animation,
    ) -> Result<Self> {
        let mut annotations = Self::default();

        for timeline in animation.bone_timelines() {
            let bone_ref =
                animation
                    .bone_ref_for(timeline.id)
                    .ok_or_else(|| Error::MissingBoneReference {
                        entity: entity.to_string(),
                        animation: animation.name.clone(),
                        timeline: timeline.name.clone(),
                    })?;
            annotations.bones.insert(timeline.id, *bone_ref);
        }

        if let Some(bone) = find_parent_cycle(annotations.bones.values()) {
            return Err(Error::BoneCycle {
                entity: entity.to_string(),
                animation: animation.name.clone(),
                bone,
            });
        }

        for timeline in animation.sprite_timelines() {
            annotations.annotate_sprite_timeline(project, entity, animation, timeline)?;
        }

        Ok(annotations)
    }

    fn annotate_sprite_timeline(
        &mut self,
        project: &'a Project,
        entity: &str,
        animation: &Animation,
        timeline: &Timeline,
    ) -> Result<()> {
        let keys = timeline.sprite_keys();
        let Some(first) = keys.first() else {
            return Ok(());
        };

        let first_ref = *animation
            .object_ref_for(timeline.id, first.id)
            .ok_or_else(|| Error::MissingObjectReference {
                entity: entity.to_string(),
                animation: animation.name.clone(),
                timeline: timeline.name.clone(),
            })?;
        let default_file = project.atlas_file(first.pose.folder, first.pose.file);
        let default_pivot_x = default_file.map_or(0.0, |f| f.pivot_x);
        let default_pivot_y = default_file.map_or(0.0, |f| f.pivot_y);

        for key in keys {
            let pose = &key.pose;
            let file = project.atlas_file(pose.folder, pose.file);
            let own_pivot_x = file.map_or(0.0, |f| f.pivot_x);
            let own_pivot_y = file.map_or(0.0, |f| f.pivot_y);

            let pivot_delta = Vec2::new(
                pose.pivot_x.unwrap_or(default_pivot_x) - own_pivot_x,
                pose.pivot_y.unwrap_or(default_pivot_y) - own_pivot_y,
            );
            let object_ref = animation
                .object_ref_for(timeline.id, key.id)
                .copied()
                .unwrap_or(first_ref);

            self.keys.insert(
                (timeline.id, key.id),
                KeyAnnotation {
                    folder: project.folder(pose.folder),
                    file,
                    pivot_delta,
                    object_ref,
                },
            );
        }
        Ok(())
    }

    /// Cross references of a sprite key
    pub fn key(&self, timeline: u32, key: u32) -> Option<&KeyAnnotation<'a>> {
        self.keys.get(&(timeline, key))
    }

    /// Hierarchy reference of a bone timeline
    pub fn bone(&self, timeline: u32) -> Option<&BoneRef> {
        self.bones.get(&timeline)
    }
}
