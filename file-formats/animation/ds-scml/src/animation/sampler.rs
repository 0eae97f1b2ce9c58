//! Per-tick sampling of animations into flattened sprite frames
//!
//! For every output tick the sampler interpolates the bone timelines,
//! flattens the bone hierarchy into world space, interpolates every visible
//! sprite timeline, attaches sprites to their parent bone and emits one
//! element per sprite together with the frame's bounding box.

use std::sync::LazyLock;

use glam::{Affine2, Vec2};
use log::{debug, info, trace, warn};
use regex::Regex;

use crate::config::ConvertConfig;
use crate::descriptor::{AnimationBank, BuildDescriptor, FrameElement, OutputFrame};
use crate::document::{Animation, Project, Timeline};
use crate::error::Result;

use super::annotate::AnimationAnnotations;
use super::bone::{BoneFrame, Pose, flatten_bones, trans_rot_scale_pivot};
use super::bounds::BoundingBoxAccumulator;
use super::interpolation::{lerp, lerp_angle, resolve_key_blend};

static LAYER_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_\d+$").expect("valid layer suffix pattern"));

/// Layer name of a timeline: its name without a trailing `_<number>`
pub fn layer_name(timeline_name: &str) -> String {
    LAYER_SUFFIX.replace(timeline_name, "").into_owned()
}

/// Interpolated sprite state before the final transform is built
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteSample {
    pub pose: Pose,
    pub alpha: f32,
    /// Pivot correction, normalized to the atlas frame size
    pub pivot: Vec2,
}

struct AnimationContext<'a> {
    entity: &'a str,
    animation: &'a Animation,
    annotations: AnimationAnnotations<'a>,
    bone_timelines: Vec<&'a Timeline>,
    sprite_timelines: Vec<&'a Timeline>,
    tick_duration: u32,
}

/// Samples the animations of a project against its build
pub struct FrameSampler<'a> {
    project: &'a Project,
    build: &'a BuildDescriptor,
    config: &'a ConvertConfig,
    skipped_placements: usize,
}

impl<'a> FrameSampler<'a> {
    pub fn new(project: &'a Project, build: &'a BuildDescriptor, config: &'a ConvertConfig) -> Self {
        Self {
            project,
            build,
            config,
            skipped_placements: 0,
        }
    }

    /// Sprite placements dropped so far because their atlas frame is not built
    pub fn skipped_placements(&self) -> usize {
        self.skipped_placements
    }

    /// Sample one animation into its frame sequence
    ///
    /// Returns `Ok(None)` for animations without any sprite timeline.
    pub fn sample_animation(
        &mut self,
        entity: &'a str,
        animation: &'a Animation,
    ) -> Result<Option<AnimationBank>> {
        if animation.timelines.is_empty() {
            debug!("skipping animation {entity}/{}: no timelines", animation.name);
            return Ok(None);
        }
        let sprite_timelines: Vec<&Timeline> = animation.sprite_timelines().collect();
        if sprite_timelines.is_empty() {
            debug!("skipping animation {entity}/{}: bones only", animation.name);
            return Ok(None);
        }

        let context = AnimationContext {
            entity,
            animation,
            annotations: AnimationAnnotations::build(self.project, entity, animation)?,
            bone_timelines: animation.bone_timelines().collect(),
            sprite_timelines,
            tick_duration: self.config.tick_duration(),
        };

        info!("convert animation: {entity}/{}", animation.name);

        let frame_count = animation.length / context.tick_duration;
        let mut frames = Vec::with_capacity(frame_count as usize);
        for frame_num in 0..frame_count {
            frames.push(self.sample_tick(&context, frame_num * context.tick_duration));
        }

        Ok(Some(AnimationBank {
            frame_rate: self.config.frame_rate,
            frame_count,
            frames,
        }))
    }

    fn sample_tick(&mut self, context: &AnimationContext<'a>, tick: u32) -> OutputFrame {
        let mut bones = sample_bones(context, tick);
        flatten_bones(&mut bones);

        let sprite_count = context.sprite_timelines.len() as i32;
        let mut bounds = BoundingBoxAccumulator::new();
        let mut elements = Vec::new();
        for timeline in &context.sprite_timelines {
            if let Some(element) =
                self.place_sprite(context, timeline, tick, &bones, sprite_count, &mut bounds)
            {
                elements.push(element);
            }
        }

        trace!(
            "{}/{} tick {tick}: {} bones, {} elements",
            context.entity,
            context.animation.name,
            bones.len(),
            elements.len()
        );

        let bounds = bounds.finish();
        if bounds.w == 0.0 && bounds.h == 0.0 {
            debug!(
                "{}/{} tick {tick} has an empty bounding box",
                context.entity, context.animation.name
            );
        }

        OutputFrame { bounds, elements }
    }

    /// Place one sprite timeline at `tick`
    ///
    /// Scale is interpolated and inherited from the parent bone per axis:
    /// `scale_y` blends between both keys and is multiplied by the bone's
    /// `scale_y`, never by its `scale_x`.
    fn place_sprite(
        &mut self,
        context: &AnimationContext<'a>,
        timeline: &Timeline,
        tick: u32,
        bones: &[BoneFrame],
        sprite_count: i32,
        bounds: &mut BoundingBoxAccumulator,
    ) -> Option<FrameElement> {
        let all_keys = timeline.sprite_keys();
        // The trailing key closes the loop and is not sampled on its own.
        let keys = if all_keys.len() > 1 {
            &all_keys[..all_keys.len() - 1]
        } else {
            all_keys
        };
        let first = keys.first()?;
        let last = keys.last()?;
        let animation = context.animation;

        let shown_at_end = animation
            .final_mainline_key()
            .is_some_and(|k| k.references_object(timeline.id, first.id));
        if first.time > tick && !shown_at_end {
            return None;
        }
        if last.time.saturating_add(context.tick_duration) < tick && !animation.looping {
            return None;
        }

        let blend = resolve_key_blend(keys, animation.length, tick, animation.looping)?;
        if blend.is_sparse(context.tick_duration) && keys.len() > 1 {
            return None;
        }

        let start_note = context.annotations.key(timeline.id, blend.start.id)?;
        let end_note = context.annotations.key(timeline.id, blend.end.id)?;
        let start = &blend.start.pose;
        let end = &blend.end.pose;
        let t = blend.blend;

        let mut sample = SpriteSample {
            pose: Pose {
                x: lerp(start.x, end.x, t),
                y: lerp(start.y, end.y, t),
                scale_x: lerp(start.scale_x, end.scale_x, t),
                scale_y: lerp(start.scale_y, end.scale_y, t),
                angle: lerp_angle(start.angle, end.angle, t, blend.end.spin),
            },
            alpha: lerp(start.alpha, end.alpha, t),
            pivot: start_note.pivot_delta.lerp(end_note.pivot_delta, t),
        };

        let Some(folder) = start_note.folder else {
            warn!(
                "folder {} used by {}/{} timeline {} is not defined by the build",
                start.folder, context.entity, animation.name, timeline.name
            );
            self.skipped_placements += 1;
            return None;
        };
        let symbol = folder.symbol_name();
        let Some(build_frame) = self.build.frame(&symbol, start.file) else {
            warn!(
                "frame {} of animation symbol {symbol} is being used by {}/{} but not defined by the build",
                start.file, context.entity, animation.name
            );
            self.skipped_placements += 1;
            return None;
        };
        let (width, height) = start_note
            .file
            .map_or((build_frame.width, build_frame.height), |f| (f.width, f.height));

        let parent = start_note.object_ref.parent;
        if parent >= 0
            && let Some(bone) = bones.iter().find(|b| b.id == parent)
        {
            sample.pose.apply_parent(&bone.pose);
        }

        let transform = sprite_transform(&sample, width, height);
        bounds.extend(build_frame, &transform);

        let [m_a, m_b] = transform.matrix2.x_axis.to_array();
        let [m_c, m_d] = transform.matrix2.y_axis.to_array();
        let [m_tx, m_ty] = transform.translation.to_array();
        Some(FrameElement {
            name: symbol,
            frame: start.file,
            layer_name: layer_name(&timeline.name),
            m_a,
            m_b,
            m_c,
            m_d,
            m_tx,
            m_ty,
            z_index: sprite_count - start_note.object_ref.z_index,
        })
    }
}

/// Interpolate the bone timelines that are animated at `tick`
fn sample_bones(context: &AnimationContext<'_>, tick: u32) -> Vec<BoneFrame> {
    let animation = context.animation;
    let mut bones = Vec::with_capacity(context.bone_timelines.len());

    for timeline in &context.bone_timelines {
        let Some(blend) = resolve_key_blend(
            timeline.bone_keys(),
            animation.length,
            tick,
            animation.looping,
        ) else {
            continue;
        };
        if blend.is_sparse(context.tick_duration) {
            continue;
        }
        let Some(bone_ref) = context.annotations.bone(timeline.id) else {
            continue;
        };

        let start = &blend.start.pose;
        let end = &blend.end.pose;
        let t = blend.blend;
        let spin = blend.end.spin;
        let pose = Pose {
            x: lerp(start.x, end.x, t),
            y: lerp(start.y, end.y, t),
            scale_x: lerp(start.scale_x, end.scale_x, t),
            scale_y: lerp(start.scale_y, end.scale_y, t),
            angle: lerp_angle(start.angle, end.angle, t, spin),
        };
        bones.push(BoneFrame::new(bone_ref.id, bone_ref.parent, pose, spin));
    }

    bones
}

/// Final sprite transform: y-down translation, rotation, scale, then the
/// pivot correction scaled to pixels
pub fn sprite_transform(sample: &SpriteSample, width: u32, height: u32) -> Affine2 {
    let pivot = sample.pivot * Vec2::new(width as f32, height as f32);
    trans_rot_scale_pivot(
        Vec2::new(sample.pose.x, -sample.pose.y),
        sample.pose.angle,
        Vec2::new(sample.pose.scale_x, sample.pose.scale_y),
        Vec2::new(-pivot.x, pivot.y),
    )
}
