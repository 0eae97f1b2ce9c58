//! Whole-project conversion into build and animation descriptors

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use log::info;

use crate::animation::FrameSampler;
use crate::atlas::{BuildIndex, build_index};
use crate::config::ConvertConfig;
use crate::descriptor::{AnimDescriptor, BuildDescriptor, SymbolImages};
use crate::document::Project;
use crate::error::Result;
use crate::node::Node;

/// Everything handed to the binary writer
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub build: BuildDescriptor,
    pub images: SymbolImages,
    pub anim: AnimDescriptor,
    pub stats: ConversionStats,
}

/// Summary counters of a conversion
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConversionStats {
    pub symbols: usize,
    pub animations: usize,
    pub frames: usize,
    /// Sprite placements dropped because their atlas frame is not built
    pub skipped_placements: usize,
}

/// Convert a typed project
///
/// Any fatal error aborts the whole conversion; nothing partial is returned.
pub fn convert_project(project: &Project, config: &ConvertConfig) -> Result<Conversion> {
    config.validate()?;

    let BuildIndex {
        descriptor: build,
        images,
    } = build_index(project, config)?;

    let mut stats = ConversionStats {
        symbols: build.symbols.len(),
        ..ConversionStats::default()
    };
    let mut banks = BTreeMap::new();
    {
        let mut sampler = FrameSampler::new(project, &build, config);
        for entity in &project.entities {
            let bank: &mut BTreeMap<_, _> = banks.entry(entity.name.clone()).or_default();
            for animation in &entity.animations {
                if let Some(sampled) = sampler.sample_animation(&entity.name, animation)? {
                    stats.animations += 1;
                    stats.frames += sampled.frames.len();
                    bank.insert(animation.name.clone(), sampled);
                }
            }
        }
        stats.skipped_placements = sampler.skipped_placements();
    }

    info!(
        "converted {} animations ({} frames) over {} symbols",
        stats.animations, stats.frames, stats.symbols
    );

    Ok(Conversion {
        build,
        images,
        anim: AnimDescriptor {
            kind: "Anim",
            version: config.anim_version,
            banks,
        },
        stats,
    })
}

/// Convert a parsed node tree; `source` is the project file's path
pub fn convert_node(root: &Node, source: &Path, config: &ConvertConfig) -> Result<Conversion> {
    let project = Project::from_node(root, source)?;
    convert_project(&project, config)
}

/// Load a JSON node tree from disk and convert it
pub fn convert_file(path: &Path, config: &ConvertConfig) -> Result<Conversion> {
    let text = fs::read_to_string(path)?;
    let root = Node::from_json(&text)?;
    convert_node(&root, path, config)
}
