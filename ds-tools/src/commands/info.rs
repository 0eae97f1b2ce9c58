//! Project summary

use anyhow::{Context, Result};
use clap::Args;
use std::fs;
use std::path::PathBuf;

use ds_scml::Node;
use ds_scml::document::{Animation, Entity, Folder, Project, TimelineKind};

use crate::utils::{NodeType, TreeNode, TreeOptions, format_millis, render_tree};

#[derive(Args)]
pub struct InfoArgs {
    /// Path to the project node tree (JSON)
    pub file: PathBuf,

    /// Maximum depth to display
    #[arg(long)]
    pub depth: Option<usize>,

    /// List the timelines of every animation
    #[arg(long)]
    pub timelines: bool,

    /// Hide source image references
    #[arg(long)]
    pub no_images: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Show compact metadata inline
    #[arg(long)]
    pub compact: bool,
}

pub fn execute(args: InfoArgs) -> Result<()> {
    let text = fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to open file: {}", args.file.display()))?;
    let root = Node::from_json(&text).context("Failed to parse project node tree")?;
    let project = Project::from_node(&root, &args.file).context("Failed to read project")?;

    let tree = project_tree(&project, args.timelines);
    let options = TreeOptions {
        max_depth: args.depth,
        show_images: !args.no_images,
        no_color: args.no_color,
        show_metadata: true,
        compact: args.compact,
    };
    print!("{}", render_tree(&tree, &options));

    Ok(())
}

fn project_tree(project: &Project, timelines: bool) -> TreeNode {
    let atlas = project.folders.iter().fold(
        TreeNode::new("Atlas", NodeType::Header).with_metadata("folders", project.folders.len()),
        |node, folder| node.add_child(folder_tree(project, folder)),
    );
    let entities = project.entities.iter().fold(
        TreeNode::new("Entities", NodeType::Header)
            .with_metadata("entities", project.entities.len()),
        |node, entity| node.add_child(entity_tree(entity, timelines)),
    );

    TreeNode::new(project.name.as_str(), NodeType::Root)
        .with_metadata("base directory", project.base_dir.display())
        .add_child(atlas)
        .add_child(entities)
}

fn folder_tree(project: &Project, folder: &Folder) -> TreeNode {
    let placeholders = folder.files.iter().filter(|f| f.is_placeholder()).count();
    let mut node = TreeNode::new(folder.symbol_name(), NodeType::Symbol)
        .with_metadata("files", folder.files.len());
    if placeholders > 0 {
        node = node.with_metadata("placeholders", placeholders);
    }

    for file in &folder.files {
        let image = project.base_dir.join(&file.name);
        node = node.add_child(
            TreeNode::new(format!("frame {}", file.id), NodeType::Frame)
                .with_metadata("size", format!("{}x{}", file.width, file.height))
                .with_metadata("pivot", format!("({}, {})", file.pivot_x, file.pivot_y))
                .with_image(&file.name, Some(image.is_file())),
        );
    }
    node
}

fn entity_tree(entity: &Entity, timelines: bool) -> TreeNode {
    entity.animations.iter().fold(
        TreeNode::new(entity.name.as_str(), NodeType::Entity)
            .with_metadata("animations", entity.animations.len()),
        |node, animation| node.add_child(animation_tree(animation, timelines)),
    )
}

fn animation_tree(animation: &Animation, timelines: bool) -> TreeNode {
    let mut node = TreeNode::new(animation.name.as_str(), NodeType::Animation)
        .with_metadata("length", format_millis(animation.length))
        .with_metadata("looping", animation.looping)
        .with_metadata("bone timelines", animation.bone_timelines().count())
        .with_metadata("sprite timelines", animation.sprite_timelines().count())
        .with_metadata("mainline keys", animation.mainline.len());

    if timelines {
        for timeline in &animation.timelines {
            let kind = match timeline.kind() {
                TimelineKind::Bone => "bone",
                TimelineKind::Sprite => "sprite",
            };
            node = node.add_child(
                TreeNode::new(timeline.name.as_str(), NodeType::Timeline)
                    .with_metadata("kind", kind)
                    .with_metadata("keys", timeline.key_count()),
            );
        }
    }
    node
}
