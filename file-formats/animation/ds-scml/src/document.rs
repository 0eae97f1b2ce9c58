//! Typed SCML project model
//!
//! Built once from the parsed [`Node`] tree. Every attribute default is
//! resolved here, so the sampler never touches raw attribute strings.

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::node::Node;

/// A whole SCML project
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    /// Build name, the source file stem
    pub name: String,
    /// Directory that atlas image paths are relative to
    pub base_dir: PathBuf,
    /// Atlas folders, one per symbol
    pub folders: Vec<Folder>,
    /// Animated entities
    pub entities: Vec<Entity>,
}

/// An atlas folder (one symbol)
#[derive(Debug, Clone, PartialEq)]
pub struct Folder {
    pub id: u32,
    pub name: String,
    pub files: Vec<AtlasFile>,
}

/// A single image entry inside an atlas folder
#[derive(Debug, Clone, PartialEq)]
pub struct AtlasFile {
    pub id: u32,
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub pivot_x: f32,
    pub pivot_y: f32,
}

/// An entity and its animations
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub id: u32,
    pub name: String,
    pub animations: Vec<Animation>,
}

/// One animation clip
#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    pub id: u32,
    pub name: String,
    /// Length in milliseconds
    pub length: u32,
    pub looping: bool,
    pub mainline: Vec<MainlineKey>,
    pub timelines: Vec<Timeline>,
}

/// A structural key on the mainline
#[derive(Debug, Clone, PartialEq)]
pub struct MainlineKey {
    pub id: u32,
    pub time: u32,
    pub bone_refs: Vec<BoneRef>,
    pub object_refs: Vec<ObjectRef>,
}

/// Mainline reference to a bone timeline key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoneRef {
    pub id: i32,
    /// Parent bone id, -1 for roots
    pub parent: i32,
    pub timeline: u32,
    pub key: u32,
}

/// Mainline reference to a sprite timeline key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectRef {
    pub id: i32,
    /// Parent bone id, -1 when unparented
    pub parent: i32,
    pub timeline: u32,
    pub key: u32,
    pub z_index: i32,
    pub folder: Option<u32>,
    pub file: Option<u32>,
}

/// Kind of animated channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimelineKind {
    Bone,
    Sprite,
}

/// Keys of a timeline, typed by channel kind
#[derive(Debug, Clone, PartialEq)]
pub enum Track {
    Bone(Vec<Keyframe<BonePose>>),
    Sprite(Vec<Keyframe<ObjectPose>>),
}

/// One animated channel
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    pub id: u32,
    pub name: String,
    pub track: Track,
}

/// A pose sample at an authored time
#[derive(Debug, Clone, PartialEq)]
pub struct Keyframe<P> {
    pub id: u32,
    /// Time in milliseconds
    pub time: u32,
    /// Rotation direction hint
    pub spin: i32,
    pub pose: P,
}

/// Bone pose as authored, angle in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BonePose {
    pub x: f32,
    pub y: f32,
    pub scale_x: f32,
    pub scale_y: f32,
    pub angle: f32,
}

/// Sprite pose as authored, angle in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectPose {
    pub x: f32,
    pub y: f32,
    pub scale_x: f32,
    pub scale_y: f32,
    pub angle: f32,
    pub alpha: f32,
    pub folder: u32,
    pub file: u32,
    /// Per-key pivot override
    pub pivot_x: Option<f32>,
    pub pivot_y: Option<f32>,
    pub parent: i32,
}

impl Project {
    /// Build the typed project from the document root (`spriter_data`)
    ///
    /// `source` is the path of the project file; its stem names the build
    /// and its directory anchors atlas image paths.
    pub fn from_node(root: &Node, source: &Path) -> Result<Self> {
        let name = source
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string();
        let base_dir = source.parent().map(Path::to_path_buf).unwrap_or_default();

        let folders = root
            .children_named("folder")
            .map(Folder::from_node)
            .collect::<Result<Vec<_>>>()?;
        let entities = root
            .children_named("entity")
            .map(Entity::from_node)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            name,
            base_dir,
            folders,
            entities,
        })
    }

    /// Folder by id
    pub fn folder(&self, id: u32) -> Option<&Folder> {
        self.folders.iter().find(|f| f.id == id)
    }

    /// Atlas file by folder and file id
    pub fn atlas_file(&self, folder: u32, file: u32) -> Option<&AtlasFile> {
        self.folder(folder)?.file(file)
    }
}

impl Folder {
    fn from_node(node: &Node) -> Result<Self> {
        let files = node
            .children_named("file")
            .map(AtlasFile::from_node)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            id: node.parse_or("id", 0)?,
            name: node.attr("name").unwrap_or_default().to_string(),
            files,
        })
    }

    /// File by id
    pub fn file(&self, id: u32) -> Option<&AtlasFile> {
        self.files.iter().find(|f| f.id == id)
    }

    /// Symbol name used by the build and animation descriptors
    pub fn symbol_name(&self) -> String {
        self.name.to_lowercase()
    }
}

impl AtlasFile {
    fn from_node(node: &Node) -> Result<Self> {
        Ok(Self {
            id: node.parse_or("id", 0)?,
            name: node.attr("name").unwrap_or_default().to_string(),
            width: node.parse_required("width")?,
            height: node.parse_required("height")?,
            pivot_x: node.parse_or("pivot_x", 0.0)?,
            pivot_y: node.parse_or("pivot_y", 0.0)?,
        })
    }

    /// Placeholder entries exported by Spriter for images it could not find
    pub fn is_placeholder(&self) -> bool {
        self.name.contains("(missing)")
    }
}

impl Entity {
    fn from_node(node: &Node) -> Result<Self> {
        let animations = node
            .children_named("animation")
            .map(Animation::from_node)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            id: node.parse_or("id", 0)?,
            name: node.attr("name").unwrap_or_default().to_string(),
            animations,
        })
    }
}

impl Animation {
    fn from_node(node: &Node) -> Result<Self> {
        let mainline = node
            .require_child("mainline")?
            .children_named("key")
            .map(MainlineKey::from_node)
            .collect::<Result<Vec<_>>>()?;
        let timelines = node
            .children_named("timeline")
            .map(Timeline::from_node)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            id: node.parse_or("id", 0)?,
            name: node.attr("name").unwrap_or_default().to_string(),
            length: node.parse_or("length", 0)?,
            looping: node.attr("looping").is_none_or(|v| v == "true"),
            mainline,
            timelines,
        })
    }

    /// Bone timelines in declaration order
    pub fn bone_timelines(&self) -> impl Iterator<Item = &Timeline> {
        self.timelines
            .iter()
            .filter(|t| t.kind() == TimelineKind::Bone)
    }

    /// Sprite timelines in declaration order
    pub fn sprite_timelines(&self) -> impl Iterator<Item = &Timeline> {
        self.timelines
            .iter()
            .filter(|t| t.kind() == TimelineKind::Sprite)
    }

    /// Last structural key of the mainline
    pub fn final_mainline_key(&self) -> Option<&MainlineKey> {
        self.mainline.last()
    }

    /// First bone reference to a timeline, in mainline order
    pub fn bone_ref_for(&self, timeline: u32) -> Option<&BoneRef> {
        self.mainline
            .iter()
            .flat_map(|k| k.bone_refs.iter())
            .find(|r| r.timeline == timeline)
    }

    /// First object reference to a timeline key, in mainline order
    pub fn object_ref_for(&self, timeline: u32, key: u32) -> Option<&ObjectRef> {
        self.mainline
            .iter()
            .flat_map(|k| k.object_refs.iter())
            .find(|r| r.timeline == timeline && r.key == key)
    }
}

impl MainlineKey {
    fn from_node(node: &Node) -> Result<Self> {
        let bone_refs = node
            .children_named("bone_ref")
            .map(|r| {
                Ok(BoneRef {
                    id: r.parse_or("id", -1)?,
                    parent: r.parse_or("parent", -1)?,
                    timeline: r.parse_or("timeline", 0)?,
                    key: r.parse_or("key", 0)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        let object_refs = node
            .children_named("object_ref")
            .map(|r| {
                Ok(ObjectRef {
                    id: r.parse_or("id", 0)?,
                    parent: r.parse_or("parent", -1)?,
                    timeline: r.parse_or("timeline", 0)?,
                    key: r.parse_or("key", 0)?,
                    z_index: r.parse_or("z_index", 0)?,
                    folder: r.parse_opt("folder")?,
                    file: r.parse_opt("file")?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            id: node.parse_or("id", 0)?,
            time: node.parse_or("time", 0)?,
            bone_refs,
            object_refs,
        })
    }

    /// Whether this key references the given timeline key
    pub fn references_object(&self, timeline: u32, key: u32) -> bool {
        self.object_refs
            .iter()
            .any(|r| r.timeline == timeline && r.key == key)
    }
}

impl Timeline {
    fn from_node(node: &Node) -> Result<Self> {
        let track = if node.attr("object_type") == Some("bone") {
            Track::Bone(parse_keys(node, "bone", BonePose::from_node)?)
        } else {
            Track::Sprite(parse_keys(node, "object", ObjectPose::from_node)?)
        };
        Ok(Self {
            id: node.parse_or("id", 0)?,
            name: node.attr("name").unwrap_or_default().to_string(),
            track,
        })
    }

    pub fn kind(&self) -> TimelineKind {
        match self.track {
            Track::Bone(_) => TimelineKind::Bone,
            Track::Sprite(_) => TimelineKind::Sprite,
        }
    }

    pub fn key_count(&self) -> usize {
        match &self.track {
            Track::Bone(keys) => keys.len(),
            Track::Sprite(keys) => keys.len(),
        }
    }

    /// Bone keys, empty for sprite timelines
    pub fn bone_keys(&self) -> &[Keyframe<BonePose>] {
        match &self.track {
            Track::Bone(keys) => keys,
            Track::Sprite(_) => &[],
        }
    }

    /// Sprite keys, empty for bone timelines
    pub fn sprite_keys(&self) -> &[Keyframe<ObjectPose>] {
        match &self.track {
            Track::Sprite(keys) => keys,
            Track::Bone(_) => &[],
        }
    }
}

fn parse_keys<P>(
    timeline: &Node,
    pose_tag: &str,
    parse_pose: fn(&Node) -> Result<P>,
) -> Result<Vec<Keyframe<P>>> {
    timeline
        .children_named("key")
        .map(|key| {
            Ok(Keyframe {
                id: key.parse_or("id", 0)?,
                time: key.parse_or("time", 0)?,
                spin: key.parse_or("spin", 1)?,
                pose: parse_pose(key.require_child(pose_tag)?)?,
            })
        })
        .collect()
}

impl BonePose {
    fn from_node(node: &Node) -> Result<Self> {
        Ok(Self {
            x: node.parse_or("x", 0.0)?,
            y: node.parse_or("y", 0.0)?,
            scale_x: node.parse_or("scale_x", 1.0)?,
            scale_y: node.parse_or("scale_y", 1.0)?,
            angle: node.parse_or("angle", 0.0)?,
        })
    }
}

impl ObjectPose {
    fn from_node(node: &Node) -> Result<Self> {
        Ok(Self {
            x: node.parse_or("x", 0.0)?,
            y: node.parse_or("y", 0.0)?,
            scale_x: node.parse_or("scale_x", 1.0)?,
            scale_y: node.parse_or("scale_y", 1.0)?,
            angle: node.parse_or("angle", 0.0)?,
            alpha: node.parse_or("a", 1.0)?,
            folder: node.parse_or("folder", 0)?,
            file: node.parse_or("file", 0)?,
            pivot_x: node.parse_opt("pivot_x")?,
            pivot_y: node.parse_opt("pivot_y")?,
            parent: node.parse_or("parent", -1)?,
        })
    }
}
