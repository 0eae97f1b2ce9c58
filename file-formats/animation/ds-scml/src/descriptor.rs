//! Build and animation descriptors handed to the binary writer
//!
//! Field names follow the layout the writer expects, so the structures
//! serialize directly into its input format.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Serialize, Serializer};

/// Symbol and frame catalogue of a build
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuildDescriptor {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub version: u32,
    pub name: String,
    pub scale: f32,
    #[serde(rename = "Symbol", serialize_with = "serialize_symbols")]
    pub symbols: Vec<BuildSymbol>,
}

/// Frames of one symbol, in atlas declaration order
#[derive(Debug, Clone, PartialEq)]
pub struct BuildSymbol {
    pub name: String,
    pub frames: Vec<BuildFrame>,
}

/// One frame record of a build symbol
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BuildFrame {
    #[serde(rename = "framenum")]
    pub index: u32,
    /// Number of animation frame indices this record covers
    pub duration: u32,
    /// Placement offset of the image centre relative to the pivot
    pub x: f32,
    pub y: f32,
    #[serde(rename = "w")]
    pub width: u32,
    #[serde(rename = "h")]
    pub height: u32,
}

/// `"<symbol>-<frame index>"` to source image path
pub type SymbolImages = BTreeMap<String, PathBuf>;

impl BuildDescriptor {
    /// Symbol by name
    pub fn symbol(&self, name: &str) -> Option<&BuildSymbol> {
        self.symbols.iter().find(|s| s.name == name)
    }

    /// Frame record covering an animation frame index of a symbol
    pub fn frame(&self, symbol: &str, index: u32) -> Option<&BuildFrame> {
        self.symbol(symbol)?.frame(index)
    }
}

impl BuildSymbol {
    /// Frame record whose `[index, index + duration)` range contains `index`
    pub fn frame(&self, index: u32) -> Option<&BuildFrame> {
        self.frames
            .iter()
            .find(|f| {
                index
                    .checked_sub(f.index)
                    .is_some_and(|offset| offset < f.duration.max(1))
            })
    }
}

fn serialize_symbols<S: Serializer>(
    symbols: &[BuildSymbol],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_map(symbols.iter().map(|s| (&s.name, &s.frames)))
}

/// Flattened animation frames of every entity
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnimDescriptor {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub version: u32,
    /// Entity name to animation name to frames
    pub banks: BTreeMap<String, BTreeMap<String, AnimationBank>>,
}

/// Frames of one animation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnimationBank {
    #[serde(rename = "framerate")]
    pub frame_rate: u32,
    #[serde(rename = "numframes")]
    pub frame_count: u32,
    pub frames: Vec<OutputFrame>,
}

/// One output tick
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputFrame {
    #[serde(flatten)]
    pub bounds: FrameBounds,
    pub elements: Vec<FrameElement>,
}

/// Padded bounding box of a frame, centre and size
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct FrameBounds {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

/// One placed sprite
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameElement {
    /// Symbol name
    pub name: String,
    /// Atlas frame index
    pub frame: u32,
    #[serde(rename = "layername")]
    pub layer_name: String,
    pub m_a: f32,
    pub m_b: f32,
    pub m_c: f32,
    pub m_d: f32,
    pub m_tx: f32,
    pub m_ty: f32,
    pub z_index: i32,
}

impl FrameElement {
    /// The six affine coefficients in writer order
    pub fn coefficients(&self) -> [f32; 6] {
        [self.m_a, self.m_b, self.m_c, self.m_d, self.m_tx, self.m_ty]
    }
}
