//! Converter from Spriter SCML projects to Don't Starve animation assets.
//!
//! A project is read as an already-parsed node tree, typed once into a
//! [`Project`], then turned into two descriptors for the binary writer:
//!
//! - a [`BuildDescriptor`]: symbols and their atlas frames, plus the mapping
//!   from symbol frames to source images
//! - an [`AnimDescriptor`]: for every animation, one flattened frame per
//!   output tick listing the placed sprites and a bounding box
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use ds_scml::{ConvertConfig, convert_file};
//!
//! let conversion = convert_file(Path::new("hero/hero.json"), &ConvertConfig::default())?;
//! for (entity, animations) in &conversion.anim.banks {
//!     for (name, bank) in animations {
//!         println!("{entity}/{name}: {} frames", bank.frame_count);
//!     }
//! }
//! # Ok::<(), ds_scml::Error>(())
//! ```

pub mod animation;
pub mod atlas;
pub mod config;
pub mod conversion;
pub mod descriptor;
pub mod document;
pub mod error;
pub mod node;

pub use atlas::{BuildIndex, build_index};
pub use config::ConvertConfig;
pub use conversion::{Conversion, ConversionStats, convert_file, convert_node, convert_project};
pub use descriptor::{
    AnimDescriptor, AnimationBank, BuildDescriptor, BuildFrame, BuildSymbol, FrameBounds,
    FrameElement, OutputFrame, SymbolImages,
};
pub use document::Project;
pub use error::{Error, Result};
pub use node::Node;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
