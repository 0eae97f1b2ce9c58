//! Build indexing from atlas folders
//!
//! Every folder becomes a symbol and every usable file a frame record.
//! Two naming conventions on atlas file names are honoured:
//!
//! - `(missing)` marks a placeholder exported for an image Spriter could not
//!   find; such entries are ignored.
//! - `duration'N'` marks an entry that extends frame `N` of the same symbol
//!   by one more animation frame instead of adding an image.

use std::sync::LazyLock;

use log::{info, warn};
use regex::Regex;

use crate::config::ConvertConfig;
use crate::descriptor::{BuildDescriptor, BuildFrame, BuildSymbol, SymbolImages};
use crate::document::{AtlasFile, Folder, Project};
use crate::error::{Error, Result};

static DURATION_DIRECTIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"duration'(.+?)'").expect("valid duration pattern"));
static DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").expect("valid digit pattern"));

/// Build descriptor plus the image mapping used to pack the atlas
#[derive(Debug, Clone, PartialEq)]
pub struct BuildIndex {
    pub descriptor: BuildDescriptor,
    pub images: SymbolImages,
}

/// Derive the symbol catalogue and image mapping of a project
pub fn build_index(project: &Project, config: &ConvertConfig) -> Result<BuildIndex> {
    let mut symbols = Vec::new();
    let mut images = SymbolImages::new();

    for folder in &project.folders {
        let name = folder.symbol_name();
        info!("build symbol: {name}");

        let mut frames: Vec<BuildFrame> = Vec::new();
        for file in folder.files.iter().filter(|f| !f.is_placeholder()) {
            if let Some(target) = duration_target(folder, file)? {
                match frames.iter_mut().find(|f| f.index == target) {
                    Some(frame) => frame.duration += 1,
                    None => warn!(
                        "duration entry '{}' of symbol {name} extends frame {target}, which is not defined",
                        file.name
                    ),
                }
                continue;
            }

            let (x, y) = placement_offset(file);
            frames.push(BuildFrame {
                index: file.id,
                duration: 1,
                x,
                y,
                width: file.width,
                height: file.height,
            });
            images.insert(
                format!("{name}-{}", file.id),
                project.base_dir.join(&file.name),
            );
        }

        if !frames.is_empty() {
            symbols.push(BuildSymbol { name, frames });
        }
    }

    Ok(BuildIndex {
        descriptor: BuildDescriptor {
            kind: "Build",
            version: config.build_version,
            name: project.name.clone(),
            scale: config.scale,
            symbols,
        },
        images,
    })
}

/// Offset of the image centre from its pivot, y pointing down
pub fn placement_offset(file: &AtlasFile) -> (f32, f32) {
    let w = file.width as f32;
    let h = file.height as f32;
    let x = w / 2.0 - file.pivot_x * w;
    let y = h / 2.0 - file.pivot_y * h;
    (x, -y)
}

/// Frame index named by a `duration'N'` directive, if the file carries one
fn duration_target(folder: &Folder, file: &AtlasFile) -> Result<Option<u32>> {
    let Some(directive) = DURATION_DIRECTIVE.find(&file.name) else {
        return Ok(None);
    };

    DIGITS
        .find(directive.as_str())
        .and_then(|digits| digits.as_str().parse().ok())
        .map(Some)
        .ok_or_else(|| Error::InvalidDuration {
            folder: folder.name.clone(),
            file: file.name.clone(),
        })
}
