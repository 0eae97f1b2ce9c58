//! SCML project conversion

use anyhow::{Context, Result};
use clap::Args;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use ds_scml::{Conversion, ConvertConfig, convert_file};

use crate::utils::format_bytes;

#[derive(Args)]
pub struct ConvertArgs {
    /// Path to the project node tree (JSON)
    pub input: PathBuf,

    /// Directory to write the descriptors to (defaults to the input's directory)
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub settings: ConvertSettings,
}

/// Conversion settings; flags override values from `--config`
#[derive(Args)]
pub struct ConvertSettings {
    /// JSON file with conversion settings
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output frames per second
    #[arg(long, env = "DS_FRAME_RATE")]
    pub frame_rate: Option<u32>,

    /// Scale written into the build descriptor
    #[arg(long)]
    pub scale: Option<f32>,

    /// Animation descriptor version
    #[arg(long)]
    pub anim_version: Option<u32>,

    /// Build descriptor version
    #[arg(long)]
    pub build_version: Option<u32>,
}

impl ConvertSettings {
    /// Resolve the effective configuration
    pub fn resolve(&self) -> Result<ConvertConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config file: {}", path.display()))?;
                serde_json::from_str(&text)
                    .with_context(|| format!("Invalid config file: {}", path.display()))?
            }
            None => ConvertConfig::default(),
        };

        if let Some(frame_rate) = self.frame_rate {
            config.frame_rate = frame_rate;
        }
        if let Some(scale) = self.scale {
            config.scale = scale;
        }
        if let Some(version) = self.anim_version {
            config.anim_version = version;
        }
        if let Some(version) = self.build_version {
            config.build_version = version;
        }
        Ok(config)
    }
}

pub fn execute(args: ConvertArgs, quiet: bool) -> Result<()> {
    let config = args.settings.resolve()?;
    let input = args.input;

    let conversion = convert_file(&input, &config)
        .with_context(|| format!("Failed to convert {}", input.display()))?;

    let output_dir = match args.output {
        Some(dir) => dir,
        None => input.parent().map(Path::to_path_buf).unwrap_or_default(),
    };
    let written = write_descriptors(&conversion, &output_dir)?;

    if !quiet {
        print_summary(&conversion, &written);
    }
    Ok(())
}

/// Serialize every descriptor, stage them next to their targets, then move
/// them into place
///
/// Nothing is left behind under the final names unless every descriptor was
/// staged. Returns the written paths with their sizes.
fn write_descriptors(conversion: &Conversion, output_dir: &Path) -> Result<Vec<(PathBuf, u64)>> {
    let name = &conversion.build.name;
    let outputs = [
        (
            format!("{name}.build.json"),
            serde_json::to_string_pretty(&conversion.build)?,
        ),
        (
            format!("{name}.anim.json"),
            serde_json::to_string_pretty(&conversion.anim)?,
        ),
        (
            format!("{name}.images.json"),
            serde_json::to_string_pretty(&conversion.images)?,
        ),
    ];

    fs::create_dir_all(output_dir).with_context(|| {
        format!("Failed to create output directory: {}", output_dir.display())
    })?;

    // Staged files are removed on drop if we bail out early.
    let mut staged = Vec::with_capacity(outputs.len());
    for (file_name, contents) in outputs {
        let path = output_dir.join(file_name);
        let mut file = NamedTempFile::new_in(output_dir).with_context(|| {
            format!("Failed to create a temporary file in {}", output_dir.display())
        })?;
        file.write_all(contents.as_bytes())
            .and_then(|()| file.flush())
            .with_context(|| format!("Failed to write {}", path.display()))?;
        staged.push((file, path, contents.len() as u64));
    }

    let mut written: Vec<(PathBuf, u64)> = Vec::with_capacity(staged.len());
    for (file, path, size) in staged {
        if let Err(err) = file.persist(&path) {
            for (done, _) in &written {
                if let Err(remove_err) = fs::remove_file(done) {
                    log::warn!("failed to remove {}: {remove_err}", done.display());
                }
            }
            return Err(anyhow::Error::new(err.error))
                .with_context(|| format!("Failed to write {}", path.display()));
        }
        log::info!("wrote {}", path.display());
        written.push((path, size));
    }
    Ok(written)
}

fn print_summary(conversion: &Conversion, written: &[(PathBuf, u64)]) {
    let stats = &conversion.stats;
    println!("Converted {}", conversion.build.name);
    println!("  Symbols:    {}", stats.symbols);
    println!("  Animations: {}", stats.animations);
    println!("  Frames:     {}", stats.frames);
    if stats.skipped_placements > 0 {
        println!(
            "  Skipped:    {} sprite placements without a built atlas frame",
            stats.skipped_placements
        );
    }

    println!();
    for (path, size) in written {
        println!("  {} ({})", path.display(), format_bytes(*size));
    }
}
