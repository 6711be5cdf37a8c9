//! Applies a random shear (and optionally a sharpen) to one image file.
//!
//! ```bash
//! shear-image photo.png out.png --x 0.3 --y 0.1,0.2 --fill-mode constant --seed 7
//! shear-image photo.png out.png --config shear.json --sharpen 0.5
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use vision_augment::transforms::vision::{LoadImage, ToArray, ToImage};
use vision_augment::{
    Augmentation, AugmentationConfig, FillMode, Interpolation, RandomShearConfig, RangeSpec,
    Sharpen, Transform,
};

#[derive(Parser, Debug)]
#[command(name = "shear-image", about = "Randomly shear an image")]
struct Args {
    /// Input image path
    input: PathBuf,

    /// Output image path (format chosen by extension)
    output: PathBuf,

    /// X shear range: `v` for (0, v) or `low,high`
    #[arg(long, allow_hyphen_values = true)]
    x: Option<RangeSpec>,

    /// Y shear range: `v` for (0, v) or `low,high`
    #[arg(long, allow_hyphen_values = true)]
    y: Option<RangeSpec>,

    /// nearest | bilinear
    #[arg(long, default_value = "bilinear")]
    interpolation: Interpolation,

    /// constant | reflect | wrap | nearest
    #[arg(long, default_value = "reflect")]
    fill_mode: FillMode,

    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    fill_value: f32,

    /// JSON RandomShear config; replaces the range and fill flags
    #[arg(long)]
    config: Option<PathBuf>,

    /// RNG seed (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Sharpen afterwards with this blend factor in [0, 1]
    #[arg(long)]
    sharpen: Option<f32>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let shear_config = match &args.config {
        Some(path) => RandomShearConfig::from_json_file(path)?,
        None => RandomShearConfig {
            x: args.x,
            y: args.y,
            augmentation: AugmentationConfig {
                interpolation: args.interpolation,
                fill_mode: args.fill_mode,
                fill_value: args.fill_value,
            },
        },
    };
    let shear = shear_config.build().context("Invalid shear configuration")?;

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let image = LoadImage::new().then(ToArray).apply(args.input.clone())?;
    let sample = shear.sample_transformation(&mut rng);
    eprintln!(
        "shear x={:?} y={:?} ({})",
        sample.shear_x,
        sample.shear_y,
        args.input.display()
    );
    let mut image = shear.augment_image(image, &sample)?;

    if let Some(factor) = args.sharpen {
        image = Sharpen::new((0.0, 255.0), factor)?.apply(image)?;
    }

    ToImage
        .apply(image)?
        .save(&args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;
    Ok(())
}
