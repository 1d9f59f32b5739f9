use std::path::PathBuf;

use clap::Parser;

use phong_ray_tracer::consts::DEFAULT_OUT_FILE;

/// Renders a scene description to a PPM image.
///
/// Without a scene file, a built-in demo scene is rendered.
#[derive(Parser, Debug)]
#[clap(author, version, about)]
pub struct Args {
    /// JSON scene description to render
    pub scene: Option<PathBuf>,

    /// Where to write the rendered image
    #[clap(short, long, default_value = DEFAULT_OUT_FILE)]
    pub output: PathBuf,

    /// Override the canvas width, in pixels
    #[clap(long)]
    pub width: Option<usize>,

    /// Override the canvas height, in pixels
    #[clap(long)]
    pub height: Option<usize>,

    /// Override the reflection/refraction depth
    #[clap(short, long)]
    pub depth: Option<usize>,

    /// Number of render threads (defaults to one per core)
    #[clap(short = 'j', long)]
    pub threads: Option<usize>,

    /// Log more; repeat for even more (-v info, -vv debug, -vvv trace)
    #[clap(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
