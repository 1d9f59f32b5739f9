use clap::Parser;
use log::{ error, info };

use phong_ray_tracer::consts::{ DEFAULT_CANVAS_WIDTH, DEFAULT_CANVAS_HEIGHT };
use phong_ray_tracer::camera::Camera;
use phong_ray_tracer::demo::demo_scene;
use phong_ray_tracer::scene_file::{ SceneFile, load_scene };
use phong_ray_tracer::parallel::render_parallel;
use phong_ray_tracer::error::Result;

mod cli;
mod logger;

use cli::Args;
use logger::{ init_logger, level_for };

fn run(args: Args) -> Result<()> {
    if let Some(threads) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()?;
    }

    let SceneFile { scene, mut camera, mut options } = match args.scene {
        Some(ref path) => load_scene(path)?,
        None => {
            info!("No scene given; rendering the demo scene");
            demo_scene(DEFAULT_CANVAS_WIDTH, DEFAULT_CANVAS_HEIGHT)?
        },
    };

    if args.width.is_some() || args.height.is_some() {
        camera = Camera::new(
            args.width.unwrap_or(camera.hsize()),
            args.height.unwrap_or(camera.vsize()),
            camera.field_of_view(),
            *camera.transform()
        )?;
    }

    if let Some(depth) = args.depth {
        options.max_depth = depth;
    }

    let canvas = render_parallel(&camera, &scene, &options);
    canvas.save_ppm(&args.output)?;
    info!("Saved render to {}", args.output.display());

    Ok(())
}

fn main() {
    let args = Args::parse();
    init_logger(level_for(args.verbose));

    if let Err(e) = run(args) {
        error!("{}", e);
        std::process::exit(1);
    }
}
