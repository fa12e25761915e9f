//! `ember`: render one of the demo scenes to a PPM file.

mod scenes;
mod settings;

use anyhow::{Context, Result};
use ember_renderer::{render_parallel, save_ppm, Camera};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::settings::{scene_names, CliArgs, USAGE};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(err) = run() {
        log::error!("{err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = CliArgs::parse(std::env::args().skip(1))?;
    if cli.help {
        println!("{USAGE}\n\nScenes: {}", scene_names());
        return Ok(());
    }

    let settings = cli.resolve()?;
    log::info!("Starting Ember: scene '{}'", settings.scene);
    log::debug!("{settings:?}");

    // Scene construction draws from its own stream so the layout of a
    // random scene only depends on the seed.
    let mut scene_rng = StdRng::seed_from_u64(settings.seed);
    let scene = scenes::build(&settings, &mut scene_rng)?;

    let camera = Camera::new(&scene.camera);
    let config = settings.render_config(scene.background);
    let image = render_parallel(&camera, &scene.world, &config);

    save_ppm(&image, &settings.output)
        .with_context(|| format!("failed to write {}", settings.output.display()))?;

    Ok(())
}
