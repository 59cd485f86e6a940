use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use vignettes::{Config, Stage, VignetteKind};
use vignettes_shell::{Script, Shell};

#[derive(Parser, Debug)]
#[command(name = "vignettes", about = "Runs a vignette headless for a scripted session")]
struct Args {
    /// barn, bike, folding-one, folding-two, or folding-nested.
    vignette: VignetteKind,

    /// TOML configuration of the vignettes.
    #[arg(long)]
    config: Option<PathBuf>,

    /// TOML input script. Without one, a short demo session of the vignette runs.
    #[arg(long)]
    script: Option<PathBuf>,

    /// Overrides the number of frames to run.
    #[arg(long)]
    frames: Option<usize>,

    /// Overrides the configuration's random seed.
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    let mut script = match &args.script {
        Some(path) => Script::load(path)?,
        None => Script::demo(args.vignette, &config),
    };
    if let Some(frames) = args.frames {
        script.frames = frames;
    }

    let mut vignette = config
        .build(args.vignette)
        .with_context(|| format!("Failed to set up {}", args.vignette))?;

    info!("Running {} for {} frames", args.vignette, script.frames);
    let mut shell = Shell::new(script.frame());
    let cues = shell.run_frames(vignette.as_mut(), &script.events, script.frames)?;
    info!(
        "{} is {} after {:?}, {} cues issued",
        args.vignette,
        vignette.state(),
        shell.elapsed(),
        cues.len()
    );

    log_world(vignette.stage());
    Ok(())
}

fn log_world(stage: &Stage) {
    for (id, entity) in stage.world.iter() {
        let label = entity
            .text
            .as_deref()
            .map(|text| format!(" {:?}", text))
            .unwrap_or_default();
        info!(
            "{id} {}{label} at ({:.1}, {:.1}) rotation {:.1} alpha {:.2}",
            entity.texture, entity.position.x, entity.position.y, entity.rotation, entity.alpha
        );
    }
}
