//! Hand-rolled argument handling and the outer retry driver.
//!
//! Generation itself is deterministic and single-shot (`tilegen::assemble`).
//! Since a connector can exhaust its attempt budget and fail, this binary
//! wraps it in a retry loop that tries a handful of seeds before giving up.
//! That loop is the caller the core spec places outside the engine's own
//! responsibility.

use std::path::PathBuf;

use map::Map;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::{GeneratorConfig, SeedPolicy};
use crate::driver::{assemble, random_seed};
use crate::error::GenError;
use crate::tileset::load_tileset;

pub enum CliRes {
    NoCli,
    Ok,
    Err,
}

const OUTER_RETRIES: u32 = 8;

struct Args {
    tileset_dir: PathBuf,
    base_map: PathBuf,
    output: PathBuf,
    config: Option<PathBuf>,
}

pub fn print_usage() {
    print_help();
}

fn print_help() {
    println!(
        "\
tilegen

Assembles a map by snapping tileset pieces together along connector points.

tilegen <tileset_dir> <base_map.map> <output.map> [--config <config.toml>]
"
    );
}

fn parse_args() -> Option<Args> {
    let mut positional = Vec::new();
    let mut config = None;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--config" {
            config = args.next().map(PathBuf::from);
        } else {
            positional.push(arg);
        }
    }

    if positional.len() != 3 {
        return None;
    }

    Some(Args {
        tileset_dir: PathBuf::from(&positional[0]),
        base_map: PathBuf::from(&positional[1]),
        output: PathBuf::from(&positional[2]),
        config,
    })
}

pub fn cli() -> CliRes {
    if std::env::args().len() <= 1 {
        return CliRes::NoCli;
    }

    let Some(args) = parse_args() else {
        print_help();
        return CliRes::Err;
    };

    match run(args) {
        Ok(()) => CliRes::Ok,
        Err(report) => {
            eprintln!("tilegen: {report:?}");
            CliRes::Err
        }
    }
}

fn run(args: Args) -> eyre::Result<()> {
    let config = match args.config {
        Some(path) => GeneratorConfig::from_file(path)?,
        None => GeneratorConfig::default(),
    };

    println!("loading tileset from {}", args.tileset_dir.display());
    let tileset = load_tileset(&args.tileset_dir)?;
    println!(
        "loaded {} start, {} ordinary, {} cap tile(s)",
        tileset.start.len(),
        tileset.ordinary.len(),
        tileset.cap.len()
    );

    let base = Map::from_file(&args.base_map)?;

    let mut seed_rng = StdRng::seed_from_u64(match config.seed {
        SeedPolicy::Force(seed) | SeedPolicy::Override(seed) => seed,
        SeedPolicy::Random => rand::random(),
    });

    for attempt in 0..OUTER_RETRIES {
        let seed = match config.seed {
            SeedPolicy::Force(seed) if attempt == 0 => seed,
            SeedPolicy::Override(seed) if attempt == 0 => seed,
            _ => random_seed(&mut seed_rng),
        };

        println!("attempt {}/{OUTER_RETRIES}: seed={seed}", attempt + 1);
        let mut rng = StdRng::seed_from_u64(seed);

        let result = assemble(base.clone(), &tileset, &config, &mut rng)?;
        println!("placed {} tile(s)", result.placed.len());

        if result.success {
            result.map.write(&args.output)?;
            println!("wrote {}", args.output.display());
            return Ok(());
        }

        println!("generation failed on this seed, retrying");
    }

    Err(GenError::PlacementFailure.into())
}
