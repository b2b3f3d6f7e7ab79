use std::{env, error::Error, fs::File};

use raychain::{SimulationConfig, Source, DEFAULT_CAPACITY};
use raychain_json::{serde_json, serialize_layout, Layout};
use raychain_random::*;

fn generate_random_layout(num_boundaries: usize) -> serde_json::Value {
    let mut rng = rand::thread_rng();

    let layout = Layout::<DEFAULT_CAPACITY> {
        boundaries: random_boundaries(&mut rng, num_boundaries),
        source: Some(Source::random(&mut rng)),
        config: SimulationConfig::default(),
    };

    if num_boundaries > DEFAULT_CAPACITY {
        log::warn!("only {DEFAULT_CAPACITY} boundaries fit in a layout, generated that many");
    }

    serialize_layout(&layout)
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let mut args = env::args().skip(1);

    let file_path = args
        .next()
        .ok_or("please provide a path to serialize the layout json data")?;

    let num_boundaries = args
        .next()
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(DEFAULT_CAPACITY);

    let json = generate_random_layout(num_boundaries);

    serde_json::to_writer_pretty(File::create(file_path)?, &json)?;

    Ok(())
}
