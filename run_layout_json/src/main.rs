use raychain::{nalgebra::Rotation2, *};
use raychain_json::{deserialize_layout, serde_json, Layout};

use core::f64::consts::TAU;
use std::{error::Error, fs::File};

/// The source of the `frame`th frame out of `num_frames`: the layout's aim is
/// swept around the origin, one full turn over all frames.
fn frame_source(source: &Source, frame: usize, num_frames: usize) -> Source {
    let angle = TAU * frame as Float / num_frames as Float;
    let aim = source.origin + Rotation2::new(angle) * (source.aim - source.origin);
    Source::new(source.origin, aim)
}

fn run_frame(layout: &mut Layout, source: &Source, frame: usize) -> Result<(), Box<dyn Error>> {
    let propagation = layout
        .boundaries
        .propagate_frame(source.origin, source.aim, &layout.config)?;

    println!(
        "frame {frame}: source ({}, {}) aimed at ({:.3}, {:.3})",
        source.origin.x, source.origin.y, source.aim.x, source.aim.y,
    );

    for (i, segment) in propagation.chain.iter().enumerate() {
        let (start, end) = segment.endpoints();
        println!(
            "  ray {i}: ({:.3}, {:.3}) -> ({:.3}, {:.3}) [{:?}]",
            start.x, start.y, end.x, end.y, segment.status,
        );
    }

    let flags: Vec<_> = layout
        .boundaries
        .iter()
        .map(|b| if b.was_hit() { '1' } else { '0' })
        .collect();

    println!(
        "  hit flags: {}, outcome: {:?}",
        String::from_iter(flags),
        layout.boundaries.outcome(),
    );

    Ok(())
}

fn run_layout(json: &serde_json::Value, num_frames: usize) -> Result<(), Box<dyn Error>> {
    let mut layout = deserialize_layout(json)?;

    let source = layout
        .source
        .ok_or("the layout must provide a source to be run")?;

    log::info!(
        "running {num_frames} frame(s) over {} boundaries",
        layout.boundaries.len()
    );

    for frame in 0..num_frames {
        run_frame(&mut layout, &frame_source(&source, frame, num_frames), frame)?;
    }

    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let mut args = std::env::args().skip(1);

    let file_path = args
        .next()
        .ok_or("expected a file path as a first argument.")?;

    let num_frames = args
        .next()
        .map(|arg| arg.parse::<usize>())
        .transpose()
        .map_err(|_| "expected a number of frames as second argument")?
        .unwrap_or(1)
        .max(1);

    run_layout(&serde_json::from_reader(File::open(file_path)?)?, num_frames)
}
