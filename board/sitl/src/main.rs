use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use hal::{OrientationSensor, SerialOutput};
use log::info;
use streamer::{OrientationStreamer, StreamerResult};

use crate::board::SitlBoard;
use crate::cli::{Args, Mode};

mod board;
mod cli;
mod sim;

enum State {
    Initializing,
    Running,
    Stopping,
}

/// One poll, format and write in the selected mode
fn run_cycle<S: OrientationSensor, W: SerialOutput>(
    streamer: &mut OrientationStreamer<S, W>,
    mode: Mode,
    axes: [bool; 3],
) -> StreamerResult<()> {
    match mode {
        Mode::Continuous => streamer.stream_continuous(),
        Mode::Delta => streamer.stream_delta_flags().map(|_| ()),
        Mode::Labeled => streamer.stream_labeled(),
        Mode::Selective => streamer.stream_selective(axes[0], axes[1], axes[2]),
    }
}

fn main() -> anyhow::Result<()> {
    // stdout carries the stream, logs go to stderr
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = args.config()?;
    let axes = args.selected_axes()?;

    let board = SitlBoard::new(!args.absent);
    info!("Board: {}", board.name());
    let (sensor, serial) = board.split_resources();
    let mut streamer = OrientationStreamer::new(sensor, serial);

    let mut state = State::Initializing;
    let mut minimum_elapsed_duration = Duration::ZERO;
    let mut last_update_time = Instant::now();
    let mut update_cycle_count: u64 = 0;
    loop {
        let elapsed = last_update_time.elapsed();
        if elapsed < minimum_elapsed_duration {
            std::thread::sleep(minimum_elapsed_duration - elapsed);
        }
        last_update_time = Instant::now();

        match state {
            State::Initializing => {
                info!("Initializing...");
                // fail-stop: a missing sensor ends the process
                streamer
                    .initialize(config.clone())
                    .context("orientation sensor initialization failed")?;
                minimum_elapsed_duration = streamer.latency()?;
                info!(
                    "Streaming at {:?} baud, external crystal: {}",
                    streamer.serial().baud_rate(),
                    streamer.sensor().ext_crystal()
                );
                state = State::Running;
            }
            State::Running => {
                run_cycle(&mut streamer, args.mode, axes)?;
                update_cycle_count += 1;
                if args.cycles != 0 && update_cycle_count >= args.cycles {
                    state = State::Stopping;
                }
            }
            State::Stopping => {
                info!("Stopping after {} cycles", update_cycle_count);
                break;
            }
        }
    }
    Ok(())
}
