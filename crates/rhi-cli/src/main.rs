mod scene;

use std::thread;
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};
use parking_lot::Mutex;
use rhi_command::commands::command_size;
use rhi_command::layout::{self, HEADER_SIZE};
use rhi_command::{CommandBuffer, CommandDispatchFunctionIndex, Rhi};
use rhi_core::config::{default_config_path, RhiConfig};
use rhi_null::NullRhi;
use tracing::info;

use crate::scene::DemoScene;

#[derive(Parser)]
#[command(name = "rhi")]
#[command(about = "RHI - record command buffers and replay them against the null backend")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record a demo frame on several threads, merge it and replay it
    Replay {
        /// Number of times the merged frame is submitted
        #[arg(short, long, default_value_t = 60)]
        frames: u32,

        /// Recording threads, one command buffer each
        #[arg(short, long, default_value_t = 4)]
        threads: usize,

        /// Objects drawn per frame
        #[arg(short, long, default_value_t = 256)]
        objects: usize,

        /// Configuration file path
        #[arg(short, long)]
        config: Option<String>,
    },

    /// Print the dispatch table with fixed-field and packet sizes
    Layout,
}

fn main() -> anyhow::Result<()> {
    rhi_common::init_logging();

    let cli = Cli::parse();

    match cli.command {
        Commands::Replay {
            frames,
            threads,
            objects,
            config,
        } => {
            let path = config.unwrap_or_else(default_config_path);
            let config = RhiConfig::load_or_default(&path);
            replay(&config, frames, threads.max(1), objects)?;
        }

        Commands::Layout => print_layout(),
    }

    Ok(())
}

fn replay(config: &RhiConfig, frames: u32, threads: usize, objects: usize) -> anyhow::Result<()> {
    let mut rhi = NullRhi::new(config.null_backend.clone());
    let scene = DemoScene::create(&rhi);
    info!(threads, objects, "recording frame");

    let started = Instant::now();
    let slots: Mutex<Vec<Option<CommandBuffer>>> = Mutex::new((0..threads).map(|_| None).collect());
    let per_thread = objects.div_ceil(threads);

    thread::scope(|scope| -> anyhow::Result<()> {
        let workers: Vec<_> = (0..threads)
            .map(|worker| {
                let scene = &scene;
                let slots = &slots;
                scope.spawn(move || -> anyhow::Result<()> {
                    let mut buffer = config.command_buffer.create_command_buffer();
                    if worker == 0 {
                        scene.record_begin_frame(&mut buffer)?;
                    }
                    let first = (worker * per_thread).min(objects);
                    let count = per_thread.min(objects - first);
                    scene.record_objects(&mut buffer, worker, first, count)?;
                    slots.lock()[worker] = Some(buffer);
                    Ok(())
                })
            })
            .collect();

        for worker in workers {
            worker
                .join()
                .map_err(|_| anyhow::anyhow!("recording thread panicked"))??;
        }
        Ok(())
    })?;

    let mut frame = config.command_buffer.create_command_buffer();
    for (worker, buffer) in slots.into_inner().into_iter().enumerate() {
        let mut buffer = buffer.with_context(|| format!("worker {} recorded nothing", worker))?;
        buffer
            .append_to_command_buffer_and_clear(&mut frame)
            .with_context(|| format!("merging worker {}", worker))?;
    }
    scene.record_end_frame(&mut frame)?;
    let recorded = started.elapsed();

    let started = Instant::now();
    for _ in 0..frames {
        rhi.submit_command_buffer(&frame);
        rhi.reset_state();
    }
    let replayed = started.elapsed();

    println!(
        "Recorded {} commands ({} bytes) on {} threads in {:?}",
        frame.number_of_commands(),
        frame.size(),
        threads,
        recorded
    );
    println!("Replayed {} frames in {:?}", frames, replayed);
    println!();
    println!("{}", rhi.statistics());
    Ok(())
}

fn print_layout() {
    println!("{:>5}  {:<40} {:>8} {:>8}", "index", "command", "fields", "packet");
    for index in CommandDispatchFunctionIndex::ALL {
        let fields = command_size(index);
        let packet = layout::align_up((HEADER_SIZE + fields) as u64);
        println!("{:>5}  {:<40} {:>8} {:>8}", index as u32, index.name(), fields, packet);
    }
}
