use std::{
    fs::File,
    io::BufWriter,
    path::Path,
    thread,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use nestor_core::{
    Nes, NesConfig, StartAddress,
    controller::Button,
    ppu::{SCREEN_HEIGHT, SCREEN_WIDTH, frame::FrameBuffer},
};

use crate::args::Args;

const FRAME_DURATION: Duration = Duration::from_nanos(1_000_000_000 / 60);

pub fn run(args: &Args) -> Result<()> {
    let config = NesConfig {
        start: args
            .start_address
            .map_or(StartAddress::ResetVector, StartAddress::Fixed),
    };
    let mut nes = Nes::from_rom_file(&args.rom, config)
        .with_context(|| format!("loading {}", args.rom.display()))?;

    for &held in &args.hold {
        nes.set_button(0, Button::from(held), true);
    }

    let started = Instant::now();
    let mut next_frame = started;
    for frame in 0..args.frames {
        nes.run_frame()
            .with_context(|| format!("emulation stopped during frame {frame}"))?;

        if args.realtime {
            next_frame += FRAME_DURATION;
            if let Some(wait) = next_frame.checked_duration_since(Instant::now()) {
                thread::sleep(wait);
            }
        }
    }

    let elapsed = started.elapsed();
    tracing::info!(
        frames = nes.frame_count(),
        cpu_cycles = nes.cycles(),
        elapsed_ms = elapsed.as_millis() as u64,
        "run finished"
    );
    for (diagnostic, count) in nes.diagnostics().snapshot() {
        tracing::info!(count, "{diagnostic}");
    }

    if let Some(path) = &args.png {
        write_png(path, &nes.frame_buffer())
            .with_context(|| format!("writing {}", path.display()))?;
        tracing::info!("last frame written to {}", path.display());
    }
    Ok(())
}

fn write_png(path: &Path, frame: &FrameBuffer) -> Result<()> {
    let file = BufWriter::new(File::create(path)?);
    let mut encoder = png::Encoder::new(file, SCREEN_WIDTH as u32, SCREEN_HEIGHT as u32);
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(&frame.to_rgb8())?;
    writer.finish()?;
    Ok(())
}
