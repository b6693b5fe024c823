mod emulator;

use clap::{Parser, ValueEnum};
use dmg_core::dmg::VideoConfig;
use dmg_core::video::registers::Quirks;
use dmg_core::video::tile::{FourShade, Monochrome, PaletteResolver};
use dmg_core::video::{Frame, SCREEN_HEIGHT, SCREEN_WIDTH};
use emulator::{Cadence, Emulator};
use image::{GrayImage, ImageBuffer, Luma};
use log::{LevelFilter, error, info};
use simple_logger::SimpleLogger;
use std::error::Error;
use std::path::Path;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum PaletteChoice {
    /// Two levels, a pixel is dark when either bitplane is set
    Mono,
    /// Four shades through the BGP register
    Dmg,
}

#[derive(Parser, Debug)]
struct Args {
    /// Enable trace-level logging (highest verbosity, incl. scanline decodes and interrupts)
    #[arg(long)]
    trace: bool,

    /// Enable debug-level logging (mostly frame presentation)
    #[arg(long)]
    debug: bool,

    /// Path to a 64 KiB memory snapshot, optionally zipped
    #[arg(long)]
    snapshot: String,

    /// Number of frames to emulate
    #[arg(long, default_value_t = 600)]
    frames: usize,

    /// Save every Nth presented frame
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u64).range(1..))]
    every: u64,

    /// Output directory for PNG screenshots
    #[arg(long, default_value = "screenshots")]
    out: String,

    #[arg(long, value_enum, default_value_t = PaletteChoice::Mono)]
    palette: PaletteChoice,

    /// Use documented STAT interrupt sources instead of the reference fall-through
    #[arg(long)]
    strict_stat: bool,

    /// STAT writes may only set interrupt enables
    #[arg(long)]
    sticky_stat: bool,

    /// Cycles per step when no cycle trace is given
    #[arg(long, default_value_t = 4, value_parser = clap::value_parser!(u32).range(1..))]
    cycles_per_step: u32,

    /// File with one cycle count per line, replayed in a loop
    #[arg(long)]
    cycle_trace: Option<String>,
}

impl Args {
    fn video_config(&self) -> VideoConfig {
        let mut quirks = Quirks::default();
        if self.strict_stat {
            quirks.remove(Quirks::STAT_MODE2_FALLTHROUGH);
        }
        if self.sticky_stat {
            quirks.insert(Quirks::STICKY_STAT_WRITES);
        }

        let palette: Box<dyn PaletteResolver> = match self.palette {
            PaletteChoice::Mono => Box::new(Monochrome),
            PaletteChoice::Dmg => Box::new(FourShade),
        };

        VideoConfig { quirks, palette }
    }

    fn cadence(&self) -> Result<Cadence, Box<dyn Error>> {
        match &self.cycle_trace {
            Some(path) => Cadence::from_trace(&std::fs::read_to_string(path)?),
            None => Ok(Cadence::Fixed(self.cycles_per_step)),
        }
    }
}

fn write_png(frame: &Frame, path: &Path) -> Result<(), Box<dyn Error>> {
    let w = SCREEN_WIDTH as u32;
    let h = SCREEN_HEIGHT as u32;

    let img: GrayImage = ImageBuffer::from_fn(w, h, |x, y| Luma([frame[y as usize][x as usize].intensity()]));
    img.save(path)?;

    Ok(())
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    std::fs::create_dir_all(&args.out)?;

    let mut emulator = Emulator::new(&args.snapshot, args.video_config(), args.cadence()?)?;

    let mut presented = 0u64;
    for _ in 0..args.frames {
        let Some(frame) = emulator.run_to_frame() else {
            break;
        };

        presented += 1;
        if presented % args.every == 0 {
            let path = Path::new(&args.out).join(format!("{}.png", presented / args.every));
            write_png(&frame, &path)?;
            info!("Saved {}", path.display());
        }
    }

    info!(
        "{} frames presented, {} STAT interrupts serviced",
        presented,
        emulator.stat_interrupts()
    );

    Ok(())
}

fn main() {
    let args = Args::parse();

    let level = if args.trace {
        LevelFilter::Trace
    } else if args.debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    // core components log under their own targets
    let mut logger = SimpleLogger::new().with_level(LevelFilter::Off);
    for target in ["frame_dump", "dmg_core", "lcd", "ppu", "mmio", "irq"] {
        logger = logger.with_module_level(target, level);
    }
    logger.init().unwrap();

    if let Err(e) = run(&args) {
        error!("{}", e);
        std::process::exit(1);
    }
}
