use clap::Parser;
use env_logger::Env;
use geotiff_fixtures::cli::Args;
use geotiff_fixtures::{io, Result};
use log::{debug, info, log_enabled, Level};
use std::path::Path;

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logger
    let log_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    info!("=== GeoTIFF Fixture Generator ===");

    let out_dir = Path::new(&args.out_dir);
    std::fs::create_dir_all(out_dir)?;

    for fixture in args.selected() {
        let built = fixture.build(out_dir)?;

        if let Some(sidecar) = &built.overview_sidecar {
            info!("External overviews: {}", sidecar.display());
        }
        if log_enabled!(Level::Debug) {
            let summary = io::read_summary(&built.path)?;
            debug!(
                "{}: {}x{}, {} bands, block {:?}, {} overviews",
                fixture.file_name(),
                summary.width,
                summary.height,
                summary.band_count,
                summary.block_size,
                summary.overview_count
            );
        }

        println!("Wrote {}", fixture.file_name());
    }

    info!("=== Done! ===");
    Ok(())
}
