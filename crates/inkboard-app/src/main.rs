//! Inkboard replay binary.
//!
//! Usage: `inkboard-replay [script.json] [out.png]`

use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Starting Inkboard replay");

    let mut args = std::env::args().skip(1);
    let script = args.next().map(PathBuf::from);
    let output = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("inkboard.png"));

    let (png, outcome) = match inkboard_app::run(script.as_deref()) {
        Ok(result) => result,
        Err(e) => {
            log::error!("Replay failed: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = std::fs::write(&output, &png) {
        log::error!("Failed to write {}: {e}", output.display());
        return ExitCode::FAILURE;
    }

    log::info!(
        "Wrote {} ({} objects, {} selected, {} appends, {} rebuilds)",
        output.display(),
        outcome.objects,
        outcome.selected,
        outcome.stats.appends,
        outcome.stats.rebuilds
    );
    ExitCode::SUCCESS
}
