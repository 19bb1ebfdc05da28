//! Inkboard App Library
//!
//! Headless host for the drawing engine: replays JSON pointer scripts and
//! exports the resulting frame as PNG.

mod export;
mod script;

pub use export::encode_png;
pub use script::{ColorSpec, ReplayOutcome, Script, ScriptError, Step, replay};

use std::path::Path;

/// Replay the script at `path`, or the built-in demo when `path` is `None`,
/// and return the encoded PNG.
pub fn run(path: Option<&Path>) -> Result<(Vec<u8>, ReplayOutcome), ScriptError> {
    let script = match path {
        Some(path) => {
            log::info!("Loading script from {}", path.display());
            Script::from_json(&std::fs::read_to_string(path)?)?
        }
        None => {
            log::info!("No script given, replaying demo");
            Script::demo()
        }
    };
    let outcome = replay(&script)?;
    let png = encode_png(&outcome.image)?;
    Ok((png, outcome))
}
