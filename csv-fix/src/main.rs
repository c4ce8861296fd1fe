//! csv-fix - prepare exported CSV files for database import
//!
//! Run from the directory holding the exports:
//!
//! ```bash
//! csv-fix      # writes *_fixed.csv next to each export it finds
//! ```
//!
//! Set `RUST_LOG=csvfix=debug` for per-file diagnostics on stderr.

use csvfix::{init_tracing, run, ConsoleLog, FixConfig};
use tracing::debug;

fn main() {
    init_tracing();

    let config = FixConfig::default();
    let mut log = ConsoleLog::stdout();

    match run(&config, &mut log) {
        Ok(report) => {
            debug!(
                report = %serde_json::to_string(&report).unwrap_or_default(),
                "run finished"
            );
        }
        Err(e) => {
            log.error(format!("Error: {}", e));
            std::process::exit(1);
        }
    }
}
