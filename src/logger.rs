// Logging setup: `log` macros everywhere, `env_logger` writing to stderr.
// RUST_LOG is honored for other crates; this crate's level follows --debug.

use log::LevelFilter;
use std::io::Write;
use std::time::{SystemTime, UNIX_EPOCH};

// Initialize the global logger. Safe to call more than once.
pub fn init(debug: bool) {
    let level = if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let mut builder = env_logger::Builder::from_default_env();
    builder.filter_module("mysqldump_table_csv", level);
    builder.format(|buf, record| {
        writeln!(buf, "[{}] {} {}", record.level(), unix_seconds(), record.args())
    });

    // Already initialized (tests, repeated calls) is fine.
    let _ = builder.try_init();
}

fn unix_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
