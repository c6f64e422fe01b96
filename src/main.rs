// mysqldump-table-csv: write the rows of one table in a gzip mysqldump to stdout as CSV.
//
//   mysqldump-table-csv /path/to/db.sql.gz table_name > table.csv

use clap::{CommandFactory, Parser};
use log::{debug, error, info, warn};
use mysqldump_table_csv::input::{is_corrupt_stream, open_dump};
use mysqldump_table_csv::logger;
use mysqldump_table_csv::progress::ProgressManager;
use mysqldump_table_csv::{CsvSink, DumpError, InterruptFlag, TableExtractor};
use std::io;
use std::path::PathBuf;
use std::process;
use std::time::Instant;

// Command-line flags and positional arguments.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Enable debug logging (disables the progress bar).
    #[arg(long)]
    debug: bool,

    /// Never draw a progress bar.
    #[arg(long)]
    no_progress: bool,

    /// Gzip-compressed mysqldump file.
    dump: PathBuf,

    /// Table to extract, without backticks.
    table: String,
}

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    if std::env::args_os().len() == 1 {
        eprintln!("{}", Args::command().render_help());
        process::exit(1);
    }
    let args = Args::parse();

    logger::init(args.debug);
    debug!("main: dump file {}", args.dump.display());
    debug!("main: table {}", args.table);

    let interrupt = match InterruptFlag::install() {
        Ok(flag) => flag,
        Err(e) => {
            warn!("main: Ctrl-C handler not installed: {}", e);
            InterruptFlag::new()
        }
    };

    // Progress bars are disabled in debug mode to avoid mangled output.
    let progress = ProgressManager::new(!args.debug && !args.no_progress);
    let bar = progress.new_file_bar(&args.dump);

    let start = Instant::now();
    let extractor = TableExtractor::new(args.table);
    let result = open_dump(&args.dump, bar.clone()).and_then(|reader| {
        let mut sink = CsvSink::new(io::stdout().lock());
        extractor.run(reader, &mut sink, &interrupt, bar.is_none())
    });

    if let Some(b) = &bar {
        b.finish_and_clear();
    }

    match result {
        Ok(summary) => {
            info!(
                "Wrote {} rows of `{}` from {} INSERT statements ({} lines, {}) in {:?}",
                summary.rows,
                extractor.table(),
                summary.statements,
                summary.lines,
                summary.stop,
                start.elapsed()
            );
            Ok(())
        }
        Err(e) => {
            error!("{}", e);
            if let DumpError::Read { source, .. } = &e {
                if is_corrupt_stream(source) {
                    error!("{} does not look like a gzip file", args.dump.display());
                }
            }
            process::exit(1);
        }
    }
}
