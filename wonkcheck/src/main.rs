use std::{io::Write, path::PathBuf, process::ExitCode, time::Duration};

use wonkcheck::{check_font, interrupt, write_json, Error, Font, Selection};
use wonkiness::{Cancellation, EvaluationOptions, DEFAULT_RETRIES, DEFAULT_THRESHOLD};

#[derive(clap::Parser, Debug)]
#[command(version, about)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Compare glyph wonkiness before and after overlap removal
    Check {
        /// Comma separated instance names, or `all` [default: all]
        #[arg(long, value_delimiter = ',')]
        instances: Option<Vec<String>>,
        /// Whitespace separated glyph names [default: every simple glyph]
        #[arg(long)]
        glyphset: Option<String>,
        /// Flag pairs whose wonkiness increased by more than this
        #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
        threshold: f64,
        /// Also require the wonkiness to have grown by more than this
        /// fraction of its value before overlap removal, e.g. 0.1 for 10%
        #[arg(long)]
        relative: Option<f64>,
        /// Give up on a glyph after this many milliseconds per attempt
        #[arg(long)]
        timeout_ms: Option<u64>,
        /// Extra attempts after a timeout
        #[arg(long, default_value_t = DEFAULT_RETRIES)]
        retries: u32,
        /// Number of worker threads [default: one per core]
        #[arg(long)]
        jobs: Option<usize>,
        /// Print at most this many flagged glyphs
        #[arg(long)]
        top: Option<usize>,
        /// Write every report as JSON to this file, or `-` for stdout
        #[arg(long)]
        json: Option<PathBuf>,
        /// The font file to check
        font: PathBuf,
    },
    /// List the instances a font is checked at
    Instances {
        /// The font file to list
        font: PathBuf,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    use clap::Parser as _;
    let args = Args::parse_from(wild::args());
    match run(args.command) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("wonkcheck: {e}");
            ExitCode::from(2)
        }
    }
}

fn run(command: Command) -> Result<u8, Error> {
    match command {
        Command::Check {
            instances,
            glyphset,
            threshold,
            relative,
            timeout_ms,
            retries,
            jobs,
            top,
            json,
            font,
        } => {
            let font = Font::new(font)?;
            let selection = Selection::from_args(glyphset.as_deref(), instances);
            let options = EvaluationOptions::default()
                .with_threshold(threshold)
                .with_relative_threshold(relative)
                .with_timeout(timeout_ms.map(Duration::from_millis))
                .with_retries(retries);
            let cancel = Cancellation::new();
            let handler = cancel.clone();
            if let Err(e) = ctrlc::set_handler(move || {
                if interrupt(&handler) {
                    std::process::exit(130);
                }
            }) {
                log::warn!("interrupts will stop the check without a report: {e}");
            }
            let outcome = check_font(&font, &selection, options, jobs, &cancel)?;
            if outcome.cancelled {
                log::warn!("check was cancelled, reports are incomplete");
            }
            let reporter = outcome.reporter;

            let mut stdout = std::io::stdout().lock();
            match json.as_deref() {
                Some(path) if path.as_os_str() == "-" => {
                    write_json(font.path(), &reporter, &mut stdout)?;
                    writeln!(stdout)?;
                }
                Some(path) => {
                    let mut file = std::io::BufWriter::new(std::fs::File::create(path)?);
                    write_json(font.path(), &reporter, &mut file)?;
                    file.flush()?;
                }
                None => {
                    for report in reporter.flagged().take(top.unwrap_or(usize::MAX)) {
                        writeln!(stdout, "{report}")?;
                    }
                }
            }
            let mut stderr = std::io::stderr().lock();
            for report in reporter.failures() {
                writeln!(stderr, "{report}")?;
            }
            writeln!(stderr, "{}", reporter.summary())?;
            Ok(reporter.exit_status().code() as u8)
        }
        Command::Instances { font } => {
            let font = Font::new(font)?;
            let mut stdout = std::io::stdout().lock();
            for instance in font.instances() {
                writeln!(stdout, "{instance}")?;
            }
            Ok(0)
        }
    }
}
