use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use ffmpeg_probe::api::{enumerate_codecs, enumerate_filters, to_host_value};
use ffmpeg_probe::audit::{Denylist, audit};
use ffmpeg_probe::dist::{ElectronPlatform, libffmpeg_path};
use ffmpeg_probe::error::{AppError, ProbeError};
use ffmpeg_probe::path::LibraryPath;
use ffmpeg_probe::platform::SystemLoader;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser, Debug)]
#[command(name = "ffmpeg_probe")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// list the codecs known to the library
    Codecs {
        #[command(flatten)]
        library: LibraryArgs,

        /// print the records as JSON
        #[arg(long)]
        json: bool,
    },

    /// list the bitstream filters known to the library
    Filters {
        #[command(flatten)]
        library: LibraryArgs,

        /// print the records as JSON
        #[arg(long)]
        json: bool,
    },

    /// fail if the library knows about proprietary codecs
    Audit {
        #[command(flatten)]
        library: LibraryArgs,

        /// TOML file with `names = [...]` (default: h264, aac)
        #[arg(long)]
        denylist: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct LibraryArgs {
    /// absolute path to the ffmpeg shared library
    #[arg(
        long,
        short = 'a',
        conflicts_with = "electron_dist",
        required_unless_present = "electron_dist"
    )]
    absolute_path: Option<String>,

    /// electron distribution location
    #[arg(long, short = 'd')]
    electron_dist: Option<PathBuf>,

    /// where the library is located within the electron distribution (default: this platform)
    #[arg(long, short = 'p', value_enum, requires = "electron_dist")]
    platform: Option<ElectronPlatform>,
}

impl LibraryArgs {
    fn resolve(&self) -> Result<LibraryPath, AppError> {
        let path = match (&self.absolute_path, &self.electron_dist) {
            (Some(path), _) => LibraryPath::new(path.as_str())?,
            (None, Some(dist)) => {
                let platform = self.platform.unwrap_or_else(ElectronPlatform::current);
                LibraryPath::from_path(&libffmpeg_path(dist, platform))?
            }
            (None, None) => {
                return Err(ProbeError::InvalidArguments { expected: 1, actual: 0 }.into());
            }
        };
        Ok(path)
    }
}

fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), AppError> {
    match cli.command {
        Command::Codecs { library, json } => {
            let path = library.resolve()?;
            tracing::info!(library = %path, "listing codecs..");
            let codecs = enumerate_codecs(&SystemLoader, &path)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&to_host_value(&codecs)?)?);
            } else {
                for codec in &codecs {
                    println!("{:>6}  {:<24} {}", codec.id, codec.name, codec.long_name);
                }
            }
        }
        Command::Filters { library, json } => {
            let path = library.resolve()?;
            tracing::info!(library = %path, "listing bitstream filters..");
            let filters = enumerate_filters(&SystemLoader, &path)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&to_host_value(&filters)?)?);
            } else {
                for filter in &filters {
                    println!("{}", filter.name);
                }
            }
        }
        Command::Audit { library, denylist } => {
            let path = library.resolve()?;
            let denylist = match denylist {
                Some(file) => Denylist::from_file(&file)?,
                None => Denylist::default(),
            };

            let codecs = enumerate_codecs(&SystemLoader, &path)?;
            let report = audit(&codecs, &denylist);
            report.ensure_clean()?;

            tracing::info!(library = %path, total = report.total, "audit passed");
            println!(
                "\"{path}\" does not contain proprietary codecs ({} found).",
                report.total
            );
        }
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_writer(std::io::stderr).with_env_filter(filter).init();
}
