//! Runtime configuration from the command line.

use crate::error::{Error, Result};
use crate::export::DEFAULT_EXPORT_FILE_NAME;
use std::ffi::OsString;
use std::path::PathBuf;

pub const DEFAULT_TILE_SIZE: f32 = 320.0;
pub const MIN_TILE_SIZE: f32 = 120.0;
pub const MAX_TILE_SIZE: f32 = 1024.0;

pub const HELP: &str = "\
visor - image gallery with pan, zoom, filters and PNG export

USAGE:
    visor [OPTIONS] [PATH...]

OPTIONS:
    --export-dir DIR     Directory exports are written to (default: downloads)
    --export-name NAME   Export file name (default: imagen-editada.png)
    --tile-size PX       Tile width in points, 120-1024 (default: 320)
    -h, --help           Print help
    -V, --version        Print version

PATH may be image files or directories. RUST_LOG sets the log filter.
";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub export_dir: PathBuf,
    pub export_file_name: String,
    pub tile_size: f32,
    /// Files or directories uploaded at startup.
    pub initial_paths: Vec<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            export_dir: default_export_dir(),
            export_file_name: DEFAULT_EXPORT_FILE_NAME.to_string(),
            tile_size: DEFAULT_TILE_SIZE,
            initial_paths: Vec::new(),
        }
    }
}

fn default_export_dir() -> PathBuf {
    dirs::download_dir().unwrap_or_else(|| PathBuf::from("."))
}

/// What `main` should do.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Run(Config),
    Help,
    Version,
}

impl Config {
    /// Parses process arguments.
    pub fn from_env() -> Result<Command> {
        Self::parse(std::env::args_os().skip(1).collect())
    }

    pub fn parse(args: Vec<OsString>) -> Result<Command> {
        let mut args = pico_args::Arguments::from_vec(args);
        if args.contains(["-h", "--help"]) {
            return Ok(Command::Help);
        }
        if args.contains(["-V", "--version"]) {
            return Ok(Command::Version);
        }

        let mut config = Config::default();
        let export_dir = args
            .opt_value_from_os_str("--export-dir", parse_path)
            .map_err(arg_error)?;
        if let Some(dir) = export_dir {
            config.export_dir = dir;
        }
        let export_name = args
            .opt_value_from_str::<_, String>("--export-name")
            .map_err(arg_error)?;
        if let Some(name) = export_name {
            if name.is_empty() || name.contains(['/', '\\']) {
                return Err(Error::Config(format!("invalid export name: {name:?}")));
            }
            config.export_file_name = name;
        }
        if let Some(size) = args.opt_value_from_str::<_, f32>("--tile-size").map_err(arg_error)? {
            if !size.is_finite() {
                return Err(Error::Config(format!("invalid tile size: {size}")));
            }
            config.tile_size = size.clamp(MIN_TILE_SIZE, MAX_TILE_SIZE);
        }

        for arg in args.finish() {
            if arg.to_string_lossy().starts_with("--") {
                return Err(Error::Config(format!("unknown option: {}", arg.to_string_lossy())));
            }
            config.initial_paths.push(PathBuf::from(arg));
        }
        Ok(Command::Run(config))
    }
}

fn parse_path(s: &std::ffi::OsStr) -> std::result::Result<PathBuf, &'static str> {
    Ok(PathBuf::from(s))
}

fn arg_error(e: pico_args::Error) -> Error {
    Error::Config(e.to_string())
}
