// src/config.rs
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use clap::Parser;
use log::info;

use crate::code_tables::IsoCodes;
use crate::errors::{MapperError, MapperResult};

/// Maps a Dow Jones watchlist XML file to entity-resolution JSON lines
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct MapperArgs {
    /// A Dow Jones xml file for PFA or HRF
    #[arg(short = 'i', long, env = "INPUT_FILE")]
    pub input_file: Option<PathBuf>,

    /// Output filename, defaults to the input file name with a .json extension
    #[arg(short = 'o', long, env = "OUTPUT_FILE")]
    pub output_file: Option<PathBuf>,

    /// Optional statistics filename (json format)
    #[arg(short = 'l', long, env = "LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// DJ-PFA or DJ-HRF; inferred from the input file name when omitted
    #[arg(short = 'd', long, env = "DATA_SOURCE")]
    pub data_source: Option<String>,

    /// ISO country code size, either 2 or 3
    #[arg(short = 'c', long, env = "ISO_COUNTRY_SIZE", default_value_t = 3)]
    pub iso_country_size: u8,

    /// Directory holding isoCountries2/3.json and isoStates.json
    #[arg(short = 'a', long, env = "MAPPER_ASSETS_DIR")]
    pub assets_dir: Option<PathBuf>,

    /// Emit "Related to" summaries instead of typed relationship facts
    #[arg(long, env = "NO_RELATIONSHIPS")]
    pub no_relationships: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    DjPfa,
    DjHrf,
}

impl DataSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataSource::DjPfa => "DJ-PFA",
            DataSource::DjHrf => "DJ-HRF",
        }
    }

    /// PFA or HRF anywhere in the file name picks the source.
    pub fn infer_from_path(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_string_lossy().to_uppercase();
        if name.contains("PFA") {
            Some(DataSource::DjPfa)
        } else if name.contains("HRF") {
            Some(DataSource::DjHrf)
        } else {
            None
        }
    }
}

impl FromStr for DataSource {
    type Err = MapperError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "DJ-PFA" => Ok(DataSource::DjPfa),
            "DJ-HRF" => Ok(DataSource::DjHrf),
            other => Err(MapperError::Configuration(format!(
                "unrecognised data source '{}', please use DJ-PFA or DJ-HRF",
                other
            ))),
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated settings for one run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub input_file: PathBuf,
    pub output_file: PathBuf,
    pub log_file: Option<PathBuf>,
    pub data_source: DataSource,
    pub iso_country_size: u8,
    pub assets_dir: PathBuf,
    pub no_relationships: bool,
}

impl RunConfig {
    /// Checks every precondition before the input is opened.
    pub fn from_args(args: MapperArgs) -> MapperResult<Self> {
        let input_file = args.input_file.ok_or_else(|| {
            MapperError::Configuration("please select a Dow Jones xml input file".to_string())
        })?;
        if !input_file.exists() {
            return Err(MapperError::InputMissing { path: input_file });
        }

        let data_source = match args.data_source.as_deref() {
            Some(tag) => tag.parse()?,
            None => DataSource::infer_from_path(&input_file).ok_or_else(|| {
                MapperError::Configuration(
                    "please specify either DJ-PFA or DJ-HRF as the data source".to_string(),
                )
            })?,
        };

        if !matches!(args.iso_country_size, 2 | 3) {
            return Err(MapperError::Configuration(format!(
                "the ISO country size must be 2 or 3, got {}",
                args.iso_country_size
            )));
        }

        let assets_dir = args.assets_dir.unwrap_or_else(default_assets_dir);
        let (country_asset, state_asset) = IsoCodes::asset_paths(&assets_dir, args.iso_country_size);
        for asset in [country_asset, state_asset] {
            if !asset.exists() {
                return Err(MapperError::AssetMissing { path: asset });
            }
        }

        let output_file = args.output_file.unwrap_or_else(|| {
            let mut name = input_file.clone().into_os_string();
            name.push(".json");
            PathBuf::from(name)
        });

        Ok(Self {
            input_file,
            output_file,
            log_file: args.log_file,
            data_source,
            iso_country_size: args.iso_country_size,
            assets_dir,
            no_relationships: args.no_relationships,
        })
    }

    pub fn log_config(&self) {
        info!("Data source set to {}", self.data_source);
        info!(
            "Input: {}, output: {}, statistics: {}",
            self.input_file.display(),
            self.output_file.display(),
            self.log_file
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "none".to_string())
        );
        info!(
            "ISO country size {}, assets from {}, relationships {}",
            self.iso_country_size,
            self.assets_dir.display(),
            if self.no_relationships { "summarised" } else { "detailed" }
        );
    }
}

/// `assets` beside the executable when present, otherwise `./assets`.
fn default_assets_dir() -> PathBuf {
    env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("assets")))
        .filter(|dir| dir.is_dir())
        .unwrap_or_else(|| PathBuf::from("assets"))
}
