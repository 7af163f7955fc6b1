//! OSRM dataset preparation (download + preprocess) for integration tests.
//!
//! Fetches a Geofabrik extract and runs the dockerized OSRM toolchain over
//! it so `osrm-routed` can serve real road data locally.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;
use tracing::info;

/// Geofabrik region used by the realistic fixtures.
pub const DEFAULT_REGION: &str = "north-america/us/new-york";

#[derive(Debug, Error)]
pub enum OsrmDataError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("extract download failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("preprocessing failed: {0}")]
    Process(String),
}

#[derive(Debug, Clone)]
pub struct GeofabrikRegion {
    /// Geofabrik region path, e.g. "north-america/us/new-york".
    pub path: String,
}

impl GeofabrikRegion {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    pub fn name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or("region")
    }

    pub fn url(&self) -> String {
        format!("https://download.geofabrik.de/{}-latest.osm.pbf", self.path)
    }
}

#[derive(Debug, Clone)]
pub struct OsrmDatasetConfig {
    pub region: GeofabrikRegion,
    pub data_root: PathBuf,
}

impl OsrmDatasetConfig {
    pub fn new(region: GeofabrikRegion, data_root: impl Into<PathBuf>) -> Self {
        Self {
            region,
            data_root: data_root.into(),
        }
    }
}

/// A prepared OSRM dataset on disk, ready for `osrm-routed --algorithm mld`.
#[derive(Debug, Clone)]
pub struct OsrmDataset {
    pub data_dir: PathBuf,
    pub osrm_base: PathBuf,
    pub pbf_path: PathBuf,
}

impl OsrmDataset {
    /// Downloads and preprocesses the region if needed; cached runs are
    /// detected by the files already on disk.
    pub fn ensure(config: &OsrmDatasetConfig) -> Result<Self, OsrmDataError> {
        let data_root = if config.data_root.is_absolute() {
            config.data_root.clone()
        } else {
            std::env::current_dir()?.join(&config.data_root)
        };
        let data_dir = data_root.join(config.region.name());
        fs::create_dir_all(&data_dir)?;

        let pbf_path = data_dir.join(format!("{}-latest.osm.pbf", config.region.name()));
        if !pbf_path.exists() {
            info!(url = %config.region.url(), "downloading Geofabrik extract");
            download_pbf(&config.region.url(), &pbf_path)?;
        }

        let osrm_base = data_dir.join(format!("{}-latest.osrm", config.region.name()));
        if !osrm_base.exists() {
            info!(pbf = %pbf_path.display(), "running osrm-extract");
            run_osrm_tool(
                &[
                    "osrm-extract",
                    "-p",
                    "/opt/car.lua",
                    &format!("/data/{}", file_name(&pbf_path)),
                ],
                &data_dir,
            )?;
        }

        if !mld_ready(&osrm_base) {
            info!(base = %osrm_base.display(), "running osrm-partition/customize");
            run_osrm_tool(
                &["osrm-partition", &format!("/data/{}", file_name(&osrm_base))],
                &data_dir,
            )?;
            run_osrm_tool(
                &["osrm-customize", &format!("/data/{}", file_name(&osrm_base))],
                &data_dir,
            )?;
        }

        Ok(Self {
            data_dir,
            osrm_base,
            pbf_path,
        })
    }
}

fn download_pbf(url: &str, dest: &Path) -> Result<(), OsrmDataError> {
    let response = reqwest::blocking::get(url)?.error_for_status()?;
    let tmp_path = dest.with_extension("tmp");
    let mut writer = BufWriter::new(File::create(&tmp_path)?);
    writer.write_all(&response.bytes()?)?;
    writer.flush()?;
    fs::rename(tmp_path, dest)?;
    Ok(())
}

fn mld_ready(osrm_base: &Path) -> bool {
    osrm_base.exists()
        && osrm_base.with_extension("osrm.partition").exists()
        && osrm_base.with_extension("osrm.mldgr").exists()
        && osrm_base.with_extension("osrm.cells").exists()
}

fn run_osrm_tool(args: &[&str], data_dir: &Path) -> Result<(), OsrmDataError> {
    let status = Command::new("docker")
        .arg("run")
        .arg("--rm")
        .arg("-t")
        .arg("-v")
        .arg(format!("{}:/data", data_dir.display()))
        .arg("osrm/osrm-backend")
        .args(args)
        .status()?;

    if status.success() {
        Ok(())
    } else {
        Err(OsrmDataError::Process(format!(
            "docker exited with status {status}"
        )))
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default()
        .to_string()
}
