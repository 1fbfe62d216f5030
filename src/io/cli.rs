//! Command-line interface for batch fishnet generation over boundary files

use crate::algorithm::clip::ClipMode;
use crate::algorithm::lattice::OriginAlignment;
use crate::algorithm::materializer::{GridConfig, Materializer};
use crate::algorithm::observer::{ProgressObserver, Silent};
use crate::analysis::statistics::AreaSummary;
use crate::io::centroids::write_centroids;
use crate::io::configuration::{
    AreaUnit, CENTROIDS_SUFFIX, DEFAULT_CELL_SIZE, INPUT_EXTENSIONS, OUTPUT_EXTENSION,
    OUTPUT_SUFFIX, PREVIEW_SUFFIX,
};
use crate::io::error::{Result, WithPath, invalid_parameter};
use crate::io::preview::export_preview;
use crate::io::progress::ProgressManager;
use crate::io::vector::{WriteOptions, read_region, write_fishnet};
use crate::spatial::crs::Crs;
use clap::{ArgAction, Parser};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "fishnet")]
#[command(
    author,
    version,
    about = "Generate fishnet grids clipped to region boundaries"
)]
/// Command-line arguments for the fishnet generator
// CLI tools commonly need multiple boolean flags for various features and user preferences
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Input GeoJSON boundary file or directory to process
    #[arg(value_name = "TARGET")]
    pub target: PathBuf,

    /// Cell edge length in working CRS units
    #[arg(short, long, default_value_t = DEFAULT_CELL_SIZE)]
    pub cell_size: f64,

    /// CRS of inputs that do not declare one (defaults to WGS84)
    #[arg(long, value_parser = parse_crs, value_name = "EPSG:CODE")]
    pub input_crs: Option<Crs>,

    /// Projected CRS for the lattice and areas (defaults to the local UTM zone)
    #[arg(long, value_parser = parse_crs, value_name = "EPSG:CODE")]
    pub working_crs: Option<Crs>,

    /// CRS of written geometries (defaults to the working CRS)
    #[arg(long, value_parser = parse_crs, value_name = "EPSG:CODE")]
    pub output_crs: Option<Crs>,

    /// Anchor the lattice at a fixed working CRS point instead of the bounding box
    #[arg(long, value_parser = parse_origin, value_name = "X,Y", allow_hyphen_values = true)]
    pub origin: Option<OriginAlignment>,

    /// Unit of reported cell areas
    #[arg(short, long, value_enum, default_value_t = AreaUnit::SquareKilometers)]
    pub unit: AreaUnit,

    /// Emit one cell per boundary feature instead of one per lattice cell
    #[arg(long)]
    pub per_feature: bool,

    /// Disable parallel evaluation
    #[arg(long)]
    pub sequential: bool,

    /// Repair invalid boundary polygons instead of rejecting them
    #[arg(short, long)]
    pub repair: bool,

    /// Write a PNG coverage preview next to the output
    #[arg(short, long)]
    pub preview: bool,

    /// Write a CSV of cell centroids in WGS84
    #[arg(long)]
    pub centroids: bool,

    /// Directory for outputs (defaults to each input's directory)
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Suppress progress output and informational logs
    #[arg(short, long)]
    pub quiet: bool,

    /// Process files even if output exists
    #[arg(short, long)]
    pub no_skip: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

fn parse_crs(text: &str) -> std::result::Result<Crs, String> {
    Crs::parse(text).map_err(|e| e.to_string())
}

fn parse_origin(text: &str) -> std::result::Result<OriginAlignment, String> {
    let invalid = || invalid_parameter("origin", &text, &"expected X,Y").to_string();
    let (x, y) = text.split_once(',').ok_or_else(invalid)?;
    let x: f64 = x.trim().parse().ok().ok_or_else(invalid)?;
    let y: f64 = y.trim().parse().ok().ok_or_else(invalid)?;
    if x.is_finite() && y.is_finite() {
        Ok(OriginAlignment::Fixed { x, y })
    } else {
        Err(invalid())
    }
}

impl Cli {
    /// Check if existing output files should be skipped
    pub const fn skip_existing(&self) -> bool {
        !self.no_skip
    }

    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Materializer configuration described by the flags
    pub fn grid_config(&self) -> GridConfig {
        GridConfig {
            cell_size: self.cell_size,
            alignment: self.origin.unwrap_or_default(),
            clip_mode: if self.per_feature {
                ClipMode::PerFeature
            } else {
                ClipMode::Dissolve
            },
            parallel: !self.sequential,
        }
    }
}

/// Orchestrates batch processing of boundary files with progress tracking
pub struct RegionProcessor {
    cli: Cli,
    progress_manager: Option<ProgressManager>,
}

impl RegionProcessor {
    /// Create a new region processor with the given CLI arguments
    pub fn new(cli: Cli) -> Self {
        let progress_manager = cli.should_show_progress().then(ProgressManager::new);

        Self {
            cli,
            progress_manager,
        }
    }

    /// Process files according to CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if target validation or any region fails; regions
    /// finished before the failure keep their outputs
    pub fn process(&mut self) -> Result<()> {
        self.cli.grid_config().validate()?;
        let files = self.collect_files()?;

        if files.is_empty() {
            info!("nothing to process");
            return Ok(());
        }

        if let Some(ref mut pm) = self.progress_manager {
            pm.initialize(files.len());
        }

        for file in &files {
            self.process_file(file)?;
        }

        if let Some(ref pm) = self.progress_manager {
            pm.finish();
        }

        Ok(())
    }

    /// Region files selected by the target, sorted by path
    ///
    /// # Errors
    ///
    /// Returns an error if the target is neither a GeoJSON file nor a readable
    /// directory
    pub fn collect_files(&self) -> Result<Vec<PathBuf>> {
        let target = &self.cli.target;
        if target.is_file() {
            if is_region_file(target) {
                Ok(if self.should_process_file(target) {
                    vec![target.clone()]
                } else {
                    vec![]
                })
            } else {
                Err(invalid_parameter(
                    "target",
                    &target.display(),
                    &"file must have a .geojson or .json extension",
                ))
            }
        } else if target.is_dir() {
            let mut files = Vec::new();
            for entry in std::fs::read_dir(target).with_path(target, "read directory")? {
                let path = entry.with_path(target, "read directory")?.path();
                if is_region_file(&path) && !is_generated(&path) && self.should_process_file(&path)
                {
                    files.push(path);
                }
            }
            files.sort();
            Ok(files)
        } else {
            Err(invalid_parameter(
                "target",
                &target.display(),
                &"must be a GeoJSON file or directory",
            ))
        }
    }

    fn should_process_file(&self, input_path: &Path) -> bool {
        if !self.cli.skip_existing() {
            return true;
        }

        let output_path = self.output_path(input_path);
        if output_path.exists() {
            warn!(
                input = %input_path.display(),
                output = %output_path.display(),
                "skipping region, output exists"
            );
            false
        } else {
            true
        }
    }

    fn process_file(&self, input_path: &Path) -> Result<()> {
        let start_time = Instant::now();
        if let Some(ref pm) = self.progress_manager {
            pm.start_file(input_path);
        }

        let region = read_region(input_path, self.cli.input_crs)?.validated(self.cli.repair)?;
        let working_crs = self
            .cli
            .working_crs
            .unwrap_or_else(|| region.suggested_working_crs());
        let working = region.reprojected(working_crs)?;
        info!(
            input = %input_path.display(),
            features = working.features().len(),
            source_crs = %region.crs(),
            working_crs = %working_crs,
            cell_size = self.cli.cell_size,
            "region loaded"
        );

        let observer: &dyn ProgressObserver = match &self.progress_manager {
            Some(pm) => pm,
            None => &Silent,
        };
        let fishnet =
            Materializer::with_observer(&working, self.cli.grid_config(), observer)?.materialize()?;

        fishnet.stats.log();
        match AreaSummary::from_areas(fishnet.cells.iter().map(|c| c.area), self.cli.unit) {
            Some(summary) => summary.log(),
            None => warn!(input = %input_path.display(), "no cell intersects the region"),
        }

        let options = WriteOptions {
            unit: self.cli.unit,
            output_crs: self.cli.output_crs.unwrap_or(working_crs),
            carry_properties: self.cli.per_feature,
        };
        let output_path = self.output_path(input_path);
        write_fishnet(&output_path, &fishnet, &working, &options)?;
        info!(output = %output_path.display(), cells = fishnet.len(), "fishnet saved");

        if self.cli.preview {
            let preview_path = self.sibling_path(input_path, PREVIEW_SUFFIX);
            export_preview(&fishnet, &preview_path)?;
            info!(output = %preview_path.display(), "coverage preview saved");
        }

        if self.cli.centroids {
            let centroids_path = self.sibling_path(input_path, CENTROIDS_SUFFIX);
            write_centroids(&centroids_path, &fishnet)?;
            info!(output = %centroids_path.display(), "centroid task list saved");
        }

        if let Some(ref pm) = self.progress_manager {
            pm.complete_file(start_time.elapsed());
        }
        Ok(())
    }

    fn output_dir(&self, input_path: &Path) -> PathBuf {
        self.cli.output_dir.clone().unwrap_or_else(|| {
            input_path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default()
        })
    }

    /// Feature collection path for an input file
    pub fn output_path(&self, input_path: &Path) -> PathBuf {
        let stem = input_path.file_stem().unwrap_or_default();
        let output_name = format!(
            "{}{OUTPUT_SUFFIX}.{OUTPUT_EXTENSION}",
            stem.to_string_lossy()
        );
        self.output_dir(input_path).join(output_name)
    }

    fn sibling_path(&self, input_path: &Path, suffix: &str) -> PathBuf {
        let stem = input_path.file_stem().unwrap_or_default();
        let name = format!("{}{OUTPUT_SUFFIX}{suffix}", stem.to_string_lossy());
        self.output_dir(input_path).join(name)
    }
}

fn is_region_file(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| INPUT_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

// Outputs written next to inputs must not be picked up as new regions
fn is_generated(path: &Path) -> bool {
    path.file_stem()
        .and_then(|s| s.to_str())
        .is_some_and(|stem| stem.ends_with(OUTPUT_SUFFIX))
}
