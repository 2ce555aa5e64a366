//! Compute command - run the configured chain over the configured region.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use tracing::info;

use seismogrid::cache::Cache;
use seismogrid::config::{ComputeMode, ConfigFile};
use seismogrid::engine::{Engine, EngineError, WorkerPool, CACHE_EMPTY, SITE_LOADED};
use seismogrid::filters::{
    stored_scalar, ConditionalLossFilter, CountryLoader, ExposureLoader, FilterListener,
    HazardCurveLoader, IntensityLoader, LossCurveFilter, LossRatioCurveFilter, LremCalculator,
    LremLoader, LremSynchronizer, ScalarPersister, ScenarioLossFilter, VulnerabilitySelector,
};
use seismogrid::geo::Region;
use seismogrid::input;
use seismogrid::output::AsciiGridWriter;
use seismogrid::pipe::keys;

use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the compute command.
pub struct ComputeArgs {
    pub config: Option<PathBuf>,
    pub output: Option<PathBuf>,
}

/// One result grid to collect from the buffer after the run.
struct ResultGrid {
    prefix: &'static str,
    path: PathBuf,
}

/// Run the compute command.
pub fn run(args: ComputeArgs, verbose: bool) -> Result<(), CliError> {
    let runner = CliRunner::new(args.config.as_deref(), verbose)?;
    runner.log_startup("compute");
    let config = runner.config();

    let region = config
        .region
        .to_region()
        .map_err(|e| CliError::Config(format!("[region] {}", e)))?;
    let engine = Engine::new(config.cache.build()?);
    let workers = config.general.workers;

    println!("SeismoGrid Risk Computation v{}", seismogrid::VERSION);
    println!("==================================");
    println!();
    println!("Mode:    {}", config.compute.mode);
    println!(
        "Region:  {} x {} cells of {}°",
        region.rows(),
        region.columns(),
        region.cell_size()
    );
    println!("Cache:   {}", engine.buffer().backend());
    println!("Workers: {}", workers);
    println!();

    let grids = match config.compute.mode {
        ComputeMode::Classical => wire_classical(&engine, config)?,
        ComputeMode::Scenario => wire_scenario(&engine, config)?,
    };
    let output_path = args
        .output
        .unwrap_or_else(|| config.output.path.clone());
    let grids = grid_paths(grids, &output_path);

    info!(
        mode = %config.compute.mode,
        cells = region.cell_count(),
        workers,
        "starting computation"
    );
    let started = Instant::now();
    if workers > 1 {
        let bands = region
            .split_rows(workers)
            .map_err(|e| CliError::Compute(EngineError::Geo(e)))?;
        println!(
            "Computing {} cells ({} row bands over {} workers)...",
            region.cell_count(),
            bands.len(),
            workers
        );
        let pool = WorkerPool::new(workers)?;
        pool.run(bands, |band| engine.compute(&band))?;
    } else {
        println!("Computing {} cells...", region.cell_count());
        engine.compute(&region)?;
    }
    let elapsed = started.elapsed();
    println!("Computed in {:.2}s", elapsed.as_secs_f64());
    println!();

    for grid in &grids {
        write_grid(engine.buffer().as_ref(), &region, config, grid)?;
        println!("Wrote {}", grid.path.display());
    }

    Ok(())
}

/// Attach the classical hazard-curve chain to the engine.
fn wire_classical(engine: &Engine, config: &ConfigFile) -> Result<Vec<&'static str>, CliError> {
    let compute = &config.compute;
    let mode = compute.mode;

    let hazard = load_model(
        required(&compute.hazard_file, "hazard_file", mode)?,
        input::load_hazard,
    )?;
    let exposure = load_model(
        required(&compute.exposure_file, "exposure_file", mode)?,
        input::load_exposure,
    )?;
    let registry = load_model(
        required(&compute.vulnerability_file, "vulnerability_file", mode)?,
        input::load_vulnerability,
    )?;

    engine.on(
        SITE_LOADED,
        FilterListener::wrap(HazardCurveLoader::new(Arc::new(hazard))),
    )?;
    engine.on(
        SITE_LOADED,
        FilterListener::wrap(ExposureLoader::new(Arc::new(exposure))),
    )?;
    wire_countries(engine, config)?;
    engine.on(
        SITE_LOADED,
        FilterListener::wrap(VulnerabilitySelector::new(Arc::new(registry))),
    )?;

    engine.on(
        SITE_LOADED,
        FilterListener::wrap(LremLoader::new(Arc::clone(engine.source()))),
    )?;
    engine.on(
        CACHE_EMPTY,
        FilterListener::wrap(LremCalculator::new(config.interval.to_interval())),
    )?;
    engine.on(SITE_LOADED, FilterListener::wrap(LremSynchronizer))?;

    engine.on(SITE_LOADED, FilterListener::wrap(LossRatioCurveFilter))?;
    engine.on(SITE_LOADED, FilterListener::wrap(LossCurveFilter))?;
    engine.on(
        SITE_LOADED,
        FilterListener::wrap(ConditionalLossFilter::new(compute.poe)),
    )?;
    engine.on(
        SITE_LOADED,
        FilterListener::wrap(ScalarPersister::new(keys::CONDITIONAL_LOSS, "loss")),
    )?;

    Ok(vec!["loss"])
}

/// Attach the single-ground-motion scenario chain to the engine.
fn wire_scenario(engine: &Engine, config: &ConfigFile) -> Result<Vec<&'static str>, CliError> {
    let compute = &config.compute;
    let mode = compute.mode;

    let intensities = load_model(
        required(&compute.intensity_file, "intensity_file", mode)?,
        input::load_intensities,
    )?;
    let exposure = load_model(
        required(&compute.exposure_file, "exposure_file", mode)?,
        input::load_exposure,
    )?;
    let registry = load_model(
        required(&compute.vulnerability_file, "vulnerability_file", mode)?,
        input::load_vulnerability,
    )?;

    engine.on(
        SITE_LOADED,
        FilterListener::wrap(IntensityLoader::new(Arc::new(intensities))),
    )?;
    engine.on(
        SITE_LOADED,
        FilterListener::wrap(ExposureLoader::new(Arc::new(exposure))),
    )?;
    wire_countries(engine, config)?;
    engine.on(
        SITE_LOADED,
        FilterListener::wrap(VulnerabilitySelector::new(Arc::new(registry))),
    )?;
    engine.on(SITE_LOADED, FilterListener::wrap(ScenarioLossFilter))?;
    engine.on(
        SITE_LOADED,
        FilterListener::wrap(ScalarPersister::new(keys::LOSS_MEAN, "mean")),
    )?;
    engine.on(
        SITE_LOADED,
        FilterListener::wrap(ScalarPersister::new(keys::LOSS_STDDEV, "stddev")),
    )?;

    Ok(vec!["mean", "stddev"])
}

/// Country assignments are optional in both modes.
fn wire_countries(engine: &Engine, config: &ConfigFile) -> Result<(), CliError> {
    if let Some(path) = &config.compute.country_file {
        let countries = load_model(path, input::load_countries)?;
        engine.on(
            SITE_LOADED,
            FilterListener::wrap(CountryLoader::new(Arc::new(countries))),
        )?;
    }
    Ok(())
}

fn required<'a>(
    path: &'a Option<PathBuf>,
    key: &str,
    mode: ComputeMode,
) -> Result<&'a Path, CliError> {
    path.as_deref().ok_or_else(|| {
        CliError::Config(format!("[compute] {key} is required in {mode} mode"))
    })
}

fn load_model<T>(
    path: &Path,
    loader: fn(&Path) -> Result<T, EngineError>,
) -> Result<T, CliError> {
    loader(path).map_err(|error| CliError::Input {
        path: path.display().to_string(),
        error,
    })
}

/// The first grid takes the configured path; further grids append their
/// prefix to the file stem.
fn grid_paths(prefixes: Vec<&'static str>, output_path: &Path) -> Vec<ResultGrid> {
    prefixes
        .into_iter()
        .enumerate()
        .map(|(index, prefix)| ResultGrid {
            prefix,
            path: if index == 0 {
                output_path.to_path_buf()
            } else {
                with_stem_suffix(output_path, prefix)
            },
        })
        .collect()
}

fn with_stem_suffix(path: &Path, suffix: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    let extension = path.extension().and_then(|s| s.to_str()).unwrap_or("asc");
    path.with_file_name(format!("{stem}-{suffix}.{extension}"))
}

fn write_grid(
    buffer: &dyn Cache,
    region: &Region,
    config: &ConfigFile,
    grid: &ResultGrid,
) -> Result<(), CliError> {
    let file_write = |error| CliError::FileWrite {
        path: grid.path.display().to_string(),
        error,
    };
    if let Some(parent) = grid.path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(file_write)?;
        }
    }
    let file = File::create(&grid.path).map_err(file_write)?;
    let mut out = BufWriter::new(file);
    AsciiGridWriter::new()
        .with_nodata(config.output.nodata)
        .write(&mut out, region, |site| {
            stored_scalar(buffer, grid.prefix, site)
        })?;
    out.flush().map_err(file_write)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secondary_grid_path_carries_prefix() {
        let grids = grid_paths(vec!["mean", "stddev"], Path::new("/tmp/run/losses.asc"));
        assert_eq!(grids[0].path, Path::new("/tmp/run/losses.asc"));
        assert_eq!(grids[1].path, Path::new("/tmp/run/losses-stddev.asc"));
    }

    #[test]
    fn test_missing_input_is_a_config_error() {
        let result = required(&None, "hazard_file", ComputeMode::Classical);
        match result {
            Err(CliError::Config(message)) => {
                assert!(message.contains("hazard_file"), "got {message}");
                assert!(message.contains("classical"), "got {message}");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }
}
