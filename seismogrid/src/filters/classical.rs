//! Classical hazard-to-loss chain.
//!
//! The loader/synchronizer pair memoizes loss-ratio-exceedance
//! matrices across cells: assets sharing a vulnerability function get
//! their matrix computed once and served from the buffer afterwards.
//! The matrix fingerprint covers the function's identifier and both of
//! its curves, so two functions registered under the same name but
//! with different shapes never collide.

use std::sync::Arc;

use tracing::debug;

use crate::cache::Cache;
use crate::curve::{DiscreteFunction, VulnerabilityFunction};
use crate::engine::{EngineError, EventSource, Payload, CACHE_EMPTY};
use crate::filters::Filter;
use crate::pipe::{keys, Pipe, Value};
use crate::stats::{self, Interval, LossRatioExceedanceMatrix};

fn hash_curve(hasher: &mut blake3::Hasher, curve: &DiscreteFunction) {
    for (x, y) in curve.abscissae().zip(curve.ordinates()) {
        hasher.update(&x.to_bits().to_le_bytes());
        hasher.update(&y.to_bits().to_le_bytes());
    }
}

/// Buffer key for a vulnerability function's matrix. Stable across
/// runs and processes.
fn lrem_fingerprint(vulnerability: &VulnerabilityFunction) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(vulnerability.identifier().as_bytes());
    hash_curve(&mut hasher, vulnerability.mean_curve());
    hash_curve(&mut hasher, vulnerability.cov_curve());
    format!("lrem:{}", hasher.finalize().to_hex())
}

/// Serves the cell's matrix from the buffer, or has it computed.
///
/// On a buffer miss the loader raises [`CACHE_EMPTY`] with the cell's
/// pipe; whatever listens there must leave the matrix under
/// [`keys::LREM`] or the cell fails.
pub struct LremLoader {
    source: Arc<EventSource>,
}

impl LremLoader {
    pub fn new(source: Arc<EventSource>) -> Self {
        Self { source }
    }
}

impl Filter for LremLoader {
    fn name(&self) -> &str {
        "lrem-loader"
    }

    fn filter(&self, buffer: &dyn Cache, pipe: &mut Pipe) -> Result<(), EngineError> {
        let vulnerability = pipe.vulnerability(keys::VULNERABILITY)?;
        let fingerprint = lrem_fingerprint(&vulnerability);

        if let Some(bytes) = buffer.get(&fingerprint)? {
            let matrix: LossRatioExceedanceMatrix = serde_json::from_slice(&bytes)?;
            debug!(fingerprint, "matrix served from buffer");
            return pipe.put(keys::LREM, Value::Matrix(Arc::new(matrix)));
        }

        debug!(fingerprint, "matrix absent from buffer");
        self.source
            .raise(CACHE_EMPTY, buffer, &mut Payload::Pipe(&mut *pipe))?;
        if !pipe.contains(keys::LREM) {
            return Err(EngineError::MissingPipeData(keys::LREM.to_string()));
        }
        Ok(())
    }
}

/// Computes the matrix for the cell's vulnerability function. Meant to
/// listen on [`CACHE_EMPTY`] behind [`LremLoader`].
pub struct LremCalculator {
    interval: Interval,
}

impl LremCalculator {
    pub fn new(interval: Interval) -> Self {
        Self { interval }
    }
}

impl Filter for LremCalculator {
    fn name(&self) -> &str {
        "lrem-calculator"
    }

    fn filter(&self, _buffer: &dyn Cache, pipe: &mut Pipe) -> Result<(), EngineError> {
        let vulnerability = pipe.vulnerability(keys::VULNERABILITY)?;
        let matrix = LossRatioExceedanceMatrix::compute(&self.interval, &vulnerability)?;
        debug!(
            rows = matrix.rows(),
            columns = matrix.columns(),
            model = vulnerability.identifier(),
            "computed loss ratio exceedance matrix"
        );
        pipe.put(keys::LREM, Value::Matrix(Arc::new(matrix)))
    }
}

/// Writes the cell's matrix to the buffer under its fingerprint, only
/// when absent. Keeps the memoization at-most-once per fingerprint.
pub struct LremSynchronizer;

impl Filter for LremSynchronizer {
    fn name(&self) -> &str {
        "lrem-synchronizer"
    }

    fn filter(&self, buffer: &dyn Cache, pipe: &mut Pipe) -> Result<(), EngineError> {
        let vulnerability = pipe.vulnerability(keys::VULNERABILITY)?;
        let matrix = pipe.matrix(keys::LREM)?;
        let fingerprint = lrem_fingerprint(&vulnerability);

        if buffer.get(&fingerprint)?.is_some() {
            return Ok(());
        }
        let bytes = serde_json::to_vec(matrix.as_ref())?;
        buffer.set(&fingerprint, &bytes)?;
        debug!(fingerprint, size = bytes.len(), "matrix persisted to buffer");
        Ok(())
    }
}

/// Combines the cell's matrix and hazard curve into a loss-ratio curve
/// under [`keys::LOSS_RATIO_CURVE`].
pub struct LossRatioCurveFilter;

impl Filter for LossRatioCurveFilter {
    fn name(&self) -> &str {
        "loss-ratio-curve"
    }

    fn filter(&self, _buffer: &dyn Cache, pipe: &mut Pipe) -> Result<(), EngineError> {
        let matrix = pipe.matrix(keys::LREM)?;
        let vulnerability = pipe.vulnerability(keys::VULNERABILITY)?;
        let hazard = pipe.hazard_curve(keys::HAZARD_CURVE)?;
        let curve = stats::classical::loss_ratio_curve(&matrix, hazard, &vulnerability)?;
        pipe.put(keys::LOSS_RATIO_CURVE, Value::Curve(curve))
    }
}

/// Scales the loss-ratio curve by the asset value into an absolute
/// loss curve under [`keys::LOSS_CURVE`]. An absent asset is a missing
/// input; a worthless one produces the empty curve.
pub struct LossCurveFilter;

impl Filter for LossCurveFilter {
    fn name(&self) -> &str {
        "loss-curve"
    }

    fn filter(&self, _buffer: &dyn Cache, pipe: &mut Pipe) -> Result<(), EngineError> {
        let asset = pipe.scalar(keys::ASSET_VALUE)?;
        let loss_curve = if asset == 0.0 {
            DiscreteFunction::new()
        } else {
            pipe.curve(keys::LOSS_RATIO_CURVE)?.rescale_domain(asset)?
        };
        pipe.put(keys::LOSS_CURVE, Value::Curve(loss_curve))
    }
}

/// Extracts the loss held at a configured probability of exceedance
/// into [`keys::CONDITIONAL_LOSS`].
pub struct ConditionalLossFilter {
    probability: f64,
}

impl ConditionalLossFilter {
    pub fn new(probability: f64) -> Self {
        Self { probability }
    }
}

impl Filter for ConditionalLossFilter {
    fn name(&self) -> &str {
        "conditional-loss"
    }

    fn filter(&self, _buffer: &dyn Cache, pipe: &mut Pipe) -> Result<(), EngineError> {
        let loss_curve = pipe.curve(keys::LOSS_CURVE)?;
        if loss_curve.is_empty() {
            debug!("empty loss curve, no conditional loss for cell");
            return Ok(());
        }
        let loss = stats::classical::conditional_loss(loss_curve, self.probability)?;
        pipe.put(keys::CONDITIONAL_LOSS, Value::Scalar(loss))
    }
}
