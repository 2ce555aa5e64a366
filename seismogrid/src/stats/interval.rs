//! Loss-ratio threshold intervals.

/// An ordered sequence of loss-ratio thresholds over [0, 1].
///
/// Built by uniformly subdividing the unit interval by a step count;
/// zero steps give the empty interval. Thresholds index the rows of a
/// loss-ratio-exceedance matrix.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Interval {
    thresholds: Vec<f64>,
}

impl Interval {
    /// The empty interval.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Subdivides [0, 1] into `steps` equal segments.
    ///
    /// Yields `steps + 1` thresholds starting at exactly 0.0 and ending
    /// at exactly 1.0; `steps == 0` yields the empty interval.
    pub fn with_steps(steps: usize) -> Self {
        if steps == 0 {
            return Self::empty();
        }

        let thresholds = (0..=steps)
            .map(|index| index as f64 / steps as f64)
            .collect();
        Self { thresholds }
    }

    /// Thresholds in ascending order.
    #[inline]
    pub fn thresholds(&self) -> &[f64] {
        &self.thresholds
    }

    /// Number of thresholds.
    #[inline]
    pub fn len(&self) -> usize {
        self.thresholds.len()
    }

    /// Whether the interval holds no thresholds.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.thresholds.is_empty()
    }

    /// Iterator over the thresholds.
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.thresholds.iter().copied()
    }
}
