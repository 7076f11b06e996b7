use crate::foundation::core::Offset;
use crate::foundation::error::{OrbitcamError, OrbitcamResult};
use crate::foundation::math::{quantize_f32, require_nonzero};

/// Supersampling configuration: `factor` N yields an N x N offset grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AaConfig {
    pub factor: u32,
}

impl AaConfig {
    pub fn new(factor: u32) -> Self {
        Self { factor }
    }

    pub fn validate(&self) -> OrbitcamResult<()> {
        self.sample_count().map(|_| ())
    }

    /// Number of offsets (`factor` squared), checked against addressable memory.
    pub fn sample_count(&self) -> OrbitcamResult<usize> {
        let n = require_nonzero("anti-aliasing factor", self.factor)? as usize;
        n.checked_mul(n)
            .filter(|&count| {
                count
                    .checked_mul(std::mem::size_of::<Offset>())
                    .is_some_and(|bytes| bytes <= isize::MAX as usize)
            })
            .ok_or_else(|| {
                OrbitcamError::invalid_configuration(format!(
                    "anti-aliasing factor {} needs more offsets than can be stored",
                    self.factor
                ))
            })
    }
}

/// Numeric convention used when emitting offsets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleConvention {
    /// `j / (N + 1)` and `-i / (N + 1)` in double precision.
    #[default]
    Exact,
    /// What the raytracer actually samples: single precision, rounded to two decimals.
    Renderer,
}

impl SampleConvention {
    const RENDERER_DECIMALS: u32 = 2;

    fn coordinate(self, k: u32, factor: u32) -> f64 {
        match self {
            Self::Exact => f64::from(k) / (f64::from(factor) + 1.0),
            Self::Renderer => f64::from(quantize_f32(
                k as f32 / (factor as f32 + 1.0),
                Self::RENDERER_DECIMALS,
            )),
        }
    }
}

/// Sub-pixel offsets in sampling order.
///
/// Row `i` (vertical band) is the outer loop, column `j` the inner one, so
/// sample index `(i - 1) * N + (j - 1)` is stable across runs.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct OffsetGrid {
    factor: u32,
    offsets: Vec<Offset>,
}

impl OffsetGrid {
    pub fn factor(&self) -> u32 {
        self.factor
    }

    pub fn offsets(&self) -> &[Offset] {
        &self.offsets
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Offset> {
        self.offsets.iter()
    }

    /// Offset for 1-based row `i` and column `j`.
    pub fn get(&self, i: u32, j: u32) -> Option<Offset> {
        if i == 0 || j == 0 || i > self.factor || j > self.factor {
            return None;
        }
        let idx = (i - 1) as usize * self.factor as usize + (j - 1) as usize;
        self.offsets.get(idx).copied()
    }
}

impl<'a> IntoIterator for &'a OffsetGrid {
    type Item = &'a Offset;
    type IntoIter = std::slice::Iter<'a, Offset>;

    fn into_iter(self) -> Self::IntoIter {
        self.offsets.iter()
    }
}

/// Build the exact offset grid for `config`.
pub fn build(config: &AaConfig) -> OrbitcamResult<OffsetGrid> {
    build_with(config, SampleConvention::Exact)
}

/// Build the offset grid for `config` using `convention`.
#[tracing::instrument]
pub fn build_with(config: &AaConfig, convention: SampleConvention) -> OrbitcamResult<OffsetGrid> {
    let samples = config.sample_count()?;

    let n = config.factor;
    let mut offsets = Vec::new();
    offsets.try_reserve_exact(samples).map_err(|e| {
        OrbitcamError::invalid_configuration(format!(
            "cannot allocate {samples} offsets for anti-aliasing factor {n}: {e}"
        ))
    })?;
    for i in 1..=n {
        let dy = -convention.coordinate(i, n);
        for j in 1..=n {
            offsets.push(Offset::new(convention.coordinate(j, n), dy));
        }
    }

    tracing::debug!(factor = n, samples = offsets.len(), "built anti-aliasing grid");
    Ok(OffsetGrid { factor: n, offsets })
}
