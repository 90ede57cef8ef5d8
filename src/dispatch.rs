//! Method selection and the single transform entry point.

use std::fmt;
use std::str::FromStr;

use hydronorm_boxcox::PowerTransform;
use hydronorm_ecdf::{
    CdfTables, QuantileConfig, inverse_quantile_transform, inverse_quantile_transform_grid,
    quantile_transform, quantile_transform_grid,
};
use hydronorm_gamma::{
    GammaConfig, GammaTable, gamma_back_transform, gamma_back_transform_grid, gamma_transform,
    gamma_transform_grid,
};
use ndarray::{Array2, Array3, ArrayD, ArrayView2, ArrayView3, ArrayViewD, Ix2, Ix3};
use tracing::debug;

use crate::config::TransformSettings;
use crate::error::TransformError;

/// Transform method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// Power (Box-Cox style) transform.
    BoxCox,
    /// Quantile-normal transform through empirical CDF tables.
    Ecdf,
    /// Normal-score transform through monthly gamma distributions.
    GammaMonthly,
}

impl Method {
    /// Settings tag of this method.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BoxCox => "boxcox",
            Self::Ecdf => "ecdf",
            Self::GammaMonthly => "gamma_monthly",
        }
    }
}

impl FromStr for Method {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "boxcox" => Ok(Self::BoxCox),
            "ecdf" => Ok(Self::Ecdf),
            "gamma_monthly" => Ok(Self::GammaMonthly),
            _ => Err(TransformError::InvalidMethod { tag: s.to_string() }),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transform direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Observations to normal scores.
    Transform,
    /// Normal scores to observations.
    BackTransform,
}

impl FromStr for Mode {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "transform" => Ok(Self::Transform),
            "back_transform" => Ok(Self::BackTransform),
            _ => Err(TransformError::InvalidMode { tag: s.to_string() }),
        }
    }
}

/// A transform between observations and normal scores.
///
/// `data` has time as its last axis and `months` one calendar month per
/// time step. Outputs have exactly the shape of `data`.
pub trait NormalScoreTransform {
    /// Maps observations to normal scores.
    fn transform(
        &self,
        data: ArrayViewD<'_, f64>,
        months: &[u8],
    ) -> Result<ArrayD<f64>, TransformError>;

    /// Maps normal scores back to observations.
    fn back_transform(
        &self,
        data: ArrayViewD<'_, f64>,
        months: &[u8],
    ) -> Result<ArrayD<f64>, TransformError>;

    /// Runs the direction selected by `mode`.
    fn apply(
        &self,
        mode: Mode,
        data: ArrayViewD<'_, f64>,
        months: &[u8],
    ) -> Result<ArrayD<f64>, TransformError> {
        match mode {
            Mode::Transform => self.transform(data, months),
            Mode::BackTransform => self.back_transform(data, months),
        }
    }
}

fn unsupported_shape(shape: &[usize]) -> TransformError {
    TransformError::ShapeMismatch {
        shape: shape.to_vec(),
        expected: "2 dimensions (station, time) or 3 dimensions (row, col, time)".to_string(),
    }
}

/// Routes station data to `station` and gridded data to `grid`.
fn by_layout<S, G>(
    data: ArrayViewD<'_, f64>,
    station: S,
    grid: G,
) -> Result<ArrayD<f64>, TransformError>
where
    S: FnOnce(ArrayView2<'_, f64>) -> Result<Array2<f64>, TransformError>,
    G: FnOnce(ArrayView3<'_, f64>) -> Result<Array3<f64>, TransformError>,
{
    let shape = data.shape().to_vec();
    match shape.len() {
        2 => {
            let view = data
                .into_dimensionality::<Ix2>()
                .map_err(|_| unsupported_shape(&shape))?;
            Ok(station(view)?.into_dyn())
        }
        3 => {
            let view = data
                .into_dimensionality::<Ix3>()
                .map_err(|_| unsupported_shape(&shape))?;
            Ok(grid(view)?.into_dyn())
        }
        _ => Err(unsupported_shape(&shape)),
    }
}

impl NormalScoreTransform for PowerTransform {
    fn transform(
        &self,
        data: ArrayViewD<'_, f64>,
        _months: &[u8],
    ) -> Result<ArrayD<f64>, TransformError> {
        Ok(self.forward_array(data))
    }

    fn back_transform(
        &self,
        data: ArrayViewD<'_, f64>,
        _months: &[u8],
    ) -> Result<ArrayD<f64>, TransformError> {
        Ok(self.inverse_array(data))
    }
}

/// Quantile-normal transform bound to its empirical CDF tables.
#[derive(Debug, Clone)]
pub struct EcdfTransform<'a> {
    tables: &'a CdfTables,
    config: QuantileConfig,
}

impl<'a> EcdfTransform<'a> {
    pub fn new(tables: &'a CdfTables, config: QuantileConfig) -> Self {
        Self { tables, config }
    }
}

impl NormalScoreTransform for EcdfTransform<'_> {
    fn transform(
        &self,
        data: ArrayViewD<'_, f64>,
        months: &[u8],
    ) -> Result<ArrayD<f64>, TransformError> {
        by_layout(
            data,
            |d| Ok(quantile_transform(d, months, self.tables, &self.config)?),
            |d| Ok(quantile_transform_grid(d, months, self.tables, &self.config)?),
        )
    }

    fn back_transform(
        &self,
        data: ArrayViewD<'_, f64>,
        months: &[u8],
    ) -> Result<ArrayD<f64>, TransformError> {
        by_layout(
            data,
            |d| Ok(inverse_quantile_transform(d, months, self.tables, &self.config)?),
            |d| {
                Ok(inverse_quantile_transform_grid(
                    d,
                    months,
                    self.tables,
                    &self.config,
                )?)
            },
        )
    }
}

/// Gamma normal-score transform bound to its parameter table.
#[derive(Debug, Clone)]
pub struct GammaMonthlyTransform<'a> {
    table: &'a GammaTable,
    config: GammaConfig,
}

impl<'a> GammaMonthlyTransform<'a> {
    pub fn new(table: &'a GammaTable, config: GammaConfig) -> Self {
        Self { table, config }
    }
}

impl NormalScoreTransform for GammaMonthlyTransform<'_> {
    fn transform(
        &self,
        data: ArrayViewD<'_, f64>,
        months: &[u8],
    ) -> Result<ArrayD<f64>, TransformError> {
        by_layout(
            data,
            |d| Ok(gamma_transform(d, months, self.table, &self.config)?),
            |d| Ok(gamma_transform_grid(d, months, self.table, &self.config)?),
        )
    }

    fn back_transform(
        &self,
        data: ArrayViewD<'_, f64>,
        months: &[u8],
    ) -> Result<ArrayD<f64>, TransformError> {
        by_layout(
            data,
            |d| Ok(gamma_back_transform(d, months, self.table, &self.config)?),
            |d| Ok(gamma_back_transform_grid(d, months, self.table, &self.config)?),
        )
    }
}

/// Precomputed tables handed to the dispatcher.
#[derive(Debug, Clone, Copy, Default)]
pub struct Tables<'a> {
    ecdf: Option<&'a CdfTables>,
    gamma: Option<&'a GammaTable>,
}

impl<'a> Tables<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Supplies empirical CDF tables for [`Method::Ecdf`].
    pub fn with_ecdf(mut self, tables: &'a CdfTables) -> Self {
        self.ecdf = Some(tables);
        self
    }

    /// Supplies a gamma parameter table for [`Method::GammaMonthly`].
    pub fn with_gamma(mut self, table: &'a GammaTable) -> Self {
        self.gamma = Some(table);
        self
    }
}

/// A configured transform of one of the supported methods.
#[derive(Debug, Clone)]
pub enum Transformer<'a> {
    BoxCox(PowerTransform),
    Ecdf(EcdfTransform<'a>),
    GammaMonthly(GammaMonthlyTransform<'a>),
}

impl<'a> Transformer<'a> {
    /// Configures `method` from the settings and tables.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::MissingTable`] when the method's tables
    /// are absent, and setting errors from the config conversions.
    pub fn new(
        method: Method,
        settings: &TransformSettings,
        tables: Tables<'a>,
    ) -> Result<Self, TransformError> {
        let missing = TransformError::MissingTable {
            method: method.as_str(),
        };
        match method {
            Method::BoxCox => Ok(Self::BoxCox(settings.power_transform()?)),
            Method::Ecdf => {
                let cdfs = tables.ecdf.ok_or(missing)?;
                Ok(Self::Ecdf(EcdfTransform::new(cdfs, settings.quantile_config()?)))
            }
            Method::GammaMonthly => {
                let table = tables.gamma.ok_or(missing)?;
                Ok(Self::GammaMonthly(GammaMonthlyTransform::new(
                    table,
                    settings.gamma_config()?,
                )))
            }
        }
    }

    /// The method this transformer implements.
    pub fn method(&self) -> Method {
        match self {
            Self::BoxCox(_) => Method::BoxCox,
            Self::Ecdf(_) => Method::Ecdf,
            Self::GammaMonthly(_) => Method::GammaMonthly,
        }
    }

    fn inner(&self) -> &dyn NormalScoreTransform {
        match self {
            Self::BoxCox(t) => t,
            Self::Ecdf(t) => t,
            Self::GammaMonthly(t) => t,
        }
    }
}

impl NormalScoreTransform for Transformer<'_> {
    fn transform(
        &self,
        data: ArrayViewD<'_, f64>,
        months: &[u8],
    ) -> Result<ArrayD<f64>, TransformError> {
        self.inner().transform(data, months)
    }

    fn back_transform(
        &self,
        data: ArrayViewD<'_, f64>,
        months: &[u8],
    ) -> Result<ArrayD<f64>, TransformError> {
        self.inner().back_transform(data, months)
    }
}

/// Transforms `data` with the method and direction named by the tags.
///
/// `method` is one of `boxcox`, `ecdf`, `gamma_monthly`; `mode` is
/// `transform` or `back_transform`. `data` is 2-D `(station, time)` or 3-D
/// `(row, col, time)`; the power transform ignores `months`.
///
/// # Errors
///
/// Returns [`TransformError::InvalidMethod`] / [`TransformError::InvalidMode`]
/// for unknown tags, [`TransformError::ShapeMismatch`] for data that is not
/// 2-D or 3-D, and any error raised by the chosen method.
#[tracing::instrument(skip(data, settings, months, tables), fields(shape = ?data.shape()))]
pub fn data_transformation(
    data: ArrayViewD<'_, f64>,
    method: &str,
    mode: &str,
    settings: &TransformSettings,
    months: &[u8],
    tables: Tables<'_>,
) -> Result<ArrayD<f64>, TransformError> {
    let method: Method = method.parse()?;
    let mode: Mode = mode.parse()?;
    if !matches!(data.ndim(), 2 | 3) {
        return Err(unsupported_shape(data.shape()));
    }

    let transformer = Transformer::new(method, settings, tables)?;
    debug!(%method, ?mode, "dispatching");
    transformer.apply(mode, data, months)
}
