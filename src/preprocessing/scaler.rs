//! Standard scaling (z-score normalization)

use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};

/// Per-feature standardization: `(x - mean) / scale`.
///
/// Means and scales are computed once from the training partition and are
/// immutable afterwards. The scale is the population standard deviation;
/// zero-variance columns scale by 1.0 so they pass through unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    mean: Array1<f64>,
    scale: Array1<f64>,
}

/// Flat export form of the fitted parameters, one entry per feature
/// column in training order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScalerParams {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    /// Fit on the raw training features.
    pub fn fit(x: &Array2<f64>) -> Result<Self> {
        if x.nrows() == 0 {
            return Err(PipelineError::Data(
                "cannot fit scaler on an empty matrix".to_string(),
            ));
        }

        let mean = x
            .mean_axis(Axis(0))
            .ok_or_else(|| PipelineError::Data("mean of empty axis".to_string()))?;
        let scale = x.var_axis(Axis(0), 0.0).mapv(|v| {
            let std = v.sqrt();
            if std == 0.0 {
                1.0
            } else {
                std
            }
        });

        Ok(Self { mean, scale })
    }

    /// Scale a feature matrix.
    pub fn transform(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        self.check_width(x)?;
        Ok((x - &self.mean) / &self.scale)
    }

    /// Undo scaling, recovering the original values.
    pub fn inverse_transform(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        self.check_width(x)?;
        Ok(x * &self.scale + &self.mean)
    }

    pub fn n_features(&self) -> usize {
        self.mean.len()
    }

    /// Fitted parameters in export form.
    pub fn params(&self) -> ScalerParams {
        ScalerParams {
            mean: self.mean.to_vec(),
            scale: self.scale.to_vec(),
        }
    }

    fn check_width(&self, x: &Array2<f64>) -> Result<()> {
        if x.ncols() != self.mean.len() {
            return Err(PipelineError::Shape {
                expected: format!("{} feature columns", self.mean.len()),
                actual: format!("{} columns", x.ncols()),
            });
        }
        Ok(())
    }
}
