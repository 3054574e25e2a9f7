// Column-wise standardization (zero mean, unit variance).

use ndarray::{Array2, Axis};

/// Standard deviations below this magnitude are treated as zero variance.
const ZERO_VARIANCE_THRESHOLD: f64 = 1e-9;

/// Centers and scales every feature column to zero mean and unit variance.
///
/// Mean and standard deviation are population statistics (divisor `n`, not
/// `n - 1`). A constant column has zero standard deviation; its divisor is
/// replaced by `1.0`, so it comes out as an all-zero column instead of
/// producing infinities or NaNs. For any finite input this never fails and
/// the output has exactly the input's shape.
pub fn standardize(mut matrix: Array2<f64>) -> Array2<f64> {
    let mean_vector = match matrix.mean_axis(Axis(0)) {
        Some(mean) => mean,
        // Zero samples: nothing to center or scale.
        None => return matrix,
    };
    matrix -= &mean_vector;

    // ddof = 0: population standard deviation of the centered columns.
    let std_dev_vector = matrix.map_axis(Axis(0), |column| column.std(0.0));
    let sanitized_scale = std_dev_vector.mapv(|val| {
        if val.abs() < ZERO_VARIANCE_THRESHOLD {
            1.0
        } else {
            val
        }
    });
    matrix /= &sanitized_scale;
    matrix
}
