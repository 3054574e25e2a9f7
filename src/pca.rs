// Principal-component projection of a standardized matrix.

use ndarray::{Array1, Array2, ArrayView1};
use ndarray_linalg::{Eigh, UPLO};

use crate::error::Error;

/// Eigenvalues below this magnitude are treated as numerically zero.
const EIGENVALUE_FLOOR: f64 = 1e-12;
/// Threshold for a vector norm to be considered non-zero.
const NORMALIZATION_THRESHOLD: f64 = 1e-9;

/// The retained principal axes of one dataset.
///
/// Holds the per-sample scores (shape `n_samples x k`, sample order identical
/// to the input matrix) and each axis's explained-variance fraction. Axes are
/// ordered by non-increasing explained variance.
///
/// The sign of any individual axis is NOT part of this contract: an
/// eigenvector and its negation span the same direction, and which one the
/// backend returns is arbitrary. Consumers must only rely on relative
/// structure (distances, correlations up to sign), never on raw signed
/// values.
#[derive(Debug, Clone)]
pub struct ComponentSpace {
    scores: Array2<f64>,
    explained_variance_ratio: Array1<f64>,
}

impl ComponentSpace {
    /// Assembles a component space from pre-computed parts.
    ///
    /// Useful for consumers that obtained scores elsewhere and only need the
    /// planning/rendering half of this crate.
    ///
    /// # Errors
    /// Returns an error if the ratio vector length does not match the score
    /// column count.
    pub fn from_parts(
        scores: Array2<f64>,
        explained_variance_ratio: Array1<f64>,
    ) -> Result<Self, Error> {
        if scores.ncols() != explained_variance_ratio.len() {
            return Err(Error::Decomposition(format!(
                "score columns ({}) do not match explained-variance entries ({})",
                scores.ncols(),
                explained_variance_ratio.len()
            )));
        }
        Ok(Self {
            scores,
            explained_variance_ratio,
        })
    }

    /// Number of retained component axes.
    pub fn n_components(&self) -> usize {
        self.scores.ncols()
    }

    /// Number of samples, identical to the input matrix row count.
    pub fn n_samples(&self) -> usize {
        self.scores.nrows()
    }

    /// Per-sample scores, shape `(n_samples, k)`.
    pub fn scores(&self) -> &Array2<f64> {
        &self.scores
    }

    /// Scores along a single axis, ordered by sample.
    pub fn axis_scores(&self, axis: usize) -> ArrayView1<'_, f64> {
        self.scores.column(axis)
    }

    /// Explained-variance fraction per axis, each in `[0, 1]`, non-increasing.
    ///
    /// Fractions are taken against the total variance across ALL directions,
    /// so they sum to less than 1 whenever `k` is below the full rank.
    pub fn explained_variance_ratio(&self) -> &Array1<f64> {
        &self.explained_variance_ratio
    }
}

/// Projects a standardized matrix onto its top principal components.
///
/// `k_requested` is silently clipped to `min(n_samples, n_features)`; asking
/// for more components than the data can carry is not an error. The
/// decomposition runs on the `d x d` covariance matrix when
/// `n_features <= n_samples` and switches to the `n x n` Gram matrix
/// otherwise, mapping Gram eigenvectors back to feature space.
///
/// # Errors
/// Returns an error for fewer than 2 samples or a failed backend
/// eigen-decomposition. Well-formed finite input does not otherwise fail.
pub fn project(standardized: &Array2<f64>, k_requested: usize) -> Result<ComponentSpace, Error> {
    let n_samples = standardized.nrows();
    let n_features = standardized.ncols();

    if n_samples < 2 {
        return Err(Error::TooFewSamples(n_samples));
    }
    let k = k_requested.min(n_samples).min(n_features);
    if k == 0 {
        return ComponentSpace::from_parts(Array2::zeros((n_samples, 0)), Array1::zeros(0));
    }

    let rotation;
    let ratios;
    if n_features <= n_samples {
        // Covariance path: d x d eigen-decomposition.
        let mut cov_matrix = standardized.t().dot(standardized);
        cov_matrix /= (n_samples - 1) as f64;

        let (vals, vecs) = cov_matrix.eigh(UPLO::Upper).map_err(|e| {
            Error::Decomposition(format!("covariance eigen-decomposition failed: {}", e))
        })?;
        let mut eig_pairs: Vec<(f64, Array1<f64>)> = vals
            .into_iter()
            .zip(vecs.columns().into_iter().map(|col| col.to_owned()))
            .collect();
        eig_pairs.sort_by(|(a, _), (b, _)| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));

        let total_variance: f64 = eig_pairs.iter().map(|(val, _)| val.max(0.0)).sum();

        let mut rotation_matrix = Array2::<f64>::zeros((n_features, k));
        let mut ratio_vector = Array1::<f64>::zeros(k);
        for i in 0..k {
            let (eigval, ref eigvec) = eig_pairs[i];
            ratio_vector[i] = variance_fraction(eigval, total_variance);
            rotation_matrix.column_mut(i).assign(eigvec);
        }
        rotation = rotation_matrix;
        ratios = ratio_vector;
    } else {
        // Gram path: n x n eigen-decomposition, then map eigenvectors u back
        // to feature space via X^T u / sqrt(lambda * (n - 1)).
        let mut gram_matrix = standardized.dot(&standardized.t());
        gram_matrix /= (n_samples - 1) as f64;

        let (vals, u_vecs) = gram_matrix
            .eigh(UPLO::Upper)
            .map_err(|e| Error::Decomposition(format!("Gram eigen-decomposition failed: {}", e)))?;
        let mut eig_pairs: Vec<(f64, Array1<f64>)> = vals
            .into_iter()
            .zip(u_vecs.columns().into_iter().map(|col| col.to_owned()))
            .collect();
        eig_pairs.sort_by(|(a, _), (b, _)| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));

        // Covariance and Gram matrices share their non-zero spectrum, so the
        // Gram trace gives the same total variance.
        let total_variance: f64 = eig_pairs.iter().map(|(val, _)| val.max(0.0)).sum();

        let mut rotation_matrix = Array2::<f64>::zeros((n_features, k));
        let mut ratio_vector = Array1::<f64>::zeros(k);
        for i in 0..k {
            let (eigval, ref u_col) = eig_pairs[i];
            ratio_vector[i] = variance_fraction(eigval, total_variance);

            let mut axis = standardized.t().dot(u_col);
            let denom = eigval.max(EIGENVALUE_FLOOR).sqrt() * ((n_samples - 1) as f64).sqrt();
            axis.mapv_inplace(|x| x / denom);

            // Re-normalize to unit length; a near-zero axis carried no
            // variance and is stored as the zero vector.
            let norm = axis.dot(&axis).sqrt();
            if norm > NORMALIZATION_THRESHOLD {
                axis.mapv_inplace(|x| x / norm);
            } else {
                axis.fill(0.0);
            }
            rotation_matrix.column_mut(i).assign(&axis);
        }
        rotation = rotation_matrix;
        ratios = ratio_vector;
    }

    let scores = standardized.dot(&rotation);
    ComponentSpace::from_parts(scores, ratios)
}

fn variance_fraction(eigval: f64, total_variance: f64) -> f64 {
    if total_variance > 0.0 {
        (eigval.max(0.0) / total_variance).min(1.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::standardize::standardize;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    fn toy_standardized() -> Array2<f64> {
        standardize(array![
            [2.5, 2.4, 0.5],
            [0.5, 0.7, 1.1],
            [2.2, 2.9, 0.3],
            [1.9, 2.2, 0.8],
            [3.1, 3.0, 0.1],
            [2.3, 2.7, 0.6],
        ])
    }

    #[test]
    fn fractions_are_ordered_and_bounded() {
        let space = project(&toy_standardized(), 3).unwrap();
        let ratios = space.explained_variance_ratio();
        assert_eq!(ratios.len(), 3);
        for i in 0..ratios.len() {
            assert!(ratios[i] >= 0.0 && ratios[i] <= 1.0, "ratio out of [0,1]");
            if i > 0 {
                assert!(
                    ratios[i] <= ratios[i - 1] + 1e-12,
                    "ratios must be non-increasing"
                );
            }
        }
        assert!(ratios.sum() <= 1.0 + 1e-9);
    }

    #[test]
    fn k_is_clipped_to_min_dimension() {
        // 6 samples x 3 features: requesting 10 yields 3 axes.
        let space = project(&toy_standardized(), 10).unwrap();
        assert_eq!(space.n_components(), 3);
        assert_eq!(space.n_samples(), 6);
    }

    #[test]
    fn score_columns_are_uncorrelated() {
        // Scores along distinct principal axes have zero covariance; this
        // holds regardless of which sign each axis came out with.
        let space = project(&toy_standardized(), 3).unwrap();
        let scores = space.scores();
        for a in 0..3 {
            for b in (a + 1)..3 {
                let dot = scores.column(a).dot(&scores.column(b));
                assert_abs_diff_eq!(dot, 0.0, epsilon = 1e-8);
            }
        }
    }

    #[test]
    fn first_axis_matches_dominant_direction_up_to_sign() {
        // Two perfectly correlated features: PC1 carries all the variance
        // and every sample's score is proportional to its (standardized)
        // feature value, up to a global sign flip.
        let standardized = standardize(array![
            [1.0, 2.0],
            [2.0, 4.0],
            [3.0, 6.0],
            [4.0, 8.0],
        ]);
        let space = project(&standardized, 2).unwrap();
        let ratios = space.explained_variance_ratio();
        assert_abs_diff_eq!(ratios[0], 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(ratios[1], 0.0, epsilon = 1e-9);

        let pc1 = space.axis_scores(0);
        let reference = standardized.column(0);
        let corr =
            pc1.dot(&reference) / (pc1.dot(&pc1).sqrt() * reference.dot(&reference).sqrt());
        assert_abs_diff_eq!(corr.abs(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn gram_path_handles_wide_matrices() {
        // 3 samples x 5 features exercises the Gram branch. Centering leaves
        // rank <= n_samples - 1 = 2, so the top two fractions account for
        // everything and the third is zero.
        let standardized = standardize(array![
            [0.5855, -0.4534, 0.6300, -0.9193, 0.3706],
            [0.7094, 0.6058, -0.2761, -0.1162, 0.5202],
            [-0.1093, -1.8179, -0.2841, 1.8173, -0.7505],
        ]);
        let space = project(&standardized, 3).unwrap();
        assert_eq!(space.n_components(), 3);
        let ratios = space.explained_variance_ratio();
        assert_abs_diff_eq!(ratios[0] + ratios[1], 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(ratios[2], 0.0, epsilon = 1e-9);
    }

    #[test]
    fn constant_column_scenario() {
        // 4 samples, 3 features, one constant: the standardizer zeroes the
        // constant column and the projector returns exactly 2 well-ordered
        // axes.
        let standardized = standardize(array![
            [1.0, 7.0, 0.5],
            [2.0, 7.0, 1.5],
            [3.0, 7.0, 0.2],
            [4.0, 7.0, 1.9],
        ]);
        let space = project(&standardized, 2).unwrap();
        assert_eq!(space.n_components(), 2);
        let ratios = space.explained_variance_ratio();
        assert!(ratios[0] >= ratios[1]);
        assert!(ratios.sum() <= 1.0 + 1e-9);
    }

    #[test]
    fn too_few_samples_is_an_error() {
        let standardized = standardize(array![[1.0, 2.0]]);
        assert!(matches!(
            project(&standardized, 2),
            Err(Error::TooFewSamples(1))
        ));
    }

    #[test]
    fn from_parts_rejects_mismatched_shapes() {
        let scores = Array2::<f64>::zeros((4, 2));
        let ratios = Array1::<f64>::zeros(3);
        assert!(ComponentSpace::from_parts(scores, ratios).is_err());
    }
}
