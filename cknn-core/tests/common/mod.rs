use cknn_core::{DataSource, DataSourceError, PointSet, SquareMatrix, ratio_matrix};

/// Twenty standard-normal points in the plane, drawn once and frozen so the
/// graph shapes asserted by the suites stay stable.
#[rustfmt::skip]
const SEED_POINTS: [[f64; 2]; 20] = [
    [1.62434536, -0.61175641], [-0.52817175, -1.07296862],
    [0.86540763, -2.3015387], [1.74481176, -0.7612069],
    [0.3190391, -0.24937038], [1.46210794, -2.06014071],
    [-0.3224172, -0.38405435], [1.13376944, -1.09989127],
    [-0.17242821, -0.87785842], [0.04221375, 0.58281521],
    [-1.10061918, 1.14472371], [0.90159072, 0.50249434],
    [0.90085595, -0.68372786], [-0.12289023, -0.93576943],
    [-0.26788808, 0.53035547], [-0.69166075, -0.39675353],
    [-0.6871727, -0.84520564], [-0.67124613, -0.0126646],
    [-1.11731035, 0.2344157], [1.65980218, 0.74204416],
];

#[must_use]
pub fn seed_points() -> Vec<Vec<f64>> {
    SEED_POINTS.iter().map(|point| point.to_vec()).collect()
}

/// Density-normalised Euclidean distances over [`seed_points`].
#[must_use]
pub fn seed_ratios(n_neighbors: usize) -> SquareMatrix {
    let points = PointSet::euclidean(seed_points()).expect("valid points");
    let distances = SquareMatrix::from_data_source(&points).expect("distances");
    ratio_matrix(&distances, n_neighbors).expect("ratios")
}

/// One-dimensional source whose distance is the absolute difference.
#[derive(Clone)]
pub struct Line {
    data: Vec<f64>,
}

impl Line {
    #[must_use]
    pub fn new(data: Vec<f64>) -> Self {
        Self { data }
    }
}

impl DataSource for Line {
    fn len(&self) -> usize {
        self.data.len()
    }

    fn name(&self) -> &str {
        "line"
    }

    fn distance(&self, i: usize, j: usize) -> Result<f64, DataSourceError> {
        let a = self
            .data
            .get(i)
            .ok_or(DataSourceError::OutOfBounds { index: i })?;
        let b = self
            .data
            .get(j)
            .ok_or(DataSourceError::OutOfBounds { index: j })?;
        Ok((a - b).abs())
    }
}
