//! Componentwise vector helpers
//!
//! Points are plain `f64` slices. These helpers assume equal lengths and
//! operate over the shorter operand otherwise.

/// Element-wise difference `a - b`
pub fn sub(a: &[f64], b: &[f64]) -> Vec<f64> {
    a.iter().zip(b).map(|(x, y)| x - y).collect()
}

/// Dot product
pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Euclidean norm
pub fn norm(a: &[f64]) -> f64 {
    dot(a, a).sqrt()
}

/// Largest absolute componentwise difference between two points
pub fn max_abs_diff(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f64::max)
}

/// Componentwise mean of a set of points of dimension `dimension`
///
/// Returns a zero vector when `points` is empty.
pub fn mean<'a, I>(points: I, dimension: usize) -> Vec<f64>
where
    I: IntoIterator<Item = &'a [f64]>,
{
    let mut total = vec![0.0; dimension];
    let mut count = 0usize;
    for point in points {
        for (t, x) in total.iter_mut().zip(point) {
            *t += x;
        }
        count += 1;
    }
    if count > 0 {
        let n = count as f64;
        for t in total.iter_mut() {
            *t /= n;
        }
    }
    total
}

/// Per-coordinate population standard deviation around `center`
pub fn std_dev<'a, I>(points: I, center: &[f64]) -> Vec<f64>
where
    I: IntoIterator<Item = &'a [f64]>,
{
    let mut sum_sq = vec![0.0; center.len()];
    let mut count = 0usize;
    for point in points {
        for ((s, x), c) in sum_sq.iter_mut().zip(point).zip(center) {
            *s += (x - c).powi(2);
        }
        count += 1;
    }
    if count == 0 {
        return sum_sq;
    }
    let n = count as f64;
    sum_sq.into_iter().map(|s| (s / n).sqrt()).collect()
}
