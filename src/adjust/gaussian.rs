//! Separable Gaussian filter for 8-bit channels.
//!
//! The kernel spans `round(4 * sigma)` samples each side. Borders use
//! half-sample symmetric reflection (`d c b a | a b c d | d c b a`).
//! Both passes accumulate in `f64` and the result is rounded once.

use ndarray::{Array2, Axis};

use crate::constants::adjust::GAUSSIAN_TRUNCATE;

/// Normalized 1D Gaussian weights for `sigma`.
pub fn gaussian_kernel(sigma: f64) -> Vec<f64> {
    let radius = (GAUSSIAN_TRUNCATE * sigma + 0.5) as isize;
    let two_sigma_sq = 2.0 * sigma * sigma;
    let mut weights: Vec<f64> = (-radius..=radius)
        .map(|x| (-((x * x) as f64) / two_sigma_sq).exp())
        .collect();
    let sum: f64 = weights.iter().sum();
    for w in &mut weights {
        *w /= sum;
    }
    weights
}

/// Blur a (height, width) channel with a Gaussian of standard deviation `sigma`.
pub fn gaussian_blur(channel: &Array2<u8>, sigma: f64) -> Array2<u8> {
    if sigma <= 0.0 {
        return channel.clone();
    }
    let kernel = gaussian_kernel(sigma);
    let input = channel.mapv(f64::from);
    let rows_done = correlate_axis(&input, &kernel, Axis(0));
    let both_done = correlate_axis(&rows_done, &kernel, Axis(1));
    both_done.mapv(|v| v.round().clamp(0.0, 255.0) as u8)
}

fn correlate_axis(input: &Array2<f64>, kernel: &[f64], axis: Axis) -> Array2<f64> {
    let radius = (kernel.len() / 2) as isize;
    let mut output = Array2::<f64>::zeros(input.raw_dim());

    for (lane_in, mut lane_out) in input.lanes(axis).into_iter().zip(output.lanes_mut(axis)) {
        let n = lane_in.len();
        for i in 0..n {
            let mut acc = 0.0;
            for (k, w) in kernel.iter().enumerate() {
                let src = reflect_index(i as isize + k as isize - radius, n);
                acc += w * lane_in[src];
            }
            lane_out[i] = acc;
        }
    }
    output
}

/// Map any index onto `0..n` by repeated mirror reflection about the edges.
fn reflect_index(i: isize, n: usize) -> usize {
    let n = n as isize;
    let period = 2 * n;
    let m = i.rem_euclid(period);
    (if m >= n { period - 1 - m } else { m }) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kernel_normalized_and_symmetric() {
        let k = gaussian_kernel(1.2);
        assert_eq!(k.len(), 11);
        assert!((k.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        for i in 0..k.len() / 2 {
            assert!((k[i] - k[k.len() - 1 - i]).abs() < 1e-15);
        }
    }

    #[test]
    fn test_reflect_index() {
        assert_eq!(reflect_index(-1, 4), 0);
        assert_eq!(reflect_index(-2, 4), 1);
        assert_eq!(reflect_index(4, 4), 3);
        assert_eq!(reflect_index(5, 4), 2);
        assert_eq!(reflect_index(9, 4), 1);
        assert_eq!(reflect_index(3, 1), 0);
    }

    #[test]
    fn test_constant_image_unchanged() {
        let flat = Array2::<u8>::from_elem((6, 5), 200);
        assert_eq!(gaussian_blur(&flat, 2.0), flat);
    }

    #[test]
    fn test_blur_preserves_shape() {
        let ch = Array2::<u8>::from_shape_fn((3, 7), |(y, x)| (x * 30 + y) as u8);
        assert_eq!(gaussian_blur(&ch, 0.4).dim(), (3, 7));
    }
}
