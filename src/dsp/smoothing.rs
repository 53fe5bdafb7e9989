/// Centered moving average.
///
/// Output `i` is the mean of the inputs at offsets `-(w/2) ..= w - 1 - w/2`
/// around `i` (for even `w` the window leans one sample into the past).
/// Near the edges the mean is taken over the samples that exist, so a
/// constant input stays constant all the way to both ends. This is not a
/// zero-padded `same`-mode convolution, which would pull the first and last
/// `w/2` outputs toward zero (a pitch track would droop at its edges).
///
/// Runs in O(n) with a running sum in f64.
pub fn moving_average(input: &[f32], window: usize) -> Vec<f32> {
    if window <= 1 || input.is_empty() {
        return input.to_vec();
    }

    let behind = window / 2;
    let ahead = window - 1 - behind;
    let len = input.len();

    let mut prefix = Vec::with_capacity(len + 1);
    prefix.push(0.0f64);
    let mut acc = 0.0f64;
    for &x in input {
        acc += x as f64;
        prefix.push(acc);
    }

    (0..len)
        .map(|i| {
            let lo = i.saturating_sub(behind);
            let hi = (i + ahead + 1).min(len);
            ((prefix[hi] - prefix[lo]) / (hi - lo) as f64) as f32
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn constant_input_is_unchanged() {
        let out = moving_average(&[220.0; 12], 5);
        for v in out {
            assert_relative_eq!(v, 220.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn odd_window_is_symmetric() {
        let mut impulse = vec![0.0f32; 9];
        impulse[4] = 5.0;
        let out = moving_average(&impulse, 5);
        assert_eq!(out, vec![0.0, 0.0, 1.0, 1.0, 1.0, 1.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn even_window_leans_back() {
        let mut impulse = vec![0.0f32; 20];
        impulse[10] = 10.0;
        let out = moving_average(&impulse, 10);
        // Sample 10 contributes to outputs 6..=15
        for (i, v) in out.iter().enumerate() {
            let expected = if (6..=15).contains(&i) { 1.0 } else { 0.0 };
            assert_relative_eq!(*v, expected, epsilon = 1e-6);
        }
    }

    #[test]
    fn edges_average_available_samples() {
        let out = moving_average(&[3.0, 6.0, 9.0], 3);
        assert_relative_eq!(out[0], 4.5);
        assert_relative_eq!(out[1], 6.0);
        assert_relative_eq!(out[2], 7.5);
    }

    #[test]
    fn trivial_windows_pass_through() {
        assert_eq!(moving_average(&[1.0, -1.0], 1), vec![1.0, -1.0]);
        assert!(moving_average(&[], 5).is_empty());
    }
}
