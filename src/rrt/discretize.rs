use crate::rrt::state::RealVectorState;
use num_traits::Float;

/// Discretizes the straight joint-space segment between two configurations.
///
/// The number of segments is chosen so that consecutive samples are no farther
/// than `max_angle_step` apart in Euclidean joint-space distance. The returned
/// sequence starts with `from` and ends with exactly `to`. Identical endpoints
/// yield a single sample.
///
/// Parameters:
/// - `from`: The start configuration.
/// - `to`: The end configuration.
/// - `max_angle_step`: The maximum distance between consecutive samples.
pub fn discretize<F: Float, const N: usize>(
    from: &RealVectorState<F, N>,
    to: &RealVectorState<F, N>,
    max_angle_step: F,
) -> Vec<RealVectorState<F, N>> {
    let length = from.euclidean_distance(to);
    if length == F::zero() {
        return vec![*from];
    }

    let segments = if max_angle_step > F::zero() {
        (length / max_angle_step).ceil().to_usize()
    } else {
        None
    };
    let segments = match segments {
        Some(segments) if segments > 0 => segments,
        _ => return vec![*from, *to],
    };

    let mut path = Vec::with_capacity(segments + 1);
    let denominator = F::from(segments).unwrap_or_else(F::one);
    for i in 0..segments {
        let t = F::from(i).unwrap_or_else(F::zero) / denominator;
        path.push(from.lerp(to, t));
    }
    path.push(*to);
    path
}
