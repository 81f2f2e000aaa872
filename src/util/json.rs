use crate::rrt::state::RealVectorState;
use json::JsonValue;
use num_traits::Float;

/// Converts a float to a JSON number. Non-finite values become `null`.
pub fn float_to_json<F: Float>(value: F) -> JsonValue {
    match value.to_f64() {
        Some(value) if value.is_finite() => JsonValue::Number(value.into()),
        _ => JsonValue::Null,
    }
}

pub fn real_vector_to_json_array<F: Float, const N: usize>(
    real_vector: &RealVectorState<F, N>,
) -> JsonValue {
    JsonValue::Array(real_vector.values().iter().map(|&v| float_to_json(v)).collect())
}

/// Converts a sequence of configurations into an array of arrays.
pub fn path_to_json<F: Float, const N: usize>(path: &[RealVectorState<F, N>]) -> JsonValue {
    JsonValue::Array(path.iter().map(real_vector_to_json_array).collect())
}
