use crate::rrt::error::PlanningError;
use crate::util::json::float_to_json;
use json::JsonValue;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How a tree grows towards a sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExtensionStrategy {
    /// Take a single bounded step towards the sample.
    Extend,
    /// Keep stepping towards the sample until blocked or reached.
    Connect,
}

/// Options for RRT planning.
///
/// Distances are joint-space distances (radians for revolute joints).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerOptions {
    /// Maximum angle step for collision checking along path segments.
    pub max_angle_step: f64,
    /// Maximum distance covered by a single extension step.
    pub max_connection_dist: f64,
    /// If true, extensions repeat towards the sample until blocked (RRTConnect).
    pub rrt_connect: bool,
    /// If true, alternates growth between a start tree and a goal tree.
    pub bidirectional_rrt: bool,
    /// If true, newly inserted nodes are rewired to cheaper parents (RRT*).
    pub rrt_star: bool,
    /// Maximum distance to consider nodes for rewiring. Infinite means all nodes.
    pub max_rewire_dist: f64,
    /// Maximum planning time, in seconds. Infinite means no time limit.
    pub max_planning_time: f64,
    /// Probability of sampling the other tree's root instead of a random configuration.
    pub goal_biasing_probability: f64,
}

impl Default for PlannerOptions {
    fn default() -> Self {
        Self {
            max_angle_step: 0.05,
            max_connection_dist: 0.2,
            rrt_connect: false,
            bidirectional_rrt: false,
            rrt_star: false,
            max_rewire_dist: f64::INFINITY,
            max_planning_time: 10.0,
            goal_biasing_probability: 0.0,
        }
    }
}

impl PlannerOptions {
    pub fn extension_strategy(&self) -> ExtensionStrategy {
        if self.rrt_connect {
            ExtensionStrategy::Connect
        } else {
            ExtensionStrategy::Extend
        }
    }

    /// The wall-clock budget as a duration. An infinite budget maps to [`Duration::MAX`].
    pub fn planning_duration(&self) -> Result<Duration, PlanningError> {
        if self.max_planning_time == f64::INFINITY {
            return Ok(Duration::MAX);
        }
        Duration::try_from_secs_f64(self.max_planning_time).map_err(|_| {
            PlanningError::InvalidOptions(format!(
                "max_planning_time must be a representable non-negative number of seconds, got {}",
                self.max_planning_time
            ))
        })
    }

    /// Checks every option against its documented range.
    pub fn validate(&self) -> Result<(), PlanningError> {
        if !(self.max_angle_step > 0.0 && self.max_angle_step.is_finite()) {
            return Err(PlanningError::InvalidOptions(format!(
                "max_angle_step must be positive and finite, got {}",
                self.max_angle_step
            )));
        }
        if !(self.max_connection_dist > 0.0 && self.max_connection_dist.is_finite()) {
            return Err(PlanningError::InvalidOptions(format!(
                "max_connection_dist must be positive and finite, got {}",
                self.max_connection_dist
            )));
        }
        if !(self.max_rewire_dist >= 0.0) {
            return Err(PlanningError::InvalidOptions(format!(
                "max_rewire_dist must be non-negative, got {}",
                self.max_rewire_dist
            )));
        }
        if !(0.0..=1.0).contains(&self.goal_biasing_probability) {
            return Err(PlanningError::InvalidOptions(format!(
                "goal_biasing_probability must be within [0, 1], got {}",
                self.goal_biasing_probability
            )));
        }
        self.planning_duration()?;
        Ok(())
    }

    /// Serializes the options to JSON. Infinite limits are written as `null`.
    pub fn to_json(&self) -> JsonValue {
        json::object! {
            max_angle_step: float_to_json(self.max_angle_step),
            max_connection_dist: float_to_json(self.max_connection_dist),
            rrt_connect: self.rrt_connect,
            bidirectional_rrt: self.bidirectional_rrt,
            rrt_star: self.rrt_star,
            max_rewire_dist: float_to_json(self.max_rewire_dist),
            max_planning_time: float_to_json(self.max_planning_time),
            goal_biasing_probability: float_to_json(self.goal_biasing_probability),
        }
    }

    /// Parses options from a JSON object.
    ///
    /// Missing fields keep their default value. An explicit `null` means no limit
    /// for `max_rewire_dist` and `max_planning_time` and the default elsewhere.
    /// The result is validated.
    pub fn from_json(text: &str) -> Result<Self, PlanningError> {
        let value = json::parse(text)
            .map_err(|e| PlanningError::InvalidOptions(format!("malformed JSON: {}", e)))?;
        if !value.is_object() {
            return Err(PlanningError::InvalidOptions(
                "options must be a JSON object".to_string(),
            ));
        }

        let mut options = Self::default();
        read_f64(&value, "max_angle_step", &mut options.max_angle_step)?;
        read_f64(&value, "max_connection_dist", &mut options.max_connection_dist)?;
        read_bool(&value, "rrt_connect", &mut options.rrt_connect)?;
        read_bool(&value, "bidirectional_rrt", &mut options.bidirectional_rrt)?;
        read_bool(&value, "rrt_star", &mut options.rrt_star)?;
        read_limit(&value, "max_rewire_dist", &mut options.max_rewire_dist)?;
        read_limit(&value, "max_planning_time", &mut options.max_planning_time)?;
        read_f64(
            &value,
            "goal_biasing_probability",
            &mut options.goal_biasing_probability,
        )?;
        options.validate()?;
        Ok(options)
    }
}

fn read_f64(value: &JsonValue, key: &str, target: &mut f64) -> Result<(), PlanningError> {
    let field = &value[key];
    if field.is_null() {
        return Ok(());
    }
    *target = field
        .as_f64()
        .ok_or_else(|| PlanningError::InvalidOptions(format!("{} must be a number", key)))?;
    Ok(())
}

fn read_limit(value: &JsonValue, key: &str, target: &mut f64) -> Result<(), PlanningError> {
    if value.has_key(key) && value[key].is_null() {
        *target = f64::INFINITY;
        return Ok(());
    }
    read_f64(value, key, target)
}

fn read_bool(value: &JsonValue, key: &str, target: &mut bool) -> Result<(), PlanningError> {
    let field = &value[key];
    if field.is_null() {
        return Ok(());
    }
    *target = field
        .as_bool()
        .ok_or_else(|| PlanningError::InvalidOptions(format!("{} must be a boolean", key)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let options = PlannerOptions::default();
        assert!(options.validate().is_ok());
        assert_eq!(options.extension_strategy(), ExtensionStrategy::Extend);
        assert!(options.max_rewire_dist.is_infinite());
        assert_eq!(options.planning_duration().unwrap(), Duration::from_secs(10));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let cases = [
            PlannerOptions {
                max_angle_step: 0.0,
                ..Default::default()
            },
            PlannerOptions {
                max_connection_dist: -0.1,
                ..Default::default()
            },
            PlannerOptions {
                max_rewire_dist: f64::NAN,
                ..Default::default()
            },
            PlannerOptions {
                goal_biasing_probability: 1.5,
                ..Default::default()
            },
            PlannerOptions {
                max_planning_time: -1.0,
                ..Default::default()
            },
        ];
        for options in cases {
            assert!(matches!(
                options.validate(),
                Err(PlanningError::InvalidOptions(_))
            ));
        }
    }

    #[test]
    fn test_json_round_trip_keeps_infinite_rewire_distance() {
        let options = PlannerOptions {
            rrt_connect: true,
            rrt_star: true,
            max_connection_dist: 0.5,
            ..Default::default()
        };
        let text = options.to_json().dump();
        assert!(text.contains("\"max_rewire_dist\":null"));

        let parsed = PlannerOptions::from_json(&text).unwrap();
        assert_eq!(parsed, options);
        assert_eq!(parsed.extension_strategy(), ExtensionStrategy::Connect);
    }

    #[test]
    fn test_from_json_partial_and_invalid() {
        let parsed = PlannerOptions::from_json(r#"{"bidirectional_rrt": true}"#).unwrap();
        assert!(parsed.bidirectional_rrt);
        assert_eq!(parsed.max_angle_step, 0.05);

        assert!(PlannerOptions::from_json(r#"{"rrt_star": 1}"#).is_err());
        assert!(PlannerOptions::from_json(r#"{"max_angle_step": -1}"#).is_err());
        assert!(PlannerOptions::from_json("[1, 2]").is_err());
        assert!(PlannerOptions::from_json("{").is_err());
    }

    #[test]
    fn test_infinite_planning_time_means_no_limit() {
        let options = PlannerOptions {
            max_planning_time: f64::INFINITY,
            ..Default::default()
        };
        assert!(options.validate().is_ok());
        assert_eq!(options.planning_duration().unwrap(), Duration::MAX);

        let text = options.to_json().dump();
        assert!(text.contains("\"max_planning_time\":null"));
        assert_eq!(PlannerOptions::from_json(&text).unwrap(), options);

        // Leaving the field out keeps the default budget.
        let parsed = PlannerOptions::from_json("{}").unwrap();
        assert_eq!(parsed.max_planning_time, 10.0);

        let nan = PlannerOptions {
            max_planning_time: f64::NAN,
            ..Default::default()
        };
        assert!(nan.validate().is_err());
    }

    #[test]
    fn test_serde_defaults_missing_fields() {
        let parsed: PlannerOptions = serde_json::from_str(r#"{"rrt_star": true}"#).unwrap();
        assert!(parsed.rrt_star);
        assert_eq!(parsed.max_connection_dist, 0.2);
    }
}
