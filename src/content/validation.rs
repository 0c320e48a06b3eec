//! Range and consistency checks for loaded movement tuning.

use crate::movement::resources::MovementTuning;

/// A validation error with context about what failed.
#[derive(Debug)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid tuning field '{}': {}", self.field, self.message)
    }
}

macro_rules! check {
    ($errors:expr, $cond:expr, $field:expr, $($msg:tt)*) => {
        if !$cond {
            $errors.push(ValidationError {
                field: $field,
                message: format!($($msg)*),
            });
        }
    };
}

/// Validate a tuning struct before it becomes the live resource.
/// Returns a list of validation errors, empty if everything is in range.
pub fn validate_tuning(tuning: &MovementTuning) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    check!(
        errors,
        tuning.run_speed > 0.0,
        "run_speed",
        "must be positive, got {}",
        tuning.run_speed
    );
    check!(
        errors,
        tuning.jump_velocity > 0.0,
        "jump_velocity",
        "must be positive, got {}",
        tuning.jump_velocity
    );
    check!(
        errors,
        tuning.short_jump_velocity > 0.0 && tuning.short_jump_velocity <= tuning.jump_velocity,
        "short_jump_velocity",
        "must be in (0, jump_velocity], got {}",
        tuning.short_jump_velocity
    );
    check!(
        errors,
        tuning.gravity > 0.0,
        "gravity",
        "must be positive, got {}",
        tuning.gravity
    );
    check!(
        errors,
        tuning.max_fall_speed > 0.0,
        "max_fall_speed",
        "must be positive, got {}",
        tuning.max_fall_speed
    );
    check!(
        errors,
        tuning.air_drag > 0.0 && tuning.air_drag <= 1.0,
        "air_drag",
        "must be in (0, 1], got {}",
        tuning.air_drag
    );
    check!(
        errors,
        (0.0..=1.0).contains(&tuning.double_jump_factor),
        "double_jump_factor",
        "must be in [0, 1], got {}",
        tuning.double_jump_factor
    );
    check!(
        errors,
        tuning.ground_grace >= 0.0,
        "ground_grace",
        "must be non-negative, got {}",
        tuning.ground_grace
    );
    check!(
        errors,
        tuning.air_grace >= 0.0,
        "air_grace",
        "must be non-negative, got {}",
        tuning.air_grace
    );
    check!(
        errors,
        tuning.input_delay_after_wall_jump >= 0.0,
        "input_delay_after_wall_jump",
        "must be non-negative, got {}",
        tuning.input_delay_after_wall_jump
    );
    check!(
        errors,
        tuning.grounded_foot_distance > 0.0,
        "grounded_foot_distance",
        "must be positive, got {}",
        tuning.grounded_foot_distance
    );
    check!(
        errors,
        tuning.jump_queue_foot_distance > tuning.grounded_foot_distance,
        "jump_queue_foot_distance",
        "must exceed grounded_foot_distance ({}), got {}",
        tuning.grounded_foot_distance,
        tuning.jump_queue_foot_distance
    );
    check!(
        errors,
        tuning.ledge_check_distance > 0.0 && tuning.ledge_check_height > 0.0,
        "ledge_check_distance",
        "ledge probe geometry must be positive"
    );
    check!(
        errors,
        tuning.arrive_epsilon > 0.0,
        "arrive_epsilon",
        "must be positive, got {}",
        tuning.arrive_epsilon
    );
    check!(
        errors,
        tuning.duck_speed_factor > 0.0 && tuning.duck_speed_factor <= 1.0,
        "duck_speed_factor",
        "must be in (0, 1], got {}",
        tuning.duck_speed_factor
    );
    check!(
        errors,
        tuning.crouch_height_factor > 0.0 && tuning.crouch_height_factor < 1.0,
        "crouch_height_factor",
        "must be in (0, 1), got {}",
        tuning.crouch_height_factor
    );
    check!(
        errors,
        tuning.dash_time > 0.0 && tuning.dash_cooldown >= 0.0,
        "dash_time",
        "dash timing must be positive duration with non-negative cooldown"
    );
    check!(
        errors,
        tuning.input_deadzone >= 0.0 && tuning.input_deadzone < 1.0,
        "input_deadzone",
        "must be in [0, 1), got {}",
        tuning.input_deadzone
    );

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tuning_is_valid() {
        assert!(validate_tuning(&MovementTuning::default()).is_empty());
    }

    #[test]
    fn rejects_drag_above_one() {
        let mut tuning = MovementTuning::default();
        tuning.air_drag = 1.5;
        let errors = validate_tuning(&tuning);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "air_drag");
    }

    #[test]
    fn rejects_queue_tier_below_grounded_tier() {
        let mut tuning = MovementTuning::default();
        tuning.jump_queue_foot_distance = tuning.grounded_foot_distance - 1.0;
        let errors = validate_tuning(&tuning);
        assert!(errors.iter().any(|e| e.field == "jump_queue_foot_distance"));
    }

    #[test]
    fn error_display_names_field() {
        let mut tuning = MovementTuning::default();
        tuning.run_speed = -1.0;
        let errors = validate_tuning(&tuning);
        let text = errors[0].to_string();
        assert!(text.contains("run_speed"));
    }
}
