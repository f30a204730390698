//! Lenient parsing for numbers typed into forms.
//!
//! Food and workout fields deliberately disagree: a food macro that can't be
//! read counts as zero, while a workout weight that can't be read stays unset.

/// Parse a food quantity or macro value; anything unusable becomes `0.0`.
#[must_use]
pub fn food_number(input: &str) -> f64 {
    input.trim().parse::<f64>().map_or(0.0, sanitize)
}

/// Clamp an already-typed food value: non-finite or negative becomes `0.0`.
#[must_use]
pub fn sanitize(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Parse a workout weight; blank or unusable input means "not filled in".
#[must_use]
pub fn workout_number(input: &str) -> Option<f64> {
    let value = input.trim().parse::<f64>().ok()?;
    (value.is_finite() && value >= 0.0).then_some(value)
}

/// Parse a set or rep count. Accepts integral values only (`"8"`, `"8.0"`).
#[must_use]
#[allow(clippy::cast_sign_loss)]
pub fn workout_count(input: &str) -> Option<u32> {
    let trimmed = input.trim();
    if let Ok(n) = trimmed.parse::<u32>() {
        return Some(n);
    }
    let value = workout_number(trimmed)?;
    (value.fract() == 0.0 && value <= f64::from(u32::MAX)).then_some(value as u32)
}
