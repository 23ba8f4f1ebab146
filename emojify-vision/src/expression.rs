//! Expression classification from per-face probabilities.
//!
//! Each of the three probabilities is compared against its own threshold with a
//! strict `>`; a value equal to the threshold counts as "not above". The three
//! booleans select one of eight concrete expressions.

use std::fmt;

/// Default threshold shared by all three probabilities.
pub const DEFAULT_THRESHOLD: f32 = 0.5;

/// Facial expression selected for a single face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Expression {
    Smiling,
    Frowning,
    LeftWink,
    RightWink,
    LeftWinkFrowning,
    RightWinkFrowning,
    ClosedEyeSmiling,
    ClosedEyeFrowning,
    /// No expression could be derived (NaN probabilities). Never has an overlay.
    Undetermined,
}

impl Expression {
    /// Every expression that can carry an overlay, in catalog order.
    pub const CONCRETE: [Expression; 8] = [
        Expression::Smiling,
        Expression::Frowning,
        Expression::LeftWink,
        Expression::RightWink,
        Expression::LeftWinkFrowning,
        Expression::RightWinkFrowning,
        Expression::ClosedEyeSmiling,
        Expression::ClosedEyeFrowning,
    ];

    /// Slot of this expression in [`Expression::CONCRETE`].
    pub fn index(self) -> Option<usize> {
        match self {
            Expression::Smiling => Some(0),
            Expression::Frowning => Some(1),
            Expression::LeftWink => Some(2),
            Expression::RightWink => Some(3),
            Expression::LeftWinkFrowning => Some(4),
            Expression::RightWinkFrowning => Some(5),
            Expression::ClosedEyeSmiling => Some(6),
            Expression::ClosedEyeFrowning => Some(7),
            Expression::Undetermined => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Expression::Smiling => "smiling",
            Expression::Frowning => "frowning",
            Expression::LeftWink => "left-wink",
            Expression::RightWink => "right-wink",
            Expression::LeftWinkFrowning => "left-wink-frowning",
            Expression::RightWinkFrowning => "right-wink-frowning",
            Expression::ClosedEyeSmiling => "closed-eye-smiling",
            Expression::ClosedEyeFrowning => "closed-eye-frowning",
            Expression::Undetermined => "undetermined",
        }
    }

    fn from_flags(smiling: bool, left_eye_open: bool, right_eye_open: bool) -> Self {
        match (smiling, left_eye_open, right_eye_open) {
            (true, true, true) => Expression::Smiling,
            (false, true, true) => Expression::Frowning,
            (true, false, true) => Expression::LeftWink,
            (true, true, false) => Expression::RightWink,
            (false, false, true) => Expression::LeftWinkFrowning,
            (false, true, false) => Expression::RightWinkFrowning,
            (true, false, false) => Expression::ClosedEyeSmiling,
            (false, false, false) => Expression::ClosedEyeFrowning,
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// Per-probability decision thresholds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub smiling: f32,
    pub left_eye_open: f32,
    pub right_eye_open: f32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            smiling: DEFAULT_THRESHOLD,
            left_eye_open: DEFAULT_THRESHOLD,
            right_eye_open: DEFAULT_THRESHOLD,
        }
    }
}

impl Thresholds {
    /// Classify a face from its three probabilities.
    ///
    /// Total over every input: NaN in any position yields
    /// [`Expression::Undetermined`], anything else lands in the truth table.
    pub fn classify(&self, smiling: f32, left_eye_open: f32, right_eye_open: f32) -> Expression {
        log::debug!(
            "classify: smiling={} left_eye_open={} right_eye_open={}",
            smiling,
            left_eye_open,
            right_eye_open
        );

        let expression = if smiling.is_nan() || left_eye_open.is_nan() || right_eye_open.is_nan()
        {
            Expression::Undetermined
        } else {
            Expression::from_flags(
                smiling > self.smiling,
                left_eye_open > self.left_eye_open,
                right_eye_open > self.right_eye_open,
            )
        };

        log::debug!("classify: {}", expression);
        expression
    }
}

/// Classify with the default 0.5 thresholds.
pub fn classify(smiling: f32, left_eye_open: f32, right_eye_open: f32) -> Expression {
    Thresholds::default().classify(smiling, left_eye_open, right_eye_open)
}
