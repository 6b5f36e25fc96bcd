//! Password strength scoring
//!
//! Scores are heuristic and independent of any hash algorithm. The evaluation
//! combines length, character-class variety and a handful of weak-pattern
//! penalties, and a small denylist of very common passwords forces a zero.

use serde::Serialize;
use std::fmt;

const DENYLIST: &[&str] = &[
    "password",
    "123456",
    "qwerty",
    "admin",
    "welcome",
    "password123",
    "12345678",
    "letmein",
    "iloveyou",
    "abc123",
];

const MIN_LENGTH: usize = 8;
const MAX_LENGTH_POINTS: f64 = 40.0;

/// Qualitative bucket for a strength score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum StrengthRating {
    VeryWeak,
    Weak,
    Moderate,
    Strong,
    VeryStrong,
}

impl StrengthRating {
    fn from_score(score: u8) -> Self {
        match score {
            0..20 => StrengthRating::VeryWeak,
            20..40 => StrengthRating::Weak,
            40..60 => StrengthRating::Moderate,
            60..80 => StrengthRating::Strong,
            _ => StrengthRating::VeryStrong,
        }
    }
}

impl fmt::Display for StrengthRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            StrengthRating::VeryWeak => "Very Weak",
            StrengthRating::Weak => "Weak",
            StrengthRating::Moderate => "Moderate",
            StrengthRating::Strong => "Strong",
            StrengthRating::VeryStrong => "Very Strong",
        };
        f.write_str(label)
    }
}

/// Result of [`evaluate`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StrengthReport {
    /// 0..=100
    pub score: u8,
    pub rating: StrengthRating,
    /// Never empty
    pub feedback: Vec<String>,
}

fn has_repeated_run(password: &str) -> bool {
    let chars: Vec<char> = password.chars().collect();
    chars.windows(3).any(|w| w[0] == w[1] && w[1] == w[2])
}

/// Score `password` on a 0..=100 scale
pub fn evaluate(password: &str) -> StrengthReport {
    if password.is_empty() {
        return StrengthReport {
            score: 0,
            rating: StrengthRating::VeryWeak,
            feedback: vec!["No password provided".to_string()],
        };
    }

    let mut score = 0.0_f64;
    let mut feedback = Vec::new();
    let length = password.chars().count();

    if length < MIN_LENGTH {
        feedback.push("Password is too short");
    } else {
        score += (length as f64 * 2.5).min(MAX_LENGTH_POINTS);
    }

    if password.chars().any(|c| c.is_ascii_lowercase()) {
        score += 10.0;
    }
    if password.chars().any(|c| c.is_ascii_uppercase()) {
        score += 15.0;
    }
    if password.chars().any(|c| c.is_ascii_digit()) {
        score += 15.0;
    }
    if password.chars().any(|c| !c.is_ascii_alphanumeric()) {
        score += 20.0;
    }

    if has_repeated_run(password) {
        score -= 10.0;
        feedback.push("Avoid repeated characters");
    }

    if password.chars().all(|c| c.is_ascii_digit()) {
        score -= 15.0;
        feedback.push("Don't use only numbers");
    }

    let letters_only = password.chars().all(|c| c.is_ascii_alphabetic());
    if letters_only {
        score -= 10.0;
        feedback.push("Mix letters and numbers/symbols");
    }

    if letters_only && length <= 10 {
        score -= 10.0;
        feedback.push("Avoid using single dictionary words");
    }

    let lowered = password.to_lowercase();
    if DENYLIST.contains(&lowered.as_str()) {
        score = 0.0;
        feedback.push("This is a very common password");
    }

    let score = score.clamp(0.0, 100.0).round() as u8;
    if feedback.is_empty() {
        feedback.push("Good password!");
    }

    StrengthReport {
        score,
        rating: StrengthRating::from_score(score),
        feedback: feedback.into_iter().map(String::from).collect(),
    }
}
