//! Report rendering for validation results, plus the encouragement lines.

use tyro_engine::{CompilationError, TestResult};

/// How many compilation errors to show before truncating.
const MAX_SHOWN_ERRORS: usize = 5;

/// Render compilation errors as an indented report block.
pub fn format_compilation_feedback(errors: &[CompilationError]) -> String {
    let mut lines = Vec::new();
    lines.push(String::new());
    lines.push("  COMPILATION ERRORS:".to_string());
    lines.push(String::new());

    for err in errors.iter().take(MAX_SHOWN_ERRORS) {
        lines.push(format!("  Line {}: {}", err.line, err.friendly_message));
        if err.friendly_message != err.message {
            lines.push(format!("    (Original: {})", err.message.replace('\n', " / ")));
        }
        lines.push(String::new());
    }

    if errors.len() > MAX_SHOWN_ERRORS {
        lines.push(format!(
            "  ... and {} more errors",
            errors.len() - MAX_SHOWN_ERRORS
        ));
        lines.push(String::new());
    }

    lines.join("\n")
}

/// Render test results as ✓/✗ lines with failure hints and a tally.
pub fn format_test_feedback(results: &[TestResult]) -> String {
    let mut lines = Vec::new();
    lines.push(String::new());
    lines.push("  TEST RESULTS:".to_string());
    lines.push(String::new());

    for result in results {
        let icon = if result.passed { "✓" } else { "✗" };
        lines.push(format!("  {icon} {}", result.description));
        if !result.passed {
            if let Some(hint) = &result.error_hint {
                lines.push(format!("    → {hint}"));
            }
        }
    }

    lines.push(String::new());
    let passed = results.iter().filter(|r| r.passed).count();
    lines.push(format!("  {passed}/{} tests passed", results.len()));

    lines.join("\n")
}

/// A rotating encouragement line for failed attempts. Deterministic: the
/// attempt count picks the message.
pub fn encouraging_message(attempt: u32) -> &'static str {
    const MESSAGES: &[&str] = &[
        "Don't worry, everyone makes mistakes! Give it another shot.",
        "You're getting closer! Read the hint carefully.",
        "Almost there! Take a deep breath and try again.",
        "Learning is all about trying. You've got this!",
        "Even seasoned developers look things up. Don't give up!",
        "The type checker is your friend, not your enemy!",
        "Remember: every expert was once a beginner.",
    ];
    MESSAGES[attempt as usize % MESSAGES.len()]
}

/// A rotating victory line, picked by attempt count.
pub fn victory_message(attempt: u32) -> &'static str {
    const MESSAGES: &[&str] = &[
        "Excellent work! You nailed it!",
        "Perfect! The types are strong with this one!",
        "Brilliant! Your code compiles flawlessly!",
        "Outstanding! Another challenge conquered!",
        "Superb! Clean types, clean code!",
        "Impressive! You handled that like a pro!",
    ];
    MESSAGES[attempt as usize % MESSAGES.len()]
}

/// The first-try banner.
pub fn flawless_message() -> &'static str {
    "FLAWLESS! Solved on the first try! +50% bonus XP!"
}

/// Streak callout once a run is going.
pub fn streak_message(streak: u32) -> Option<String> {
    match streak {
        0..=2 => None,
        3..=4 => Some(format!("Nice streak! {streak} in a row! +25% streak bonus XP!")),
        5..=9 => Some(format!("ON FIRE! {streak} in a row! +25% streak bonus XP!")),
        _ => Some(format!("UNSTOPPABLE! {streak} in a row! +25% streak bonus XP!")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compilation_feedback_caps_at_five() {
        let errors: Vec<CompilationError> = (1..=7)
            .map(|i| CompilationError {
                line: i,
                column: 1,
                message: format!("error {i}"),
                friendly_message: format!("error {i}"),
                code: 100,
            })
            .collect();
        let report = format_compilation_feedback(&errors);
        assert!(report.contains("Line 5"));
        assert!(!report.contains("Line 6:"));
        assert!(report.contains("and 2 more errors"));
    }

    #[test]
    fn test_test_feedback_tally_and_hints() {
        let results = vec![
            TestResult {
                description: "works".into(),
                passed: true,
                error_hint: None,
            },
            TestResult {
                description: "breaks".into(),
                passed: false,
                error_hint: Some("try harder".into()),
            },
        ];
        let report = format_test_feedback(&results);
        assert!(report.contains("✓ works"));
        assert!(report.contains("✗ breaks"));
        assert!(report.contains("→ try harder"));
        assert!(report.contains("1/2 tests passed"));
    }

    #[test]
    fn test_messages_are_deterministic() {
        assert_eq!(encouraging_message(3), encouraging_message(3));
        assert_eq!(victory_message(1), victory_message(1));
        assert!(streak_message(2).is_none());
        assert!(streak_message(3).unwrap().contains("Nice streak"));
        assert!(streak_message(12).unwrap().contains("UNSTOPPABLE"));
    }
}
