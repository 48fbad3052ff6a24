//! Diagnostic translator: compiler error codes → beginner-friendly text.
//!
//! Known codes map to a fixed explanatory sentence. Unknown codes fall
//! back to a simplification pass over the raw message: code markers are
//! stripped, then an ordered list of rewrite rules turns compiler
//! phrasings into second-person plain language. At most one rewrite fires
//! per message in practice, since each message follows one template.

use std::collections::HashMap;

use regex::Regex;

/// Pure, total translator. Build once and reuse; the compiled regexes
/// are the only state it carries.
pub struct Translator {
    table: HashMap<u16, &'static str>,
    strip_markers: Regex,
    rewrites: Vec<(Regex, &'static str)>,
}

impl Translator {
    /// Build the translation table and rewrite rules.
    pub fn new() -> Self {
        let mut table = HashMap::new();

        // ── Syntax (E1xx) ──
        table.insert(
            100,
            "Syntax error: something is missing or out of place here. Check brackets, parentheses, and spelling.",
        );
        table.insert(101, "This string never ends. Add the closing double quote.");
        table.insert(
            102,
            "That escape sequence isn't valid. Inside strings you can use \\n, \\t, \\\", \\\\ and \\$.",
        );
        table.insert(
            103,
            "Only // line comments exist here. Replace /* ... */ with // on each line.",
        );
        table.insert(
            104,
            "This code is nested too deeply. Break it into smaller functions or bindings.",
        );

        // ── Types (E2xx) ──
        table.insert(
            200,
            "This type name isn't known. Check the spelling, and remember type names are PascalCase.",
        );
        table.insert(
            201,
            "Type mismatch! The value you're using doesn't match the expected type. Check that you're using the correct type.",
        );
        table.insert(202, "Wrong number of arguments. Check the function signature.");
        table.insert(
            203,
            "This name isn't defined. Did you forget to declare it, or is there a typo?",
        );
        table.insert(
            204,
            "You're trying to call something that isn't a function.",
        );
        table.insert(
            205,
            "This field doesn't exist on this record. Did you spell it correctly?",
        );
        table.insert(
            206,
            "This isn't a stdlib function. Check the module and function name.",
        );
        table.insert(
            207,
            "Not all code paths return a value. Make sure every branch in your function returns something.",
        );
        table.insert(
            208,
            "An if condition must be a bool. Use a comparison like == or > to produce one.",
        );
        table.insert(
            210,
            "This match doesn't handle every case. Add the missing variants or a _ arm.",
        );
        table.insert(211, "You can only loop over a list.");

        // ── Scope (E5xx) ──
        table.insert(
            500,
            "This name is already declared. Pick a different name, or assign to the existing one without 'let'.",
        );
        table.insert(
            501,
            "You're assigning to a name that doesn't exist yet. Declare it first with 'let'.",
        );

        let strip_markers =
            Regex::new(r"\s*\[?\(?E\d{3}\)?\]?").expect("marker regex is valid");

        let rewrites = vec![
            (
                Regex::new(r"expected '(.+?)', got '(.+?)'").expect("rewrite regex"),
                "You wrote '$2' here, but '$1' was expected",
            ),
            (
                Regex::new(r"type mismatch: expected (.+?), found (.+)").expect("rewrite regex"),
                "You're using type '$2' but type '$1' is expected",
            ),
            (
                Regex::new(r"unknown name '(.+?)'").expect("rewrite regex"),
                "The name '$1' isn't defined",
            ),
            (
                Regex::new(r"cannot assign to undeclared name '(.+?)'").expect("rewrite regex"),
                "You need to declare '$1' with 'let' before assigning to it",
            ),
        ];

        Self {
            table,
            strip_markers,
            rewrites,
        }
    }

    /// Translate a diagnostic.
    ///
    /// A known `code` returns its mapped sentence verbatim and ignores
    /// `original`. Anything else returns the simplified original message;
    /// unchanged (apart from marker stripping and trimming) when no
    /// rewrite matched.
    pub fn translate(&self, code: u16, original: &str) -> String {
        if let Some(friendly) = self.table.get(&code) {
            return (*friendly).to_string();
        }
        self.simplify(original)
    }

    fn simplify(&self, message: &str) -> String {
        let mut result = self.strip_markers.replace_all(message, "").into_owned();
        for (pattern, replacement) in &self.rewrites {
            result = pattern.replace(&result, *replacement).into_owned();
        }
        result.trim().to_string()
    }
}

impl Default for Translator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_code_ignores_message() {
        let t = Translator::new();
        let a = t.translate(201, "whatever the compiler said");
        let b = t.translate(201, "something else entirely");
        assert_eq!(a, b);
        assert!(a.starts_with("Type mismatch!"));
    }

    #[test]
    fn test_unknown_code_strips_markers() {
        let t = Translator::new();
        let out = t.translate(999, "something odd happened [E999]");
        assert_eq!(out, "something odd happened");
    }

    #[test]
    fn test_unknown_code_rewrites_expected_got() {
        let t = Translator::new();
        let out = t.translate(999, "expected ')', got 'newline'");
        assert_eq!(out, "You wrote 'newline' here, but ')' was expected");
    }

    #[test]
    fn test_unknown_code_rewrites_type_mismatch() {
        let t = Translator::new();
        let out = t.translate(999, "type mismatch: expected number, found string");
        assert_eq!(
            out,
            "You're using type 'string' but type 'number' is expected"
        );
    }

    #[test]
    fn test_unknown_code_passthrough_when_nothing_matches() {
        let t = Translator::new();
        let out = t.translate(999, "  some entirely novel message  ");
        assert_eq!(out, "some entirely novel message");
    }

    #[test]
    fn test_never_fails_on_weird_input() {
        let t = Translator::new();
        assert_eq!(t.translate(0, ""), "");
        let _ = t.translate(u16::MAX, "unmatched ( bracket [ soup");
    }
}
