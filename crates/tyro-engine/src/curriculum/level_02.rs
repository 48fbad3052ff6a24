//! Level 2 (Functions): signatures, branching, recursion.

use super::{test_spec, LevelDef};
use crate::challenge::{ChallengeSpec, Difficulty};

pub(super) fn level() -> LevelDef {
    LevelDef {
        number: 2,
        title: "Functions".to_string(),
        description: "Typed parameters and return types turn functions into \
                      contracts the compiler enforces for you."
            .to_string(),
        challenges: vec![signatures(), branching(), factorial()],
    }
}

fn signatures() -> ChallengeSpec {
    ChallengeSpec {
        id: "L2-C1".into(),
        level: 2,
        number: 1,
        title: "Function Signatures".into(),
        description: "A function declares a type for each parameter and one for its \
                      result: `fn double(n: number) -> number { return n * 2 }`. \
                      Pass the wrong type and the compiler stops you before the code \
                      ever runs."
            .into(),
        mission: "Write three functions: `add` sums two numbers, `is_even` tells \
                  whether a number is even, and `shout` upper-cases a string."
            .into(),
        difficulty: Difficulty::Easy,
        xp: 10,
        scaffold: "// === Challenge L2-C1: Function Signatures ===\n\n\
                   // TODO: Write `add`: takes two numbers, returns their sum.\n\n\
                   // TODO: Write `is_even`: takes a number, returns true when it is even.\n\n\
                   // TODO: Write `shout`: takes a string, returns it in UPPERCASE.\n"
            .into(),
        solution: "// === Challenge L2-C1: Function Signatures ===\n\n\
                   fn add(a: number, b: number) -> number {\n  return a + b\n}\n\n\
                   fn is_even(n: number) -> bool {\n  return n % 2 == 0\n}\n\n\
                   fn shout(text: string) -> string {\n  return string.upper(text)\n}\n"
            .into(),
        hints: vec![
            "The shape is `fn name(param: type) -> return_type { ... }`.".into(),
            "The modulo operator `%` gives the remainder; `n % 2 == 0` means even.".into(),
            "`string.upper(text)` returns the upper-cased copy `shout` needs.".into(),
        ],
        tests: vec![
            test_spec(
                "add(2, 3) returns 5",
                "add(2, 3) == 5",
                "Make sure `add` returns the sum of its two parameters.",
            ),
            test_spec(
                "add(-1, 1) returns 0",
                "add(-1, 1) == 0",
                "`add` should handle negative numbers correctly.",
            ),
            test_spec(
                "is_even(4) returns true",
                "is_even(4) == true",
                "4 is even; `is_even` should return true.",
            ),
            test_spec(
                "is_even(7) returns false",
                "is_even(7) == false",
                "7 is odd; `is_even` should return false.",
            ),
            test_spec(
                "shout(\"hello\") returns \"HELLO\"",
                "shout(\"hello\") == \"HELLO\"",
                "`shout` should return the input converted to uppercase.",
            ),
        ],
    }
}

fn branching() -> ChallengeSpec {
    ChallengeSpec {
        id: "L2-C2".into(),
        level: 2,
        number: 2,
        title: "Branching Out".into(),
        description: "An `if` chooses a path; `return` inside a branch leaves the \
                      function immediately. The stdlib's `math.min` and `math.max` \
                      combine nicely to pin a value inside a range."
            .into(),
        mission: "Write `grade`, returning \"pass\" for scores of 50 or more and \
                  \"fail\" otherwise, and `clamp`, pinning a number between a low \
                  and a high bound."
            .into(),
        difficulty: Difficulty::Medium,
        xp: 15,
        scaffold: "// === Challenge L2-C2: Branching Out ===\n\n\
                   // TODO: Write `grade(score: number) -> string`:\n\
                   //       \"pass\" when score >= 50, otherwise \"fail\".\n\n\
                   // TODO: Write `clamp(n: number, low: number, high: number) -> number`:\n\
                   //       the value of n pinned into [low, high].\n"
            .into(),
        solution: "// === Challenge L2-C2: Branching Out ===\n\n\
                   fn grade(score: number) -> string {\n\
                   \x20 if score >= 50 {\n    return \"pass\"\n  }\n\
                   \x20 return \"fail\"\n}\n\n\
                   fn clamp(n: number, low: number, high: number) -> number {\n\
                   \x20 return math.max(low, math.min(n, high))\n}\n"
            .into(),
        hints: vec![
            "`if score >= 50 { return \"pass\" }` then return \"fail\" after the if.".into(),
            "`math.min(n, high)` caps the top; wrap it in `math.max(low, ...)` for the bottom.".into(),
        ],
        tests: vec![
            test_spec(
                "grade(75) returns \"pass\"",
                "grade(75) == \"pass\"",
                "75 is at least 50, so the result should be \"pass\".",
            ),
            test_spec(
                "grade(30) returns \"fail\"",
                "grade(30) == \"fail\"",
                "Scores under 50 should come back \"fail\".",
            ),
            test_spec(
                "clamp caps values above the range",
                "clamp(15, 0, 10) == 10",
                "Anything above `high` should come back as `high`.",
            ),
            test_spec(
                "clamp raises values below the range",
                "clamp(-3, 0, 10) == 0",
                "Anything below `low` should come back as `low`.",
            ),
            test_spec(
                "clamp leaves in-range values alone",
                "clamp(5, 0, 10) == 5",
                "A value already inside the range should pass through unchanged.",
            ),
        ],
    }
}

fn factorial() -> ChallengeSpec {
    ChallengeSpec {
        id: "L2-C3".into(),
        level: 2,
        number: 3,
        title: "Count Down, Multiply Up".into(),
        description: "A function may call itself. Recursion needs a base case that \
                      stops the descent and a recursive case that shrinks the \
                      problem; factorial is the classic: 5! = 5 * 4 * 3 * 2 * 1."
            .into(),
        mission: "Write a recursive `factorial` function. factorial(0) and \
                  factorial(1) are 1; everything above multiplies down."
            .into(),
        difficulty: Difficulty::Boss,
        xp: 25,
        scaffold: "// === Challenge L2-C3: Count Down, Multiply Up ===\n\n\
                   // TODO: Write `factorial(n: number) -> number` recursively.\n\
                   //       Base case: n <= 1 gives 1. Otherwise n * factorial(n - 1).\n"
            .into(),
        solution: "// === Challenge L2-C3: Count Down, Multiply Up ===\n\n\
                   fn factorial(n: number) -> number {\n\
                   \x20 if n <= 1 {\n    return 1\n  }\n\
                   \x20 return n * factorial(n - 1)\n}\n"
            .into(),
        hints: vec![
            "Start with the base case: `if n <= 1 { return 1 }`.".into(),
            "The recursive step is `n * factorial(n - 1)`.".into(),
        ],
        tests: vec![
            test_spec(
                "factorial(0) returns 1",
                "factorial(0) == 1",
                "The base case: factorial of 0 is defined as 1.",
            ),
            test_spec(
                "factorial(5) returns 120",
                "factorial(5) == 120",
                "5 * 4 * 3 * 2 * 1 = 120; check the recursive step.",
            ),
            test_spec(
                "factorial(8) returns 40320",
                "factorial(8) == 40320",
                "Larger inputs should work too; make sure the recursion shrinks n.",
            ),
        ],
    }
}
