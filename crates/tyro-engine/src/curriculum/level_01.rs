//! Level 1 (Basics): bindings, types, string interpolation.

use super::{test_spec, LevelDef};
use crate::challenge::{ChallengeSpec, Difficulty};

pub(super) fn level() -> LevelDef {
    LevelDef {
        number: 1,
        title: "Basics".to_string(),
        description: "Declare typed bindings, do arithmetic, and build strings. \
                      Everything else in Tyro grows from these three moves."
            .to_string(),
        challenges: vec![first_bindings(), number_crunching(), greeting_builder()],
    }
}

fn first_bindings() -> ChallengeSpec {
    ChallengeSpec {
        id: "L1-C1".into(),
        level: 1,
        number: 1,
        title: "Your First Bindings".into(),
        description: "A binding gives a value a name: `let answer: number = 42`. \
                      The annotation after the colon tells the compiler what type to \
                      enforce; assign a string to a number binding and the compiler \
                      refuses before anything runs."
            .into(),
        mission: "Declare a `greeting` binding of type string holding \"Hello, Tyro!\" \
                  and an `answer` binding of type number holding 42."
            .into(),
        difficulty: Difficulty::Easy,
        xp: 10,
        scaffold: "// === Challenge L1-C1: Your First Bindings ===\n\n\
                   // TODO: Declare `greeting`: a string binding with the value \"Hello, Tyro!\"\n\n\
                   // TODO: Declare `answer`: a number binding with the value 42\n"
            .into(),
        solution: "// === Challenge L1-C1: Your First Bindings ===\n\n\
                   let greeting: string = \"Hello, Tyro!\"\n\
                   let answer: number = 42\n"
            .into(),
        hints: vec![
            "The shape is `let name: type = value`.".into(),
            "String values use double quotes: \"Hello, Tyro!\".".into(),
        ],
        tests: vec![
            test_spec(
                "greeting holds \"Hello, Tyro!\"",
                "greeting == \"Hello, Tyro!\"",
                "Check the exact text; capitalisation and punctuation count.",
            ),
            test_spec(
                "answer holds 42",
                "answer == 42",
                "Declare `answer` as a number with the value 42.",
            ),
        ],
    }
}

fn number_crunching() -> ChallengeSpec {
    ChallengeSpec {
        id: "L1-C2".into(),
        level: 1,
        number: 2,
        title: "Number Crunching".into(),
        description: "Numbers support `+ - * / %`, and a binding's value can be any \
                      expression. One binding may build on another declared above it."
            .into(),
        mission: "Compute `seconds_per_day` from 60 * 60 * 24, then `half_day` as \
                  half of it."
            .into(),
        difficulty: Difficulty::Easy,
        xp: 10,
        scaffold: "// === Challenge L1-C2: Number Crunching ===\n\n\
                   // TODO: Declare `seconds_per_day` using multiplication (60 * 60 * 24)\n\n\
                   // TODO: Declare `half_day` as seconds_per_day divided by 2\n"
            .into(),
        solution: "// === Challenge L1-C2: Number Crunching ===\n\n\
                   let seconds_per_day: number = 60 * 60 * 24\n\
                   let half_day: number = seconds_per_day / 2\n"
            .into(),
        hints: vec![
            "Write the arithmetic out; don't paste the result in.".into(),
            "`half_day` can refer to `seconds_per_day` by name.".into(),
        ],
        tests: vec![
            test_spec(
                "seconds_per_day is 86400",
                "seconds_per_day == 86400",
                "60 * 60 * 24 should come out to 86400.",
            ),
            test_spec(
                "half_day is 43200",
                "half_day == 43200",
                "Divide seconds_per_day by 2.",
            ),
        ],
    }
}

fn greeting_builder() -> ChallengeSpec {
    ChallengeSpec {
        id: "L1-C3".into(),
        level: 1,
        number: 3,
        title: "Greeting Builder".into(),
        description: "Strings can embed expressions with `${...}`: \
                      `\"Count: ${count}\"`. The embedded value is rendered into the \
                      text, whatever its type."
            .into(),
        mission: "Declare `name` holding \"Ada\" and `welcome` built with \
                  interpolation so it reads \"Welcome, Ada!\"."
            .into(),
        difficulty: Difficulty::Medium,
        xp: 15,
        scaffold: "// === Challenge L1-C3: Greeting Builder ===\n\n\
                   // TODO: Declare `name`: a string binding holding \"Ada\"\n\n\
                   // TODO: Declare `welcome` using ${...} so it reads \"Welcome, Ada!\"\n"
            .into(),
        solution: "// === Challenge L1-C3: Greeting Builder ===\n\n\
                   let name: string = \"Ada\"\n\
                   let welcome: string = \"Welcome, ${name}!\"\n"
            .into(),
        hints: vec![
            "Interpolation looks like \"Welcome, ${name}!\".".into(),
            "Don't forget the exclamation mark at the end.".into(),
        ],
        tests: vec![
            test_spec(
                "welcome reads \"Welcome, Ada!\"",
                "welcome == \"Welcome, Ada!\"",
                "Build the string with ${name} rather than typing Ada twice.",
            ),
            test_spec(
                "name is not empty",
                "string.length(name) > 0",
                "Declare `name` before using it in the greeting.",
            ),
        ],
    }
}
