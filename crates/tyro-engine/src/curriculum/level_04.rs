//! Level 4 (Sum Types): variants and pattern matching.

use super::{test_spec, LevelDef};
use crate::challenge::{ChallengeSpec, Difficulty};

pub(super) fn level() -> LevelDef {
    LevelDef {
        number: 4,
        title: "Sum Types".to_string(),
        description: "A sum type says a value is exactly one of a fixed set of \
                      shapes, and `match` forces you to handle every one."
            .to_string(),
        challenges: vec![shapes(), traffic_lights()],
    }
}

fn shapes() -> ChallengeSpec {
    ChallengeSpec {
        id: "L4-C1".into(),
        level: 4,
        number: 1,
        title: "Shape Up".into(),
        description: "`type Shape = | Square(side: number) | Rect(width: number, \
                      height: number)` declares two variants. A `match` takes a \
                      Shape apart, binding the variant's fields: \
                      `Square(side) -> side * side`. Leave a variant out and the \
                      compiler complains; that's the point."
            .into(),
        mission: "Given the Shape type in the scaffold, write `area` computing the \
                  area of either variant with a match."
            .into(),
        difficulty: Difficulty::Medium,
        xp: 15,
        scaffold: "// === Challenge L4-C1: Shape Up ===\n\n\
                   type Shape =\n\
                   \x20 | Square(side: number)\n\
                   \x20 | Rect(width: number, height: number)\n\n\
                   // TODO: Write `area(s: Shape) -> number` using match.\n\
                   //       A square's area is side * side; a rectangle's is width * height.\n"
            .into(),
        solution: "// === Challenge L4-C1: Shape Up ===\n\n\
                   type Shape =\n\
                   \x20 | Square(side: number)\n\
                   \x20 | Rect(width: number, height: number)\n\n\
                   fn area(s: Shape) -> number {\n\
                   \x20 return match s {\n\
                   \x20   Square(side) -> side * side\n\
                   \x20   Rect(width, height) -> width * height\n\
                   \x20 }\n}\n"
            .into(),
        hints: vec![
            "A match arm binds the payload: `Square(side) -> side * side`.".into(),
            "`match` is an expression; you can `return match s { ... }` directly.".into(),
        ],
        tests: vec![
            test_spec(
                "area of Square(3) is 9",
                "area(Square(3)) == 9",
                "A square's area is side * side.",
            ),
            test_spec(
                "area of Rect(2, 5) is 10",
                "area(Rect(2, 5)) == 10",
                "A rectangle's area is width * height.",
            ),
            test_spec(
                "area of Square(0) is 0",
                "area(Square(0)) == 0",
                "Degenerate shapes still have an area; zero.",
            ),
        ],
    }
}

fn traffic_lights() -> ChallengeSpec {
    ChallengeSpec {
        id: "L4-C2".into(),
        level: 4,
        number: 2,
        title: "Traffic Lights".into(),
        description: "Unit variants carry no payload; they are plain states: \
                      `type Light = | Red | Yellow | Green`. Matching on them \
                      models state machines; the wildcard `_` catches \"everything \
                      else\" when the remaining cases agree."
            .into(),
        mission: "Using the Light type from the scaffold, write `next_light` \
                  cycling Red → Green → Yellow → Red, and `can_go`, true only \
                  for Green."
            .into(),
        difficulty: Difficulty::Boss,
        xp: 25,
        scaffold: "// === Challenge L4-C2: Traffic Lights ===\n\n\
                   type Light =\n\
                   \x20 | Red\n\
                   \x20 | Yellow\n\
                   \x20 | Green\n\n\
                   // TODO: Write `next_light(light: Light) -> Light`:\n\
                   //       Red -> Green, Green -> Yellow, Yellow -> Red.\n\n\
                   // TODO: Write `can_go(light: Light) -> bool`: true only for Green.\n"
            .into(),
        solution: "// === Challenge L4-C2: Traffic Lights ===\n\n\
                   type Light =\n\
                   \x20 | Red\n\
                   \x20 | Yellow\n\
                   \x20 | Green\n\n\
                   fn next_light(light: Light) -> Light {\n\
                   \x20 return match light {\n\
                   \x20   Red -> Green\n\
                   \x20   Green -> Yellow\n\
                   \x20   Yellow -> Red\n\
                   \x20 }\n}\n\n\
                   fn can_go(light: Light) -> bool {\n\
                   \x20 return match light {\n\
                   \x20   Green -> true\n\
                   \x20   _ -> false\n\
                   \x20 }\n}\n"
            .into(),
        hints: vec![
            "Each arm of `next_light` names a variant and returns the next one.".into(),
            "`can_go` only needs two arms: Green, and the wildcard `_`.".into(),
        ],
        tests: vec![
            test_spec(
                "Red advances to Green",
                "next_light(Red) == Green",
                "After red comes green.",
            ),
            test_spec(
                "Green advances to Yellow",
                "next_light(Green) == Yellow",
                "After green comes yellow.",
            ),
            test_spec(
                "Yellow advances back to Red",
                "next_light(Yellow) == Red",
                "The cycle closes: yellow goes back to red.",
            ),
            test_spec(
                "can_go(Green) is true",
                "can_go(Green) == true",
                "Green means go.",
            ),
            test_spec(
                "can_go(Red) is false",
                "can_go(Red) == false",
                "Red definitely does not mean go.",
            ),
        ],
    }
}
