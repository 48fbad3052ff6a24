//! Level 3 (Collections): lists, lambdas, records.

use super::{test_spec, LevelDef};
use crate::challenge::{ChallengeSpec, Difficulty};

pub(super) fn level() -> LevelDef {
    LevelDef {
        number: 3,
        title: "Collections".to_string(),
        description: "Lists hold ordered values, records hold named ones, and the \
                      list stdlib plus lambdas do the heavy lifting."
            .to_string(),
        challenges: vec![list_basics(), map_and_filter(), records()],
    }
}

fn list_basics() -> ChallengeSpec {
    ChallengeSpec {
        id: "L3-C1".into(),
        level: 3,
        number: 1,
        title: "List Basics".into(),
        description: "A list literal is `[1, 2, 3]` and its type is `list<number>`. \
                      The list module knows the common operations; \
                      `list.length`, `list.sum`, `list.append` and friends."
            .into(),
        mission: "Declare `primes` holding the first four primes, and write `total` \
                  summing any list of numbers."
            .into(),
        difficulty: Difficulty::Easy,
        xp: 10,
        scaffold: "// === Challenge L3-C1: List Basics ===\n\n\
                   // TODO: Declare `primes`: a list<number> holding 2, 3, 5, 7\n\n\
                   // TODO: Write `total(xs: list<number>) -> number` returning the sum of xs.\n\
                   //       Hint: the list module has a function for this.\n"
            .into(),
        solution: "// === Challenge L3-C1: List Basics ===\n\n\
                   let primes: list<number> = [2, 3, 5, 7]\n\n\
                   fn total(xs: list<number>) -> number {\n\
                   \x20 return list.sum(xs)\n}\n"
            .into(),
        hints: vec![
            "List literals use square brackets: [2, 3, 5, 7].".into(),
            "`list.sum(xs)` adds up a list of numbers in one call.".into(),
        ],
        tests: vec![
            test_spec(
                "primes has four elements",
                "list.length(primes) == 4",
                "The first four primes are 2, 3, 5 and 7.",
            ),
            test_spec(
                "total(primes) returns 17",
                "total(primes) == 17",
                "2 + 3 + 5 + 7 = 17; check what `total` returns.",
            ),
            test_spec(
                "total of an empty list is 0",
                "total([]) == 0",
                "Summing nothing should give 0, not an error.",
            ),
        ],
    }
}

fn map_and_filter() -> ChallengeSpec {
    ChallengeSpec {
        id: "L3-C2".into(),
        level: 3,
        number: 2,
        title: "Map and Filter".into(),
        description: "`list.filter(xs, f)` keeps the elements where `f` comes back \
                      true; `list.map(xs, f)` transforms each element. The `f` is a \
                      lambda: `fn(n: number) { n > 0 }`; its body's last expression \
                      is its result."
            .into(),
        mission: "Write `evens`, keeping only the even numbers of a list, and \
                  `doubled`, multiplying every element by two."
            .into(),
        difficulty: Difficulty::Medium,
        xp: 15,
        scaffold: "// === Challenge L3-C2: Map and Filter ===\n\n\
                   // TODO: Write `evens(xs: list<number>) -> list<number>` using list.filter\n\
                   //       and a lambda.\n\n\
                   // TODO: Write `doubled(xs: list<number>) -> list<number>` using list.map.\n"
            .into(),
        solution: "// === Challenge L3-C2: Map and Filter ===\n\n\
                   fn evens(xs: list<number>) -> list<number> {\n\
                   \x20 return list.filter(xs, fn(n: number) { n % 2 == 0 })\n}\n\n\
                   fn doubled(xs: list<number>) -> list<number> {\n\
                   \x20 return list.map(xs, fn(n: number) { n * 2 })\n}\n"
            .into(),
        hints: vec![
            "A lambda looks like `fn(n: number) { n % 2 == 0 }`.".into(),
            "`list.filter` keeps elements; `list.map` replaces them.".into(),
        ],
        tests: vec![
            test_spec(
                "evens keeps only even numbers",
                "evens([1, 2, 3, 4]) == [2, 4]",
                "Filter with `n % 2 == 0` to keep the evens.",
            ),
            test_spec(
                "evens of an odd-only list is empty",
                "evens([1, 3, 5]) == []",
                "When nothing matches, the result is the empty list.",
            ),
            test_spec(
                "doubled multiplies every element by 2",
                "doubled([1, 2, 3]) == [2, 4, 6]",
                "Map each element to `n * 2`.",
            ),
        ],
    }
}

fn records() -> ChallengeSpec {
    ChallengeSpec {
        id: "L3-C3".into(),
        level: 3,
        number: 3,
        title: "Records".into(),
        description: "A record groups named fields: `{ name: \"Root\", level: 99 }` \
                      with type `{ name: string, level: number }`. Fields read with \
                      a dot: `user.name`. Records with the right fields fit \
                      anywhere the shape is expected."
            .into(),
        mission: "Declare an `admin` record (name \"Root\", level 99) and write \
                  `describe`, formatting any user record as \"NAME is level N\"."
            .into(),
        difficulty: Difficulty::Boss,
        xp: 25,
        scaffold: "// === Challenge L3-C3: Records ===\n\n\
                   // TODO: Declare `admin`: a { name: string, level: number } record\n\
                   //       with name \"Root\" and level 99.\n\n\
                   // TODO: Write `describe(user: { name: string, level: number }) -> string`\n\
                   //       returning \"NAME is level N\", e.g. \"Root is level 99\".\n"
            .into(),
        solution: "// === Challenge L3-C3: Records ===\n\n\
                   let admin: { name: string, level: number } = { name: \"Root\", level: 99 }\n\n\
                   fn describe(user: { name: string, level: number }) -> string {\n\
                   \x20 return \"${user.name} is level ${user.level}\"\n}\n"
            .into(),
        hints: vec![
            "Record literals mirror their type: { name: \"Root\", level: 99 }.".into(),
            "Interpolate both fields: \"${user.name} is level ${user.level}\".".into(),
        ],
        tests: vec![
            test_spec(
                "admin is named \"Root\"",
                "admin.name == \"Root\"",
                "Set the `name` field to \"Root\".",
            ),
            test_spec(
                "describe(admin) formats the admin",
                "describe(admin) == \"Root is level 99\"",
                "The format is \"NAME is level N\"; mind the spaces.",
            ),
            test_spec(
                "describe works for any user record",
                "describe({ name: \"Ada\", level: 3 }) == \"Ada is level 3\"",
                "Read the fields from the parameter, not from `admin`.",
            ),
        ],
    }
}
