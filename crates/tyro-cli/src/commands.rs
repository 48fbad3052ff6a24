//! Subcommand implementations.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context as _, Result};
use tracing::debug;
use tyro_engine::{
    next_rank, rank_for, ChallengeSpec, Curriculum, EngineConfig, Progress, Validator,
    WorkspaceStore,
};

use crate::feedback;

/// Shared command context: config, curriculum, stores.
pub struct Context {
    curriculum: Curriculum,
    workspace: WorkspaceStore,
    validator: Validator,
    progress_path: PathBuf,
}

impl Context {
    pub fn new(
        config_path: Option<&Path>,
        workspace_override: Option<PathBuf>,
        progress_override: Option<PathBuf>,
    ) -> Result<Self> {
        let config = EngineConfig::load_or_default(config_path)
            .context("failed to load configuration")?;
        let workspace_dir = workspace_override.unwrap_or(config.workspace_dir);
        let progress_path = progress_override.unwrap_or(config.progress_file);
        debug!(
            workspace = %workspace_dir.display(),
            progress = %progress_path.display(),
            "command context ready"
        );

        Ok(Self {
            curriculum: Curriculum::builtin(),
            workspace: WorkspaceStore::new(workspace_dir),
            validator: Validator::new(config.gas_limit),
            progress_path,
        })
    }

    fn challenge(&self, id: &str) -> Result<&ChallengeSpec> {
        match self.curriculum.challenge_by_id(id) {
            Some(challenge) => Ok(challenge),
            None => bail!("unknown challenge id '{id}'; try `tyro list`"),
        }
    }

    fn load_progress(&self) -> Progress {
        Progress::load(&self.progress_path)
    }
}

/// `tyro list`
pub fn list(ctx: &Context) -> Result<()> {
    let progress = ctx.load_progress();
    for level in ctx.curriculum.levels() {
        println!("\nLevel {}: {}", level.number, level.title);
        println!("  {}", level.description);
        for challenge in &level.challenges {
            let icon = if progress.is_completed(&challenge.id) {
                "✓"
            } else {
                "○"
            };
            println!(
                "  {icon} {}  {} ({:?}, {} XP)",
                challenge.id, challenge.title, challenge.difficulty, challenge.xp
            );
        }
    }
    println!();
    Ok(())
}

/// `tyro show <id>`
pub fn show(ctx: &Context, id: &str) -> Result<()> {
    let challenge = ctx.challenge(id)?;
    println!("\n=== {}: {} ===", challenge.id, challenge.title);
    println!("Difficulty: {:?} · {} XP\n", challenge.difficulty, challenge.xp);
    println!("{}\n", challenge.description);
    println!("MISSION: {}\n", challenge.mission);
    println!(
        "File: {} · {} hints available · {} tests",
        ctx.workspace.path_for(challenge).display(),
        challenge.hints.len(),
        challenge.tests.len()
    );
    Ok(())
}

/// `tyro start <id>`
pub fn start(ctx: &Context, id: &str) -> Result<()> {
    let challenge = ctx.challenge(id)?;
    let path = ctx.workspace.ensure(challenge)?;

    let mut progress = ctx.load_progress();
    progress.current_level = challenge.level;
    progress.current_challenge = challenge.number;
    progress.save(&ctx.progress_path)?;

    println!("\nWorkspace file ready: {}", path.display());
    println!("Edit it in your editor, then run: tyro check {id}\n");
    Ok(())
}

/// `tyro check <id> [--json]`
pub fn check(ctx: &Context, id: &str, json: bool) -> Result<()> {
    let challenge = ctx.challenge(id)?;
    let mut progress = ctx.load_progress();

    if progress.is_completed(&challenge.id) && !json {
        println!("\n✓ {} is already completed!\n", challenge.id);
        return Ok(());
    }

    progress.record_attempt(&challenge.id);
    progress.save(&ctx.progress_path)?;

    let result = ctx.validator.validate_solution(challenge, &ctx.workspace)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    let attempt = progress.attempt_count(&challenge.id);

    if !result.compilation_errors.is_empty() {
        progress.reset_streak();
        progress.save(&ctx.progress_path)?;
        println!("{}", feedback::format_compilation_feedback(&result.compilation_errors));
        println!("  {}\n", feedback::encouraging_message(attempt));
        return Ok(());
    }

    println!("{}", feedback::format_test_feedback(&result.test_results));

    if result.success {
        let reward = progress.complete_challenge(&challenge.id, challenge.xp);
        progress.save(&ctx.progress_path)?;

        println!("\n  {}", feedback::victory_message(attempt));
        if reward.flawless {
            println!("  {}", feedback::flawless_message());
        }
        if let Some(streak_line) = feedback::streak_message(reward.streak) {
            println!("  {streak_line}");
        }
        println!("  +{} XP; rank: {}", reward.xp_awarded, progress.rank);

        if let Some((level, number)) =
            ctx.curriculum.next_after(challenge.level, challenge.number)
        {
            let next = ctx.curriculum.challenge(level, number).expect("registry");
            println!("\n  Next up: tyro start {}\n", next.id);
        } else {
            println!("\n  That was the last challenge; you finished the course!\n");
        }
    } else {
        progress.reset_streak();
        progress.save(&ctx.progress_path)?;
        println!("\n  {}\n", feedback::encouraging_message(attempt));
    }

    Ok(())
}

/// `tyro hint <id> [--number N]`
pub fn hint(ctx: &Context, id: &str, number: usize) -> Result<()> {
    let challenge = ctx.challenge(id)?;
    if number == 0 || number > challenge.hints.len() {
        bail!(
            "{} has {} hints; ask for 1..={}",
            challenge.id,
            challenge.hints.len(),
            challenge.hints.len()
        );
    }
    println!(
        "\nHint {}/{}: {}\n",
        number,
        challenge.hints.len(),
        challenge.hints[number - 1]
    );
    Ok(())
}

/// `tyro reset <id>`
pub fn reset(ctx: &Context, id: &str) -> Result<()> {
    let challenge = ctx.challenge(id)?;
    let path = ctx.workspace.reset(challenge)?;
    println!("\nFile reset to the original scaffold: {}\n", path.display());
    Ok(())
}

/// `tyro solution <id>`; gated on three recorded attempts.
pub fn solution(ctx: &Context, id: &str) -> Result<()> {
    let challenge = ctx.challenge(id)?;
    let progress = ctx.load_progress();
    let attempts = progress.attempt_count(&challenge.id);

    if attempts < 3 {
        bail!(
            "the solution unlocks after 3 attempts; you've made {attempts}. Keep trying!"
        );
    }

    println!("\n=== Reference solution for {} ===\n", challenge.id);
    println!("{}", challenge.solution);
    Ok(())
}

/// `tyro stats`
pub fn stats(ctx: &Context) -> Result<()> {
    let progress = ctx.load_progress();
    let total = ctx.curriculum.total_challenges();
    let completed = progress.completed_challenges.len();
    let percentage = if total > 0 {
        completed * 100 / total
    } else {
        0
    };

    println!("\n=== Your Stats ===");
    println!("XP:         {}", progress.xp);
    println!("Rank:       {}", rank_for(progress.xp).name);
    if let Some(next) = next_rank(progress.xp) {
        println!("Next rank:  {} at {} XP", next.name, next.min_xp);
    }
    println!("Streak:     {} (best {})", progress.streak, progress.best_streak);
    println!("Progress:   {completed}/{total} challenges ({percentage}%)");
    println!("Flawless:   {}", progress.flawless.len());
    println!("Started:    {}", progress.started_at.format("%Y-%m-%d"));
    println!();
    Ok(())
}
