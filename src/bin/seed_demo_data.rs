// ABOUTME: Demo data seeder for the Motiv engine
// ABOUTME: Generates a demo user with weeks of sessions driven through the real scoring pipeline
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Motiv Fitness

//! Demo data seeder for the Motiv engine.
//!
//! Populates a database with a demo user, the predefined reward catalog, a
//! program, a goal, and several weeks of workout sessions. Sessions go
//! through the real tracking pipeline, so points, goal progress, and reward
//! unlocks land exactly as they would in production.
//!
//! Usage:
//! ```bash
//! # Seed with default settings
//! cargo run --bin seed-demo-data
//!
//! # Seed a specific database with six weeks of history
//! cargo run --bin seed-demo-data -- --database-url sqlite:./demo.db --weeks 6
//! ```

use anyhow::Result;
use chrono::{Duration, NaiveTime, Utc};
use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use tracing::info;

use motiv_engine::config::EngineConfig;
use motiv_engine::database::Database;
use motiv_engine::logging;
use motiv_engine::models::{User, WorkoutType};
use motiv_engine::services::{
    CreateGoalDto, CreateProgramDto, CreateWorkoutSessionDto, GoalService, ProgramService,
    RewardService, TrackingService,
};
use motiv_engine::week::TrainingWeek;

#[derive(Parser)]
#[command(
    name = "seed-demo-data",
    about = "Motiv engine demo data seeder",
    long_about = "Populate the database with a demo user and weeks of scored workout history"
)]
struct SeedArgs {
    /// Database URL override (defaults to the DATABASE_URL environment
    /// configuration)
    #[arg(long)]
    database_url: Option<String>,

    /// Number of past weeks to fill with sessions
    #[arg(long, default_value_t = 4)]
    weeks: u32,

    /// Seed for the session generator, for reproducible histories
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

const DEMO_EMAIL: &str = "demo@motiv.fitness";

const SESSION_TYPES: [WorkoutType; 5] = [
    WorkoutType::Running,
    WorkoutType::Gym,
    WorkoutType::Swimming,
    WorkoutType::Yoga,
    WorkoutType::Crossfit,
];

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_from_env()?;

    let args = SeedArgs::parse();
    let config = EngineConfig::from_env()?;
    let database_url = args
        .database_url
        .unwrap_or_else(|| config.database_url.to_connection_string());
    let db = Arc::new(Database::new(&database_url).await?);

    let rewards = RewardService::new(Arc::clone(&db));
    let goals = GoalService::new(Arc::clone(&db));
    let programs = ProgramService::new(Arc::clone(&db));
    let tracker = TrackingService::new(Arc::clone(&db));

    // Reuse the demo user across runs so re-seeding does not duplicate it
    let user = match db.get_user_by_email(DEMO_EMAIL).await? {
        Some(existing) => existing,
        None => {
            let user = User::new("Demo Athlete", DEMO_EMAIL);
            db.create_user(&user).await?;
            user
        }
    };
    info!(user_id = %user.id, "demo user ready");

    let catalog = rewards.seed_default_rewards().await?;
    info!(rewards = catalog.len(), "reward catalog seeded");

    let program = programs
        .create_program(CreateProgramDto {
            user_id: user.id,
            name: format!("Base building #{}", args.seed),
            workout_type: WorkoutType::Running,
            description: Some("Three easy runs per week".into()),
            exercises: Vec::new(),
        })
        .await?;

    let goal = goals
        .create_goal(CreateGoalDto {
            user_id: user.id,
            name: "First month of consistency".into(),
            points_required: 4,
            description: None,
            reward_id: catalog.first().map(|reward| reward.id),
        })
        .await?;
    info!(goal_id = %goal.id, "demo goal created");

    let mut rng = StdRng::seed_from_u64(args.seed);
    let mut total_awarded = 0;

    let current_week = TrainingWeek::containing(Utc::now().date_naive());
    for weeks_back in (1..=i64::from(args.weeks)).rev() {
        let week = TrainingWeek::containing(current_week.start() - Duration::weeks(weeks_back));
        let session_count = rng.gen_range(2..=5);

        for i in 0..session_count {
            let day = week.start() + Duration::days(i64::from(rng.gen_range(0..7u8)));
            let time =
                NaiveTime::from_hms_opt(7 + (i % 12), 30, 0).unwrap_or(NaiveTime::MIN);

            let outcome = tracker
                .record_session(CreateWorkoutSessionDto {
                    user_id: user.id,
                    workout_type: SESSION_TYPES[rng.gen_range(0..SESSION_TYPES.len())],
                    date: day.and_time(time).and_utc(),
                    duration_minutes: i64::from(rng.gen_range(30..=90u8)),
                    program_id: Some(program.id),
                    notes: None,
                })
                .await?;

            total_awarded += outcome.points_awarded;
            for unlocked in &outcome.rewards_unlocked {
                info!(reward_id = %unlocked.reward_id, "reward unlocked during seeding");
            }
        }

        info!(%week, session_count, "seeded week");
    }

    let user = db.get_user_required(user.id).await?;
    let unlocked = rewards.get_unlocked_rewards(user.id).await?;
    let goal = goals.get_goal(goal.id).await?;

    info!(
        user_id = %user.id,
        balance = user.points,
        total_awarded,
        unlocked_rewards = unlocked.len(),
        goal_progress = %format!("{}/{}", goal.points_accumulated, goal.points_required),
        goal_completed = goal.completed,
        "seeding complete"
    );

    Ok(())
}
