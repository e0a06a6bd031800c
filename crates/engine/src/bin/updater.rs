use std::sync::Arc;

use async_trait::async_trait;
use clap::{Parser, Subcommand};
use engine::jobs::DailyUpdate;
use engine::sources::{
    Notifier, ParticipantSource, PgStore, RiotClient, SourceResult,
};
use engine::{LeaderboardService, SnapshotService};
use storage::Database;
use storage::models::{Competition, SnapshotKind};
use storage::repository::CompetitionRepository;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "competition-updater")]
#[command(about = "Competition leaderboard maintenance", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    #[arg(long, env = "RIOT_API_KEY")]
    riot_api_key: String,

    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one daily update cycle over all current competitions
    Run,
    /// Manually capture a snapshot kind for a competition's roster,
    /// e.g. to remediate a reported snapshot gap
    Snapshot {
        #[arg(long)]
        competition: Uuid,

        #[arg(long)]
        kind: String,
    },
    /// Backfill missing start baselines for a rank-climb competition
    Backfill {
        #[arg(long)]
        competition: Uuid,
    },
    /// Compute and print the current standings of a competition
    Leaderboard {
        #[arg(long)]
        competition: Uuid,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("updater={log_level},engine={log_level}").into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let db = Database::connect(&cli.database_url).await?;
    db.run_migrations().await?;

    let store = Arc::new(PgStore::new(db.pool().clone()));
    let riot = Arc::new(RiotClient::new(cli.riot_api_key.clone()));
    let snapshots = SnapshotService::new(store.clone(), riot.clone());
    let leaderboards = LeaderboardService::new(
        store.clone(),
        store.clone(),
        riot.clone(),
        store.clone(),
        store.clone(),
    );

    match cli.command {
        Commands::Run => {
            let job = DailyUpdate::new(
                store.clone(),
                store.clone(),
                snapshots,
                leaderboards,
                store.clone(),
                Arc::new(LogNotifier),
            );
            job.run().await?;
            tracing::info!("daily update cycle completed");
        }
        Commands::Snapshot { competition, kind } => {
            let kind = SnapshotKind::parse(&kind)
                .ok_or_else(|| format!("unknown snapshot kind '{kind}' (START or END)"))?;
            let record = CompetitionRepository::new(db.pool())
                .find_by_id(competition)
                .await?;
            let roster = store.joined_roster(competition).await?;
            let outcomes = snapshots.capture_for_roster(&record, &roster, kind).await?;
            for (participant_id, outcome) in outcomes {
                tracing::info!(%participant_id, ?outcome, "capture attempted");
            }
        }
        Commands::Backfill { competition } => {
            let record = CompetitionRepository::new(db.pool())
                .find_by_id(competition)
                .await?;
            let roster = store.joined_roster(competition).await?;
            let created = snapshots
                .backfill_start_snapshots(&record, &roster)
                .await?;
            tracing::info!(created, "backfill completed");
        }
        Commands::Leaderboard { competition } => {
            let record = CompetitionRepository::new(db.pool())
                .find_by_id(competition)
                .await?;
            let standings = leaderboards.calculate_leaderboard(&record).await?;
            if standings.is_empty() {
                println!("No entries.");
            }
            for standing in standings {
                match standing.entry.stats {
                    Some(stats) => println!(
                        "#{:<3} {:<24} {:>8}  ({}W / {}G)",
                        standing.rank,
                        standing.entry.display_name,
                        format_score(&standing.entry.score),
                        stats.wins,
                        stats.games,
                    ),
                    None => println!(
                        "#{:<3} {:<24} {:>8}",
                        standing.rank,
                        standing.entry.display_name,
                        format_score(&standing.entry.score),
                    ),
                }
            }
        }
    }

    Ok(())
}

fn format_score(score: &engine::Score) -> String {
    match score {
        engine::Score::Numeric(value) => value.to_string(),
        engine::Score::Rank(rank) => rank.to_string(),
    }
}

/// Notifier for operator runs: the chat transport lives elsewhere, so the
/// binary just logs what would be posted.
struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn leaderboard_finalized(
        &self,
        competition: &Competition,
        entries: &[engine::RankedLeaderboardEntry],
    ) -> SourceResult<()> {
        tracing::info!(
            competition_id = %competition.competition_id,
            entries = entries.len(),
            "final leaderboard ready"
        );
        Ok(())
    }

    async fn snapshot_gap(
        &self,
        competition: &Competition,
        participant_id: Uuid,
        kind: SnapshotKind,
    ) -> SourceResult<()> {
        tracing::warn!(
            competition_id = %competition.competition_id,
            %participant_id,
            %kind,
            "snapshot gap: run `snapshot --competition {} --kind {}` to remediate",
            competition.competition_id,
            kind
        );
        Ok(())
    }
}
