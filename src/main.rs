//! Shooter Gym entry point
//!
//! Plays episodes with a baseline controller, logs returns, keeps a
//! best-episodes board and optionally streams render snapshots as JSON lines.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};

use shooter_gym::consts::RENDER_FPS;
use shooter_gym::episodes::{BestEpisodes, EpisodeRecord, EpisodeStats, EpisodeTracker};
use shooter_gym::policy::PolicyKind;
use shooter_gym::{Settings, ShooterEnv};

#[derive(Parser, Debug)]
#[command(name = "shooter-gym")]
#[command(about = "Deterministic falling-target shooter environment with baseline controllers")]
struct Cli {
    /// Settings file (JSON); flags override its values
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Play a batch of episodes
    Run {
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        episodes: Option<u32>,
        /// random | aim | idle
        #[arg(long, value_parser = parse_policy)]
        policy: Option<PolicyKind>,
        /// Stream one snapshot per tick to this file
        #[arg(long)]
        snapshots: Option<PathBuf>,
        /// Pace ticks at the render frame rate
        #[arg(long)]
        realtime: bool,
        /// Best-episodes board file
        #[arg(long)]
        board: Option<PathBuf>,
        #[arg(long)]
        report_every: Option<u32>,
    },
    /// Replay a single episode from its seed, printing snapshots
    Replay {
        #[arg(long)]
        seed: u64,
        #[arg(long, value_parser = parse_policy)]
        policy: Option<PolicyKind>,
        /// Output file (stdout when omitted)
        #[arg(long)]
        output: Option<PathBuf>,
        #[arg(long)]
        realtime: bool,
    },
    /// Print the best-episodes board
    Board {
        #[arg(long)]
        path: PathBuf,
    },
    /// Write a settings file with default values
    InitConfig {
        #[arg(long)]
        output: PathBuf,
    },
}

fn parse_policy(s: &str) -> Result<PolicyKind, String> {
    PolicyKind::from_str(s).ok_or_else(|| format!("unknown policy '{s}' (random, aim, idle)"))
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let mut settings = Settings::load_or_default(cli.config.as_deref())?;

    match cli.command {
        Commands::Run {
            seed,
            episodes,
            policy,
            snapshots,
            realtime,
            board,
            report_every,
        } => {
            if let Some(seed) = seed {
                settings.seed = seed;
            }
            if let Some(episodes) = episodes {
                settings.episodes = episodes;
            }
            if let Some(policy) = policy {
                settings.policy = policy;
            }
            if snapshots.is_some() {
                settings.snapshot_path = snapshots;
            }
            if board.is_some() {
                settings.board_path = board;
            }
            if let Some(every) = report_every {
                settings.report_every = every;
            }
            settings.realtime |= realtime;
            run(&settings)
        }
        Commands::Replay {
            seed,
            policy,
            output,
            realtime,
        } => {
            let policy = policy.unwrap_or(settings.policy);
            replay(seed, policy, output, realtime || settings.realtime)
        }
        Commands::Board { path } => {
            let board = BestEpisodes::load(&path)?;
            print_board(&board);
            Ok(())
        }
        Commands::InitConfig { output } => {
            Settings::default().save(&output)?;
            Ok(())
        }
    }
}

fn run(settings: &Settings) -> Result<()> {
    log::info!(
        "Shooter Gym starting: seed={}, episodes={}, policy={}",
        settings.seed,
        settings.episodes,
        settings.policy.as_str()
    );

    let mut env = ShooterEnv::new(settings.seed);
    let mut stats = EpisodeStats::default();
    let mut board = match &settings.board_path {
        Some(path) => Some(BestEpisodes::load(path)?),
        None => None,
    };
    let mut sink = match &settings.snapshot_path {
        Some(path) => Some(BufWriter::new(
            File::create(path).with_context(|| format!("creating {}", path.display()))?,
        )),
        None => None,
    };

    for episode in 1..=u64::from(settings.episodes) {
        env.reset(None);
        let seed = env
            .state()
            .map(|s| s.seed)
            .ok_or_else(|| anyhow!("engine has no state after reset"))?;

        let record = play_episode(
            &mut env,
            settings.policy,
            episode,
            seed,
            sink.as_mut().map(|w| w as &mut dyn Write),
            settings.realtime,
        )?;

        log::debug!(
            "Episode {}: return={:.1}, length={}, score={}",
            record.episode,
            record.total_reward,
            record.length,
            record.score
        );
        stats.push(&record);
        if let Some(board) = board.as_mut() {
            if let Some(rank) = board.add(record) {
                log::info!("Episode {} placed #{} on the board", episode, rank);
            }
        }

        if settings.report_every > 0 && episode % u64::from(settings.report_every) == 0 {
            report(&stats);
        }
    }

    if let Some(w) = sink.as_mut() {
        w.flush().context("flushing snapshot stream")?;
    }
    if let (Some(board), Some(path)) = (&board, &settings.board_path) {
        board.save(path)?;
    }

    report(&stats);
    Ok(())
}

fn replay(seed: u64, policy: PolicyKind, output: Option<PathBuf>, realtime: bool) -> Result<()> {
    let mut env = ShooterEnv::new(seed);
    env.reset(Some(seed));

    let mut sink: Box<dyn Write> = match &output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("creating {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    let record = play_episode(&mut env, policy, 1, seed, Some(&mut *sink), realtime)?;
    sink.flush().context("flushing snapshot stream")?;

    log::info!(
        "Replayed seed {}: return={:.1}, length={}, score={}",
        seed,
        record.total_reward,
        record.length,
        record.score
    );
    Ok(())
}

/// Play one already-reset episode to its end
///
/// The controller is seeded with the episode seed so a record's seed is
/// enough to replay it exactly.
fn play_episode(
    env: &mut ShooterEnv,
    policy: PolicyKind,
    episode: u64,
    seed: u64,
    mut sink: Option<&mut dyn Write>,
    realtime: bool,
) -> Result<EpisodeRecord> {
    let mut controller = policy.build(seed);
    let mut tracker = EpisodeTracker::new(episode, seed);
    let frame = Duration::from_secs_f64(1.0 / f64::from(RENDER_FPS));

    let mut obs = env
        .state()
        .map(shooter_gym::Observation::encode)
        .ok_or_else(|| anyhow!("episode {episode} was not reset"))?;

    loop {
        let action = controller.act(&obs);
        let result = env.step(action)?;
        obs = result.observation;

        if let Some(w) = sink.as_deref_mut() {
            let snapshot = env.render_snapshot()?;
            writeln!(w, "{}", snapshot.to_json_line()?).context("writing snapshot")?;
            if realtime {
                thread::sleep(frame);
            }
        }

        if let Some(record) = tracker.record(&result) {
            return Ok(record);
        }
    }
}

fn report(stats: &EpisodeStats) {
    log::info!(
        "{} episodes: mean return {:.1}, mean length {:.1}, best {:.1}, truncated {}",
        stats.episodes,
        stats.mean_reward(),
        stats.mean_length(),
        stats.best_reward.unwrap_or(0.0),
        stats.truncations
    );
}

fn print_board(board: &BestEpisodes) {
    if board.is_empty() {
        println!("No episodes recorded");
        return;
    }
    println!(
        "{:>4}  {:>10}  {:>6}  {:>6}  {:>20}",
        "rank", "return", "length", "score", "seed"
    );
    for (i, e) in board.entries.iter().enumerate() {
        println!(
            "{:>4}  {:>10.1}  {:>6}  {:>6}  {:>20}",
            i + 1,
            e.total_reward,
            e.length,
            e.score,
            e.seed
        );
    }
}
