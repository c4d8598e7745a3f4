//! Tutor CLI - Command-line interface for the adaptive tutor
//!
//! Commands:
//! - analyze: Classify a metrics record and update the player's profile
//! - tutorial: Generate a tutorial session
//! - feedback: Compose real-time feedback for a game event
//! - text: Analyze free-text player feedback
//! - profile / sessions: Manage stored players and tutorial sessions
//! - insights / overview / report: Learning insights and analytics
//! - doctor: Diagnose configuration and state file health
//!
//! State is kept in a JSON file (`--state`) that is loaded before each command and
//! written back after commands that change it.

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use adaptive_tutor::logging::init_tracing;
use adaptive_tutor::types::{ProfileRegistration, ProfileUpdate};
use adaptive_tutor::{
    GameContext, GameEvent, GameMetrics, GameState, LearningStyle, StateSnapshot, TutorConfig,
    TutorEngine, TutorError, TutorialCategory, PRODUCER_NAME, TUTOR_VERSION,
};

/// Tutor - Adaptive tutorial and feedback engine
#[derive(Parser)]
#[command(name = "tutor")]
#[command(version = TUTOR_VERSION)]
#[command(about = "Personalize tutorials and feedback from gameplay metrics", long_about = None)]
struct Cli {
    /// State file (JSON); loaded if present, saved after mutating commands
    #[arg(long, global = true)]
    state: Option<PathBuf>,

    /// Configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a metrics record (JSON)
    Analyze {
        /// Input file path (use - for stdin)
        #[arg(short, long, default_value = "-")]
        input: PathBuf,

        /// Player id; defaults to the id inside the metrics
        #[arg(long)]
        player: Option<String>,
    },

    /// Generate a tutorial session
    Tutorial {
        #[arg(long)]
        player: String,

        /// Tutorial category (e.g. onboarding, collision_reduction)
        #[arg(long)]
        category: String,

        /// Current game state (e.g. game_over, high_score)
        #[arg(long)]
        game_state: Option<String>,

        #[arg(long)]
        score: Option<i64>,

        #[arg(long)]
        attempts: Option<i64>,
    },

    /// Compose feedback for an in-game event
    Feedback {
        #[arg(long)]
        player: String,

        /// Triggering event (e.g. collision, high_score, game_start)
        #[arg(long)]
        event: String,

        #[arg(long, default_value = "0")]
        score: i64,

        #[arg(long, default_value = "0")]
        attempts: i64,
    },

    /// Analyze free-text feedback
    Text {
        /// Feedback text (use - for stdin)
        text: String,

        /// Record detected difficulty areas on this player's profile
        #[arg(long)]
        player: Option<String>,
    },

    /// Manage player profiles
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },

    /// Manage tutorial sessions
    Sessions {
        #[command(subcommand)]
        action: SessionAction,
    },

    /// Learning insights for a player
    Insights {
        player: String,
    },

    /// System overview
    Overview,

    /// Analytics reports
    Report {
        #[arg(value_enum)]
        kind: ReportKind,

        /// Player id (required for the player report)
        #[arg(long)]
        player: Option<String>,
    },

    /// Diagnose configuration and state file
    Doctor {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum ProfileAction {
    /// Register a player, replacing any existing profile
    Register {
        player: String,

        #[arg(long)]
        style: Option<String>,

        #[arg(long)]
        language: Option<String>,

        #[arg(long)]
        skill: Option<f64>,
    },
    /// Show a profile
    Get { player: String },
    /// Update learning style, language or difficulty areas
    Update {
        player: String,

        #[arg(long)]
        style: Option<String>,

        #[arg(long)]
        language: Option<String>,

        /// Comma-separated list replacing the current difficulty areas
        #[arg(long, value_delimiter = ',')]
        areas: Option<Vec<String>>,
    },
    /// Delete a profile and its sessions
    Delete { player: String },
    /// List all profiles
    List,
    /// Learning progress for a player
    Progress { player: String },
    /// Tutorial and practice recommendations for a player
    Recommendations { player: String },
}

#[derive(Subcommand)]
enum SessionAction {
    /// List a player's tutorial sessions
    List { player: String },
    /// Complete (remove) a tutorial session
    Complete { session_id: String },
}

#[derive(Clone, ValueEnum)]
enum ReportKind {
    /// Per-player analytics
    Player,
    /// Session counts and durations per tutorial category
    Effectiveness,
    /// Skill and learning-style patterns across all players
    Patterns,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e)).unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), TutorCliError> {
    if let Commands::Doctor { json } = cli.command {
        return cmd_doctor(cli.config.as_deref(), cli.state.as_deref(), json);
    }

    let config = TutorConfig::load(cli.config.as_deref())?;
    init_tracing(&config.log_level);

    let engine = open_engine(config, cli.state.as_deref())?;
    let state = cli.state.as_deref();

    match cli.command {
        Commands::Analyze { input, player } => {
            let metrics: GameMetrics = serde_json::from_str(&read_input(&input)?)?;
            let player = player.unwrap_or_else(|| metrics.player_id.clone());
            let analysis = engine.analyze_performance(&player, &metrics)?;
            save_state(&engine, state)?;
            print_json(&analysis)
        }

        Commands::Tutorial {
            player,
            category,
            game_state,
            score,
            attempts,
        } => {
            let context = GameContext {
                game_state: game_state.as_deref().map(GameEvent::from),
                current_score: score,
                attempts,
            };
            let session =
                engine.generate_tutorial(&player, &TutorialCategory::from(category.as_str()), &context);
            save_state(&engine, state)?;
            print_json(&session)
        }

        Commands::Feedback {
            player,
            event,
            score,
            attempts,
        } => {
            let feedback = engine.generate_feedback(
                &player,
                &GameEvent::from(event.as_str()),
                &GameState { score, attempts },
            );
            print_json(&feedback)
        }

        Commands::Text { text, player } => {
            let text = if text == "-" {
                read_input(Path::new("-"))?
            } else {
                text
            };
            match player {
                Some(player) => {
                    let analysis = engine.submit_player_feedback(&player, &text);
                    save_state(&engine, state)?;
                    print_json(&analysis)
                }
                None => print_json(&engine.analyze_feedback_text(&text)),
            }
        }

        Commands::Profile { action } => cmd_profile(&engine, state, action),

        Commands::Sessions { action } => match action {
            SessionAction::List { player } => print_json(&engine.active_sessions(&player)),
            SessionAction::Complete { session_id } => {
                let session = engine.complete_session(&session_id)?;
                save_state(&engine, state)?;
                print_json(&session)
            }
        },

        Commands::Insights { player } => print_json(&engine.learning_insights(&player)?),

        Commands::Overview => print_json(&engine.system_overview()),

        Commands::Report { kind, player } => match kind {
            ReportKind::Player => {
                let player = player.ok_or(TutorCliError::MissingArgument("--player"))?;
                print_json(&engine.player_analytics(&player)?)
            }
            ReportKind::Effectiveness => print_json(&engine.tutorial_effectiveness()),
            ReportKind::Patterns => print_json(&engine.learning_patterns()),
        },

        Commands::Doctor { .. } => Ok(()),
    }
}

fn cmd_profile(
    engine: &TutorEngine,
    state: Option<&Path>,
    action: ProfileAction,
) -> Result<(), TutorCliError> {
    match action {
        ProfileAction::Register {
            player,
            style,
            language,
            skill,
        } => {
            let profile = engine.register_profile(ProfileRegistration {
                player_id: player,
                preferred_language: language,
                learning_style: style.as_deref().map(LearningStyle::from),
                initial_skill_level: skill,
            })?;
            save_state(engine, state)?;
            print_json(&profile)
        }
        ProfileAction::Get { player } => print_json(&engine.get_profile(&player)?),
        ProfileAction::Update {
            player,
            style,
            language,
            areas,
        } => {
            let update = ProfileUpdate {
                learning_style: style.as_deref().map(LearningStyle::from),
                preferred_language: language,
                difficulty_areas: areas,
            };
            let profile = engine.update_profile(&player, &update)?;
            save_state(engine, state)?;
            print_json(&profile)
        }
        ProfileAction::Delete { player } => {
            let sessions_removed = engine.delete_profile(&player)?;
            save_state(engine, state)?;
            print_json(&serde_json::json!({
                "player_id": player,
                "deleted": true,
                "sessions_removed": sessions_removed,
            }))
        }
        ProfileAction::List => print_json(&engine.list_profiles()),
        ProfileAction::Progress { player } => print_json(&engine.learning_progress(&player)?),
        ProfileAction::Recommendations { player } => {
            print_json(&engine.player_recommendations(&player)?)
        }
    }
}

fn cmd_doctor(config: Option<&Path>, state: Option<&Path>, json: bool) -> Result<(), TutorCliError> {
    let mut checks: Vec<DoctorCheck> = Vec::new();

    checks.push(DoctorCheck {
        name: "tutor_version".to_string(),
        status: CheckStatus::Ok,
        message: format!("Tutor version {}", TUTOR_VERSION),
    });

    match TutorConfig::load(config) {
        Ok(loaded) => checks.push(DoctorCheck {
            name: "config".to_string(),
            status: CheckStatus::Ok,
            message: format!(
                "language={}, learning_style={}, history_window={}, seeded={}",
                loaded.default_language,
                loaded.default_learning_style,
                loaded.history_window,
                loaded.rng_seed.is_some()
            ),
        }),
        Err(e) => checks.push(DoctorCheck {
            name: "config".to_string(),
            status: CheckStatus::Error,
            message: e.to_string(),
        }),
    }

    match state {
        Some(path) if path.exists() => {
            let check = match fs::read_to_string(path) {
                Ok(content) => match serde_json::from_str::<StateSnapshot>(&content) {
                    Ok(snapshot) => DoctorCheck {
                        name: "state".to_string(),
                        status: CheckStatus::Ok,
                        message: format!(
                            "State file valid ({} profiles, {} sessions, saved by {})",
                            snapshot.profiles.len(),
                            snapshot.sessions.len(),
                            snapshot.version
                        ),
                    },
                    Err(e) => DoctorCheck {
                        name: "state".to_string(),
                        status: CheckStatus::Error,
                        message: format!("Invalid state JSON: {}", e),
                    },
                },
                Err(e) => DoctorCheck {
                    name: "state".to_string(),
                    status: CheckStatus::Error,
                    message: format!("Cannot read state file: {}", e),
                },
            };
            checks.push(check);
        }
        Some(_) => checks.push(DoctorCheck {
            name: "state".to_string(),
            status: CheckStatus::Warning,
            message: "State file does not exist yet".to_string(),
        }),
        None => checks.push(DoctorCheck {
            name: "state".to_string(),
            status: CheckStatus::Warning,
            message: "No state file given; state is not kept between runs".to_string(),
        }),
    }

    let stdin_message = if atty::is(atty::Stream::Stdin) {
        "stdin is a TTY (pass metrics with --input)"
    } else {
        "stdin is a pipe (metrics can be read from stdin)"
    };
    checks.push(DoctorCheck {
        name: "stdin".to_string(),
        status: CheckStatus::Ok,
        message: stdin_message.to_string(),
    });

    let report = DoctorReport {
        producer: PRODUCER_NAME.to_string(),
        version: TUTOR_VERSION.to_string(),
        checks,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Tutor Doctor Report");
        println!("===================");
        println!("Producer: {}", report.producer);
        println!("Version:  {}", report.version);
        println!("\nChecks:");

        for check in &report.checks {
            let status_icon = match check.status {
                CheckStatus::Ok => "[OK]",
                CheckStatus::Warning => "[WARN]",
                CheckStatus::Error => "[ERR]",
            };
            println!("  {} {}: {}", status_icon, check.name, check.message);
        }
    }

    let has_errors = report.checks.iter().any(|c| matches!(c.status, CheckStatus::Error));
    if has_errors {
        Err(TutorCliError::DoctorFailed)
    } else {
        Ok(())
    }
}

// Helper functions

fn open_engine(config: TutorConfig, state: Option<&Path>) -> Result<TutorEngine, TutorCliError> {
    let engine = TutorEngine::new(config);
    if let Some(path) = state {
        if path.exists() {
            engine.load_state(&fs::read_to_string(path)?)?;
        }
    }
    Ok(engine)
}

fn save_state(engine: &TutorEngine, state: Option<&Path>) -> Result<(), TutorCliError> {
    if let Some(path) = state {
        fs::write(path, engine.save_state()?)?;
    }
    Ok(())
}

fn read_input(input: &Path) -> Result<String, TutorCliError> {
    if input.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(fs::read_to_string(input)?)
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), TutorCliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// Error types

#[derive(Debug)]
enum TutorCliError {
    Io(io::Error),
    Tutor(TutorError),
    Json(serde_json::Error),
    MissingArgument(&'static str),
    DoctorFailed,
}

impl From<io::Error> for TutorCliError {
    fn from(e: io::Error) -> Self {
        TutorCliError::Io(e)
    }
}

impl From<TutorError> for TutorCliError {
    fn from(e: TutorError) -> Self {
        TutorCliError::Tutor(e)
    }
}

impl From<serde_json::Error> for TutorCliError {
    fn from(e: serde_json::Error) -> Self {
        TutorCliError::Json(e)
    }
}

#[derive(Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<TutorCliError> for CliError {
    fn from(e: TutorCliError) -> Self {
        match e {
            TutorCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            TutorCliError::Tutor(e) => {
                let (code, hint) = match &e {
                    TutorError::Validation(_) => ("VALIDATION_ERROR", "Fix the input fields and retry"),
                    TutorError::PlayerNotFound(_) => {
                        ("NOT_FOUND", "Run 'tutor profile list' to see known players")
                    }
                    TutorError::SessionNotFound(_) => {
                        ("NOT_FOUND", "Run 'tutor sessions list <player>' to see open sessions")
                    }
                    TutorError::Json(_) => ("JSON_ERROR", "Check the state file with 'tutor doctor'"),
                    TutorError::Config(_) => ("CONFIG_ERROR", "Check the config file and TUTOR_* variables"),
                };
                CliError {
                    code: code.to_string(),
                    message: e.to_string(),
                    hint: Some(hint.to_string()),
                }
            }
            TutorCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            TutorCliError::MissingArgument(arg) => CliError {
                code: "MISSING_ARGUMENT".to_string(),
                message: format!("{} is required for this command", arg),
                hint: None,
            },
            TutorCliError::DoctorFailed => CliError {
                code: "DOCTOR_FAILED".to_string(),
                message: "One or more health checks failed".to_string(),
                hint: Some("Review the doctor report for details".to_string()),
            },
        }
    }
}

// Report types

#[derive(Serialize)]
struct DoctorReport {
    producer: String,
    version: String,
    checks: Vec<DoctorCheck>,
}

#[derive(Serialize)]
struct DoctorCheck {
    name: String,
    status: CheckStatus,
    message: String,
}

#[derive(Serialize)]
enum CheckStatus {
    Ok,
    Warning,
    Error,
}
