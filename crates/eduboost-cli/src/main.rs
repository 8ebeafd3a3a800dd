//! eduboost CLI: the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "eduboost",
    version,
    about = "Student risk analysis, learning goals and study plans"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a student's module performance
    Analyze {
        /// Student id
        #[arg(long)]
        student: String,

        /// Output format: text, json, markdown, html
        #[arg(long, default_value = "text")]
        format: String,

        /// Write to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Generate prioritized learning goals
    Goals {
        /// Student id
        #[arg(long)]
        student: String,

        /// Output format: text, json, markdown, html
        #[arg(long, default_value = "text")]
        format: String,

        /// Write to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Build a weekly study plan with matched resources
    Plan {
        /// Student id
        #[arg(long)]
        student: String,

        /// Seed for schedule subject selection
        #[arg(long)]
        seed: Option<u64>,

        /// Output format: text, json, markdown, html
        #[arg(long, default_value = "text")]
        format: String,

        /// Write to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Score a single legacy prediction request
    Predict {
        /// JSON request file (`-` for stdin)
        #[arg(long, conflicts_with = "json")]
        input: Option<PathBuf>,

        /// Inline JSON request
        #[arg(long)]
        json: Option<String>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Goal reports for many students at once
    Cohort {
        /// Comma-separated student ids (default: every student in the data directory)
        #[arg(long)]
        students: Option<String>,

        /// Max students processed concurrently
        #[arg(long)]
        parallelism: Option<usize>,

        /// Output format: text, json, markdown, html
        #[arg(long, default_value = "text")]
        format: String,

        /// Write to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Submit lecturer feedback for a student
    Feedback {
        /// Student id
        #[arg(long)]
        student: String,

        /// Module the feedback is about
        #[arg(long)]
        module: String,

        /// Lecturer id
        #[arg(long)]
        lecturer: String,

        /// Feedback text
        #[arg(long)]
        text: String,

        /// Comma-separated weak areas; each becomes a goal
        #[arg(long)]
        weak_areas: Option<String>,

        /// Comma-separated strengths
        #[arg(long)]
        strengths: Option<String>,

        /// Comma-separated recommended actions
        #[arg(long)]
        actions: Option<String>,

        /// Urgency, 1-5
        #[arg(long, default_value_t = 3)]
        urgency: u8,

        /// Expected improvement timeline
        #[arg(long, default_value = "2 weeks")]
        timeline: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Record progress on a goal in a saved goals report
    Progress {
        /// Goals report JSON (from `eduboost goals --format json --output ...`)
        #[arg(long)]
        report: PathBuf,

        /// Goal id
        #[arg(long)]
        goal: String,

        /// New progress, 0-100
        #[arg(long, allow_negative_numbers = true)]
        progress: i64,

        /// Note kept with this update
        #[arg(long)]
        notes: Option<String>,
    },

    /// List the module directory
    Modules {
        /// Module name or code to look up
        #[arg(long)]
        query: Option<String>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Validate a rule book, resource catalog or record file
    Validate {
        /// Rule book TOML (default: the built-in rule book)
        #[arg(long)]
        rules: Option<PathBuf>,

        /// Resource catalog TOML
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Student record file (.json or .csv)
        #[arg(long)]
        records: Option<PathBuf>,
    },

    /// Create a starter config and sample student data
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("eduboost=info".parse().unwrap()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Analyze {
            student,
            format,
            output,
            config,
        } => commands::analyze::execute(student, format, output, config).await,
        Commands::Goals {
            student,
            format,
            output,
            config,
        } => commands::goals::execute(student, format, output, config).await,
        Commands::Plan {
            student,
            seed,
            format,
            output,
            config,
        } => commands::plan::execute(student, seed, format, output, config).await,
        Commands::Predict {
            input,
            json,
            format,
        } => commands::predict::execute(input, json, format),
        Commands::Cohort {
            students,
            parallelism,
            format,
            output,
            config,
        } => commands::cohort::execute(students, parallelism, format, output, config).await,
        Commands::Feedback {
            student,
            module,
            lecturer,
            text,
            weak_areas,
            strengths,
            actions,
            urgency,
            timeline,
            config,
        } => commands::feedback::execute(
            student, module, lecturer, text, weak_areas, strengths, actions, urgency, timeline,
            config,
        ),
        Commands::Progress {
            report,
            goal,
            progress,
            notes,
        } => commands::progress::execute(report, goal, progress, notes),
        Commands::Modules { query, format } => commands::modules::execute(query, format),
        Commands::Validate {
            rules,
            catalog,
            records,
        } => commands::validate::execute(rules, catalog, records),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
