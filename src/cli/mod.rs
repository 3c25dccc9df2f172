//! CLI subcommands — init, new, validate, history, completion.

use crate::core::{initializer, parser, types};
use crate::provenance::eventlog;
use clap::Subcommand;
use clap_complete::Shell;
use std::path::{Path, PathBuf};

/// Config file picked up from the current directory when `--file` is absent.
pub const DEFAULT_CONFIG: &str = "provinit.yaml";

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the provisioning tool's init command and print its output
    Init {
        /// Path to provinit.yaml (default: ./provinit.yaml if present)
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Project directory to run in (overrides config)
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// Provisioning tool executable (overrides config)
        #[arg(short, long)]
        program: Option<String>,

        /// Append run events to this JSONL file (overrides config)
        #[arg(long)]
        event_log: Option<PathBuf>,
    },

    /// Write a template provinit.yaml
    New {
        /// Directory to write into (default: current)
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Validate provinit.yaml without running anything
    Validate {
        /// Path to provinit.yaml
        #[arg(short, long, default_value = DEFAULT_CONFIG)]
        file: PathBuf,
    },

    /// Show past runs recorded in an event log
    History {
        /// Path to the JSONL event log
        #[arg(long)]
        event_log: PathBuf,

        /// Show only the most recent N runs
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },

    /// Print shell completions
    Completion {
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Dispatch a CLI command.
pub fn dispatch(cmd: Commands) -> Result<(), String> {
    match cmd {
        Commands::Init {
            file,
            dir,
            program,
            event_log,
        } => {
            let overrides = Overrides {
                dir,
                program,
                event_log,
            };
            cmd_init(file.as_deref(), &overrides)
        }
        Commands::New { path } => cmd_new(&path),
        Commands::Validate { file } => cmd_validate(&file),
        Commands::History { event_log, limit } => cmd_history(&event_log, limit),
        Commands::Completion { shell } => {
            cmd_completion(shell);
            Ok(())
        }
    }
}

/// CLI values that take precedence over the config file.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub dir: Option<PathBuf>,
    pub program: Option<String>,
    pub event_log: Option<PathBuf>,
}

impl Overrides {
    fn apply(self, config: &mut types::InitConfig) {
        if let Some(dir) = self.dir {
            config.working_dir = dir;
        }
        if let Some(program) = self.program {
            config.command.program = program;
        }
        if let Some(log) = self.event_log {
            config.event_log = Some(log);
        }
    }
}

/// Defaults ← config file ← CLI overrides, then validation.
///
/// Without `--file`, `./provinit.yaml` is read only if it exists.
pub fn resolve_config(
    file: Option<&Path>,
    overrides: &Overrides,
) -> Result<types::InitConfig, String> {
    let mut config = match file {
        Some(path) => parser::parse_config_file(path)?,
        None => {
            let implicit = Path::new(DEFAULT_CONFIG);
            if implicit.is_file() {
                parser::parse_config_file(implicit)?
            } else {
                types::InitConfig::default()
            }
        }
    };
    overrides.clone().apply(&mut config);

    let errors = parser::validate_config(&config);
    if errors.is_empty() {
        return Ok(config);
    }
    for e in &errors {
        eprintln!("  ERROR: {}", e);
    }
    Err("validation failed".to_string())
}

fn cmd_init(file: Option<&Path>, overrides: &Overrides) -> Result<(), String> {
    let config = resolve_config(file, overrides)?;
    let result = initializer::run_init_logged(&config).map_err(|e| e.to_string())?;
    match initializer::print_report(&result) {
        Ok(()) => Ok(()),
        // Reader went away (e.g. `| head`); nothing left to report to.
        Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => Ok(()),
        Err(e) => Err(format!("cannot write report: {}", e)),
    }
}

const TEMPLATE: &str = r#"version: "1.0"

# Provisioning project root the command runs in
working_dir: .

command:
  program: terraform
  args: [init]

# Uncomment to record every run (JSONL, BLAKE3 output hashes)
# event_log: state/events.jsonl
"#;

fn cmd_new(path: &Path) -> Result<(), String> {
    let config_path = path.join(DEFAULT_CONFIG);
    if config_path.exists() {
        return Err(format!("{} already exists", config_path.display()));
    }

    std::fs::create_dir_all(path)
        .map_err(|e| format!("cannot create {}: {}", path.display(), e))?;
    std::fs::write(&config_path, TEMPLATE)
        .map_err(|e| format!("cannot write {}: {}", config_path.display(), e))?;

    println!("Created: {}", config_path.display());
    Ok(())
}

fn cmd_validate(file: &Path) -> Result<(), String> {
    let config = parser::parse_config_file(file)?;
    let errors = parser::validate_config(&config);

    if errors.is_empty() {
        println!(
            "OK: {} in {}",
            config.command,
            config.working_dir.display()
        );
        Ok(())
    } else {
        for e in &errors {
            eprintln!("  ERROR: {}", e);
        }
        Err(format!("{} validation error(s)", errors.len()))
    }
}

fn cmd_history(event_log: &Path, limit: Option<usize>) -> Result<(), String> {
    let events = eventlog::read_events(event_log)?;
    let runs = eventlog::summarize_runs(&events);

    if runs.is_empty() {
        println!("No runs recorded in {}", event_log.display());
        return Ok(());
    }

    for line in history_lines(&runs, limit) {
        println!("{}", line);
    }
    Ok(())
}

/// Render runs oldest first, keeping only the last `limit` when set.
fn history_lines(runs: &[eventlog::RunSummary], limit: Option<usize>) -> Vec<String> {
    let skip = limit.map_or(0, |n| runs.len().saturating_sub(n));
    runs[skip..].iter().map(format_run).collect()
}

fn format_run(run: &eventlog::RunSummary) -> String {
    let outcome = match &run.outcome {
        eventlog::RunOutcome::Completed {
            exit_code,
            duration_seconds,
        } => format!("return code {} ({:.1}s)", exit_code, duration_seconds),
        eventlog::RunOutcome::Failed { error } => format!("FAILED: {}", error),
        eventlog::RunOutcome::Incomplete => "incomplete".to_string(),
    };
    format!(
        "{}  {}  {} in {}: {}",
        run.started_at, run.run_id, run.command, run.working_dir, outcome
    )
}

fn cmd_completion(shell: Shell) {
    let mut cmd = <Commands as Subcommand>::augment_subcommands(clap::Command::new("provinit"));
    clap_complete::generate(shell, &mut cmd, "provinit", &mut std::io::stdout());
}
