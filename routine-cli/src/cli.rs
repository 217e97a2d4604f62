use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use routine_client::{ClientConfig, HttpClient};
use routine_core::{DraftStore, ExerciseFields, ExerciseId, SyncDispatcher};
use shared::Day;
use tracing::debug;

use crate::output;
use crate::plan::Plan;

#[derive(Debug, Parser)]
#[command(name = "routine", about = "Edit weekly training routines against the routines API")]
pub struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct GlobalArgs {
    /// API base URL (overrides ROUTINE_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,
    /// Bearer token (overrides ROUTINE_API_TOKEN)
    #[arg(long, global = true)]
    token: Option<String>,
    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,
    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,
    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List routines with their IDs
    List {
        /// Only routines whose name contains this text
        #[arg(long)]
        search: Option<String>,
    },
    /// Show a routine grouped by day
    Show { routine: i64 },
    /// Add an exercise to the end of a day
    Add {
        routine: i64,
        #[command(flatten)]
        exercise: ExerciseArgs,
    },
    /// Replace an exercise's fields, optionally moving it to another day
    Edit {
        routine: i64,
        exercise_id: ExerciseId,
        #[command(flatten)]
        exercise: ExerciseArgs,
    },
    /// Delete an exercise
    Remove { routine: i64, exercise_id: ExerciseId },
    /// Move an exercise to the end of another day
    Move {
        routine: i64,
        exercise_id: ExerciseId,
        day: Day,
    },
    /// Reorder a day; list every exercise ID of that day in the new order
    Reorder {
        routine: i64,
        day: Day,
        #[arg(required = true, num_args = 1..)]
        ids: Vec<ExerciseId>,
    },
    /// Rename a routine or change its description
    Rename {
        routine: i64,
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// Create a routine from a JSON plan file
    Create {
        plan: PathBuf,
        /// Only validate and print the plan
        #[arg(long)]
        dry_run: bool,
    },
    /// Copy a routine under a new name
    Duplicate { routine: i64, name: String },
    /// Delete a routine and all of its exercises
    Delete { routine: i64 },
    /// Exercise and series counts per day
    Stats { routine: i64 },
}

#[derive(Debug, Args, Clone)]
struct ExerciseArgs {
    #[arg(long)]
    day: Option<Day>,
    #[arg(long)]
    name: String,
    #[arg(long)]
    series: u32,
    #[arg(long, alias = "reps")]
    repetitions: u32,
    #[arg(long)]
    weight: Option<f64>,
    #[arg(long)]
    notes: Option<String>,
}

impl ExerciseArgs {
    fn fields(&self) -> ExerciseFields {
        ExerciseFields {
            name: self.name.clone(),
            series: self.series,
            repetitions: self.repetitions,
            weight: self.weight,
            notes: self.notes.clone(),
        }
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        init_logging(self.global.verbose);
        let json = self.global.json;

        if let Command::Create { plan, dry_run: true } = &self.command {
            let draft = Plan::load(plan)?.into_draft()?;
            print_routine(&draft, json)?;
            return Ok(());
        }

        let dispatcher = self.global.dispatcher()?;
        match self.command {
            Command::List { search } => {
                let routines = dispatcher.list_routines(search.as_deref()).await?;
                if json {
                    println!("{}", serde_json::to_string_pretty(&routines)?);
                } else {
                    print!("{}", output::routines_text(&routines));
                }
            }
            Command::Show { routine } => {
                let draft = dispatcher.reload(routine).await?;
                print_routine(&draft, json)?;
            }
            Command::Add { routine, exercise } => {
                let day = exercise.day.context("--day is required when adding")?;
                let mut draft = dispatcher.reload(routine).await?;
                draft.add_exercise(day, exercise.fields())?;
                submit(&dispatcher, &mut draft, json).await?;
            }
            Command::Edit {
                routine,
                exercise_id,
                exercise,
            } => {
                let mut draft = dispatcher.reload(routine).await?;
                dispatcher
                    .update_now(&mut draft, &exercise_id, exercise.fields(), exercise.day)
                    .await?;
                print_routine(&draft, json)?;
            }
            Command::Remove {
                routine,
                exercise_id,
            } => {
                let mut draft = dispatcher.reload(routine).await?;
                dispatcher.remove_now(&mut draft, &exercise_id).await?;
                print_routine(&draft, json)?;
            }
            Command::Move {
                routine,
                exercise_id,
                day,
            } => {
                let mut draft = dispatcher.reload(routine).await?;
                draft.move_exercise(&exercise_id, day)?;
                debug!(pending = %output::changes_text(&draft.change_set()), "Move prepared");
                submit(&dispatcher, &mut draft, json).await?;
            }
            Command::Reorder { routine, day, ids } => {
                let mut draft = dispatcher.reload(routine).await?;
                dispatcher.reorder(&mut draft, day, &ids).await?;
                print_routine(&draft, json)?;
            }
            Command::Rename {
                routine,
                name,
                description,
            } => {
                let mut draft = dispatcher.reload(routine).await?;
                let description = description.or_else(|| draft.header().description.clone());
                draft.set_details(name, description)?;
                submit(&dispatcher, &mut draft, json).await?;
            }
            Command::Create { plan, .. } => {
                let mut draft = Plan::load(&plan)?.into_draft()?;
                submit(&dispatcher, &mut draft, json).await?;
            }
            Command::Duplicate { routine, name } => {
                let source = dispatcher.reload(routine).await?;
                let mut copy = DraftStore::duplicate(source.snapshot(), name);
                submit(&dispatcher, &mut copy, json).await?;
            }
            Command::Delete { routine } => {
                dispatcher.delete_routine(routine).await?;
                println!("Deleted routine #{routine}");
            }
            Command::Stats { routine } => {
                let draft = dispatcher.reload(routine).await?;
                let stats = draft.stats();
                if json {
                    println!("{}", serde_json::to_string_pretty(&stats)?);
                } else {
                    print!("{}", output::stats_text(&stats));
                }
            }
        }
        Ok(())
    }
}

impl GlobalArgs {
    /// Environment first, then command-line overrides
    fn config(&self) -> ClientConfig {
        let mut config = ClientConfig::from_env();
        if let Some(url) = &self.api_url {
            config.base_url = url.clone();
        }
        if let Some(token) = &self.token {
            config = config.with_token(token.clone());
        }
        if let Some(timeout) = self.timeout {
            config = config.with_timeout(timeout);
        }
        config
    }

    fn dispatcher(&self) -> anyhow::Result<SyncDispatcher> {
        let config = self.config();
        debug!(base_url = %config.base_url, timeout = config.timeout, "Using API");
        let client = HttpClient::new(&config).context("Failed to build HTTP client")?;
        Ok(SyncDispatcher::new(Arc::new(client)))
    }
}

async fn submit(
    dispatcher: &SyncDispatcher,
    draft: &mut DraftStore,
    json: bool,
) -> anyhow::Result<()> {
    let report = dispatcher.submit(draft).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", output::report_text(&report));
    }
    Ok(())
}

fn print_routine(draft: &DraftStore, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", output::routine_json(draft)?);
    } else {
        print!("{}", output::routine_text(draft));
    }
    Ok(())
}

/// Log to stderr; `RUST_LOG` wins over `--verbose`
fn init_logging(verbose: bool) {
    let default = if verbose {
        "routine_core=debug,routine_client=debug,routine_cli=debug"
    } else {
        "routine_core=info,routine_client=info,routine_cli=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_reorder() {
        let cli = Cli::try_parse_from(["routine", "reorder", "4", "lunes", "12", "10", "11"]).unwrap();
        match cli.command {
            Command::Reorder { routine, day, ids } => {
                assert_eq!(routine, 4);
                assert_eq!(day, Day::Monday);
                assert_eq!(
                    ids,
                    vec![
                        ExerciseId::Persisted(12),
                        ExerciseId::Persisted(10),
                        ExerciseId::Persisted(11)
                    ]
                );
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_add_with_globals() {
        let cli = Cli::try_parse_from([
            "routine", "add", "4", "--day", "Miércoles", "--name", "Remo", "--series", "3",
            "--reps", "10", "--weight", "40.5", "--api-url", "http://api:9000", "--json",
        ])
        .unwrap();
        assert_eq!(cli.global.api_url.as_deref(), Some("http://api:9000"));
        assert!(cli.global.json);
        match cli.command {
            Command::Add { exercise, .. } => {
                assert_eq!(exercise.day, Some(Day::Wednesday));
                assert_eq!(exercise.fields().weight, Some(40.5));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_list() {
        let cli = Cli::try_parse_from(["routine", "list", "--search", "torso"]).unwrap();
        assert!(matches!(cli.command, Command::List { search: Some(ref s) } if s == "torso"));
        let cli = Cli::try_parse_from(["routine", "list"]).unwrap();
        assert!(matches!(cli.command, Command::List { search: None }));
    }

    #[test]
    fn test_bad_day_rejected() {
        assert!(Cli::try_parse_from(["routine", "move", "4", "10", "someday"]).is_err());
    }

    #[test]
    fn test_flag_overrides_config() {
        let cli = Cli::try_parse_from([
            "routine", "show", "1", "--api-url", "http://other:1", "--timeout", "7",
        ])
        .unwrap();
        let config = cli.global.config();
        assert_eq!(config.base_url, "http://other:1");
        assert_eq!(config.timeout, 7);
    }
}
