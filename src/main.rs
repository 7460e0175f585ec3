use std::{
    fs,
    io::{self, Read},
    path::PathBuf,
    sync::Arc,
};

use anyhow::Context;
use clap::{Parser, Subcommand};

use studyplan::{
    config::{self, STORE_DIR_ENV, WizardConfig},
    core::store::FileStore,
    logging,
    project::{self, CreateProjectRequest, ProjectWire},
    wizard::{AnswerValue, DraftStore, StepOutcome, WizardController, WizardFlow, flows},
};

#[derive(Parser)]
#[command(name = "studyplan")]
#[command(about = "Inspect study-plan wizard drafts and reconcile project payloads")]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Directory holding wizard drafts
    #[arg(long, value_name = "DIR", env = STORE_DIR_ENV, global = true)]
    store_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Reconcile backend project JSON (one object or an array) into card shape
    Reconcile {
        /// Input file; reads stdin when omitted or "-"
        #[arg(value_name = "FILE")]
        input: Option<PathBuf>,

        /// Fail on an unknown project_type instead of treating it as self_study
        #[arg(long)]
        strict: bool,
    },
    /// List the built-in wizard flows and their steps
    Flows,
    /// Inspect and edit stored wizard drafts
    Draft {
        #[command(subcommand)]
        action: DraftAction,
    },
}

#[derive(Subcommand)]
enum DraftAction {
    /// List flows that have a stored draft
    List,
    /// Print the stored draft for a flow
    Show { flow: String },
    /// Walk the flow over its draft and report which steps are complete
    Status { flow: String },
    /// Set one answer in a flow's draft (stored as text unless --json)
    Set {
        flow: String,
        field: String,
        value: String,

        /// Parse the value as JSON (number, bool, list, or {"files": [...]})
        #[arg(long)]
        json: bool,
    },
    /// Print the create-project request for a completed draft
    Payload {
        flow: String,

        /// Mark the request as a server-side draft
        #[arg(long)]
        as_draft: bool,
    },
    /// Delete the stored draft for a flow
    Clear { flow: String },
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    logging::init(args.verbose);

    match args.command {
        Command::Reconcile { input, strict } => run_reconcile(input, strict),
        Command::Flows => {
            for flow in flows::all() {
                println!("{} - {}", flow.id, flow.title);
                for (i, step) in flow.steps.iter().enumerate() {
                    let optional = if step.descriptor.is_optional { " (optional)" } else { "" };
                    println!("  {}. {}: {}{}", i + 1, step.id(), step.descriptor.title, optional);
                }
            }
            Ok(())
        }
        Command::Draft { action } => {
            let dir = args.store_dir.unwrap_or_else(config::default_store_dir);
            let store = FileStore::open(&dir)
                .with_context(|| format!("Failed to open draft store {:?}", dir))?;
            run_draft(store, action)
        }
    }
}

fn run_reconcile(input: Option<PathBuf>, strict: bool) -> anyhow::Result<()> {
    let raw = match input {
        Some(path) if path.as_os_str() != "-" => fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {:?}", path))?,
        _ => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            buf
        }
    };

    let value: serde_json::Value = serde_json::from_str(&raw).context("Input is not valid JSON")?;
    let wires: Vec<ProjectWire> = if value.is_array() {
        serde_json::from_value(value).context("Input is not an array of projects")?
    } else {
        vec![serde_json::from_value(value).context("Input is not a project")?]
    };

    let projects = if strict {
        wires
            .iter()
            .map(project::try_reconcile)
            .collect::<Result<Vec<_>, _>>()?
    } else {
        project::reconcile_all(&wires)
    };
    println!("{}", serde_json::to_string_pretty(&projects)?);
    Ok(())
}

fn resolve_flow(id: &str) -> anyhow::Result<WizardFlow> {
    flows::by_id(id).ok_or_else(|| {
        let known: Vec<String> = flows::all().into_iter().map(|f| f.id).collect();
        anyhow::anyhow!("Unknown flow {:?} (known: {})", id, known.join(", "))
    })
}

fn open_wizard(store: Arc<FileStore>, flow: WizardFlow) -> anyhow::Result<WizardController> {
    let key = flow.storage_key();
    Ok(WizardController::builder(flow)
        .with_config(WizardConfig::persisted(key))
        .with_store(store)
        .build()?)
}

/// Advance as far as the answers allow.
fn replay(wizard: &mut WizardController) -> Option<StepOutcome> {
    loop {
        match wizard.go_next() {
            StepOutcome::Advanced { .. } => continue,
            StepOutcome::Completed | StepOutcome::AlreadyComplete => return None,
            blocked @ StepOutcome::Blocked { .. } => return Some(blocked),
        }
    }
}

fn run_draft(store: FileStore, action: DraftAction) -> anyhow::Result<()> {
    let store = Arc::new(store);
    match action {
        DraftAction::List => {
            for key in store.keys()? {
                match flows::all().into_iter().find(|f| f.storage_key() == key) {
                    Some(flow) => println!("{} ({})", flow.id, key),
                    None => println!("{} (unknown flow)", key),
                }
            }
        }
        DraftAction::Show { flow } => {
            let flow = resolve_flow(&flow)?;
            let drafts = DraftStore::new(store, flow.storage_key(), flow.id.clone());
            match drafts.load() {
                Some(draft) => println!("{}", serde_json::to_string_pretty(&draft)?),
                None => println!("No draft stored for {}", flow.id),
            }
        }
        DraftAction::Status { flow } => {
            let mut wizard = open_wizard(store, resolve_flow(&flow)?)?;
            let blocked = replay(&mut wizard);
            let current = wizard.current_step_index();
            let steps: Vec<_> = wizard.steps().cloned().collect();
            for (i, step) in steps.iter().enumerate() {
                let mark = if wizard.is_complete() || i < current {
                    "done"
                } else if i == current {
                    "current"
                } else {
                    "pending"
                };
                println!("  [{:>7}] {}", mark, step.title);
            }
            if let Some(StepOutcome::Blocked { step_id, issues }) = blocked {
                println!("Blocked at {}:", step_id);
                for issue in issues {
                    println!("  - {}: {}", issue.field, issue.message);
                }
            }
            if wizard.is_complete() {
                println!("Complete");
            } else {
                println!("Progress: {}%", wizard.progress_percent());
            }
        }
        DraftAction::Set {
            flow,
            field,
            value,
            json,
        } => {
            let mut wizard = open_wizard(store, resolve_flow(&flow)?)?;
            let value = AnswerValue::from_input(value, json)
                .with_context(|| format!("Value for {} is not valid JSON", field))?;
            wizard.set_answer(field, value);
            if wizard.is_dirty() {
                anyhow::bail!("Draft for {} could not be saved", wizard.flow_id());
            }
        }
        DraftAction::Payload { flow, as_draft } => {
            let mut wizard = open_wizard(store, resolve_flow(&flow)?)?;
            if let Some(StepOutcome::Blocked { step_id, .. }) = replay(&mut wizard) {
                anyhow::bail!("Draft for {} is incomplete (blocked at {})", flow, step_id);
            }
            let payload = wizard
                .submission_payload()
                .context("Wizard did not reach its summary")?;
            let mut request = CreateProjectRequest::from_answers(wizard.flow_id(), payload)?;
            if as_draft {
                request = request.as_draft();
            }
            println!("{}", serde_json::to_string_pretty(&request)?);
        }
        DraftAction::Clear { flow } => {
            let flow = resolve_flow(&flow)?;
            DraftStore::new(store, flow.storage_key(), flow.id.clone()).clear();
        }
    }
    Ok(())
}
