use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Args, Parser, Subcommand};

use budget_forge_lib::config::AppConfig;
use budget_forge_lib::presets::{find_preset, DEFAULT_PRESET_ID, PLANNER_PRESETS};
use budget_forge_lib::{logging, PlannerSummary, StatePatch, StateStore, WizardForm};

#[derive(Debug, Parser)]
#[command(name = "budget-forge", about = "Household budget planner", version)]
struct Cli {
    /// Directory holding the saved budget state (overrides BUDGET_FORGE_DATA_DIR).
    #[arg(long, value_name = "PATH", global = true)]
    data_dir: Option<PathBuf>,

    /// Skip writing log files under the data directory.
    #[arg(long, global = true)]
    no_log_file: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the saved state as JSON.
    Show,
    /// Print the planner summary and tips.
    Summary {
        /// Emit the summary as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Merge a partial JSON object into the saved state.
    Update {
        /// e.g. '{"incomeAmount": 2500}'
        patch: String,
    },
    /// List the quick-start presets.
    Presets,
    /// Apply a quick-start preset.
    Preset { id: String },
    /// Submit the onboarding wizard.
    Wizard(WizardArgs),
    /// Restore the default state.
    Reset,
    /// Export the state as JSON to stdout or a file.
    Export {
        /// File or directory to write to; a directory gets a timestamped file name.
        #[arg(long, value_name = "PATH")]
        out: Option<PathBuf>,
    },
    /// Replace the state with a previously exported file.
    Import { path: PathBuf },
}

#[derive(Debug, Args)]
struct WizardArgs {
    /// Start from a preset's answers.
    #[arg(long)]
    preset: Option<String>,
    #[arg(long)]
    household_name: Option<String>,
    #[arg(long)]
    budget_name: Option<String>,
    #[arg(long)]
    budget_style: Option<String>,
    #[arg(long)]
    budget_month: Option<String>,
    #[arg(long)]
    income_frequency: Option<String>,
    #[arg(long, allow_negative_numbers = true)]
    income_amount: Option<f64>,
    #[arg(long)]
    home_status: Option<String>,
    #[arg(long)]
    relationship_status: Option<String>,
    #[arg(long)]
    has_kids: Option<String>,
    #[arg(long)]
    work_status: Option<String>,
    #[arg(long)]
    age_range: Option<String>,
    #[arg(long)]
    primary_goal: Option<String>,
}

impl WizardArgs {
    fn into_form(self) -> Result<WizardForm> {
        let mut form = match self.preset.as_deref() {
            Some(id) => find_preset(id)?.form(),
            None => WizardForm::default(),
        };
        macro_rules! overlay {
            ($args:ident, $form:ident; $( $field:ident ),+ $(,)?) => {
                $( if let Some(value) = $args.$field { $form.$field = value; } )+
            };
        }
        let args = self;
        overlay!(args, form;
            household_name,
            budget_name,
            budget_style,
            budget_month,
            income_frequency,
            income_amount,
            home_status,
            relationship_status,
            has_kids,
            work_status,
            age_range,
            primary_goal,
        );
        Ok(form)
    }
}

fn main() {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => process::exit(code),
        Err(err) => {
            eprintln!("Error: {err:#}");
            process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<i32> {
    let mut config = AppConfig::resolve(cli.data_dir).context("resolve configuration")?;
    config.file_logging = !cli.no_log_file;
    if let Err(err) = logging::init(&config) {
        eprintln!("Warning: logging disabled: {err:#}");
    }
    tracing::debug!(target: "budget_forge", event = "cli_start", data_dir = %config.data_dir.display());

    let store = StateStore::new(config.storage());
    handle_command(&store, cli.command)
}

fn handle_command(store: &StateStore, command: Commands) -> Result<i32> {
    match command {
        Commands::Show => {
            println!("{}", store.export_state()?);
        }
        Commands::Summary { json } => {
            let summary = store.summary();
            if json {
                let payload =
                    serde_json::to_string_pretty(&summary).context("serialize summary")?;
                println!("{payload}");
            } else {
                print_summary(&summary);
            }
        }
        Commands::Update { patch } => {
            let patch: StatePatch =
                serde_json::from_str(&patch).context("parse update as a JSON object")?;
            patch.validate()?;
            store.update_state(patch)?;
            println!("State updated.");
        }
        Commands::Presets => {
            for preset in PLANNER_PRESETS {
                let marker = if preset.id == DEFAULT_PRESET_ID {
                    " (default)"
                } else {
                    ""
                };
                println!("{:<34} {}{marker}", preset.id, preset.label);
            }
        }
        Commands::Preset { id } => {
            let state = store.apply_preset(&id)?;
            println!("Applied preset {id} to {}.", state.household_name);
        }
        Commands::Wizard(args) => {
            let state = store.complete_wizard(args.into_form()?)?;
            println!("Welcome, {}! Your budget is ready.", state.household_name);
        }
        Commands::Reset => {
            store.reset()?;
            println!("State reset to defaults.");
        }
        Commands::Export { out } => {
            let payload = store.export_state()?;
            match out {
                Some(target) => {
                    let path = export_path(&target);
                    std::fs::write(&path, payload)
                        .with_context(|| format!("write export to {}", path.display()))?;
                    println!("Exported to {}", path.display());
                }
                None => println!("{payload}"),
            }
        }
        Commands::Import { path } => {
            let payload = std::fs::read_to_string(&path)
                .with_context(|| format!("read import file {}", path.display()))?;
            let state = store.import_state(&payload)?;
            println!("Imported budget for {}.", display_name(&state.household_name));
        }
    }
    Ok(0)
}

fn export_path(target: &Path) -> PathBuf {
    if target.is_dir() {
        let stamp = Local::now().format("%Y%m%d-%H%M%S");
        target.join(format!("budget-export-{stamp}.json"))
    } else {
        target.to_path_buf()
    }
}

fn display_name(name: &str) -> &str {
    if name.is_empty() {
        "an unnamed household"
    } else {
        name
    }
}

fn print_summary(summary: &PlannerSummary) {
    println!("Household    : {}", display_name(&summary.household_name));
    println!("Budget       : {}", summary.budget_name);
    println!("Style        : {}", summary.budget_style);
    println!("Month        : {}", summary.budget_month);
    println!(
        "Income       : {:.2} {}",
        summary.income_amount, summary.income_frequency
    );
    println!("Monthly est. : {:.2}", summary.monthly_income);

    if !summary.profile.is_empty() {
        println!("\nProfile:");
        for line in &summary.profile {
            println!("  {line}");
        }
    }

    if summary.tips.is_empty() {
        println!("\nTips: none yet, finish the wizard to get suggestions.");
    } else {
        println!("\nTips:");
        for (idx, tip) in summary.tips.iter().enumerate() {
            println!("  {}. {tip}", idx + 1);
        }
    }
}
