use bolus_core::*;
use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Exit status for input the calculator refused
const EXIT_INVALID_INPUT: u8 = 2;

#[derive(Parser)]
#[command(name = "bolus")]
#[command(about = "Insulin bolus dose calculator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Read configuration from this file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate a dose from the given readings and stored ratios
    Calc {
        /// Current blood glucose (mg/dL)
        #[arg(long)]
        current_bg: String,

        /// Target blood glucose (mg/dL)
        #[arg(long)]
        target_bg: String,

        /// Carbohydrates to consume (grams); blank means none
        #[arg(long, default_value = "")]
        carbs: String,

        /// Print the dose breakdown as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show or change the stored ICR and ISF
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

#[derive(Subcommand)]
enum SettingsAction {
    /// Show the stored ratios
    Show,

    /// Store new ratios
    Set {
        /// Insulin to carb ratio (grams per unit)
        #[arg(long)]
        icr: String,

        /// Insulin sensitivity factor (mg/dL per unit)
        #[arg(long)]
        isf: String,
    },
}

fn main() -> ExitCode {
    bolus_core::logging::init_with_level("warn");

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(Error::Validation(e)) => {
            eprintln!("{}: {}", e.title(), e);
            ExitCode::from(EXIT_INVALID_INPUT)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match cli.config {
        Some(ref path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    let settings_path = RatioSettings::path_in(&data_dir);
    tracing::debug!("Using settings file {:?}", settings_path);

    match cli.command {
        Some(Commands::Calc {
            current_bg,
            target_bg,
            carbs,
            json,
        }) => {
            let form = DoseForm::new(current_bg, target_bg, carbs);
            cmd_calc(&settings_path, &form, json, &config)
        }
        Some(Commands::Settings { action }) => match action {
            SettingsAction::Show => cmd_settings_show(&settings_path),
            SettingsAction::Set { icr, isf } => cmd_settings_set(&settings_path, &icr, &isf),
        },
        None => cmd_interactive(&settings_path, &config),
    }
}

fn cmd_calc(settings_path: &Path, form: &DoseForm, json: bool, config: &Config) -> Result<()> {
    let settings = RatioSettings::load(settings_path)?;
    let result = form.calculate(&settings)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        display_result(&result, &settings, config.display.precision());
    }

    Ok(())
}

fn cmd_settings_show(settings_path: &Path) -> Result<()> {
    let settings = RatioSettings::load(settings_path)?;

    match settings.summary() {
        Some(summary) => {
            println!("{}", summary);
            if let Some(updated_at) = settings.updated_at() {
                println!("Last updated: {}", updated_at.to_rfc3339());
            }
        }
        None => println!(
            "Ratios not configured. Run `bolus settings set --icr <g/unit> --isf <mg/dL/unit>`."
        ),
    }

    Ok(())
}

fn cmd_settings_set(settings_path: &Path, icr: &str, isf: &str) -> Result<()> {
    let mut settings = RatioSettings::load(settings_path)?;
    settings.update(icr, isf)?;
    settings.save(settings_path)?;

    println!("✓ Settings Saved");
    println!("  Your ICR and ISF values have been updated.");
    if let Some(summary) = settings.summary() {
        println!("  {}", summary);
    }

    Ok(())
}

fn cmd_interactive(settings_path: &Path, config: &Config) -> Result<()> {
    let stdin = io::stdin();
    let mut input = stdin.lock();

    println!("Insulin Dose Calculator");
    println!("Calculate your insulin dose based on your current readings and ratios");
    println!();

    let mut settings = RatioSettings::load(settings_path)?;
    if !settings.is_configured() {
        println!("Calculator Settings");
        let icr = prompt(&mut input, "Insulin to Carb Ratio (ICR) [1:x grams]: ")?;
        let isf = prompt(&mut input, "Insulin Sensitivity Factor (ISF) [mg/dL per unit]: ")?;
        settings.update(&icr, &isf)?;
        settings.save(settings_path)?;
        println!("✓ Settings Saved");
        println!();
    }

    let current_bg = prompt(&mut input, "Current Blood Glucose (mg/dL): ")?;
    let target_bg = prompt(&mut input, "Target Blood Glucose (mg/dL): ")?;
    let carbs = prompt(&mut input, "Carbohydrates to Consume (grams): ")?;

    let result = DoseForm::new(current_bg, target_bg, carbs).calculate(&settings)?;
    display_result(&result, &settings, config.display.precision());

    Ok(())
}

fn prompt(input: &mut impl BufRead, label: &str) -> Result<String> {
    print!("{}", label);
    io::stdout().flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn display_result(result: &DoseResult, settings: &RatioSettings, precision: usize) {
    println!("\n╭─────────────────────────────────────────╮");
    println!("│  INSULIN DOSE");
    println!("╰─────────────────────────────────────────╯");
    if let Some(summary) = settings.summary() {
        println!("  {}", summary);
    }
    println!();
    println!("  Meal Dose:        {}", format_units(result.meal_dose, precision));
    println!("  Correction Dose:  {}", format_units(result.correction_dose, precision));
    println!("  Total Dose:       {}", format_units(result.total_dose, precision));
    println!();

    if result.below_target() {
        println!("  ℹ Current glucose is below target.");
    }
    println!("  Please verify these calculations with your healthcare provider.");
    println!();
}
