//! Engagement Demo CLI

use clap::{Parser, Subcommand};
use demo_core::decision::{Question, QUESTIONS};
use demo_core::{
    CoreResult, DecisionSession, Outcome, TariffCatalog, TariffQuery, TariffQueryResult, Transition,
};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "demo")]
#[command(about = "Tariff lookup and POC motion decision tree")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up tariffs by id
    Tariffs {
        /// Tariff ids (repeatable, each may be comma-separated)
        #[arg(short, long)]
        ids: Vec<String>,

        /// JSON file with the tariff catalog (defaults to the built-in tariffs)
        #[arg(short, long)]
        catalog: Option<PathBuf>,

        /// Print the lookup response as JSON
        #[arg(long)]
        json: bool,
    },

    /// Replay answers through the decision tree
    Decide {
        /// Answers in step order (e.g. yes yes complex no exec)
        answers: Vec<String>,

        /// Print the session as JSON
        #[arg(long)]
        json: bool,
    },

    /// Walk through the decision tree interactively
    Wizard,

    /// Export the result of a completed answer sequence
    Export {
        /// Answers in step order
        answers: Vec<String>,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the decision tree questions
    Questions,

    /// List the possible outcomes
    Outcomes,
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set subscriber: {}", e);
    }

    let result = match cli.command {
        Commands::Tariffs { ids, catalog, json } => cmd_tariffs(ids, catalog, json),
        Commands::Decide { answers, json } => cmd_decide(answers, json),
        Commands::Wizard => cmd_wizard(),
        Commands::Export { answers, output } => cmd_export(answers, output),
        Commands::Questions => {
            cmd_questions();
            Ok(())
        }
        Commands::Outcomes => {
            cmd_outcomes();
            Ok(())
        }
    };

    if let Err(e) = result {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn cmd_tariffs(ids: Vec<String>, catalog_path: Option<PathBuf>, json: bool) -> CoreResult<()> {
    let catalog = match catalog_path {
        Some(path) => TariffCatalog::from_file(&path)?,
        None => TariffCatalog::default(),
    };

    let query = TariffQuery::parse(&ids);
    let result = query.resolve(&catalog);
    info!(
        "Lookup of {} ids: {} matched",
        query.ids().len(),
        result.tariffs.len()
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_tariffs(&result);
    }

    Ok(())
}

fn print_tariffs(result: &TariffQueryResult) {
    println!("\nTariffs\n{}", "=".repeat(50));

    if result.tariffs.is_empty() {
        println!("No matching tariffs");
    }

    for tariff in &result.tariffs {
        println!("\n{} ({})", tariff.name, tariff.tariff_id);
        println!("  Daily charge:   {:.2}", tariff.daily_charge);
        println!("  Monthly charge: {:.2}", tariff.monthly_charge);
    }

    if !result.missing_ids.is_empty() {
        println!("\nMissing ids: {}", result.missing_ids.join(", "));
    }
}

fn cmd_decide(answers: Vec<String>, json: bool) -> CoreResult<()> {
    let (session, outcome) = DecisionSession::replay(&answers)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&session)?);
        return Ok(());
    }

    match outcome {
        Some(outcome) => print_outcome(outcome),
        None => {
            println!("{}", session.progress().label);
            if let Some(question) = session.current_question() {
                print_question(question);
            }
        }
    }

    Ok(())
}

fn cmd_export(answers: Vec<String>, output: Option<PathBuf>) -> CoreResult<()> {
    let (session, _) = DecisionSession::replay(&answers)?;
    let export = session.export()?;
    let json = export.to_json()?;

    match output {
        Some(path) => {
            std::fs::write(&path, json)?;
            info!("Export written to: {}", path.display());
            println!("Wrote {}", path.display());
        }
        None => println!("{}", json),
    }

    Ok(())
}

fn cmd_wizard() -> CoreResult<()> {
    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();
    let mut session = DecisionSession::start();

    println!("\nPOC Motion Decision Tree\n{}", "=".repeat(50));
    println!("Answer with an option value or number. Commands: back, restart, quit");

    loop {
        let Some(question) = session.current_question() else {
            break;
        };

        println!("\n{}", session.progress().label);
        print_question(question);
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next() else {
            println!();
            return Ok(());
        };
        let input = line?.trim().to_lowercase();

        match input.as_str() {
            "" => continue,
            "quit" | "exit" => return Ok(()),
            "back" => {
                session.step_back();
                continue;
            }
            "restart" => {
                session.restart();
                continue;
            }
            _ => {}
        }

        let token = resolve_option(question, &input);
        match session.submit_answer(&token) {
            Ok(Transition::Continue { .. }) => {}
            Ok(Transition::Outcome { outcome }) => {
                info!("Decision tree result: {}", outcome);
            }
            Err(e) => println!("{}", e),
        }
    }

    if let Some(outcome) = session.outcome() {
        print_outcome(outcome);
    }

    Ok(())
}

/// Map a 1-based option number to its value; anything else passes through
fn resolve_option(question: &Question, input: &str) -> String {
    input
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| question.options.get(i))
        .map(|option| option.value.token().to_string())
        .unwrap_or_else(|| input.to_string())
}

fn cmd_questions() {
    println!("\nDecision Tree Questions\n{}", "=".repeat(50));
    for question in &QUESTIONS {
        print_question(question);
    }
}

fn cmd_outcomes() {
    println!("\nPOC Motions\n{}", "=".repeat(50));
    for outcome in Outcome::ALL {
        println!("\n{}: {}", outcome.tag(), outcome.motion());
        println!("  {}", outcome.description());
    }
}

fn print_question(question: &Question) {
    println!("\n[{}] {}", question.step, question.title);
    if let Some(subtitle) = question.subtitle {
        println!("    {}", subtitle);
    }

    for (i, option) in question.options.iter().enumerate() {
        println!("  {}. {} ({})", i + 1, option.text, option.value);
        if let Some(description) = option.description {
            println!("       {}", description);
        }
    }
}

fn print_outcome(outcome: Outcome) {
    println!("\nRecommended motion\n{}", "=".repeat(50));
    println!("{}", outcome.motion());
    println!("{}", outcome.description());
    println!("(result: {})", outcome.tag());
}
