mod report;
mod scenario;

use clap::{Parser, Subcommand};
use kickoff_model::ConstraintFamily;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "kickoff")]
#[command(about = "Round-robin league schedule optimizer", long_about = None)]
struct Cli {
    /// Log filter (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build and solve the schedule model for a scenario
    Solve {
        /// The scenario JSON file
        file: PathBuf,
        /// Wall-clock budget for the solver, in seconds
        #[arg(short, long)]
        time_limit: Option<f64>,
        /// Override the number of weeks
        #[arg(short, long)]
        weeks: Option<usize>,
        /// Output format (pretty, json)
        #[arg(short, long, default_value = "pretty")]
        format: String,
        /// Write the output to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a scenario and show the model dimensions
    Check {
        /// The scenario JSON file
        file: PathBuf,
    },
    /// Show rank scores and their per-season breakdown
    Ranks {
        /// The scenario JSON file
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&cli.log_level))
        .format_timestamp(None)
        .init();

    let scenario_path = match &cli.command {
        Commands::Solve { file, .. } | Commands::Check { file } | Commands::Ranks { file } => file.clone(),
    };
    let mut scenario = match scenario::load_scenario(&scenario_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error loading scenario: {:#}", e);
            std::process::exit(1);
        }
    };

    match cli.command {
        Commands::Solve {
            time_limit,
            weeks,
            format,
            output,
            ..
        } => {
            if time_limit.is_some() {
                scenario.config.time_limit_secs = time_limit;
            }
            if weeks.is_some() {
                scenario.config.weeks = weeks;
            }

            let solver = scenario.config.solver();
            let plan = match kickoff_model::plan(&scenario.input, &scenario.config, &solver) {
                Ok(p) => p,
                Err(e) => {
                    eprintln!("Model error: {}", e);
                    std::process::exit(1);
                }
            };

            let rendered = if format == "json" {
                let report = report::ScheduleReport::new(&scenario.input.roster, &plan, &scenario.config);
                match serde_json::to_string_pretty(&report) {
                    Ok(s) => s,
                    Err(e) => {
                        eprintln!("Error serializing schedule: {}", e);
                        std::process::exit(1);
                    }
                }
            } else {
                report::render_pretty(&scenario.input.roster, &plan, &scenario.config)
            };

            match output {
                Some(path) => {
                    if let Err(e) = std::fs::write(&path, rendered) {
                        eprintln!("Error writing {}: {}", path.display(), e);
                        std::process::exit(1);
                    }
                }
                None => println!("{}", rendered),
            }

            if !plan.outcome.is_solved() {
                std::process::exit(1);
            }
        }
        Commands::Check { .. } => {
            let (params, model) = match kickoff_model::prepare(&scenario.input, &scenario.config) {
                Ok(prepared) => prepared,
                Err(e) => {
                    eprintln!("✗ {} has errors:", scenario_path.display());
                    eprintln!("  {}", e);
                    std::process::exit(1);
                }
            };

            println!("✓ {} is valid", scenario_path.display());
            println!("  {} teams", params.teams());
            println!("  {} weeks", params.weeks());
            println!("  {} conflict pairs", params.conflict_pairs().len());
            println!("  {} variables", model.variables.len());
            println!("  {} constraints", model.constraints.len());
            let counts = model.family_counts();
            for family in ConstraintFamily::ALL {
                match counts.get(&family) {
                    Some(n) => println!("    {:24} {}", family.label(), n),
                    None => println!("    {:24} off", family.label()),
                }
            }
        }
        Commands::Ranks { .. } => {
            let roster = &scenario.input.roster;
            if scenario.seasons.is_empty() {
                println!("No seasons listed.");
            } else {
                let labels: Vec<&str> = scenario.seasons.iter().rev().take(3).map(|s| s.label.as_str()).collect();
                println!("Seasons (most recent first): {}", labels.join(", "));
            }
            println!();
            println!("{:24} {:>6} {:>6} {:>6} {:>6}", "Team", "rank", "t-0", "t-1", "t-2");
            for b in kickoff_model::rank_breakdown(roster, &scenario.seasons) {
                let name = roster.name(b.team).unwrap_or("?");
                let rank = scenario.input.ranks.get(&b.team).copied().unwrap_or(b.score);
                println!(
                    "{:24} {:>6} {:>6} {:>6} {:>6}",
                    name, rank, b.season_points[0], b.season_points[1], b.season_points[2]
                );
            }
        }
    }
}
