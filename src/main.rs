use std::path::PathBuf;

use clap::{Parser, Subcommand};
use polydice::prelude::*;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Config JSON file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Randomization technique, overriding the config
    #[arg(short, long)]
    technique: Option<Technique>,

    /// Random seed for reproducibility
    #[arg(long, default_value = None)]
    seed: Option<u64>,

    /// Print results as JSON
    #[arg(long, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Call a roll identifier, e.g. `total_4d6_highest3` or `roll_d20_with_advantage_p5`
    Call {
        identifier: String,

        /// Bonus added to the total; must agree with any modifier in the identifier
        #[arg(short, long, allow_hyphen_values = true)]
        bonus: Option<String>,

        /// Damage type recorded on every die
        #[arg(long)]
        damage_type: Option<String>,

        /// Number of times to call the identifier
        #[arg(short = 'n', long, default_value_t = 1)]
        repeat: usize,
    },
    /// Roll an array of ability scores
    Abilities {
        #[arg(long)]
        size: Option<u32>,

        #[arg(long)]
        sides: Option<u32>,

        #[arg(long)]
        rolled: Option<u32>,

        #[arg(long)]
        kept: Option<u32>,
    },
    /// Print the effective config, or write it to a file
    Config {
        #[arg(long, value_name = "FILE")]
        save: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    env_logger::builder()
        .format_timestamp_secs()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
    log::debug!("Starting with args: {:?}", args);

    let mut config = match &args.config {
        Some(path) => {
            log::info!("Loading config from {}", path.display());
            Config::load(path)?
        }
        None => Config::default(),
    };
    if let Some(technique) = args.technique {
        config.set_technique(technique);
    }

    let mut roller = match args.seed {
        Some(seed) => Roller::from_seed(seed),
        None => Roller::new(),
    };
    roller.apply_config(&config);

    match args.command {
        Command::Call {
            identifier,
            bonus,
            damage_type,
            repeat,
        } => {
            let mut options = DiceOptions::from_config(&config);
            if let Some(bonus) = bonus {
                options = options.try_bonus(bonus.as_str())?;
            }
            if let Some(damage_type) = damage_type {
                options = options.damage_type(damage_type);
            }

            let mut resolver = Resolver::new();
            let outcomes = (0..repeat)
                .map(|_| resolver.call(&identifier, &options, &mut roller))
                .collect::<Result<Vec<_>, _>>()?;

            if args.json {
                println!("{}", serde_json::to_string_pretty(&outcomes)?);
            } else {
                for outcome in &outcomes {
                    let mut buf = String::new();
                    outcome.pretty_print(&mut buf)?;
                    println!("{buf}");
                }
            }
        }
        Command::Abilities {
            size,
            sides,
            rolled,
            kept,
        } => {
            let request = AbilityScoreRequest {
                array_size: size,
                sides,
                dice_rolled: rolled,
                dice_kept: kept,
            };
            let scores = AbilityScoreGenerator::new(&config).generate(
                request,
                &DiceOptions::from_config(&config),
                &mut roller,
            )?;

            if args.json {
                println!("{}", serde_json::to_string_pretty(&scores)?);
            } else {
                for score in &scores {
                    let mut buf = String::new();
                    score.pretty_print(&mut buf)?;
                    println!("{buf}");
                }
                println!("Totals: {:?}", harvest_totals(&scores));
            }
        }
        Command::Config { save } => match save {
            Some(path) => {
                config.save(&path)?;
                log::info!("Config written to {}", path.display());
            }
            None => println!("{}", serde_json::to_string_pretty(&config)?),
        },
    }

    Ok(())
}
