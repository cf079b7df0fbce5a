//! D20 Roller CLI
//!
//! Runs complete roll sessions through the same controller the viewer uses,
//! without a renderer, and reports the outcomes.

use clap::Parser;
use colored::Colorize;

use d20roller::dice3d::{
    build_die, camera_direction, DVec3, FixedSequence, NullView, RollController, RollOutcome,
    Roller, RollerSettings, FACE_COUNT,
};

/// Chi-square critical value for 19 degrees of freedom at p = 0.05.
const CHI_SQUARE_CRITICAL_19: f64 = 30.144;

/// D20 Roller CLI - headless roll sessions
#[derive(Parser, Debug)]
#[command(name = "d20roll")]
#[command(author, version, about = "D20 Roller CLI - run headless d20 roll sessions")]
struct Cli {
    /// Number of rolls
    #[arg(short, long, default_value_t = 1)]
    rolls: u32,

    /// Seed the roller for a reproducible sequence
    #[arg(short, long)]
    seed: Option<u64>,

    /// Force outcomes instead of rolling (e.g. "20,20,1"); the last repeats
    #[arg(short, long, value_delimiter = ',', value_parser = clap::value_parser!(u8).range(1..=20))]
    force: Option<Vec<u8>>,

    /// Print the per-face distribution and a chi-square statistic
    #[arg(long)]
    histogram: bool,

    /// Camera position as x,y,z
    #[arg(long, value_parser = parse_camera_arg)]
    camera: Option<DVec3>,

    /// Only print the summary
    #[arg(short, long)]
    quiet: bool,
}

fn parse_camera_arg(s: &str) -> Result<DVec3, String> {
    let values = s
        .split(',')
        .map(|part| part.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("Invalid camera position '{}': {}", s, e))?;
    match values[..] {
        [x, y, z] if DVec3::new(x, y, z).length() > 0.0 => Ok(DVec3::new(x, y, z)),
        [_, _, _] => Err("Camera position must not be the origin".to_string()),
        _ => Err(format!("Expected x,y,z but got '{}'", s)),
    }
}

/// Pearson's chi-square statistic against a uniform distribution.
fn chi_square(counts: &[u32]) -> f64 {
    let total: u32 = counts.iter().sum();
    if counts.is_empty() || total == 0 {
        return 0.0;
    }
    let expected = f64::from(total) / counts.len() as f64;
    counts
        .iter()
        .map(|&observed| (f64::from(observed) - expected).powi(2) / expected)
        .sum()
}

fn format_roll(outcome: &RollOutcome) -> String {
    let value = format!("{:>2}", outcome.rolled);
    let value = match outcome.rolled {
        20 => value.bright_green().bold(),
        1 => value.bright_red().bold(),
        _ => value.white().bold(),
    };
    format!("{} {} ({} ticks)", "Rolled".bold(), value, outcome.ticks)
}

fn print_histogram(counts: &[u32]) {
    let total: u32 = counts.iter().sum();
    let max = counts.iter().copied().max().unwrap_or(0).max(1);
    println!("{}", "Distribution:".bold().white());
    for (i, &count) in counts.iter().enumerate() {
        let bar = "#".repeat((count * 40 / max) as usize);
        println!("  {:>2} {:>6} {}", i + 1, count, bar.green());
    }

    let statistic = chi_square(counts);
    let verdict = if statistic < CHI_SQUARE_CRITICAL_19 {
        "consistent with uniform".green()
    } else {
        "not consistent with uniform".red().bold()
    };
    println!(
        "{} {:.2} over {} rolls ({})",
        "Chi-square:".bold().white(),
        statistic,
        total,
        verdict
    );
}

fn main() {
    let cli = Cli::parse();
    let settings = RollerSettings::default();

    let model = match build_die(settings.die_radius, settings.bevel) {
        Ok(model) => model,
        Err(err) => {
            eprintln!("{} {}", "Error:".red().bold(), err);
            std::process::exit(1);
        }
    };

    let camera = cli
        .camera
        .unwrap_or_else(|| camera_direction(settings.camera_position()));

    let mut controller = match (&cli.force, cli.seed) {
        (Some(faces), _) => {
            RollController::new(&model, camera, FixedSequence::new(faces.iter().copied()))
        }
        (None, Some(seed)) => RollController::new(&model, camera, Roller::from_seed(seed)),
        (None, None) => RollController::new(&model, camera, Roller::new()),
    };

    let mut counts = vec![0u32; usize::from(FACE_COUNT)];
    let mut view = NullView;
    for _ in 0..cli.rolls {
        controller.trigger(&mut view);
        let Some(outcome) = controller.run_to_completion(&mut view) else {
            eprintln!("{} roll did not settle", "Error:".red().bold());
            std::process::exit(1);
        };
        counts[usize::from(outcome.rolled - 1)] += 1;

        if !cli.quiet {
            println!("{}", format_roll(&outcome));
            if let Some(error) = controller.face_alignment_error(outcome.rolled) {
                println!("   {} {:.2e} rad", "alignment error:".dimmed(), error);
            }
        }
    }

    if cli.histogram {
        print_histogram(&counts);
    } else if cli.quiet {
        let rolled: Vec<String> = counts
            .iter()
            .enumerate()
            .filter(|(_, c)| **c > 0)
            .map(|(i, c)| format!("{}x{}", i + 1, c))
            .collect();
        println!("{} {}", "Rolled:".bold().white(), rolled.join(" "));
    }
}
