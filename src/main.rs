// Hide console window on Windows for release builds (GUI app).
#![cfg_attr(all(windows, not(debug_assertions)), windows_subsystem = "windows")]

use std::path::PathBuf;

use bevy::prelude::*;
use clap::Parser;
use colored::Colorize;

use d20roller::dice3d::{build_die, ColorSetting, D20RollerPlugin, RollerSettings};

/// D20 Roller - click, tap or fling the die to roll
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the settings JSON file
    #[arg(short, long, default_value = RollerSettings::DEFAULT_PATH)]
    config: PathBuf,

    /// Seed the roller for a reproducible sequence of rolls
    #[arg(long)]
    seed: Option<u64>,

    /// Highlight color ("#22FF44", "A:1 R:0.1 G:1 B:0.3" or "0.1,1,0.3")
    #[arg(long, value_parser = parse_color_arg)]
    highlight_color: Option<ColorSetting>,
}

fn parse_color_arg(s: &str) -> Result<ColorSetting, String> {
    ColorSetting::parse(s).ok_or_else(|| format!("Invalid color: '{}'", s))
}

fn main() {
    let args = Args::parse();

    let mut settings = match RollerSettings::load(&args.config) {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("{} {}; using defaults", "Warning:".yellow().bold(), err);
            RollerSettings::default()
        }
    };
    if args.seed.is_some() {
        settings.seed = args.seed;
    }
    if let Some(color) = args.highlight_color {
        settings.highlight_color = color;
    }

    let model = match build_die(settings.die_radius, settings.bevel) {
        Ok(model) => model,
        Err(err) => {
            eprintln!("{} {}", "Error:".red().bold(), err);
            std::process::exit(1);
        }
    };

    App::new()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "D20 Roller".to_string(),
                        resolution: (1280u32, 720u32).into(),
                        canvas: Some("#dice-canvas".to_string()),
                        fit_canvas_to_parent: true,
                        prevent_default_event_handling: true,
                        ..default()
                    }),
                    ..default()
                })
                .set(bevy::log::LogPlugin {
                    level: bevy::log::Level::INFO,
                    filter: "info,wgpu=error,d20roller=debug".to_string(),
                    ..default()
                }),
        )
        .insert_resource(ClearColor(settings.background_color.to_color()))
        .add_plugins(D20RollerPlugin::new(settings, model))
        .run();
}
