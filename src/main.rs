// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Focus point editor
//!
//! A desktop host for the focus point editor: mark rectangular focus
//! areas on an image and store them as a JSON form value.

use anyhow::Result;
use clap::Parser;
use focuspoints::app::FocuspointApp;
use focuspoints::io::serialization;
use focuspoints::models::config::WizardConfig;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "focuspoints", version, about = "Mark focus areas on an image")]
struct Cli {
    /// Image to edit
    #[arg(long)]
    image: Option<PathBuf>,
    /// Editor configuration (YAML or JSON)
    #[arg(long)]
    config: Option<PathBuf>,
    /// File holding the stored focus point value (JSON)
    #[arg(long)]
    value: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let cli = Cli::parse();

    let config = match cli.config {
        Some(ref path) => serialization::load_config(path)?,
        None => WizardConfig::default(),
    };
    let value = match cli.value {
        Some(ref path) => serialization::import_value(path)?,
        None => String::new(),
    };

    // Configure egui options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("Focus point editor"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "focuspoints",
        options,
        Box::new(move |_cc| Ok(Box::new(FocuspointApp::new(config, cli.image, value)))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
