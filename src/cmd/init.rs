//! Init command implementation
//!
//! Handles the `class-slim init` command which creates a configuration file
//! from a preset (conservative, balanced, aggressive).

use anyhow::Result;
use console::style;
use std::path::Path;

use crate::config::{self, ConfigFile, Template};
use crate::error::ClassSlimError;
use crate::fmt::{CHECKMARK, INFO, ROCKET, SPARKLES};

/// Initialize class-slim configuration from a preset
///
/// Creates `.class-slim.toml` in the working directory.
///
/// # Examples
///
/// ```no_run
/// use class_slim::cmd::init::cmd_init;
///
/// // Initialize with the balanced preset
/// cmd_init("balanced", false, false)?;
///
/// // Overwrite with the hydration-safe preset
/// cmd_init("conservative", false, true)?;
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn cmd_init(template: &str, list: bool, force: bool) -> Result<()> {
    if list {
        present_templates(None);
        return Ok(());
    }

    init_in(&super::working_dir()?, template, force)
}

/// Write the preset's configuration into `project_root`
pub fn init_in(project_root: &Path, template: &str, force: bool) -> Result<()> {
    println!(
        "{} {} Initializing class-slim",
        ROCKET,
        style("class-slim init").bold()
    );
    println!();

    if config::ConfigLoader::exists(project_root) && !force {
        return Err(ClassSlimError::ConfigExists {
            path: project_root.join(config::CONFIG_FILE_NAME),
        }
        .into());
    }

    let preset = Template::get(template).ok_or_else(|| ClassSlimError::InvalidTemplate {
        name: template.to_string(),
        available: Template::names().iter().map(|n| n.to_string()).collect(),
    })?;

    println!(
        "{} Selected template: {}",
        SPARKLES,
        style(&preset.name).bold().cyan()
    );
    println!("   {}", style(&preset.description).dim());
    println!();

    let config = preset.to_config();
    present_settings(&config);

    config::ConfigLoader::save(&config, project_root)?;

    println!(
        "{} Created {}",
        CHECKMARK,
        style(config::CONFIG_FILE_NAME).cyan().bold()
    );
    println!();
    println!("{}  Next Steps:", style("💡").bold());
    println!(
        "   1. Add project-specific safelist entries to {}",
        config::CONFIG_FILE_NAME
    );
    println!(
        "   2. Run {} to preview consolidations",
        style("class-slim scan <build-dir>").cyan()
    );
    println!(
        "   3. Run {} after every build",
        style("class-slim optimize <build-dir>").cyan()
    );
    println!();

    present_templates(Some(template));
    Ok(())
}

fn present_settings(config: &ConfigFile) {
    let bullet = style("•").dim();
    println!("{}  Template Configuration:", INFO);
    println!(
        "   {} min-occurrences = {}",
        bullet,
        style(config.thresholds.min_occurrences).green()
    );
    println!(
        "   {} min-tokens = {}",
        bullet,
        style(config.thresholds.min_tokens).green()
    );
    println!(
        "   {} min-savings = {}",
        bullet,
        style(config.thresholds.min_savings).green()
    );
    println!(
        "   {} consistency-safe = {}",
        bullet,
        style(config.safety.consistency_safe).green()
    );
    println!(
        "   {} names = {}{}",
        bullet,
        style(&config.naming.prefix).green(),
        "x".repeat(config.naming.length)
    );
    println!();
}

fn present_templates(selected: Option<&str>) {
    println!("{}  Available Templates:", INFO);
    for name in Template::names() {
        let Some(tmpl) = Template::get(name) else {
            continue;
        };
        let indicator = if Some(name) == selected { "→" } else { " " };
        println!(
            "   {} {} - {}",
            style(indicator).cyan().bold(),
            style(&tmpl.name).bold(),
            style(&tmpl.description).dim()
        );
    }
}
