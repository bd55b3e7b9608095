//! Optimize command implementation
//!
//! Thin presentation layer over `pipeline::ConsolidationPipeline`.

use anyhow::Result;
use console::style;

use super::{spinner, RunOptions};
use crate::css::InjectionOutcome;
use crate::error::ClassSlimError;
use crate::fmt::{
    format_bytes, format_signed_bytes, truncate_classes, CHART, CHECKMARK, INFO, ROCKET, WARNING,
};
use crate::pipeline::{ConsolidationPipeline, RunOutcome};

/// Consolidate repeated class groups in a build directory
///
/// # Examples
///
/// ```no_run
/// use class_slim::cmd::{cmd_optimize, RunOptions};
///
/// let options = RunOptions {
///     target_dir: "dist".into(),
///     ..Default::default()
/// };
/// cmd_optimize(&options, true)?;
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn cmd_optimize(options: &RunOptions, dry_run: bool) -> Result<()> {
    let config = options.pipeline_config(dry_run)?;

    if !options.json {
        println!(
            "{} {} {}",
            ROCKET,
            style("class-slim").bold(),
            style(config.target_dir.display()).cyan()
        );
        if dry_run {
            println!("   {}", style("[DRY RUN] nothing will be written").yellow());
        }
        println!();
    }

    let pipeline = ConsolidationPipeline::new(config);
    let bar = spinner(options.json, "Scanning build output...");
    let analysis = pipeline.analyze().map_err(ClassSlimError::from);
    let analysis = match analysis {
        Ok(analysis) => analysis,
        Err(e) => {
            bar.finish_and_clear();
            return Err(e.into());
        }
    };

    bar.set_message("Rewriting artifacts...");
    let outcome = pipeline.apply(analysis).map_err(ClassSlimError::from);
    bar.finish_and_clear();
    let outcome = outcome?;

    if options.json {
        present_json(&outcome, dry_run)?;
    } else {
        present_summary(&outcome, dry_run);
    }
    Ok(())
}

fn present_summary(outcome: &RunOutcome, dry_run: bool) {
    let metrics = &outcome.metrics;

    if outcome.mappings.is_empty() {
        println!("{}  No repeated class groups worth consolidating", INFO);
    } else {
        println!("{} Top consolidations:", CHART);
        for top in &metrics.top {
            println!(
                "   {} {} ← {} ({}×, ~{})",
                style("•").dim(),
                style(&top.name).green().bold(),
                truncate_classes(&top.tokens, 60),
                top.count,
                format_bytes(top.savings as u64)
            );
        }
    }
    println!();

    let verb = if dry_run { "Would modify" } else { "Modified" };
    println!(
        "{} {} {} of {} files",
        CHECKMARK,
        verb,
        style(metrics.files_modified).bold(),
        metrics.files_scanned
    );
    println!(
        "   Patterns: {} found, {} consolidated",
        metrics.unique_patterns, metrics.patterns_consolidated
    );
    println!(
        "   Markup saved: {}",
        style(format_signed_bytes(metrics.bytes_saved)).green()
    );
    println!(
        "   CSS added: {}",
        format_bytes(metrics.css_overhead as u64)
    );
    println!(
        "   Net: {} ({:.0}% of markup savings kept)",
        style(format_signed_bytes(metrics.net_savings))
            .green()
            .bold(),
        metrics.efficiency_percent()
    );

    match &outcome.injection {
        InjectionOutcome::Injected { path, .. } | InjectionOutcome::DryRun { path, .. } => {
            println!("   Stylesheet: {}", style(path.display()).cyan());
        }
        InjectionOutcome::AlreadyPresent { path } => {
            println!(
                "   Stylesheet: {} (already consolidated)",
                style(path.display()).yellow()
            );
        }
        InjectionOutcome::NothingToInject => {}
    }
    if let Some(manifest) = &outcome.manifest_path {
        println!("   Manifest: {}", style(manifest.display()).cyan());
    }
    if outcome.rewrite.gated > 0 {
        println!(
            "   {} values kept by the dynamic-base guard",
            outcome.rewrite.gated
        );
    }

    if !outcome.warnings.is_empty() {
        println!();
        println!("{} {} warning(s):", WARNING, outcome.warnings.len());
        for warning in &outcome.warnings {
            println!("   {} {}", style("•").dim(), style(warning).yellow());
        }
    }
}

fn present_json(outcome: &RunOutcome, dry_run: bool) -> Result<()> {
    let report = serde_json::json!({
        "dry_run": dry_run,
        "metrics": outcome.metrics,
        "mappings": outcome.mappings,
        "manifest": outcome.manifest_path,
        "warnings": outcome.warnings,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
