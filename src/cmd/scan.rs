//! Scan command implementation
//!
//! Runs the analysis stages only and prints the ranked consolidations.
//! Nothing under the target directory is written.

use anyhow::Result;
use console::style;

use super::{spinner, RunOptions};
use crate::error::ClassSlimError;
use crate::fmt::{format_bytes, truncate_classes, INFO, MICROSCOPE, WARNING};
use crate::pipeline::{Analysis, ConsolidationPipeline};

/// Print what `optimize` would consolidate
pub fn cmd_scan(options: &RunOptions, limit: usize) -> Result<()> {
    let config = options.pipeline_config(true)?;
    let pipeline = ConsolidationPipeline::new(config);

    let bar = spinner(options.json, "Scanning build output...");
    let analysis = pipeline.analyze().map_err(ClassSlimError::from);
    bar.finish_and_clear();
    let analysis = analysis?;

    if options.json {
        let report = serde_json::json!({
            "files_scanned": analysis.scan.files_scanned(),
            "unique_patterns": analysis.unique_patterns(),
            "values_seen": analysis.scan.values_seen,
            "values_dynamic": analysis.scan.values_dynamic,
            "values_rejected": analysis.scan.values_rejected,
            "dynamic_bases": analysis.scan.dynamic_bases.len(),
            "mappings": analysis.mappings.iter().take(limit).collect::<Vec<_>>(),
            "css": analysis.css,
            "warnings": analysis.warnings.iter().chain(&analysis.scan.errors).collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    present(&analysis, limit);
    Ok(())
}

fn present(analysis: &Analysis, limit: usize) {
    let scan = &analysis.scan;
    println!(
        "{} Scanned {} files: {} class values, {} token groups",
        MICROSCOPE,
        style(scan.files_scanned()).bold(),
        scan.values_seen,
        analysis.unique_patterns()
    );
    println!(
        "   Skipped values: {} dynamic, {} icon/malformed",
        scan.values_dynamic, scan.values_rejected
    );
    println!(
        "   Skipped groups: {} compound-selector, {} gated, {} unstyled",
        analysis.structural_skipped, analysis.gated_skipped, analysis.unstyled_skipped
    );
    println!("   Dynamic bases: {}", scan.dynamic_bases.len());
    println!();

    if analysis.mappings.is_empty() {
        println!("{}  Nothing worth consolidating", INFO);
    } else {
        println!(
            "{}  {} candidate(s), highest savings first:",
            INFO,
            analysis.mappings.len()
        );
        for mapping in analysis.mappings.iter().take(limit) {
            let mut tokens = mapping.tokens.join(" ");
            if !mapping.preserved.is_empty() {
                tokens.push_str(&format!(" [+{}]", mapping.preserved.join(" ")));
            }
            println!(
                "   {} {:>8} {:>4}×  {}",
                style(&mapping.name).green().bold(),
                format_bytes(mapping.savings as u64),
                mapping.count,
                truncate_classes(&tokens, 70)
            );
        }
        if analysis.mappings.len() > limit {
            println!(
                "   {}",
                style(format!("... {} more", analysis.mappings.len() - limit)).dim()
            );
        }
    }

    let warnings: Vec<&String> = analysis.warnings.iter().chain(&scan.errors).collect();
    if !warnings.is_empty() {
        println!();
        println!("{} {} warning(s):", WARNING, warnings.len());
        for warning in warnings {
            println!("   {} {}", style("•").dim(), style(warning).yellow());
        }
    }
}
