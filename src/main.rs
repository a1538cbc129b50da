// improvement-report - turns research results into code improvement reports
//
// This is the main entry point. Parses CLI args and dispatches to handlers.

mod cli;

use anyhow::{bail, Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use improvement_report_lib::{
    core::{ReportRecorder, Retriever, Searcher},
    intelligence::{ImprovementDetector, ResearchResults},
    logging,
    report::{self, ImprovementReport},
    Config, Database, ReportError,
};
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            if let Some(cause) = err.chain().find_map(|e| e.downcast_ref::<ReportError>()) {
                eprintln!("{}", cause.user_message());
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.home.clone()).context("loading configuration")?;
    let json = cli.json;

    match cli.command {
        Commands::Detect {
            input,
            output,
            save,
        } => handle_detect(&config, &input, output.as_deref(), save, json).await,
        Commands::Validate { file } => handle_validate(&file, json),
        Commands::Show { file } => handle_show(&file, json),
        Commands::Import { file } => handle_import(&config, &file, json).await,
        Commands::Recent { limit } => handle_recent(&config, limit, json).await,
        Commands::Search {
            query,
            limit,
            exact,
        } => handle_search(&config, &query.join(" "), limit, exact, json).await,
        Commands::Export { id, output } => {
            handle_export(&config, id, output.as_deref(), json).await
        }
        Commands::Delete { id } => handle_delete(&config, id, json).await,
        Commands::Status => handle_status(&config, json).await,
    }
}

async fn handle_detect(
    config: &Config,
    input: &Path,
    output: Option<&Path>,
    save: bool,
    json: bool,
) -> Result<()> {
    let results = ResearchResults::from_path(input)
        .with_context(|| format!("reading research results from {}", input.display()))?;

    let detector = ImprovementDetector::new(config.thresholds);
    let report = detector.detect_report(&results);
    let markdown = report.to_markdown();

    if let Some(path) = output {
        std::fs::write(path, &markdown)
            .with_context(|| format!("writing report to {}", path.display()))?;
    }

    let saved_id = if save {
        let db = Arc::new(get_database(config).await?);
        let source = input.display().to_string();
        Some(ReportRecorder::new(db).record(&report, Some(&source)).await?)
    } else {
        None
    };

    if json {
        print_json(&serde_json::json!({ "id": saved_id, "report": report }))?;
        return Ok(());
    }

    match output {
        Some(path) => {
            println!(
                "✓ Wrote {} improvement(s) to {}",
                report.len(),
                path.display()
            );
            if let Some(id) = saved_id {
                println!("✓ Stored as report #{}", id);
            }
        }
        None => {
            // Keep stdout a clean Markdown document
            print!("{}", markdown);
            if let Some(id) = saved_id {
                eprintln!("Stored as report #{}", id);
            }
        }
    }

    Ok(())
}

fn handle_validate(file: &Path, json: bool) -> Result<()> {
    let content = read_report(file)?;
    let document = report::parse(&content);
    let validation = report::validate(&document);

    if json {
        print_json(&serde_json::json!({
            "file": file.display().to_string(),
            "valid": validation.is_valid(),
            "issues": validation.issues,
        }))?;
    } else {
        for issue in &validation.issues {
            println!("{}", issue);
        }
        if validation.is_valid() {
            println!(
                "✓ {} is a valid improvement report ({} improvement(s), {} warning(s))",
                file.display(),
                document.sections.len(),
                validation.warnings().count()
            );
        }
    }

    if !validation.is_valid() {
        bail!("{}: {}", file.display(), validation.summary());
    }

    Ok(())
}

fn handle_show(file: &Path, json: bool) -> Result<()> {
    let content = read_report(file)?;
    let report = ImprovementReport::from_markdown(&content)
        .with_context(|| format!("parsing {}", file.display()))?;

    if json {
        return print_json(&report);
    }

    print_report(&report);
    Ok(())
}

async fn handle_import(config: &Config, file: &Path, json: bool) -> Result<()> {
    let content = read_report(file)?;
    let db = Arc::new(get_database(config).await?);
    let recorder = ReportRecorder::new(db);

    let source = file.display().to_string();
    let id = recorder
        .import_markdown(&content, Some(&source))
        .await
        .with_context(|| format!("importing {}", file.display()))?;

    if json {
        print_json(&serde_json::json!({ "id": id }))?;
    } else {
        println!("✓ Imported {} as report #{}", file.display(), id);
    }

    Ok(())
}

async fn handle_recent(config: &Config, limit: i64, json: bool) -> Result<()> {
    let db = Arc::new(get_database(config).await?);
    let reports = Retriever::new(db).recent(limit).await?;

    if json {
        return print_json(&reports);
    }

    if reports.is_empty() {
        println!("No reports stored yet.");
        return Ok(());
    }

    println!("\nRecent reports:");
    println!("{}", "=".repeat(60));
    for summary in &reports {
        let average = summary
            .average_confidence
            .map(|c| format!("{:.0}%", c * 100.0))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "#{:<4} {}  {} improvement(s), avg confidence {}",
            summary.id, summary.generated, summary.improvement_count, average
        );
        if let Some(source) = &summary.source {
            println!("      from {}", source);
        }
    }
    println!("{}", "=".repeat(60));

    Ok(())
}

async fn handle_search(
    config: &Config,
    query: &str,
    limit: usize,
    exact: bool,
    json: bool,
) -> Result<()> {
    let db = Arc::new(get_database(config).await?);
    let searcher = Searcher::new(db);
    let results = if exact {
        searcher.search_exact(query, limit).await?
    } else {
        searcher.search(query, limit).await?
    };

    if json {
        return print_json(&results);
    }

    if results.is_empty() {
        println!("No improvements found matching '{}'", query);
        return Ok(());
    }

    println!("\nFound {} improvement(s) matching '{}':", results.len(), query);
    println!("{}", "=".repeat(60));
    for (i, hit) in results.iter().enumerate() {
        let improvement = &hit.improvement;
        println!(
            "{:3}. {} (report #{}, confidence: {:.0}%)",
            i + 1,
            improvement.title,
            improvement.report_id,
            improvement.confidence * 100.0
        );
        println!("     {}", improvement.description);
    }
    println!("{}", "=".repeat(60));

    Ok(())
}

async fn handle_export(config: &Config, id: i64, output: Option<&Path>, json: bool) -> Result<()> {
    let db = Arc::new(get_database(config).await?);
    let report = Retriever::new(db)
        .load(id)
        .await?
        .ok_or(ReportError::ReportNotFound(id))?;

    if json {
        return print_json(&report);
    }

    let markdown = report.to_markdown();
    match output {
        Some(path) => {
            std::fs::write(path, &markdown)
                .with_context(|| format!("writing report to {}", path.display()))?;
            println!("✓ Exported report #{} to {}", id, path.display());
        }
        None => print!("{}", markdown),
    }

    Ok(())
}

async fn handle_delete(config: &Config, id: i64, json: bool) -> Result<()> {
    let db = Arc::new(get_database(config).await?);
    let deleted = Retriever::new(db).delete(id).await?;

    if !deleted {
        return Err(ReportError::ReportNotFound(id).into());
    }

    if json {
        print_json(&serde_json::json!({ "deleted": id }))?;
    } else {
        println!("✓ Deleted report #{}", id);
    }

    Ok(())
}

async fn handle_status(config: &Config, json: bool) -> Result<()> {
    let db = get_database(config).await?;
    let stats = db.stats().await?;

    if json {
        return print_json(&serde_json::json!({
            "home": config.home.display().to_string(),
            "database": config.database_path.display().to_string(),
            "thresholds": config.thresholds,
            "stats": stats,
        }));
    }

    println!("\nimprovement-report Status");
    println!("{}", "=".repeat(60));

    println!("\nData directory: {}", config.home.display());
    println!("Database:       {}", config.database_path.display());

    println!("\nDetection thresholds:");
    println!("  Intelligence score:      > {}", config.thresholds.intelligence_score);
    println!("  Central concepts:        > {}", config.thresholds.central_concepts);
    println!(
        "  Automation success rate: > {}",
        config.thresholds.automation_success_rate
    );

    println!("\nHistory:");
    println!("  Reports:      {}", stats.total_reports);
    println!("  Improvements: {}", stats.total_improvements);
    if let Some(average) = stats.average_confidence {
        println!("  Avg confidence: {:.2}%", average * 100.0);
    }

    println!("{}", "=".repeat(60));

    Ok(())
}

fn print_report(report: &ImprovementReport) {
    println!("\nDetected Code Improvements");
    println!("{}", "=".repeat(60));
    println!("Generated: {}", report.generated);

    for (i, improvement) in report.improvements.iter().enumerate() {
        println!(
            "\n  {}. {} (confidence: {})",
            i + 1,
            improvement.title(),
            improvement.confidence
        );
        println!("     {}", improvement.description);
        for change in &improvement.suggested_changes {
            println!("     - {}", change);
        }
    }

    if let Some(average) = report.average_confidence() {
        println!("\nAverage confidence: {}", average);
    }
    println!("{}", "=".repeat(60));
}

fn read_report(file: &Path) -> Result<String> {
    std::fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn get_database(config: &Config) -> Result<Database> {
    Database::new(&config.database_path)
        .await
        .with_context(|| format!("opening history at {}", config.database_path.display()))
}
