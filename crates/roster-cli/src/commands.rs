use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info, info_span};

use roster_analysis::{AnalysisClient, fallback_assessment};
use roster_core::{AnalysisOutcome, ImportStep, RosterConfig};
use roster_ingest::{TEMPLATE_FILE_NAME, UploadFile};

use crate::cli::{ImportArgs, TemplateArgs};
use crate::logging::redact_value;
use crate::summary::fields_table;

/// Upload `args.file`, apply mapping overrides, and optionally run the
/// analysis. Returns the step holding the resulting session.
pub fn run_import(args: &ImportArgs, config: &RosterConfig) -> Result<ImportStep> {
    let span = info_span!("import", file = %args.file.display());
    let _guard = span.enter();

    let mut step = ImportStep::new(config.fields.clone(), config.limits)
        .context("compile field rules")?;

    let mut file = UploadFile::from_path(&args.file)?;
    if let Some(media_type) = &args.media_type {
        file = file.with_media_type(media_type.as_str());
    }
    step.upload(&file).context("upload rejected")?;

    for field in &args.unmap {
        step.assign_mapping(field, None)
            .with_context(|| format!("unmap {field}"))?;
    }
    for entry in &args.map {
        step.assign_mapping(&entry.field, Some(&entry.column))
            .with_context(|| format!("map {entry}"))?;
    }
    log_invalid_values(&step);

    if args.analyze {
        run_analysis(&mut step, config);
    }
    Ok(step)
}

fn run_analysis(step: &mut ImportStep, config: &RosterConfig) {
    let Some(job) = step.prepare_analysis() else {
        info!("no records to analyse");
        return;
    };
    let outcome = match AnalysisClient::new(&config.analysis) {
        Ok(client) => job.run(&client),
        Err(error) => AnalysisOutcome::Failed {
            error,
            fallback: fallback_assessment(&job.request),
        },
    };
    step.record_analysis(&job, outcome);
}

fn log_invalid_values(step: &ImportStep) {
    let Some(session) = step.session() else {
        return;
    };
    for issue in &session.report.issues {
        let value = session
            .participants
            .get(issue.record_index)
            .and_then(|record| record.get(&issue.field))
            .unwrap_or_default();
        debug!(
            record = issue.record_index + 1,
            field = %issue.field,
            value = redact_value(value),
            reason = %issue.reason,
            "invalid value"
        );
    }
}

/// Print the import report as pretty JSON.
pub fn print_json(step: &ImportStep) -> Result<()> {
    let report = step.report();
    let text = serde_json::to_string_pretty(&report).context("serialize report")?;
    println!("{text}");
    Ok(())
}

/// Write the template to `args.output`, or stdout when unset. A directory
/// output receives the default template file name.
pub fn run_template(args: &TemplateArgs, config: &RosterConfig) -> Result<()> {
    let step = ImportStep::new(config.fields.clone(), config.limits)
        .context("compile field rules")?;
    let csv = step.template().context("render template")?;
    match &args.output {
        Some(path) => {
            let target = if path.is_dir() {
                path.join(TEMPLATE_FILE_NAME)
            } else {
                path.clone()
            };
            write_template(&target, &csv)?;
            println!("Template written to {}", target.display());
        }
        None => print!("{csv}"),
    }
    Ok(())
}

fn write_template(path: &Path, csv: &str) -> Result<()> {
    fs::write(path, csv).with_context(|| format!("write {}", path.display()))?;
    info!(path = %path.display(), "wrote template");
    Ok(())
}

pub fn run_fields(config: &RosterConfig) -> Result<()> {
    println!("{}", fields_table(&config.fields));
    Ok(())
}
