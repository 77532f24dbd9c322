//! File driver: discovers Go files, runs the pipeline on each and writes results.
//!
//! Every input file is processed independently. A failure on one file is
//! recorded in the [`RunReport`] and never stops the rest of the batch. Two
//! inputs that map to the same output file are caught before anything is
//! written: the first in path order keeps the output, the later ones fail.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use walkdir::WalkDir;

use crate::conventions::Conventions;
use crate::diagnostics::Warning;
use crate::error::BuilderGenError;
use crate::output::{GeneratedUnit, synthesize, write_atomic};
use crate::scan::scan_with;

/// Settings for one generator run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub conventions: Conventions,
    /// Keep generated text in the outcome instead of writing it.
    pub dry_run: bool,
}

impl RunOptions {
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            conventions: Conventions::default(),
            dry_run: false,
        }
    }
}

/// What happened to one input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// Nothing in the file was generated.
    Skipped {
        input: PathBuf,
        /// Scan diagnostics, e.g. a marked generic struct.
        warnings: Vec<Warning>,
    },
    Generated {
        input: PathBuf,
        output: PathBuf,
        warnings: Vec<Warning>,
        /// The generated text, kept only in dry-run mode.
        source: Option<String>,
    },
}

impl FileOutcome {
    pub fn input(&self) -> &Path {
        match self {
            Self::Skipped { input, .. } | Self::Generated { input, .. } => input,
        }
    }

    pub fn warnings(&self) -> &[Warning] {
        match self {
            Self::Skipped { warnings, .. } | Self::Generated { warnings, .. } => warnings,
        }
    }
}

/// Per-file results of a run, sorted by input path.
#[derive(Debug)]
pub struct RunReport {
    pub results: Vec<(PathBuf, Result<FileOutcome, BuilderGenError>)>,
}

impl RunReport {
    pub fn generated(&self) -> impl Iterator<Item = &FileOutcome> {
        self.results.iter().filter_map(|(_, result)| match result {
            Ok(outcome @ FileOutcome::Generated { .. }) => Some(outcome),
            _ => None,
        })
    }

    pub fn skipped(&self) -> impl Iterator<Item = &Path> {
        self.results.iter().filter_map(|(_, result)| match result {
            Ok(outcome @ FileOutcome::Skipped { .. }) => Some(outcome.input()),
            _ => None,
        })
    }

    pub fn failures(&self) -> impl Iterator<Item = (&Path, &BuilderGenError)> {
        self.results
            .iter()
            .filter_map(|(path, result)| result.as_ref().err().map(|err| (path.as_path(), err)))
    }

    /// Warnings across generated and skipped files.
    pub fn warning_count(&self) -> usize {
        self.results
            .iter()
            .filter_map(|(_, result)| result.as_ref().ok())
            .map(|outcome| outcome.warnings().len())
            .sum()
    }

    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }
}

/// Result of the scan and synthesis steps on one file's text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Processed {
    /// No annotated types; any scan warnings are kept.
    Skipped { warnings: Vec<Warning> },
    Generated(GeneratedUnit),
}

impl Processed {
    pub fn generated(self) -> Option<GeneratedUnit> {
        match self {
            Self::Generated(unit) => Some(unit),
            Self::Skipped { .. } => None,
        }
    }

    pub fn warnings(&self) -> &[Warning] {
        match self {
            Self::Skipped { warnings } => warnings,
            Self::Generated(unit) => &unit.warnings,
        }
    }
}

/// A file whose output is generated but not yet written.
enum Prepared {
    Done(FileOutcome),
    Pending {
        output: PathBuf,
        generated: GeneratedUnit,
    },
}

/// Finds every `.go` file under `dir`, recursively, sorted by path.
///
/// ## Errors
/// Returns `BuilderGenError::Discover` if the directory cannot be walked.
pub fn discover_inputs(dir: &Path) -> Result<Vec<PathBuf>, BuilderGenError> {
    let mut inputs = Vec::new();

    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|source| BuilderGenError::Discover {
            path: dir.to_path_buf(),
            source,
        })?;

        let is_go = entry.path().extension().is_some_and(|ext| ext == "go");
        if entry.file_type().is_file() && is_go {
            inputs.push(entry.into_path());
        }
    }

    inputs.sort();
    Ok(inputs)
}

/// Output location for `input`: its stem plus the configured suffix.
pub fn output_path_for(input: &Path, output_dir: &Path, conventions: &Conventions) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();

    output_dir.join(conventions.output_file_name(&stem))
}

/// Runs the scan and synthesis steps on one file's text.
///
/// ## Errors
/// Returns the scan or synthesis error, annotated with `path`.
pub fn process_source(
    path: &Path,
    source: &str,
    conventions: &Conventions,
) -> Result<Processed, BuilderGenError> {
    let unit = scan_with(source, conventions).map_err(|err| err.in_file(path))?;

    if unit.is_empty() {
        return Ok(Processed::Skipped {
            warnings: unit.warnings,
        });
    }

    synthesize(&unit, conventions)
        .map(Processed::Generated)
        .map_err(|err| err.in_file(path))
}

fn log_warnings(input: &Path, warnings: &[Warning]) {
    for warning in warnings {
        tracing::warn!(input = %input.display(), kind = warning.kind(), "{warning}");
    }
}

fn prepare(input: &Path, options: &RunOptions) -> Result<Prepared, BuilderGenError> {
    let source = std::fs::read_to_string(input).map_err(|source| BuilderGenError::Read {
        path: input.to_path_buf(),
        source,
    })?;

    match process_source(input, &source, &options.conventions)? {
        Processed::Skipped { warnings } => {
            log_warnings(input, &warnings);
            tracing::debug!(input = %input.display(), "No annotated types, skipping");
            Ok(Prepared::Done(FileOutcome::Skipped {
                input: input.to_path_buf(),
                warnings,
            }))
        }
        Processed::Generated(generated) => Ok(Prepared::Pending {
            output: output_path_for(input, &options.output_dir, &options.conventions),
            generated,
        }),
    }
}

fn emit(
    input: &Path,
    output: PathBuf,
    generated: GeneratedUnit,
    options: &RunOptions,
) -> Result<FileOutcome, BuilderGenError> {
    log_warnings(input, &generated.warnings);
    let warnings = generated.warnings.clone();

    let source = if options.dry_run {
        Some(generated.to_source())
    } else {
        write_atomic(&output, &generated.into_bytes())?;
        tracing::info!(
            "Generated builder code for {} in {}",
            input.display(),
            output.display()
        );
        None
    };

    Ok(FileOutcome::Generated {
        input: input.to_path_buf(),
        output,
        warnings,
        source,
    })
}

fn finish(
    input: &Path,
    prepared: Prepared,
    options: &RunOptions,
) -> Result<FileOutcome, BuilderGenError> {
    match prepared {
        Prepared::Done(outcome) => Ok(outcome),
        Prepared::Pending { output, generated } => emit(input, output, generated, options),
    }
}

/// Reads, processes and (unless dry-running) writes the output for one file.
///
/// ## Errors
/// Returns an error if the file cannot be read, is not valid Go, or the output
/// cannot be written.
pub fn process_file(input: &Path, options: &RunOptions) -> Result<FileOutcome, BuilderGenError> {
    let prepared = prepare(input, options)?;
    finish(input, prepared, options)
}

/// Fails every pending file whose output path was already claimed by an
/// earlier input. `prepared` must be sorted by input path.
fn reject_collisions(prepared: &mut [(PathBuf, Result<Prepared, BuilderGenError>)]) {
    let mut claimed: HashMap<PathBuf, PathBuf> = HashMap::new();

    for (input, result) in prepared.iter_mut() {
        let Ok(Prepared::Pending { output, .. }) = result else {
            continue;
        };

        match claimed.get(output.as_path()).cloned() {
            Some(first) => {
                let err = BuilderGenError::OutputCollision {
                    output: output.clone(),
                    first,
                }
                .in_file(input.as_path());
                *result = Err(err);
            }
            None => {
                claimed.insert(output.clone(), input.clone());
            }
        }
    }
}

/// Processes every file in `inputs` in parallel.
pub fn process_all(inputs: &[PathBuf], options: &RunOptions) -> RunReport {
    let mut prepared: Vec<_> = inputs
        .par_iter()
        .map(|input| (input.clone(), prepare(input, options)))
        .collect();

    prepared.sort_by(|a, b| a.0.cmp(&b.0));
    reject_collisions(&mut prepared);

    let results = prepared
        .into_par_iter()
        .map(|(input, result)| {
            let result = result.and_then(|prepared| finish(&input, prepared, options));
            if let Err(err) = &result {
                tracing::error!("{err}");
            }
            (input, result)
        })
        .collect();

    RunReport { results }
}

/// Discovers inputs, prepares the output directory and processes every file.
///
/// ## Errors
/// Returns an error only for run-level failures: the input directory cannot be
/// walked or the output directory cannot be created. Per-file failures are in
/// the report.
pub fn run(options: &RunOptions) -> Result<RunReport, BuilderGenError> {
    let inputs = discover_inputs(&options.input_dir)?;
    tracing::info!(
        count = inputs.len(),
        input_dir = %options.input_dir.display(),
        "Discovered Go sources"
    );

    if !options.dry_run {
        std::fs::create_dir_all(&options.output_dir).map_err(|source| BuilderGenError::Write {
            path: options.output_dir.clone(),
            source,
        })?;
    }

    Ok(process_all(&inputs, options))
}
