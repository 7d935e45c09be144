//! Command implementations shared by the binary and the integration tests.
//!
//! Each `run_*` function takes resolved options, does the whole command and
//! returns the response value; the binary only parses arguments and prints.

use std::path::PathBuf;

use rayon::prelude::*;
use tracing::{info, warn};

use wpfcheck_analysis::{
    AnalysisSession, Compilation, PropertyRegistration, RegistrationKind, RoutedEventKind,
    RoutedEventRegistration, SemanticModel,
};
use wpfcheck_core::config::Config;
use wpfcheck_core::error::CheckError;
use wpfcheck_core::output::{CheckResponse, RegistrationOutput, RegistrationsResponse};
use wpfcheck_core::CancellationToken;
use wpfcheck_syntax::{CSharpParser, SyntaxError, SyntaxTree};

use crate::checks::Checker;
use crate::files::collect_cs_files;

/// What to analyze and how.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Root that relative paths and exclusion globs are resolved against.
    pub workspace: PathBuf,
    pub paths: Vec<PathBuf>,
    pub config: Config,
}

// ============================================================================
// Loading
// ============================================================================

/// Parse `(path, source)` pairs in parallel, one parser per worker thread.
/// Tree order follows input order.
pub fn parse_sources(files: Vec<(String, String)>) -> Result<Compilation, CheckError> {
    let trees = files
        .into_par_iter()
        .map_init(CSharpParser::new, |parser, (path, source)| {
            let parsed = match parser {
                Ok(parser) => SyntaxTree::parse_with(parser, path.clone(), source),
                Err(e) => Err(SyntaxError::Language {
                    message: e.to_string(),
                }),
            };
            parsed.map_err(|e| CheckError::Parse {
                path,
                message: e.to_string(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    for tree in trees.iter().filter(|t| t.has_errors) {
        warn!("{} has syntax errors; affected members are skipped", tree.path);
    }
    Ok(Compilation::new(trees))
}

fn load(options: &RunOptions) -> Result<Compilation, CheckError> {
    let exclude = options.config.exclude_matcher()?;
    let files = collect_cs_files(&options.workspace, &options.paths, &exclude)?;
    if files.is_empty() {
        warn!("no C# files found");
    }
    parse_sources(files)
}

// ============================================================================
// check
// ============================================================================

/// Run the enabled checks over every file under `options.paths`.
pub fn run_check(options: &RunOptions, token: &CancellationToken) -> Result<CheckResponse, CheckError> {
    let compilation = load(options)?;
    let session = AnalysisSession::new(&compilation);
    let findings = Checker::new(&session, &options.config).run(token)?;
    info!(
        files = compilation.len(),
        findings = findings.len(),
        "check complete"
    );
    Ok(CheckResponse::new(compilation.len(), findings))
}

// ============================================================================
// registrations
// ============================================================================

/// Resolve every dependency-property registration, metadata override and
/// routed event under `options.paths`.
pub fn run_registrations(
    options: &RunOptions,
    token: &CancellationToken,
) -> Result<RegistrationsResponse, CheckError> {
    let compilation = load(options)?;
    let session = AnalysisSession::new(&compilation);
    let model = session.model();

    let mut outputs: Vec<RegistrationOutput> = session
        .registrations(token)?
        .iter()
        .chain(session.metadata_overrides(token)?.iter())
        .map(|r| property_output(model, r))
        .collect();
    outputs.extend(
        session
            .routed_events(token)?
            .iter()
            .map(|r| routed_event_output(model, r)),
    );
    Ok(RegistrationsResponse::new(outputs))
}

fn property_output(model: &SemanticModel<'_>, registration: &PropertyRegistration<'_>) -> RegistrationOutput {
    let backing = registration.backing;
    let containing_type = if registration.kind == RegistrationKind::Override {
        model.type_display(&registration.owner_type.resolved)
    } else {
        model.type_symbol(backing.containing_type()).full_name.clone()
    };
    RegistrationOutput {
        category: "dependency_property".to_string(),
        kind: registration.kind.as_str().to_string(),
        containing_type,
        backing_member: backing.name().to_string(),
        registered_name: registration.name().map(str::to_string),
        value_type: model.type_display(&registration.value_type.resolved),
        owner_type: model.type_display(&registration.owner_type.resolved),
        key_member: registration.key_field.map(|k| k.name().to_string()),
        location: model.tree(backing.tree()).location(backing.span()),
    }
}

fn routed_event_output(model: &SemanticModel<'_>, event: &RoutedEventRegistration<'_>) -> RegistrationOutput {
    let backing = event.backing;
    let kind = match event.kind {
        RoutedEventKind::Register => "RegisterRoutedEvent",
        RoutedEventKind::AddOwner => "AddOwner",
    };
    RegistrationOutput {
        category: "routed_event".to_string(),
        kind: kind.to_string(),
        containing_type: model.type_symbol(backing.containing_type()).full_name.clone(),
        backing_member: backing.name().to_string(),
        registered_name: event.name().map(str::to_string),
        value_type: model.type_display(&event.handler_type.resolved),
        owner_type: model.type_display(&event.owner_type.resolved),
        key_member: None,
        location: model.tree(backing.tree()).location(backing.span()),
    }
}
