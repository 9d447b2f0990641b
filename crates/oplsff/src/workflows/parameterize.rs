use super::config::{ForceFieldSource, ParameterizeConfig};
use super::error::WorkflowError;
use crate::core::forcefield::annotate::{AnnotationReport, Annotator};
use crate::core::forcefield::database::ForceFieldDatabase;
use crate::core::models::system::MolecularSystem;
use std::borrow::Cow;
use tracing::{info, instrument};

#[derive(Debug, Clone)]
pub struct ParameterizeResult {
    /// The database used for annotation, kept for bonded lookups by the caller.
    pub database: Cow<'static, ForceFieldDatabase>,
    pub report: AnnotationReport,
}

pub fn load_database(
    source: &ForceFieldSource,
) -> Result<Cow<'static, ForceFieldDatabase>, WorkflowError> {
    let database = match source {
        ForceFieldSource::Bundled => Cow::Borrowed(ForceFieldDatabase::bundled()),
        ForceFieldSource::Manifest(path) => Cow::Owned(ForceFieldDatabase::from_manifest(path)?),
        ForceFieldSource::Files {
            nonbonded,
            bonded,
            options,
        } => Cow::Owned(ForceFieldDatabase::load(nonbonded, bonded, options)?),
    };
    Ok(database)
}

#[instrument(skip_all, name = "parameterize_workflow")]
pub fn run(
    system: &mut MolecularSystem,
    config: &ParameterizeConfig,
) -> Result<ParameterizeResult, WorkflowError> {
    info!("Loading force-field database from {:?}.", config.forcefield);
    let database = load_database(&config.forcefield)?;

    let report = Annotator::new(&database).annotate(system);

    if config.require_full_coverage && !report.is_complete() {
        return Err(WorkflowError::UnresolvedTypes {
            count: report.unresolved.len(),
            kinds: report.unresolved_kinds.iter().cloned().collect(),
        });
    }

    info!(
        "Parameterization complete: {} of {} atom(s) annotated.",
        report.annotated,
        system.atom_count()
    );
    Ok(ParameterizeResult { database, report })
}
