pub mod catalog;
pub mod config;
pub mod error;
pub mod fixture;
pub mod logging;
pub mod model;
pub mod service;
pub mod validator;

use std::path::Path;

use config::ValidatorConfig;
use error::LoadError;
use fixture::Fixture;
use service::ServiceCheckResult;

pub use catalog::CompilationError;
pub use error::{Diagnostic, Severity, Span};
pub use model::{DiagnosticReporter, SemanticModel};
pub use validator::validate;

/// Checks every service declared in the fixture at `path`.
pub fn check_fixture_file(
    path: &Path,
    config: &ValidatorConfig,
) -> Result<(Fixture, Vec<ServiceCheckResult>), LoadError> {
    let fixture = Fixture::load(path)?;
    let results = service::check_services(&fixture, &fixture.services, config);
    Ok((fixture, results))
}

pub fn check_fixture_source(
    json: &str,
    config: &ValidatorConfig,
) -> Result<Vec<ServiceCheckResult>, LoadError> {
    let fixture = Fixture::from_json_str(json)?;
    Ok(service::check_services(&fixture, &fixture.services, config))
}
