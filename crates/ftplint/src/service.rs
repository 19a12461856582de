use std::thread;

use serde::Serialize;
use tracing::debug;

use crate::config::ValidatorConfig;
use crate::error::{Diagnostic, Span};
use crate::model::{HandlerMethodDeclaration, SemanticModel, ServiceDeclaration};
use crate::validator;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceCheckResult {
    pub name: Option<String>,
    pub span: Span,
    pub diagnostics: Vec<Diagnostic>,
}

impl ServiceCheckResult {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("<anonymous service>")
    }
}

pub fn find_handler<'a>(
    service: &'a ServiceDeclaration,
    config: &ValidatorConfig,
) -> Option<&'a HandlerMethodDeclaration> {
    service
        .methods
        .iter()
        .find(|method| method.name == config.handler_name)
}

pub fn check_service<M>(
    model: &M,
    service: &ServiceDeclaration,
    config: &ValidatorConfig,
) -> Vec<Diagnostic>
where
    M: SemanticModel + ?Sized,
{
    let handler = find_handler(service, config);
    debug!(
        service = service.name.as_deref().unwrap_or(""),
        found = handler.is_some(),
        "checking ftp service"
    );

    let mut diagnostics = Vec::new();
    validator::validate(model, handler, service.span, config, &mut diagnostics);
    diagnostics
}

pub fn check_services<M>(
    model: &M,
    services: &[ServiceDeclaration],
    config: &ValidatorConfig,
) -> Vec<ServiceCheckResult>
where
    M: SemanticModel + ?Sized,
{
    let results: Vec<ServiceCheckResult> = services
        .iter()
        .map(|service| to_result(service, check_service(model, service, config)))
        .collect();
    log_summary(&results);
    results
}

/// Same as [`check_services`], one scoped thread per service. Results keep
/// the input order.
pub fn check_services_parallel<M>(
    model: &M,
    services: &[ServiceDeclaration],
    config: &ValidatorConfig,
) -> Vec<ServiceCheckResult>
where
    M: SemanticModel + Sync + ?Sized,
{
    let results: Vec<ServiceCheckResult> = thread::scope(|scope| {
        let handles: Vec<_> = services
            .iter()
            .map(|service| scope.spawn(move || check_service(model, service, config)))
            .collect();

        services
            .iter()
            .zip(handles)
            .map(|(service, handle)| {
                let diagnostics = handle
                    .join()
                    .unwrap_or_else(|payload| std::panic::resume_unwind(payload));
                to_result(service, diagnostics)
            })
            .collect()
    });
    log_summary(&results);
    results
}

pub fn has_errors(diagnostics: &[Diagnostic]) -> bool {
    diagnostics.iter().any(Diagnostic::is_error)
}

fn to_result(service: &ServiceDeclaration, diagnostics: Vec<Diagnostic>) -> ServiceCheckResult {
    ServiceCheckResult {
        name: service.name.clone(),
        span: service.span,
        diagnostics,
    }
}

fn log_summary(results: &[ServiceCheckResult]) {
    let rejected = results
        .iter()
        .filter(|result| has_errors(&result.diagnostics))
        .count();
    debug!(services = results.len(), rejected, "ftp service checks finished");
}

#[cfg(test)]
mod tests {
    use super::{find_handler, has_errors};
    use crate::catalog::CompilationError;
    use crate::config::ValidatorConfig;
    use crate::error::{Diagnostic, Severity, Span};
    use crate::model::{HandlerMethodDeclaration, NodeId, ParameterList, ServiceDeclaration};

    fn method(node: u32, name: &str) -> HandlerMethodDeclaration {
        HandlerMethodDeclaration {
            node: NodeId(node),
            name: name.to_string(),
            params: ParameterList {
                params: vec![],
                span: Span::default(),
            },
            span: Span::default(),
        }
    }

    #[test]
    fn finds_first_handler_by_configured_name() {
        let service = ServiceDeclaration {
            name: Some("watcher".to_string()),
            span: Span::new(0, 10),
            methods: vec![method(1, "init"), method(2, "onFileChange"), method(3, "onFileChange")],
        };

        let handler = find_handler(&service, &ValidatorConfig::default()).expect("handler");
        assert_eq!(handler.node, NodeId(2));

        let config = ValidatorConfig {
            handler_name: "init".to_string(),
            ..ValidatorConfig::default()
        };
        assert_eq!(find_handler(&service, &config).map(|m| m.node), Some(NodeId(1)));
    }

    #[test]
    fn handler_lookup_is_case_sensitive() {
        let service = ServiceDeclaration {
            name: None,
            span: Span::new(0, 10),
            methods: vec![method(1, "onfilechange")],
        };
        assert!(find_handler(&service, &ValidatorConfig::default()).is_none());
    }

    #[test]
    fn warnings_alone_do_not_reject() {
        let warning = Diagnostic {
            severity: Severity::Warning,
            ..Diagnostic::error(CompilationError::TemplateCodeGenerationHint, Span::default())
        };
        assert!(!has_errors(&[warning.clone()]));
        assert!(has_errors(&[
            warning,
            Diagnostic::error(CompilationError::NoOnFileChange, Span::default())
        ]));
    }
}
