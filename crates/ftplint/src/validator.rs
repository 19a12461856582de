//! Shape checks for the ftp service change handler.
//!
//! The handler must take exactly one `ftp:WatchEvent` and return `()`, an
//! error, or a union of those. Every failure is reported through the sink;
//! nothing here aborts, and the parameter and return-type checks never
//! suppress each other.

use tracing::debug;

use crate::catalog::CompilationError;
use crate::config::ValidatorConfig;
use crate::error::{Diagnostic, DiagnosticDetail, MarkerMismatch, Span};
use crate::model::{
    DiagnosticReporter, HandlerMethodDeclaration, ModuleIdentity, ParameterDeclaration,
    ParameterList, SemanticModel, TypeDescriptor,
};

pub fn validate<M, R>(
    model: &M,
    handler: Option<&HandlerMethodDeclaration>,
    service_span: Span,
    config: &ValidatorConfig,
    reporter: &mut R,
) where
    M: SemanticModel + ?Sized,
    R: DiagnosticReporter + ?Sized,
{
    let Some(handler) = handler else {
        debug!(handler = %config.handler_name, "service declares no handler method");
        reporter.report(Diagnostic::error(
            CompilationError::NoOnFileChange,
            service_span,
        ));
        return;
    };

    validate_parameters(model, &handler.params, handler.span, config, reporter);

    let return_type = model
        .resolve_symbol(handler.node)
        .and_then(|method| model.declared_return_type(method));
    validate_return_type(return_type.as_ref(), handler.span, config, reporter);
}

pub fn validate_parameters<M, R>(
    model: &M,
    params: &ParameterList,
    handler_span: Span,
    config: &ValidatorConfig,
    reporter: &mut R,
) where
    M: SemanticModel + ?Sized,
    R: DiagnosticReporter + ?Sized,
{
    match params.params.as_slice() {
        [] => {
            debug!("handler declares no parameters");
            reporter.report(
                Diagnostic::error(CompilationError::MustHaveWatchEvent, handler_span)
                    .with_detail(DiagnosticDetail::ParameterCount { count: 0 }),
            );
        }
        [param] => {
            if let Err(mismatch) = validate_watch_event_param(model, param, config) {
                debug!(?mismatch, "handler parameter is not the marker type");
                reporter.report(
                    Diagnostic::error(CompilationError::MustHaveWatchEvent, param.span)
                        .with_detail(DiagnosticDetail::Marker(mismatch)),
                );
            }
        }
        many => {
            debug!(count = many.len(), "handler declares too many parameters");
            reporter.report(
                Diagnostic::error(CompilationError::OnlyParamsAllowed, params.span)
                    .with_detail(DiagnosticDetail::ParameterCount { count: many.len() }),
            );
        }
    }
}

/// Decides whether `param` is declared with the marker type. Each failing
/// step maps to its own reason, though callers report them all alike.
pub fn validate_watch_event_param<M>(
    model: &M,
    param: &ParameterDeclaration,
    config: &ValidatorConfig,
) -> Result<(), MarkerMismatch>
where
    M: SemanticModel + ?Sized,
{
    if !param.type_ref.qualified {
        return Err(MarkerMismatch::UnqualifiedTypeName);
    }
    let symbol = model
        .resolve_symbol(param.type_ref.node)
        .ok_or(MarkerMismatch::UnresolvedSymbol)?;
    let module = model
        .symbol_module(symbol)
        .ok_or(MarkerMismatch::MissingModule)?;
    if !is_marker_module(&module, config) {
        return Err(MarkerMismatch::ForeignModule { module });
    }

    let name = model.symbol_name(symbol).unwrap_or_default();
    if name != config.marker.type_name {
        return Err(MarkerMismatch::WrongName { name });
    }
    Ok(())
}

pub fn validate_return_type<R>(
    return_type: Option<&TypeDescriptor>,
    handler_span: Span,
    config: &ValidatorConfig,
    reporter: &mut R,
) where
    R: DiagnosticReporter + ?Sized,
{
    let Some(return_type) = return_type else {
        debug!("handler return type did not resolve, skipping");
        return;
    };

    match return_type {
        TypeDescriptor::Nil => {}
        TypeDescriptor::Union { members } => {
            for (index, member) in members.iter().enumerate() {
                if is_accepted_union_member(member, config) {
                    continue;
                }
                debug!(index, signature = %member.signature(), "rejected return union member");
                reporter.report(
                    Diagnostic::error(
                        CompilationError::InvalidReturnTypeErrorOrNil,
                        handler_span,
                    )
                    .with_detail(DiagnosticDetail::ReturnMember {
                        index,
                        signature: member.signature(),
                    }),
                );
            }
        }
        other => {
            debug!(signature = %other.signature(), "rejected return type");
            reporter.report(
                Diagnostic::error(
                    CompilationError::InvalidReturnTypeErrorOrNil,
                    handler_span,
                )
                .with_detail(DiagnosticDetail::ReturnType {
                    signature: other.signature(),
                }),
            );
        }
    }
}

fn is_accepted_union_member(member: &TypeDescriptor, config: &ValidatorConfig) -> bool {
    match member {
        TypeDescriptor::Nil | TypeDescriptor::ErrorLike => true,
        // Only the organization is compared here, unlike the parameter check.
        TypeDescriptor::Named {
            module, signature, ..
        } => *signature == config.error_signature || is_marker_organization(module, config),
        TypeDescriptor::Union { .. } | TypeDescriptor::Other { .. } => false,
    }
}

pub fn is_marker_module(module: &ModuleIdentity, config: &ValidatorConfig) -> bool {
    module.organization == config.marker.organization
        && module.package_name == config.marker.package_name
}

pub fn is_marker_organization(module: &ModuleIdentity, config: &ValidatorConfig) -> bool {
    module.organization == config.marker.organization
}
