use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Diagnostic, Span};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymbolId(pub u32);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModuleIdentity {
    pub organization: String,
    pub package_name: String,
}

impl ModuleIdentity {
    pub fn new(organization: impl Into<String>, package_name: impl Into<String>) -> Self {
        Self {
            organization: organization.into(),
            package_name: package_name.into(),
        }
    }
}

impl fmt::Display for ModuleIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.organization, self.package_name)
    }
}

/// Normalized view of a declared type as the host exposes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeDescriptor {
    Named {
        module: ModuleIdentity,
        name: String,
        signature: String,
    },
    Union {
        members: Vec<TypeDescriptor>,
    },
    Nil,
    ErrorLike,
    Other {
        signature: String,
    },
}

impl TypeDescriptor {
    pub fn named(module: ModuleIdentity, name: impl Into<String>) -> Self {
        let name = name.into();
        let signature = format!("{}/{}:{}", module.organization, module.package_name, name);
        Self::Named {
            module,
            name,
            signature,
        }
    }

    pub fn other(signature: impl Into<String>) -> Self {
        Self::Other {
            signature: signature.into(),
        }
    }

    pub fn signature(&self) -> String {
        match self {
            TypeDescriptor::Named { signature, .. } | TypeDescriptor::Other { signature } => {
                signature.clone()
            }
            TypeDescriptor::Union { members } => members
                .iter()
                .map(TypeDescriptor::signature)
                .collect::<Vec<_>>()
                .join("|"),
            TypeDescriptor::Nil => "()".to_string(),
            TypeDescriptor::ErrorLike => "error".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeReference {
    pub node: NodeId,
    /// Whether the source spelled the type as a module-qualified name.
    #[serde(default = "default_qualified")]
    pub qualified: bool,
}

fn default_qualified() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterDeclaration {
    pub type_ref: TypeReference,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterList {
    #[serde(default)]
    pub params: Vec<ParameterDeclaration>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandlerMethodDeclaration {
    pub node: NodeId,
    pub name: String,
    pub params: ParameterList,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceDeclaration {
    #[serde(default)]
    pub name: Option<String>,
    pub span: Span,
    #[serde(default)]
    pub methods: Vec<HandlerMethodDeclaration>,
}

/// Read-only queries over the host's resolved program model.
pub trait SemanticModel {
    fn resolve_symbol(&self, node: NodeId) -> Option<SymbolId>;
    fn symbol_module(&self, symbol: SymbolId) -> Option<ModuleIdentity>;
    fn symbol_name(&self, symbol: SymbolId) -> Option<String>;
    fn declared_return_type(&self, method: SymbolId) -> Option<TypeDescriptor>;
}

/// Sink for findings. The validator only ever pushes into it.
pub trait DiagnosticReporter {
    fn report(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticReporter for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}
