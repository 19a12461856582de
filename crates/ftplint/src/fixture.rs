//! JSON-backed semantic model.
//!
//! A fixture stands in for a host compiler: it lists resolved symbols, the
//! syntax nodes bound to them and the service declarations to check.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::LoadError;
use crate::model::{
    ModuleIdentity, NodeId, SemanticModel, ServiceDeclaration, SymbolId, TypeDescriptor,
};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SymbolEntry {
    pub id: SymbolId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub module: Option<ModuleIdentity>,
    #[serde(default)]
    pub return_type: Option<TypeDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Binding {
    pub node: NodeId,
    pub symbol: SymbolId,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct FixtureDocument {
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    symbols: Vec<SymbolEntry>,
    #[serde(default)]
    bindings: Vec<Binding>,
    #[serde(default)]
    services: Vec<ServiceDeclaration>,
}

#[derive(Debug, Clone)]
pub struct Fixture {
    pub source: Option<String>,
    pub services: Vec<ServiceDeclaration>,
    symbols: HashMap<SymbolId, SymbolEntry>,
    bindings: HashMap<NodeId, SymbolId>,
}

impl Fixture {
    pub fn from_json_str(json: &str) -> Result<Self, LoadError> {
        let document: FixtureDocument = serde_json::from_str(json)?;

        let mut symbols = HashMap::new();
        for symbol in document.symbols {
            if let Some(return_type) = &symbol.return_type {
                reject_empty_unions(return_type, symbol.id)?;
            }
            let id = symbol.id;
            if symbols.insert(id, symbol).is_some() {
                return Err(LoadError::invalid_fixture(format!(
                    "duplicate symbol id {}",
                    id.0
                )));
            }
        }

        let mut bindings = HashMap::new();
        for binding in document.bindings {
            if !symbols.contains_key(&binding.symbol) {
                return Err(LoadError::invalid_fixture(format!(
                    "node {} is bound to unknown symbol {}",
                    binding.node.0, binding.symbol.0
                )));
            }
            if bindings.insert(binding.node, binding.symbol).is_some() {
                return Err(LoadError::invalid_fixture(format!(
                    "node {} is bound more than once",
                    binding.node.0
                )));
            }
        }

        let mut seen_nodes = HashSet::new();
        for service in &document.services {
            for method in &service.methods {
                if !seen_nodes.insert(method.node) {
                    return Err(LoadError::invalid_fixture(format!(
                        "method node {} is declared more than once",
                        method.node.0
                    )));
                }
            }
        }

        tracing::debug!(
            symbols = symbols.len(),
            bindings = bindings.len(),
            services = document.services.len(),
            "loaded fixture"
        );

        Ok(Self {
            source: document.source,
            services: document.services,
            symbols,
            bindings,
        })
    }

    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let json = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    fn symbol(&self, id: SymbolId) -> Option<&SymbolEntry> {
        self.symbols.get(&id)
    }
}

fn reject_empty_unions(ty: &TypeDescriptor, owner: SymbolId) -> Result<(), LoadError> {
    if let TypeDescriptor::Union { members } = ty {
        if members.is_empty() {
            return Err(LoadError::invalid_fixture(format!(
                "symbol {} declares an empty union return type",
                owner.0
            )));
        }
        for member in members {
            reject_empty_unions(member, owner)?;
        }
    }
    Ok(())
}

impl SemanticModel for Fixture {
    fn resolve_symbol(&self, node: NodeId) -> Option<SymbolId> {
        self.bindings.get(&node).copied()
    }

    fn symbol_module(&self, symbol: SymbolId) -> Option<ModuleIdentity> {
        self.symbol(symbol)?.module.clone()
    }

    fn symbol_name(&self, symbol: SymbolId) -> Option<String> {
        self.symbol(symbol)?.name.clone()
    }

    fn declared_return_type(&self, method: SymbolId) -> Option<TypeDescriptor> {
        self.symbol(method)?.return_type.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::Fixture;
    use crate::error::LoadError;
    use crate::model::{ModuleIdentity, NodeId, SemanticModel, SymbolId, TypeDescriptor};

    const FIXTURE: &str = r#"{
  "symbols": [
    {"id": 1, "name": "WatchEvent", "module": {"organization": "ballerina", "package_name": "ftp"}},
    {"id": 2, "name": "onFileChange", "return_type": {"kind": "union", "members": [{"kind": "error_like"}, {"kind": "nil"}]}}
  ],
  "bindings": [
    {"node": 10, "symbol": 1},
    {"node": 20, "symbol": 2}
  ],
  "services": [
    {
      "name": "watcher",
      "span": {"start": 0, "end": 120},
      "methods": [
        {
          "node": 20,
          "name": "onFileChange",
          "span": {"start": 20, "end": 110},
          "params": {"span": {"start": 40, "end": 60}, "params": [
            {"type_ref": {"node": 10}, "span": {"start": 41, "end": 59}}
          ]}
        }
      ]
    }
  ]
}"#;

    #[test]
    fn answers_queries_from_document() {
        let fixture = Fixture::from_json_str(FIXTURE).expect("fixture should load");

        assert_eq!(fixture.resolve_symbol(NodeId(10)), Some(SymbolId(1)));
        assert_eq!(fixture.resolve_symbol(NodeId(11)), None);
        assert_eq!(
            fixture.symbol_module(SymbolId(1)),
            Some(ModuleIdentity::new("ballerina", "ftp"))
        );
        assert_eq!(fixture.symbol_module(SymbolId(2)), None);
        assert_eq!(fixture.symbol_name(SymbolId(1)).as_deref(), Some("WatchEvent"));
        assert_eq!(
            fixture.declared_return_type(SymbolId(2)),
            Some(TypeDescriptor::Union {
                members: vec![TypeDescriptor::ErrorLike, TypeDescriptor::Nil]
            })
        );

        let method = &fixture.services[0].methods[0];
        assert!(method.params.params[0].type_ref.qualified);
    }

    #[test]
    fn rejects_binding_to_unknown_symbol() {
        let error = Fixture::from_json_str(r#"{"bindings": [{"node": 1, "symbol": 9}]}"#)
            .expect_err("should fail");
        assert!(
            error.to_string().contains("unknown symbol 9"),
            "unexpected error: {error}"
        );
    }

    #[test]
    fn rejects_duplicate_symbols() {
        let error = Fixture::from_json_str(r#"{"symbols": [{"id": 1}, {"id": 1}]}"#)
            .expect_err("should fail");
        assert!(matches!(error, LoadError::InvalidFixture { .. }));
    }

    #[test]
    fn rejects_empty_union() {
        let error = Fixture::from_json_str(
            r#"{"symbols": [{"id": 1, "return_type": {"kind": "union", "members": []}}]}"#,
        )
        .expect_err("should fail");
        assert!(
            error.to_string().contains("empty union"),
            "unexpected error: {error}"
        );
    }

    #[test]
    fn reports_malformed_json() {
        let error = Fixture::from_json_str("{").expect_err("should fail");
        assert!(matches!(error, LoadError::Json(_)));
    }
}
