//! Fixed table of compilation errors raised by the ftp service checks.
//!
//! The table mirrors the codes the ftp package has always published, so the
//! last entry keeps its historical `KAFKA_` prefix.

use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompilationError {
    InvalidMultipleListeners,
    InvalidAnnotationNumber,
    TemplateCodeGenerationHint,
    InvalidFunction,
    NoOnFileChange,
    MustHaveWatchEvent,
    OnlyParamsAllowed,
    InvalidReturnTypeErrorOrNil,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    pub error: CompilationError,
    pub code: &'static str,
    pub message: &'static str,
}

pub static CATALOG: [CatalogEntry; 8] = [
    CatalogEntry {
        error: CompilationError::InvalidMultipleListeners,
        code: "FTP_101",
        message: "Multiple listener attachments. Only one ftp:Listener is allowed.",
    },
    CatalogEntry {
        error: CompilationError::InvalidAnnotationNumber,
        code: "FTP_102",
        message: "No annotations are allowed for ftp services.",
    },
    CatalogEntry {
        error: CompilationError::TemplateCodeGenerationHint,
        code: "FTP_103",
        message: "Template generation for empty service",
    },
    CatalogEntry {
        error: CompilationError::InvalidFunction,
        code: "FTP_104",
        message: "Invalid remote method.",
    },
    CatalogEntry {
        error: CompilationError::NoOnFileChange,
        code: "FTP_105",
        message: "onFileChange method not found.",
    },
    CatalogEntry {
        error: CompilationError::MustHaveWatchEvent,
        code: "FTP_106",
        message: "Must have the required parameter ftp:WatchEvent.",
    },
    CatalogEntry {
        error: CompilationError::OnlyParamsAllowed,
        code: "FTP_107",
        message: "Invalid method parameter count. Only ftp:WatchEvent is allowed.",
    },
    CatalogEntry {
        error: CompilationError::InvalidReturnTypeErrorOrNil,
        code: "KAFKA_108",
        message: "Invalid return type. Only error? or ftp:Error? is allowed.",
    },
];

impl CompilationError {
    fn entry(self) -> &'static CatalogEntry {
        // Entries are declared in variant order.
        &CATALOG[self as usize]
    }

    pub fn code(self) -> &'static str {
        self.entry().code
    }

    pub fn message(self) -> &'static str {
        self.entry().message
    }

    pub fn from_code(code: &str) -> Option<Self> {
        CATALOG
            .iter()
            .find(|entry| entry.code == code)
            .map(|entry| entry.error)
    }
}

impl Serialize for CompilationError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::{CompilationError, CATALOG};

    #[test]
    fn catalog_entries_follow_variant_order() {
        for (index, entry) in CATALOG.iter().enumerate() {
            assert_eq!(entry.error as usize, index, "entry {}", entry.code);
        }
    }

    #[test]
    fn codes_are_unique() {
        for (index, entry) in CATALOG.iter().enumerate() {
            assert!(
                CATALOG[index + 1..]
                    .iter()
                    .all(|other| other.code != entry.code),
                "duplicate code {}",
                entry.code
            );
        }
    }

    #[test]
    fn handler_codes_match_published_table() {
        assert_eq!(CompilationError::NoOnFileChange.code(), "FTP_105");
        assert_eq!(CompilationError::MustHaveWatchEvent.code(), "FTP_106");
        assert_eq!(CompilationError::OnlyParamsAllowed.code(), "FTP_107");
        assert_eq!(
            CompilationError::InvalidReturnTypeErrorOrNil.code(),
            "KAFKA_108"
        );
        assert_eq!(
            CompilationError::NoOnFileChange.message(),
            "onFileChange method not found."
        );
    }

    #[test]
    fn looks_up_errors_by_code() {
        assert_eq!(
            CompilationError::from_code("FTP_107"),
            Some(CompilationError::OnlyParamsAllowed)
        );
        assert_eq!(CompilationError::from_code("FTP_108"), None);
    }

    #[test]
    fn serializes_as_code() {
        let json = serde_json::to_string(&CompilationError::MustHaveWatchEvent)
            .expect("should serialize");
        assert_eq!(json, "\"FTP_106\"");
    }
}
