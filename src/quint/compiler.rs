//! Boundary to the external `quint` compiler.

use std::path::Path;
use std::process::{Command, ExitStatus};

use thiserror::Error;

use super::ast::Document;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("failed to run the quint compiler: {0}")]
    Io(#[from] std::io::Error),
    #[error("quint compiler exited with {status}: {stderr}")]
    CompilerFailed { status: ExitStatus, stderr: String },
    #[error("compiler output does not match the expected document schema: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Compiles a specification and decodes the resulting type AST.
pub fn compile(quint: &str, spec: &Path) -> Result<Document, InputError> {
    let output = Command::new(quint)
        .arg("compile")
        .args(["--flatten", "false"])
        .arg(spec)
        .output()?;

    if !output.status.success() {
        return Err(InputError::CompilerFailed {
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }

    parse_document(&output.stdout)
}

/// Loads a document that was compiled ahead of time.
pub fn load(path: &Path) -> Result<Document, InputError> {
    let bytes = std::fs::read(path)?;
    parse_document(&bytes)
}

pub fn parse_document(bytes: &[u8]) -> Result<Document, InputError> {
    Ok(serde_json::from_slice(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_output_is_an_input_error() {
        let result = parse_document(b"{\"modules\": \"not a list\"}");
        assert!(matches!(result, Err(InputError::Malformed(_))));
    }

    #[test]
    fn missing_compiler_binary_is_an_io_error() {
        let result = compile(
            "quint-binary-that-does-not-exist",
            Path::new("spec/main.qnt"),
        );
        assert!(matches!(result, Err(InputError::Io(_))));
    }
}
