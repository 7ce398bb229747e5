//! Turning a JSCAD program into an STL solid.

use std::path::Path;

use scan2cad_core::dimensions::Dimensions;
use scan2cad_mesh::export::to_binary_stl;
use scan2cad_mesh::shapes::hollow_case;
use tokio::process::Command;

use crate::jscad::WALL_MM;

/// Name of the OpenJSCAD command-line tool.
pub const JSCAD_PROGRAM: &str = "jscad";

#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{program} exited with {status}: {stderr}")]
    Command {
        program: String,
        status: std::process::ExitStatus,
        stderr: String,
    },
}

/// Produces the STL for a generated source file.
#[derive(Debug, Clone)]
pub enum StlConverter {
    /// Mesh the hollow case directly from the dimensions.
    Builtin,
    /// Run `{program} <source> -o <stl>`.
    JscadCli { program: String },
}

impl StlConverter {
    pub fn jscad_cli() -> Self {
        Self::JscadCli {
            program: JSCAD_PROGRAM.to_string(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Builtin => "builtin",
            Self::JscadCli { .. } => "jscad-cli",
        }
    }

    pub async fn convert(
        &self,
        source: &Path,
        stl: &Path,
        dimensions: &Dimensions,
    ) -> Result<(), ConvertError> {
        match self {
            Self::Builtin => {
                let mesh = hollow_case(dimensions.as_array(), WALL_MM);
                tokio::fs::write(stl, to_binary_stl(&mesh, "case")).await?;
                Ok(())
            }
            Self::JscadCli { program } => {
                let output = Command::new(program)
                    .arg(source)
                    .arg("-o")
                    .arg(stl)
                    .output()
                    .await?;
                if !output.status.success() {
                    if let Err(e) = tokio::fs::remove_file(stl).await {
                        if e.kind() != std::io::ErrorKind::NotFound {
                            tracing::warn!(
                                path = %stl.display(),
                                error = %e,
                                "Could not remove partial STL"
                            );
                        }
                    }
                    return Err(ConvertError::Command {
                        program: program.clone(),
                        status: output.status,
                        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
                    });
                }
                tracing::info!(
                    stdout = %String::from_utf8_lossy(&output.stdout).trim(),
                    "JSCAD conversion completed"
                );
                Ok(())
            }
        }
    }
}
