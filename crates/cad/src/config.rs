use std::str::FromStr;

use scan2cad_llm::LlmConfig;

/// How the JSCAD source of a part is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GeneratorKind {
    /// Parametric box-with-cavity template.
    #[default]
    Template,
    /// Hosted language model, falling back to a canned design.
    Llm,
}

impl FromStr for GeneratorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "template" => Ok(Self::Template),
            "llm" => Ok(Self::Llm),
            other => Err(format!("unknown CAD generator '{other}' (expected template or llm)")),
        }
    }
}

/// How the STL solid is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConverterKind {
    /// In-process hollow case mesh.
    #[default]
    Builtin,
    /// The external `jscad` command-line tool.
    JscadCli,
}

impl FromStr for ConverterKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "builtin" => Ok(Self::Builtin),
            "jscad-cli" | "jscad" => Ok(Self::JscadCli),
            other => Err(format!(
                "unknown CAD converter '{other}' (expected builtin or jscad-cli)"
            )),
        }
    }
}

/// CAD-specific settings layered on top of `ServerConfig`.
#[derive(Debug, Clone, Default)]
pub struct CadConfig {
    pub generator: GeneratorKind,
    pub converter: ConverterKind,
    pub llm: LlmConfig,
}

impl CadConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var         | Default    |
    /// |-----------------|------------|
    /// | `CAD_GENERATOR` | `template` |
    /// | `CAD_CONVERTER` | `builtin`  |
    ///
    /// Model settings come from [`LlmConfig::from_env`].
    pub fn from_env() -> Self {
        let generator = std::env::var("CAD_GENERATOR")
            .map(|v| v.parse().unwrap_or_else(|e: String| panic!("{e}")))
            .unwrap_or_default();
        let converter = std::env::var("CAD_CONVERTER")
            .map(|v| v.parse().unwrap_or_else(|e: String| panic!("{e}")))
            .unwrap_or_default();

        Self {
            generator,
            converter,
            llm: LlmConfig::from_env(),
        }
    }
}
