use std::error::Error as StdError;
use std::io;
use std::path::PathBuf;

use crate::config::ConfigIssue;
use crate::stage::ShaderStage;

/// Failure to produce a usable [`ShaderProgram`](crate::ShaderProgram).
#[derive(Debug, thiserror::Error)]
pub enum ShaderError {
    /// Rejected before any GPU object was created.
    #[error("shader configuration is not valid: {}", join_issues(.issues))]
    InvalidConfiguration { issues: Vec<ConfigIssue> },
    /// Validation passed but loading, compiling or linking did not.
    #[error("could not create shader program")]
    Build(#[from] BuildError),
}

/// The underlying cause of a [`ShaderError::Build`].
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("could not load {stage} shader source from '{}'", path.display())]
    SourceLoad {
        stage: ShaderStage,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("could not compile {stage} shader: {log}\nsubmitted source:\n{source_text}")]
    StageCompile {
        stage: ShaderStage,
        log: String,
        source_text: String,
    },
    #[error("could not link shader program: {log}")]
    ProgramLink { log: String },
    #[error("could not allocate {object}: {message}")]
    Allocation {
        object: &'static str,
        message: String,
    },
}

fn join_issues(issues: &[ConfigIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ShaderError {
    /// The wrapped build failure, if construction got past validation.
    pub fn build_error(&self) -> Option<&BuildError> {
        match self {
            ShaderError::Build(inner) => Some(inner),
            ShaderError::InvalidConfiguration { .. } => None,
        }
    }

    /// Walks this error and every nested cause, outermost first.
    pub fn chain(&self) -> impl Iterator<Item = &(dyn StdError + 'static)> {
        std::iter::successors(Some(self as &(dyn StdError + 'static)), |err| {
            (*err).source()
        })
    }

    /// The innermost cause (an `io::Error` for load failures).
    pub fn root_cause(&self) -> &(dyn StdError + 'static) {
        self.chain()
            .last()
            .unwrap_or(self as &(dyn StdError + 'static))
    }

    /// Renders the cause chain with one indented line group per level.
    pub fn report(&self) -> String {
        let mut out = String::new();
        for (depth, err) in self.chain().enumerate() {
            let indent = " ".repeat(depth * 2);
            for line in err.to_string().lines() {
                out.push_str(&indent);
                out.push_str(line);
                out.push('\n');
            }
        }
        out
    }
}

impl BuildError {
    /// The stage that failed, when the failure belongs to a single stage.
    pub fn stage(&self) -> Option<ShaderStage> {
        match self {
            BuildError::SourceLoad { stage, .. } | BuildError::StageCompile { stage, .. } => {
                Some(*stage)
            }
            BuildError::ProgramLink { .. } | BuildError::Allocation { .. } => None,
        }
    }
}
