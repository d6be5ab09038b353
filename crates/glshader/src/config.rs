//! Describes where each shader stage's source lives.
//!
//! `ShaderConfiguration` is a plain value: it never reads shader sources and
//! never caches filesystem state. Every presence or validity query stats the
//! declared paths again, so a configuration may be built before its files
//! exist and checked later.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::stage::{ShaderStage, STAGE_COUNT};

/// Stage source locators for one shader program.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "StageTable", into = "StageTable")]
pub struct ShaderConfiguration {
    locations: [Option<PathBuf>; STAGE_COUNT],
}

/// Why a configuration cannot be built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigIssue {
    /// A mandatory stage has no locator.
    Missing(ShaderStage),
    /// A declared locator does not point at anything on disk.
    Unresolvable { stage: ShaderStage, path: PathBuf },
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigIssue::Missing(stage) => write!(f, "{stage} shader is required but not set"),
            ConfigIssue::Unresolvable { stage, path } => {
                write!(f, "{stage} shader '{}' does not exist", path.display())
            }
        }
    }
}

impl ShaderConfiguration {
    /// Minimal configuration with only the mandatory stages.
    pub fn new(vertex: impl Into<PathBuf>, fragment: impl Into<PathBuf>) -> Self {
        Self::default()
            .with_stage(ShaderStage::Vertex, vertex)
            .with_stage(ShaderStage::Fragment, fragment)
    }

    /// Sets the locator for `stage`. An empty path leaves the stage unset.
    pub fn with_stage(mut self, stage: ShaderStage, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        self.locations[stage.index()] = if path.as_os_str().is_empty() {
            None
        } else {
            Some(path)
        };
        self
    }

    pub fn with_geometry(self, path: impl Into<PathBuf>) -> Self {
        self.with_stage(ShaderStage::Geometry, path)
    }

    pub fn with_tess_control(self, path: impl Into<PathBuf>) -> Self {
        self.with_stage(ShaderStage::TessControl, path)
    }

    pub fn with_tess_evaluation(self, path: impl Into<PathBuf>) -> Self {
        self.with_stage(ShaderStage::TessEvaluation, path)
    }

    pub fn with_compute(self, path: impl Into<PathBuf>) -> Self {
        self.with_stage(ShaderStage::Compute, path)
    }

    /// Re-roots relative locators under `base`. Absolute locators are kept.
    pub fn relative_to(mut self, base: &Path) -> Self {
        for path in self.locations.iter_mut().flatten() {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
        self
    }

    /// The declared locator for `stage`, if any.
    pub fn stage(&self, stage: ShaderStage) -> Option<&Path> {
        self.locations[stage.index()].as_deref()
    }

    /// Declared locators in pipeline order, whether or not they resolve.
    pub fn stages(&self) -> impl Iterator<Item = (ShaderStage, &Path)> + '_ {
        ShaderStage::ALL
            .into_iter()
            .filter_map(move |stage| self.stage(stage).map(|path| (stage, path)))
    }

    /// True when `stage` is declared and its file currently exists.
    pub fn has_stage(&self, stage: ShaderStage) -> bool {
        self.stage(stage).is_some_and(Path::exists)
    }

    /// Stages that are declared and resolvable, in pipeline order.
    pub fn present_stages(&self) -> Vec<ShaderStage> {
        ShaderStage::ALL
            .into_iter()
            .filter(|stage| self.has_stage(*stage))
            .collect()
    }

    pub fn has_geometry_shader(&self) -> bool {
        self.has_stage(ShaderStage::Geometry)
    }

    pub fn has_tess_control_shader(&self) -> bool {
        self.has_stage(ShaderStage::TessControl)
    }

    pub fn has_tess_evaluation_shader(&self) -> bool {
        self.has_stage(ShaderStage::TessEvaluation)
    }

    pub fn has_compute_shader(&self) -> bool {
        self.has_stage(ShaderStage::Compute)
    }

    /// Lists every reason this configuration cannot be built.
    ///
    /// Mandatory stages must be declared and resolvable. Optional stages may
    /// be left unset, but a declared optional stage that does not resolve is
    /// reported just like a broken mandatory one.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        for stage in ShaderStage::ALL {
            match self.stage(stage) {
                None if stage.is_mandatory() => issues.push(ConfigIssue::Missing(stage)),
                None => {}
                Some(path) if !path.exists() => issues.push(ConfigIssue::Unresolvable {
                    stage,
                    path: path.to_path_buf(),
                }),
                Some(_) => {}
            }
        }
        issues
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

/// Serialized form: one optional key per stage.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
struct StageTable {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    vertex: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    fragment: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    geometry: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tess_control: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tess_evaluation: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    compute: Option<PathBuf>,
}

impl From<StageTable> for ShaderConfiguration {
    fn from(table: StageTable) -> Self {
        let entries = [
            (ShaderStage::Vertex, table.vertex),
            (ShaderStage::Fragment, table.fragment),
            (ShaderStage::Geometry, table.geometry),
            (ShaderStage::TessControl, table.tess_control),
            (ShaderStage::TessEvaluation, table.tess_evaluation),
            (ShaderStage::Compute, table.compute),
        ];
        entries
            .into_iter()
            .fold(Self::default(), |config, (stage, path)| match path {
                Some(path) => config.with_stage(stage, path),
                None => config,
            })
    }
}

impl From<ShaderConfiguration> for StageTable {
    fn from(config: ShaderConfiguration) -> Self {
        let [vertex, fragment, geometry, tess_control, tess_evaluation, compute] =
            config.locations;
        Self {
            vertex,
            fragment,
            geometry,
            tess_control,
            tess_evaluation,
            compute,
        }
    }
}
