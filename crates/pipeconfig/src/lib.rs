//! TOML manifests naming the shader programs an application builds.
//!
//! ```toml
//! version = 1
//! default = "output"
//!
//! [programs.output]
//! vertex = "shader.vert"
//! fragment = "shader.frag"
//!
//! [programs.output.uniforms]
//! yTex = 0
//! tint = [1.0, 1.0, 1.0, 1.0]
//! ```
//!
//! Stage paths are relative to the manifest's directory when loaded with
//! [`Manifest::load`]. Uniform values are integers, floats, or float arrays of
//! 1–4 or 16 components (the latter a column-major `mat4`).

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use glshader::{ShaderConfiguration, UniformValue};
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read manifest {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse manifest: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid manifest: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Manifest {
    pub version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(default)]
    pub programs: BTreeMap<String, ProgramEntry>,
    /// Directory stage paths are resolved against; empty for in-memory manifests.
    #[serde(skip)]
    base_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProgramEntry {
    #[serde(flatten)]
    pub stages: ShaderConfiguration,
    #[serde(default)]
    pub uniforms: BTreeMap<String, UniformSetting>,
    /// Keys that name no stage, kept so validation can reject them.
    #[serde(flatten)]
    unrecognised: BTreeMap<String, toml::Value>,
}

/// A uniform value as written in TOML.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum UniformSetting {
    Int(i64),
    Float(f64),
    Floats(Vec<f64>),
}

impl UniformSetting {
    pub fn to_value(&self) -> Result<UniformValue, String> {
        match self {
            UniformSetting::Int(value) => i32::try_from(*value)
                .map(UniformValue::Int)
                .map_err(|_| format!("integer {value} does not fit in a GLSL int")),
            UniformSetting::Float(value) => Ok(UniformValue::Float(*value as f32)),
            UniformSetting::Floats(values) => {
                let floats: Vec<f32> = values.iter().map(|v| *v as f32).collect();
                UniformValue::from_floats(&floats).ok_or_else(|| {
                    format!(
                        "array of {} floats is not a vec2/vec3/vec4/mat4",
                        values.len()
                    )
                })
            }
        }
    }
}

impl ProgramEntry {
    /// The stage configuration with relative paths rooted at `base`.
    pub fn configuration(&self, base: &Path) -> ShaderConfiguration {
        self.stages.clone().relative_to(base)
    }

    /// Uniforms to upload right after the program is built, sorted by name.
    pub fn initial_uniforms(&self) -> Result<Vec<(String, UniformValue)>, ConfigError> {
        self.uniforms
            .iter()
            .map(|(name, setting)| {
                setting
                    .to_value()
                    .map(|value| (name.clone(), value))
                    .map_err(|reason| ConfigError::Invalid(format!("uniform '{name}': {reason}")))
            })
            .collect()
    }
}

impl Manifest {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let raw: Manifest = toml::from_str(input)?;
        raw.validate()?;
        Ok(raw)
    }

    /// Reads and validates a manifest file; stage paths resolve against its
    /// parent directory.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut manifest = Self::from_toml_str(&text)?;
        manifest.base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Ok(manifest)
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn program(&self, name: &str) -> Option<&ProgramEntry> {
        self.programs.get(name)
    }

    /// The named program, or the default when `name` is `None`.
    ///
    /// Without an explicit default a manifest holding exactly one program
    /// selects it.
    pub fn select(&self, name: Option<&str>) -> Result<(&str, &ProgramEntry), ConfigError> {
        let name = match name.or(self.default.as_deref()) {
            Some(name) => name,
            None if self.programs.len() == 1 => self
                .programs
                .keys()
                .next()
                .map(String::as_str)
                .unwrap_or_default(),
            None => {
                return Err(ConfigError::Invalid(
                    "manifest declares several programs but no default; pick one by name".into(),
                ))
            }
        };
        self.programs
            .get_key_value(name)
            .map(|(key, entry)| (key.as_str(), entry))
            .ok_or_else(|| ConfigError::Invalid(format!("unknown program '{name}'")))
    }

    /// Resolved stage configuration for the program called `name`.
    pub fn configuration(&self, name: &str) -> Option<ShaderConfiguration> {
        self.program(name)
            .map(|entry| entry.configuration(&self.base_dir))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version != 1 {
            return Err(ConfigError::Invalid(format!(
                "unsupported manifest version {}; expected 1",
                self.version
            )));
        }
        if self.programs.is_empty() {
            return Err(ConfigError::Invalid(
                "manifest must define at least one program".into(),
            ));
        }
        for (name, entry) in &self.programs {
            if name.trim().is_empty() {
                return Err(ConfigError::Invalid("program name may not be empty".into()));
            }
            if !entry.unrecognised.is_empty() {
                let keys: Vec<_> = entry
                    .unrecognised
                    .keys()
                    .map(|key| format!("'{key}'"))
                    .collect();
                return Err(ConfigError::Invalid(format!(
                    "program '{name}' has unknown key(s) {}; expected stage keys {}",
                    keys.join(", "),
                    glshader::ShaderStage::ALL.map(|stage| stage.key()).join(", ")
                )));
            }
            for stage in glshader::ShaderStage::ALL
                .into_iter()
                .filter(|stage| stage.is_mandatory())
            {
                if entry.stages.stage(stage).is_none() {
                    return Err(ConfigError::Invalid(format!(
                        "program '{name}' must set '{}'",
                        stage.key()
                    )));
                }
            }
            for uniform in entry.uniforms.keys() {
                if uniform.trim().is_empty() {
                    return Err(ConfigError::Invalid(format!(
                        "program '{name}' has a uniform with an empty name"
                    )));
                }
            }
            entry.initial_uniforms().map_err(|err| match err {
                ConfigError::Invalid(reason) => {
                    ConfigError::Invalid(format!("program '{name}' {reason}"))
                }
                other => other,
            })?;
        }
        if let Some(default) = &self.default {
            if !self.programs.contains_key(default) {
                return Err(ConfigError::Invalid(format!(
                    "default references unknown program '{default}'"
                )));
            }
        }
        Ok(())
    }
}
