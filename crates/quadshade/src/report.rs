use std::fmt::Write as _;

use glshader::{ShaderConfiguration, ShaderStage};
use serde::Serialize;

/// Outcome of checking one shader configuration.
#[derive(Debug, Serialize)]
pub struct CheckReport {
    pub program: Option<String>,
    pub valid: bool,
    pub stages: Vec<StageReport>,
    pub issues: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct StageReport {
    pub stage: &'static str,
    pub path: Option<String>,
    pub present: bool,
}

impl CheckReport {
    pub fn new(program: Option<String>, config: &ShaderConfiguration) -> Self {
        let issues: Vec<String> = config.validate().iter().map(ToString::to_string).collect();
        let stages = ShaderStage::ALL
            .into_iter()
            .map(|stage| StageReport {
                stage: stage.key(),
                path: config.stage(stage).map(|path| path.display().to_string()),
                present: config.has_stage(stage),
            })
            .collect();
        Self {
            program,
            valid: issues.is_empty(),
            stages,
            issues,
        }
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();
        if let Some(program) = &self.program {
            let _ = writeln!(out, "program: {program}");
        }
        for stage in &self.stages {
            let status = match (&stage.path, stage.present) {
                (None, _) => "unset",
                (Some(_), true) => "ok",
                (Some(_), false) => "missing",
            };
            let _ = writeln!(
                out,
                "  {:<16} {:<8} {}",
                stage.stage,
                status,
                stage.path.as_deref().unwrap_or("-")
            );
        }
        let _ = writeln!(
            out,
            "status: {}",
            if self.valid { "valid" } else { "invalid" }
        );
        for issue in &self.issues {
            let _ = writeln!(out, "  - {issue}");
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn report_marks_present_missing_and_unset_stages() {
        let dir = TempDir::new().unwrap();
        let vertex = dir.path().join("ok.vert");
        let fragment = dir.path().join("ok.frag");
        fs::write(&vertex, "void main() {}").unwrap();
        fs::write(&fragment, "void main() {}").unwrap();
        let config = ShaderConfiguration::new(&vertex, &fragment)
            .with_geometry(dir.path().join("nope.geom"));

        let report = CheckReport::new(Some("output".into()), &config);
        assert!(!report.valid);
        assert_eq!(report.issues.len(), 1);

        let text = report.render_text();
        assert!(text.starts_with("program: output\n"));
        assert!(text.contains("vertex           ok"));
        assert!(text.contains("geometry         missing"));
        assert!(text.contains("compute          unset"));
        assert!(text.contains("status: invalid"));
    }
}
