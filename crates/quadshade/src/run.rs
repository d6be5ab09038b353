use anyhow::{bail, Context, Result};
use pipeconfig::Manifest;
use tracing_subscriber::EnvFilter;

use crate::cli::{CheckArgs, ListArgs};
use crate::report::CheckReport;

pub fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

pub fn check(args: CheckArgs) -> Result<()> {
    let (program, config) = match &args.manifest {
        Some(path) => {
            let manifest = Manifest::load(path)
                .with_context(|| format!("failed to load manifest {}", path.display()))?;
            let (name, entry) = manifest.select(args.program.as_deref())?;
            tracing::debug!(
                manifest = %path.display(),
                program = name,
                base = %manifest.base_dir().display(),
                "checking manifest program"
            );
            (Some(name.to_string()), entry.configuration(manifest.base_dir()))
        }
        None => {
            if args.stages.is_empty() {
                bail!("pass --manifest or at least --vertex and --fragment");
            }
            (None, args.stages.to_configuration())
        }
    };

    let report = CheckReport::new(program, &config);
    if args.json {
        let json = serde_json::to_string_pretty(&report).context("failed to encode report")?;
        println!("{json}");
    } else {
        print!("{}", report.render_text());
    }

    if !report.valid {
        bail!(
            "shader configuration is not valid ({} issue(s))",
            report.issues.len()
        );
    }
    Ok(())
}

pub fn list(args: ListArgs) -> Result<()> {
    let manifest = Manifest::load(&args.manifest)
        .with_context(|| format!("failed to load manifest {}", args.manifest.display()))?;

    for (name, entry) in &manifest.programs {
        let marker = if manifest.default.as_deref() == Some(name.as_str()) {
            "*"
        } else {
            " "
        };
        let stages: Vec<&str> = entry.stages.stages().map(|(stage, _)| stage.key()).collect();
        println!(
            "{marker} {name:<20} stages={} uniforms={}",
            stages.join(","),
            entry.uniforms.len()
        );
    }
    Ok(())
}
