use std::path::{Path, PathBuf};
use std::process::ExitCode;

use section_lib::events::{CompileEvent, EventKind};
use section_lib::{AssemblyCompiler, CompilerSettings, SceneGroup};
use shared::AssemblyFile;

struct Args {
    model: PathBuf,
    settings: Option<PathBuf>,
    summary: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "section=info,section_lib=info".into()),
        )
        .init();

    let Some(args) = parse_args() else {
        eprintln!("usage: section --model <assembly.json> [--settings <settings.json>] [--summary]");
        return ExitCode::from(2);
    };

    let settings = match &args.settings {
        Some(path) => CompilerSettings::load(path),
        None => CompilerSettings::load_default(),
    };

    let file = match load_assembly(&args.model) {
        Ok(file) => file,
        Err(e) => {
            tracing::error!("{e}");
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(
        "Loaded assembly from {} ({} layers)",
        args.model.display(),
        file.layers.len()
    );

    let mut compiler = AssemblyCompiler::new(settings);
    compiler.subscribe(EventKind::Warning, |event| {
        if let CompileEvent::Warning(w) = event {
            eprintln!("warning: {w}");
        }
    });

    let scene = match compiler.build_file(&file) {
        Ok(scene) => scene,
        Err(_) => return ExitCode::FAILURE,
    };

    let output = if args.summary {
        Ok(summary(&scene))
    } else {
        serde_json::to_string_pretty(&scene)
    };
    match output {
        Ok(text) => {
            println!("{text}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("Failed to serialize scene: {e}");
            ExitCode::FAILURE
        }
    }
}

fn parse_args() -> Option<Args> {
    let args: Vec<String> = std::env::args().collect();
    let mut model = None;
    let mut settings = None;
    let mut summary = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--model" if i + 1 < args.len() => {
                model = Some(PathBuf::from(&args[i + 1]));
                i += 1;
            }
            "--settings" if i + 1 < args.len() => {
                settings = Some(PathBuf::from(&args[i + 1]));
                i += 1;
            }
            "--summary" => summary = true,
            other => {
                tracing::warn!("Ignoring unknown argument {other}");
            }
        }
        i += 1;
    }

    Some(Args {
        model: model?,
        settings,
        summary,
    })
}

fn load_assembly(path: &Path) -> Result<AssemblyFile, String> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read assembly file {}: {e}", path.display()))?;
    serde_json::from_str(&json)
        .map_err(|e| format!("Failed to parse assembly JSON from {}: {e}", path.display()))
}

fn summary(scene: &SceneGroup) -> String {
    let mut lines = Vec::new();
    for slot in &scene.slots {
        let solids = scene.layer(slot.index).map_or(0, |v| v.solid_count());
        lines.push(format!(
            "{:>3}  {:<24} z {:>9.2} .. {:>9.2}  ({} solids)",
            slot.index,
            slot.name,
            slot.start,
            slot.end(),
            solids
        ));
    }
    lines.push(format!(
        "total span {:.2}, {} solids, {} warnings",
        scene.span,
        scene.solid_count(),
        scene.warnings.len()
    ));
    lines.join("\n")
}
