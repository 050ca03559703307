use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use geokernel::OracleCfg;
use std::path::Path;
use tracing_subscriber::fmt::SubscriberBuilder;
use tracing_subscriber::EnvFilter;

mod provenance;
mod scene;

#[derive(Parser)]
#[command(name = "geokernel")]
#[command(about = "Evaluate exact plane-geometry scenes")]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Evaluate a JSON scene; print results, or write them to --out with a provenance sidecar
    Eval {
        #[arg(long)]
        input: String,
        #[arg(long)]
        out: Option<String>,
        /// Refinement rounds before a sign is reported as indeterminate
        #[arg(long, default_value_t = OracleCfg::default().max_rounds)]
        max_rounds: u32,
    },
    /// Print a small provenance JSON block
    Report,
}

fn main() -> Result<()> {
    SubscriberBuilder::default()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env())
        .init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Eval {
            input,
            out,
            max_rounds,
        } => eval(input, out, max_rounds),
        Action::Report => report(),
    }
}

fn eval(input: String, out: Option<String>, max_rounds: u32) -> Result<()> {
    tracing::info!(input, out = ?out, max_rounds, "eval");
    let text = std::fs::read_to_string(&input).with_context(|| format!("reading {input}"))?;
    let parsed: scene::Scene =
        serde_json::from_str(&text).with_context(|| format!("parsing scene {input}"))?;
    let cfg = OracleCfg {
        max_rounds,
        ..OracleCfg::default()
    };
    let (objects, queries) = (parsed.objects.len(), parsed.queries.len());
    let results = scene::evaluate(&parsed, &cfg)?;
    tracing::info!(objects, queries, "scene evaluated");
    let doc = serde_json::to_vec_pretty(&results)?;

    let Some(out) = out else {
        println!("{}", String::from_utf8_lossy(&doc));
        return Ok(());
    };
    let out_path = Path::new(&out);
    if let Some(parent) = out_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(out_path, &doc).with_context(|| format!("writing {out}"))?;
    let payload = provenance::Payload::new(serde_json::json!({
        "input": &input,
        "max_rounds": max_rounds,
        "objects": objects,
        "queries": queries,
    }))
    .with_inputs(vec![input.clone()]);
    let sidecar = provenance::write_sidecar(out_path, payload)?;
    tracing::info!(sidecar = %sidecar.display(), "provenance written");
    Ok(())
}

fn report() -> Result<()> {
    let obj = serde_json::json!({
        "code_rev": provenance::current_git_rev(),
        "kernel_version": geokernel::VERSION,
        "oracle": OracleCfg::default(),
        "inputs": [],
        "params": {},
        "outputs": []
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}
