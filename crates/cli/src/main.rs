use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;
use surfdist::distance::{
    calculate_surface_metrics_with, surface_distances_with, CancelToken, Completion,
    HausdorffWitness, LogProgress, SurfaceDistances, SymmetricReport,
};
use surfdist::rand3::{cube_grid, jittered_sphere, ReplayToken, SphereCfg};
use surfdist::{ExecutionMode, Mesh, ScanCfg, Vec3};
use tracing_subscriber::fmt::SubscriberBuilder;

mod mesh_io;
mod provenance;
mod tables;

use provenance::Payload;
use tables::{CaseRow, CaseEntry};

#[derive(Parser)]
#[command(name = "surfdist")]
#[command(about = "Surface-distance metrics between segmentation meshes")]
struct Cmd {
    /// Optional run label; propagated to outputs and logs
    #[arg(long, global = true)]
    tag: Option<String>,

    #[command(flatten)]
    sched: SchedArgs,

    #[command(subcommand)]
    action: Action,
}

/// Scheduling flags shared by every scanning subcommand.
#[derive(Args, Debug, Clone, Default)]
struct SchedArgs {
    /// Never use the worker pool
    #[arg(long, global = true, conflicts_with = "parallel")]
    sequential: bool,
    /// Use the worker pool even for small meshes
    #[arg(long, global = true)]
    parallel: bool,
    /// Cap on pool threads (default 20)
    #[arg(long, global = true)]
    max_workers: Option<usize>,
    /// Scan both directions at the same time
    #[arg(long, global = true)]
    concurrent_directions: bool,
    /// Cancel running scans after this many seconds; results are partial
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,
}

#[derive(Subcommand)]
enum Action {
    /// Symmetric MASD / HD between a reference and a candidate mesh
    Metrics {
        #[arg(long)]
        reference: PathBuf,
        #[arg(long)]
        candidate: PathBuf,
        /// JSON output; printed to stdout when omitted
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// One-directional per-vertex distance field (CSV or Parquet)
    Distances {
        #[arg(long)]
        source: PathBuf,
        #[arg(long)]
        target: PathBuf,
        #[arg(long)]
        out: PathBuf,
        /// Initial search cap; vertices farther than this report the cap
        #[arg(long)]
        max_dist: Option<f64>,
    },
    /// Metrics for every `case,reference,candidate` row of a manifest
    Batch {
        #[arg(long)]
        manifest: PathBuf,
        #[arg(long)]
        out: PathBuf,
    },
    /// Write a reference/candidate fixture pair and a one-row manifest
    Synth {
        #[arg(long)]
        out_dir: PathBuf,
        #[arg(long, value_enum, default_value_t = Shape::Cube)]
        shape: Shape,
        /// Shift of the candidate along +x
        #[arg(long, default_value_t = 1.0)]
        offset: f64,
        /// Cube: grid cells per face edge. Sphere: rings (segments = 4/3 rings).
        #[arg(long, default_value_t = 1)]
        resolution: usize,
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
    /// Print a small provenance JSON block
    Report,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Shape {
    Cube,
    Sphere,
}

/// What every handler needs besides its own arguments.
struct Ctx {
    cfg: ScanCfg,
    cancel: CancelToken,
    tag: Option<String>,
}

impl SchedArgs {
    fn scan_cfg(&self) -> ScanCfg {
        let mut cfg = ScanCfg::default();
        if self.sequential {
            cfg.mode = ExecutionMode::Sequential;
        } else if self.parallel {
            cfg.mode = ExecutionMode::Parallel;
        }
        if let Some(w) = self.max_workers {
            cfg.max_workers = w.max(1);
        }
        cfg.concurrent_directions = self.concurrent_directions;
        cfg
    }

    /// A fresh token, cancelled by a watchdog thread when `--timeout-secs` is set.
    fn cancel_token(&self) -> CancelToken {
        let token = CancelToken::new();
        if let Some(secs) = self.timeout_secs {
            let watched = token.clone();
            thread::spawn(move || {
                thread::sleep(Duration::from_secs(secs));
                if !watched.is_cancelled() {
                    tracing::warn!(secs, "timeout reached; cancelling scans");
                    watched.cancel();
                }
            });
        }
        token
    }

    fn params(&self) -> serde_json::Value {
        let cfg = self.scan_cfg();
        json!({
            "mode": format!("{:?}", cfg.mode),
            "max_workers": cfg.max_workers,
            "concurrent_directions": cfg.concurrent_directions,
            "timeout_secs": self.timeout_secs,
        })
    }
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    let ctx = Ctx {
        cfg: cmd.sched.scan_cfg(),
        cancel: cmd.sched.cancel_token(),
        tag: cmd.tag.clone(),
    };
    match cmd.action {
        Action::Metrics {
            reference,
            candidate,
            out,
        } => metrics(&ctx, &cmd.sched, &reference, &candidate, out.as_deref()),
        Action::Distances {
            source,
            target,
            out,
            max_dist,
        } => distances(&ctx, &cmd.sched, &source, &target, &out, max_dist),
        Action::Batch { manifest, out } => batch(&ctx, &cmd.sched, &manifest, &out),
        Action::Synth {
            out_dir,
            shape,
            offset,
            resolution,
            seed,
        } => synth(&out_dir, shape, offset, resolution, seed).map(|_| ()),
        Action::Report => report(&cmd.sched, cmd.tag),
    }
}

#[derive(Debug, Serialize)]
struct WitnessDoc {
    source: [f64; 3],
    target: Option<[f64; 3]>,
}

#[derive(Debug, Serialize)]
struct DirectionDoc {
    vertices_processed: usize,
    vertices_total: usize,
    mean: f64,
    max: f64,
    witness: Option<WitnessDoc>,
}

#[derive(Debug, Serialize)]
struct MetricsDoc {
    reference: String,
    candidate: String,
    avg_symm_surface_dist: f64,
    hausdorff_dist: f64,
    complete: bool,
    tag: Option<String>,
    forward: DirectionDoc,
    backward: DirectionDoc,
}

fn arr(v: &Vec3) -> [f64; 3] {
    [v.x, v.y, v.z]
}

fn counts(d: &SurfaceDistances) -> (usize, usize) {
    match d.completion {
        Completion::Finished => (d.distances.len(), d.distances.len()),
        Completion::Cancelled { processed, total } => (processed, total),
    }
}

impl From<&SurfaceDistances> for DirectionDoc {
    fn from(d: &SurfaceDistances) -> Self {
        let (vertices_processed, vertices_total) = counts(d);
        Self {
            vertices_processed,
            vertices_total,
            mean: d.mean,
            max: d.max,
            witness: d.witness.as_ref().map(|w: &HausdorffWitness| WitnessDoc {
                source: arr(&w.source),
                target: w.target.as_ref().map(arr),
            }),
        }
    }
}

fn load_pair(reference: &Path, candidate: &Path) -> Result<(Mesh, Mesh)> {
    Ok((mesh_io::load_mesh(reference)?, mesh_io::load_mesh(candidate)?))
}

fn log_report(case: &str, report: &SymmetricReport) {
    match report.completion() {
        Completion::Finished => tracing::info!(
            case,
            assd = report.metrics.avg_symm_surface_dist,
            hd = report.metrics.hausdorff_dist,
            "metrics"
        ),
        Completion::Cancelled { processed, total } => tracing::warn!(
            case,
            processed,
            total,
            assd = report.metrics.avg_symm_surface_dist,
            hd = report.metrics.hausdorff_dist,
            "metrics are partial"
        ),
    }
}

fn metrics(
    ctx: &Ctx,
    sched: &SchedArgs,
    reference: &Path,
    candidate: &Path,
    out: Option<&Path>,
) -> Result<()> {
    let doc = metrics_doc(ctx, reference, candidate)?;
    let text = serde_json::to_string_pretty(&doc)?;
    match out {
        None => println!("{text}"),
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
            fs::write(path, text).with_context(|| format!("writing {}", path.display()))?;
            let payload = Payload::new(sched.params())
                .with_inputs([doc.reference, doc.candidate])
                .with_tag(ctx.tag.clone());
            provenance::write_sidecar(path, payload)?;
        }
    }
    Ok(())
}

fn metrics_doc(ctx: &Ctx, reference: &Path, candidate: &Path) -> Result<MetricsDoc> {
    let (a, b) = load_pair(reference, candidate)?;
    let report = calculate_surface_metrics_with(&a, &b, &ctx.cfg, &ctx.cancel);
    log_report(&reference.display().to_string(), &report);
    Ok(MetricsDoc {
        reference: reference.display().to_string(),
        candidate: candidate.display().to_string(),
        avg_symm_surface_dist: report.metrics.avg_symm_surface_dist,
        hausdorff_dist: report.metrics.hausdorff_dist,
        complete: report.completion().is_finished(),
        tag: ctx.tag.clone(),
        forward: DirectionDoc::from(&report.forward),
        backward: DirectionDoc::from(&report.backward),
    })
}

fn distances(
    ctx: &Ctx,
    sched: &SchedArgs,
    source: &Path,
    target: &Path,
    out: &Path,
    max_dist: Option<f64>,
) -> Result<()> {
    let max_dist = max_dist.unwrap_or(f64::INFINITY);
    if max_dist.is_nan() || max_dist < 0.0 {
        bail!("--max-dist must be non-negative, got {max_dist}");
    }
    let (src, tgt) = load_pair(source, target)?;
    let mut progress = LogProgress::new(source.display().to_string());
    let field = surface_distances_with(&src, &tgt, max_dist, &ctx.cfg, &ctx.cancel, &mut progress);
    let (processed, total) = counts(&field);
    tracing::info!(
        processed,
        total,
        mean = field.mean,
        max = field.max,
        "distance field"
    );
    let mut df = tables::distances_frame(&field.distances)?;
    tables::write_table(out, &mut df)?;
    let mut params = sched.params();
    params["max_dist"] = json!(if max_dist.is_finite() { Some(max_dist) } else { None });
    params["mean"] = json!(field.mean);
    params["max"] = json!(field.max);
    params["complete"] = json!(field.completion.is_finished());
    let payload = Payload::new(params)
        .with_inputs([source.display().to_string(), target.display().to_string()])
        .with_tag(ctx.tag.clone());
    provenance::write_sidecar(out, payload)?;
    Ok(())
}

fn batch(ctx: &Ctx, sched: &SchedArgs, manifest: &Path, out: &Path) -> Result<()> {
    let entries = tables::read_manifest(manifest)?;
    let rows = batch_rows(ctx, &entries);
    tracing::info!(cases = entries.len(), analysed = rows.len(), "batch done");
    let mut df = tables::cases_frame(&rows)?;
    tables::write_table(out, &mut df)?;
    let payload = Payload::new(sched.params())
        .with_inputs([manifest.display().to_string()])
        .with_tag(ctx.tag.clone());
    provenance::write_sidecar(out, payload)?;
    Ok(())
}

/// Cases that fail to load are logged and skipped. Once the token is
/// cancelled, remaining cases are not started.
fn batch_rows(ctx: &Ctx, entries: &[CaseEntry]) -> Vec<CaseRow> {
    let mut rows = Vec::with_capacity(entries.len());
    for entry in entries {
        if ctx.cancel.is_cancelled() {
            tracing::warn!(case = %entry.case, "cancelled; skipping remaining cases");
            break;
        }
        let (a, b) = match load_pair(&entry.reference, &entry.candidate) {
            Ok(pair) => pair,
            Err(err) => {
                tracing::warn!(case = %entry.case, error = %format!("{err:#}"), "skipping case");
                continue;
            }
        };
        let report = calculate_surface_metrics_with(&a, &b, &ctx.cfg, &ctx.cancel);
        log_report(&entry.case, &report);
        rows.push(CaseRow {
            case: entry.case.clone(),
            reference_vertices: a.vertex_count() as u64,
            candidate_vertices: b.vertex_count() as u64,
            assd: report.metrics.avg_symm_surface_dist,
            hd: report.metrics.hausdorff_dist,
            complete: report.completion().is_finished(),
        });
    }
    rows
}

/// Returns the manifest path.
fn synth(out_dir: &Path, shape: Shape, offset: f64, resolution: usize, seed: u64) -> Result<PathBuf> {
    if !offset.is_finite() {
        bail!("--offset must be finite, got {offset}");
    }
    let shift = Vec3::new(offset, 0.0, 0.0);
    let (reference, candidate) = match shape {
        Shape::Cube => {
            let r = cube_grid(Vec3::zeros(), 2.0, resolution);
            let c = r.translated(shift);
            (r, c)
        }
        Shape::Sphere => {
            let rings = resolution.max(2);
            let cfg = SphereCfg {
                rings,
                segments: (rings * 4 / 3).max(3),
                ..SphereCfg::default()
            };
            let r = jittered_sphere(cfg, ReplayToken { seed, index: 0 })?;
            let c = jittered_sphere(
                SphereCfg {
                    center: cfg.center + shift,
                    ..cfg
                },
                ReplayToken { seed, index: 1 },
            )?;
            (r, c)
        }
    };
    mesh_io::save_mesh(&out_dir.join("reference.json"), &reference)?;
    mesh_io::save_mesh(&out_dir.join("candidate.json"), &candidate)?;
    let manifest = out_dir.join("cases.csv");
    let mut df = polars::df!(
        "case" => ["synth"],
        "reference" => ["reference.json"],
        "candidate" => ["candidate.json"]
    )?;
    tables::write_table(&manifest, &mut df)?;
    tracing::info!(
        ?shape,
        vertices = reference.vertex_count(),
        dir = %out_dir.display(),
        "fixture written"
    );
    Ok(manifest)
}

fn report(sched: &SchedArgs, tag: Option<String>) -> Result<()> {
    let obj = json!({
        "code_rev": provenance::current_git_rev(),
        "engine": surfdist::VERSION,
        "tag": tag,
        "params": sched.params(),
        "outputs": []
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}
