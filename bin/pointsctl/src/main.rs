use anyhow::{bail, Context};
use tracing::info;
use tracing_subscriber::EnvFilter;

use common::{AwardContext, Config, GraphFormat, PointAward};
use strategy::config::VariableFileConfig;
use strategy::registry::builtin_modules;
use strategy::StrategyCatalog;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── Logging ──────────────────────────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    // ── Config ───────────────────────────────────────────────────────────────
    let cfg = Config::from_env();
    let catalog = StrategyCatalog::with_modules(builtin_modules(), cfg.contract_debug);

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        None | Some("list") => list(&catalog),
        Some("simulate") => {
            let id = args
                .get(1)
                .context("usage: pointsctl simulate <strategy-id>")?;
            simulate(&catalog, &cfg, id).await
        }
        Some("graph") => {
            let id = args.get(1).context("usage: pointsctl graph <strategy-id>")?;
            graph(&catalog, id)
        }
        Some(other) => bail!("unknown command '{other}' (expected list, simulate, graph)"),
    }
}

fn list(catalog: &StrategyCatalog) -> anyhow::Result<()> {
    let all = catalog.list_all()?;
    info!(count = all.len(), "Strategy catalog");
    for summary in all {
        println!("{} v{} — {}", summary.id, summary.version, summary.name);
        for (name, value) in &summary.variables {
            println!("    {name} = {value}");
        }
    }
    Ok(())
}

/// Dry-run one strategy against a demo context: a 5x5 equity grid with a
/// cold corner, completed 30 minutes after creation.
async fn simulate(catalog: &StrategyCatalog, cfg: &Config, id: &str) -> anyhow::Result<()> {
    let mut strat = catalog.get_class_by_id(id)?;

    if let Some(path) = &cfg.strategy_vars_path {
        let overrides = VariableFileConfig::load(path)?;
        overrides.apply(strat.as_mut());
    }

    let mut ctx = AwardContext::timed("demo-user", "demo-task", 10.0, chrono::Utc::now(), 30.0);
    let mut grid = vec![vec![10.0; 5]; 5];
    grid[0][0] = 0.0;
    grid[0][1] = 0.0;
    grid[1][0] = 0.0;
    ctx.equity_grid = Some(grid);
    ctx.region = Some((0, 0));

    let points = strat.simulate(&ctx)?;
    let descriptor = strat.descriptor();
    // The record a real caller would persist alongside the award.
    let award = PointAward::record(&descriptor.id, &descriptor.hash_version, points, &ctx);
    println!("strategy:     {} v{}", descriptor.name, descriptor.version);
    println!("hash_version: {}", descriptor.hash_version);
    println!("award:        {points} (record {})", award.id);
    Ok(())
}

fn graph(catalog: &StrategyCatalog, id: &str) -> anyhow::Result<()> {
    let strat = catalog.get_class_by_id(id)?;
    println!("{}", strat.logic_graph(GraphFormat::Mermaid));
    Ok(())
}
