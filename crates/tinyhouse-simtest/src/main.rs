//! Tiny-house Headless Sweep Harness
//!
//! Validates the layout generator and analytics pipeline, then runs a
//! ranked candidate sweep. Runs entirely in-process, with no renderer and
//! no network lookups (site data comes from bundled presets).
//!
//! Usage:
//!   cargo run -p tinyhouse-simtest
//!   cargo run -p tinyhouse-simtest -- --verbose --count 200 --top 5
//!   cargo run -p tinyhouse-simtest -- --site tropical-storm --json

use std::collections::HashSet;
use std::path::PathBuf;

use clap::Parser;

use tinyhouse_logic::analytics::compute_analytics;
use tinyhouse_logic::batch::{BatchConfig, BatchResult, RankMode, SeedPlan, Sweep};
use tinyhouse_logic::category::classify_room;
use tinyhouse_logic::climate::{Hazard, RiskLevel};
use tinyhouse_logic::layout::generate_layout;
use tinyhouse_logic::params::{randomize_params, validate_params, DesignParameters, ParamError};
use tinyhouse_logic::site::{parse_site_presets, Climate, SiteContext, SitePresets, Vegetation};
use tinyhouse_logic::tables::AnalyticsTables;

// ── Site presets (bundled sample contexts) ──────────────────────────────
const PRESETS_JSON: &str = include_str!("../../../data/site_presets.json");

// ── Options ─────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "tinyhouse-simtest")]
#[command(about = "Validate the tiny-house generator and run a ranked sweep")]
struct Options {
    /// Print every check, not just failures
    #[arg(long)]
    verbose: bool,

    /// Dump the best candidate as JSON after the report
    #[arg(long)]
    json: bool,

    /// Sweep size
    #[arg(long, default_value_t = 60)]
    count: usize,

    /// Candidates retained by the ranked sweep
    #[arg(long, default_value_t = 4)]
    top: usize,

    /// Base seed for the sweep
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Site preset used by the sweep
    #[arg(long, default_value = "pending")]
    site: String,

    /// JSON file overriding analytics tables
    #[arg(long)]
    tables: Option<PathBuf>,
}

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

impl TestResult {
    fn new(name: &str, passed: bool, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed,
            detail: detail.into(),
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let opts = Options::parse();

    let tables = match &opts.tables {
        Some(path) => match AnalyticsTables::load(path) {
            Ok(t) => {
                log::info!("Loaded analytics tables from {}", path.display());
                t
            }
            Err(e) => {
                eprintln!("error: failed to load tables from {}: {e}", path.display());
                std::process::exit(1);
            }
        },
        None => AnalyticsTables::default(),
    };

    println!("=== Tiny-House Sweep Harness ===\n");

    let mut results = Vec::new();

    // 1. Site presets
    let presets = validate_presets(&mut results);

    // 2. Parameter validation
    results.extend(validate_params_logic());

    // 3. Layout generator sweep
    results.extend(validate_layout_logic());

    // 4. Analytics across presets
    results.extend(validate_analytics(&tables, &presets));

    // 5. Climate risk monotonicity
    results.extend(validate_risk_logic(&tables));

    // 6. Ranked sweep
    let sweep = run_sweep(&opts, &tables, &presets, &mut results);

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || opts.verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if opts.json {
        if let Some(best) = sweep.as_ref().and_then(BatchResult::best) {
            match serde_json::to_string_pretty(best) {
                Ok(json) => println!("{json}"),
                Err(e) => eprintln!("error: failed to serialize best candidate: {e}"),
            }
        }
    }

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── 1. Site Presets ─────────────────────────────────────────────────────

fn validate_presets(results: &mut Vec<TestResult>) -> SitePresets {
    println!("--- Site Presets ---");

    let presets = match parse_site_presets(PRESETS_JSON) {
        Ok(p) => p,
        Err(e) => {
            results.push(TestResult::new(
                "presets_parse",
                false,
                format!("JSON parse error: {}", e),
            ));
            return SitePresets::new();
        }
    };

    results.push(TestResult::new(
        "presets_not_empty",
        presets.len() >= 3,
        format!("{} presets loaded", presets.len()),
    ));

    results.push(TestResult::new(
        "presets_include_pending",
        presets
            .get("pending")
            .is_some_and(|p| p.climate.is_none() && p.location.is_none()),
        "\"pending\" preset has no climate or location",
    ));

    let bad: Vec<&String> = presets
        .iter()
        .filter(|(_, site)| {
            site.climate.as_ref().is_some_and(|c| {
                ![c.temperature, c.precipitation, c.wind, c.humidity]
                    .iter()
                    .all(|v| v.is_finite())
                    || c.precipitation < 0.0
                    || !(0.0..=100.0).contains(&c.humidity)
            })
        })
        .map(|(name, _)| name)
        .collect();
    results.push(TestResult::new(
        "presets_climate_plausible",
        bad.is_empty(),
        if bad.is_empty() {
            "all preset climates are finite and in range".into()
        } else {
            format!("implausible climate in {:?}", bad)
        },
    ));

    presets
}

// ── 2. Parameters ───────────────────────────────────────────────────────

fn validate_params_logic() -> Vec<TestResult> {
    println!("--- Parameters ---");
    let mut results = Vec::new();

    let errors = validate_params(&DesignParameters::default());
    results.push(TestResult::new(
        "params_default_valid",
        errors.is_empty(),
        format!("{} errors on default parameters", errors.len()),
    ));

    let invalid: Vec<u64> = (0..500)
        .filter(|&seed| !validate_params(&randomize_params(seed)).is_empty())
        .collect();
    results.push(TestResult::new(
        "params_randomized_valid",
        invalid.is_empty(),
        format!("{} of 500 randomized parameter sets invalid", invalid.len()),
    ));

    let broken = DesignParameters {
        area: -5.0,
        floors: 0,
        budget: f64::NAN,
        ..Default::default()
    };
    let errors = validate_params(&broken);
    results.push(TestResult::new(
        "params_errors_reported",
        errors.contains(&ParamError::NoFloors) && errors.len() == 3,
        format!("{:?}", errors),
    ));

    results
}

// ── 3. Layout ───────────────────────────────────────────────────────────

fn validate_layout_logic() -> Vec<TestResult> {
    println!("--- Layout Generator ---");
    let mut results = Vec::new();
    let reference = DesignParameters::default();

    let scenario = generate_layout(42, &reference);
    let area = scenario.footprint.area();
    results.push(TestResult::new(
        "layout_reference_area",
        (area - 60.0).abs() < 0.01,
        format!(
            "seed 42 footprint {:.2} × {:.2} = {:.4} m²",
            scenario.footprint.width, scenario.footprint.length, area
        ),
    ));
    results.push(TestResult::new(
        "layout_reference_rooms",
        scenario.rooms.len() >= 4,
        format!("{} rooms packed", scenario.rooms.len()),
    ));

    let mut nondeterministic = 0;
    let mut area_drift = 0;
    let mut impure = 0;
    let mut glazing_out = 0;
    let mut footprints = HashSet::new();
    for seed in 0..300u32 {
        let params = randomize_params(seed as u64);
        let a = generate_layout(seed, &params);
        let b = generate_layout(seed, &params);
        if a.footprint != b.footprint
            || a.rooms != b.rooms
            || a.connectors != b.connectors
            || a.features != b.features
        {
            nondeterministic += 1;
        }
        if (a.footprint.area() - params.area).abs() > 1e-6 * params.area.max(1.0) {
            area_drift += 1;
        }
        impure += a
            .rooms
            .iter()
            .filter(|r| r.category != classify_room(&r.room_type))
            .count();
        if !(0.25..0.6).contains(&a.features.glazing_ratio) {
            glazing_out += 1;
        }
        let d = generate_layout(seed, &reference);
        footprints.insert(d.footprint.width.to_bits());
    }

    results.push(TestResult::new(
        "layout_deterministic",
        nondeterministic == 0,
        format!("{} of 300 seeds not reproducible", nondeterministic),
    ));
    results.push(TestResult::new(
        "layout_area_conserved",
        area_drift == 0,
        format!("{} of 300 footprints drift from target area", area_drift),
    ));
    results.push(TestResult::new(
        "layout_category_purity",
        impure == 0,
        format!("{} rooms with mismatched category", impure),
    ));
    results.push(TestResult::new(
        "layout_glazing_range",
        glazing_out == 0,
        format!("{} glazing ratios outside [0.25, 0.60)", glazing_out),
    ));
    results.push(TestResult::new(
        "layout_seed_variation",
        footprints.len() > 250,
        format!("{} distinct footprints from 300 seeds", footprints.len()),
    ));

    results
}

// ── 4. Analytics ────────────────────────────────────────────────────────

fn validate_analytics(tables: &AnalyticsTables, presets: &SitePresets) -> Vec<TestResult> {
    println!("--- Analytics ---");
    let mut results = Vec::new();

    let design = generate_layout(42, &DesignParameters::default());
    let a = compute_analytics(&design, None, tables);
    results.push(TestResult::new(
        "analytics_reference_market",
        a.market.pressure.label() == "Niche",
        format!("pressure {}", a.market.pressure.label()),
    ));
    results.push(TestResult::new(
        "analytics_reference_pending",
        a.risk.is_pending() && a.risk.risks[0].hazard.label() == "Data Pending",
        format!("risk score {:.2} ({})", a.risk.score, a.risk.label.label()),
    ));

    let mut sites: Vec<(&str, Option<&SiteContext>)> = vec![("none", None)];
    sites.extend(presets.iter().map(|(name, site)| (name.as_str(), Some(site))));

    for (name, site) in sites {
        let mut non_finite = 0;
        let mut out_of_range = 0;
        let mut score_sum = 0.0;
        for seed in 0..50u32 {
            let design = generate_layout(seed, &randomize_params(seed as u64 + 1000));
            let a = compute_analytics(&design, site, tables);
            let fields = [
                a.area_sqft,
                a.comfort_score,
                a.embodied_carbon,
                a.energy_use,
                a.build_cost,
                a.cost_per_sqft,
                a.market.sale_value,
                a.financial.total_project_cost,
                a.financial.net_margin,
                a.timeline.print_hours,
                a.roi,
            ];
            if !fields.iter().all(|v| v.is_finite()) {
                non_finite += 1;
            }
            if !(0.0..=100.0).contains(&a.score()) || !(0.0..=1.0).contains(&a.risk.score) {
                out_of_range += 1;
            }
            score_sum += a.score();
        }
        results.push(TestResult::new(
            &format!("analytics_{name}"),
            non_finite == 0 && out_of_range == 0,
            format!(
                "{} non-finite, {} out of range, mean score {:.1}",
                non_finite,
                out_of_range,
                score_sum / 50.0
            ),
        ));
    }

    results
}

// ── 5. Climate Risk ─────────────────────────────────────────────────────

fn validate_risk_logic(tables: &AnalyticsTables) -> Vec<TestResult> {
    println!("--- Climate Risk ---");
    let mut results = Vec::new();
    let design = generate_layout(7, &DesignParameters::default());

    let climate = |precipitation: f64, wind: f64| Climate {
        temperature: 16.0,
        precipitation,
        wind,
        humidity: 72.0,
        vegetation: Vegetation::from_precipitation(precipitation),
        degree_days: 3600,
    };
    let level = |c: Climate, hazard: Hazard| {
        let site = SiteContext::new(Some(c), None);
        compute_analytics(&design, Some(&site), tables)
            .risk
            .level_of(hazard)
    };

    let wet: Vec<f64> = vec![1401.0, 1600.0, 2500.0, 4000.0];
    let flood_ok = wet
        .iter()
        .all(|&p| level(climate(p, 4.0), Hazard::Flooding) == Some(RiskLevel::High));
    results.push(TestResult::new(
        "risk_heavy_rain_high_flood",
        flood_ok,
        format!("precipitation {:?} mm all High flood", wet),
    ));

    let windy: Vec<f64> = vec![12.1, 15.0, 25.0];
    let wind_ok = windy
        .iter()
        .all(|&w| level(climate(700.0, w), Hazard::HighWinds) == Some(RiskLevel::High));
    results.push(TestResult::new(
        "risk_strong_wind_high",
        wind_ok,
        format!("wind {:?} m/s all High", windy),
    ));

    let mut scores = Vec::new();
    for precipitation in [400.0, 1000.0, 1500.0] {
        let site = SiteContext::new(Some(climate(precipitation, 4.0)), None);
        scores.push(compute_analytics(&design, Some(&site), tables).risk.score);
    }
    results.push(TestResult::new(
        "risk_score_monotone_in_rain",
        scores.windows(2).all(|w| w[0] <= w[1]),
        format!("scores {:?}", scores),
    ));

    results
}

// ── 6. Sweep ────────────────────────────────────────────────────────────

fn run_sweep(
    opts: &Options,
    tables: &AnalyticsTables,
    presets: &SitePresets,
    results: &mut Vec<TestResult>,
) -> Option<BatchResult> {
    println!("--- Ranked Sweep ---");

    let Some(site) = presets.get(&opts.site) else {
        results.push(TestResult::new(
            "sweep_site_preset",
            false,
            format!("unknown site preset \"{}\"", opts.site),
        ));
        return None;
    };

    let params = DesignParameters::default();
    let config = BatchConfig {
        count: opts.count,
        rank: RankMode::On { retain: opts.top },
        seeds: SeedPlan::Sequence { base: opts.seed },
    };

    let mut seen = Vec::with_capacity(opts.count);
    let mut sweep = Sweep::new(&params, Some(site), tables, &config);
    for step in sweep.by_ref() {
        if opts.verbose && (step.index % 10 == 0 || step.index == step.total) {
            println!(
                "  [{}/{}] best {:.1}, avg {:.1}",
                step.index, step.total, step.best_score, step.average_score
            );
        }
        seen.push((step.seed, step.score));
    }
    let result = sweep.finish();

    results.push(TestResult::new(
        "sweep_evaluated_all",
        result.evaluated == opts.count,
        format!("{} of {} candidates evaluated", result.evaluated, opts.count),
    ));
    results.push(TestResult::new(
        "sweep_retained_top_k",
        result.candidates.len() == opts.top.min(opts.count),
        format!("{} candidates retained", result.candidates.len()),
    ));

    let kept: HashSet<u32> = result.candidates.iter().map(|c| c.design.seed).collect();
    let min_kept = result
        .candidates
        .iter()
        .map(|c| c.score())
        .fold(f64::INFINITY, f64::min);
    let violations = seen
        .iter()
        .filter(|(seed, score)| !kept.contains(seed) && *score > min_kept)
        .count();
    results.push(TestResult::new(
        "sweep_selection_invariant",
        violations == 0,
        format!("{} discarded candidates outscored the retained minimum", violations),
    ));

    if let Some(best) = result.best() {
        let program: Vec<String> = best
            .analytics
            .category_areas
            .iter()
            .filter(|(_, area)| **area > 0.0)
            .map(|(category, area)| format!("{} {:.1} m²", category.name(), area))
            .collect();
        println!(
            "  best: {} seed {} score {:.1} · {} · {}",
            best.design.id,
            best.design.seed,
            best.score(),
            best.analytics.program_profile,
            program.join(", ")
        );
    }

    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Options::command().debug_assert();
    }

    #[test]
    fn defaults_without_flags() {
        let opts = Options::try_parse_from(["tinyhouse-simtest"]).unwrap();
        assert!(!opts.verbose && !opts.json);
        assert_eq!((opts.count, opts.top, opts.seed), (60, 4, 42));
        assert_eq!(opts.site, "pending");
        assert!(opts.tables.is_none());
    }

    #[test]
    fn value_flags_parse() {
        let opts = Options::try_parse_from([
            "tinyhouse-simtest",
            "--count",
            "200",
            "--top",
            "5",
            "--site",
            "tropical-storm",
            "--tables",
            "tables.json",
            "--json",
        ])
        .unwrap();
        assert_eq!((opts.count, opts.top), (200, 5));
        assert_eq!(opts.site, "tropical-storm");
        assert_eq!(opts.tables, Some(PathBuf::from("tables.json")));
        assert!(opts.json);
    }

    #[test]
    fn bad_values_are_rejected() {
        assert!(Options::try_parse_from(["tinyhouse-simtest", "--count", "many"]).is_err());
        assert!(Options::try_parse_from(["tinyhouse-simtest", "--bogus"]).is_err());
    }
}
