//! # Door BOM CLI
//!
//! Interactive terminal demo of the door panel optimization engine. Prompts
//! for a door, prints the frame selection, rail layout, cutting plan and
//! core layout, then the full plan as JSON.
//!
//! ## Environment
//!
//! - `DOOR_BOM_CONFIG` - engine config file (TOML or JSON)
//! - `DOOR_BOM_CATALOG` - frame catalogue file (TOML or JSON)
//! - `RUST_LOG` - log filter, default `info`

use std::env;
use std::io::{self, BufRead, Write};
use std::path::Path;

use door_core::calculations::FrameSelection;
use door_core::door::{DoorSpec, LockBlockConfig, LockBlockPosition, MaterialSelection};
use door_core::materials::{CoreType, TimberSpecies};
use door_core::{
    compute_plan, load_catalog, load_config, DoorBomInput, DoorBomPlan, DoorError, DoorResult,
    EngineConfig, FrameCatalog,
};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn prompt_line(prompt: &str) -> Option<String> {
    print!("{}", prompt);
    if io::stdout().flush().is_err() {
        return None;
    }

    let mut input = String::new();
    if io::stdin().lock().read_line(&mut input).is_err() {
        return None;
    }

    let trimmed = input.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn prompt_f64(prompt: &str, default: f64) -> f64 {
    prompt_line(prompt)
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

fn prompt_species(default: TimberSpecies) -> TimberSpecies {
    let names: Vec<&str> = TimberSpecies::ALL.iter().map(|s| s.code()).collect();
    let prompt = format!("Frame species ({}) [{}]: ", names.join("/"), default.code());
    match prompt_line(&prompt) {
        Some(s) => TimberSpecies::from_str_flexible(&s).unwrap_or_else(|e| {
            warn!(error = %e, "using default species");
            default
        }),
        None => default,
    }
}

fn prompt_core(default: CoreType) -> CoreType {
    let names: Vec<&str> = CoreType::ALL.iter().map(|c| c.code()).collect();
    let prompt = format!("Core type ({}) [{}]: ", names.join("/"), default.code());
    match prompt_line(&prompt) {
        Some(s) => CoreType::from_str_flexible(&s).unwrap_or_else(|e| {
            warn!(error = %e, "using default core type");
            default
        }),
        None => default,
    }
}

fn prompt_lock_block() -> LockBlockConfig {
    let position = match prompt_line("Lock block (none/left/right/both) [both]: ")
        .map(|s| s.to_lowercase())
        .as_deref()
    {
        Some("none") => LockBlockPosition::None,
        Some("left") => LockBlockPosition::Left,
        Some("right") => LockBlockPosition::Right,
        _ => LockBlockPosition::Both,
    };
    if position == LockBlockPosition::None {
        return LockBlockConfig::none();
    }
    let pieces = prompt_f64("Lock block pieces per side (1-4) [1]: ", 1.0);
    LockBlockConfig::new(position, pieces.clamp(1.0, 4.0) as u8)
}

/// Config and catalogue from the environment, or the built-in defaults.
fn load_reference_data() -> DoorResult<(EngineConfig, FrameCatalog)> {
    let config = match env::var("DOOR_BOM_CONFIG") {
        Ok(path) => load_config(Path::new(&path))?,
        Err(_) => EngineConfig::default(),
    };
    let catalog = match env::var("DOOR_BOM_CATALOG") {
        Ok(path) => load_catalog(Path::new(&path))?,
        Err(_) => FrameCatalog::standard().clone(),
    };
    Ok((config, catalog))
}

fn main() {
    init_logging();

    println!("Door BOM CLI - Panel Optimization Engine");
    println!("========================================");
    println!();

    let (config, catalog) = match load_reference_data() {
        Ok(data) => data,
        Err(e) => {
            print_error(&e);
            std::process::exit(1);
        }
    };

    let thickness = prompt_f64("Door thickness T (mm) [40]: ", 40.0);
    let width = prompt_f64("Door width W (mm) [800]: ", 800.0);
    let height = prompt_f64("Door height H (mm) [2000]: ", 2000.0);
    let surface = prompt_f64("Surface skin thickness S (mm) [4]: ", 4.0);
    let species = prompt_species(TimberSpecies::Rubberwood);
    let core = prompt_core(CoreType::Foam);
    let lock_block = prompt_lock_block();

    let input = DoorBomInput::new(
        species,
        DoorSpec::new(thickness, width, height),
        MaterialSelection::new(surface),
    )
    .with_core(core)
    .with_lock_block(lock_block);

    info!(species = species.code(), core = core.code(), "computing door plan");
    let plan = compute_plan(&input, &catalog, &config);

    println!();
    print_summary(&plan);

    println!();
    println!("JSON Output (for API use):");
    if let Ok(json) = serde_json::to_string_pretty(&plan) {
        println!("{}", json);
    }
}

fn print_summary(plan: &DoorBomPlan) {
    let door = &plan.input.door;
    println!("═══════════════════════════════════════");
    println!("  DOOR BOM");
    println!("═══════════════════════════════════════");
    println!();
    println!("Door:");
    println!(
        "  Size:     {:.0} x {:.0} x {:.0} mm",
        door.thickness_mm, door.width_mm, door.height_mm
    );
    println!("  Species:  {}", plan.input.species.display_name());
    println!("  Core:     {}", plan.input.core.display_name());
    println!();

    println!("Frame:");
    match &plan.selection {
        FrameSelection::Selected(frame) => {
            println!("  Stock:    {} ({:?})", frame.display_size, frame.strategy);
            println!(
                "  Use:      {:.0} x {:.0} mm",
                frame.use_thickness_mm, frame.use_width_mm
            );
            if !frame.alternatives.is_empty() {
                println!("  Also:     {}", frame.alternatives.join(", "));
            }
        }
        FrameSelection::NoMatch(miss) => {
            println!("  {} {}", status_icon(false), miss.reason);
        }
    }
    println!();

    let layout = &plan.layout;
    println!("Structure:");
    println!(
        "  Frame F = {:.0} mm, rail R = {:.0} mm",
        layout.frame_width_mm, layout.rail_thickness_mm
    );
    let rails: Vec<String> = layout
        .rail_positions_mm
        .iter()
        .map(|y| format!("{:.0}", y))
        .collect();
    println!(
        "  Rails:    [{}] {}",
        rails.join(", "),
        if layout.rails_adjusted { "(shifted clear of lock block)" } else { "" }
    );
    if layout.lock_block.is_present() {
        println!(
            "  Lock:     {} piece(s), {:.0}-{:.0} mm",
            layout.lock_block.count, layout.lock_block.bottom_mm, layout.lock_block.top_mm
        );
    }
    println!();

    let cutting = &plan.cutting;
    println!("Cutting ({} mm bars):", cutting.stock_length_mm);
    for bar in &cutting.bars {
        let cuts: Vec<String> = bar
            .pieces
            .iter()
            .map(|p| format!("{} {:.0}", p.name, p.cut_length_mm))
            .collect();
        println!(
            "  Bar {}: {} | offcut {:.0}",
            bar.index,
            cuts.join(", "),
            bar.remaining_mm
        );
    }
    println!(
        "  {} bars, waste {:.0} mm, efficiency {:.1}%",
        cutting.total_bars, cutting.waste_mm, cutting.efficiency_percent
    );
    for warning in &cutting.warnings {
        println!("  {} {}", status_icon(false), warning);
    }
    if cutting.stock_code.is_some() {
        println!("  {} ready to cut", status_icon(cutting.is_cuttable()));
    }
    println!();

    let core = &plan.core_layout;
    println!("Core:");
    println!(
        "  {} pieces in {} row(s), {} column(s)",
        core.pieces.len(),
        core.rows,
        core.columns
    );
    println!("  Covered:  {:.3} m2", core.covered_area_mm2 / 1_000_000.0);
    println!("═══════════════════════════════════════");
}

fn print_error(e: &DoorError) {
    eprintln!("Error: {}", e);
    if let Ok(json) = serde_json::to_string_pretty(e) {
        eprintln!();
        eprintln!("Error JSON:");
        eprintln!("{}", json);
    }
}

fn status_icon(pass: bool) -> &'static str {
    if pass { "[OK]" } else { "[FAIL]" }
}
