use anyhow::{Context, Result};
use clap::Parser;
use rs_rapid_kinematics::action::Action;
use rs_rapid_kinematics::cell_from_file::read_cell_file;
use rs_rapid_kinematics::rapid_generator::RapidGenerator;
use std::fs;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Generates the RAPID program module and the BASE system module from a cell file.
#[derive(Parser, Debug)]
#[command(name = "rapid-gen", version, about)]
struct Args {
    /// YAML file with the cell and the program
    cell_file: PathBuf,

    /// Directory to write <module>.mod and BASE.sys into
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,

    /// Print the modules instead of writing them
    #[arg(short, long)]
    print: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let (cell, program) = read_cell_file(&args.cell_file)
        .with_context(|| format!("Reading {}", args.cell_file.display()))?;
    info!("Robot {} with {} external axes, {} actions",
        cell.robot.name(), cell.robot.external_axes().len(), program.actions.len());

    let mut generator = RapidGenerator::new(&program.module_name, &program.actions, &cell.robot);
    let module = generator.generate().context("Generating the program module")?;
    let system = generator.generate_system_module(&cell.registry);

    for message in generator.error_text() {
        warn!("{}", message);
    }
    let has_movements = program.actions.iter().any(|a| matches!(a, Action::Movement(_)));
    if has_movements && !generator.first_movement_is_move_abs() {
        warn!("The first movement is linear, the path from the start position is not defined");
    }

    if args.print {
        println!("{}", module);
        println!("{}", system);
        return Ok(());
    }

    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("Creating {}", args.out_dir.display()))?;
    let module_path = args.out_dir.join(format!("{}.mod", program.module_name));
    let system_path = args.out_dir.join("BASE.sys");
    fs::write(&module_path, module).with_context(|| format!("Writing {}", module_path.display()))?;
    fs::write(&system_path, system).with_context(|| format!("Writing {}", system_path.display()))?;
    info!("Written {} and {}", module_path.display(), system_path.display());
    Ok(())
}
