//! Calculate one allotment from the command line
//! Usage: cargo run --bin allotment -- <ounces> [--disable <product>]...

use dispensary_tool::allotment::{maximize_allotment, parse_allotment, render_table};
use dispensary_tool::models::Enablement;
use dispensary_tool::settings::{default_settings_path, CatalogStore};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let mut allotment: Option<String> = None;
    let mut enabled = Enablement::all_enabled();

    while let Some(arg) = args.next() {
        if arg == "--disable" || arg == "-d" {
            let name = args.next().ok_or("--disable needs a product name")?;
            enabled.set(name, false);
        } else if allotment.is_none() {
            allotment = Some(arg);
        } else {
            return Err(format!("Unexpected argument: {}", arg).into());
        }
    }

    let Some(allotment) = allotment else {
        eprintln!("Usage: allotment <ounces> [--disable <product>]...");
        std::process::exit(2);
    };

    let ounces = parse_allotment(&allotment)?;

    let settings_path = default_settings_path();
    let catalog = CatalogStore::open(&settings_path)?.snapshot();

    let allocation = maximize_allotment(ounces, &catalog, &enabled)?;
    println!("{}", render_table(&allocation));

    Ok(())
}
