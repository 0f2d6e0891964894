//! Stowage demo CLI.
//!
//! Builds a small in-process container, places a handful of sample
//! items into it and prints what the engine reports about them. This
//! is a demonstration harness for the library, not the mission's HTTP
//! or ground-control CLI surface.

use clap::{Parser, Subcommand};

use stowage::{
    CalendarDay, CancellationToken, Container, Dimensions, Item, ItemId, OpenFace, PlaceOptions, Priority,
};

/// Demonstrates the cargo stowage engine against a sample container.
#[derive(Parser)]
#[command(name = "stowage")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Place a sample set of items and print where each one landed.
    Demo,
    /// Place the sample items, then print each one's accessibility.
    Accessibility,
    /// Place the sample items, then print a retrieval plan for one.
    Retrieve {
        /// Id of the item to plan a retrieval for.
        #[arg(default_value = "CRATE_03")]
        item: String,
    },
    /// Place the sample items, then print utilization and advisories.
    Report,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Demo) {
        Command::Demo => run_demo(),
        Command::Accessibility => run_accessibility(),
        Command::Retrieve { item } => run_retrieve(&item),
        Command::Report => run_report(),
    }
    Ok(())
}

fn sample_container() -> Container {
    let mut container = Container::new("ISS-STOW-A1", "crew-quarters", Dimensions::new(10, 8, 5).unwrap(), OpenFace::Front);

    let items = [
        ("CRATE_01", (3, 2, 2), Priority::Low, None),
        ("CRATE_02", (2, 2, 2), Priority::Medium, None),
        ("CRATE_03", (2, 2, 1), Priority::High, Some(CalendarDay(12))),
    ];

    for (id, (w, d, h), priority, expiry) in items {
        let mut item = Item::new(id, id, Dimensions::new(w, d, h).unwrap(), 2.0, priority).unwrap();
        if let Some(day) = expiry {
            item = item.with_expiry(day);
        }
        if let Err(e) = container.place_item(item, PlaceOptions::default()) {
            eprintln!("failed to place {id}: {e}");
        }
    }

    container
}

fn run_demo() {
    let container = sample_container();
    println!("placed {} item(s) in {}", container.len(), container.id);
    for item in container.iter() {
        println!(
            "  {} at ({}, {}, {}) orientation {:?}",
            item.id,
            item.position.x,
            item.position.y,
            item.position.z,
            item.orientation.axes()
        );
    }
}

fn run_accessibility() {
    let container = sample_container();
    for item in container.iter() {
        let score = container.accessibility_score(&item.id).expect("id came from this container's own iterator");
        println!("{}: accessibility {:.1}", item.id, score);
    }
}

fn run_retrieve(item: &str) {
    let container = sample_container();
    let id = ItemId::from(item);
    match container.retrieval_plan(&id) {
        Ok(plan) if plan.is_direct() => println!("{item} is directly retrievable, no moves needed"),
        Ok(plan) => println!("move {:?} before retrieving {item}", plan.moves),
        Err(e) => eprintln!("cannot plan retrieval for {item}: {e}"),
    }
}

fn run_report() {
    let container = sample_container();
    println!("utilization: {:.1}%", container.utilization() * 100.0);

    let token = CancellationToken::never();
    match container.fragmentation(&token) {
        Ok(report) => println!(
            "fragmentation: index {:.2} across {} region(s)",
            report.fragmentation_index, report.regions_found
        ),
        Err(e) => eprintln!("fragmentation analysis failed: {e}"),
    }

    match container.recommendations(CalendarDay(0), &token) {
        Ok(recs) if recs.is_empty() => println!("no advisories"),
        Ok(recs) => {
            for rec in recs {
                println!("[{:?}] {}", rec.severity, rec.message);
            }
        }
        Err(e) => eprintln!("recommendations failed: {e}"),
    }
}
