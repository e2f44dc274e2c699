// SPDX-License-Identifier: Apache-2.0
// Copyright © 2026 Crowdcount Developers. All Rights Reserved.

use clap::{Parser, Subcommand};
use crowdcount::{
    AnnotationStore, Environment, Error, PathRegistry, Settings, TurkReader, write_annotations,
};
use log::info;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory containing the data/ tree
    #[clap(long, env = "CROWDCOUNT_ROOT")]
    root: Option<PathBuf>,

    /// Use the Floyd layout (/data and /output)
    #[clap(long)]
    floyd: bool,

    /// Command
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, PartialEq, Clone, Debug)]
enum Command {
    /// List the known datasets in split order.
    Datasets,
    /// Print the path of an example image.  A random index is used when none
    /// is given.
    Path {
        /// Dataset name (ucf, mall, shakecam)
        dataset: String,

        /// Image index
        #[clap(long, short)]
        index: Option<u64>,
    },
    /// Print the ground truth points of an image as JSON.
    Get {
        /// Image path as stored in the annotation files, e.g. data/ucf/1.jpg
        image: String,
    },
    /// Compute the stratified train/test split and print per-dataset counts.
    Split {
        /// Write the split as JSON to this file
        #[clap(long, short)]
        output: Option<PathBuf>,
    },
    /// Convert a Mechanical Turk CSV export into an annotation table.  The
    /// table is printed unless an output file is given.
    Turk {
        /// Turk batch results CSV
        csv: PathBuf,

        /// Write the table to this annotation file
        #[clap(long, short)]
        output: Option<PathBuf>,
    },
}

fn handle_datasets() -> Result<(), Error> {
    for dataset in PathRegistry::datasets() {
        println!("{}", dataset);
    }
    Ok(())
}

fn handle_path(registry: &PathRegistry, dataset: &str, index: Option<u64>) -> Result<(), Error> {
    let path = registry.resolve_name(dataset, index)?;
    println!("{}", path.display());
    Ok(())
}

fn handle_get(store: &AnnotationStore, image: &str) -> Result<(), Error> {
    let points = store.get(image)?;
    println!("{}", serde_json::to_string(&points)?);
    Ok(())
}

fn handle_split(store: &AnnotationStore, output: Option<PathBuf>) -> Result<(), Error> {
    for (dataset, part) in store.split_by_dataset() {
        println!(
            "{:<10} train: {:>6} test: {:>6}",
            dataset,
            part.train.len(),
            part.test.len()
        );
    }

    let split = store.train_test_split();
    println!(
        "{:<10} train: {:>6} test: {:>6}",
        "total",
        split.train.len(),
        split.test.len()
    );

    if let Some(output) = output {
        let file = std::fs::File::create(&output)?;
        serde_json::to_writer_pretty(file, &split)?;
        info!("Split written to {}", output.display());
    }
    Ok(())
}

fn handle_turk(csv: PathBuf, output: Option<PathBuf>) -> Result<(), Error> {
    let table = TurkReader::new().read_csv(&csv)?;

    match output {
        Some(output) => {
            write_annotations(&output, &table)?;
            info!(
                "Converted {} images from {} into {}",
                table.len(),
                csv.display(),
                output.display()
            );
        }
        None => {
            let sorted: std::collections::BTreeMap<_, _> = table.iter().collect();
            println!("{}", serde_json::to_string_pretty(&sorted)?);
        }
    }
    Ok(())
}

fn main() -> Result<(), Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let mut settings = Settings::load()?;
    if args.root.is_some() {
        settings.root = args.root;
    }
    if args.floyd {
        settings.environment = Environment::Floyd;
    }

    match args.cmd {
        Command::Datasets => handle_datasets(),
        Command::Path { dataset, index } => {
            let registry = PathRegistry::from_settings(&settings);
            handle_path(&registry, &dataset, index)
        }
        Command::Turk { csv, output } => handle_turk(csv, output),
        Command::Get { image } => {
            let store = AnnotationStore::from_settings(&settings)?;
            handle_get(&store, &image)
        }
        Command::Split { output } => {
            let store = AnnotationStore::from_settings(&settings)?;
            handle_split(&store, output)
        }
    }
}
