mod pca;
mod util;

use clap::{ArgAction, Parser, Subcommand};
use log::LevelFilter;
use pca::{ComponentsArgs, ReduceArgs, VarianceArgs};

/// Principal component analysis for feature files
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Log more, repeat for debug output
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    tool: Tool,
}

#[derive(Subcommand, Debug)]
#[command(version, about, long_about = None)]
enum Tool {
    /// Project the features onto the top principal components
    #[command(version, about, long_about = None)]
    Reduce(ReduceArgs),

    /// Rank features by variance
    #[command(version, about, long_about = None)]
    Variance(VarianceArgs),

    /// Explained variance per principal component
    #[command(version, about, long_about = None)]
    Components(ComponentsArgs),
}

fn setup_logger(verbose: u8) {
    let mut builder = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("warn"),
    );
    match verbose {
        0 => {}
        1 => {
            builder.filter_level(LevelFilter::Info);
        }
        _ => {
            builder.filter_level(LevelFilter::Debug);
        }
    }
    builder.init();
}

fn main() {
    let cli = Cli::parse();
    setup_logger(cli.verbose);

    let result = match cli.tool {
        Tool::Reduce(args) => pca::reduce_main(args),
        Tool::Variance(args) => pca::variance_main(args),
        Tool::Components(args) => pca::components_main(args),
    };
    if let Err(e) = result {
        eprintln!("{:#}", e);
        std::process::exit(1);
    }
}
