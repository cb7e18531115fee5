use std::{fs::OpenOptions, path::PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use log::info;
use stats::{
    dataset::FeatureMatrix,
    eigen::NalgebraDecomposer,
    pca::{self, Centering, PcaConfig, PcaResult, DEFAULT_REDUCED_DIMENSION},
    report::{format_feature_summary, write_feature_ranking},
    table,
};

use crate::util::{self, DataType};

/// Options shared by every PCA tool
#[derive(Debug, Args)]
pub struct InputArgs {
    /// The format of the file
    #[arg(value_enum, short, long)]
    datatype: Option<DataType>,
    /// CSV delimiter
    #[arg(long, default_value_t = String::from(","))]
    csv_delim: String,
    /// The file has no leading classification column
    #[arg(long)]
    no_labels: bool,
    /// Number of principal components to keep
    #[arg(short = 'k', long, default_value_t = DEFAULT_REDUCED_DIMENSION)]
    dimension: usize,
    /// Project the raw rather than the mean centered data
    #[arg(long)]
    raw: bool,
    /// File containing data, stdin if omitted
    filename: Option<PathBuf>,
}

impl InputArgs {
    fn config(&self) -> PcaConfig {
        PcaConfig {
            reduced_dimension: self.dimension,
            centering: if self.raw { Centering::Raw } else { Centering::Centered },
        }
    }

    fn load(&self) -> Result<FeatureMatrix> {
        let reader = util::get_buff_reader(&self.filename).context("Could not read file")?;
        let datatype = DataType::resolve(self.datatype, &self.filename)?;
        let features = match datatype {
            DataType::CSV => table::from_csv(reader, &self.csv_delim, !self.no_labels),
        }.context("Error parsing data")?;
        info!(
            "loaded {} samples with {} features",
            features.samples(),
            features.features(),
        );
        Ok(features)
    }

    fn run(&self) -> Result<PcaResult> {
        let features = self.load()?;
        pca::run(&features, &NalgebraDecomposer::default(), &self.config())
            .context("Error calculating pca")
    }
}

/// Reduce the features to the top principal components
#[derive(Debug, Args)]
#[command(version, about, long_about = None)]
pub struct ReduceArgs {
    #[command(flatten)]
    input: InputArgs,
}

/// Rank features by variance
#[derive(Debug, Args)]
#[command(version, about, long_about = None)]
pub struct VarianceArgs {
    #[command(flatten)]
    input: InputArgs,
    /// Append the feature names, most variant first, to this file
    #[arg(long)]
    append_ranking: Option<PathBuf>,
    /// Print the one line `name(variance), ...` summary instead of CSV
    #[arg(long)]
    summary: bool,
}

/// Report the variance explained by each principal component
#[derive(Debug, Args)]
#[command(version, about, long_about = None)]
pub struct ComponentsArgs {
    #[command(flatten)]
    input: InputArgs,
}

pub fn reduce_main(args: ReduceArgs) -> Result<()> {
    let result = args.input.run()?;
    println!(
        "{}",
        table::reduced_to_csv(&result.reduced, result.labels.as_deref(), &args.input.csv_delim),
    );
    Ok(())
}

pub fn variance_main(args: VarianceArgs) -> Result<()> {
    let result = args.input.run()?;
    let ranking = &result.feature_variances;

    if let Some(path) = &args.append_ranking {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Could not open {}", path.to_string_lossy()))?;
        write_feature_ranking(&mut file, ranking)?;
        info!("appended {} feature names to {}", ranking.len(), path.to_string_lossy());
    }

    if args.summary {
        println!("{}", format_feature_summary(ranking));
    } else {
        let delim = &args.input.csv_delim;
        println!("feature{}variance", delim);
        for feature in ranking {
            println!("{}{}{}", feature.name, delim, feature.variance);
        }
    }
    Ok(())
}

pub fn components_main(args: ComponentsArgs) -> Result<()> {
    let result = args.input.run()?;
    let delim = &args.input.csv_delim;
    println!("component{0}eigenvalue{0}ratio{0}cumulative_ratio", delim);
    for c in &result.explained {
        println!(
            "{1}{0}{2}{0}{3}{0}{4}",
            delim,
            c.index + 1,
            c.eigenvalue,
            c.ratio,
            c.cumulative_ratio,
        );
    }
    Ok(())
}
