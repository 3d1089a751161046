use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tailrisk::prelude::*;
use tailrisk::report;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tailrisk")]
#[command(about = "Drawdown, VaR and distribution statistics for return series", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    //summary statistics per asset
    Summary {
        //path to csv data file
        #[arg(long)]
        data: PathBuf,

        //dataset layout (ffme, hfi, generic)
        #[arg(long, default_value = "hfi")]
        dataset: String,
    },

    //gaussian, cornish-fisher and historic var side by side, plus historic cvar
    Var {
        #[arg(long)]
        data: PathBuf,

        #[arg(long, default_value = "hfi")]
        dataset: String,

        //lower-tail percentage
        #[arg(long, default_value = "5")]
        level: f64,
    },

    //mean against median, skewness and kurtosis per asset
    Moments {
        #[arg(long)]
        data: PathBuf,

        #[arg(long, default_value = "hfi")]
        dataset: String,
    },

    //jarque-bera normality verdict per asset
    Normality {
        #[arg(long)]
        data: PathBuf,

        #[arg(long, default_value = "hfi")]
        dataset: String,

        //significance level
        #[arg(long, default_value = "0.01")]
        level: f64,

        //two-sided, greater or less
        #[arg(long, default_value = "two-sided")]
        alternative: Alternative,
    },

    //wealth path and drawdown for one asset
    Drawdown {
        #[arg(long)]
        data: PathBuf,

        #[arg(long, default_value = "hfi")]
        dataset: String,

        //asset column (defaults to the first)
        #[arg(long)]
        asset: Option<String>,

        #[arg(long, default_value = "1000")]
        initial_wealth: f64,

        //output path for the wealth path csv
        #[arg(long)]
        output_csv: Option<PathBuf>,
    },

    //run every analysis from a json configuration
    Run {
        #[arg(long)]
        config: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Summary { data, dataset } => {
            let table = load_table(&data, &dataset)?;
            print_summary(&table)?;
        }
        Commands::Var {
            data,
            dataset,
            level,
        } => {
            let table = load_table(&data, &dataset)?;
            print_var(&table, level)?;
        }
        Commands::Moments { data, dataset } => {
            let table = load_table(&data, &dataset)?;
            print_moments(&table)?;
        }
        Commands::Normality {
            data,
            dataset,
            level,
            alternative,
        } => {
            let table = load_table(&data, &dataset)?;
            print_normality(&table, level, alternative)?;
        }
        Commands::Drawdown {
            data,
            dataset,
            asset,
            initial_wealth,
            output_csv,
        } => {
            let table = load_table(&data, &dataset)?;
            print_drawdown(&table, asset.as_deref(), initial_wealth, output_csv.as_deref())?;
        }
        Commands::Run { config } => {
            let config = AnalysisConfiguration::from_json_file(&config)
                .context(format!("Failed to load configuration from {:?}", config))?;
            run_analysis(&config)?;
        }
    }

    Ok(())
}

fn load_table(data: &Path, dataset: &str) -> Result<ReturnTable> {
    let kind =
        Dataset::parse(dataset).ok_or_else(|| anyhow::anyhow!("Unknown dataset: {}", dataset))?;

    load_dataset(data, kind)
}

fn load_dataset(data: &Path, kind: Dataset) -> Result<ReturnTable> {
    let table = kind
        .load(data)
        .context(format!("Failed to load data from {:?}", data))?;

    if table.periods().is_empty() {
        anyhow::bail!("No return rows found in {:?}", data);
    }

    Ok(table)
}

fn run_analysis(config: &AnalysisConfiguration) -> Result<()> {
    let table = load_dataset(&config.data_path, config.dataset)?;

    println!(
        "Loaded {} assets over {} periods\n",
        table.len(),
        table.periods().len()
    );

    print_summary(&table)?;
    print_moments(&table)?;
    print_normality(&table, config.normality_level, config.alternative)?;
    print_var(&table, config.var_level)?;
    print_drawdown(
        &table,
        config.drawdown_asset.as_deref(),
        config.initial_wealth,
        config.output_drawdown_csv.as_deref(),
    )?;

    Ok(())
}

fn print_summary(table: &ReturnTable) -> Result<()> {
    let summary = summary_stats_table(table)?;

    println!("Summary Statistics");
    println!("==================\n");
    report::summary_table(&summary).printstd();
    println!();

    Ok(())
}

fn print_moments(table: &ReturnTable) -> Result<()> {
    let central = central_tendency(table)?;
    let skew = skewness_table(table)?;
    let kurt = kurtosis_table(table)?;

    println!("Mean vs Median");
    println!("==============\n");
    report::central_tendency_table(&central).printstd();

    println!("\nSkewness and Kurtosis");
    println!("=====================\n");
    report::ranked_table("Asset", &[("Skewness", &skew), ("Kurtosis", &kurt)]).printstd();
    println!();

    Ok(())
}

fn print_normality(table: &ReturnTable, level: f64, alternative: Alternative) -> Result<()> {
    let verdicts = is_normal_table(table, level, alternative)?;

    println!("Jarque-Bera Normality ({}, level {})", alternative, level);
    println!("=====================================\n");
    report::normality_table(&verdicts).printstd();
    println!();

    Ok(())
}

fn print_var(table: &ReturnTable, level: f64) -> Result<()> {
    let comparison = var_comparison(table, level)?;
    let cvar = cvar_historic(table, level)?;

    println!("Value at Risk");
    println!("=============\n");
    report::var_comparison_table(&comparison, level).printstd();

    if let Some(cvar) = cvar.as_per_asset() {
        println!("\nConditional VaR");
        println!("===============\n");
        report::ranked_table("Asset", &[("Historic CVaR", cvar)]).printstd();
    }
    println!();

    Ok(())
}

fn print_drawdown(
    table: &ReturnTable,
    asset: Option<&str>,
    initial_wealth: f64,
    output_csv: Option<&Path>,
) -> Result<()> {
    let name = match asset {
        Some(name) => name.to_string(),
        None => table
            .names()
            .next()
            .map(str::to_string)
            .ok_or_else(|| anyhow::anyhow!("Return table has no assets"))?,
    };

    let series = table
        .get(&name)
        .ok_or_else(|| anyhow::anyhow!("Unknown asset: {}", name))?;
    let path = drawdown(series, initial_wealth)?;

    println!("Drawdown");
    println!("========\n");
    report::drawdown_table(&name, &path).printstd();

    //save outputs if requested
    if let Some(output) = output_csv {
        report::write_wealth_path_csv(&path, output)?;
        println!("\nWealth path saved to {:?}", output);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn header_only_csv() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"date,Convertible Arbitrage,CTA Global\n").unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn subcommands_reject_header_only_file() {
        let file = header_only_csv();
        let err = load_table(file.path(), "hfi").unwrap_err();
        assert!(err.to_string().contains("No return rows found"));
    }

    #[test]
    fn run_rejects_header_only_file() {
        let file = header_only_csv();
        let config = AnalysisConfiguration {
            data_path: file.path().to_path_buf(),
            dataset: Dataset::Hfi,
            ..AnalysisConfiguration::default()
        };
        let err = run_analysis(&config).unwrap_err();
        assert!(err.to_string().contains("No return rows found"));
    }

    #[test]
    fn unknown_dataset_is_reported() {
        let file = header_only_csv();
        let err = load_table(file.path(), "bloomberg").unwrap_err();
        assert!(err.to_string().contains("Unknown dataset"));
    }
}
