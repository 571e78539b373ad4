use anyhow::Result;
use clap::Parser;
use pavemap::cli::{setup, Cli, Commands};
use pavemap::commands::{self, aggregate::AggregateConfig};
use pavemap::formatting::{FormattingConfig, Styler};

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup::init_logging(cli.verbosity);
    let styler = Styler::new(FormattingConfig::from_env(cli.color));
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Init { force } => {
            commands::init::init_config(&std::env::current_dir()?, force)?;
        }
        Commands::Classify {
            kpi,
            year,
            simplified,
            values,
        } => {
            let (config, model) = commands::load_model(config_path)?;
            let mode = commands::class_mode(simplified, &config);
            let text =
                commands::classify::classify_values(&model, &kpi, year, mode, &values, &styler)?;
            print!("{}", text);
        }
        Commands::Where {
            filter,
            selections,
            kpi,
            simplified,
            format,
        } => {
            let (config, model) = commands::load_model(config_path)?;
            let mode = commands::class_mode(simplified, &config);
            let predicate = commands::filter::build_where(
                &model,
                &filter.to_spec(),
                &selections,
                kpi.as_deref(),
                mode,
            )?;
            println!("{}", commands::filter::render_where(&predicate, format)?);
        }
        Commands::Aggregate {
            records,
            kpi,
            filter,
            group_by,
            simplified,
            stats,
            format,
            output,
            jobs,
            sequential,
        } => {
            let (config, model) = commands::load_model(config_path)?;
            if !sequential {
                setup::configure_thread_pool(jobs);
            }
            let aggregate_config = AggregateConfig {
                records,
                kpi,
                filter: filter.to_spec(),
                grouping: group_by.into(),
                mode: commands::class_mode(simplified, &config),
                stats,
                format: format.unwrap_or_else(|| config.default_format()),
                output,
                parallel: !sequential,
            };
            commands::aggregate::run_aggregate(&model, &aggregate_config, &styler)?;
        }
    }

    Ok(())
}
