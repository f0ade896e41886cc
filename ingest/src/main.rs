use anyhow::Context;
use argv::method_info_from_argv;
use atmoscore::container::{canonicalize, pformat, DimLayout};
use atmoscore::convert::resolve;
use clap::{Parser, Subcommand, ValueEnum};
use generator::profile::{build_container_from_config, GeneratorConfig};
use ndarray::Array1;
use std::fs;
use std::path::PathBuf;
use workflow::config::IngestProfile;
use workflow::runner::{load_container, Runner};

mod argv;
mod generator;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Remote-sensing ingestion driver")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Apply a named converter to values: `convert km2m 1.5 '[2, 3]' altitude=120`
    Convert {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        call: Vec<String>,
    },
    /// Print a summary of a JSON container and its canonical shape
    Inspect {
        container: PathBuf,
        #[arg(long, default_value_t = false)]
        verbose: bool,
    },
    /// Apply an ingestion profile to a container and canonicalize it
    Ingest {
        /// YAML ingestion profile
        #[arg(long)]
        profile: PathBuf,
        container: PathBuf,
        /// Write the converted container as JSON
        #[arg(long)]
        output: Option<PathBuf>,
        #[arg(long, default_value_t = false)]
        verbose: bool,
    },
    /// Write a synthetic spectra container
    Generate {
        #[arg(long)]
        output: PathBuf,
        /// Load generator settings from YAML
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long, value_enum)]
        layout: Option<LayoutArg>,
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum LayoutArg {
    TimeRangeVel,
    TimeVel,
    RangeVel,
    Vel,
}

impl From<LayoutArg> for DimLayout {
    fn from(arg: LayoutArg) -> Self {
        match arg {
            LayoutArg::TimeRangeVel => DimLayout::TimeRangeVel,
            LayoutArg::TimeVel => DimLayout::TimeVel,
            LayoutArg::RangeVel => DimLayout::RangeVel,
            LayoutArg::Vel => DimLayout::Vel,
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    match args.command {
        Command::Convert { call } => {
            let call = method_info_from_argv(&call)?;
            let converter = resolve(&call.method, &call.params()?)?;
            let values = Array1::from(call.numeric_args()?).into_dyn();
            let converted = (converter.value)(&values)
                .with_context(|| format!("applying converter {}", call.method))?;
            let output: Vec<f64> = converted.iter().copied().collect();
            println!("{}", serde_json::to_string(&output)?);
        }
        Command::Inspect { container, verbose } => {
            let data = load_container(&container)?;
            println!("{}", pformat(&data, verbose));
            match canonicalize(&data) {
                Ok(canonical) => println!("canonical   {:?}", canonical.shape()),
                Err(err) => println!("canonical   unavailable: {}", err),
            }
        }
        Command::Ingest {
            profile,
            container,
            output,
            verbose,
        } => {
            let profile = IngestProfile::load(profile)?;
            let raw = load_container(&container)?;
            let runner = Runner::new(profile);
            let result = runner.execute(&raw)?;

            println!("{}", pformat(&result.container, verbose));
            println!("conversions {}", result.applied.join(", "));
            println!("canonical   {:?}", result.canonical.shape());

            if let Some(path) = output {
                runner.export(&result.container, &path)?;
                println!("written     {}", path.display());
            }
        }
        Command::Generate {
            output,
            config,
            layout,
            seed,
        } => {
            let mut generator = match config {
                Some(path) => {
                    let contents = fs::read_to_string(&path)
                        .with_context(|| format!("reading generator config {}", path.display()))?;
                    serde_yaml::from_str::<GeneratorConfig>(&contents)
                        .with_context(|| format!("parsing generator config {}", path.display()))?
                }
                None => GeneratorConfig::default(),
            };
            if let Some(layout) = layout {
                generator.layout = layout.into();
            }
            if let Some(seed) = seed {
                generator.seed = seed;
            }

            let data = build_container_from_config(&generator)?;
            if let Some(parent) = output.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&output, serde_json::to_string(&data)?)
                .with_context(|| format!("writing {}", output.display()))?;
            println!("{}", pformat(&data, false));
        }
    }

    Ok(())
}
