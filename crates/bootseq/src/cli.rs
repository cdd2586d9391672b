//! Command line options.

use std::path::PathBuf;

use anyhow::{bail, Context};

use bootseq_core::SequenceConfig;

/// Usage text printed for `--help`.
pub const USAGE: &str = "\
Usage: bootseq [OPTIONS]

Options:
  --config <PATH>   Load sequence configuration from a YAML file
  --seed <N>        Seed the random generator for a reproducible run
  --record <PATH>   Save a transcript of the run
  --headless        Do not render frames
  -h, --help        Print this help";

/// Parsed command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    /// YAML configuration file
    pub config: Option<PathBuf>,
    /// RNG seed, overriding the configured one
    pub seed: Option<u64>,
    /// Transcript output file
    pub record: Option<PathBuf>,
    /// Skip frame rendering
    pub headless: bool,
    /// Print usage and exit
    pub help: bool,
}

impl Options {
    /// Parse arguments (without the program name).
    pub fn parse<I>(args: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut options = Self::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" => options.config = Some(value(&mut args, &arg)?.into()),
                "--record" => options.record = Some(value(&mut args, &arg)?.into()),
                "--seed" => {
                    let raw = value(&mut args, &arg)?;
                    let seed = raw
                        .parse()
                        .with_context(|| format!("invalid seed '{raw}'"))?;
                    options.seed = Some(seed);
                }
                "--headless" => options.headless = true,
                "-h" | "--help" => options.help = true,
                other => bail!("unknown argument '{other}'\n\n{USAGE}"),
            }
        }

        Ok(options)
    }

    /// Configuration from `--config` (or defaults) with `--seed` applied.
    pub fn load_config(&self) -> anyhow::Result<SequenceConfig> {
        let mut config = match &self.config {
            Some(path) => SequenceConfig::from_file(path)
                .with_context(|| format!("failed to load config from {}", path.display()))?,
            None => SequenceConfig::default(),
        };
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        config.validate()?;
        Ok(config)
    }
}

fn value<I: Iterator<Item = String>>(args: &mut I, flag: &str) -> anyhow::Result<String> {
    args.next()
        .with_context(|| format!("{flag} requires a value"))
}
