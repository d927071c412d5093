use std::path::PathBuf;

use anyhow::{bail, Context};

pub const DEFAULT_METADATA_PATH: &str = "public/data/metadata.json";

pub const USAGE: &str = "Usage: gaze-annotator [metadata.json] [--seed <u64>] [--profile <file.toml>]";

/// Parsed command line.
#[derive(Debug, PartialEq)]
pub enum Invocation {
    Help,
    Run(RunArgs),
}

#[derive(Debug, PartialEq)]
pub struct RunArgs {
    pub path: PathBuf,
    pub seed: Option<u64>,
    pub profile: Option<PathBuf>,
}

/// Parse the arguments after the program name. Flags and the single
/// positional path may appear in any order.
pub fn parse_args(args: &[String]) -> anyhow::Result<Invocation> {
    let mut path = None;
    let mut seed = None;
    let mut profile = None;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(Invocation::Help),
            "--seed" => {
                let value = flag_value(&mut iter, "--seed")?;
                let parsed = value
                    .parse::<u64>()
                    .with_context(|| format!("--seed expects an unsigned integer, got {value:?}"))?;
                seed = Some(parsed);
            }
            "--profile" => {
                profile = Some(PathBuf::from(flag_value(&mut iter, "--profile")?));
            }
            flag if flag.starts_with('-') => bail!("unknown flag {flag}"),
            positional => {
                if path.is_some() {
                    bail!("unexpected argument {positional}");
                }
                path = Some(PathBuf::from(positional));
            }
        }
    }

    Ok(Invocation::Run(RunArgs {
        path: path.unwrap_or_else(|| PathBuf::from(DEFAULT_METADATA_PATH)),
        seed,
        profile,
    }))
}

fn flag_value<'a>(iter: &mut std::slice::Iter<'a, String>, flag: &str) -> anyhow::Result<&'a str> {
    match iter.next() {
        Some(value) if !value.starts_with("--") => Ok(value.as_str()),
        _ => bail!("{flag} expects a value"),
    }
}
