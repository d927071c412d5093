use anyhow::Context;
use gaze_annotator_common::UniformSource;
use gaze_annotator_engine::report::{header_line, progress_line, summary_line};
use gaze_annotator_engine::GazeAnnotator;
use gaze_annotator_sampler::profile::SamplingProfile;
use gaze_annotator_sampler::source::RandSource;
use tracing::info;

mod cli;

use cli::{Invocation, DEFAULT_METADATA_PATH, USAGE};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let run = match cli::parse_args(&args) {
        Ok(Invocation::Run(run)) => run,
        Ok(Invocation::Help) => {
            print_usage();
            return Ok(());
        }
        Err(e) => {
            print_usage();
            return Err(e);
        }
    };

    let profile = match &run.profile {
        Some(p) => SamplingProfile::load(p)
            .with_context(|| format!("loading sampling profile {}", p.display()))?,
        None => SamplingProfile::default(),
    };
    let source: Box<dyn UniformSource> = match run.seed {
        Some(seed) => Box::new(RandSource::seeded(seed)),
        None => Box::new(RandSource::from_entropy()),
    };
    let mut annotator = GazeAnnotator::new(profile, source)?;
    info!(path = %run.path.display(), seed = ?run.seed, "annotating metadata");

    let annotation = annotator
        .annotate_file(&run.path)
        .with_context(|| format!("annotating {}", run.path.display()))?;

    println!("{}", header_line(annotation.statistics.total));
    for track in &annotation.tracks {
        println!("{}", progress_line(track));
    }
    println!("{}", summary_line(&annotation.statistics));

    Ok(())
}

fn print_usage() {
    eprintln!("{USAGE}");
    eprintln!("       default path: {DEFAULT_METADATA_PATH}");
}
