extern crate pretty_env_logger;

#[macro_use]
extern crate log;

use clap::Parser;
use geokmeans::{ConsoleReporter, Dataset, KMeans, KmArgs, KmError, Report};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs::File;
use std::io::{self, BufWriter, Write};

fn run(args: &KmArgs) -> Result<(), KmError> {
    let data = Dataset::from_path(&args.io.input, args.parse_policy())?;
    info!("loaded {} points", data.len());

    let mut rng = match args.km.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let model = KMeans::new(args.km.k)
        .with_max_iter(args.km.max_iter)
        .with_tolerance(args.km.tolerance)
        .with_init(args.init_policy());

    let stdout = io::stdout();
    let mut reporter = ConsoleReporter::new(&data, BufWriter::new(stdout.lock()), args.io.quiet);
    let result = model.fit_with(&data, &mut rng, &mut reporter)?;
    info!("converged after {} iterations", result.iterations);

    let evaluation = reporter.write_evaluation(&result);
    reporter.into_inner().flush()?;
    let evaluation = evaluation?;

    if let Some(path) = &args.io.json {
        let mut out = BufWriter::new(File::create(path)?);
        Report::new(&data, &result, args.km.seed, Some(evaluation)).write_json(&mut out)?;
        out.flush()?;
        info!("wrote {}", path.display());
    }
    Ok(())
}

fn main() {
    let args = KmArgs::parse();
    let level = if args.io.debug {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    pretty_env_logger::formatted_timed_builder()
        .filter_level(level)
        .init();

    info!("starting");
    debug!("params: {:#?}", args);
    if !args.validate() {
        error!("please fix arguments");
        std::process::exit(1);
    }

    if let Err(e) = run(&args) {
        error!("{}", e);
        std::process::exit(1);
    }
    info!("finished");
}
