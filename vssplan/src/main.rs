use std::path::PathBuf;
use structopt::StructOpt;
use topology::AppResult;
use vssplan::*;

/// Plan train movements and virtual subsection borders on a track network
#[derive(StructOpt, Debug)]
#[structopt(name = "vssplan")]
struct Opt {
    /// Verbose mode (-v, -vv)
    #[structopt(short = "v", long = "verbose", parse(from_occurrences))]
    verbose: u8,

    /// Network file (vertices, edges and track-detection sections)
    #[structopt(parse(from_os_str))]
    network: PathBuf,

    /// Train file
    #[structopt(parse(from_os_str))]
    trains: PathBuf,

    /// Number of discrete time steps
    #[structopt(short = "n", long = "horizon", default_value = "10")]
    horizon: usize,

    /// Solve variant: base | fixed-vss | fixed-schedule | optimize
    #[structopt(short = "m", long = "variant", default_value = "base")]
    variant: Variant,
}

fn run(opt: &Opt) -> AppResult<bool> {
    let instance = get_instance(&opt.network, &opt.trains, opt.horizon)?;
    if opt.verbose >= 1 {
        println!("Instance: {:?}", instance.stats());
    }
    if opt.verbose >= 2 {
        for train in instance.trains() {
            println!("  * {:?} paths={:?}", train, instance.paths(train.id));
        }
    }

    let solution = match instance.solve(&opt.variant.config()) {
        Some(s) => s,
        None => {
            println!("Infeasible: no plan within {} time steps ({}).", opt.horizon, opt.variant);
            return Ok(false);
        }
    };

    println!("# VSS layout ({} borders)", solution.boundary_count());
    print!("{}", solution.vss_layout());
    println!("# Train routes");
    for route in solution.train_routes() {
        print!("{}", route);
    }
    if opt.verbose >= 1 {
        println!("Objectives: {:?}", solution.objectives());
        println!("Constraint check: {}", solution.check());
    }
    Ok(true)
}

pub fn main() {
    pretty_env_logger::init();
    let opt = Opt::from_args();
    match run(&opt) {
        Ok(true) => {}
        Ok(false) => std::process::exit(2),
        Err(e) => {
            println!("Error:\n{}", e.as_fail());
            std::process::exit(1);
        }
    }
}
