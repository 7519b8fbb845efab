use clap::Parser;

use gridlife::{
    draw::{self, App},
    grid::Grid,
};

/// A binary cellular automaton on a square terminal grid.
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Side length of the square grid
    #[arg(short = 's', long = "size", default_value_t = 5,
          value_parser = clap::value_parser!(u16).range(4..))]
    size: u16,

    /// Milliseconds between generations
    #[arg(short = 't', long = "time", default_value_t = 1000,
          value_parser = clap::value_parser!(u64).range(1..))]
    time: u64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let g = Grid::random(args.size as usize, &mut rand::thread_rng());
    let a = App::new(g, args.time);
    draw::run(a)?;
    Ok(())
}
