#[macro_use]
extern crate failure_derive;

pub mod input;
pub mod network;
pub mod trains;

pub use network::{Dist, Edge, EdgeId, Network, NetworkError, Path, Section, SectionId, VertexId};
pub use trains::{Time, Train, TrainId};

use std::path::Path as FilePath;

pub type AppResult<T> = Result<T, failure::Error>;

pub fn read_file(f: &FilePath) -> AppResult<String> {
    use std::fs::File;
    use std::io::prelude::*;
    use std::io::BufReader;

    let file = File::open(f)?;
    let mut file = BufReader::new(&file);
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;
    Ok(contents)
}

pub fn get_network(f: &FilePath) -> AppResult<Network> {
    let contents = read_file(f)?;
    get_network_string(&contents)
}

pub fn get_network_string(s: &str) -> AppResult<Network> {
    let desc = input::network_parser::parse_network(s)?;
    let network = Network::new(desc.vertex_count, desc.edges, desc.sections)?;
    Ok(network)
}

pub fn get_trains(f: &FilePath, network: &Network) -> AppResult<Vec<Train>> {
    let contents = read_file(f)?;
    let trains = input::train_parser::parse_trains(&contents, network)?;
    Ok(trains)
}
