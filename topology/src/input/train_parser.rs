use super::network_parser::number;
use super::{is_blank, ParseError};
use crate::network::Network;
use crate::trains::Train;
use regex::Regex;
use std::collections::HashSet;

/// Parses the train format, one train per line
///
/// * train t1 arrival=0 start=e0 stops=e4,e9 length=200.0 speed=50.0
///
/// Train ids are assigned in file order.
pub fn parse_trains(input: &str, network: &Network) -> Result<Vec<Train>, ParseError> {
    let train_re = Regex::new(r"(?x) ^ \s* train \s+ (?P<name>[\w\.]+) \s+
            arrival \s* = \s* (?P<arr>\d+) \s+
            start \s* = \s* (?P<start>[\w\.]+) \s+
            stops \s* = \s* (?P<stops>[\w\.]+ (?: \s*,\s* [\w\.]+)*) \s+
            length \s* = \s* (?P<len>[\d\.]+) \s+
            speed \s* = \s* (?P<vel>[\d\.]+) \s*
            $")
    .map_err(|e| ParseError::RegexError(format!("{:?}", e)))?;

    let edge = |line_no: usize, name: &str| {
        network
            .edge_by_name(name)
            .ok_or_else(|| ParseError::UnknownEdge(line_no, name.to_string()))
    };

    let mut trains = Vec::new();
    let mut names = HashSet::new();
    for (idx, line) in input.lines().enumerate() {
        let line_no = idx + 1;
        if is_blank(line) {
            continue;
        }
        let groups = match train_re.captures(line) {
            Some(g) => g,
            None => return Err(ParseError::Unrecognized(line_no, line.to_string())),
        };
        let name = groups["name"].to_string();
        if !names.insert(name.clone()) {
            return Err(ParseError::Duplicate(line_no, name));
        }
        let stops = groups["stops"]
            .split(',')
            .map(|s| edge(line_no, s.trim()))
            .collect::<Result<Vec<_>, _>>()?;
        trains.push(Train {
            id: trains.len(),
            name,
            arrival: number(line_no, &groups["arr"])?,
            start: edge(line_no, &groups["start"])?,
            stops,
            length: number(line_no, &groups["len"])?,
            speed: number(line_no, &groups["vel"])?,
        });
    }

    Ok(trains)
}
