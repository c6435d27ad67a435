use super::{is_blank, ParseError};
use crate::network::{EdgeSpec, SectionSpec};
use regex::Regex;
use std::collections::HashMap;

#[derive(Debug, PartialEq)]
pub struct NetworkDescription {
    pub vertex_count: usize,
    pub edges: Vec<EdgeSpec>,
    pub sections: Vec<SectionSpec>,
}

/// Parses the network format
///
/// * vertices 4
/// * edge e0 0 1 10.0
/// * section ttd0 e0 e1 e2
///
/// Sections list edge names in track order and may refer to edges
/// declared further down.
pub fn parse_network(input: &str) -> Result<NetworkDescription, ParseError> {
    let vertices_re = Regex::new(r"^\s*vertices\s+(\d+)\s*$")
        .map_err(|e| ParseError::RegexError(format!("{:?}", e)))?;
    let edge_re = Regex::new(r"(?x) ^ \s* edge \s+ (?P<name>[\w\.]+) \s+
            (?P<from>\d+) \s+ (?P<to>\d+) \s+ (?P<len>[\d\.]+) \s* $")
        .map_err(|e| ParseError::RegexError(format!("{:?}", e)))?;
    let section_re = Regex::new(r"^\s*section\s+([\w\.]+)((?:\s+[\w\.]+)+)\s*$")
        .map_err(|e| ParseError::RegexError(format!("{:?}", e)))?;

    let mut vertex_count = None;
    let mut edges: Vec<EdgeSpec> = Vec::new();
    let mut edge_names = HashMap::new();
    let mut section_lines = Vec::new();

    for (idx, line) in input.lines().enumerate() {
        let line_no = idx + 1;
        if is_blank(line) {
            continue;
        }
        if let Some(groups) = vertices_re.captures(line) {
            vertex_count = Some(number::<usize>(line_no, &groups[1])?);
            continue;
        }
        if let Some(groups) = edge_re.captures(line) {
            let name = groups["name"].to_string();
            if edge_names.insert(name.clone(), edges.len()).is_some() {
                return Err(ParseError::Duplicate(line_no, name));
            }
            edges.push((
                name,
                number(line_no, &groups["from"])?,
                number(line_no, &groups["to"])?,
                number(line_no, &groups["len"])?,
            ));
            continue;
        }
        if let Some(groups) = section_re.captures(line) {
            let members = groups[2]
                .split_whitespace()
                .map(|s| s.to_string())
                .collect::<Vec<_>>();
            section_lines.push((line_no, groups[1].to_string(), members));
            continue;
        }
        return Err(ParseError::Unrecognized(line_no, line.to_string()));
    }

    let mut sections = Vec::new();
    let mut section_names = HashMap::new();
    for (line_no, name, members) in section_lines {
        if section_names.insert(name.clone(), sections.len()).is_some() {
            return Err(ParseError::Duplicate(line_no, name));
        }
        let mut ids = Vec::new();
        for m in members {
            match edge_names.get(&m) {
                Some(id) => ids.push(*id),
                None => return Err(ParseError::UnknownEdge(line_no, m)),
            }
        }
        sections.push((name, ids));
    }

    Ok(NetworkDescription {
        vertex_count: vertex_count.ok_or(ParseError::MissingVertexCount)?,
        edges,
        sections,
    })
}

pub(crate) fn number<T: std::str::FromStr>(line_no: usize, s: &str) -> Result<T, ParseError> {
    s.parse::<T>()
        .map_err(|_e| ParseError::NumberError(line_no, s.to_string()))
}
