pub mod network_parser;
pub mod train_parser;

#[derive(Debug, Fail, PartialEq)]
pub enum ParseError {
    #[fail(display = "error in regular expression: {}", _0)]
    RegexError(String),
    #[fail(display = "line {}: error converting number \"{}\"", _0, _1)]
    NumberError(usize, String),
    #[fail(display = "line {}: unknown edge \"{}\"", _0, _1)]
    UnknownEdge(usize, String),
    #[fail(display = "line {}: duplicate name \"{}\"", _0, _1)]
    Duplicate(usize, String),
    #[fail(display = "missing vertex count declaration")]
    MissingVertexCount,
    #[fail(display = "line {}: unrecognized statement: {}", _0, _1)]
    Unrecognized(usize, String),
}

pub(crate) fn is_blank(line: &str) -> bool {
    let line = line.trim();
    line.is_empty() || line.starts_with('#')
}
