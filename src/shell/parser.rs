//! Input line tokenizing.
//!
//! Words are separated by whitespace; there is no quoting.

/// A command name followed by its positional arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine<'a> {
    pub name: &'a str,
    pub args: Vec<&'a str>,
}

/// Split a line into command name and arguments.
///
/// Returns `None` for blank lines.
pub fn parse_line(line: &str) -> Option<ParsedLine<'_>> {
    let mut words = line.split_whitespace();
    let name = words.next()?;
    Some(ParsedLine {
        name,
        args: words.collect(),
    })
}
