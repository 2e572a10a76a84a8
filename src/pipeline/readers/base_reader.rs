use crate::error::Result;

/// A source of raw input lines, header first.
pub trait BaseReader {
    fn read_lines(self) -> Box<dyn Iterator<Item = Result<String>>>;
}
