mod code;
mod logger;
mod position;

use once_cell::unsync::OnceCell;

/// A line/column location within a source buffer, used for tokenizer
/// diagnostics.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

/// A source buffer paired with a lazily-computed index of newline offsets,
/// used to turn a byte offset into a [Position] without rescanning from the
/// start each time.
pub struct Code<'c> {
    pub value: &'c [u8],
    line_breaks: OnceCell<Vec<usize>>,
}

/// Debug-trace verbosity for [Sequence](crate::parser::Sequence) and
/// [Branch](crate::parser::Branch) nodes.
///
/// Ordered `None < Default < Success < Result < Verbose`; a node only
/// prints a given message if its configured level's [Log::order] is at
/// least the message's own order.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Log<T> {
    None,
    Default(T),
    Success(T),
    Result(T),
    Verbose(T),
}
