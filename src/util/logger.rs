use std::fmt::{Debug, Display, Formatter};

use super::Log;

impl<T: Display> Display for Log<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Log::None => Ok(()),
            Log::Default(s) | Log::Success(s) | Log::Result(s) | Log::Verbose(s) => {
                write!(f, "{}", s)
            }
        }
    }
}

impl<T> Log<T> {
    /// Function which return order of the log.
    pub fn order(&self) -> u8 {
        match self {
            Log::None => 0,
            Log::Default(_) => 1,
            Log::Success(_) => 2,
            Log::Result(_) => 3,
            Log::Verbose(_) => 4,
        }
    }
}

impl<TL: Display> Log<TL> {
    /// Trace entry into a named node's drive loop at position `pos`.
    pub fn log_entry(&self, pos: usize) {
        #[cfg(debug_assertions)]
        if self.order() >= Log::Default(()).order() {
            println!("[{}; entry]: at {}", self, pos);
        }
    }

    /// Trace a successful match ending at `end`.
    pub fn log_success(&self, end: usize) {
        #[cfg(debug_assertions)]
        if self.order() >= Log::Success(()).order() {
            println!("[{}; success]: end {}", self, end);
        }
    }

    /// Trace the result tree of a successful match.
    pub fn log_result<T: Debug>(&self, result: &T) {
        #[cfg(debug_assertions)]
        if self.order() >= Log::Result(()).order() {
            println!("[{}; result]: {:?}", self, result);
        }
    }

    /// Trace exhaustion of every candidate at position `pos`.
    pub fn log_error(&self, pos: usize) {
        #[cfg(debug_assertions)]
        if self.order() >= Log::Default(()).order() {
            println!("[{}; no-match]: at {}", self, pos);
        }
    }
}
