//! Small helpers shared by the state machine.

/// What a single step of the state machine produced.
pub(crate) enum ControlToken<T> {
    /// No token yet, keep stepping.
    Continue,
    /// A finished token to hand to the caller.
    Emit(T),
    /// The input is exhausted and nothing is pending.
    Done,
}

/// The characters the tokenizer treats as whitespace: tab, line feed, form
/// feed, carriage return and space.
macro_rules! whitespace_pat {
    () => {
        '\t' | '\n' | '\x0C' | '\r' | ' '
    };
}

pub(crate) use whitespace_pat;
