//! A small regular-expression engine: compile a pattern into a compact
//! state graph, then scan text for the leftmost matching substring.
//!
//! The grammar, the two-successor state encoding, and the simulator's
//! simultaneous-exploration strategy are a direct Rust port of a classic
//! teaching regex engine (`re24.c`/`sm.c`/`dq.c`): no back-references, no
//! character classes beyond `.`, no counted repetition, single-byte input.
//!
//! ```
//! let machine = ret::compile("Z(A|B)CC*", true).unwrap();
//! let m = machine.find("ZACCC").unwrap().unwrap();
//! assert_eq!((m.start(), m.end()), (0, 5));
//! ```

mod compiler;
mod deque;
mod error;
mod lexer;
mod optimizer;
mod simulator;
mod state;

pub use compiler::compile;
pub use error::{CompileError, CompileResult, MatchError, MatchResult};
pub use simulator::{FindIter, Match, MAX_TRANSITIONS};
pub use state::Machine;
