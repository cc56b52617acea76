//! Recursive-descent compiler: pattern text → [`Machine`].
//!
//! This is the Rust counterpart of `expression`/`term`/`factor`/`re_compile`
//! in `re24.c`. The grammar and the two-successor wiring tricks (positional
//! concatenation, the alternation join-node placement, the closure
//! loop/exit node) are carried over faithfully; what changes is the
//! propagation of failure (`Result`/`?` instead of `setjmp`/`longjmp`), the
//! fact that the "current output position" a state's successor is patched
//! against is looked up through `StateStore::state`/`state_mut` instead of
//! raw pointer arithmetic on a global array, and the dropped dot-closure
//! pointer swap (see `crate::simulator`).

use crate::error::{CompileError, CompileResult};
use crate::lexer::{Lexer, Token};
use crate::state::{Event, Machine, NextState, StateStore};

/// Compiles `pattern` into a [`Machine`]. When `optimise` is true, the
/// ε-chain collapsing pass in [`crate::optimizer`] runs afterward (`-o`
/// disables this in the CLI, mirroring the original's `RE_OPT` flag, which
/// defaults to on).
pub fn compile(pattern: &str, optimise: bool) -> CompileResult<Machine> {
    let mut compiler = Compiler::new(pattern)?;
    let entry = compiler.expression()?;

    // The original silently ignores anything left over after a complete
    // expression parses; this rejects trailing garbage (e.g. a stray `)`)
    // instead of compiling it into an always-true no-op, which is a
    // deliberate tightening documented in DESIGN.md.
    let trailing = compiler.lexer.next();
    if trailing != Token::Eof {
        return Err(if trailing == Token::Rp {
            CompileError::UnbalancedParentheses
        } else {
            CompileError::MalformedExpression
        });
    }

    // Wrap the real entry behind state 0, exactly as `re_compile` does with
    // `sm_insert(0, RE_NODE, expression(), 0)`. State 0 is never revisited
    // during simulation; it only exists so "the start" is a stable index.
    compiler
        .store
        .insert(0, Event::Node, NextState::Index(entry), NextState::Terminal);

    let terminal = compiler.next_state;
    compiler
        .store
        .insert(terminal, Event::Node, NextState::Terminal, NextState::Terminal);

    let machine = compiler.store.into_machine();
    Ok(if optimise {
        crate::optimizer::optimise(machine)
    } else {
        machine
    })
}

struct Compiler<'a> {
    lexer: Lexer<'a>,
    store: StateStore,
    /// The next state index available for allocation ("state" in the C
    /// source, which this compiler threads explicitly instead of through a
    /// module-global).
    next_state: usize,
}

impl<'a> Compiler<'a> {
    fn new(pattern: &'a str) -> CompileResult<Self> {
        Ok(Compiler {
            lexer: Lexer::new(pattern)?,
            store: StateStore::new(),
            next_state: 1,
        })
    }

    fn alloc(&mut self) -> usize {
        let idx = self.next_state;
        self.next_state += 1;
        idx
    }

    /// `E := T ('|' E)?`
    fn expression(&mut self) -> CompileResult<usize> {
        let t1 = self.term()?;
        let mut expr = t1;

        let token = self.lexer.next();
        if token == Token::Or {
            // Reserve the join node (at the index T's last atom already
            // expects as its continuation) and the new entry node right
            // after it, before recursing into the right-hand alternate.
            let join_idx = self.next_state;
            let entry_idx = self.next_state + 1;
            self.next_state += 2;

            let right_entry = self.expression()?;

            self.store.insert(
                entry_idx,
                Event::Node,
                NextState::Index(right_entry),
                NextState::Index(t1),
            );

            let join_target = self.next_state;
            self.store.insert(
                join_idx,
                Event::Node,
                NextState::Index(join_target),
                NextState::Index(join_target),
            );

            expr = entry_idx;
        } else {
            self.lexer.unlex(token);
        }

        Ok(expr)
    }

    /// `T := F ( F )*`
    fn term(&mut self) -> CompileResult<usize> {
        let t = self.factor()?;

        let token = self.lexer.next();
        self.lexer.unlex(token);
        if starts_factor(token) {
            // The continuation factor allocates contiguously right after
            // this one; `t`'s last atom already points its successor at
            // that position, so nothing further needs wiring here.
            self.term()?;
        }

        Ok(t)
    }

    /// `F := '(' E ')' | atom`, optionally suffixed by `*`.
    fn factor(&mut self) -> CompileResult<usize> {
        let t1 = self.next_state;
        let token = self.lexer.next();

        let t2 = if token == Token::Lp {
            let inner_entry = self.expression()?;
            let close = self.lexer.next();
            if close != Token::Rp {
                return Err(CompileError::UnbalancedParentheses);
            }
            self.patch_predecessor(t1, inner_entry);
            inner_entry
        } else if let Some(event) = atom_event(token) {
            let idx = self.alloc();
            self.store
                .insert(idx, event, NextState::Index(self.next_state), NextState::Terminal);
            idx
        } else {
            return Err(CompileError::MalformedExpression);
        };

        let maybe_cl = self.lexer.next();
        if maybe_cl != Token::Cl {
            self.lexer.unlex(maybe_cl);
            return Ok(t2);
        }

        // Closure: allocate the loop/exit ε-node. `next1` loops back to the
        // start of `X`, `next2` exits past the closure. The simulator
        // doesn't special-case `.` here (see `crate::simulator`): it keeps
        // simulating every active thread until the frontier dies rather
        // than returning on the first thread to reach the terminal, so
        // the loop/exit edges don't need a dot-specific swap to get greedy
        // (longest) closures right — a simplification over the original's
        // pointer-swap hack, noted in DESIGN.md.
        let closure_idx = self.alloc();
        self.store.insert(
            closure_idx,
            Event::Node,
            NextState::Index(t2),
            NextState::Index(self.next_state),
        );
        self.patch_predecessor(t1, closure_idx);

        Ok(closure_idx)
    }

    /// Rewrites the successor of the state immediately preceding this
    /// factor (index `t1 - 1`) so that it points at `target` instead of the
    /// naive "next slot" it assumed when it was emitted. Needed because a
    /// group or closure's real entry is not always the very next index
    /// (e.g. an alternation inside parens enters at `t1 + 1`, not `t1`).
    ///
    /// When `t1 == 1` there is no real predecessor yet (this factor opens
    /// the whole pattern); the patch lands on the placeholder for state 0,
    /// which `compile` overwrites unconditionally afterward, so any value
    /// written here is moot.
    fn patch_predecessor(&mut self, t1: usize, target: usize) {
        if t1 == 0 {
            return;
        }
        let pred_idx = t1 - 1;
        let pred = match self.store.state(pred_idx) {
            Some(s) => *s,
            None => return,
        };

        match pred.event {
            Event::Literal(_) | Event::Dot | Event::Bol | Event::Eol => {
                self.store.state_mut(pred_idx).unwrap().next1 = NextState::Index(target);
            }
            Event::Node => {
                let patch_next1 = match (pred.next1.index(), pred.next2.index()) {
                    (Some(a), Some(b)) => a > b,
                    _ => false,
                };
                let slot = self.store.state_mut(pred_idx).unwrap();
                if patch_next1 {
                    slot.next1 = NextState::Index(target);
                } else {
                    slot.next2 = NextState::Index(target);
                }
            }
        }
    }
}

fn atom_event(token: Token) -> Option<Event> {
    match token {
        Token::Literal(b) => Some(Event::Literal(b)),
        Token::Dot => Some(Event::Dot),
        Token::Bol => Some(Event::Bol),
        Token::Eol => Some(Event::Eol),
        _ => None,
    }
}

fn starts_factor(token: Token) -> bool {
    matches!(
        token,
        Token::Literal(_) | Token::Dot | Token::Lp | Token::Bol | Token::Eol
    )
}
