//! The NFA simulator: `sm.c`'s `re_startSim`/`stateSim` machinery.
//!
//! The compiled [`Machine`] is walked breadth-first through a [`WorkDeque`],
//! exploring every active state simultaneously so that alternation and
//! closure never need backtracking. The original drives this with a single
//! process-wide deque and a process-wide `j`/`BOLflag`; here both are local
//! to one `run_from` call, so the same `Machine` can be matched from
//! multiple threads concurrently.

use crate::deque::{WorkDeque, WorkItem};
use crate::error::{MatchError, MatchResult};
use crate::state::{Event, Machine, NextState};

/// Transition budget per starting offset, matching the original's
/// `MAXTRANS` guard in `stateSim`.
pub const MAX_TRANSITIONS: usize = 1000;

/// A successful match: half-open byte offsets into the input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Match {
    start: usize,
    end: usize,
}

impl Match {
    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }
}

impl Machine {
    /// Finds the leftmost match of this machine against `input`, trying
    /// successive starting offsets `0, 1, …` until one succeeds or the
    /// input is exhausted (§4.5's `match` procedure).
    pub fn find(&self, input: &str) -> MatchResult<Option<Match>> {
        let bytes = input.as_bytes();
        for start in 0..=bytes.len() {
            if let Some(end) = self.run_from(bytes, start)? {
                return Ok(Some(Match { start, end }));
            }
        }
        Ok(None)
    }

    /// Iterates non-overlapping leftmost matches left to right, advancing
    /// past a zero-width match by one byte to guarantee progress. An
    /// ergonomic addition beyond the distilled core, modeled on the
    /// teacher's `find_overlapping_iter`, simplified to non-overlapping
    /// single matches (how a line-oriented grep-like tool consumes a
    /// pattern).
    pub fn find_iter<'m, 'i>(&'m self, input: &'i str) -> FindIter<'m, 'i> {
        FindIter {
            machine: self,
            input,
            pos: 0,
            done: false,
        }
    }

    /// Runs the simulator starting at byte offset `start`, returning the
    /// furthest offset at which the terminal state was reached, if any.
    ///
    /// All active threads are kept alive until the frontier dies out
    /// (rather than returning as soon as any one thread reaches the
    /// terminal): a thread reaching the terminal early, while a sibling
    /// thread is still consuming more input through a closure, must not
    /// cut the sibling off, or trailing closures like the `C*` in
    /// `Z(A|B)CC*` would stop after the first `C` instead of consuming
    /// greedily. `best_end` tracks the latest (and therefore longest)
    /// offset at which the terminal was reached; since `j` only advances,
    /// the last update is always the longest.
    fn run_from(&self, bytes: &[u8], start: usize) -> MatchResult<Option<usize>> {
        let mut deque = WorkDeque::with_capacity(2 * (self.max_state() + 1));
        deque.push_tail(WorkItem::State(self.entry()));
        deque.push_tail(WorkItem::Scan);

        let mut j = start;
        let mut eol_required = false;
        let mut transitions = 0usize;
        let mut best_end: Option<usize> = None;
        let mut progressed = false;

        while let Some(item) = deque.pop_head() {
            transitions += 1;
            if transitions > MAX_TRANSITIONS {
                return Err(MatchError::TransitionLimitExceeded {
                    limit: MAX_TRANSITIONS,
                });
            }

            let idx = match item {
                WorkItem::Scan => {
                    if !progressed {
                        // No thread survived into the next position: the
                        // frontier is dead and further Scan markers would
                        // only spin until the transition budget trips.
                        break;
                    }
                    progressed = false;
                    j += 1;
                    if j > bytes.len() {
                        break;
                    }
                    deque.push_tail(WorkItem::Scan);
                    continue;
                }
                WorkItem::State(idx) => idx,
            };

            let state = match self.state(idx) {
                Some(s) => s,
                None => continue,
            };

            if state.is_terminal() {
                if !eol_required || j == bytes.len() {
                    best_end = Some(j);
                }
                continue;
            }

            match state.event {
                Event::Node => {
                    push_successor(&mut deque, state.next1, idx);
                    push_successor(&mut deque, state.next2, idx);
                }
                Event::Bol => {
                    // Anchored to the current scan position, not this
                    // attempt's starting offset: a `^` nested inside an
                    // alternate reached only after other input has already
                    // been consumed earlier in the same concatenation (e.g.
                    // `a(b|^c)`) must still be rejected once `j != 0`, even
                    // though `start == 0` for the whole attempt.
                    if j == 0 {
                        push_successor(&mut deque, state.next1, idx);
                    }
                }
                Event::Eol => {
                    eol_required = true;
                    push_successor(&mut deque, state.next1, idx);
                }
                Event::Literal(want) => {
                    if bytes.get(j) == Some(&want) {
                        push_successor_tail(&mut deque, state.next1);
                        progressed = true;
                    }
                }
                Event::Dot => {
                    if j < bytes.len() {
                        push_successor_tail(&mut deque, state.next1);
                        progressed = true;
                    }
                }
            }
        }

        Ok(best_end)
    }

    /// The state the machine actually begins exploring from: state 0 is
    /// the `Node` wrapper `compile` installs around the real entry, so the
    /// simulator starts one hop past it, matching the original's
    /// `sm_state(0)->next1` seed.
    fn entry(&self) -> usize {
        match self.state(0).and_then(|s| s.next1.index()) {
            Some(i) => i,
            None => 0,
        }
    }
}

fn push_successor(deque: &mut WorkDeque, next: NextState, predecessor: usize) {
    if let Some(i) = next.index() {
        if i != predecessor {
            deque.push_head(WorkItem::State(i));
        }
    }
}

fn push_successor_tail(deque: &mut WorkDeque, next: NextState) {
    if let Some(i) = next.index() {
        deque.push_tail(WorkItem::State(i));
    }
}

/// Iterator over successive non-overlapping leftmost matches, returned by
/// [`Machine::find_iter`].
pub struct FindIter<'m, 'i> {
    machine: &'m Machine,
    input: &'i str,
    pos: usize,
    done: bool,
}

impl Iterator for FindIter<'_, '_> {
    type Item = MatchResult<Match>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.pos > self.input.len() {
            return None;
        }

        let bytes = self.input.as_bytes();
        for start in self.pos..=bytes.len() {
            match self.machine.run_from(bytes, start) {
                Ok(Some(end)) => {
                    self.pos = if end > start { end } else { end + 1 };
                    return Some(Ok(Match { start, end }));
                }
                Ok(None) => continue,
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }

        self.done = true;
        None
    }
}
