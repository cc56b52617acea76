//! Optional ε-chain collapsing pass, run after `compile()` unless the
//! caller disables it (`-o` in the CLI, mirroring the original's `RE_OPT`).
//!
//! `re24.c`'s `optimize()` walks the state array forward once, and whenever
//! it finds a maximal run of bare `NODE` states whose only edge is to the
//! next sequential index, rewrites the run's first state to jump straight
//! to the run's final target. This changes the machine's shape but not the
//! language it accepts (§8's round-trip property).

use crate::state::{Event, Machine, NextState};

/// Collapses straight-line ε-chains in `machine`, returning the optimised
/// machine. A no-op on machines with no such chains.
pub fn optimise(machine: Machine) -> Machine {
    let max_state = machine.max_state();
    let mut next1 = Vec::with_capacity(max_state + 1);
    let mut next2 = Vec::with_capacity(max_state + 1);
    let mut events = Vec::with_capacity(max_state + 1);

    for i in 0..=max_state {
        let state = machine.state(i).expect("index within max_state is present");
        events.push(state.event);
        next1.push(state.next1);
        next2.push(state.next2);
    }

    // A state is a collapsible link in a chain when it is a bare ε-node
    // whose only edge is the trivial "fall through to the next index"
    // (next1 == i + 1, next2 == Terminal, i.e. the placeholder an atom or
    // group leaves for an enclosing construct to patch — once patched to a
    // real successor it is no longer of this shape and is left alone).
    let is_chain_link = |i: usize| -> bool {
        matches!(events[i], Event::Node)
            && next1[i] == NextState::Index(i + 1)
            && next2[i] == NextState::Terminal
    };

    for i in 0..=max_state {
        if !is_chain_link(i) {
            continue;
        }
        // Find the chain's final target by following the trivial links.
        let mut target = i;
        while is_chain_link(target) {
            target += 1;
            if target > max_state {
                target = max_state;
                break;
            }
        }
        if target != i + 1 {
            next1[i] = NextState::Index(target);
        }
    }

    let mut out = crate::state::StateStore::new();
    for i in 0..=max_state {
        out.insert(i, events[i], next1[i], next2[i]);
    }
    out.into_machine()
}

#[cfg(test)]
mod tests {
    use crate::compiler::compile;

    #[test]
    fn optimised_and_unoptimised_machines_accept_the_same_language() {
        for pattern in ["Z(A|B)CC*", "(a*b|ac)d", "z(a.*|b)z", "^abc$", "a*", "."] {
            let plain = compile(pattern, false).unwrap();
            let optimised = compile(pattern, true).unwrap();
            for input in ["", "a", "abc", "ZACCC", "xZBC", "acd", "zbbz", "zzaaaaaaaaaaaz"] {
                assert_eq!(
                    plain.find(input).unwrap().map(|m| (m.start(), m.end())),
                    optimised.find(input).unwrap().map(|m| (m.start(), m.end())),
                    "pattern {pattern:?} input {input:?} diverged between optimised and plain"
                );
            }
        }
    }

    #[test]
    fn optimiser_is_a_no_op_on_a_pattern_with_no_chains() {
        let plain = compile("a", false).unwrap();
        let optimised = compile("a", true).unwrap();
        assert_eq!(plain.max_state(), optimised.max_state());
    }
}
