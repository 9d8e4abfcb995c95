// Copyright 2014-2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Drives the two-frontier NFA simulation over an input byte slice.

use crate::program::{Dest, Inst, Program};

/// The result of running a compiled program against an input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchOutcome {
    /// `input[start..end]` is the match.
    ///
    /// `end` can equal `input.len() + 1` when the accepting transition
    /// is a trailing negated assertion (e.g. `{.}`, "nothing more can
    /// be consumed here") that only succeeds on the virtual end-of-input
    /// tick run one position past the last real byte. Slice `input`
    /// with `end.min(input.len())` rather than `end` directly if that
    /// matters to the caller.
    Found { start: usize, end: usize },
    /// No accepting path was found.
    NotFound,
    /// The input was empty; matching never ran.
    EmptyInput,
}

/// A set of active instruction indices at one input position, paired
/// with a membership flag per index so re-pushes can be collapsed
/// instead of processed twice (keeping the earlier of the two starts).
struct Frontier {
    stack: Vec<usize>, // instruction indices; `start` is the source of truth
    on: Vec<bool>,
    start: Vec<usize>,
}

impl Frontier {
    fn new(n: usize) -> Frontier {
        Frontier { stack: Vec::with_capacity(n), on: vec![false; n], start: vec![0; n] }
    }

    fn clear(&mut self) {
        self.stack.clear();
        for b in self.on.iter_mut() {
            *b = false;
        }
    }

    /// Pushes `idx` with `start`, keeping the smaller start if already
    /// present, and skipping the stack push entirely in that case --
    /// `start[idx]` stays the single source of truth even if a pending
    /// stack entry for `idx` is updated before it's popped.
    fn push(&mut self, idx: usize, start: usize) {
        if self.on[idx] {
            if start < self.start[idx] {
                self.start[idx] = start;
            }
            return;
        }
        self.on[idx] = true;
        self.start[idx] = start;
        self.stack.push(idx);
    }
}

/// Runs `program` against `input`, returning the first accepting match
/// or `NotFound`. Never backtracks: each input byte is consumed by at
/// most one outer step.
///
/// The input is treated the way the dialect's NUL-terminated source
/// treats a C string: one tick beyond the last real byte is run with a
/// virtual NUL, so that a trailing negated assertion like `{.}` (used
/// to mean "nothing more can be consumed here") can actually succeed at
/// end of input. An embedded `0` byte anywhere in `input` ends matching
/// right after the tick that observes it, exactly like a C string
/// terminator would.
pub(crate) fn run(program: &Program, input: &[u8]) -> MatchOutcome {
    if input.is_empty() {
        return MatchOutcome::EmptyInput;
    }

    let n = program.len();
    let mut current = Frontier::new(n);
    let mut next = Frontier::new(n);
    current.push(0, 0);

    let mut pos = 0;
    loop {
        let c = input.get(pos).copied().unwrap_or(0);
        while let Some(j) = current.stack.pop() {
            let start = current.start[j];
            current.on[j] = false;
            let start = if j == 0 && matches!(program.insts[j], Inst::Split) {
                // A leading repeat's entry point always re-targets the
                // current position -- see the dedicated note in the
                // design doc; this is deliberately not generalized to
                // any other instruction index.
                pos
            } else {
                start
            };

            match &program.insts[j] {
                Inst::Split => {
                    if let Some(out) = enqueue(&mut current, program.jumps[j], start, pos, false) {
                        return out;
                    }
                    if let Some(out) = enqueue(&mut current, program.jumpf[j], start, pos, false) {
                        return out;
                    }
                }
                Inst::Literal(b) => {
                    let dest = if c == *b { program.jumps[j] } else { program.jumpf[j] };
                    if let Some(out) = enqueue(&mut next, dest, start, pos, true) {
                        return out;
                    }
                }
                Inst::Any => {
                    // "." matches any byte except NUL -- including the
                    // virtual NUL tick past the end of input, which is
                    // exactly what lets a trailing `{.}` detect end of
                    // string.
                    let dest = if c != 0 { program.jumps[j] } else { program.jumpf[j] };
                    if let Some(out) = enqueue(&mut next, dest, start, pos, true) {
                        return out;
                    }
                }
                Inst::Class { byte, last } => {
                    if c == *byte {
                        // A class member always consumes the byte on a
                        // match, interior or not.
                        if let Some(out) = enqueue(&mut next, program.jumps[j], start, pos, true) {
                            return out;
                        }
                    } else if *last {
                        if let Some(out) = enqueue(&mut next, program.jumpf[j], start, pos, true) {
                            return out;
                        }
                    } else {
                        // Interior member: retry the next member of the
                        // same class against this same byte.
                        if let Some(out) =
                            enqueue(&mut current, program.jumpf[j], start, pos, false)
                        {
                            return out;
                        }
                    }
                }
            }
        }

        std::mem::swap(&mut current, &mut next);
        next.clear();

        if c == 0 {
            break;
        }
        pos += 1;
    }

    MatchOutcome::NotFound
}

/// Enqueues `dest` onto `frontier` with the given `start`. Returns
/// `Some` immediately if `dest` is `Accept` -- a match completes the
/// instant it's reached, mid-drain, without waiting for the rest of
/// the frontier to resolve. `consumed` records whether reaching this
/// destination required consuming `input[pos]`, which decides whether
/// the reported `end` is `pos` or `pos + 1`.
fn enqueue(
    frontier: &mut Frontier,
    dest: Dest,
    start: usize,
    pos: usize,
    consumed: bool,
) -> Option<MatchOutcome> {
    match dest {
        Dest::Accept => Some(MatchOutcome::Found {
            start,
            end: if consumed { pos + 1 } else { pos },
        }),
        Dest::Abandon => None,
        Dest::Goto(idx) => {
            frontier.push(idx, start);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::MatchOutcome;
    use crate::compile::compile;
    use crate::parse::parse;

    fn exec(pattern: &str, input: &[u8]) -> MatchOutcome {
        let ast = parse(pattern.as_bytes()).unwrap();
        compile(&ast).unwrap().exec(input)
    }

    #[test]
    fn any_rejects_nul() {
        // A literal NUL byte can never match `.`, including the virtual
        // end-of-input tick.
        assert_eq!(exec(".", b"\0"), MatchOutcome::NotFound);
    }

    #[test]
    fn trailing_negated_any_matches_on_the_virtual_nul_tick() {
        // "nothing follows this 'a'" -- only provable by running one
        // tick past the real input and observing it can't match `.`.
        // `end` lands one past `input.len()` because that tick is where
        // the accepting transition happens.
        assert_eq!(exec("a{.}", b"a"), MatchOutcome::Found { start: 0, end: 2 });
    }

    #[test]
    fn trailing_negated_any_fails_when_more_input_remains() {
        assert_eq!(exec("a{.}", b"ab"), MatchOutcome::NotFound);
    }

    #[test]
    fn embedded_nul_terminates_matching_like_a_c_string() {
        // A literal 0 byte inside the slice ends the simulation right
        // after the tick that observes it, the same as the dialect's
        // NUL-terminated source would stop at an embedded terminator.
        assert_eq!(exec("ab", b"a\0b"), MatchOutcome::NotFound);
    }

    #[test]
    fn leading_repeat_reports_latest_reentry_as_start() {
        assert_eq!(exec("a*bc", b"aabc"), MatchOutcome::Found { start: 2, end: 4 });
    }
}
