// Copyright 2014-2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Lowers an [`Ast`] into a [`Program`].
//!
//! Every instruction's success and failure destinations are set exactly
//! once, right after the instruction is pushed and its sub-pattern (if
//! any) is fully compiled -- there is no patch list of dangling jumps to
//! thread through the recursion, because each node always knows, the
//! moment it finishes, where "what comes after me" begins: it's just
//! the next free slot in the instruction stream.

use crate::error::CompileError;
use crate::parse::Ast;
use crate::program::{Dest, Inst, Program};

/// Default instruction budget. Chosen generously for a dialect with no
/// bounded repetition counts; see [`Compiler::with_limit`] to change it.
pub const DEFAULT_SIZE_LIMIT: usize = 10 * (1 << 20);

pub(crate) struct Compiler {
    insts: Vec<Inst>,
    jumps: Vec<Dest>,
    jumpf: Vec<Dest>,
    limit: usize,
}

impl Compiler {
    pub(crate) fn new() -> Compiler {
        Compiler::with_limit(DEFAULT_SIZE_LIMIT)
    }

    pub(crate) fn with_limit(limit: usize) -> Compiler {
        Compiler { insts: vec![], jumps: vec![], jumpf: vec![], limit }
    }

    pub(crate) fn compile(mut self, ast: &Ast) -> Result<Program, CompileError> {
        self.c(ast, false)?;
        self.check_size()?;
        // Any destination that fell through past the very last
        // instruction was always destined for acceptance -- finalize
        // those now that the program's length is fixed.
        let end = Dest::Goto(self.insts.len());
        for d in self.jumps.iter_mut().chain(self.jumpf.iter_mut()) {
            if *d == end {
                *d = Dest::Accept;
            }
        }
        Ok(Program::new(self.insts, self.jumps, self.jumpf))
    }

    fn check_size(&self) -> Result<(), CompileError> {
        if self.insts.len() > self.limit {
            return Err(CompileError::ProgramTooLarge { limit: self.limit });
        }
        Ok(())
    }

    /// Appends `inst` with placeholder destinations and returns its index.
    /// The real destinations are filled in by `set` once they're known.
    fn push(&mut self, inst: Inst) -> usize {
        self.insts.push(inst);
        self.jumps.push(Dest::Abandon);
        self.jumpf.push(Dest::Abandon);
        self.insts.len() - 1
    }

    /// Sets instruction `i`'s destinations. `negated` swaps success and
    /// failure: under a `{...}` this instruction sits inside, a byte
    /// that *would* have matched now kills the thread, and a byte that
    /// wouldn't have now carries it forward.
    fn set(&mut self, i: usize, on_match: Dest, on_mismatch: Dest, negated: bool) {
        if negated {
            self.jumps[i] = on_mismatch;
            self.jumpf[i] = on_match;
        } else {
            self.jumps[i] = on_match;
            self.jumpf[i] = on_mismatch;
        }
    }

    fn here(&self) -> usize {
        self.insts.len()
    }

    fn c(&mut self, ast: &Ast, negated: bool) -> Result<(), CompileError> {
        self.check_size()?;
        match ast {
            Ast::Empty => {}

            Ast::Literal(b) => {
                let i = self.push(Inst::Literal(*b));
                self.set(i, Dest::Goto(i + 1), Dest::Abandon, negated);
            }

            Ast::Any => {
                let i = self.push(Inst::Any);
                self.set(i, Dest::Goto(i + 1), Dest::Abandon, negated);
            }

            Ast::Class(members) => {
                let start = self.here();
                let n = members.len();
                for (k, byte) in members.iter().enumerate() {
                    self.push(Inst::Class { byte: *byte, last: k + 1 == n });
                }
                let end = self.here();
                for k in 0..n {
                    let idx = start + k;
                    let last = k + 1 == n;
                    let on_mismatch = if last { Dest::Abandon } else { Dest::Goto(idx + 1) };
                    self.set(idx, Dest::Goto(end), on_mismatch, negated);
                }
            }

            Ast::Concat(parts) => {
                for part in parts {
                    self.c(part, negated)?;
                }
            }

            Ast::Negate(inner) => {
                self.c(inner, !negated)?;
            }

            Ast::Maybe(inner) => {
                // split; body; (falls through to whatever comes next)
                let split = self.push(Inst::Split);
                let body_start = split + 1;
                self.c(inner, negated)?;
                let after = self.here();
                self.set(split, Dest::Goto(body_start), Dest::Goto(after), negated);
            }

            Ast::Star(inner) => {
                // split; body; jump back to split; (falls through after)
                let split = self.push(Inst::Split);
                let body_start = split + 1;
                self.c(inner, negated)?;
                let loop_back = self.push(Inst::Split);
                let after = self.here();
                self.set(split, Dest::Goto(body_start), Dest::Goto(after), negated);
                self.set(loop_back, Dest::Goto(split), Dest::Goto(split), negated);
            }

            Ast::Alt(lhs, rhs) => {
                // split; lhs; jump past rhs; rhs; (falls through after)
                let split = self.push(Inst::Split);
                let lhs_start = split + 1;
                self.c(lhs, negated)?;
                let skip = self.push(Inst::Split);
                let rhs_start = skip + 1;
                self.c(rhs, negated)?;
                let after = self.here();
                self.set(split, Dest::Goto(lhs_start), Dest::Goto(rhs_start), negated);
                self.set(skip, Dest::Goto(after), Dest::Goto(after), negated);
            }
        }
        self.check_size()
    }
}

/// Parses and compiles `pattern` in one step.
pub(crate) fn compile(ast: &Ast) -> Result<Program, CompileError> {
    Compiler::new().compile(ast)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse;

    fn compiled(pattern: &str) -> Program {
        let ast = parse(pattern.as_bytes()).unwrap();
        compile(&ast).unwrap()
    }

    #[test]
    fn literal_falls_through_to_accept() {
        let p = compiled("a");
        assert_eq!(p.len(), 1);
        assert!(matches!(p.insts[0], Inst::Literal(b'a')));
        assert_eq!(p.jumps[0], Dest::Accept);
        assert_eq!(p.jumpf[0], Dest::Abandon);
    }

    #[test]
    fn class_last_member_abandons_on_mismatch() {
        let p = compiled("[ab]");
        assert!(matches!(p.insts[0], Inst::Class { byte: b'a', last: false }));
        assert!(matches!(p.insts[1], Inst::Class { byte: b'b', last: true }));
        assert_eq!(p.jumpf[1], Dest::Abandon);
        assert_eq!(p.jumpf[0], Dest::Goto(1));
    }

    #[test]
    fn star_loops_back_to_its_split() {
        let p = compiled("a*");
        // insts: Split(0), Literal(1), Split-as-jump(2)
        assert_eq!(p.len(), 3);
        assert!(matches!(p.insts[0], Inst::Split));
        assert!(matches!(p.insts[2], Inst::Split));
        assert_eq!(p.jumps[2], Dest::Goto(0));
        assert_eq!(p.jumpf[2], Dest::Goto(0));
        assert_eq!(p.jumps[0], Dest::Goto(1));
        assert_eq!(p.jumpf[0], Dest::Accept);
    }

    #[test]
    fn negation_swaps_literal_destinations() {
        let p = compiled("{a}");
        assert_eq!(p.jumps[0], Dest::Abandon);
        assert_eq!(p.jumpf[0], Dest::Accept);
    }

    #[test]
    fn oversize_pattern_is_rejected() {
        let pattern = "a".repeat(64);
        let ast = parse(pattern.as_bytes()).unwrap();
        assert_eq!(
            Compiler::with_limit(10).compile(&ast),
            Err(CompileError::ProgramTooLarge { limit: 10 })
        );
    }
}
