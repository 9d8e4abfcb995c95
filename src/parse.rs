// Copyright 2014-2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Recursive-descent parser for the reduced pattern dialect.
//!
//! This stands in for both the "Validator" and the "Counter" of the
//! design this crate follows: walking the pattern into an [`Ast`]
//! validates every placement rule as it goes, and the shape of the
//! resulting tree is the token/group count, so there is no separate
//! counting pass.

use crate::error::CompileError;

/// A parsed pattern, ready for [`crate::compile::Compiler`] to lower into
/// a [`crate::program::Program`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Ast {
    /// An empty sub-pattern. Only produced internally; a wholly empty
    /// top-level pattern is rejected before parsing begins.
    Empty,
    /// A single literal byte.
    Literal(u8),
    /// `.` — any byte except NUL.
    Any,
    /// `[...]` — one byte from the listed set.
    Class(Vec<u8>),
    /// Two or more atoms in sequence.
    Concat(Vec<Ast>),
    /// `a|b` — the preceding atom or the following atom.
    Alt(Box<Ast>, Box<Ast>),
    /// `a*` — zero or more repetitions.
    Star(Box<Ast>),
    /// `a?` — zero or one repetition.
    Maybe(Box<Ast>),
    /// `{...}` — succeeds exactly where the body does not.
    Negate(Box<Ast>),
}

/// Parses `pattern` into an [`Ast`], or returns the first positioned
/// error encountered (see [`CompileError`]).
pub(crate) fn parse(pattern: &[u8]) -> Result<Ast, CompileError> {
    if pattern.is_empty() {
        return Err(CompileError::NoTokens);
    }
    let mut p = Parser { input: pattern, pos: 0 };
    let ast = p.sequence(None)?;
    debug_assert_eq!(p.pos, pattern.len(), "sequence must consume to EOF at top level");
    Ok(ast)
}

struct Parser<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    /// Parses atoms until `closing` is seen (consumed by the caller) or,
    /// for the top-level call (`closing = None`), until end of input.
    fn sequence(&mut self, closing: Option<u8>) -> Result<Ast, CompileError> {
        let mut atoms = Vec::new();
        loop {
            match self.peek() {
                None => {
                    if closing.is_some() {
                        return Err(CompileError::UnclosedGroup { at: self.input.len() });
                    }
                    break;
                }
                Some(b) if Some(b) == closing => break,
                // `)` and `}` always act as closers, even when they don't
                // match what's currently open: a stray or extra closer.
                Some(b')') | Some(b'}') => {
                    return Err(CompileError::EmptyGroup { at: self.pos });
                }
                // A bare `|` directly inside a just-opened `(`/`{` is an
                // empty left-hand alternative, not a misplaced modifier:
                // the oracle's validator only forbids `*`/`?` from
                // following an opener, never `|` (it only rejects `|` for
                // leading the whole pattern or trailing it). `(|ab)` means
                // "nothing, or ab".
                Some(b'|') if atoms.is_empty() && closing.is_some() => {
                    let rhs = self.alternation_rhs()?;
                    atoms.push(Ast::Alt(Box::new(Ast::Empty), Box::new(rhs)));
                }
                // A modifier can only ever follow a just-parsed atom; one
                // appearing here means there was no atom for it to modify.
                Some(b'*') | Some(b'?') | Some(b'|') => {
                    return Err(CompileError::Syntax { at: self.pos });
                }
                _ => atoms.push(self.modified_atom()?),
            }
        }
        Ok(match atoms.len() {
            0 => Ast::Empty,
            1 => atoms.into_iter().next().unwrap(),
            _ => Ast::Concat(atoms),
        })
    }

    /// Parses one atom, then at most one trailing modifier (`*`, `?`, or
    /// `|`). `|`'s right-hand side is itself a modified atom, so
    /// alternation chains (`a|b|c`) and a modified right-hand side
    /// (`a|b*`) both fall out of the same recursive call.
    fn modified_atom(&mut self) -> Result<Ast, CompileError> {
        let atom = self.primary()?;
        match self.peek() {
            Some(b'*') => {
                self.pos += 1;
                Ok(Ast::Star(Box::new(atom)))
            }
            Some(b'?') => {
                self.pos += 1;
                Ok(Ast::Maybe(Box::new(atom)))
            }
            Some(b'|') => {
                let rhs = self.alternation_rhs()?;
                Ok(Ast::Alt(Box::new(atom), Box::new(rhs)))
            }
            _ => Ok(atom),
        }
    }

    /// Consumes a `|` already confirmed present at `self.pos` and parses
    /// its right-hand side. Shared by [`Self::modified_atom`] (the
    /// ordinary `a|b` case) and [`Self::sequence`] (a bare `|` leading a
    /// group's interior, i.e. an empty left-hand alternative).
    fn alternation_rhs(&mut self) -> Result<Ast, CompileError> {
        let bar = self.pos;
        self.pos += 1;
        match self.peek() {
            None => Err(CompileError::Syntax { at: bar }),
            Some(b'*') | Some(b'?') | Some(b'|') => Err(CompileError::Syntax { at: self.pos }),
            Some(b')') | Some(b']') | Some(b'}') => Err(CompileError::Syntax { at: self.pos }),
            _ => self.modified_atom(),
        }
    }

    fn primary(&mut self) -> Result<Ast, CompileError> {
        let b = self.peek().expect("caller only calls primary() when a byte is present");
        match b {
            b'.' => {
                self.pos += 1;
                Ok(Ast::Any)
            }
            b'(' => self.group(b')', false),
            b'{' => self.group(b'}', true),
            b'[' => self.class(),
            // `]` has no special meaning outside an active class scan
            // (except as the very first byte, rejected generically above
            // since it is never reached there — see `sequence`).
            _ => {
                self.pos += 1;
                Ok(Ast::Literal(b))
            }
        }
    }

    fn group(&mut self, close: u8, negate: bool) -> Result<Ast, CompileError> {
        self.pos += 1; // consume opener
        if self.peek() == Some(close) {
            return Err(CompileError::EmptyGroup { at: self.pos });
        }
        let inner = self.sequence(Some(close))?;
        debug_assert_eq!(self.peek(), Some(close));
        self.pos += 1; // consume closer
        Ok(if negate { Ast::Negate(Box::new(inner)) } else { inner })
    }

    fn class(&mut self) -> Result<Ast, CompileError> {
        self.pos += 1; // consume '['
        if self.peek() == Some(b']') {
            return Err(CompileError::EmptyGroup { at: self.pos });
        }
        let mut members = Vec::new();
        loop {
            match self.peek() {
                None => return Err(CompileError::UnclosedGroup { at: self.input.len() }),
                Some(b']') => {
                    self.pos += 1;
                    break;
                }
                Some(b) => {
                    members.push(b);
                    self.pos += 1;
                }
            }
        }
        Ok(Ast::Class(members))
    }
}
