use thiserror::Error;

use crate::ast::{Ast, DeclId};
use crate::token::Token;
use crate::tokenizer::Tokenizer;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("{file}:{line}:{col}: {msg}")]
    Error {
        msg: String,
        file: String,
        line: u32,
        col: u32,
    },
}

/// Recursive-descent parser for one file. Nodes are allocated into the
/// shared [`Ast`] arena; `parse` returns the ids of the file's top-level
/// declarations. Parse errors are fatal per file, so the checker only ever
/// sees well-formed forests.
pub struct Parser<'a> {
    tokenizer: &'a Tokenizer,
    tokens: Vec<Token>,
    pos: usize,
    ast: &'a mut Ast,
}

mod core;
mod decls;
mod expr;
mod stmt;
mod types;

impl<'a> Parser<'a> {
    pub fn new(tokenizer: &'a Tokenizer, tokens: Vec<Token>, ast: &'a mut Ast) -> Self {
        Parser {
            tokenizer,
            tokens,
            pos: 0,
            ast,
        }
    }

    pub fn parse(&mut self) -> Result<Vec<DeclId>, ParseError> {
        let mut decs = Vec::new();
        while !self.is_eof() {
            decs.push(self.parse_declaration()?);
        }
        Ok(decs)
    }
}
