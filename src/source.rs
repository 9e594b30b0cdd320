/// File loading and `include` resolution. Included paths are resolved
/// relative to the including file, canonicalized, and loaded at most once,
/// so diamond includes and include cycles are harmless.
use std::collections::{HashSet, VecDeque};
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::ast::{Ast, DeclKind, Program};
use crate::parser::{ParseError, Parser};
use crate::tokenizer::Tokenizer;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Everything the checker needs: the arena, the declaration forest, and
/// one tokenizer per loaded file (indexed by `file_index`).
#[derive(Debug)]
pub struct LoadedProgram {
    pub ast: Ast,
    pub program: Program,
    pub tokenizers: Vec<Tokenizer>,
}

pub fn canonicalize_path(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

pub fn load_program(entry: &Path) -> Result<LoadedProgram, LoadError> {
    let mut ast = Ast::new();
    let mut program = Program::default();
    let mut tokenizers: Vec<Tokenizer> = Vec::new();
    let mut seen = HashSet::new();
    let mut pending = VecDeque::new();

    let entry = canonicalize_path(entry);
    seen.insert(entry.clone());
    pending.push_back(entry);

    while let Some(path) = pending.pop_front() {
        let content = fs::read_to_string(&path).map_err(|source| LoadError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let file_index = tokenizers.len() as u32;
        let mut tokenizer = Tokenizer::new(file_index, path.clone(), content);
        let tokens = tokenizer.tokenize_all();
        let decs = Parser::new(&tokenizer, tokens, &mut ast).parse()?;

        for &dec in &decs {
            if let DeclKind::Include(path_token) = ast[dec].kind {
                let raw = tokenizer.extract_token(path_token);
                let relative = raw.trim_matches('"');
                let base = path.parent().unwrap_or_else(|| Path::new("."));
                let target = canonicalize_path(&base.join(relative));
                if seen.insert(target.clone()) {
                    pending.push_back(target);
                }
            }
        }

        program.decs.extend(decs);
        tokenizers.push(tokenizer);
    }

    Ok(LoadedProgram {
        ast,
        program,
        tokenizers,
    })
}

/// Parse a single in-memory buffer; used by tests and tools that have no
/// file behind the source. `include` declarations are parsed but not
/// followed.
pub fn parse_source(source: &str) -> Result<LoadedProgram, ParseError> {
    let mut ast = Ast::new();
    let mut tokenizer = Tokenizer::new(0, "<memory>", source.to_string());
    let tokens = tokenizer.tokenize_all();
    let decs = Parser::new(&tokenizer, tokens, &mut ast).parse()?;
    Ok(LoadedProgram {
        ast,
        program: Program { decs },
        tokenizers: vec![tokenizer],
    })
}
