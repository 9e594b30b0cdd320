use thiserror::Error;

use crate::ast::{Ast, DeclId};
use crate::pretty;
use crate::token::Token;
use crate::tokenizer::Tokenizer;

/// The stable set of diagnostic kinds. The message text is the user-facing
/// diagnostic body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CheckerErrorKind {
    #[error("Name already in use")]
    NameAlreadyInUse,
    #[error("Void type not allowed")]
    VoidType,
    #[error("Type does not match")]
    TypeDoesNotMatch,
    #[error("Unexpected type")]
    UnexpectedType,
    #[error("Function does not exist")]
    NoSuchFunction,
    #[error("No such type")]
    NoSuchType,
    #[error("Variable does not exist")]
    NoSuchVariable,
    #[error("Template does not exist")]
    NoSuchTemplate,
    #[error("Member variable does not exist")]
    NoSuchMemberVariable,
    #[error("Member function does not exist")]
    NoSuchMemberFunction,
    #[error("Cannot have a reference to a reference type")]
    CannotRefARef,
    #[error("Cannot have a pointer to a reference type")]
    CannotPtrARef,
    #[error("Multi type not allowed")]
    CannotHaveMultiType,
    #[error("Expecting a type")]
    ExpectingType,
    #[error("Expecting a number")]
    ExpectingNumber,
    #[error("Expected an identifier")]
    ExpectedIdentifier,
    #[error("\"break\" can only be inside loops and switch cases")]
    CannotHaveBreakHere,
    #[error("\"continue\" can only be inside loops")]
    CannotHaveContinueHere,
    #[error("Not a variable")]
    NotAVariable,
    #[error("Not a function")]
    NotAFunction,
    #[error("Not a template")]
    NotATemplate,
    #[error("Not a struct")]
    NotAStruct,
    #[error("Incorrect number of arguments")]
    WrongNumberOfArgs,
    #[error("Value cannot be converted to boolean")]
    CannotBeConvertedToBool,
    #[error("Cannot dereference non-pointer type")]
    CannotDereferenceNonPointerType,
    #[error("Cannot perform this operation on a temporary value")]
    CannotOperateOnTemporary,
    #[error("Cannot assign to a temporary value")]
    CannotAssignToTemporary,
    #[error("Cannot assign, types are incompatible")]
    CannotAssign,
    #[error("Return value does not match the function return type")]
    IncorrectReturnType,
    #[error("Not all code paths return a value")]
    NotAllCodePathsReturn,
    #[error("Struct has no members")]
    EmptyStruct,
    #[error("Struct contains itself by value")]
    StructCycle,
    #[error("Operation not defined for this type")]
    OperationNotDefined,
    #[error("Cannot perform operation on void")]
    OperationOnVoid,
    #[error("Cannot compare these types")]
    CannotCompareType,
}

/// One diagnostic: a kind, the token it points at, and optionally the
/// declaration it clashes with or refers to. Rendering is deferred so the
/// checker never allocates message strings on the error path.
#[derive(Debug, Clone)]
pub struct CheckerError {
    pub kind: CheckerErrorKind,
    pub file_index: u32,
    pub token: Token,
    pub related: Option<DeclId>,
}

impl CheckerError {
    pub fn new(kind: CheckerErrorKind, token: Token) -> Self {
        CheckerError {
            kind,
            file_index: token.file_index,
            token,
            related: None,
        }
    }

    pub fn with_related(kind: CheckerErrorKind, token: Token, related: DeclId) -> Self {
        CheckerError {
            kind,
            file_index: token.file_index,
            token,
            related: Some(related),
        }
    }

    /// `file:line:col`, the message, and the related declaration's
    /// signature when there is one.
    pub fn render(&self, tokenizers: &[Tokenizer], ast: &Ast) -> String {
        let tokenizer = &tokenizers[self.file_index as usize];
        let pos = tokenizer.token_position_info(self.token);
        let mut out = format!(
            "{}:{}:{}\n{}\n",
            tokenizer.file_path().display(),
            pos.line,
            pos.column,
            self.kind
        );
        if let Some(dec) = self.related {
            out.push_str("Declaration defined as such:\n  ");
            out.push_str(&pretty::declaration_signature(ast, tokenizers, dec));
            out.push('\n');
        }
        out
    }
}
