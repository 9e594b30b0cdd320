/// Arena AST. Every node lives in a `Vec` inside [`Ast`] and every
/// cross-reference is a typed index, so declaration identity is a plain
/// `DeclId` comparison and the checker can synthesize nodes (parameter
/// bindings, template placeholders, diagnostic decls) without touching the
/// parsed forest.
use std::ops::{Index, IndexMut};

use crate::token::{Token, TokenKind};

macro_rules! arena_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name(pub u32);

        impl $name {
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }
    };
}

arena_id!(
    /// Index of a top-level (or checker-synthesized) declaration.
    DeclId
);
arena_id!(ExprId);
arena_id!(StmtId);
arena_id!(ScopeId);
arena_id!(VarDecId);
arena_id!(FuncId);
arena_id!(StructId);

/// A declared type: qualifier prefix plus base, in source order
/// (`ref ptr i32` → `[Reference, Pointer, I32]`). When the base is an
/// identifier, Pass 2 records the struct declaration it names in
/// `resolved`, so later passes compare struct identities without
/// re-resolving names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeList {
    pub tokens: Vec<Token>,
    pub resolved: Option<DeclId>,
}

impl TypeList {
    pub fn new(tokens: Vec<Token>) -> Self {
        TypeList {
            tokens,
            resolved: None,
        }
    }

    /// A synthetic single-token chain, used for the cached scalar types.
    pub fn of(kind: TokenKind) -> Self {
        TypeList::new(vec![Token::synthetic(kind)])
    }

    /// The first token's kind; chains are never empty.
    pub fn first_kind(&self) -> TokenKind {
        self.tokens[0].kind
    }

    pub fn base(&self) -> Token {
        self.tokens[self.tokens.len() - 1]
    }

    /// Structural equality: same kinds in the same order, same resolved
    /// struct identity.
    pub fn same_as(&self, other: &TypeList) -> bool {
        self.resolved == other.resolved
            && self.tokens.len() == other.tokens.len()
            && self
                .tokens
                .iter()
                .zip(&other.tokens)
                .all(|(a, b)| a.kind == b.kind)
    }

    /// The chain with one leading `Reference` removed, if present.
    /// References are transparent to the expression typer. A degenerate
    /// chain that is only a `ref` (already reported by type validation) is
    /// left alone rather than emptied.
    pub fn without_reference(&self) -> TypeList {
        if self.first_kind() == TokenKind::Reference && self.tokens.len() > 1 {
            TypeList {
                tokens: self.tokens[1..].to_vec(),
                resolved: self.resolved,
            }
        } else {
            self.clone()
        }
    }

    /// The pointee of a pointer chain, or `None` when the chain is a bare
    /// qualifier left behind by an invalid declaration.
    pub fn pointee(&self) -> Option<TypeList> {
        if self.first_kind() != TokenKind::Pointer || self.tokens.len() < 2 {
            return None;
        }
        Some(TypeList {
            tokens: self.tokens[1..].to_vec(),
            resolved: self.resolved,
        })
    }
}

#[derive(Debug, Clone)]
pub struct VarDec {
    pub name: Token,
    pub ty: TypeList,
    pub initializer: Option<ExprId>,
}

#[derive(Debug, Clone)]
pub struct FunctionDec {
    pub name: Token,
    pub params: Vec<VarDecId>,
    pub return_type: TypeList,
    pub body: ScopeId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructMember {
    Var(VarDecId),
    Func(FuncId),
}

#[derive(Debug, Clone)]
pub struct StructDec {
    pub name: Token,
    pub members: Vec<StructMember>,
    /// Set once by the acyclicity pass.
    pub checked: bool,
    pub has_cycle: bool,
}

#[derive(Debug, Clone)]
pub enum TemplateBody {
    Struct(StructId),
    Function(FuncId),
}

#[derive(Debug, Clone)]
pub struct TemplateDec {
    /// Type parameter name tokens; the parser guarantees at least one.
    pub params: Vec<Token>,
    pub body: TemplateBody,
}

#[derive(Debug, Clone)]
pub struct TemplateCreate {
    pub new_name: Token,
    pub template_name: Token,
    /// Type argument tokens (builtin type or identifier), one per parameter.
    pub args: Vec<Token>,
}

#[derive(Debug, Clone)]
pub struct EnumDec {
    pub name: Token,
    pub variants: Vec<Token>,
}

#[derive(Debug, Clone)]
pub enum DeclKind {
    Function(FuncId),
    Variable(VarDecId),
    Struct(StructId),
    Template(TemplateDec),
    TemplateCreate(TemplateCreate),
    /// The path string literal.
    Include(Token),
    Enum(EnumDec),
}

#[derive(Debug, Clone)]
pub struct Declaration {
    pub kind: DeclKind,
    /// Tokenizer that owns this declaration's tokens.
    pub file_index: u32,
    pub valid: bool,
}

#[derive(Debug, Clone)]
pub enum Expression {
    Value(Token),
    Unary {
        op: Token,
        operand: ExprId,
    },
    Binary {
        op: Token,
        left: ExprId,
        right: ExprId,
    },
    Call {
        name: Token,
        args: Vec<ExprId>,
    },
    ArrayAccess {
        array: ExprId,
        index: ExprId,
    },
    Wrapped(ExprId),
    ArrayOrStructLiteral {
        values: Vec<ExprId>,
    },
    None,
}

#[derive(Debug, Clone)]
pub struct Branch {
    pub condition: ExprId,
    pub body: ScopeId,
}

#[derive(Debug, Clone)]
pub struct SwitchCase {
    /// `None` for the `default` label.
    pub label: Option<ExprId>,
    pub body: ScopeId,
}

#[derive(Debug, Clone)]
pub enum ControlFlow {
    ForLoop {
        /// A `VarDec`, `Expression`, or `Nothing` statement.
        initialize: StmtId,
        condition: ExprId,
        iteration: ExprId,
        body: ScopeId,
    },
    While {
        condition: ExprId,
        body: ScopeId,
    },
    Conditional {
        /// `if` plus any `elif`s, in source order.
        branches: Vec<Branch>,
        else_body: Option<ScopeId>,
    },
    Return {
        token: Token,
        /// `Expression::None` for a bare `return;`.
        value: ExprId,
    },
    Switch {
        token: Token,
        value: ExprId,
        cases: Vec<SwitchCase>,
    },
}

#[derive(Debug, Clone)]
pub enum Statement {
    Expression(ExprId),
    VarDec(VarDecId),
    /// `break` or `continue`.
    Keyword(Token),
    Scope(ScopeId),
    ControlFlow(ControlFlow),
    Nothing,
}

#[derive(Debug, Clone, Default)]
pub struct Scope {
    pub statements: Vec<StmtId>,
}

/// The parsed forest: one entry per top-level declaration, in source order
/// across all loaded files.
#[derive(Debug, Clone, Default)]
pub struct Program {
    pub decs: Vec<DeclId>,
}

#[derive(Debug, Default)]
pub struct Ast {
    decls: Vec<Declaration>,
    exprs: Vec<Expression>,
    stmts: Vec<Statement>,
    scopes: Vec<Scope>,
    var_decs: Vec<VarDec>,
    funcs: Vec<FunctionDec>,
    structs: Vec<StructDec>,
}

impl Ast {
    pub fn new() -> Self {
        Ast::default()
    }

    pub fn make_declaration(&mut self, kind: DeclKind, file_index: u32) -> DeclId {
        self.decls.push(Declaration {
            kind,
            file_index,
            valid: true,
        });
        DeclId(self.decls.len() as u32 - 1)
    }

    pub fn make_expression(&mut self, expr: Expression) -> ExprId {
        self.exprs.push(expr);
        ExprId(self.exprs.len() as u32 - 1)
    }

    pub fn make_statement(&mut self, stmt: Statement) -> StmtId {
        self.stmts.push(stmt);
        StmtId(self.stmts.len() as u32 - 1)
    }

    pub fn make_scope(&mut self, scope: Scope) -> ScopeId {
        self.scopes.push(scope);
        ScopeId(self.scopes.len() as u32 - 1)
    }

    pub fn make_var_dec(&mut self, var_dec: VarDec) -> VarDecId {
        self.var_decs.push(var_dec);
        VarDecId(self.var_decs.len() as u32 - 1)
    }

    pub fn make_function(&mut self, func: FunctionDec) -> FuncId {
        self.funcs.push(func);
        FuncId(self.funcs.len() as u32 - 1)
    }

    pub fn make_struct(&mut self, dec: StructDec) -> StructId {
        self.structs.push(dec);
        StructId(self.structs.len() as u32 - 1)
    }

    /// The name token of a struct member, read through its arena node.
    pub fn member_name(&self, member: StructMember) -> Token {
        match member {
            StructMember::Var(id) => self[id].name,
            StructMember::Func(id) => self[id].name,
        }
    }
}

macro_rules! arena_index {
    ($id:ty, $node:ty, $field:ident) => {
        impl Index<$id> for Ast {
            type Output = $node;
            fn index(&self, id: $id) -> &$node {
                &self.$field[id.index()]
            }
        }

        impl IndexMut<$id> for Ast {
            fn index_mut(&mut self, id: $id) -> &mut $node {
                &mut self.$field[id.index()]
            }
        }
    };
}

arena_index!(DeclId, Declaration, decls);
arena_index!(ExprId, Expression, exprs);
arena_index!(StmtId, Statement, stmts);
arena_index!(ScopeId, Scope, scopes);
arena_index!(VarDecId, VarDec, var_decs);
arena_index!(FuncId, FunctionDec, funcs);
arena_index!(StructId, StructDec, structs);
