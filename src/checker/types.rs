/// Type algebra over [`TypeList`] chains: the cached scalar singletons the
/// expression typer hands out, the join rule for arithmetic operands, bool
/// convertibility, and assignment compatibility.
use crate::ast::TypeList;
use crate::token::TokenKind;

/// The result of typing an expression: a chain and whether the expression
/// names an assignable location. Never absent; failed sub-expressions type
/// as [`TokenKind::BadValue`] so callers can suppress follow-on errors.
#[derive(Debug, Clone)]
pub struct ResultingType {
    pub ty: TypeList,
    pub is_lvalue: bool,
}

impl ResultingType {
    pub fn new(ty: TypeList, is_lvalue: bool) -> Self {
        ResultingType { ty, is_lvalue }
    }

    pub fn rvalue(ty: TypeList) -> Self {
        ResultingType {
            ty,
            is_lvalue: false,
        }
    }

    pub fn is_bad(&self) -> bool {
        self.ty.first_kind() == TokenKind::BadValue
    }
}

/// Process-wide immutable scalar chains, built once per checker so the
/// typer returns clones instead of allocating per expression.
#[derive(Debug, Clone)]
pub struct TypeCache {
    pub bool_type: TypeList,
    pub char_type: TypeList,
    pub i32_type: TypeList,
    pub u32_type: TypeList,
    pub i64_type: TypeList,
    pub u64_type: TypeList,
    pub f32_type: TypeList,
    pub f64_type: TypeList,
    pub void_type: TypeList,
    pub ptr_to_void: TypeList,
    /// String literals are `ptr char`.
    pub string_type: TypeList,
    pub nullptr_type: TypeList,
    pub bad_value: TypeList,
    pub nothing: TypeList,
}

impl TypeCache {
    pub fn new() -> Self {
        let ptr_chain = |base: TokenKind| {
            TypeList::new(vec![
                crate::token::Token::synthetic(TokenKind::Pointer),
                crate::token::Token::synthetic(base),
            ])
        };
        TypeCache {
            bool_type: TypeList::of(TokenKind::Bool),
            char_type: TypeList::of(TokenKind::Char),
            i32_type: TypeList::of(TokenKind::I32),
            u32_type: TypeList::of(TokenKind::U32),
            i64_type: TypeList::of(TokenKind::I64),
            u64_type: TypeList::of(TokenKind::U64),
            f32_type: TypeList::of(TokenKind::F32),
            f64_type: TypeList::of(TokenKind::F64),
            void_type: TypeList::of(TokenKind::Void),
            ptr_to_void: ptr_chain(TokenKind::Void),
            string_type: ptr_chain(TokenKind::Char),
            nullptr_type: TypeList::of(TokenKind::NullPtr),
            bad_value: TypeList::of(TokenKind::BadValue),
            nothing: TypeList::of(TokenKind::Nothing),
        }
    }

    /// Join rule for arithmetic operands: any pointer wins as `ptr void`;
    /// otherwise the operand with the greater numeric rank, floored at
    /// `i32` so narrow integers always widen.
    pub fn largest_type(&self, a: &TypeList, b: &TypeList) -> TypeList {
        if a.first_kind() == TokenKind::Pointer || b.first_kind() == TokenKind::Pointer {
            return self.ptr_to_void.clone();
        }
        let a_kind = a.base().kind;
        let b_kind = b.base().kind;
        let widest = if a_kind.numeric_rank() >= b_kind.numeric_rank() {
            a_kind
        } else {
            b_kind
        };
        if widest.numeric_rank() < TokenKind::I32.numeric_rank() {
            self.i32_type.clone()
        } else {
            TypeList::of(widest)
        }
    }
}

impl Default for TypeCache {
    fn default() -> Self {
        TypeCache::new()
    }
}

/// Only built-in scalars convert to bool. `void` does not, and neither do
/// struct values or pointers (no implicit non-null test).
pub fn can_be_converted_to_bool(ty: &TypeList) -> bool {
    let ty = ty.without_reference();
    ty.first_kind().is_concrete_type() && ty.first_kind() != TokenKind::Void
}

/// Structural comparison of two chains under assignment rules, `lhs = rhs`.
///
/// - `void` and failed sub-expressions are never assignable.
/// - Pointers accept pointers and `nullptr`; the chains are walked in
///   lockstep, divergence is tolerated exactly when one side reaches
///   `void` (`ptr void` converts to and from every pointer), and struct
///   pointees must be the same declaration.
/// - Struct values only accept the same struct.
/// - Any two remaining scalars interconvert.
pub fn assignment_compatible(lhs: &TypeList, rhs: &TypeList) -> bool {
    let lhs = lhs.without_reference();
    let rhs = rhs.without_reference();
    let (l, r) = (lhs.first_kind(), rhs.first_kind());
    if matches!(l, TokenKind::Void | TokenKind::BadValue)
        || matches!(r, TokenKind::Void | TokenKind::BadValue)
    {
        return false;
    }

    if l == TokenKind::Pointer {
        if r == TokenKind::NullPtr {
            return true;
        }
        if r != TokenKind::Pointer {
            return false;
        }
        for (a, b) in lhs.tokens.iter().zip(rhs.tokens.iter()) {
            if a.kind != b.kind {
                return a.kind == TokenKind::Void || b.kind == TokenKind::Void;
            }
            if a.kind == TokenKind::Identifier {
                return lhs.resolved == rhs.resolved;
            }
        }
        return lhs.tokens.len() == rhs.tokens.len();
    }

    // A pointer or nullptr on the right only converts to a pointer.
    if matches!(r, TokenKind::Pointer | TokenKind::NullPtr) || l == TokenKind::NullPtr {
        return false;
    }

    if lhs.base().kind == TokenKind::Identifier || rhs.base().kind == TokenKind::Identifier {
        return lhs.base().kind == rhs.base().kind && lhs.resolved == rhs.resolved;
    }

    true
}
