/// The expression typer. Inference yields a `(type, lvalue)` pair for
/// every node; failures produce the `BadValue` chain so callers can keep
/// walking without cascading reports.
use super::{Checker, CheckerErrorKind};
use crate::ast::{DeclKind, ExprId, Expression, FuncId, StructMember, TypeList};
use crate::checker::types::{assignment_compatible, can_be_converted_to_bool, ResultingType};
use crate::token::{Token, TokenKind};

impl<'a> Checker<'a> {
    /// Type an expression. `struct_context` is the name of a struct whose
    /// member table should resolve identifiers and calls; it is only set
    /// while typing the right-hand side of `.` or `->`.
    pub(crate) fn check_expression(
        &mut self,
        expr: ExprId,
        struct_context: Option<&str>,
    ) -> ResultingType {
        match self.ast[expr].clone() {
            Expression::Value(token) => self.check_value(token, struct_context),
            Expression::Unary { op, operand } => self.check_unary(op, operand),
            Expression::Binary { op, left, right } => self.check_binary(op, left, right),
            Expression::Call { name, args } => self.check_call(name, &args, struct_context),
            Expression::Wrapped(inner) => self.check_expression(inner, struct_context),
            Expression::ArrayAccess { .. } | Expression::ArrayOrStructLiteral { .. } => {
                ResultingType::rvalue(self.types.bad_value.clone())
            }
            Expression::None => ResultingType::rvalue(self.types.nothing.clone()),
        }
    }

    fn bad(&self) -> ResultingType {
        ResultingType::rvalue(self.types.bad_value.clone())
    }

    fn check_value(&mut self, token: Token, struct_context: Option<&str>) -> ResultingType {
        match token.kind {
            TokenKind::Identifier => self.check_identifier(token, struct_context),
            TokenKind::DecimalNumber | TokenKind::BinaryNumber | TokenKind::HexNumber => {
                // Integer width inference is still pending; everything is
                // i32 for now.
                ResultingType::rvalue(self.types.i32_type.clone())
            }
            TokenKind::FloatNumber => ResultingType::rvalue(self.types.f64_type.clone()),
            TokenKind::NullPtr => ResultingType::rvalue(self.types.nullptr_type.clone()),
            TokenKind::True | TokenKind::False => {
                ResultingType::rvalue(self.types.bool_type.clone())
            }
            TokenKind::StringLiteral => ResultingType::rvalue(self.types.string_type.clone()),
            TokenKind::CharLiteral => ResultingType::rvalue(self.types.char_type.clone()),
            _ => self.bad(),
        }
    }

    fn check_identifier(&mut self, token: Token, struct_context: Option<&str>) -> ResultingType {
        let name = self.spelling(token).to_string();
        if let Some(context) = struct_context {
            let member = self
                .struct_lookup
                .get(context)
                .and_then(|members| members.get(&name))
                .copied();
            return match member {
                None => {
                    self.error(CheckerErrorKind::NoSuchMemberVariable, token);
                    self.bad()
                }
                Some(StructMember::Func(_)) => {
                    self.error(CheckerErrorKind::NotAVariable, token);
                    self.bad()
                }
                Some(StructMember::Var(var)) => {
                    ResultingType::new(self.ast[var].ty.without_reference(), true)
                }
            };
        }
        match self.lookup.get(&name).copied() {
            None => {
                self.error(CheckerErrorKind::NoSuchVariable, token);
                self.bad()
            }
            Some(dec) => match self.ast[dec].kind {
                DeclKind::Variable(var) => {
                    ResultingType::new(self.ast[var].ty.without_reference(), true)
                }
                _ => {
                    self.error_related(CheckerErrorKind::NotAVariable, token, dec);
                    self.bad()
                }
            },
        }
    }

    fn check_unary(&mut self, op: Token, operand: ExprId) -> ResultingType {
        match op.kind {
            TokenKind::Dereference => {
                let result = self.check_expression(operand, None);
                if result.is_bad() {
                    return self.bad();
                }
                match result.ty.pointee() {
                    Some(pointee) => ResultingType::new(pointee, true),
                    None => {
                        self.error(CheckerErrorKind::CannotDereferenceNonPointerType, op);
                        self.bad()
                    }
                }
            }
            TokenKind::Not => {
                let result = self.check_expression(operand, None);
                if !result.is_bad() && !can_be_converted_to_bool(&result.ty) {
                    self.error(CheckerErrorKind::CannotBeConvertedToBool, op);
                }
                ResultingType::rvalue(self.types.bool_type.clone())
            }
            TokenKind::AddressOf => {
                let result = self.check_expression(operand, None);
                if result.is_bad() {
                    return self.bad();
                }
                if !result.is_lvalue {
                    self.error(CheckerErrorKind::CannotOperateOnTemporary, op);
                }
                let mut tokens = Vec::with_capacity(result.ty.tokens.len() + 1);
                tokens.push(Token::synthetic(TokenKind::Pointer));
                tokens.extend(result.ty.tokens);
                ResultingType::rvalue(TypeList {
                    tokens,
                    resolved: result.ty.resolved,
                })
            }
            TokenKind::IncrementPrefix
            | TokenKind::IncrementPostfix
            | TokenKind::DecrementPrefix
            | TokenKind::DecrementPostfix => {
                let result = self.check_expression(operand, None);
                if result.is_bad() {
                    return self.bad();
                }
                if !result.is_lvalue {
                    self.error(CheckerErrorKind::CannotOperateOnTemporary, op);
                }
                ResultingType::rvalue(result.ty)
            }
            TokenKind::Negative => {
                let result = self.check_expression(operand, None);
                ResultingType::rvalue(result.ty)
            }
            _ => self.bad(),
        }
    }

    fn check_binary(&mut self, op: Token, left: ExprId, right: ExprId) -> ResultingType {
        if matches!(op.kind, TokenKind::Dot | TokenKind::PtrMemberAccess) {
            return self.check_member_access(op, left, right);
        }

        let lhs = self.check_expression(left, None);

        if matches!(op.kind, TokenKind::LogicalAnd | TokenKind::LogicalOr) {
            let rhs = self.check_expression(right, None);
            if !lhs.is_bad() && !can_be_converted_to_bool(&lhs.ty) {
                self.error(CheckerErrorKind::CannotBeConvertedToBool, op);
            }
            if !rhs.is_bad() && !can_be_converted_to_bool(&rhs.ty) {
                self.error(CheckerErrorKind::CannotBeConvertedToBool, op);
            }
            return ResultingType::rvalue(self.types.bool_type.clone());
        }

        if op.kind.is_logical_comparison() {
            let rhs = self.check_expression(right, None);
            let incomparable = |ty: &TypeList| {
                ty.base().kind == TokenKind::Identifier || ty.first_kind() == TokenKind::Void
            };
            if !lhs.is_bad() && !rhs.is_bad() && (incomparable(&lhs.ty) || incomparable(&rhs.ty)) {
                self.error(CheckerErrorKind::CannotCompareType, op);
            }
            return ResultingType::rvalue(self.types.bool_type.clone());
        }

        if op.kind.is_assignment() {
            let rhs = self.check_expression(right, None);
            if !lhs.is_bad() && !lhs.is_lvalue {
                self.error(CheckerErrorKind::CannotAssignToTemporary, op);
            }
            if !lhs.is_bad() && !rhs.is_bad() && !assignment_compatible(&lhs.ty, &rhs.ty) {
                self.error(CheckerErrorKind::CannotAssign, op);
            }
            return ResultingType::new(lhs.ty, true);
        }

        // Arithmetic, bitwise, shifts.
        let rhs = self.check_expression(right, None);
        if lhs.is_bad() || rhs.is_bad() {
            return self.bad();
        }
        if lhs.ty.base().kind == TokenKind::Identifier
            || rhs.ty.base().kind == TokenKind::Identifier
        {
            self.error(CheckerErrorKind::OperationNotDefined, op);
            return self.bad();
        }
        if lhs.ty.first_kind() == TokenKind::Void || rhs.ty.first_kind() == TokenKind::Void {
            self.error(CheckerErrorKind::OperationOnVoid, op);
            return self.bad();
        }
        ResultingType::rvalue(self.types.largest_type(&lhs.ty, &rhs.ty))
    }

    fn check_member_access(&mut self, op: Token, left: ExprId, right: ExprId) -> ResultingType {
        let lhs = self.check_expression(left, None);
        if lhs.is_bad() {
            return self.bad();
        }
        let subject = if op.kind == TokenKind::PtrMemberAccess {
            match lhs.ty.pointee() {
                Some(pointee) => pointee,
                None => {
                    self.error(CheckerErrorKind::CannotDereferenceNonPointerType, op);
                    return self.bad();
                }
            }
        } else {
            lhs.ty
        };
        let is_struct = subject.base().kind == TokenKind::Identifier && subject.resolved.is_some();
        if !is_struct || subject.tokens.len() != 1 {
            let at = self.expression_token(left);
            self.error(CheckerErrorKind::NotAStruct, at);
            return self.bad();
        }
        let Some(DeclKind::Struct(dec)) = subject.resolved.map(|d| self.ast[d].kind.clone())
        else {
            let at = self.expression_token(left);
            self.error(CheckerErrorKind::NotAStruct, at);
            return self.bad();
        };
        let struct_name = self.spelling(self.ast[dec].name).to_string();
        self.check_expression(right, Some(&struct_name))
    }

    fn check_call(
        &mut self,
        name: Token,
        args: &[ExprId],
        struct_context: Option<&str>,
    ) -> ResultingType {
        let callee_name = self.spelling(name).to_string();
        let (func, related): (FuncId, _) = if let Some(context) = struct_context {
            let member = self
                .struct_lookup
                .get(context)
                .and_then(|members| members.get(&callee_name))
                .copied();
            match member {
                None => {
                    self.error(CheckerErrorKind::NoSuchMemberFunction, name);
                    return self.bad();
                }
                Some(StructMember::Var(_)) => {
                    self.error(CheckerErrorKind::NotAFunction, name);
                    return self.bad();
                }
                Some(StructMember::Func(func)) => {
                    // Synthesized so argument diagnostics can print the
                    // member's signature.
                    let dec = self
                        .ast
                        .make_declaration(DeclKind::Function(func), name.file_index);
                    (func, dec)
                }
            }
        } else {
            match self.lookup.get(&callee_name).copied() {
                None => {
                    self.error(CheckerErrorKind::NoSuchFunction, name);
                    return self.bad();
                }
                Some(dec) => match self.ast[dec].kind {
                    DeclKind::Function(func) => (func, dec),
                    _ => {
                        self.error_related(CheckerErrorKind::NotAFunction, name, dec);
                        return self.bad();
                    }
                },
            }
        };

        // Parameter types were validated in Pass 2.
        let params = self.ast[func].params.clone();
        for (&arg, &param) in args.iter().zip(params.iter()) {
            let value = self.check_expression(arg, None);
            if value.is_bad() {
                continue;
            }
            let param_type = self.ast[param].ty.clone();
            if !assignment_compatible(&param_type, &value.ty) {
                let at = self.expression_token(arg);
                self.error_related(CheckerErrorKind::TypeDoesNotMatch, at, related);
            }
        }
        if args.len() != params.len() {
            self.error_related(CheckerErrorKind::WrongNumberOfArgs, name, related);
        }

        let return_type = self.ast[func].return_type.clone();
        if return_type.first_kind() == TokenKind::Reference {
            ResultingType::new(return_type.without_reference(), true)
        } else {
            ResultingType::rvalue(return_type)
        }
    }

    /// The token a diagnostic should point at for an expression: the
    /// operator for unary/binary nodes, the callee for calls, the value
    /// token for leaves, recursing through wrappers.
    pub(crate) fn expression_token(&self, expr: ExprId) -> Token {
        match &self.ast[expr] {
            Expression::Value(token) => *token,
            Expression::Unary { op, .. } => *op,
            Expression::Binary { op, .. } => *op,
            Expression::Call { name, .. } => *name,
            Expression::ArrayAccess { array, .. } => self.expression_token(*array),
            Expression::Wrapped(inner) => self.expression_token(*inner),
            Expression::ArrayOrStructLiteral { values } => match values.first() {
                Some(&first) => self.expression_token(first),
                None => Token::synthetic(TokenKind::BadValue),
            },
            Expression::None => Token::synthetic(TokenKind::Nothing),
        }
    }
}
