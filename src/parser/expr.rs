use super::*;
use crate::ast::{ExprId, Expression};
use crate::token::TokenKind;

/// Binding power of a prefix operator's operand: tighter than arithmetic,
/// looser than member access, so `-a.b` is `-(a.b)` and `*p + 1` is
/// `(*p) + 1`.
const PREFIX_BP: u8 = 23;
/// Postfix `++`/`--`/indexing bind tightest of all.
const POSTFIX_BP: u8 = 29;

/// `(left, right)` binding powers; right < left gives right associativity
/// (assignment), right > left the usual left associativity.
fn binary_binding_power(kind: TokenKind) -> (u8, u8) {
    match kind {
        k if k.is_assignment() => (2, 1),
        TokenKind::LogicalOr => (3, 4),
        TokenKind::LogicalAnd => (5, 6),
        TokenKind::BitwiseOr => (7, 8),
        TokenKind::BitwiseXor => (9, 10),
        TokenKind::BitwiseAnd => (11, 12),
        TokenKind::Equal | TokenKind::NotEqual => (13, 14),
        TokenKind::LessThan
        | TokenKind::LessThanEqual
        | TokenKind::GreaterThan
        | TokenKind::GreaterThanEqual => (15, 16),
        TokenKind::ShiftLeft | TokenKind::ShiftRight => (17, 18),
        TokenKind::Addition | TokenKind::Subtraction => (19, 20),
        TokenKind::Multiplication | TokenKind::Division | TokenKind::Modulo => (21, 22),
        // The right side out-binds postfix operators so `a.b++` and
        // `a.b[i]` apply to the whole access.
        TokenKind::Dot | TokenKind::PtrMemberAccess => (27, 30),
        _ => (0, 0),
    }
}

fn is_prefix_op(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Not
            | TokenKind::Negative
            | TokenKind::AddressOf
            | TokenKind::Dereference
            | TokenKind::IncrementPrefix
            | TokenKind::DecrementPrefix
    )
}

impl<'a> Parser<'a> {
    pub(super) fn parse_expression(&mut self) -> Result<ExprId, ParseError> {
        self.parse_expression_bp(0)
    }

    fn parse_expression_bp(&mut self, min_bp: u8) -> Result<ExprId, ParseError> {
        let mut lhs = self.parse_prefix()?;
        loop {
            let op = self.current();
            match op.kind {
                TokenKind::IncrementPostfix | TokenKind::DecrementPostfix
                    if POSTFIX_BP >= min_bp =>
                {
                    self.advance();
                    lhs = self.ast.make_expression(Expression::Unary { op, operand: lhs });
                    continue;
                }
                TokenKind::OpenBracket if POSTFIX_BP >= min_bp => {
                    self.advance();
                    let index = self.parse_expression()?;
                    self.expect(TokenKind::CloseBracket, "']'")?;
                    lhs = self
                        .ast
                        .make_expression(Expression::ArrayAccess { array: lhs, index });
                    continue;
                }
                _ => {}
            }
            if !op.kind.is_binary_op() {
                break;
            }
            let (left_bp, right_bp) = binary_binding_power(op.kind);
            if left_bp < min_bp {
                break;
            }
            self.advance();
            let rhs = self.parse_expression_bp(right_bp)?;
            lhs = self.ast.make_expression(Expression::Binary {
                op,
                left: lhs,
                right: rhs,
            });
        }
        Ok(lhs)
    }

    fn parse_prefix(&mut self) -> Result<ExprId, ParseError> {
        let tok = self.current();
        if is_prefix_op(tok.kind) {
            self.advance();
            let operand = self.parse_expression_bp(PREFIX_BP)?;
            return Ok(self
                .ast
                .make_expression(Expression::Unary { op: tok, operand }));
        }
        match tok.kind {
            TokenKind::Identifier => {
                self.advance();
                if self.check(TokenKind::OpenParen) {
                    let args = self.parse_call_args()?;
                    Ok(self.ast.make_expression(Expression::Call { name: tok, args }))
                } else {
                    Ok(self.ast.make_expression(Expression::Value(tok)))
                }
            }
            k if k.is_literal() => {
                self.advance();
                Ok(self.ast.make_expression(Expression::Value(tok)))
            }
            TokenKind::OpenParen => {
                self.advance();
                let inner = self.parse_expression()?;
                self.expect(TokenKind::CloseParen, "')'")?;
                Ok(self.ast.make_expression(Expression::Wrapped(inner)))
            }
            TokenKind::OpenBracket => {
                self.advance();
                let mut values = Vec::new();
                if !self.check(TokenKind::CloseBracket) {
                    loop {
                        values.push(self.parse_expression()?);
                        if self.match_kind(TokenKind::Comma).is_none() {
                            break;
                        }
                    }
                }
                self.expect(TokenKind::CloseBracket, "']'")?;
                Ok(self
                    .ast
                    .make_expression(Expression::ArrayOrStructLiteral { values }))
            }
            _ => Err(self.error_at(
                tok,
                format!(
                    "expected an expression, found {:?} '{}'",
                    tok.kind,
                    self.spelling(tok)
                ),
            )),
        }
    }

    fn parse_call_args(&mut self) -> Result<Vec<ExprId>, ParseError> {
        self.expect(TokenKind::OpenParen, "'('")?;
        let mut args = Vec::new();
        if !self.check(TokenKind::CloseParen) {
            loop {
                args.push(self.parse_expression()?);
                if self.match_kind(TokenKind::Comma).is_none() {
                    break;
                }
            }
        }
        self.expect(TokenKind::CloseParen, "')'")?;
        Ok(args)
    }
}
