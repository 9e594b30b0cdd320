use super::*;
use crate::ast::TypeList;
use crate::token::TokenKind;

impl<'a> Parser<'a> {
    /// Collect a type chain: any run of qualifier/base/identifier tokens.
    /// The parser deliberately accepts non-canonical chains (`ptr ref i32`,
    /// `i32 i32`); the checker's type validation reports them with proper
    /// diagnostics.
    pub(super) fn parse_type(&mut self) -> Result<TypeList, ParseError> {
        let mut tokens = Vec::new();
        while self.current().kind.is_builtin_type() || self.check(TokenKind::Identifier) {
            tokens.push(self.advance());
        }
        if tokens.is_empty() {
            return Err(self.error(format!(
                "expected a type, found {:?} '{}'",
                self.current().kind,
                self.spelling(self.current())
            )));
        }
        Ok(TypeList::new(tokens))
    }

    /// A single type token, as used by `create` argument lists.
    pub(super) fn parse_type_arg(&mut self) -> Result<Token, ParseError> {
        if self.current().kind.is_concrete_type() || self.check(TokenKind::Identifier) {
            Ok(self.advance())
        } else {
            Err(self.error("expected a type argument"))
        }
    }
}
