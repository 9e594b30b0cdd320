use super::*;
use crate::ast::{Branch, ControlFlow, Expression, Scope, ScopeId, Statement, StmtId, SwitchCase};
use crate::token::TokenKind;

impl<'a> Parser<'a> {
    pub(super) fn parse_scope(&mut self) -> Result<ScopeId, ParseError> {
        self.expect(TokenKind::OpenBrace, "'{'")?;
        let mut statements = Vec::new();
        while !self.check(TokenKind::CloseBrace) {
            if self.is_eof() {
                return Err(self.error("unterminated scope, expected '}'"));
            }
            statements.push(self.parse_statement()?);
        }
        self.expect(TokenKind::CloseBrace, "'}'")?;
        Ok(self.ast.make_scope(Scope { statements }))
    }

    fn parse_statement(&mut self) -> Result<StmtId, ParseError> {
        let tok = self.current();
        let stmt = match tok.kind {
            TokenKind::Break | TokenKind::Continue => {
                self.advance();
                self.expect(TokenKind::Semicolon, "';'")?;
                Statement::Keyword(tok)
            }
            TokenKind::OpenBrace => Statement::Scope(self.parse_scope()?),
            TokenKind::If => Statement::ControlFlow(self.parse_conditional()?),
            TokenKind::For => Statement::ControlFlow(self.parse_for_loop()?),
            TokenKind::While => {
                self.advance();
                self.expect(TokenKind::OpenParen, "'('")?;
                let condition = self.parse_expression()?;
                self.expect(TokenKind::CloseParen, "')'")?;
                let body = self.parse_scope()?;
                Statement::ControlFlow(ControlFlow::While { condition, body })
            }
            TokenKind::Switch => Statement::ControlFlow(self.parse_switch()?),
            TokenKind::Return => {
                self.advance();
                let value = if self.check(TokenKind::Semicolon) {
                    self.ast.make_expression(Expression::None)
                } else {
                    self.parse_expression()?
                };
                self.expect(TokenKind::Semicolon, "';'")?;
                Statement::ControlFlow(ControlFlow::Return { token: tok, value })
            }
            TokenKind::Semicolon => {
                self.advance();
                Statement::Nothing
            }
            TokenKind::Identifier if self.peek(1).kind == TokenKind::Colon => {
                let var = self.parse_var_dec()?;
                self.expect(TokenKind::Semicolon, "';'")?;
                Statement::VarDec(var)
            }
            _ => {
                let expr = self.parse_expression()?;
                self.expect(TokenKind::Semicolon, "';'")?;
                Statement::Expression(expr)
            }
        };
        Ok(self.ast.make_statement(stmt))
    }

    fn parse_conditional(&mut self) -> Result<ControlFlow, ParseError> {
        let mut branches = Vec::new();
        self.expect(TokenKind::If, "'if'")?;
        branches.push(self.parse_branch()?);
        while self.match_kind(TokenKind::Elif).is_some() {
            branches.push(self.parse_branch()?);
        }
        let else_body = if self.match_kind(TokenKind::Else).is_some() {
            Some(self.parse_scope()?)
        } else {
            None
        };
        Ok(ControlFlow::Conditional {
            branches,
            else_body,
        })
    }

    fn parse_branch(&mut self) -> Result<Branch, ParseError> {
        self.expect(TokenKind::OpenParen, "'('")?;
        let condition = self.parse_expression()?;
        self.expect(TokenKind::CloseParen, "')'")?;
        let body = self.parse_scope()?;
        Ok(Branch { condition, body })
    }

    fn parse_for_loop(&mut self) -> Result<ControlFlow, ParseError> {
        self.expect(TokenKind::For, "'for'")?;
        self.expect(TokenKind::OpenParen, "'('")?;

        let initialize = if self.check(TokenKind::Semicolon) {
            self.advance();
            self.ast.make_statement(Statement::Nothing)
        } else if self.check(TokenKind::Identifier) && self.peek(1).kind == TokenKind::Colon {
            let var = self.parse_var_dec()?;
            self.expect(TokenKind::Semicolon, "';'")?;
            self.ast.make_statement(Statement::VarDec(var))
        } else {
            let expr = self.parse_expression()?;
            self.expect(TokenKind::Semicolon, "';'")?;
            self.ast.make_statement(Statement::Expression(expr))
        };

        let condition = if self.check(TokenKind::Semicolon) {
            self.ast.make_expression(Expression::None)
        } else {
            self.parse_expression()?
        };
        self.expect(TokenKind::Semicolon, "';'")?;

        let iteration = if self.check(TokenKind::CloseParen) {
            self.ast.make_expression(Expression::None)
        } else {
            self.parse_expression()?
        };
        self.expect(TokenKind::CloseParen, "')'")?;

        let body = self.parse_scope()?;
        Ok(ControlFlow::ForLoop {
            initialize,
            condition,
            iteration,
            body,
        })
    }

    fn parse_switch(&mut self) -> Result<ControlFlow, ParseError> {
        let token = self.expect(TokenKind::Switch, "'switch'")?;
        self.expect(TokenKind::OpenParen, "'('")?;
        let value = self.parse_expression()?;
        self.expect(TokenKind::CloseParen, "')'")?;
        self.expect(TokenKind::OpenBrace, "'{'")?;
        let mut cases = Vec::new();
        while !self.check(TokenKind::CloseBrace) {
            let label = if self.match_kind(TokenKind::Case).is_some() {
                let label = self.parse_expression()?;
                Some(label)
            } else if self.match_kind(TokenKind::Default).is_some() {
                None
            } else {
                return Err(self.error("expected 'case' or 'default' in switch body"));
            };
            self.expect(TokenKind::Colon, "':'")?;
            let body = self.parse_scope()?;
            cases.push(SwitchCase { label, body });
        }
        self.expect(TokenKind::CloseBrace, "'}'")?;
        Ok(ControlFlow::Switch {
            token,
            value,
            cases,
        })
    }
}
