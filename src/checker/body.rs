/// Pass 4: function bodies. Scopes register locals into the shared symbol
/// table on entry and strip them in LIFO order on every exit path, which is
/// the entire scoping mechanism.
use super::{Checker, CheckerErrorKind};
use crate::ast::{
    ControlFlow, DeclKind, ExprId, Expression, FuncId, ScopeId, Statement, TypeList, VarDecId,
};
use crate::checker::types::{assignment_compatible, can_be_converted_to_bool};
use crate::token::TokenKind;

impl<'a> Checker<'a> {
    pub(crate) fn check_bodies(&mut self) {
        let decs = self.program.decs.clone();
        for dec_id in decs {
            if let DeclKind::Function(func) = self.ast[dec_id].kind {
                self.check_function(func);
            }
        }
    }

    fn check_function(&mut self, func: FuncId) -> bool {
        let mut locals: Vec<String> = Vec::new();
        for param in self.ast[func].params.clone() {
            let name_token = self.ast[param].name;
            let name = self.spelling(name_token).to_string();
            if let Some(&prior) = self.lookup.get(&name) {
                self.error_related(CheckerErrorKind::NameAlreadyInUse, name_token, prior);
                self.remove_locals(&mut locals, 0);
                return false;
            }
            // Parameter types were validated in Pass 2; just bind them.
            let dec = self
                .ast
                .make_declaration(DeclKind::Variable(param), name_token.file_index);
            self.lookup.insert(name.clone(), dec);
            locals.push(name);
        }

        let return_type = self.ast[func].return_type.clone();
        let body = self.ast[func].body;
        let returned = self.check_scope(body, &mut locals, &return_type, false, false);
        if return_type.first_kind() != TokenKind::Void && !returned {
            self.error(CheckerErrorKind::NotAllCodePathsReturn, self.ast[func].name);
        }
        self.remove_locals(&mut locals, 0);
        true
    }

    fn remove_locals(&mut self, locals: &mut Vec<String>, marker: usize) {
        while locals.len() > marker {
            let name = locals.pop().unwrap_or_default();
            self.lookup.remove(&name);
        }
    }

    /// Returns whether the scope returns on all paths: a return statement
    /// at this level, a nested scope that does, or a conditional whose
    /// branches all do and which has an `else`.
    fn check_scope(
        &mut self,
        scope: ScopeId,
        locals: &mut Vec<String>,
        return_type: &TypeList,
        in_loop: bool,
        in_switch: bool,
    ) -> bool {
        let marker = locals.len();
        let mut returned = false;
        for stmt_id in self.ast[scope].statements.clone() {
            match self.ast[stmt_id].clone() {
                Statement::Expression(expr) => {
                    self.check_expression(expr, None);
                }
                Statement::VarDec(var) => self.check_local_var_dec(var, locals),
                Statement::Keyword(token) => match token.kind {
                    TokenKind::Continue => {
                        if !in_loop {
                            self.error(CheckerErrorKind::CannotHaveContinueHere, token);
                        }
                    }
                    TokenKind::Break => {
                        if !in_loop && !in_switch {
                            self.error(CheckerErrorKind::CannotHaveBreakHere, token);
                        }
                    }
                    _ => unreachable!("parser only produces break/continue keyword statements"),
                },
                Statement::Scope(inner) => {
                    // A bare nested scope keeps the surrounding loop/switch
                    // context.
                    returned |= self.check_scope(inner, locals, return_type, in_loop, in_switch);
                }
                Statement::ControlFlow(flow) => {
                    returned |=
                        self.check_control_flow(&flow, locals, return_type, in_loop, in_switch);
                }
                Statement::Nothing => {}
            }
        }
        self.remove_locals(locals, marker);
        returned
    }

    fn check_local_var_dec(&mut self, var: VarDecId, locals: &mut Vec<String>) {
        let name_token = self.ast[var].name;
        let name = self.spelling(name_token).to_string();
        if let Some(&prior) = self.lookup.get(&name) {
            self.error_related(CheckerErrorKind::NameAlreadyInUse, name_token, prior);
            return;
        }
        let dec = self
            .ast
            .make_declaration(DeclKind::Variable(var), name_token.file_index);
        self.lookup.insert(name.clone(), dec);
        locals.push(name);

        let type_ok = self.check_var_dec_type(var);
        if let Some(init) = self.ast[var].initializer {
            let value = self.check_expression(init, None);
            if type_ok && !value.is_bad() {
                let declared = self.ast[var].ty.clone();
                if !assignment_compatible(&declared, &value.ty) {
                    let at = self.expression_token(init);
                    self.error(CheckerErrorKind::CannotAssign, at);
                }
            }
        }
    }

    fn check_control_flow(
        &mut self,
        flow: &ControlFlow,
        locals: &mut Vec<String>,
        return_type: &TypeList,
        in_loop: bool,
        in_switch: bool,
    ) -> bool {
        match flow {
            ControlFlow::ForLoop {
                initialize,
                condition,
                iteration,
                body,
            } => {
                let marker = locals.len();
                match self.ast[*initialize].clone() {
                    Statement::VarDec(var) => self.check_local_var_dec(var, locals),
                    Statement::Expression(expr) => {
                        self.check_expression(expr, None);
                    }
                    Statement::Nothing => {}
                    _ => unreachable!(
                        "parser restricts for-loop initializers to declarations and expressions"
                    ),
                }
                self.check_condition(*condition);
                self.check_expression(*iteration, None);
                self.check_scope(*body, locals, return_type, true, in_switch);
                // The initializer's binding is scoped to the loop.
                self.remove_locals(locals, marker);
                false
            }
            ControlFlow::While { condition, body } => {
                self.check_condition(*condition);
                self.check_scope(*body, locals, return_type, true, in_switch);
                false
            }
            ControlFlow::Conditional {
                branches,
                else_body,
            } => {
                let mut all_return = true;
                for branch in branches {
                    self.check_condition(branch.condition);
                    let branch_returns =
                        self.check_scope(branch.body, locals, return_type, in_loop, in_switch);
                    all_return = all_return && branch_returns;
                }
                match else_body {
                    Some(body) => {
                        let else_returns =
                            self.check_scope(*body, locals, return_type, in_loop, in_switch);
                        all_return && else_returns
                    }
                    // Without an else, falling through is always possible.
                    None => false,
                }
            }
            ControlFlow::Return { token, value } => {
                let result = self.check_expression(*value, None);
                let value_kind = result.ty.first_kind();
                let returns_void = return_type.first_kind() == TokenKind::Void;
                let value_is_empty =
                    matches!(value_kind, TokenKind::Nothing | TokenKind::Void);
                if returns_void {
                    if !value_is_empty {
                        self.error(CheckerErrorKind::IncorrectReturnType, *token);
                    }
                } else if value_is_empty {
                    self.error(CheckerErrorKind::IncorrectReturnType, *token);
                } else if value_kind != TokenKind::BadValue
                    && !assignment_compatible(return_type, &result.ty)
                {
                    self.error(CheckerErrorKind::IncorrectReturnType, *token);
                }
                true
            }
            ControlFlow::Switch {
                token: _,
                value,
                cases,
            } => {
                self.check_expression(*value, None);
                for case in cases {
                    if let Some(label) = case.label {
                        self.check_expression(label, None);
                    }
                    self.check_scope(case.body, locals, return_type, in_loop, true);
                }
                false
            }
        }
    }

    fn check_condition(&mut self, condition: ExprId) {
        if matches!(self.ast[condition], Expression::None) {
            return;
        }
        let result = self.check_expression(condition, None);
        if result.is_bad() {
            return;
        }
        if !can_be_converted_to_bool(&result.ty) {
            let at = self.expression_token(condition);
            self.error(CheckerErrorKind::CannotBeConvertedToBool, at);
        }
    }
}
