/// Pass 1 (declaration collection) and Pass 2 (header validation).
use std::collections::HashMap;

use super::{Checker, CheckerErrorKind};
use crate::ast::{
    DeclId, DeclKind, FuncId, StructDec, StructId, StructMember, TemplateBody, TemplateCreate,
    TypeList, VarDecId,
};
use crate::token::{Token, TokenKind};

impl<'a> Checker<'a> {
    /// Pass 1: register every top-level name, and every struct member under
    /// its struct. Conflicts keep the first registration and report the
    /// prior declaration.
    pub(crate) fn collect_declarations(&mut self) {
        let decs = self.program.decs.clone();
        for dec_id in decs {
            match self.ast[dec_id].kind.clone() {
                DeclKind::Function(func) => {
                    let name = self.ast[func].name;
                    self.register_global(name, dec_id);
                }
                DeclKind::Variable(var) => {
                    let name = self.ast[var].name;
                    self.register_global(name, dec_id);
                }
                DeclKind::Struct(dec) => self.collect_struct(dec, dec_id),
                DeclKind::Template(template) => {
                    let name = match template.body {
                        TemplateBody::Struct(dec) => self.ast[dec].name,
                        TemplateBody::Function(func) => self.ast[func].name,
                    };
                    self.register_global(name, dec_id);
                }
                DeclKind::TemplateCreate(create) => {
                    self.register_global(create.new_name, dec_id);
                }
                DeclKind::Include(_) | DeclKind::Enum(_) => {}
            }
        }
    }

    fn register_global(&mut self, name_token: Token, dec_id: DeclId) -> bool {
        let name = self.spelling(name_token).to_string();
        if let Some(&prior) = self.lookup.get(&name) {
            self.error_related(CheckerErrorKind::NameAlreadyInUse, name_token, prior);
            false
        } else {
            self.lookup.insert(name, dec_id);
            true
        }
    }

    fn collect_struct(&mut self, dec: StructId, dec_id: DeclId) {
        let name_token = self.ast[dec].name;
        if !self.register_global(name_token, dec_id) {
            return;
        }
        let members = self.ast[dec].members.clone();
        if members.is_empty() {
            self.error(CheckerErrorKind::EmptyStruct, name_token);
        }
        let struct_name = self.spelling(name_token).to_string();
        let mut member_map: HashMap<String, StructMember> = HashMap::new();
        for member in members {
            let member_token = self.ast.member_name(member);
            let member_name = self.spelling(member_token).to_string();
            if let Some(&prior) = member_map.get(&member_name) {
                // Synthesize a declaration for the clashing member so the
                // diagnostic can print its signature.
                let prior_kind = match prior {
                    StructMember::Var(var) => DeclKind::Variable(var),
                    StructMember::Func(func) => DeclKind::Function(func),
                };
                let prior_dec = self
                    .ast
                    .make_declaration(prior_kind, member_token.file_index);
                self.error_related(CheckerErrorKind::NameAlreadyInUse, member_token, prior_dec);
            } else {
                member_map.insert(member_name, member);
            }
        }
        self.struct_lookup.insert(struct_name, member_map);
    }

    /// Pass 2: validate every declared type and resolve identifier bases.
    pub(crate) fn validate_headers(&mut self) {
        let decs = self.program.decs.clone();
        for dec_id in decs {
            match self.ast[dec_id].kind.clone() {
                DeclKind::Function(func) => {
                    let valid = self.validate_function_header(func);
                    self.ast[dec_id].valid = valid;
                }
                DeclKind::Variable(var) => {
                    let valid = self.check_var_dec_type(var);
                    self.ast[dec_id].valid = valid;
                }
                DeclKind::Struct(dec) => {
                    let valid = self.validate_struct_members(dec);
                    self.ast[dec_id].valid = valid;
                }
                DeclKind::Template(template) => {
                    let placeholders = self.register_template_params(&template.params);
                    let valid = match template.body {
                        TemplateBody::Struct(dec) => self.validate_struct_members(dec),
                        TemplateBody::Function(func) => self.validate_function_header(func),
                    };
                    self.ast[dec_id].valid = valid;
                    for name in placeholders.iter().rev() {
                        self.lookup.remove(name);
                    }
                }
                DeclKind::TemplateCreate(create) => self.validate_template_create(&create),
                DeclKind::Include(_) | DeclKind::Enum(_) => {}
            }
        }
    }

    pub(crate) fn validate_function_header(&mut self, func: FuncId) -> bool {
        let mut valid = true;
        let return_type = self.ast[func].return_type.clone();
        let (ok, resolved) = self.check_type(&return_type);
        self.ast[func].return_type.resolved = resolved;
        if !ok {
            // A bare `void` return type is the one place void is fine.
            if matches!(self.errors.last(), Some(e) if e.kind == CheckerErrorKind::VoidType) {
                self.errors.pop();
            } else {
                valid = false;
            }
        }
        for param in self.ast[func].params.clone() {
            if !self.check_var_dec_type(param) {
                valid = false;
            }
        }
        valid
    }

    pub(crate) fn validate_struct_members(&mut self, dec: StructId) -> bool {
        let mut valid = true;
        for member in self.ast[dec].members.clone() {
            let ok = match member {
                StructMember::Var(var) => self.check_var_dec_type(var),
                StructMember::Func(func) => self.validate_function_header(func),
            };
            if !ok {
                valid = false;
            }
        }
        valid
    }

    /// Register template type parameters as placeholder struct declarations
    /// so `check_type` accepts them while the template body is validated.
    /// Returns the names actually registered, for LIFO removal.
    fn register_template_params(&mut self, params: &[Token]) -> Vec<String> {
        let mut registered = Vec::new();
        for &param in params {
            let name = self.spelling(param).to_string();
            if let Some(&prior) = self.lookup.get(&name) {
                self.error_related(CheckerErrorKind::NameAlreadyInUse, param, prior);
                continue;
            }
            let placeholder = self.ast.make_struct(StructDec {
                name: param,
                members: Vec::new(),
                checked: true,
                has_cycle: false,
            });
            let dec = self
                .ast
                .make_declaration(DeclKind::Struct(placeholder), param.file_index);
            self.lookup.insert(name.clone(), dec);
            registered.push(name);
        }
        registered
    }

    fn validate_template_create(&mut self, create: &TemplateCreate) {
        let name = self.spelling(create.template_name).to_string();
        let Some(&dec) = self.lookup.get(&name) else {
            self.error(CheckerErrorKind::NoSuchTemplate, create.template_name);
            return;
        };
        let DeclKind::Template(template) = self.ast[dec].kind.clone() else {
            self.error_related(CheckerErrorKind::NotATemplate, create.template_name, dec);
            return;
        };
        for &arg in &create.args {
            if arg.kind == TokenKind::Identifier && !self.lookup.contains_key(self.spelling(arg)) {
                self.error(CheckerErrorKind::NoSuchType, arg);
            }
        }
        if create.args.len() != template.params.len() {
            let at = create.args.last().copied().unwrap_or(create.template_name);
            self.error_related(CheckerErrorKind::WrongNumberOfArgs, at, dec);
        }
    }

    pub(crate) fn check_var_dec_type(&mut self, var: VarDecId) -> bool {
        let ty = self.ast[var].ty.clone();
        let (ok, resolved) = self.check_type(&ty);
        self.ast[var].ty.resolved = resolved;
        ok
    }

    /// Validate a type chain against the canonical form
    /// `[ref] [ptr]* base` and resolve an identifier base. Returns whether
    /// the chain is valid and, for identifier bases, the struct declaration
    /// it names.
    ///
    /// A bare `void` reports `VoidType`; function return validation pops
    /// that specific error since `void` returns are allowed.
    pub(crate) fn check_type(&mut self, ty: &TypeList) -> (bool, Option<DeclId>) {
        // 0 = start, 1 = seen ref, 2 = seen ptr, 3 = have base
        let mut state = 0u8;
        let mut resolved = None;
        for &token in &ty.tokens {
            match token.kind {
                TokenKind::Pointer => {
                    if state == 3 {
                        self.error(CheckerErrorKind::UnexpectedType, token);
                        return (false, None);
                    }
                    state = 2;
                }
                TokenKind::Reference => match state {
                    1 => {
                        self.error(CheckerErrorKind::CannotRefARef, token);
                        return (false, None);
                    }
                    2 => {
                        self.error(CheckerErrorKind::CannotPtrARef, token);
                        return (false, None);
                    }
                    3 => {
                        self.error(CheckerErrorKind::UnexpectedType, token);
                        return (false, None);
                    }
                    _ => state = 1,
                },
                TokenKind::Identifier => {
                    if state == 3 {
                        self.error(CheckerErrorKind::CannotHaveMultiType, token);
                        return (false, None);
                    }
                    let name = self.spelling(token).to_string();
                    let Some(&dec) = self.lookup.get(&name) else {
                        self.error(CheckerErrorKind::NoSuchType, token);
                        return (false, None);
                    };
                    if !matches!(self.ast[dec].kind, DeclKind::Struct(_)) {
                        self.error_related(CheckerErrorKind::ExpectingType, token, dec);
                        return (false, None);
                    }
                    resolved = Some(dec);
                    state = 3;
                }
                kind if kind.is_concrete_type() => {
                    if state == 3 {
                        self.error(CheckerErrorKind::CannotHaveMultiType, token);
                        return (false, None);
                    }
                    if kind == TokenKind::Void && state == 0 {
                        self.error(CheckerErrorKind::VoidType, token);
                        return (false, None);
                    }
                    state = 3;
                }
                _ => {
                    self.error(CheckerErrorKind::UnexpectedType, token);
                    return (false, None);
                }
            }
        }
        if state == 3 {
            (true, resolved)
        } else {
            // Qualifiers with no base (`x: ptr;`).
            self.error(CheckerErrorKind::ExpectingType, ty.base());
            (false, None)
        }
    }
}
