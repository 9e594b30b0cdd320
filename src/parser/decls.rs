use super::*;
use crate::ast::{
    DeclKind, EnumDec, FuncId, FunctionDec, StructDec, StructId, StructMember, TemplateBody,
    TemplateCreate, TemplateDec, VarDec, VarDecId,
};
use crate::token::TokenKind;

impl<'a> Parser<'a> {
    pub(super) fn parse_declaration(&mut self) -> Result<DeclId, ParseError> {
        let tok = self.current();
        let kind = match tok.kind {
            TokenKind::Func => DeclKind::Function(self.parse_function()?),
            TokenKind::Struct => DeclKind::Struct(self.parse_struct()?),
            TokenKind::Template => DeclKind::Template(self.parse_template()?),
            TokenKind::Create => DeclKind::TemplateCreate(self.parse_create()?),
            TokenKind::Include => {
                self.advance();
                let path = self.expect(TokenKind::StringLiteral, "an include path")?;
                self.expect(TokenKind::Semicolon, "';'")?;
                DeclKind::Include(path)
            }
            TokenKind::Enum => DeclKind::Enum(self.parse_enum()?),
            TokenKind::Identifier if self.peek(1).kind == TokenKind::Colon => {
                let var = self.parse_var_dec()?;
                self.expect(TokenKind::Semicolon, "';'")?;
                DeclKind::Variable(var)
            }
            _ => {
                return Err(self.error(format!(
                    "expected a declaration, found {:?} '{}'",
                    tok.kind,
                    self.spelling(tok)
                )))
            }
        };
        Ok(self.ast.make_declaration(kind, tok.file_index))
    }

    /// `name: type` with an optional `= initializer`. The terminator is
    /// left for the caller, since parameters end on `,`/`)` and statements
    /// on `;`.
    pub(super) fn parse_var_dec(&mut self) -> Result<VarDecId, ParseError> {
        let name = self.expect(TokenKind::Identifier, "a variable name")?;
        self.expect(TokenKind::Colon, "':'")?;
        let ty = self.parse_type()?;
        let initializer = if self.match_kind(TokenKind::Assignment).is_some() {
            Some(self.parse_expression()?)
        } else {
            None
        };
        Ok(self.ast.make_var_dec(VarDec {
            name,
            ty,
            initializer,
        }))
    }

    pub(super) fn parse_function(&mut self) -> Result<FuncId, ParseError> {
        self.expect(TokenKind::Func, "'func'")?;
        let name = self.expect(TokenKind::Identifier, "a function name")?;
        self.expect(TokenKind::OpenParen, "'('")?;
        let mut params = Vec::new();
        if !self.check(TokenKind::CloseParen) {
            loop {
                params.push(self.parse_var_dec()?);
                if self.match_kind(TokenKind::Comma).is_none() {
                    break;
                }
            }
        }
        self.expect(TokenKind::CloseParen, "')'")?;
        self.expect(TokenKind::Colon, "':'")?;
        let return_type = self.parse_type()?;
        let body = self.parse_scope()?;
        Ok(self.ast.make_function(FunctionDec {
            name,
            params,
            return_type,
            body,
        }))
    }

    pub(super) fn parse_struct(&mut self) -> Result<StructId, ParseError> {
        self.expect(TokenKind::Struct, "'struct'")?;
        let name = self.expect(TokenKind::Identifier, "a struct name")?;
        self.expect(TokenKind::OpenBrace, "'{'")?;
        let mut members = Vec::new();
        while !self.check(TokenKind::CloseBrace) {
            if self.check(TokenKind::Func) {
                members.push(StructMember::Func(self.parse_function()?));
            } else {
                let var = self.parse_var_dec()?;
                self.expect(TokenKind::Semicolon, "';'")?;
                members.push(StructMember::Var(var));
            }
        }
        self.expect(TokenKind::CloseBrace, "'}'")?;
        Ok(self.ast.make_struct(StructDec {
            name,
            members,
            checked: false,
            has_cycle: false,
        }))
    }

    fn parse_template(&mut self) -> Result<TemplateDec, ParseError> {
        self.expect(TokenKind::Template, "'template'")?;
        self.expect(TokenKind::OpenBracket, "'['")?;
        let mut params = Vec::new();
        loop {
            params.push(self.expect(TokenKind::Identifier, "a template type parameter")?);
            if self.match_kind(TokenKind::Comma).is_none() {
                break;
            }
        }
        self.expect(TokenKind::CloseBracket, "']'")?;
        let body = match self.current().kind {
            TokenKind::Struct => TemplateBody::Struct(self.parse_struct()?),
            TokenKind::Func => TemplateBody::Function(self.parse_function()?),
            _ => return Err(self.error("expected 'struct' or 'func' after template parameters")),
        };
        Ok(TemplateDec { params, body })
    }

    fn parse_create(&mut self) -> Result<TemplateCreate, ParseError> {
        self.expect(TokenKind::Create, "'create'")?;
        let template_name = self.expect(TokenKind::Identifier, "a template name")?;
        self.expect(TokenKind::OpenBracket, "'['")?;
        let mut args = Vec::new();
        loop {
            args.push(self.parse_type_arg()?);
            if self.match_kind(TokenKind::Comma).is_none() {
                break;
            }
        }
        self.expect(TokenKind::CloseBracket, "']'")?;
        self.expect(TokenKind::As, "'as'")?;
        let new_name = self.expect(TokenKind::Identifier, "a name for the instantiation")?;
        self.expect(TokenKind::Semicolon, "';'")?;
        Ok(TemplateCreate {
            new_name,
            template_name,
            args,
        })
    }

    fn parse_enum(&mut self) -> Result<EnumDec, ParseError> {
        self.expect(TokenKind::Enum, "'enum'")?;
        let name = self.expect(TokenKind::Identifier, "an enum name")?;
        self.expect(TokenKind::OpenBrace, "'{'")?;
        let mut variants = Vec::new();
        while !self.check(TokenKind::CloseBrace) {
            variants.push(self.expect(TokenKind::Identifier, "an enum variant")?);
            if self.match_kind(TokenKind::Comma).is_none() {
                break;
            }
        }
        self.expect(TokenKind::CloseBrace, "'}'")?;
        Ok(EnumDec { name, variants })
    }
}
