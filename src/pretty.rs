/// Signature printing for diagnostics: when an error carries a related
/// declaration, its header is rendered after the message so the user sees
/// what the name actually refers to. Bodies are never printed.
use crate::ast::{
    Ast, DeclId, DeclKind, FuncId, StructMember, TemplateBody, TypeList, VarDecId,
};
use crate::token::{Token, TokenKind};
use crate::tokenizer::Tokenizer;

fn spelling(tokenizers: &[Tokenizer], tok: Token) -> &str {
    tokenizers[tok.file_index as usize].extract_token(tok)
}

pub fn type_signature(tokenizers: &[Tokenizer], ty: &TypeList) -> String {
    let mut parts = Vec::with_capacity(ty.tokens.len());
    for &tok in &ty.tokens {
        parts.push(match tok.kind {
            TokenKind::Identifier => spelling(tokenizers, tok).to_string(),
            kind => type_keyword(kind).to_string(),
        });
    }
    parts.join(" ")
}

fn type_keyword(kind: TokenKind) -> &'static str {
    match kind {
        TokenKind::Bool => "bool",
        TokenKind::Char => "char",
        TokenKind::I8 => "i8",
        TokenKind::U8 => "u8",
        TokenKind::I16 => "i16",
        TokenKind::U16 => "u16",
        TokenKind::I32 => "i32",
        TokenKind::U32 => "u32",
        TokenKind::I64 => "i64",
        TokenKind::U64 => "u64",
        TokenKind::F32 => "f32",
        TokenKind::F64 => "f64",
        TokenKind::Void => "void",
        TokenKind::Pointer => "ptr",
        TokenKind::Reference => "ref",
        TokenKind::NullPtr => "nullptr",
        _ => "?",
    }
}

pub fn var_dec_signature(ast: &Ast, tokenizers: &[Tokenizer], var: VarDecId) -> String {
    let dec = &ast[var];
    format!(
        "{}: {}",
        spelling(tokenizers, dec.name),
        type_signature(tokenizers, &dec.ty)
    )
}

pub fn function_signature(ast: &Ast, tokenizers: &[Tokenizer], func: FuncId) -> String {
    let dec = &ast[func];
    let params = dec
        .params
        .iter()
        .map(|&param| var_dec_signature(ast, tokenizers, param))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "func {}({}): {}",
        spelling(tokenizers, dec.name),
        params,
        type_signature(tokenizers, &dec.return_type)
    )
}

pub fn declaration_signature(ast: &Ast, tokenizers: &[Tokenizer], dec: DeclId) -> String {
    match &ast[dec].kind {
        DeclKind::Function(func) => function_signature(ast, tokenizers, *func),
        DeclKind::Variable(var) => var_dec_signature(ast, tokenizers, *var),
        DeclKind::Struct(id) => format!("struct {}", spelling(tokenizers, ast[*id].name)),
        DeclKind::Template(template) => {
            let params = template
                .params
                .iter()
                .map(|&param| spelling(tokenizers, param).to_string())
                .collect::<Vec<_>>()
                .join(", ");
            let body = match template.body {
                TemplateBody::Struct(id) => {
                    format!("struct {}", spelling(tokenizers, ast[id].name))
                }
                TemplateBody::Function(func) => function_signature(ast, tokenizers, func),
            };
            format!("template [{}] {}", params, body)
        }
        DeclKind::TemplateCreate(create) => {
            let args = create
                .args
                .iter()
                .map(|&arg| match arg.kind {
                    TokenKind::Identifier => spelling(tokenizers, arg).to_string(),
                    kind => type_keyword(kind).to_string(),
                })
                .collect::<Vec<_>>()
                .join(", ");
            format!(
                "create {} [{}] as {}",
                spelling(tokenizers, create.template_name),
                args,
                spelling(tokenizers, create.new_name)
            )
        }
        DeclKind::Include(path) => format!("include {}", spelling(tokenizers, *path)),
        DeclKind::Enum(dec) => format!("enum {}", spelling(tokenizers, dec.name)),
    }
}

/// Struct members are rendered through the declaration each error
/// synthesizes, but tools dumping the AST want the full header.
pub fn struct_signature(ast: &Ast, tokenizers: &[Tokenizer], dec: DeclId) -> Option<String> {
    let DeclKind::Struct(id) = &ast[dec].kind else {
        return None;
    };
    let mut out = format!("struct {} {{\n", spelling(tokenizers, ast[*id].name));
    for member in &ast[*id].members {
        match member {
            StructMember::Var(var) => {
                out.push_str(&format!(
                    "  {};\n",
                    var_dec_signature(ast, tokenizers, *var)
                ));
            }
            StructMember::Func(func) => {
                out.push_str(&format!(
                    "  {};\n",
                    function_signature(ast, tokenizers, *func)
                ));
            }
        }
    }
    out.push('}');
    Some(out)
}
