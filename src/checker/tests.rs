use super::types::TypeCache;
use super::{assignment_compatible, can_be_converted_to_bool, Checker, CheckerErrorKind};
use crate::ast::TypeList;
use crate::source::parse_source;
use crate::token::{Token, TokenKind};

fn kinds(source: &str) -> Vec<CheckerErrorKind> {
    let mut loaded = parse_source(source).expect("parse failed");
    let mut checker = Checker::new(&mut loaded.ast, &loaded.program, &loaded.tokenizers);
    checker.check();
    checker.errors.iter().map(|e| e.kind).collect()
}

fn chain(kinds: &[TokenKind]) -> TypeList {
    TypeList::new(kinds.iter().map(|&k| Token::synthetic(k)).collect())
}

// ---------------------------------------------------------------------------
// Type algebra
// ---------------------------------------------------------------------------

#[test]
fn largest_type_floors_at_i32() {
    let types = TypeCache::new();
    let joined = types.largest_type(&types.char_type, &types.bool_type);
    assert_eq!(joined.first_kind(), TokenKind::I32);
}

#[test]
fn largest_type_prefers_wider_operand() {
    let types = TypeCache::new();
    let joined = types.largest_type(&types.i32_type, &types.u64_type);
    assert_eq!(joined.first_kind(), TokenKind::U64);
    let joined = types.largest_type(&types.f32_type, &types.i64_type);
    assert_eq!(joined.first_kind(), TokenKind::F32);
}

#[test]
fn largest_type_with_pointer_is_void_pointer() {
    let types = TypeCache::new();
    let joined = types.largest_type(&types.string_type, &types.i32_type);
    assert!(joined.same_as(&types.ptr_to_void));
}

#[test]
fn void_pointer_converts_both_ways() {
    let ptr_void = chain(&[TokenKind::Pointer, TokenKind::Void]);
    for pointer in [
        chain(&[TokenKind::Pointer, TokenKind::Char]),
        chain(&[TokenKind::Pointer, TokenKind::Pointer, TokenKind::I64]),
        chain(&[TokenKind::Pointer, TokenKind::Pointer, TokenKind::Pointer, TokenKind::U8]),
    ] {
        assert!(assignment_compatible(&ptr_void, &pointer));
        assert!(assignment_compatible(&pointer, &ptr_void));
    }
}

#[test]
fn nullptr_only_assigns_to_pointers() {
    let nullptr = chain(&[TokenKind::NullPtr]);
    assert!(assignment_compatible(
        &chain(&[TokenKind::Pointer, TokenKind::I32]),
        &nullptr
    ));
    assert!(!assignment_compatible(&chain(&[TokenKind::I32]), &nullptr));
}

#[test]
fn mismatched_pointee_chains_are_incompatible() {
    let ptr_char = chain(&[TokenKind::Pointer, TokenKind::Char]);
    let ptr_ptr_char = chain(&[TokenKind::Pointer, TokenKind::Pointer, TokenKind::Char]);
    assert!(!assignment_compatible(&ptr_char, &ptr_ptr_char));
    assert!(!assignment_compatible(&ptr_ptr_char, &ptr_char));
}

#[test]
fn scalars_interconvert_but_not_with_void() {
    assert!(assignment_compatible(
        &chain(&[TokenKind::I32]),
        &chain(&[TokenKind::F64])
    ));
    assert!(!assignment_compatible(
        &chain(&[TokenKind::Void]),
        &chain(&[TokenKind::I32])
    ));
    assert!(!assignment_compatible(
        &chain(&[TokenKind::I32]),
        &chain(&[TokenKind::Void])
    ));
}

#[test]
fn references_are_transparent_to_assignment() {
    assert!(assignment_compatible(
        &chain(&[TokenKind::Reference, TokenKind::I32]),
        &chain(&[TokenKind::U8])
    ));
}

#[test]
fn bool_conversion_rejects_void_pointers_and_structs() {
    assert!(can_be_converted_to_bool(&chain(&[TokenKind::I32])));
    assert!(can_be_converted_to_bool(&chain(&[
        TokenKind::Reference,
        TokenKind::Char
    ])));
    assert!(!can_be_converted_to_bool(&chain(&[TokenKind::Void])));
    assert!(!can_be_converted_to_bool(&chain(&[
        TokenKind::Pointer,
        TokenKind::I32
    ])));
    assert!(!can_be_converted_to_bool(&chain(&[TokenKind::Identifier])));
}

// ---------------------------------------------------------------------------
// Pass mechanics
// ---------------------------------------------------------------------------

#[test]
fn collecting_declarations_twice_reports_every_name_once() {
    let mut loaded = parse_source(
        "x: i32;\n\
         func f(): void { }\n\
         struct S { n: i32; }\n",
    )
    .expect("parse failed");
    let mut checker = Checker::new(&mut loaded.ast, &loaded.program, &loaded.tokenizers);
    checker.collect_declarations();
    assert!(checker.errors.is_empty());

    checker.collect_declarations();
    assert_eq!(checker.errors.len(), 3);
    assert!(checker
        .errors
        .iter()
        .all(|e| e.kind == CheckerErrorKind::NameAlreadyInUse));
}

#[test]
fn lookup_holds_only_globals_after_check() {
    let mut loaded = parse_source(
        "g: i32;\n\
         struct S { n: i32; }\n\
         template [T] struct Box { value: T; }\n\
         func f(a: i32, b: char): i32 {\n\
             c: i32 = a;\n\
             { d: S; }\n\
             return c;\n\
         }\n",
    )
    .expect("parse failed");
    let mut checker = Checker::new(&mut loaded.ast, &loaded.program, &loaded.tokenizers);
    assert!(checker.check());

    let mut names: Vec<&str> = checker.lookup.keys().map(|s| s.as_str()).collect();
    names.sort_unstable();
    assert_eq!(names, ["Box", "S", "f", "g"]);
}

#[test]
fn locals_are_removed_even_when_a_function_aborts() {
    // The second parameter clashes with the global; the first must still be
    // withdrawn from the table.
    let mut loaded = parse_source(
        "g: i32;\n\
         func f(a: i32, g: i32): void { }\n",
    )
    .expect("parse failed");
    let mut checker = Checker::new(&mut loaded.ast, &loaded.program, &loaded.tokenizers);
    checker.check();
    assert_eq!(
        checker.errors.iter().map(|e| e.kind).collect::<Vec<_>>(),
        [CheckerErrorKind::NameAlreadyInUse]
    );
    assert!(!checker.lookup.contains_key("a"));
}

#[test]
fn template_parameters_do_not_leak_into_later_headers() {
    let errors = kinds(
        "template [T] struct Box { value: T; }\n\
         x: T;\n",
    );
    assert_eq!(errors, [CheckerErrorKind::NoSuchType]);
}

#[test]
fn struct_member_types_resolve_against_globals() {
    let errors = kinds(
        "struct A { n: i32; }\n\
         struct B { a: ptr A; value: Missing; }\n",
    );
    assert_eq!(errors, [CheckerErrorKind::NoSuchType]);
}
