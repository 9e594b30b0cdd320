/// Spec tests for the Slate tokenizer: token kinds, buffer slicing,
/// position info, and the prev-token disambiguation of `* & - ++ --`.
use slate::token::TokenKind;
use slate::tokenizer::Tokenizer;

fn kinds(source: &str) -> Vec<TokenKind> {
    let mut tokenizer = Tokenizer::new(0, "<memory>", source.to_string());
    tokenizer
        .tokenize_all()
        .into_iter()
        .map(|t| t.kind)
        .collect()
}

fn kinds_without_eof(source: &str) -> Vec<TokenKind> {
    let mut all = kinds(source);
    assert_eq!(all.pop(), Some(TokenKind::EndOfFile));
    all
}

#[test]
fn keywords_and_identifiers() {
    assert_eq!(
        kinds_without_eof("func f struct while nullptr flag"),
        [
            TokenKind::Func,
            TokenKind::Identifier,
            TokenKind::Struct,
            TokenKind::While,
            TokenKind::NullPtr,
            TokenKind::Identifier,
        ]
    );
}

#[test]
fn type_keywords() {
    assert_eq!(
        kinds_without_eof("bool char i8 u8 i16 u16 i32 u32 i64 u64 f32 f64 ptr ref void"),
        [
            TokenKind::Bool,
            TokenKind::Char,
            TokenKind::I8,
            TokenKind::U8,
            TokenKind::I16,
            TokenKind::U16,
            TokenKind::I32,
            TokenKind::U32,
            TokenKind::I64,
            TokenKind::U64,
            TokenKind::F32,
            TokenKind::F64,
            TokenKind::Pointer,
            TokenKind::Reference,
            TokenKind::Void,
        ]
    );
}

#[test]
fn number_forms() {
    assert_eq!(
        kinds_without_eof("42 3.5 0b1010 0xFF"),
        [
            TokenKind::DecimalNumber,
            TokenKind::FloatNumber,
            TokenKind::BinaryNumber,
            TokenKind::HexNumber,
        ]
    );
}

#[test]
fn floats_are_one_token() {
    let mut tokenizer = Tokenizer::new(0, "<memory>", "x = 3.25;".to_string());
    let tokens = tokenizer.tokenize_all();
    let float = tokens
        .iter()
        .find(|t| t.kind == TokenKind::FloatNumber)
        .expect("float token");
    assert_eq!(tokenizer.extract_token(*float), "3.25");
}

#[test]
fn dot_after_identifier_is_member_access() {
    assert_eq!(
        kinds_without_eof("a.b"),
        [TokenKind::Identifier, TokenKind::Dot, TokenKind::Identifier]
    );
}

#[test]
fn star_and_ampersand_disambiguate_on_previous_token() {
    assert_eq!(
        kinds_without_eof("a * b"),
        [
            TokenKind::Identifier,
            TokenKind::Multiplication,
            TokenKind::Identifier
        ]
    );
    assert_eq!(
        kinds_without_eof("*p"),
        [TokenKind::Dereference, TokenKind::Identifier]
    );
    assert_eq!(
        kinds_without_eof("a & b"),
        [
            TokenKind::Identifier,
            TokenKind::BitwiseAnd,
            TokenKind::Identifier
        ]
    );
    assert_eq!(
        kinds_without_eof("&x"),
        [TokenKind::AddressOf, TokenKind::Identifier]
    );
    assert_eq!(
        kinds_without_eof("(a) * b"),
        [
            TokenKind::OpenParen,
            TokenKind::Identifier,
            TokenKind::CloseParen,
            TokenKind::Multiplication,
            TokenKind::Identifier
        ]
    );
}

#[test]
fn minus_is_negative_unless_it_follows_an_operand() {
    assert_eq!(
        kinds_without_eof("a - 1"),
        [
            TokenKind::Identifier,
            TokenKind::Subtraction,
            TokenKind::DecimalNumber
        ]
    );
    assert_eq!(
        kinds_without_eof("-1"),
        [TokenKind::Negative, TokenKind::DecimalNumber]
    );
}

#[test]
fn increment_is_postfix_after_an_operand() {
    assert_eq!(
        kinds_without_eof("x++"),
        [TokenKind::Identifier, TokenKind::IncrementPostfix]
    );
    assert_eq!(
        kinds_without_eof("++x"),
        [TokenKind::IncrementPrefix, TokenKind::Identifier]
    );
    assert_eq!(
        kinds_without_eof("x-- - --x"),
        [
            TokenKind::Identifier,
            TokenKind::DecrementPostfix,
            TokenKind::Subtraction,
            TokenKind::DecrementPrefix,
            TokenKind::Identifier,
        ]
    );
}

#[test]
fn compound_assignment_and_shift_operators() {
    assert_eq!(
        kinds_without_eof("a += b <<= c >> d <= e"),
        [
            TokenKind::Identifier,
            TokenKind::AdditionAssignment,
            TokenKind::Identifier,
            TokenKind::ShiftLeftAssignment,
            TokenKind::Identifier,
            TokenKind::ShiftRight,
            TokenKind::Identifier,
            TokenKind::LessThanEqual,
            TokenKind::Identifier,
        ]
    );
}

#[test]
fn arrow_is_pointer_member_access() {
    assert_eq!(
        kinds_without_eof("p->x"),
        [
            TokenKind::Identifier,
            TokenKind::PtrMemberAccess,
            TokenKind::Identifier
        ]
    );
}

#[test]
fn comments_and_whitespace_are_skipped() {
    assert_eq!(
        kinds_without_eof("a // trailing comment\n// full line\n  b"),
        [TokenKind::Identifier, TokenKind::Identifier]
    );
}

#[test]
fn string_and_char_literals_slice_the_buffer() {
    let source = "s: ptr char = \"hi\\\"there\"; c: char = 'x';";
    let mut tokenizer = Tokenizer::new(0, "<memory>", source.to_string());
    let tokens = tokenizer.tokenize_all();
    let string = tokens
        .iter()
        .find(|t| t.kind == TokenKind::StringLiteral)
        .expect("string token");
    assert_eq!(tokenizer.extract_token(*string), "\"hi\\\"there\"");
    let ch = tokens
        .iter()
        .find(|t| t.kind == TokenKind::CharLiteral)
        .expect("char token");
    assert_eq!(tokenizer.extract_token(*ch), "'x'");
}

#[test]
fn unterminated_string_is_a_bad_value() {
    assert!(kinds("\"oops\n").contains(&TokenKind::BadValue));
}

#[test]
fn unknown_bytes_are_bad_values_not_errors() {
    assert_eq!(
        kinds_without_eof("a $ b"),
        [
            TokenKind::Identifier,
            TokenKind::BadValue,
            TokenKind::Identifier
        ]
    );
}

#[test]
fn position_info_is_one_based_line_and_column() {
    let source = "func f(): void {\n    x: i32;\n}\n";
    let mut tokenizer = Tokenizer::new(0, "<memory>", source.to_string());
    let tokens = tokenizer.tokenize_all();

    let first = tokenizer.token_position_info(tokens[0]);
    assert_eq!((first.line, first.column), (1, 1));

    let x = tokens
        .iter()
        .find(|t| tokenizer.extract_token(**t) == "x")
        .copied()
        .expect("x token");
    let pos = tokenizer.token_position_info(x);
    assert_eq!((pos.line, pos.column), (2, 5));
}

#[test]
fn tokens_record_offsets_and_lengths() {
    let source = "alpha beta";
    let mut tokenizer = Tokenizer::new(0, "<memory>", source.to_string());
    let tokens = tokenizer.tokenize_all();
    assert_eq!(tokens[0].position, 0);
    assert_eq!(tokens[0].length, 5);
    assert_eq!(tokens[1].position, 6);
    assert_eq!(tokens[1].length, 4);
    assert_eq!(tokenizer.extract_token(tokens[1]), "beta");
}

#[test]
fn stream_ends_with_a_single_eof() {
    let all = kinds("x");
    assert_eq!(all.last(), Some(&TokenKind::EndOfFile));
    assert_eq!(
        all.iter()
            .filter(|k| **k == TokenKind::EndOfFile)
            .count(),
        1
    );
}
