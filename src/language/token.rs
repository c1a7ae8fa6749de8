use crate::language::span::Span;

#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    Identifier(String),
    Integer(i64),
    Float(f64),

    Def,
    Class,

    Eq,
    Dot,
    Comma,
    Colon,
    LParen,
    RParen,

    Newline,
    Indent,
    Dedent,

    Eof,
}
