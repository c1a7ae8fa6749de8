use crate::language::{
    span::Span,
    token::{Token, TokenKind},
};
use nom::{
    bytes::complete::{take_while, take_while1},
    character::complete::{char, digit1},
    combinator::{opt, recognize},
    sequence::pair,
    IResult,
};

#[derive(Debug)]
pub struct LexError {
    pub message: String,
    pub span: Span,
}

pub fn lex(source: &str) -> Result<Vec<Token>, Vec<LexError>> {
    Lexer::new(source).run()
}

/// Line-oriented scanner. The surface syntax is indentation-structured,
/// so the lexer owns the indent stack and emits Indent/Dedent/Newline
/// tokens; within a line, nom recognizers pick out words and numbers.
struct Lexer<'a> {
    src: &'a str,
    indents: Vec<usize>,
    tokens: Vec<Token>,
    errors: Vec<LexError>,
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            indents: vec![0],
            tokens: Vec::new(),
            errors: Vec::new(),
        }
    }

    fn run(mut self) -> Result<Vec<Token>, Vec<LexError>> {
        let mut start = 0;
        while start < self.src.len() {
            let rest = &self.src[start..];
            let line_len = rest.find('\n').unwrap_or(rest.len());
            self.lex_line(&rest[..line_len], start);
            start += line_len + 1;
        }

        let end = self.src.len();
        while self.indents.len() > 1 {
            self.indents.pop();
            self.push_token(TokenKind::Dedent, end, end);
        }
        self.push_token(TokenKind::Eof, end, end);

        if self.errors.is_empty() {
            Ok(self.tokens)
        } else {
            Err(self.errors)
        }
    }

    fn lex_line(&mut self, line: &str, line_start: usize) {
        let indent = line.len() - line.trim_start_matches(' ').len();
        let body = &line[indent..];
        if body.is_empty() || body.starts_with('#') {
            return;
        }
        if body.starts_with('\t') {
            self.error(
                "Tabs are not allowed in indentation",
                line_start,
                line_start + indent + 1,
            );
            return;
        }

        self.adjust_indent(indent, line_start);
        self.lex_line_body(line, indent, line_start);
        let end = line_start + line.len();
        self.push_token(TokenKind::Newline, end, end);
    }

    fn adjust_indent(&mut self, indent: usize, line_start: usize) {
        let current = *self.indents.last().unwrap_or(&0);
        if indent > current {
            self.indents.push(indent);
            self.push_token(TokenKind::Indent, line_start, line_start + indent);
            return;
        }
        while self.indents.last().is_some_and(|level| *level > indent) {
            self.indents.pop();
            self.push_token(TokenKind::Dedent, line_start, line_start + indent);
        }
        if self.indents.last() != Some(&indent) {
            self.error(
                "Unindent does not match any outer indentation level",
                line_start,
                line_start + indent,
            );
            self.indents.push(indent);
        }
    }

    fn lex_line_body(&mut self, line: &str, start: usize, line_start: usize) {
        let mut pos = start;
        while pos < line.len() {
            let rest = &line[pos..];
            let ch = rest.chars().next().unwrap_or(' ');
            let abs = line_start + pos;

            if ch == ' ' || ch == '\t' {
                pos += 1;
                continue;
            }
            if ch == '#' {
                break;
            }

            if ch.is_ascii_alphabetic() || ch == '_' {
                if let Ok((remaining, word)) = identifier(rest) {
                    let len = rest.len() - remaining.len();
                    let kind = match word {
                        "def" => TokenKind::Def,
                        "class" => TokenKind::Class,
                        _ => TokenKind::Identifier(word.to_string()),
                    };
                    self.push_token(kind, abs, abs + len);
                    pos += len;
                    continue;
                }
            }

            if ch.is_ascii_digit() {
                if let Ok((remaining, text)) = number(rest) {
                    let len = rest.len() - remaining.len();
                    self.lex_number(text, abs, abs + len);
                    pos += len;
                    continue;
                }
            }

            let symbol = match ch {
                '(' => Some(TokenKind::LParen),
                ')' => Some(TokenKind::RParen),
                ',' => Some(TokenKind::Comma),
                '.' => Some(TokenKind::Dot),
                '=' => Some(TokenKind::Eq),
                ':' => Some(TokenKind::Colon),
                _ => None,
            };
            if let Some(kind) = symbol {
                self.push_token(kind, abs, abs + 1);
                pos += 1;
                continue;
            }

            if ch == '\'' || ch == '"' {
                self.error("String literals are not supported", abs, abs + 1);
                return;
            }
            self.error(
                format!("Unexpected character `{ch}`"),
                abs,
                abs + ch.len_utf8(),
            );
            pos += ch.len_utf8();
        }
    }

    fn lex_number(&mut self, text: &str, start: usize, end: usize) {
        if text.contains('.') {
            match text.parse::<f64>() {
                Ok(value) => self.push_token(TokenKind::Float(value), start, end),
                Err(_) => self.error("Invalid number literal", start, end),
            }
        } else {
            match text.parse::<i64>() {
                Ok(value) => self.push_token(TokenKind::Integer(value), start, end),
                Err(_) => self.error("Integer literal out of range", start, end),
            }
        }
    }

    fn push_token(&mut self, kind: TokenKind, start: usize, end: usize) {
        self.tokens.push(Token {
            kind,
            span: Span::new(start, end),
        });
    }

    fn error(&mut self, message: impl Into<String>, start: usize, end: usize) {
        self.errors.push(LexError {
            message: message.into(),
            span: Span::new(start, end),
        });
    }
}

fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        take_while1(|c: char| c.is_ascii_alphabetic() || c == '_'),
        take_while(|c: char| c.is_ascii_alphanumeric() || c == '_'),
    ))(input)
}

fn number(input: &str) -> IResult<&str, &str> {
    recognize(pair(digit1, opt(pair(char('.'), digit1))))(input)
}
