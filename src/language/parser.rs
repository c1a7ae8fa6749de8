use crate::language::{
    ast::*,
    errors::{SyntaxError, SyntaxErrors},
    lexer::lex,
    span::Span,
    token::{Token, TokenKind},
};

pub fn parse_module(source: &str) -> Result<Module, SyntaxErrors> {
    let tokens = match lex(source) {
        Ok(tokens) => tokens,
        Err(errors) => {
            let errs = errors
                .into_iter()
                .map(|err| SyntaxError::new(err.message, err.span))
                .collect();
            return Err(SyntaxErrors::new(errs));
        }
    };
    Parser::new(tokens).parse()
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    errors: Vec<SyntaxError>,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pos: 0,
            errors: Vec::new(),
        }
    }

    fn parse(mut self) -> Result<Module, SyntaxErrors> {
        let mut body = Vec::new();

        while !self.is_eof() {
            if self.matches(TokenKind::Newline) {
                continue;
            }
            match self.parse_statement() {
                Ok(stmt) => body.push(stmt),
                Err(err) => {
                    self.report(err);
                    self.synchronize();
                }
            }
        }

        if self.errors.is_empty() {
            Ok(Module { body })
        } else {
            Err(SyntaxErrors::new(self.errors))
        }
    }

    fn parse_statement(&mut self) -> Result<Stmt, SyntaxError> {
        if self.matches(TokenKind::Def) {
            return self.parse_function_def().map(Stmt::FunctionDef);
        }
        if self.matches(TokenKind::Class) {
            return self.parse_class_def().map(Stmt::ClassDef);
        }
        self.parse_simple_statement()
    }

    fn parse_function_def(&mut self) -> Result<FunctionDef, SyntaxError> {
        let name = self.expect_identifier("Expected function name after 'def'")?;
        self.expect(TokenKind::LParen)?;
        let mut params = Vec::new();
        if !self.check(TokenKind::RParen) {
            loop {
                params.push(self.expect_identifier("Expected parameter name")?.name);
                if !self.matches(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen)?;
        self.expect(TokenKind::Colon)?;
        let body = self.parse_block()?;
        Ok(FunctionDef {
            name: name.name,
            params,
            body,
            span: name.span,
        })
    }

    fn parse_class_def(&mut self) -> Result<ClassDef, SyntaxError> {
        let name = self.expect_identifier("Expected class name after 'class'")?;
        let mut bases = Vec::new();
        if self.matches(TokenKind::LParen) {
            if !self.check(TokenKind::RParen) {
                loop {
                    bases.push(self.expect_identifier("Expected base class name")?);
                    if !self.matches(TokenKind::Comma) {
                        break;
                    }
                }
            }
            self.expect(TokenKind::RParen)?;
        }
        self.expect(TokenKind::Colon)?;
        let body = self.parse_block()?;
        Ok(ClassDef {
            name: name.name,
            bases,
            body,
            span: name.span,
        })
    }

    fn parse_block(&mut self) -> Result<Vec<Stmt>, SyntaxError> {
        self.expect(TokenKind::Newline)?;
        if !self.matches(TokenKind::Indent) {
            return Err(self
                .error_here("Expected an indented block")
                .with_help("statements inside 'def' and 'class' bodies must be indented"));
        }
        let mut body = Vec::new();
        while !self.check(TokenKind::Dedent) && !self.is_eof() {
            if self.matches(TokenKind::Newline) {
                continue;
            }
            body.push(self.parse_statement()?);
        }
        self.expect(TokenKind::Dedent)?;
        Ok(body)
    }

    /// A line is either an expression statement or a (possibly chained)
    /// assignment; `a = b = 2` parses into two targets so the evaluator
    /// can reject it itself.
    fn parse_simple_statement(&mut self) -> Result<Stmt, SyntaxError> {
        let mut exprs = vec![self.parse_expression()?];
        while self.matches(TokenKind::Eq) {
            exprs.push(self.parse_expression()?);
        }
        self.expect(TokenKind::Newline)?;

        if exprs.len() == 1 {
            let value = exprs.remove(0);
            return Ok(Stmt::Expr(ExprStmt { value }));
        }
        let value = exprs.pop().expect("chain has a final expression");
        let span = exprs[0].span().merge(value.span());
        Ok(Stmt::Assign(Assign {
            targets: exprs,
            value,
            span,
        }))
    }

    fn parse_expression(&mut self) -> Result<Expr, SyntaxError> {
        let mut expr = self.parse_atom()?;
        loop {
            if self.matches(TokenKind::Dot) {
                let attr = self.expect_identifier("Expected attribute name after '.'")?;
                let span = expr.span().merge(attr.span);
                expr = Expr::Attribute(AttributeExpr {
                    value: Box::new(expr),
                    attr: attr.name,
                    span,
                });
                continue;
            }
            if self.matches(TokenKind::LParen) {
                let mut args = Vec::new();
                if !self.check(TokenKind::RParen) {
                    loop {
                        args.push(self.parse_expression()?);
                        if !self.matches(TokenKind::Comma) {
                            break;
                        }
                    }
                }
                let close = self.expect(TokenKind::RParen)?.span;
                let span = expr.span().merge(close);
                expr = Expr::Call(CallExpr {
                    func: Box::new(expr),
                    args,
                    span,
                });
                continue;
            }
            break;
        }
        Ok(expr)
    }

    fn parse_atom(&mut self) -> Result<Expr, SyntaxError> {
        match self.peek_kind() {
            Some(TokenKind::Identifier(id)) => {
                let span = self.advance().span;
                Ok(Expr::Name(NameExpr { id, span }))
            }
            Some(TokenKind::Integer(value)) => {
                let span = self.advance().span;
                Ok(Expr::Num(NumExpr {
                    value: Number::Int(value),
                    span,
                }))
            }
            Some(TokenKind::Float(value)) => {
                let span = self.advance().span;
                Ok(Expr::Num(NumExpr {
                    value: Number::Float(value),
                    span,
                }))
            }
            _ => Err(self.error_here("Expected an expression")),
        }
    }

    fn expect_identifier(&mut self, msg: &str) -> Result<Identifier, SyntaxError> {
        match self.peek_kind() {
            Some(TokenKind::Identifier(name)) => {
                let span = self.advance().span;
                Ok(Identifier { name, span })
            }
            _ => Err(self.error_here(msg)),
        }
    }

    fn expect(&mut self, kind: TokenKind) -> Result<&Token, SyntaxError> {
        if self.check(kind.clone()) {
            Ok(self.advance())
        } else {
            Err(self.error_here(&format!("Expected {:?}", kind)))
        }
    }

    fn matches(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn check(&self, kind: TokenKind) -> bool {
        matches!(self.peek_kind(), Some(tk) if tk == kind)
    }

    fn peek_kind(&self) -> Option<TokenKind> {
        self.tokens.get(self.pos).map(|t| t.kind.clone())
    }

    fn advance(&mut self) -> &Token {
        let token = self
            .tokens
            .get(self.pos)
            .unwrap_or_else(|| self.tokens.last().expect("token stream ends with Eof"));
        self.pos = (self.pos + 1).min(self.tokens.len());
        token
    }

    fn is_eof(&self) -> bool {
        matches!(self.peek_kind(), Some(TokenKind::Eof) | None)
    }

    fn error_here(&self, message: &str) -> SyntaxError {
        let span = self
            .tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map(|t| t.span)
            .unwrap_or_else(|| Span::new(0, 0));
        SyntaxError::new(message.to_string(), span)
    }

    fn report(&mut self, err: SyntaxError) {
        self.errors.push(err);
    }

    fn synchronize(&mut self) {
        while !self.is_eof() {
            if matches!(self.peek_kind(), Some(TokenKind::Newline)) {
                self.advance();
                return;
            }
            self.advance();
        }
    }
}
