//! Recursive-descent parser for the payoff DSL described in §4.2/§4.4.
//!
//! Grammar (informal):
//!
//! ```text
//! program    := stmt*
//! stmt       := decl | assign | if_stmt | for_stmt | require | block | expr_stmt
//! decl       := "NUMBER" ident ("[" expr "]")? ("," ident ("[" expr "]")?)* ";"
//! assign     := ident ("[" expr "]")? "=" expr ";"
//! if_stmt    := "IF" expr "THEN" stmt ("ELSE" stmt)?
//! for_stmt   := "FOR" ident "=" expr "TO" expr ("STEP" expr)? "DO" stmt
//! require    := "REQUIRE" "(" expr ")" ";"
//! block      := "{" stmt* "}"
//! expr       := or_expr
//! or_expr    := and_expr (("OR"|"||") and_expr)*
//! and_expr   := not_expr (("AND"|"&&") not_expr)*
//! not_expr   := ("NOT"|"!") not_expr | cmp_expr
//! cmp_expr   := add_expr (cmp_op add_expr)?
//! add_expr   := mul_expr (("+"|"-") mul_expr)*
//! mul_expr   := unary_expr (("*"|"/") unary_expr)*
//! unary_expr := "-" unary_expr | primary
//! primary    := number | string | ident subscript? | ident "(" args ")" | "(" expr ")"
//! ```

use std::fmt;

use super::{AssignTarget, BinOp, CapFloorBlock, CmpOp, DateIndexOp, LookbackBlock, Node,
    NodeKind, SourceLoc, SpreadBlock};

/// A lexical token with its source location.
#[derive(Debug, Clone, PartialEq)]
struct Token {
    kind: TokenKind,
    loc: SourceLoc,
}

#[derive(Debug, Clone, PartialEq)]
enum TokenKind {
    Number(f64),
    String(String),
    Ident(String),
    Symbol(char),
    Op(&'static str),
    Eof,
}

/// Parser failure: unexpected token, unexpected end of input, or lexical
/// error, always with a source location.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    /// Human-readable description.
    pub message: String,
    /// Where parsing failed.
    pub loc: SourceLoc,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.message, self.loc)
    }
}

impl std::error::Error for ParseError {}

fn lex(src: &str) -> Result<Vec<Token>, ParseError> {
    let mut tokens = Vec::new();
    let chars: Vec<char> = src.chars().collect();
    let mut i = 0usize;
    let mut line = 1u32;
    let mut col = 1u32;

    let mut advance = |i: &mut usize, line: &mut u32, col: &mut u32| {
        if chars[*i] == '\n' {
            *line += 1;
            *col = 1;
        } else {
            *col += 1;
        }
        *i += 1;
    };

    while i < chars.len() {
        let c = chars[i];
        if c.is_whitespace() {
            advance(&mut i, &mut line, &mut col);
            continue;
        }
        let start_loc = SourceLoc::new(line, col);

        if c == '/' && i + 1 < chars.len() && chars[i + 1] == '/' {
            while i < chars.len() && chars[i] != '\n' {
                advance(&mut i, &mut line, &mut col);
            }
            continue;
        }

        if c.is_ascii_digit() || (c == '.' && i + 1 < chars.len() && chars[i + 1].is_ascii_digit())
        {
            let start = i;
            while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                advance(&mut i, &mut line, &mut col);
            }
            let text: String = chars[start..i].iter().collect();
            let value = text
                .parse::<f64>()
                .map_err(|_| ParseError {
                    message: format!("invalid numeric literal '{text}'"),
                    loc: start_loc,
                })?;
            tokens.push(Token {
                kind: TokenKind::Number(value),
                loc: start_loc,
            });
            continue;
        }

        if c.is_alphabetic() || c == '_' {
            let start = i;
            while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                advance(&mut i, &mut line, &mut col);
            }
            let text: String = chars[start..i].iter().collect();
            tokens.push(Token {
                kind: TokenKind::Ident(text),
                loc: start_loc,
            });
            continue;
        }

        if c == '"' {
            advance(&mut i, &mut line, &mut col);
            let start = i;
            while i < chars.len() && chars[i] != '"' {
                advance(&mut i, &mut line, &mut col);
            }
            if i >= chars.len() {
                return Err(ParseError {
                    message: "unterminated string literal".to_string(),
                    loc: start_loc,
                });
            }
            let text: String = chars[start..i].iter().collect();
            advance(&mut i, &mut line, &mut col); // closing quote
            tokens.push(Token {
                kind: TokenKind::String(text),
                loc: start_loc,
            });
            continue;
        }

        let two: Option<&'static str> = if i + 1 < chars.len() {
            match (c, chars[i + 1]) {
                ('=', '=') => Some("=="),
                ('!', '=') => Some("!="),
                ('<', '=') => Some("<="),
                ('>', '=') => Some(">="),
                ('&', '&') => Some("&&"),
                ('|', '|') => Some("||"),
                _ => None,
            }
        } else {
            None
        };

        if let Some(op) = two {
            advance(&mut i, &mut line, &mut col);
            advance(&mut i, &mut line, &mut col);
            tokens.push(Token {
                kind: TokenKind::Op(op),
                loc: start_loc,
            });
            continue;
        }

        if "+-*/=<>!,;(){}[]".contains(c) {
            advance(&mut i, &mut line, &mut col);
            tokens.push(Token {
                kind: TokenKind::Symbol(c),
                loc: start_loc,
            });
            continue;
        }

        return Err(ParseError {
            message: format!("unexpected character '{c}'"),
            loc: start_loc,
        });
    }

    tokens.push(Token {
        kind: TokenKind::Eof,
        loc: SourceLoc::new(line, col),
    });
    Ok(tokens)
}

/// Recursive-descent parser producing a [`Node`] tree for the payoff DSL.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    /// Parse a complete script into a single (possibly `Sequence`) node.
    pub fn parse(src: &str) -> Result<Node, ParseError> {
        let tokens = lex(src)?;
        let mut parser = Parser { tokens, pos: 0 };
        let mut statements = Vec::new();
        while !parser.at_eof() {
            statements.push(parser.parse_stmt()?);
        }
        let loc = statements.first().map(|n: &Node| n.loc).unwrap_or(SourceLoc::new(1, 1));
        Ok(Node::new(NodeKind::Sequence(statements), loc))
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn loc(&self) -> SourceLoc {
        self.peek().loc
    }

    fn at_eof(&self) -> bool {
        matches!(self.peek().kind, TokenKind::Eof)
    }

    fn advance(&mut self) -> Token {
        let tok = self.tokens[self.pos].clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn expect_symbol(&mut self, c: char) -> Result<(), ParseError> {
        match &self.peek().kind {
            TokenKind::Symbol(s) if *s == c => {
                self.advance();
                Ok(())
            }
            _ => Err(ParseError {
                message: format!("expected '{c}'"),
                loc: self.loc(),
            }),
        }
    }

    fn eat_symbol(&mut self, c: char) -> bool {
        if matches!(&self.peek().kind, TokenKind::Symbol(s) if *s == c) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn peek_ident_keyword(&self, keyword: &str) -> bool {
        matches!(&self.peek().kind, TokenKind::Ident(s) if s.eq_ignore_ascii_case(keyword))
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        if self.peek_ident_keyword(keyword) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect_keyword(&mut self, keyword: &str) -> Result<(), ParseError> {
        if self.eat_keyword(keyword) {
            Ok(())
        } else {
            Err(ParseError {
                message: format!("expected '{keyword}'"),
                loc: self.loc(),
            })
        }
    }

    fn expect_ident(&mut self) -> Result<String, ParseError> {
        match self.advance().kind {
            TokenKind::Ident(name) => Ok(name),
            other => Err(ParseError {
                message: format!("expected identifier, found {other:?}"),
                loc: self.loc(),
            }),
        }
    }

    fn parse_stmt(&mut self) -> Result<Node, ParseError> {
        let loc = self.loc();
        if self.eat_symbol('{') {
            let mut statements = Vec::new();
            while !self.eat_symbol('}') {
                statements.push(self.parse_stmt()?);
            }
            return Ok(Node::new(NodeKind::Sequence(statements), loc));
        }
        if self.peek_ident_keyword("NUMBER") {
            return self.parse_declaration();
        }
        if self.peek_ident_keyword("IF") {
            return self.parse_if();
        }
        if self.peek_ident_keyword("FOR") {
            return self.parse_for();
        }
        if self.peek_ident_keyword("REQUIRE") {
            self.advance();
            self.expect_symbol('(')?;
            let cond = self.parse_expr()?;
            self.expect_symbol(')')?;
            self.eat_symbol(';');
            return Ok(Node::new(NodeKind::Require(Box::new(cond)), loc));
        }
        // assignment or bare expression statement
        if let TokenKind::Ident(name) = self.peek().kind.clone() {
            let save = self.pos;
            self.advance();
            let index = if self.eat_symbol('[') {
                let idx = self.parse_expr()?;
                self.expect_symbol(']')?;
                Some(idx)
            } else {
                None
            };
            if self.eat_symbol('=') && !matches!(self.peek().kind, TokenKind::Op("==")) {
                let rhs = self.parse_expr()?;
                self.eat_symbol(';');
                let target = match index {
                    Some(idx) => AssignTarget::Element(name, Box::new(idx)),
                    None => AssignTarget::Scalar(name),
                };
                return Ok(Node::new(NodeKind::Assign(target, Box::new(rhs)), loc));
            }
            self.pos = save;
        }
        let expr = self.parse_expr()?;
        self.eat_symbol(';');
        Ok(expr)
    }

    fn parse_declaration(&mut self) -> Result<Node, ParseError> {
        let loc = self.loc();
        self.advance(); // NUMBER
        let mut decls = Vec::new();
        loop {
            let name = self.expect_ident()?;
            let ident_loc = self.loc();
            let size = if self.eat_symbol('[') {
                let size_expr = self.parse_expr()?;
                self.expect_symbol(']')?;
                Some(Box::new(size_expr))
            } else {
                None
            };
            decls.push(Node::new(NodeKind::Declare(name, size), ident_loc));
            if !self.eat_symbol(',') {
                break;
            }
        }
        self.eat_symbol(';');
        if decls.len() == 1 {
            Ok(decls.into_iter().next().unwrap())
        } else {
            Ok(Node::new(NodeKind::Sequence(decls), loc))
        }
    }

    fn parse_if(&mut self) -> Result<Node, ParseError> {
        let loc = self.loc();
        self.advance(); // IF
        let cond = self.parse_expr()?;
        self.expect_keyword("THEN")?;
        let then_branch = self.parse_stmt()?;
        let else_branch = if self.eat_keyword("ELSE") {
            Some(Box::new(self.parse_stmt()?))
        } else {
            None
        };
        Ok(Node::new(
            NodeKind::If(Box::new(cond), Box::new(then_branch), else_branch),
            loc,
        ))
    }

    fn parse_for(&mut self) -> Result<Node, ParseError> {
        let loc = self.loc();
        self.advance(); // FOR
        let var = self.expect_ident()?;
        self.expect_symbol('=')?;
        let from = self.parse_expr()?;
        self.expect_keyword("TO")?;
        let to = self.parse_expr()?;
        let step = if self.eat_keyword("STEP") {
            self.parse_expr()?
        } else {
            Node::new(NodeKind::Number(1.0), loc)
        };
        self.expect_keyword("DO")?;
        let body = self.parse_stmt()?;
        Ok(Node::new(
            NodeKind::For {
                var,
                from: Box::new(from),
                to: Box::new(to),
                step: Box::new(step),
                body: Box::new(body),
            },
            loc,
        ))
    }

    fn parse_expr(&mut self) -> Result<Node, ParseError> {
        self.parse_or()
    }

    fn parse_or(&mut self) -> Result<Node, ParseError> {
        let loc = self.loc();
        let mut lhs = self.parse_and()?;
        loop {
            if self.eat_keyword("OR") {
                let rhs = self.parse_and()?;
                lhs = Node::new(NodeKind::Or(Box::new(lhs), Box::new(rhs)), loc);
            } else if matches!(self.peek().kind, TokenKind::Op("||")) {
                self.advance();
                let rhs = self.parse_and()?;
                lhs = Node::new(NodeKind::Or(Box::new(lhs), Box::new(rhs)), loc);
            } else {
                break;
            }
        }
        Ok(lhs)
    }

    fn parse_and(&mut self) -> Result<Node, ParseError> {
        let loc = self.loc();
        let mut lhs = self.parse_not()?;
        loop {
            if self.eat_keyword("AND") {
                let rhs = self.parse_not()?;
                lhs = Node::new(NodeKind::And(Box::new(lhs), Box::new(rhs)), loc);
            } else if matches!(self.peek().kind, TokenKind::Op("&&")) {
                self.advance();
                let rhs = self.parse_not()?;
                lhs = Node::new(NodeKind::And(Box::new(lhs), Box::new(rhs)), loc);
            } else {
                break;
            }
        }
        Ok(lhs)
    }

    fn parse_not(&mut self) -> Result<Node, ParseError> {
        let loc = self.loc();
        if self.eat_keyword("NOT") || self.eat_symbol('!') {
            let operand = self.parse_not()?;
            return Ok(Node::new(NodeKind::NotOp(Box::new(operand)), loc));
        }
        self.parse_compare()
    }

    fn parse_compare(&mut self) -> Result<Node, ParseError> {
        let loc = self.loc();
        let lhs = self.parse_add()?;
        let op = match &self.peek().kind {
            TokenKind::Op("==") => Some(CmpOp::Eq),
            TokenKind::Op("!=") => Some(CmpOp::Ne),
            TokenKind::Op("<=") => Some(CmpOp::Le),
            TokenKind::Op(">=") => Some(CmpOp::Ge),
            TokenKind::Symbol('<') => Some(CmpOp::Lt),
            TokenKind::Symbol('>') => Some(CmpOp::Gt),
            _ => None,
        };
        if let Some(op) = op {
            self.advance();
            let rhs = self.parse_add()?;
            return Ok(Node::new(NodeKind::Compare(op, Box::new(lhs), Box::new(rhs)), loc));
        }
        Ok(lhs)
    }

    fn parse_add(&mut self) -> Result<Node, ParseError> {
        let loc = self.loc();
        let mut lhs = self.parse_mul()?;
        loop {
            let op = match &self.peek().kind {
                TokenKind::Symbol('+') => BinOp::Add,
                TokenKind::Symbol('-') => BinOp::Sub,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_mul()?;
            lhs = Node::new(NodeKind::Binary(op, Box::new(lhs), Box::new(rhs)), loc);
        }
        Ok(lhs)
    }

    fn parse_mul(&mut self) -> Result<Node, ParseError> {
        let loc = self.loc();
        let mut lhs = self.parse_unary()?;
        loop {
            let op = match &self.peek().kind {
                TokenKind::Symbol('*') => BinOp::Mul,
                TokenKind::Symbol('/') => BinOp::Div,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_unary()?;
            lhs = Node::new(NodeKind::Binary(op, Box::new(lhs), Box::new(rhs)), loc);
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> Result<Node, ParseError> {
        let loc = self.loc();
        if self.eat_symbol('-') {
            let operand = self.parse_unary()?;
            return Ok(Node::new(NodeKind::Negate(Box::new(operand)), loc));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Node, ParseError> {
        let loc = self.loc();
        match self.advance().kind {
            TokenKind::Number(v) => Ok(Node::new(NodeKind::Number(v), loc)),
            TokenKind::String(s) => Ok(Node::new(NodeKind::StringLit(s), loc)),
            TokenKind::Symbol('(') => {
                let e = self.parse_expr()?;
                self.expect_symbol(')')?;
                Ok(e)
            }
            TokenKind::Ident(name) => {
                if self.eat_symbol('(') {
                    return self.parse_function_call(name, loc);
                }
                if self.eat_symbol('[') {
                    let index = self.parse_expr()?;
                    self.expect_symbol(']')?;
                    return Ok(Node::new(NodeKind::Subscript(name, Box::new(index)), loc));
                }
                Ok(Node::new(NodeKind::Ident(name), loc))
            }
            other => Err(ParseError {
                message: format!("unexpected token {other:?}"),
                loc,
            }),
        }
    }

    fn parse_array_name(&mut self) -> Result<String, ParseError> {
        self.expect_ident()
    }

    fn parse_call_args(&mut self) -> Result<Vec<Node>, ParseError> {
        let mut args = Vec::new();
        if self.eat_symbol(')') {
            return Ok(args);
        }
        loop {
            args.push(self.parse_expr()?);
            if self.eat_symbol(',') {
                continue;
            }
            self.expect_symbol(')')?;
            break;
        }
        Ok(args)
    }

    fn parse_function_call(&mut self, name: String, loc: SourceLoc) -> Result<Node, ParseError> {
        let lower = name.to_ascii_lowercase();
        match lower.as_str() {
            "size" => {
                let arr = self.parse_array_name()?;
                self.expect_symbol(')')?;
                Ok(Node::new(NodeKind::Size(arr), loc))
            }
            "dateindex" => {
                let event = self.parse_expr()?;
                self.expect_symbol(',')?;
                let arr = self.parse_array_name()?;
                self.expect_symbol(',')?;
                let op_name = self.expect_ident()?;
                let op = match op_name.to_ascii_uppercase().as_str() {
                    "EQ" => DateIndexOp::Eq,
                    "GEQ" => DateIndexOp::Geq,
                    "GT" => DateIndexOp::Gt,
                    _ => {
                        return Err(ParseError {
                            message: format!("unknown DATEINDEX operator '{op_name}'"),
                            loc,
                        })
                    }
                };
                self.expect_symbol(')')?;
                Ok(Node::new(NodeKind::DateIndex(Box::new(event), arr, op), loc))
            }
            "sort" | "permute" => {
                let x = self.parse_array_name()?;
                let y = if self.eat_symbol(',') {
                    Some(self.parse_array_name()?)
                } else {
                    None
                };
                let p = if self.eat_symbol(',') {
                    Some(self.parse_array_name()?)
                } else {
                    None
                };
                self.expect_symbol(')')?;
                Ok(Node::new(
                    if lower == "sort" {
                        NodeKind::Sort(x, y, p)
                    } else {
                        NodeKind::Permute(x, y, p)
                    },
                    loc,
                ))
            }
            "black" => {
                let args = self.parse_call_args()?;
                if args.len() != 6 {
                    return Err(arity_error("black", 6, args.len(), loc));
                }
                let mut it = args.into_iter();
                Ok(Node::new(
                    NodeKind::Black {
                        cp: Box::new(it.next().unwrap()),
                        obs: Box::new(it.next().unwrap()),
                        expiry: Box::new(it.next().unwrap()),
                        strike: Box::new(it.next().unwrap()),
                        forward: Box::new(it.next().unwrap()),
                        vol: Box::new(it.next().unwrap()),
                    },
                    loc,
                ))
            }
            "pay" => {
                let args = self.parse_call_args()?;
                if args.len() != 4 {
                    return Err(arity_error("pay", 4, args.len(), loc));
                }
                let mut it = args.into_iter();
                Ok(Node::new(
                    NodeKind::Pay {
                        amount: Box::new(it.next().unwrap()),
                        obs: Box::new(it.next().unwrap()),
                        pay: Box::new(it.next().unwrap()),
                        ccy: Box::new(it.next().unwrap()),
                    },
                    loc,
                ))
            }
            "logpay" => {
                let mut args = self.parse_call_args()?;
                if args.len() < 4 || args.len() > 7 {
                    return Err(arity_error("logpay", 4, args.len(), loc));
                }
                let amount = Box::new(args.remove(0));
                let obs = Box::new(args.remove(0));
                let pay = Box::new(args.remove(0));
                let ccy = Box::new(args.remove(0));
                let mut rest = args.into_iter();
                Ok(Node::new(
                    NodeKind::LogPay {
                        amount,
                        obs,
                        pay,
                        ccy,
                        leg_no: rest.next().map(Box::new),
                        cashflow_type: rest.next().map(Box::new),
                        slot: rest.next().map(Box::new),
                    },
                    loc,
                ))
            }
            "npv" => {
                let mut args = self.parse_call_args()?;
                if args.is_empty() || args.len() > 5 {
                    return Err(arity_error("npv", 2, args.len(), loc));
                }
                let amount = Box::new(args.remove(0));
                let obs = Box::new(args.remove(0));
                let mut rest = args.into_iter();
                Ok(Node::new(
                    NodeKind::Npv {
                        amount,
                        obs,
                        regression_filter: rest.next().map(Box::new),
                        add_regressor_1: rest.next().map(Box::new),
                        add_regressor_2: rest.next().map(Box::new),
                    },
                    loc,
                ))
            }
            "npvmem" => {
                let mut args = self.parse_call_args()?;
                if args.len() < 3 {
                    return Err(arity_error("npvmem", 3, args.len(), loc));
                }
                let amount = Box::new(args.remove(0));
                let obs = Box::new(args.remove(0));
                let mem_slot = Box::new(args.remove(0));
                let mut rest = args.into_iter();
                Ok(Node::new(
                    NodeKind::NpvMem {
                        amount,
                        obs,
                        mem_slot,
                        regression_filter: rest.next().map(Box::new),
                        add_regressor_1: rest.next().map(Box::new),
                        add_regressor_2: rest.next().map(Box::new),
                    },
                    loc,
                ))
            }
            "histfixing" => {
                let args = self.parse_call_args()?;
                if args.len() != 2 {
                    return Err(arity_error("histfixing", 2, args.len(), loc));
                }
                let mut it = args.into_iter();
                Ok(Node::new(
                    NodeKind::HistFixing(Box::new(it.next().unwrap()), Box::new(it.next().unwrap())),
                    loc,
                ))
            }
            "discount" => {
                let args = self.parse_call_args()?;
                if args.len() != 3 {
                    return Err(arity_error("discount", 3, args.len(), loc));
                }
                let mut it = args.into_iter();
                Ok(Node::new(
                    NodeKind::Discount(
                        Box::new(it.next().unwrap()),
                        Box::new(it.next().unwrap()),
                        Box::new(it.next().unwrap()),
                    ),
                    loc,
                ))
            }
            "fwdcomp" | "fwdavg" => {
                let mut args = self.parse_call_args()?;
                if args.len() < 4 {
                    return Err(arity_error(&lower, 4, args.len(), loc));
                }
                let index = Box::new(args.remove(0));
                let obs = Box::new(args.remove(0));
                let start = Box::new(args.remove(0));
                let end = Box::new(args.remove(0));
                let spread = if args.len() >= 2 {
                    Some(SpreadBlock {
                        spread: Box::new(args.remove(0)),
                        gearing: Box::new(args.remove(0)),
                    })
                } else {
                    None
                };
                let lookback = if args.len() >= 4 {
                    Some(LookbackBlock {
                        lookback: Box::new(args.remove(0)),
                        rate_cutoff: Box::new(args.remove(0)),
                        fixing_days: Box::new(args.remove(0)),
                        include_spread: Box::new(args.remove(0)),
                    })
                } else {
                    None
                };
                let cap_floor = if args.len() >= 4 {
                    Some(CapFloorBlock {
                        cap: Box::new(args.remove(0)),
                        floor: Box::new(args.remove(0)),
                        naked_option: Box::new(args.remove(0)),
                        local_cap_floor: Box::new(args.remove(0)),
                    })
                } else {
                    None
                };
                Ok(Node::new(
                    NodeKind::FwdCompAvg {
                        is_average: lower == "fwdavg",
                        index,
                        obs,
                        start,
                        end,
                        spread,
                        lookback,
                        cap_floor,
                    },
                    loc,
                ))
            }
            "aboveprob" | "belowprob" => {
                let args = self.parse_call_args()?;
                if args.len() != 4 {
                    return Err(arity_error(&lower, 4, args.len(), loc));
                }
                let mut it = args.into_iter();
                Ok(Node::new(
                    NodeKind::BarrierProb {
                        above: lower == "aboveprob",
                        index: Box::new(it.next().unwrap()),
                        obs1: Box::new(it.next().unwrap()),
                        obs2: Box::new(it.next().unwrap()),
                        barrier: Box::new(it.next().unwrap()),
                    },
                    loc,
                ))
            }
            "indexeval" => {
                let mut args = self.parse_call_args()?;
                if args.is_empty() || args.len() > 3 {
                    return Err(arity_error("indexEval", 2, args.len(), loc));
                }
                let index = Box::new(args.remove(0));
                let obs = Box::new(args.remove(0));
                let fwd = if !args.is_empty() {
                    Some(Box::new(args.remove(0)))
                } else {
                    None
                };
                Ok(Node::new(NodeKind::IndexEval { index, obs, fwd }, loc))
            }
            _ => Err(ParseError {
                message: format!("unknown function '{name}'"),
                loc,
            }),
        }
    }
}

fn arity_error(name: &str, expected: usize, got: usize, loc: SourceLoc) -> ParseError {
    ParseError {
        message: format!("'{name}' expects at least {expected} argument(s), found {got}"),
        loc,
    }
}
