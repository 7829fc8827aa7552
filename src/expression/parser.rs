//! Tokenizer and recursive-descent parser for hill expressions
//!
//! Grammar, lowest precedence first:
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := factor (('*' | '/') factor)*
//! factor  := '-' factor | primary ('^' factor)?     right associative
//! primary := number | 'x' | 'pi' | 'H' | 'L'
//!          | ('sin' | 'cos' | 'sqrt') factor
//!          | '(' expr ')'
//! ```
//!
//! A function takes a whole factor, so `sin x^2` and `sin(x)^2` are both
//! `sin(x^2)`. Unary minus sits above `^`: `-x^2` is `-(x^2)`.

use super::{BinaryOp, ExprError, Function, Node, Param};

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    LParen,
    RParen,
}

#[derive(Debug, Clone)]
struct Spanned {
    token: Token,
    pos: usize, // byte offset into the source
}

fn tokenize(src: &str) -> Result<Vec<Spanned>, ExprError> {
    let mut tokens = Vec::new();
    let mut chars = src.char_indices().peekable();

    while let Some(&(pos, c)) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        let token = if c.is_ascii_digit() || c == '.' {
            let mut end = pos;
            while let Some(&(i, d)) = chars.peek() {
                if d.is_ascii_digit() || d == '.' {
                    end = i + d.len_utf8();
                    chars.next();
                } else {
                    break;
                }
            }
            let text = &src[pos..end];
            let value = text
                .parse::<f64>()
                .map_err(|_| ExprError::parse(pos, format!("malformed number `{text}`")))?;
            Token::Number(value)
        } else if c.is_ascii_alphabetic() {
            let mut end = pos;
            while let Some(&(i, d)) = chars.peek() {
                if d.is_ascii_alphabetic() {
                    end = i + d.len_utf8();
                    chars.next();
                } else {
                    break;
                }
            }
            Token::Ident(src[pos..end].to_string())
        } else {
            chars.next();
            match c {
                '+' => Token::Plus,
                '-' => Token::Minus,
                '*' => Token::Star,
                '/' => Token::Slash,
                '^' => Token::Caret,
                '(' => Token::LParen,
                ')' => Token::RParen,
                other => return Err(ExprError::parse(pos, format!("unexpected character `{other}`"))),
            }
        };

        tokens.push(Spanned { token, pos });
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<Spanned>,
    next: usize,
    end: usize, // source length, reported for errors at end of input
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.next).map(|s| &s.token)
    }

    fn pos(&self) -> usize {
        self.tokens.get(self.next).map_or(self.end, |s| s.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.next).map(|s| s.token.clone());
        if token.is_some() {
            self.next += 1;
        }
        token
    }

    fn expr(&mut self) -> Result<Node, ExprError> {
        let mut lhs = self.term()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => return Ok(lhs),
            };
            self.advance();
            let rhs = self.term()?;
            lhs = Node::Binary(op, Box::new(lhs), Box::new(rhs));
        }
    }

    fn term(&mut self) -> Result<Node, ExprError> {
        let mut lhs = self.factor()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinaryOp::Mul,
                Some(Token::Slash) => BinaryOp::Div,
                _ => return Ok(lhs),
            };
            self.advance();
            let rhs = self.factor()?;
            lhs = Node::Binary(op, Box::new(lhs), Box::new(rhs));
        }
    }

    fn factor(&mut self) -> Result<Node, ExprError> {
        if self.peek() == Some(&Token::Minus) {
            self.advance();
            let operand = self.factor()?;
            return Ok(Node::Neg(Box::new(operand)));
        }

        let base = self.primary()?;
        if self.peek() == Some(&Token::Caret) {
            self.advance();
            // recursing through `factor` makes `^` right associative
            let exponent = self.factor()?;
            return Ok(Node::Binary(BinaryOp::Pow, Box::new(base), Box::new(exponent)));
        }
        Ok(base)
    }

    fn primary(&mut self) -> Result<Node, ExprError> {
        let pos = self.pos();
        match self.advance() {
            Some(Token::Number(value)) => Ok(Node::Number(value)),
            Some(Token::LParen) => {
                let inner = self.expr()?;
                match self.advance() {
                    Some(Token::RParen) => Ok(inner),
                    _ => Err(ExprError::parse(pos, "mismatched parentheses")),
                }
            }
            Some(Token::Ident(name)) => match name.as_str() {
                "x" => Ok(Node::X),
                "pi" => Ok(Node::Pi),
                "H" => Ok(Node::Param(Param::Height)),
                "L" => Ok(Node::Param(Param::Length)),
                "sin" => self.call(Function::Sin),
                "cos" => self.call(Function::Cos),
                "sqrt" => self.call(Function::Sqrt),
                _ => Err(ExprError::parse(pos, format!("unknown identifier `{name}`"))),
            },
            Some(Token::RParen) => Err(ExprError::parse(pos, "mismatched parentheses")),
            Some(_) => Err(ExprError::parse(pos, "expected a value")),
            None => Err(ExprError::parse(pos, "unexpected end of expression")),
        }
    }

    fn call(&mut self, function: Function) -> Result<Node, ExprError> {
        let argument = self.factor()?;
        Ok(Node::Call(function, Box::new(argument)))
    }
}

/// Parse `src` into an expression tree, rejecting trailing input
pub(super) fn parse(src: &str) -> Result<Node, ExprError> {
    let tokens = tokenize(src)?;
    if tokens.is_empty() {
        return Err(ExprError::parse(0, "empty expression"));
    }

    let mut parser = Parser {
        tokens,
        next: 0,
        end: src.len(),
    };
    let node = parser.expr()?;

    match parser.peek() {
        None => Ok(node),
        Some(Token::RParen) => Err(ExprError::parse(parser.pos(), "mismatched parentheses")),
        Some(_) => Err(ExprError::parse(parser.pos(), "unexpected trailing input")),
    }
}
