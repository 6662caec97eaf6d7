use crate::error::ExpressionError;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Number(f64),
    Str(String),
    Ident(String),
    True,
    False,
    Null,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
    Dot,
    Question,
    Colon,
    Plus,
    Minus,
    Star,
    Slash,
    Bang,
    BangEq,
    EqEq,
    Lt,
    Le,
    Gt,
    Ge,
    AndAnd,
    OrOr,
}

impl Token {
    /// Short display form for error messages.
    pub fn describe(&self) -> String {
        match self {
            Token::Number(n) => n.to_string(),
            Token::Str(s) => format!("'{s}'"),
            Token::Ident(name) => name.clone(),
            Token::True => "true".to_string(),
            Token::False => "false".to_string(),
            Token::Null => "null".to_string(),
            Token::LParen => "(".to_string(),
            Token::RParen => ")".to_string(),
            Token::LBracket => "[".to_string(),
            Token::RBracket => "]".to_string(),
            Token::Comma => ",".to_string(),
            Token::Dot => ".".to_string(),
            Token::Question => "?".to_string(),
            Token::Colon => ":".to_string(),
            Token::Plus => "+".to_string(),
            Token::Minus => "-".to_string(),
            Token::Star => "*".to_string(),
            Token::Slash => "/".to_string(),
            Token::Bang => "!".to_string(),
            Token::BangEq => "!=".to_string(),
            Token::EqEq => "==".to_string(),
            Token::Lt => "<".to_string(),
            Token::Le => "<=".to_string(),
            Token::Gt => ">".to_string(),
            Token::Ge => ">=".to_string(),
            Token::AndAnd => "&&".to_string(),
            Token::OrOr => "||".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    pub token: Token,
    /// Byte offset of the token start in the source expression.
    pub at: usize,
}

pub fn tokenize(source: &str) -> Result<Vec<Spanned>, ExpressionError> {
    let mut tokens = Vec::new();
    let bytes = source.as_bytes();
    let mut chars = source.char_indices().peekable();

    while let Some((at, ch)) = chars.next() {
        let token = match ch {
            c if c.is_whitespace() => continue,
            '(' => Token::LParen,
            ')' => Token::RParen,
            '[' => Token::LBracket,
            ']' => Token::RBracket,
            ',' => Token::Comma,
            '?' => Token::Question,
            ':' => Token::Colon,
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' => Token::Star,
            '/' => Token::Slash,
            '.' => {
                // A dot immediately followed by a digit starts a number.
                if chars.peek().is_some_and(|(_, c)| c.is_ascii_digit()) {
                    lex_number(source, bytes, at, &mut chars)?
                } else {
                    Token::Dot
                }
            }
            '!' => {
                if chars.peek().is_some_and(|(_, c)| *c == '=') {
                    chars.next();
                    Token::BangEq
                } else {
                    Token::Bang
                }
            }
            '=' => {
                if chars.peek().is_some_and(|(_, c)| *c == '=') {
                    chars.next();
                    Token::EqEq
                } else {
                    return Err(ExpressionError::UnexpectedChar { ch, at });
                }
            }
            '<' => {
                if chars.peek().is_some_and(|(_, c)| *c == '=') {
                    chars.next();
                    Token::Le
                } else {
                    Token::Lt
                }
            }
            '>' => {
                if chars.peek().is_some_and(|(_, c)| *c == '=') {
                    chars.next();
                    Token::Ge
                } else {
                    Token::Gt
                }
            }
            '&' => {
                if chars.peek().is_some_and(|(_, c)| *c == '&') {
                    chars.next();
                    Token::AndAnd
                } else {
                    return Err(ExpressionError::UnexpectedChar { ch, at });
                }
            }
            '|' => {
                if chars.peek().is_some_and(|(_, c)| *c == '|') {
                    chars.next();
                    Token::OrOr
                } else {
                    return Err(ExpressionError::UnexpectedChar { ch, at });
                }
            }
            '\'' | '"' => lex_string(at, ch, &mut chars)?,
            c if c.is_ascii_digit() => lex_number(source, bytes, at, &mut chars)?,
            c if c.is_alphabetic() || c == '_' => {
                let mut end = at + c.len_utf8();
                while let Some((idx, c)) = chars.peek().copied() {
                    if c.is_alphanumeric() || c == '_' {
                        end = idx + c.len_utf8();
                        chars.next();
                    } else {
                        break;
                    }
                }
                match &source[at..end] {
                    "true" => Token::True,
                    "false" => Token::False,
                    "null" => Token::Null,
                    ident => Token::Ident(ident.to_string()),
                }
            }
            _ => return Err(ExpressionError::UnexpectedChar { ch, at }),
        };
        tokens.push(Spanned { token, at });
    }

    Ok(tokens)
}

fn lex_number(
    source: &str,
    bytes: &[u8],
    start: usize,
    chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>,
) -> Result<Token, ExpressionError> {
    let mut end = start + 1;
    let mut seen_dot = bytes[start] == b'.';
    while let Some((idx, c)) = chars.peek().copied() {
        if c.is_ascii_digit() || (c == '.' && !seen_dot) {
            seen_dot |= c == '.';
            end = idx + 1;
            chars.next();
        } else {
            break;
        }
    }
    let text = &source[start..end];
    text.parse::<f64>()
        .map(Token::Number)
        .map_err(|_| ExpressionError::InvalidNumber {
            text: text.to_string(),
            at: start,
        })
}

fn lex_string(
    start: usize,
    quote: char,
    chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>,
) -> Result<Token, ExpressionError> {
    let mut text = String::new();
    while let Some((_, c)) = chars.next() {
        match c {
            c if c == quote => return Ok(Token::Str(text)),
            '\\' => match chars.next() {
                Some((_, 'n')) => text.push('\n'),
                Some((_, 't')) => text.push('\t'),
                Some((_, escaped)) => text.push(escaped),
                None => break,
            },
            other => text.push(other),
        }
    }
    Err(ExpressionError::UnterminatedString { at: start })
}
