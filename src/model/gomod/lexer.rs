use crate::model::ParseError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Token {
    Word(String),
    Arrow,
    OpenParen,
    CloseParen,
}

impl Token {
    pub(super) fn into_word(self) -> Option<String> {
        match self {
            Token::Word(word) => Some(word),
            _ => None,
        }
    }
}

/// A single manifest line split into tokens plus its trailing `//` comment, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct Line {
    pub number: usize,
    pub tokens: Vec<Token>,
    pub comment: Option<String>,
}

/// Splits manifest text into lines of tokens. Blank and comment-only lines are dropped.
pub(super) fn tokenize(data: &str) -> Result<Vec<Line>, ParseError> {
    let mut lines = Vec::new();
    for (index, text) in data.lines().enumerate() {
        let line = tokenize_line(text, index + 1)?;
        if !line.tokens.is_empty() {
            lines.push(line);
        }
    }
    Ok(lines)
}

fn tokenize_line(text: &str, number: usize) -> Result<Line, ParseError> {
    let mut tokens = Vec::new();
    let mut comment = None;
    let mut chars = text.char_indices().peekable();

    while let Some(&(start, c)) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '/' if text[start..].starts_with("//") => {
                comment = Some(text[start + 2..].trim().to_owned());
                break;
            }
            '(' => {
                chars.next();
                tokens.push(Token::OpenParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::CloseParen);
            }
            '=' if text[start..].starts_with("=>") => {
                chars.next();
                chars.next();
                tokens.push(Token::Arrow);
            }
            '"' => {
                chars.next();
                let mut value = String::new();
                let mut closed = false;
                while let Some((_, c)) = chars.next() {
                    match c {
                        '"' => {
                            closed = true;
                            break;
                        }
                        '\\' => match chars.next() {
                            Some((_, 'n')) => value.push('\n'),
                            Some((_, 't')) => value.push('\t'),
                            Some((_, other)) => value.push(other),
                            None => break,
                        },
                        other => value.push(other),
                    }
                }
                if !closed {
                    return Err(ParseError::UnterminatedString(number));
                }
                tokens.push(Token::Word(value));
            }
            '`' => {
                chars.next();
                let rest = &text[start + 1..];
                let end = rest
                    .find('`')
                    .ok_or(ParseError::UnterminatedString(number))?;
                tokens.push(Token::Word(rest[..end].to_owned()));
                while chars.next_if(|&(i, _)| i <= start + 1 + end).is_some() {}
            }
            _ => {
                let rest = &text[start..];
                let end = rest
                    .char_indices()
                    .find(|&(i, c)| {
                        c.is_whitespace()
                            || matches!(c, '(' | ')' | '"' | '`')
                            || rest[i..].starts_with("//")
                            || rest[i..].starts_with("=>")
                    })
                    .map(|(i, _)| i)
                    .unwrap_or(rest.len());
                tokens.push(Token::Word(rest[..end].to_owned()));
                while chars.next_if(|&(i, _)| i < start + end).is_some() {}
            }
        }
    }

    Ok(Line {
        number,
        tokens,
        comment,
    })
}
