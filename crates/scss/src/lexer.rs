//! Lexer for SCSS source text.
//!
//! Converts input text into a lazy stream of [`Token`]s. The stream always
//! ends with a single [`TokenKind::EndOfInput`] token. The first lexical
//! error is yielded in place of a token and ends the stream.

use crate::error::{CompileError, Result, Span};
use nom::{
    IResult,
    branch::alt,
    bytes::complete::{tag, tag_no_case, take_while, take_while1},
    character::complete::{char, digit1, satisfy},
    combinator::{opt, recognize},
    sequence::{pair, tuple},
};

/// The kind of a lexical token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
    /// `color`, `-webkit-box`, `--custom`
    Identifier,
    /// `$name`
    Variable,
    /// `@media`, `@include`
    AtKeyword,
    /// `#fff`, `#main`
    Hash,
    /// `#{`
    InterpolationStart,
    /// `"text"` or `'text'`, quotes included in the token text
    String,
    /// `url(unquoted/path.png)`
    Url,
    /// `10`, `1.5em`, `50%`
    Number,
    /// `+ - * / % == != < > <= >= = ! ^= $= *= ~= |=`
    Operator,
    /// `{ } ( ) [ ] ; : , . & ~ |`
    Punctuation,
    /// `/* block */` or `// line`
    Comment,
    EndOfInput,
}

/// A token produced by the lexer.
///
/// `text` is the raw source slice. `ws_before` records whether whitespace or
/// a comment separated this token from the previous one.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub span: Span,
    pub ws_before: bool,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, span: Span, ws_before: bool) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
            ws_before,
        }
    }

    pub fn is_punct(&self, text: &str) -> bool {
        self.kind == TokenKind::Punctuation && self.text == text
    }

    pub fn is_op(&self, text: &str) -> bool {
        self.kind == TokenKind::Operator && self.text == text
    }

    pub fn is_ident(&self, text: &str) -> bool {
        self.kind == TokenKind::Identifier && self.text == text
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::EndOfInput
    }

    pub fn is_block_comment(&self) -> bool {
        self.kind == TokenKind::Comment && self.text.starts_with("/*")
    }

    /// The name carried by a sigil token (`$name`, `@name`, `#name`).
    pub fn name(&self) -> &str {
        match self.kind {
            TokenKind::Variable | TokenKind::AtKeyword | TokenKind::Hash => &self.text[1..],
            _ => &self.text,
        }
    }

    /// The contents and quote character of a string token.
    pub fn unquoted(&self) -> (&str, Option<char>) {
        match self.kind {
            TokenKind::String if self.text.len() >= 2 => {
                let quote = self.text.chars().next();
                (&self.text[1..self.text.len() - 1], quote)
            }
            _ => (&self.text, None),
        }
    }
}

const OPERATORS: [&str; 18] = [
    "==", "!=", "<=", ">=", "^=", "$=", "*=", "~=", "|=", "+", "-", "*", "/", "%", "<", ">", "=",
    "!",
];

const PUNCTUATION: [char; 13] = ['{', '}', '(', ')', '[', ']', ';', ':', ',', '.', '&', '~', '|'];

/// Lexer for SCSS text.
///
/// # Examples
///
/// ```
/// use scss::lexer::{Lexer, TokenKind};
///
/// let kinds: Vec<_> = Lexer::new("a { color: $c; }")
///     .map(|t| t.unwrap().kind)
///     .collect();
/// assert_eq!(kinds.first(), Some(&TokenKind::Identifier));
/// assert_eq!(kinds.last(), Some(&TokenKind::EndOfInput));
/// ```
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    line: usize,
    column: usize,
    after_comment: bool,
    done: bool,
}

/// Starts lexing `source`.
pub fn tokenize(source: &str) -> Lexer<'_> {
    Lexer::new(source)
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self::with_origin(input, Span::start())
    }

    /// Lexes a fragment whose first character sits at `origin` in a larger source.
    pub fn with_origin(input: &'a str, origin: Span) -> Self {
        Self {
            input,
            pos: 0,
            line: origin.line,
            column: origin.column,
            after_comment: false,
            done: false,
        }
    }

    fn remaining(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn span(&self) -> Span {
        Span::new(self.line, self.column)
    }

    /// Consume `len` bytes, keeping line and column in step.
    fn bump(&mut self, len: usize) -> &'a str {
        let text = &self.input[self.pos..self.pos + len];
        for c in text.chars() {
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.pos += len;
        text
    }

    fn skip_whitespace(&mut self) -> bool {
        let len = self
            .remaining()
            .find(|c: char| !c.is_whitespace())
            .unwrap_or(self.remaining().len());
        self.bump(len);
        len > 0
    }

    fn emit(&mut self, kind: TokenKind, len: usize, span: Span, ws_before: bool) -> Token {
        let text = self.bump(len);
        Token::new(kind, text, span, ws_before)
    }

    fn lex_token(&mut self, ws_before: bool) -> Result<Token> {
        let rest = self.remaining();
        let span = self.span();

        if rest.starts_with("/*") {
            let len = rest[2..]
                .find("*/")
                .map(|end| end + 4)
                .ok_or_else(|| CompileError::lex("unterminated comment", span))?;
            return Ok(self.emit(TokenKind::Comment, len, span, ws_before));
        }
        if rest.starts_with("//") {
            let len = rest.find('\n').unwrap_or(rest.len());
            return Ok(self.emit(TokenKind::Comment, len, span, ws_before));
        }

        let Some(c) = rest.chars().next() else {
            return Ok(Token::new(TokenKind::EndOfInput, "", span, ws_before));
        };

        if c == '"' || c == '\'' {
            let len = string_len(rest, c).ok_or_else(|| {
                CompileError::lex(format!("unterminated string starting with {c}"), span)
            })?;
            return Ok(self.emit(TokenKind::String, len, span, ws_before));
        }

        if let Some(len) = url_len(rest) {
            let len = len.ok_or_else(|| CompileError::lex("unterminated url()", span))?;
            return Ok(self.emit(TokenKind::Url, len, span, ws_before));
        }

        if let Ok((after, _)) = number(rest) {
            return Ok(self.emit(TokenKind::Number, rest.len() - after.len(), span, ws_before));
        }

        if let Ok((after, _)) = identifier(rest) {
            return Ok(self.emit(TokenKind::Identifier, rest.len() - after.len(), span, ws_before));
        }

        if let Some(op) = OPERATORS.iter().find(|op| rest.starts_with(**op)) {
            return Ok(self.emit(TokenKind::Operator, op.len(), span, ws_before));
        }

        match c {
            '$' => {
                let (after, _) = variable(rest).map_err(|_| {
                    CompileError::lex("expected a variable name after '$'", span)
                })?;
                Ok(self.emit(TokenKind::Variable, rest.len() - after.len(), span, ws_before))
            }
            '@' => {
                let (after, _) = at_keyword(rest).map_err(|_| {
                    CompileError::lex("expected a directive name after '@'", span)
                })?;
                Ok(self.emit(TokenKind::AtKeyword, rest.len() - after.len(), span, ws_before))
            }
            '#' => {
                if rest.starts_with("#{") {
                    return Ok(self.emit(TokenKind::InterpolationStart, 2, span, ws_before));
                }
                let (after, _) = hash(rest)
                    .map_err(|_| CompileError::lex("expected a name after '#'", span))?;
                Ok(self.emit(TokenKind::Hash, rest.len() - after.len(), span, ws_before))
            }
            c if PUNCTUATION.contains(&c) => {
                Ok(self.emit(TokenKind::Punctuation, c.len_utf8(), span, ws_before))
            }
            c => Err(CompileError::lex(format!("invalid character '{c}'"), span)),
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let ws_before = self.skip_whitespace() || self.after_comment;
        if self.pos >= self.input.len() {
            self.done = true;
            return Some(Ok(Token::new(
                TokenKind::EndOfInput,
                "",
                self.span(),
                ws_before,
            )));
        }

        let result = self.lex_token(ws_before);
        match &result {
            Ok(token) => self.after_comment = token.kind == TokenKind::Comment,
            Err(_) => self.done = true,
        }
        Some(result)
    }
}

fn is_name_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || !c.is_ascii()
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_' || !c.is_ascii()
}

/// Parses an identifier: `name`, `-prefixed`, `--custom`.
fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        alt((
            recognize(pair(
                char('-'),
                satisfy(|c| is_name_start(c) || c == '-'),
            )),
            recognize(satisfy(is_name_start)),
        )),
        take_while(is_name_char),
    ))(input)
}

/// Parses a number with an optional unit suffix (e.g., `10px`, `.5`, `50%`).
fn number(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        alt((
            recognize(tuple((digit1, opt(pair(char('.'), digit1))))),
            recognize(pair(char('.'), digit1)),
        )),
        opt(alt((
            tag("%"),
            take_while1(|c: char| c.is_ascii_alphabetic()),
        ))),
    ))(input)
}

/// Parses `$name`. A trailing hyphen is left for the subtraction in `$a-$b`.
fn variable(input: &str) -> IResult<&str, &str> {
    let (_, name) = recognize(pair(char('$'), identifier))(input)?;
    let trimmed = name.trim_end_matches('-');
    Ok((&input[trimmed.len()..], trimmed))
}

fn at_keyword(input: &str) -> IResult<&str, &str> {
    recognize(pair(char('@'), identifier))(input)
}

fn hash(input: &str) -> IResult<&str, &str> {
    recognize(pair(char('#'), take_while1(is_name_char)))(input)
}

/// Byte length of a quoted string, or `None` if it is not terminated on its line.
fn string_len(input: &str, quote: char) -> Option<usize> {
    let mut chars = input.char_indices().skip(1);
    while let Some((i, c)) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '\n' => return None,
            c if c == quote => return Some(i + c.len_utf8()),
            _ => {}
        }
    }
    None
}

/// Length of an unquoted `url(...)`: `None` when the input is not one,
/// `Some(None)` when the closing parenthesis is missing.
fn url_len(input: &str) -> Option<Option<usize>> {
    let (after, _) = tag_no_case::<_, _, nom::error::Error<&str>>("url(")(input).ok()?;
    let first = after.trim_start().chars().next();
    if matches!(first, Some('"') | Some('\'')) {
        return None;
    }
    Some(after.find(')').map(|end| input.len() - after.len() + end + 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(input: &str) -> Vec<Token> {
        Lexer::new(input).collect::<Result<Vec<_>>>().unwrap()
    }

    fn kinds(input: &str) -> Vec<(TokenKind, String)> {
        lex(input)
            .into_iter()
            .map(|t| (t.kind, t.text))
            .collect()
    }

    #[test]
    fn lex_simple_rule() {
        use TokenKind::*;
        let tokens = kinds("a { color: red; }");
        assert_eq!(
            tokens,
            vec![
                (Identifier, "a".into()),
                (Punctuation, "{".into()),
                (Identifier, "color".into()),
                (Punctuation, ":".into()),
                (Identifier, "red".into()),
                (Punctuation, ";".into()),
                (Punctuation, "}".into()),
                (EndOfInput, "".into()),
            ]
        );
    }

    #[test]
    fn lex_numbers_with_units() {
        let tokens = kinds("10px 1.5em .5 50%");
        let numbers: Vec<_> = tokens
            .iter()
            .filter(|(k, _)| *k == TokenKind::Number)
            .map(|(_, t)| t.as_str())
            .collect();
        assert_eq!(numbers, vec!["10px", "1.5em", ".5", "50%"]);
    }

    #[test]
    fn lex_sigils() {
        let tokens = lex("$main-color @mixin #fff #{");
        assert_eq!(tokens[0].kind, TokenKind::Variable);
        assert_eq!(tokens[0].name(), "main-color");
        assert_eq!(tokens[1].kind, TokenKind::AtKeyword);
        assert_eq!(tokens[1].name(), "mixin");
        assert_eq!(tokens[2].kind, TokenKind::Hash);
        assert_eq!(tokens[2].name(), "fff");
        assert_eq!(tokens[3].kind, TokenKind::InterpolationStart);
    }

    #[test]
    fn lex_longest_match_operators() {
        let tokens = kinds("a == b != c <= d >= e");
        let ops: Vec<_> = tokens
            .iter()
            .filter(|(k, _)| *k == TokenKind::Operator)
            .map(|(_, t)| t.as_str())
            .collect();
        assert_eq!(ops, vec!["==", "!=", "<=", ">="]);
    }

    #[test]
    fn lex_hyphenated_identifiers() {
        let tokens = kinds("-webkit-box sans-serif --gap");
        assert_eq!(tokens[0], (TokenKind::Identifier, "-webkit-box".into()));
        assert_eq!(tokens[1], (TokenKind::Identifier, "sans-serif".into()));
        assert_eq!(tokens[2], (TokenKind::Identifier, "--gap".into()));
    }

    #[test]
    fn lex_minus_before_number_is_operator() {
        let tokens = kinds("-5px");
        assert_eq!(tokens[0], (TokenKind::Operator, "-".into()));
        assert_eq!(tokens[1], (TokenKind::Number, "5px".into()));
    }

    #[test]
    fn lex_variable_subtraction() {
        let tokens = kinds("$a-$b");
        assert_eq!(tokens[0], (TokenKind::Variable, "$a".into()));
        assert_eq!(tokens[1], (TokenKind::Operator, "-".into()));
        assert_eq!(tokens[2], (TokenKind::Variable, "$b".into()));
    }

    #[test]
    fn lex_comments_are_tokens() {
        let tokens = lex("/* block */ a // line\nb");
        assert_eq!(tokens[0].kind, TokenKind::Comment);
        assert!(tokens[0].is_block_comment());
        assert_eq!(tokens[2].kind, TokenKind::Comment);
        assert!(!tokens[2].is_block_comment());
        assert!(tokens[3].ws_before);
    }

    #[test]
    fn lex_strings() {
        let tokens = lex(r#""double" 'single' "esc\"aped""#);
        assert_eq!(tokens[0].unquoted(), ("double", Some('"')));
        assert_eq!(tokens[1].unquoted(), ("single", Some('\'')));
        assert_eq!(tokens[2].unquoted(), (r#"esc\"aped"#, Some('"')));
    }

    #[test]
    fn lex_unquoted_url() {
        let tokens = kinds("url(img/a.png) url(\"b.png\")");
        assert_eq!(tokens[0], (TokenKind::Url, "url(img/a.png)".into()));
        assert_eq!(tokens[1], (TokenKind::Identifier, "url".into()));
    }

    #[test]
    fn lex_tracks_lines_and_columns() {
        let tokens = lex("a {\n  color: red;\n}");
        let color = tokens.iter().find(|t| t.text == "color").unwrap();
        assert_eq!(color.span, Span::new(2, 3));
        let close = tokens.iter().find(|t| t.text == "}").unwrap();
        assert_eq!(close.span, Span::new(3, 1));
    }

    #[test]
    fn lex_whitespace_flag() {
        let tokens = lex("a:hover b");
        assert!(!tokens[1].ws_before);
        assert!(!tokens[2].ws_before);
        assert!(tokens[3].ws_before);
    }

    #[test]
    fn lex_unterminated_string() {
        let result: Result<Vec<_>> = Lexer::new("a { content: \"oops; }").collect();
        let err = result.unwrap_err();
        assert!(matches!(err, CompileError::Lex { .. }));
        assert_eq!(err.span(), Span::new(1, 14));
    }

    #[test]
    fn lex_unterminated_comment() {
        let result: Result<Vec<_>> = Lexer::new("/* never closed").collect();
        assert!(matches!(result, Err(CompileError::Lex { .. })));
    }

    #[test]
    fn lex_invalid_character() {
        let result: Result<Vec<_>> = Lexer::new("a { b: `x`; }").collect();
        let err = result.unwrap_err();
        assert!(err.message().contains("invalid character"));
    }

    #[test]
    fn lex_ends_with_single_end_of_input() {
        let tokens = lex("");
        assert_eq!(tokens.len(), 1);
        assert!(tokens[0].is_eof());
    }

    #[test]
    fn lex_stops_after_error() {
        let mut lexer = Lexer::new("? a b");
        assert!(matches!(lexer.next(), Some(Err(_))));
        assert!(lexer.next().is_none());
    }
}
