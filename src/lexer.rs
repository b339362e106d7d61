//! The lexer: converts source text into a stream of [Token]s.
//!
//! Unlike a conventional JSON lexer, whitespace runs and comments are produced as
//! first-class tokens rather than being skipped, which is what allows the parser to
//! build a tree that round-trips byte-for-byte. The lexer never fails: anything it
//! cannot classify becomes a [TokenKind::Illegal] token carrying an [IllegalReason],
//! and it is the parser's job to turn that into a reported error.

use crate::coords::Span;

/// Reasons a token may be classified as [TokenKind::Illegal]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum IllegalReason {
    /// A character with no meaning in any JSON position
    UnknownCharacter,
    /// End of input reached before a string's closing delimiter
    UnterminatedString,
    /// End of input reached before a `*/`
    UnterminatedBlockComment,
    /// A lone `/` that opened neither `//` nor `/* */`
    InvalidCommentStart,
    /// A bare identifier other than `true`, `false` or `null`
    UnrecognisedIdentifier,
}

/// Enumeration of valid JSON tokens, plus the structural trivia this toolkit preserves
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TokenKind {
    LeftBrace,
    RightBrace,
    LeftBracket,
    RightBracket,
    Colon,
    Comma,
    /// A string delimited by either `"` or `'`
    Str,
    /// An unvalidated run of number characters; the parser resolves the value
    Number,
    True,
    False,
    Null,
    /// A run of whitespace characters, collapsed into a single token
    Whitespace,
    /// A `//` comment, newline included in the literal
    LineComment,
    /// A `/* */` comment
    BlockComment,
    Illegal(IllegalReason),
    EndOfInput,
}

/// A single token scanned from the input
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The classification of the token
    pub kind: TokenKind,
    /// The literal text, exclusive of any delimiters captured in [Token::prefix]/[Token::suffix]
    pub literal: String,
    /// 1-based source line the token starts on
    pub line: usize,
    /// Byte interval covering the complete token, delimiters included
    pub span: Span,
    /// Opening delimiter: the quote character for strings, `//` or `/*` for comments
    pub prefix: Option<&'static str>,
    /// Closing delimiter: the quote character for strings, `*/` for block comments
    pub suffix: Option<&'static str>,
}

impl Token {
    /// The quote character which delimited a [TokenKind::Str] token
    pub fn delimiter(&self) -> Option<char> {
        match self.kind {
            TokenKind::Str => self.prefix.and_then(|p| p.chars().next()),
            _ => None,
        }
    }

    /// A human-readable description of the token, for use within error messages
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::EndOfInput => "end of input".to_string(),
            TokenKind::Whitespace => "whitespace".to_string(),
            _ => format!("'{}'", self.literal),
        }
    }
}

/// Map the delimiter of a string onto a static slice, so tokens avoid an allocation
/// for their prefix/suffix fields
fn quote_str(delimiter: u8) -> &'static str {
    if delimiter == b'\'' {
        "'"
    } else {
        "\""
    }
}

fn is_whitespace(char: u8) -> bool {
    char == b' ' || char == b'\t' || char == b'\n' || char == b'\r'
}

fn is_number(char: u8) -> bool {
    char.is_ascii_digit() || char == b'.' || char == b'-'
}

fn is_letter(char: u8) -> bool {
    char.is_ascii_lowercase()
}

/// The lexer holds the input buffer and a byte cursor over it. [Lexer::next_token]
/// classifies the character under examination and scans out one complete token,
/// advancing the cursor monotonically; once the input is exhausted it returns
/// [TokenKind::EndOfInput] forever.
pub struct Lexer<'a> {
    /// The complete source text
    input: &'a str,
    /// Current character under examination, `0` once the input is exhausted
    char: u8,
    /// Byte offset of the current character
    position: usize,
    /// Byte offset of the next character to be read
    read_position: usize,
    /// 1-based line number, incremented as newlines are consumed
    line: usize,
}

impl<'a> Lexer<'a> {
    /// Construct a new [Lexer] over the given source text
    pub fn new(input: &'a str) -> Self {
        let mut lexer = Lexer {
            input,
            char: 0,
            position: 0,
            read_position: 0,
            line: 1,
        };
        lexer.advance_char();
        lexer
    }

    fn advance_char(&mut self) {
        self.char = *self.input.as_bytes().get(self.read_position).unwrap_or(&0);
        self.position = self.read_position.min(self.input.len());
        self.read_position = self.position + 1;
    }

    /// Scan and return the next token from the input
    pub fn next_token(&mut self) -> Token {
        if is_whitespace(self.char) {
            return self.match_whitespace();
        }
        let token = match self.char {
            b'/' => return self.match_comment(),
            b'{' => self.structural(TokenKind::LeftBrace),
            b'}' => self.structural(TokenKind::RightBrace),
            b'[' => self.structural(TokenKind::LeftBracket),
            b']' => self.structural(TokenKind::RightBracket),
            b':' => self.structural(TokenKind::Colon),
            b',' => self.structural(TokenKind::Comma),
            b'"' | b'\'' => self.match_string(self.char),
            0 => {
                return self.token_at(TokenKind::EndOfInput, String::new(), self.position, self.line)
            }
            _ => {
                if is_letter(self.char) {
                    return self.match_identifier();
                } else if is_number(self.char) {
                    return self.match_number();
                }
                return self.match_unknown();
            }
        };
        self.advance_char();
        token
    }

    fn token_at(&self, kind: TokenKind, literal: String, start: usize, line: usize) -> Token {
        Token {
            kind,
            literal,
            line,
            span: Span {
                start,
                end: self.position,
            },
            prefix: None,
            suffix: None,
        }
    }

    /// Build a token for one of the six structural characters. The cursor is advanced
    /// by the caller once the token has been assembled.
    fn structural(&self, kind: TokenKind) -> Token {
        Token {
            kind,
            literal: (self.char as char).to_string(),
            line: self.line,
            span: Span {
                start: self.position,
                end: self.position + 1,
            },
            prefix: None,
            suffix: None,
        }
    }

    /// Collapse a run of whitespace characters into a single token, counting newlines
    fn match_whitespace(&mut self) -> Token {
        let start = self.position;
        let line = self.line;
        while is_whitespace(self.char) {
            if self.char == b'\n' {
                self.line += 1;
            }
            self.advance_char();
        }
        self.token_at(
            TokenKind::Whitespace,
            self.input[start..self.position].to_string(),
            start,
            line,
        )
    }

    /// Scan a string delimited by `"` or `'`. The literal excludes the delimiters,
    /// which are captured as the token's prefix and suffix instead. A delimiter
    /// preceded by an odd run of backslashes does not terminate the string.
    fn match_string(&mut self, delimiter: u8) -> Token {
        let start = self.position;
        let line = self.line;
        let mut escaped = false;
        loop {
            self.advance_char();
            match self.char {
                0 => {
                    return self.token_at(
                        TokenKind::Illegal(IllegalReason::UnterminatedString),
                        self.input[start + 1..self.position].to_string(),
                        start,
                        line,
                    );
                }
                b'\n' => {
                    self.line += 1;
                    escaped = false;
                }
                b'\\' => escaped = !escaped,
                c => {
                    if c == delimiter && !escaped {
                        break;
                    }
                    escaped = false;
                }
            }
        }
        Token {
            kind: TokenKind::Str,
            literal: self.input[start + 1..self.position].to_string(),
            line,
            span: Span {
                start,
                end: self.position + 1,
            },
            prefix: Some(quote_str(delimiter)),
            suffix: Some(quote_str(delimiter)),
        }
    }

    /// Scan a `//` or `/* */` comment; a lone `/` is an illegal token
    fn match_comment(&mut self) -> Token {
        let start = self.position;
        let line = self.line;
        self.advance_char();
        match self.char {
            b'/' => {
                self.advance_char();
                let literal = self.read_line();
                let mut token = self.token_at(TokenKind::LineComment, literal, start, line);
                token.prefix = Some("//");
                token
            }
            b'*' => self.match_block_comment(start, line),
            _ => self.token_at(
                TokenKind::Illegal(IllegalReason::InvalidCommentStart),
                "/".to_string(),
                start,
                line,
            ),
        }
    }

    /// Consume characters through the end of the current line. Ownership of the
    /// terminating newline goes to the returned literal.
    fn read_line(&mut self) -> String {
        let start = self.position;
        while self.char != 0 {
            if self.char == b'\n' {
                self.line += 1;
                self.advance_char();
                break;
            }
            self.advance_char();
        }
        self.input[start..self.position].to_string()
    }

    /// Scan a block comment whose `/*` prefix has been identified; the cursor sits on
    /// the `*`. The literal excludes both delimiter pairs.
    fn match_block_comment(&mut self, start: usize, line: usize) -> Token {
        self.advance_char();
        let content_start = self.position;
        loop {
            let prev = self.char;
            self.advance_char();
            if self.char == 0 {
                return self.token_at(
                    TokenKind::Illegal(IllegalReason::UnterminatedBlockComment),
                    self.input[content_start..self.position].to_string(),
                    start,
                    line,
                );
            }
            if self.char == b'\n' {
                self.line += 1;
            }
            if self.char == b'/' && prev == b'*' {
                self.advance_char();
                break;
            }
        }
        Token {
            kind: TokenKind::BlockComment,
            literal: self.input[content_start..self.position - 2].to_string(),
            line,
            span: Span {
                start,
                end: self.position,
            },
            prefix: Some("/*"),
            suffix: Some("*/"),
        }
    }

    /// Scan a bare identifier and match it against the fixed set of JSON keywords
    fn match_identifier(&mut self) -> Token {
        let start = self.position;
        while is_letter(self.char) {
            self.advance_char();
        }
        let literal = &self.input[start..self.position];
        let kind = match literal {
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "null" => TokenKind::Null,
            _ => TokenKind::Illegal(IllegalReason::UnrecognisedIdentifier),
        };
        self.token_at(kind, literal.to_string(), start, self.line)
    }

    /// Scan a run of number characters. No grammar validation happens here: the run is
    /// handed to the parser verbatim, which attempts integer and float parses in turn.
    fn match_number(&mut self) -> Token {
        let start = self.position;
        while is_number(self.char) {
            self.advance_char();
        }
        self.token_at(
            TokenKind::Number,
            self.input[start..self.position].to_string(),
            start,
            self.line,
        )
    }

    /// Consume one complete character (multi-byte sequences included) as an illegal token
    fn match_unknown(&mut self) -> Token {
        let start = self.position;
        let char = self.input[start..]
            .chars()
            .next()
            .unwrap_or(char::REPLACEMENT_CHARACTER);
        for _ in 0..char.len_utf8() {
            self.advance_char();
        }
        self.token_at(
            TokenKind::Illegal(IllegalReason::UnknownCharacter),
            char.to_string(),
            start,
            self.line,
        )
    }
}
