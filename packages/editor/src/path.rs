//! # Paths
//!
//! Root-relative addresses into an entity tree.
//!
//! ## Grammar
//!
//! ```text
//! path    := ident ( "." ident | "[" integer "]" )*
//! ident   := [A-Za-z_$][A-Za-z0-9_$]*
//! integer := [0-9]+
//! ```
//!
//! `editions[2].paperbackSplits[0]` parses to
//! `[Field("editions"), Index(2), Field("paperbackSplits"), Index(0)]`.
//! Identifiers are not escaped and whitespace is not allowed.
//!
//! Paths built in code can leave the grammar: the root path, a path that
//! starts with an index, or a field name that is not an identifier. Those
//! still display (diff output uses them) but have no text form that parses
//! back, so serializing them fails. See [`Path::has_text_form`].

use logos::Logos;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::Range;
use std::str::FromStr;
use thiserror::Error;

#[derive(Logos, Debug, Clone, PartialEq)]
enum Token<'src> {
    #[regex(r"[A-Za-z_$][A-Za-z0-9_$]*", |lex| lex.slice())]
    Ident(&'src str),

    #[regex(r"[0-9]+", |lex| lex.slice())]
    Integer(&'src str),

    #[token(".")]
    Dot,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,
}

impl<'src> fmt::Display for Token<'src> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Ident(s) => write!(f, "identifier '{}'", s),
            Token::Integer(n) => write!(f, "integer {}", n),
            Token::Dot => write!(f, "'.'"),
            Token::LBracket => write!(f, "'['"),
            Token::RBracket => write!(f, "']'"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PathError {
    #[error("Path is empty")]
    Empty,

    #[error("Unexpected character at {pos}")]
    Lexer { pos: usize },

    #[error("Unexpected token at {pos}: expected {expected}, found {found}")]
    UnexpectedToken {
        pos: usize,
        expected: &'static str,
        found: String,
    },

    #[error("Unexpected end of path at {pos}: expected {expected}")]
    UnexpectedEnd { pos: usize, expected: &'static str },

    #[error("Index too large at {pos}: {digits}")]
    IndexOverflow { pos: usize, digits: String },
}

/// One step of a path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Object field access
    Field(String),

    /// Sequence index
    Index(usize),
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Field(name) => write!(f, ".{}", name),
            Segment::Index(index) => write!(f, "[{}]", index),
        }
    }
}

/// Parsed path: a sequence of typed segments starting at the root
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Path {
    segments: Vec<Segment>,
}

impl Path {
    /// The empty path, addressing the whole tree
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse the text form of a path
    pub fn parse(source: &str) -> Result<Self, PathError> {
        PathParser::new(source)?.parse()
    }

    pub fn from_segments(segments: &[Segment]) -> Self {
        Self {
            segments: segments.to_vec(),
        }
    }

    /// Extend with a field access
    pub fn field(mut self, name: impl Into<String>) -> Self {
        self.segments.push(Segment::Field(name.into()));
        self
    }

    /// Extend with a sequence index
    pub fn index(mut self, index: usize) -> Self {
        self.segments.push(Segment::Index(index));
        self
    }

    /// Append every segment of `other`
    pub fn join(&self, other: &Path) -> Self {
        let mut segments = self.segments.clone();
        segments.extend(other.segments.iter().cloned());
        Self { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn last(&self) -> Option<&Segment> {
        self.segments.last()
    }

    /// Whether [`Display`](fmt::Display) output parses back to this path
    pub fn has_text_form(&self) -> bool {
        matches!(self.segments.first(), Some(Segment::Field(_)))
            && self.segments.iter().all(|segment| match segment {
                Segment::Field(name) => is_identifier(name),
                Segment::Index(_) => true,
            })
    }

    /// Path without its final segment
    pub fn parent(&self) -> Option<Path> {
        self.segments
            .split_last()
            .map(|(_, rest)| Path::from_segments(rest))
    }

    /// First `len` segments, used to name where a lookup failed
    pub fn prefix(&self, len: usize) -> Path {
        Path::from_segments(&self.segments[..len.min(self.segments.len())])
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Field(name) if i == 0 => write!(f, "{}", name)?,
                other => write!(f, "{}", other)?,
            }
        }
        Ok(())
    }
}

impl FromStr for Path {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Path::parse(s)
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

impl Serialize for Path {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if !self.has_text_form() {
            return Err(serde::ser::Error::custom(format!(
                "path '{}' has no text form",
                self
            )));
        }
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Path {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Path::parse(&text).map_err(serde::de::Error::custom)
    }
}

struct PathParser<'src> {
    tokens: Vec<(Token<'src>, Range<usize>)>,
    pos: usize,
    end: usize,
}

impl<'src> PathParser<'src> {
    fn new(source: &'src str) -> Result<Self, PathError> {
        let mut tokens = Vec::new();
        for (token, span) in Token::lexer(source).spanned() {
            match token {
                Ok(token) => tokens.push((token, span)),
                Err(()) => return Err(PathError::Lexer { pos: span.start }),
            }
        }

        Ok(Self {
            tokens,
            pos: 0,
            end: source.len(),
        })
    }

    fn parse(mut self) -> Result<Path, PathError> {
        let mut path = Path::root();

        match self.advance() {
            Some((Token::Ident(name), _)) => path = path.field(name),
            Some((token, span)) => {
                return Err(PathError::UnexpectedToken {
                    pos: span.start,
                    expected: "identifier",
                    found: token.to_string(),
                })
            }
            None => return Err(PathError::Empty),
        }

        while let Some((token, span)) = self.advance() {
            match token {
                Token::Dot => {
                    let name = self.expect_ident()?;
                    path = path.field(name);
                }
                Token::LBracket => {
                    let index = self.expect_index()?;
                    self.expect_rbracket()?;
                    path = path.index(index);
                }
                other => {
                    return Err(PathError::UnexpectedToken {
                        pos: span.start,
                        expected: "'.' or '['",
                        found: other.to_string(),
                    })
                }
            }
        }

        Ok(path)
    }

    fn advance(&mut self) -> Option<(Token<'src>, Range<usize>)> {
        let next = self.tokens.get(self.pos).cloned();
        if next.is_some() {
            self.pos += 1;
        }
        next
    }

    fn expect_ident(&mut self) -> Result<&'src str, PathError> {
        match self.advance() {
            Some((Token::Ident(name), _)) => Ok(name),
            Some((token, span)) => Err(PathError::UnexpectedToken {
                pos: span.start,
                expected: "identifier",
                found: token.to_string(),
            }),
            None => Err(PathError::UnexpectedEnd {
                pos: self.end,
                expected: "identifier",
            }),
        }
    }

    fn expect_index(&mut self) -> Result<usize, PathError> {
        match self.advance() {
            Some((Token::Integer(digits), span)) => {
                digits.parse().map_err(|_| PathError::IndexOverflow {
                    pos: span.start,
                    digits: digits.to_string(),
                })
            }
            Some((token, span)) => Err(PathError::UnexpectedToken {
                pos: span.start,
                expected: "index",
                found: token.to_string(),
            }),
            None => Err(PathError::UnexpectedEnd {
                pos: self.end,
                expected: "index",
            }),
        }
    }

    fn expect_rbracket(&mut self) -> Result<(), PathError> {
        match self.advance() {
            Some((Token::RBracket, _)) => Ok(()),
            Some((token, span)) => Err(PathError::UnexpectedToken {
                pos: span.start,
                expected: "']'",
                found: token.to_string(),
            }),
            None => Err(PathError::UnexpectedEnd {
                pos: self.end,
                expected: "']'",
            }),
        }
    }
}
