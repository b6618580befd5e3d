// Lantern is an open source web search engine.
// Copyright (C) 2026 Lantern contributors

use logos::Logos;

use crate::Error;

#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"//[^\n]*")]
pub enum Token<'a> {
    #[token("DiscardNonMatching")]
    DiscardNonMatching,

    #[token("Rule")]
    Rule,

    #[token("Matches")]
    Matches,

    #[token("Action")]
    Action,

    #[token("Boost")]
    Boost,

    #[token("Downrank")]
    Downrank,

    #[token("Discard")]
    Discard,

    #[token("Like")]
    Like,

    #[token("Dislike")]
    Dislike,

    #[token("Ranking")]
    Ranking,

    #[token("Signal")]
    Signal,

    #[token("Site")]
    Site,

    #[token("Url")]
    Url,

    #[token("Domain")]
    Domain,

    #[token("Title")]
    Title,

    #[token("Description")]
    Description,

    #[token("Content")]
    Content,

    #[token("Schema")]
    Schema,

    #[token("{")]
    OpenBrace,

    #[token("}")]
    CloseBrace,

    #[token("(")]
    OpenParen,

    #[token(")")]
    CloseParen,

    #[token(",")]
    Comma,

    #[token(";")]
    SemiColon,

    #[regex(r#""[^"]*""#, |lex| {
        let s = lex.slice();
        &s[1..s.len() - 1]
    })]
    String(&'a str),

    #[regex(r"[0-9]+(\.[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    Number(f64),
}

impl std::fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::DiscardNonMatching => write!(f, "DiscardNonMatching"),
            Token::Rule => write!(f, "Rule"),
            Token::Matches => write!(f, "Matches"),
            Token::Action => write!(f, "Action"),
            Token::Boost => write!(f, "Boost"),
            Token::Downrank => write!(f, "Downrank"),
            Token::Discard => write!(f, "Discard"),
            Token::Like => write!(f, "Like"),
            Token::Dislike => write!(f, "Dislike"),
            Token::Ranking => write!(f, "Ranking"),
            Token::Signal => write!(f, "Signal"),
            Token::Site => write!(f, "Site"),
            Token::Url => write!(f, "Url"),
            Token::Domain => write!(f, "Domain"),
            Token::Title => write!(f, "Title"),
            Token::Description => write!(f, "Description"),
            Token::Content => write!(f, "Content"),
            Token::Schema => write!(f, "Schema"),
            Token::OpenBrace => write!(f, "{{"),
            Token::CloseBrace => write!(f, "}}"),
            Token::OpenParen => write!(f, "("),
            Token::CloseParen => write!(f, ")"),
            Token::Comma => write!(f, ","),
            Token::SemiColon => write!(f, ";"),
            Token::String(s) => write!(f, "\"{s}\""),
            Token::Number(n) => write!(f, "{n}"),
        }
    }
}

/// Lex the entire source upfront so the parser can peek freely.
pub fn lex(source: &str) -> Result<Vec<(Token<'_>, std::ops::Range<usize>)>, Error> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();

    while let Some(token) = lexer.next() {
        match token {
            Ok(token) => tokens.push((token, lexer.span())),
            Err(()) => {
                return Err(Error::syntax(
                    "a valid token",
                    &source[lexer.span()],
                    lexer.span(),
                ))
            }
        }
    }

    Ok(tokens)
}
