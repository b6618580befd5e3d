// Lantern is an open source web search engine.
// Copyright (C) 2026 Lantern contributors

use std::ops::Range;

use crate::lexer::{lex, Token};
use crate::{Action, Error, MatchLocation, Matching, Optic, PatternPart, RankingCoeff, Rule};

pub fn parse(source: &str) -> Result<Optic, Error> {
    let tokens = lex(source)?;
    let mut parser = Parser {
        tokens,
        cursor: 0,
        source_len: source.len(),
    };

    let mut optic = Optic::default();

    while let Some(token) = parser.peek() {
        match token {
            Token::DiscardNonMatching => {
                parser.next();
                parser.expect(Token::SemiColon)?;
                optic.discard_non_matching = true;
            }
            Token::Rule => optic.rules.push(parser.rule()?),
            Token::Like => {
                let site = parser.preference(Token::Like)?;
                optic.host_rankings.liked.push(site);
            }
            Token::Dislike => {
                let site = parser.preference(Token::Dislike)?;
                optic.host_rankings.disliked.push(site);
            }
            Token::Ranking => optic.rankings.push(parser.ranking()?),
            _ => {
                return Err(parser.unexpected("a statement"));
            }
        }
    }

    Ok(optic)
}

struct Parser<'a> {
    tokens: Vec<(Token<'a>, Range<usize>)>,
    cursor: usize,
    source_len: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<Token<'a>> {
        self.tokens.get(self.cursor).map(|(t, _)| *t)
    }

    fn next(&mut self) -> Option<(Token<'a>, Range<usize>)> {
        let res = self.tokens.get(self.cursor).cloned();
        self.cursor += 1;
        res
    }

    fn span(&self) -> Range<usize> {
        self.tokens
            .get(self.cursor)
            .map(|(_, span)| span.clone())
            .unwrap_or(self.source_len..self.source_len)
    }

    fn unexpected(&self, expected: &str) -> Error {
        let found = match self.tokens.get(self.cursor) {
            Some((token, _)) => token.to_string(),
            None => "end of input".to_string(),
        };

        Error::syntax(expected, &found, self.span())
    }

    fn expect(&mut self, token: Token<'a>) -> Result<(), Error> {
        if self.peek() == Some(token) {
            self.next();
            Ok(())
        } else {
            Err(self.unexpected(&token.to_string()))
        }
    }

    fn string(&mut self) -> Result<&'a str, Error> {
        match self.peek() {
            Some(Token::String(s)) => {
                self.next();
                Ok(s)
            }
            _ => Err(self.unexpected("a string literal")),
        }
    }

    fn number(&mut self) -> Result<f64, Error> {
        match self.peek() {
            Some(Token::Number(n)) => {
                self.next();
                Ok(n)
            }
            _ => Err(self.unexpected("a number")),
        }
    }

    fn integer(&mut self) -> Result<u64, Error> {
        let span = self.span();
        let n = self.number()?;

        if n.fract() != 0.0 {
            return Err(Error::syntax("an integer", &n.to_string(), span));
        }

        Ok(n as u64)
    }

    /// `Rule { Matches { <clause>, ... }, Action(<action>) };`
    ///
    /// The `Action` part is optional and the clause list accepts a trailing
    /// comma.
    fn rule(&mut self) -> Result<Rule, Error> {
        self.expect(Token::Rule)?;
        self.expect(Token::OpenBrace)?;
        self.expect(Token::Matches)?;
        self.expect(Token::OpenBrace)?;

        let mut matches = vec![self.matching()?];
        while self.peek() == Some(Token::Comma) {
            self.next();
            if self.peek() == Some(Token::CloseBrace) {
                break;
            }
            matches.push(self.matching()?);
        }

        self.expect(Token::CloseBrace)?;

        let mut action = Action::default();
        if self.peek() == Some(Token::Comma) {
            self.next();
            if self.peek() == Some(Token::Action) {
                action = self.action()?;
                if self.peek() == Some(Token::Comma) {
                    self.next();
                }
            }
        }

        self.expect(Token::CloseBrace)?;
        self.expect(Token::SemiColon)?;

        Ok(Rule { matches, action })
    }

    fn matching(&mut self) -> Result<Matching, Error> {
        let location = match self.peek() {
            Some(Token::Site) => MatchLocation::Site,
            Some(Token::Url) => MatchLocation::Url,
            Some(Token::Domain) => MatchLocation::Domain,
            Some(Token::Title) => MatchLocation::Title,
            Some(Token::Description) => MatchLocation::Description,
            Some(Token::Content) => MatchLocation::Content,
            Some(Token::Schema) => MatchLocation::Schema,
            _ => return Err(self.unexpected("a match location")),
        };
        self.next();

        self.expect(Token::OpenParen)?;
        let pattern = PatternPart::parse(self.string()?)?;
        self.expect(Token::CloseParen)?;

        Ok(Matching { location, pattern })
    }

    fn action(&mut self) -> Result<Action, Error> {
        self.expect(Token::Action)?;
        self.expect(Token::OpenParen)?;

        let action = match self.peek() {
            Some(Token::Boost) => {
                self.next();
                self.expect(Token::OpenParen)?;
                let amount = self.integer()?;
                self.expect(Token::CloseParen)?;
                Action::Boost(amount)
            }
            Some(Token::Downrank) => {
                self.next();
                self.expect(Token::OpenParen)?;
                let amount = self.integer()?;
                self.expect(Token::CloseParen)?;
                Action::Downrank(amount)
            }
            Some(Token::Discard) => {
                self.next();
                Action::Discard
            }
            _ => return Err(self.unexpected("an action")),
        };

        self.expect(Token::CloseParen)?;

        Ok(action)
    }

    /// `Like(Site("example.com"));` and the `Dislike` equivalent.
    fn preference(&mut self, kind: Token<'a>) -> Result<String, Error> {
        self.expect(kind)?;
        self.expect(Token::OpenParen)?;
        self.expect(Token::Site)?;
        self.expect(Token::OpenParen)?;
        let site = self.string()?.to_string();
        self.expect(Token::CloseParen)?;
        self.expect(Token::CloseParen)?;
        self.expect(Token::SemiColon)?;

        Ok(site)
    }

    /// `Ranking(Signal("bm25_title"), 3);`
    fn ranking(&mut self) -> Result<RankingCoeff, Error> {
        self.expect(Token::Ranking)?;
        self.expect(Token::OpenParen)?;
        self.expect(Token::Signal)?;
        self.expect(Token::OpenParen)?;
        let target = self.string()?.to_string();
        self.expect(Token::CloseParen)?;
        self.expect(Token::Comma)?;
        let value = self.number()?;
        self.expect(Token::CloseParen)?;
        self.expect(Token::SemiColon)?;

        Ok(RankingCoeff { target, value })
    }
}
