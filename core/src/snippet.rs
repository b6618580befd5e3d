// Lantern is an open source web search engine.
// Copyright (C) 2026 Lantern contributors

use utoipa::ToSchema;

use crate::highlighted::HighlightedFragment;

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TextSnippet {
    pub fragments: Vec<HighlightedFragment>,
}

impl TextSnippet {
    pub fn unhighlighted(text: String) -> Self {
        Self {
            fragments: vec![HighlightedFragment::new_normal(text)],
        }
    }

    pub fn text(&self) -> String {
        self.fragments.iter().map(|f| f.text()).collect()
    }
}

/// A snippet is either a normal text snippet or a question/answers pair for
/// forum-style content. The discriminant is the `type` field on the wire.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Snippet {
    Normal {
        date: Option<String>,
        text: TextSnippet,
    },
    #[serde(rename = "stackOverflowQA")]
    StackOverflowQA {
        question: StackOverflowQuestion,
        answers: Vec<StackOverflowAnswer>,
    },
}

impl Snippet {
    pub fn plain_text(&self) -> String {
        match self {
            Snippet::Normal { text, .. } => text.text(),
            Snippet::StackOverflowQA { question, answers } => {
                let mut out = String::new();
                for part in &question.body {
                    out.push_str(part.text());
                }
                for answer in answers {
                    for part in &answer.body {
                        out.push_str(part.text());
                    }
                }
                out
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StackOverflowQuestion {
    pub body: Vec<CodeOrText>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StackOverflowAnswer {
    pub body: Vec<CodeOrText>,
    pub date: String,
    pub url: String,
    pub upvotes: i32,
    pub accepted: bool,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize, ToSchema)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum CodeOrText {
    Code(String),
    Text(String),
}

impl CodeOrText {
    pub fn text(&self) -> &str {
        match self {
            CodeOrText::Code(s) | CodeOrText::Text(s) => s,
        }
    }
}
