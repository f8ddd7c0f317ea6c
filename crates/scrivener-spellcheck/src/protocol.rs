//! Messages between the host and the check worker.
//!
//! The JSON form is `{"type": "CHECK_TEXT", "payload": {"fullText": ...}}`,
//! the shape browser hosts post to a web worker.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::error::SpellCheckError;
use crate::scanner::WordToken;

fn default_suggestion_limit() -> usize {
    5
}

/// Input messages to the check worker.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CheckerInput {
    /// Load (or replace) the base dictionary.
    #[serde(rename_all = "camelCase")]
    InitDictionary { aff_data: String, dic_data: String },
    /// Add one word to the custom set.
    AddWord { word: String },
    /// Remove one word from the custom set.
    RemoveWord { word: String },
    /// Add several words at once.
    AddWords { words: Vec<String> },
    /// Remove several words at once.
    RemoveWords { words: Vec<String> },
    /// Empty the custom set.
    ClearWords,
    /// Scan the plain text and report invalid words.
    #[serde(rename_all = "camelCase")]
    CheckText {
        full_text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        request_id: Option<u64>,
    },
    /// Ask for corrections of one word.
    Suggest {
        word: String,
        #[serde(default = "default_suggestion_limit")]
        limit: usize,
    },
}

/// One flagged word occurrence, in char offsets.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct InvalidWord {
    pub word: SmolStr,
    pub start: usize,
    pub end: usize,
}

impl From<WordToken> for InvalidWord {
    fn from(token: WordToken) -> Self {
        Self {
            word: token.word,
            start: token.start,
            end: token.end,
        }
    }
}

/// Output messages from the check worker.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CheckerOutput {
    /// A dictionary was installed; checks are now answered.
    Ready,
    /// Result of one `CHECK_TEXT`.
    #[serde(rename_all = "camelCase")]
    CheckResult {
        invalid_words: Vec<InvalidWord>,
        /// Lowercased words found invalid in this pass only.
        current_check_cache: BTreeMap<SmolStr, bool>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        request_id: Option<u64>,
    },
    /// Corrections for a `SUGGEST`.
    Suggestions {
        word: String,
        suggestions: Vec<SmolStr>,
    },
    /// Something went wrong handling an input.
    Error { message: SmolStr },
}

impl CheckerInput {
    pub fn from_json(s: &str) -> Result<Self, SpellCheckError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn to_json(&self) -> Result<String, SpellCheckError> {
        Ok(serde_json::to_string(self)?)
    }
}

impl CheckerOutput {
    pub fn from_json(s: &str) -> Result<Self, SpellCheckError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn to_json(&self) -> Result<String, SpellCheckError> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_wire_names() {
        let init = CheckerInput::from_json(
            r#"{"type":"INIT_DICTIONARY","payload":{"affData":"SET UTF-8","dicData":"1\nhello"}}"#,
        )
        .unwrap();
        assert_eq!(
            init,
            CheckerInput::InitDictionary {
                aff_data: "SET UTF-8".into(),
                dic_data: "1\nhello".into(),
            }
        );

        let clear = CheckerInput::from_json(r#"{"type":"CLEAR_WORDS"}"#).unwrap();
        assert_eq!(clear, CheckerInput::ClearWords);

        let check = CheckerInput::from_json(r#"{"type":"CHECK_TEXT","payload":{"fullText":"hi"}}"#)
            .unwrap();
        assert_eq!(
            check,
            CheckerInput::CheckText {
                full_text: "hi".into(),
                request_id: None,
            }
        );

        let suggest = CheckerInput::from_json(r#"{"type":"SUGGEST","payload":{"word":"teh"}}"#)
            .unwrap();
        assert_eq!(
            suggest,
            CheckerInput::Suggest {
                word: "teh".into(),
                limit: 5,
            }
        );
    }

    #[test]
    fn test_check_result_json() {
        let output = CheckerOutput::CheckResult {
            invalid_words: vec![InvalidWord {
                word: "wrold".into(),
                start: 5,
                end: 10,
            }],
            current_check_cache: BTreeMap::from([(SmolStr::new("wrold"), false)]),
            request_id: Some(3),
        };
        assert_eq!(
            output.to_json().unwrap(),
            r#"{"type":"CHECK_RESULT","payload":{"invalidWords":[{"word":"wrold","start":5,"end":10}],"currentCheckCache":{"wrold":false},"requestId":3}}"#
        );
    }

    #[test]
    fn test_unknown_type_is_protocol_error() {
        let err = CheckerInput::from_json(r#"{"type":"SHUTDOWN"}"#).unwrap_err();
        assert!(matches!(err, SpellCheckError::Protocol(_)));
    }
}
