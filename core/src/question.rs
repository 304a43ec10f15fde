//! Question definitions: the structure of a feedback form.

use crate::entry::EntryContent;
use crate::score::ScoreKind;

/// A feedback form as defined on Qualtive.
///
/// Only produced by decoding an API response (see `codec::decode_question`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    /// Identifier of the question, usable as a slug.
    pub id: String,
    pub name: String,
    /// Ordered content of the form. Variants this version does not know are
    /// already dropped.
    pub content: Vec<QuestionContent>,
}

impl Question {
    /// Blank answers for this question, one per content element and in the
    /// same order, ready to be filled out by the user.
    pub fn entry_template(&self) -> Vec<EntryContent> {
        self.content.iter().map(EntryContent::from_question).collect()
    }
}

/// One element of a question's content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionContent {
    /// Static title shown to the user.
    Title(TitleDefinition),
    /// Rating input for a single value in `0..=100`.
    Score(ScoreDefinition),
    /// Free-form text input.
    Text(TextDefinition),
    /// Pick one of the options.
    Select(SelectDefinition),
    /// Pick any number of the options.
    Multiselect(MultiselectDefinition),
    /// File attachments.
    Attachments(AttachmentsDefinition),
}

impl QuestionContent {
    /// Wire tag stored in `type`.
    pub fn type_name(&self) -> &'static str {
        match self {
            QuestionContent::Title(_) => "title",
            QuestionContent::Score(_) => "score",
            QuestionContent::Text(_) => "text",
            QuestionContent::Select(_) => "select",
            QuestionContent::Multiselect(_) => "multiselect",
            QuestionContent::Attachments(_) => "attachments",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TitleDefinition {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScoreDefinition {
    pub kind: ScoreKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextDefinition {
    pub placeholder: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectDefinition {
    pub options: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MultiselectDefinition {
    pub options: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AttachmentsDefinition {}
