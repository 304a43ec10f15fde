//! Entries: a user's answers to a question.
//!
//! Every answer keeps the definition it was created from, so an answer built
//! from a question remembers its placeholder, options or score kind. Answers
//! built standalone get a default definition.

use crate::attachment::Attachment;
use crate::error::ScoreRangeError;
use crate::question::{
    AttachmentsDefinition, MultiselectDefinition, QuestionContent, ScoreDefinition,
    SelectDefinition, TextDefinition, TitleDefinition,
};
use crate::score::Score;

/// A posted entry. The id is assigned by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Entry {
    pub id: u64,
}

/// One answered element of an entry, mirroring `QuestionContent`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryContent {
    Title(TitleAnswer),
    Score(ScoreAnswer),
    Text(TextAnswer),
    Select(SelectAnswer),
    Multiselect(MultiselectAnswer),
    Attachments(AttachmentsAnswer),
}

impl EntryContent {
    /// Blank answer for a question content element.
    pub fn from_question(content: &QuestionContent) -> Self {
        match content {
            QuestionContent::Title(def) => EntryContent::Title(TitleAnswer::from_definition(def)),
            QuestionContent::Score(def) => EntryContent::Score(ScoreAnswer::from_definition(def)),
            QuestionContent::Text(def) => EntryContent::Text(TextAnswer::from_definition(def)),
            QuestionContent::Select(def) => {
                EntryContent::Select(SelectAnswer::from_definition(def))
            }
            QuestionContent::Multiselect(def) => {
                EntryContent::Multiselect(MultiselectAnswer::from_definition(def))
            }
            QuestionContent::Attachments(def) => {
                EntryContent::Attachments(AttachmentsAnswer::from_definition(def))
            }
        }
    }

    /// Wire tag stored in `type`.
    pub fn type_name(&self) -> &'static str {
        match self {
            EntryContent::Title(_) => "title",
            EntryContent::Score(_) => "score",
            EntryContent::Text(_) => "text",
            EntryContent::Select(_) => "select",
            EntryContent::Multiselect(_) => "multiselect",
            EntryContent::Attachments(_) => "attachments",
        }
    }
}

/// Static title that was shown. Not user editable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleAnswer {
    pub definition: TitleDefinition,
    pub text: String,
}

impl TitleAnswer {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            definition: TitleDefinition::default(),
            text: text.into(),
        }
    }

    pub fn from_definition(definition: &TitleDefinition) -> Self {
        Self {
            definition: definition.clone(),
            text: definition.text.clone(),
        }
    }
}

/// Rating answer. `value` is `None` until the user picks one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreAnswer {
    pub definition: ScoreDefinition,
    value: Option<Score>,
}

impl ScoreAnswer {
    /// Standalone answer. Fails if `value` is outside of `0..=100`.
    pub fn new(value: Option<i64>) -> Result<Self, ScoreRangeError> {
        Ok(Self {
            definition: ScoreDefinition::default(),
            value: value.map(Score::new).transpose()?,
        })
    }

    pub fn from_definition(definition: &ScoreDefinition) -> Self {
        Self {
            definition: definition.clone(),
            value: None,
        }
    }

    pub fn value(&self) -> Option<Score> {
        self.value
    }

    pub fn set_value(&mut self, value: Option<i64>) -> Result<(), ScoreRangeError> {
        self.value = value.map(Score::new).transpose()?;
        Ok(())
    }

    pub fn set_score(&mut self, score: Option<Score>) {
        self.value = score;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextAnswer {
    pub definition: TextDefinition,
    pub value: Option<String>,
}

impl TextAnswer {
    pub fn new(value: Option<String>) -> Self {
        Self {
            definition: TextDefinition::default(),
            value,
        }
    }

    pub fn from_definition(definition: &TextDefinition) -> Self {
        Self {
            definition: definition.clone(),
            value: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectAnswer {
    pub definition: SelectDefinition,
    pub value: Option<String>,
}

impl SelectAnswer {
    pub fn new(value: Option<String>) -> Self {
        Self {
            definition: SelectDefinition::default(),
            value,
        }
    }

    pub fn from_definition(definition: &SelectDefinition) -> Self {
        Self {
            definition: definition.clone(),
            value: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiselectAnswer {
    pub definition: MultiselectDefinition,
    pub values: Vec<String>,
}

impl MultiselectAnswer {
    pub fn new(values: Vec<String>) -> Self {
        Self {
            definition: MultiselectDefinition::default(),
            values,
        }
    }

    pub fn from_definition(definition: &MultiselectDefinition) -> Self {
        Self {
            definition: definition.clone(),
            values: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentsAnswer {
    pub definition: AttachmentsDefinition,
    pub values: Vec<Attachment>,
}

impl AttachmentsAnswer {
    pub fn new(values: Vec<Attachment>) -> Self {
        Self {
            definition: AttachmentsDefinition::default(),
            values,
        }
    }

    pub fn from_definition(definition: &AttachmentsDefinition) -> Self {
        Self {
            definition: definition.clone(),
            values: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::score::ScoreKind;

    #[test]
    fn score_answer_accepts_bounds() {
        assert_eq!(ScoreAnswer::new(Some(0)).unwrap().value(), Some(Score::MIN));
        assert_eq!(ScoreAnswer::new(Some(100)).unwrap().value(), Some(Score::MAX));
        assert_eq!(ScoreAnswer::new(None).unwrap().value(), None);
    }

    #[test]
    fn score_answer_rejects_out_of_range() {
        assert_eq!(ScoreAnswer::new(Some(-1)), Err(ScoreRangeError(-1)));
        assert_eq!(ScoreAnswer::new(Some(101)), Err(ScoreRangeError(101)));
    }

    #[test]
    fn set_value_keeps_previous_value_on_error() {
        let mut answer = ScoreAnswer::new(Some(40)).unwrap();
        assert!(answer.set_value(Some(250)).is_err());
        assert_eq!(answer.value().map(Score::value), Some(40));
        answer.set_value(None).unwrap();
        assert_eq!(answer.value(), None);
    }

    #[test]
    fn templated_answers_copy_definition_and_leave_value_empty() {
        let definition = ScoreDefinition {
            kind: ScoreKind::Nps {
                leading_text: "Unlikely".to_string(),
                trailing_text: "Likely".to_string(),
            },
        };
        let answer = ScoreAnswer::from_definition(&definition);
        assert_eq!(answer.definition, definition);
        assert_eq!(answer.value(), None);

        let title = TitleAnswer::from_definition(&TitleDefinition {
            text: "Hello".to_string(),
        });
        assert_eq!(title.text, "Hello");

        let text = TextAnswer::from_definition(&TextDefinition {
            placeholder: Some("Write here".to_string()),
        });
        assert_eq!(text.definition.placeholder.as_deref(), Some("Write here"));
        assert_eq!(text.value, None);
    }

    #[test]
    fn standalone_answers_use_default_definitions() {
        let select = SelectAnswer::new(Some("A".to_string()));
        assert!(select.definition.options.is_empty());
        let score = ScoreAnswer::new(Some(5)).unwrap();
        assert_eq!(score.definition.kind, ScoreKind::Smilies5);
        assert_eq!(TitleAnswer::new("Hi").definition.text, "");
    }
}
