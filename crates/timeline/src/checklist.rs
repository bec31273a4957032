//! Form-completion checklist.
//!
//! An application is complete when five sub-forms are done. Completion is
//! signalled two ways: boolean flags on `progress`, or the presence of the
//! sub-form object under `forms`. Missing sections are simply "not done".

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

fn is_true(flag: &Option<JsonValue>) -> bool {
    matches!(flag, Some(JsonValue::Bool(true)))
}

fn is_present(section: &Option<JsonValue>) -> bool {
    !matches!(section, None | Some(JsonValue::Null))
}

/// Boolean progress flags as stored by the backend.
///
/// Flags are kept as raw JSON so that a non-boolean value (e.g. the string
/// `"true"`) reads as "not done" instead of failing the whole payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Progress {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annexure_one_completed: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub noc_form_completed: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annexure_a_filled_or_not: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub undertaking_uploaded: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub noc_documents_submitted: Option<JsonValue>,
}

impl Progress {
    fn documents(&self) -> &Option<JsonValue> {
        &self.noc_documents_submitted
    }

    fn annexure_one(&self) -> &Option<JsonValue> {
        &self.annexure_one_completed
    }

    fn noc_form(&self) -> &Option<JsonValue> {
        &self.noc_form_completed
    }

    fn annexure_a(&self) -> &Option<JsonValue> {
        &self.annexure_a_filled_or_not
    }

    fn undertaking(&self) -> &Option<JsonValue> {
        &self.undertaking_uploaded
    }
}

/// Submitted sub-forms, by section. Only presence matters here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Forms {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annexure_one: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub noc_form: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annexure_a: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub undertaking: Option<JsonValue>,
}

impl Forms {
    fn annexure_one(&self) -> &Option<JsonValue> {
        &self.annexure_one
    }

    fn noc_form(&self) -> &Option<JsonValue> {
        &self.noc_form
    }

    fn undertaking(&self) -> &Option<JsonValue> {
        &self.undertaking
    }
}

/// The part of an application record that describes form completion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forms: Option<Forms>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<Progress>,
}

/// The five required sub-forms, in display order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormKind {
    Documents,
    AnnexureOne,
    AnnexureTwo,
    AnnexureA,
    Undertaking,
}

impl FormKind {
    pub const ALL: [FormKind; 5] = [
        FormKind::Documents,
        FormKind::AnnexureOne,
        FormKind::AnnexureTwo,
        FormKind::AnnexureA,
        FormKind::Undertaking,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FormKind::Documents => "Documents",
            FormKind::AnnexureOne => "Annexure 1",
            FormKind::AnnexureTwo => "Annexure 2",
            FormKind::AnnexureA => "Annexure A",
            FormKind::Undertaking => "Undertaking",
        }
    }

    /// Whether this sub-form is done according to `record`.
    ///
    /// Annexure A only honours its flag: the nested list may exist and still
    /// be empty.
    pub fn is_done(self, record: &CompletionRecord) -> bool {
        let progress = record.progress.as_ref();
        let forms = record.forms.as_ref();
        let flag = |get: fn(&Progress) -> &Option<JsonValue>| match progress {
            Some(p) => is_true(get(p)),
            None => false,
        };
        let section = |get: fn(&Forms) -> &Option<JsonValue>| match forms {
            Some(f) => is_present(get(f)),
            None => false,
        };

        match self {
            FormKind::Documents => flag(Progress::documents),
            FormKind::AnnexureOne => flag(Progress::annexure_one) || section(Forms::annexure_one),
            FormKind::AnnexureTwo => flag(Progress::noc_form) || section(Forms::noc_form),
            FormKind::AnnexureA => flag(Progress::annexure_a),
            FormKind::Undertaking => flag(Progress::undertaking) || section(Forms::undertaking),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub form: FormKind,
    pub name: String,
    pub done: bool,
}

/// Result of evaluating the five completion checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Checklist {
    pub items: Vec<ChecklistItem>,
    pub all_done: bool,
}

impl Checklist {
    pub fn completed(&self) -> usize {
        self.items.iter().filter(|i| i.done).count()
    }

    pub fn total(&self) -> usize {
        self.items.len()
    }

    /// Whole-number completion percentage (rounded down).
    pub fn percent(&self) -> u8 {
        match self.total() {
            0 => 0,
            total => ((self.completed() * 100) / total) as u8,
        }
    }

    pub fn missing(&self) -> impl Iterator<Item = &ChecklistItem> {
        self.items.iter().filter(|i| !i.done)
    }
}

/// Evaluate the completion checklist for one application.
pub fn checklist(record: &CompletionRecord) -> Checklist {
    let items: Vec<ChecklistItem> = FormKind::ALL
        .iter()
        .map(|&form| ChecklistItem {
            form,
            name: form.label().to_string(),
            done: form.is_done(record),
        })
        .collect();
    let all_done = items.iter().all(|i| i.done);
    Checklist { items, all_done }
}
