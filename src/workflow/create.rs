use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Shown when the generation service answers without any letter text.
pub const FALLBACK_LETTER_TEXT: &str = "تم إنشاء الخطاب بنجاح";

/// Fields collected by the create-letter form. Everything is kept as the raw
/// submitted text so the form can be redisplayed unchanged.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LetterForm {
    pub letter_type: String,
    pub purpose: String,
    pub style: String,
    /// "yes" or "no"; empty until the user picks one.
    pub is_first: String,
    pub recipient: String,
    pub title: String,
    pub content: String,
}

impl LetterForm {
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("letter_type", &self.letter_type),
            ("purpose", &self.purpose),
            ("style", &self.style),
            ("recipient", &self.recipient),
            ("title", &self.title),
            ("content", &self.content),
            ("is_first", &self.is_first),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}

/// Body sent to the generation service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LetterRequest {
    pub category: String,
    pub sub_category: String,
    pub title: String,
    pub recipient: String,
    #[serde(rename = "isFirst")]
    pub is_first: bool,
    pub prompt: String,
    pub tone: String,
}

impl From<&LetterForm> for LetterRequest {
    fn from(form: &LetterForm) -> Self {
        Self {
            category: form.letter_type.clone(),
            sub_category: form.purpose.clone(),
            title: form.title.clone(),
            recipient: form.recipient.clone(),
            is_first: form.is_first == "yes",
            prompt: form.content.clone(),
            tone: form.style.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Template {
    #[serde(rename = "template1")]
    Formal,
    #[serde(rename = "template2")]
    Simple,
}

impl Template {
    pub const ALL: [Template; 2] = [Template::Formal, Template::Simple];

    pub fn id(self) -> &'static str {
        match self {
            Template::Formal => "template1",
            Template::Simple => "template2",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.id() == id)
    }

    pub fn name(self) -> &'static str {
        match self {
            Template::Formal => "القالب الرسمي",
            Template::Simple => "القالب المبسط",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Template::Formal => "قالب رسمي بتصميم كلاسيكي مناسب للمراسلات الحكومية والشركات",
            Template::Simple => "قالب مبسط وعملي مناسب للمراسلات العامة",
        }
    }
}

/// Body sent to the archive service once a letter is finalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchiveRecord {
    pub file: Option<String>,
    pub letter_content: String,
    pub letter_type: String,
    pub recipient: String,
    pub title: String,
    pub is_first: String,
    #[serde(rename = "ID")]
    pub id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateBlocked {
    MissingFields,
    NotInPreview,
    TemplateNotSelected,
}

impl CreateBlocked {
    pub fn message(self) -> &'static str {
        match self {
            CreateBlocked::MissingFields | CreateBlocked::NotInPreview => {
                "يرجى ملء جميع الحقول المطلوبة"
            }
            CreateBlocked::TemplateNotSelected => "يرجى اختيار قالب",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CreateStage {
    #[default]
    Form,
    Preview,
}

/// Form → preview → archived state machine for drafting one letter.
#[derive(Debug, Clone, Default)]
pub struct CreateWorkflow {
    stage: CreateStage,
    form: LetterForm,
    generated_letter: String,
    template: Option<Template>,
}

impl CreateWorkflow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_form(form: LetterForm) -> Self {
        Self {
            form,
            ..Self::default()
        }
    }

    /// Rebuilds a workflow that is already showing a generated letter.
    pub fn in_preview(form: LetterForm, generated_letter: String, template: Option<Template>) -> Self {
        Self {
            stage: CreateStage::Preview,
            form,
            generated_letter,
            template,
        }
    }

    pub fn stage(&self) -> CreateStage {
        self.stage
    }

    pub fn form(&self) -> &LetterForm {
        &self.form
    }

    pub fn generated_letter(&self) -> &str {
        &self.generated_letter
    }

    pub fn template(&self) -> Option<Template> {
        self.template
    }

    /// Gate for leaving the form: every required field must be filled.
    pub fn generation_request(&self) -> Result<LetterRequest, CreateBlocked> {
        if !self.form.missing_fields().is_empty() {
            return Err(CreateBlocked::MissingFields);
        }
        Ok(LetterRequest::from(&self.form))
    }

    pub fn enter_preview(&mut self, response: &Value) {
        self.generated_letter = extract_letter_text(response);
        self.stage = CreateStage::Preview;
    }

    pub fn edit_letter(&mut self, text: impl Into<String>) {
        self.generated_letter = text.into();
    }

    pub fn select_template(&mut self, template: Template) {
        self.template = Some(template);
    }

    /// Back to editing the form fields; the generated draft is dropped.
    pub fn back_to_form(&mut self) {
        self.stage = CreateStage::Form;
        self.generated_letter.clear();
        self.template = None;
    }

    /// Gate for archiving: only from preview, with the form still complete
    /// and a template chosen.
    pub fn archive_record(&self, id: String) -> Result<ArchiveRecord, CreateBlocked> {
        if self.stage != CreateStage::Preview {
            return Err(CreateBlocked::NotInPreview);
        }
        if !self.form.missing_fields().is_empty() {
            return Err(CreateBlocked::MissingFields);
        }
        if self.template.is_none() {
            return Err(CreateBlocked::TemplateNotSelected);
        }
        Ok(ArchiveRecord {
            file: None,
            letter_content: self.generated_letter.clone(),
            letter_type: self.form.letter_type.clone(),
            recipient: self.form.recipient.clone(),
            title: self.form.title.clone(),
            is_first: self.form.is_first.clone(),
            id,
        })
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

/// Letter text from a generation reply: `letter`, then `content`, then a
/// fixed fallback.
pub fn extract_letter_text(response: &Value) -> String {
    ["letter", "content"]
        .iter()
        .filter_map(|key| response.get(key).and_then(Value::as_str))
        .find(|text| !text.is_empty())
        .unwrap_or(FALLBACK_LETTER_TEXT)
        .to_string()
}
