//! Data model shared by the transcoder, parser and CSV writer.

/// CSV column names, in output order.
pub const HEADERS: [&str; 9] = [
    "Application",
    "Box Location",
    "Box Type",
    "Group Type",
    "Group Title",
    "Box ID",
    "Box Title",
    "Arrow Direction",
    "Arrow Description",
];

/// Group title assigned whenever a section names its application.
pub const INTEGRATIONS_GROUP: &str = "Integrations";

/// One integration box, i.e. one CSV data row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub application: String,
    pub box_location: String,
    pub box_type: String,
    pub group_type: String,
    pub group_title: String,
    pub box_id: String,
    pub box_title: String,
    pub arrow_direction: String,
    pub arrow_description: String,
}

impl Default for Record {
    fn default() -> Self {
        Self {
            application: String::new(),
            box_location: "External".to_string(),
            box_type: "Integration".to_string(),
            group_type: "Topic".to_string(),
            group_title: String::new(),
            box_id: String::new(),
            box_title: String::new(),
            arrow_direction: "To".to_string(),
            arrow_description: String::new(),
        }
    }
}

impl Record {
    /// A record is only emitted once both its application and box id are known.
    pub fn is_complete(&self) -> bool {
        !self.application.is_empty() && !self.box_id.is_empty()
    }

    /// Field values in [`HEADERS`] order.
    pub fn fields(&self) -> [&str; 9] {
        [
            self.application.as_str(),
            self.box_location.as_str(),
            self.box_type.as_str(),
            self.group_type.as_str(),
            self.group_title.as_str(),
            self.box_id.as_str(),
            self.box_title.as_str(),
            self.arrow_direction.as_str(),
            self.arrow_description.as_str(),
        ]
    }
}

/// Paragraph-level view of a word-processor document.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct WordDocument {
    pub paragraphs: Vec<Paragraph>,
}

/// A paragraph: its style display name (e.g. "Heading 2") and plain text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paragraph {
    pub style: String,
    pub text: String,
}

/// Style name of body text.
pub const NORMAL_STYLE: &str = "Normal";

impl Paragraph {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            style: NORMAL_STYLE.to_string(),
            text: text.into(),
        }
    }

    pub fn empty() -> Self {
        Self::plain(String::new())
    }

    pub fn heading(level: usize, text: impl Into<String>) -> Self {
        Self {
            style: format!("Heading {}", level),
            text: text.into(),
        }
    }
}
