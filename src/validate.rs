//! Form validation for task drafts.
//!
//! Pure functions of the current field values. The numeric boundaries (5 and
//! 500 characters after trimming) and the title character class (ASCII
//! alphanumerics and spaces) are a contract the controller and the backend
//! both assume; do not change them independently.

pub const MIN_FIELD_LEN: usize = 5;
pub const MAX_FIELD_LEN: usize = 500;

/// A live per-field diagnostic shown while the user types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    TitleCharset,
    TitleLength { len: usize },
    DescriptionLength { len: usize },
}

impl FieldError {
    pub fn message(&self) -> String {
        match self {
            FieldError::TitleCharset => {
                "Title can contain alphabets and numbers only.".to_string()
            }
            FieldError::TitleLength { len } => format!(
                "Title must be {MIN_FIELD_LEN}-{MAX_FIELD_LEN} characters (currently {len})."
            ),
            FieldError::DescriptionLength { len } => format!(
                "Description must be {MIN_FIELD_LEN}-{MAX_FIELD_LEN} characters (currently {len})."
            ),
        }
    }
}

/// Per-field diagnostics for the current form values. Empty (pristine) fields
/// report no error even though submission stays disabled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Validation {
    pub title: Option<FieldError>,
    pub description: Option<FieldError>,
}

impl Validation {
    pub fn check(title: &str, description: &str) -> Self {
        let title = title.trim();
        let description = description.trim();

        // Charset takes display precedence over the length error.
        let title_error = if title.is_empty() {
            None
        } else if !title_charset_ok(title) {
            Some(FieldError::TitleCharset)
        } else if !length_ok(title) {
            Some(FieldError::TitleLength {
                len: title.chars().count(),
            })
        } else {
            None
        };

        let description_error = if description.is_empty() || length_ok(description) {
            None
        } else {
            Some(FieldError::DescriptionLength {
                len: description.chars().count(),
            })
        };

        Self {
            title: title_error,
            description: description_error,
        }
    }

    pub fn is_clean(&self) -> bool {
        self.title.is_none() && self.description.is_none()
    }
}

/// Submission gate: both trimmed lengths in range and the title within its
/// character class. Stricter than `Validation::check` for pristine fields.
pub fn can_submit(title: &str, description: &str) -> bool {
    let title = title.trim();
    let description = description.trim();
    length_ok(title) && length_ok(description) && title_charset_ok(title)
}

fn length_ok(trimmed: &str) -> bool {
    let len = trimmed.chars().count();
    (MIN_FIELD_LEN..=MAX_FIELD_LEN).contains(&len)
}

fn title_charset_ok(trimmed: &str) -> bool {
    trimmed
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == ' ')
}
