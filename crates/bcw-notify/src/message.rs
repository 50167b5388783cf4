use serde::Serialize;

/// Sidebar colour for brand account events.
pub const COLOR_BRAND: u32 = 0x0034_98DB;
/// Sidebar colour for a successfully verified influencer.
pub const COLOR_VERIFIED: u32 = 0x002E_CC71;
/// Sidebar colour for a lookup that found no account.
pub const COLOR_NOT_FOUND: u32 = 0x00E7_4C3C;

/// One name/value row rendered under the description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

/// A transport-independent chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub description: String,
    /// Packed `0xRRGGBB`.
    pub color: u32,
    pub fields: Vec<Field>,
}

impl Notification {
    pub fn new(title: impl Into<String>, description: impl Into<String>, color: u32) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            color,
            fields: Vec::new(),
        }
    }

    #[must_use]
    pub fn field(mut self, name: impl Into<String>, value: impl ToString, inline: bool) -> Self {
        self.fields.push(Field {
            name: name.into(),
            value: value.to_string(),
            inline,
        });
        self
    }
}
