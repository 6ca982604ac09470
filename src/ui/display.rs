/// Default embed colour
pub const DEFAULT_COLOR: u32 = 0x2F3136;

/// One pre-rendered page of content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayUnit {
    pub title: Option<String>,

    /// Link attached to the title
    pub url: Option<String>,

    pub description: Option<String>,

    /// Large image shown below the description
    pub image: Option<String>,

    pub thumbnail: Option<String>,

    pub color: u32,
}

impl Default for DisplayUnit {
    fn default() -> Self {
        Self {
            title: None,
            url: None,
            description: None,
            image: None,
            thumbnail: None,
            color: DEFAULT_COLOR,
        }
    }
}

impl DisplayUnit {
    /// Create a unit with only a body
    pub fn with_description(description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
            ..Self::default()
        }
    }

    pub fn titled(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn linked(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn described(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn with_thumbnail(mut self, thumbnail: impl Into<String>) -> Self {
        self.thumbnail = Some(thumbnail.into());
        self
    }

    pub fn with_color(mut self, color: u32) -> Self {
        self.color = color;
        self
    }
}
