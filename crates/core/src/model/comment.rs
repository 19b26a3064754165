use declscope_api::{Deprecation, Description, DescriptionItem, MemberProperties};
use serde::Deserialize;

/// Where a declaration was written.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Source {
    #[serde(rename = "fileName")]
    pub file_name: String,
    #[serde(default)]
    pub line: u32,
}

impl Source {
    /// Absolute file names point outside the analyzed tree (e.g. `/usr/lib`).
    pub fn is_external(&self) -> bool {
        self.file_name.starts_with('/')
    }
}

#[derive(Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct Flags {
    pub is_abstract: bool,
    pub is_exported: bool,
    pub is_optional: bool,
    pub is_private: bool,
    pub is_rest: bool,
    pub is_static: bool,
}

impl Flags {
    pub fn member_properties(&self) -> MemberProperties {
        MemberProperties {
            is_abstract: self.is_abstract,
            is_optional: self.is_optional,
            is_static: self.is_static,
            is_private: self.is_private,
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum CommentPart {
    Text { text: String },
    Code { text: String },
    InlineTag {
        tag: String,
        #[serde(default)]
        text: String,
    },
}

impl CommentPart {
    pub fn text(&self) -> &str {
        match self {
            CommentPart::Text { text }
            | CommentPart::Code { text }
            | CommentPart::InlineTag { text, .. } => text,
        }
    }

    fn to_ir(&self) -> DescriptionItem {
        match self {
            CommentPart::Code { text } => DescriptionItem::Code(text.clone()),
            other => DescriptionItem::Text(other.text().to_string()),
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct BlockTag {
    /// Tag name including the leading `@`
    pub tag: String,
    #[serde(default)]
    pub content: Vec<CommentPart>,
}

impl BlockTag {
    fn is(&self, name: &str) -> bool {
        self.tag.strip_prefix('@').unwrap_or(&self.tag) == name
    }
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct Comment {
    pub summary: Vec<CommentPart>,
    pub block_tags: Vec<BlockTag>,
}

fn description(parts: &[CommentPart]) -> Description {
    parts.iter().map(CommentPart::to_ir).collect()
}

impl Comment {
    /// True when nothing was authored: no summary and no block tags.
    pub fn is_empty(&self) -> bool {
        self.summary.is_empty() && self.block_tags.is_empty()
    }

    pub fn description(&self) -> Description {
        description(&self.summary)
    }

    fn tags<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a BlockTag> + 'a {
        self.block_tags.iter().filter(move |t| t.is(name))
    }

    pub fn has_tag(&self, name: &str) -> bool {
        self.tags(name).next().is_some()
    }

    /// One description per occurrence of `@name`.
    pub fn tag_list(&self, name: &str) -> Vec<Description> {
        self.tags(name).map(|t| description(&t.content)).collect()
    }

    /// The content of a tag that may appear at most once.
    pub fn tag_one(&self, name: &str) -> Option<Description> {
        let mut tags = self.tags(name);
        let first = tags.next()?;
        if tags.next().is_some() {
            tracing::warn!(tag = name, "tag appears more than once; using the first");
        }
        Some(description(&first.content))
    }

    /// Raw text of the first `@name` tag.
    pub fn tag_text(&self, name: &str) -> Option<String> {
        self.tags(name)
            .next()
            .map(|t| t.content.iter().map(CommentPart::text).collect())
    }

    pub fn deprecation(&self) -> Deprecation {
        match self.tag_one("deprecated") {
            None => Deprecation::Flag(false),
            Some(reason) if reason.is_empty() => Deprecation::Flag(true),
            Some(reason) => Deprecation::Reason(reason),
        }
    }
}
