use serde::{Deserialize, Serialize};

use super::lenient;

/// Rich text in Atlassian Document Format, as used by `description`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AtlassianDocument {
    #[serde(rename = "type", deserialize_with = "lenient")]
    pub doc_type: String,
    #[serde(deserialize_with = "lenient")]
    pub version: i64,
    #[serde(deserialize_with = "lenient")]
    pub content: Vec<DocumentNode>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentNode {
    #[serde(rename = "type", deserialize_with = "lenient")]
    pub node_type: String,
    #[serde(skip_serializing_if = "Vec::is_empty", deserialize_with = "lenient")]
    pub content: Vec<DocumentNode>,
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "lenient")]
    pub text: String,
    #[serde(skip_serializing_if = "Vec::is_empty", deserialize_with = "lenient")]
    pub marks: Vec<DocumentMark>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentMark {
    #[serde(rename = "type", deserialize_with = "lenient")]
    pub mark_type: String,
}

impl AtlassianDocument {
    /// Flatten the document to plain text, one line per block.
    pub fn plain_text(&self) -> String {
        let mut lines = Vec::new();
        for node in &self.content {
            node.collect_lines(&mut lines);
        }
        lines.join("\n")
    }
}

impl DocumentNode {
    fn is_inline(&self) -> bool {
        matches!(
            self.node_type.as_str(),
            "text" | "hardBreak" | "mention" | "emoji" | "inlineCard" | "date" | "status"
        )
    }

    fn inline_text(&self) -> String {
        match self.node_type.as_str() {
            "text" => self.text.clone(),
            "hardBreak" => "\n".to_string(),
            _ => self.content.iter().map(DocumentNode::inline_text).collect(),
        }
    }

    fn collect_lines(&self, out: &mut Vec<String>) {
        if self.content.iter().any(|child| !child.is_inline()) {
            for child in &self.content {
                child.collect_lines(out);
            }
            return;
        }
        let text = self.inline_text();
        if !text.is_empty() {
            out.push(text);
        }
    }
}
