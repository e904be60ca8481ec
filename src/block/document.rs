//! JSON block documents
//!
//! Mirrors the editor's serialization: value and statement inputs both hold a
//! `block` (or a `shadow` standing in for it), and statement sequences are
//! linked through each block's `next` connection.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{BlockNode, FieldValue};
use crate::errors::{line_col_to_offset, BlockgenError, BlockgenResult, SourceSpan};

/// A block as serialized by the editor
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, FieldValue>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub inputs: BTreeMap<String, Input>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<Box<Input>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_state: Option<ExtraState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// A connection to a child block
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Input {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block: Option<Box<Block>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadow: Option<Box<Block>>,
}

impl Input {
    /// The connected block, falling back to the shadow block
    pub fn target(&self) -> Option<&Block> {
        self.block.as_deref().or(self.shadow.as_deref())
    }
}

/// Shape information for blocks with a variable number of inputs
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtraState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub else_if_count: Option<usize>,
    #[serde(default)]
    pub has_else: bool,
}

impl Block {
    pub fn new(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn with_field(mut self, name: &str, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(name.to_string(), value.into());
        self
    }

    pub fn with_input(mut self, name: &str, block: Block) -> Self {
        self.inputs.insert(
            name.to_string(),
            Input {
                block: Some(Box::new(block)),
                shadow: None,
            },
        );
        self
    }

    /// Connect a sequence of statements, chaining them through `next`
    pub fn with_statements(mut self, name: &str, blocks: Vec<Block>) -> Self {
        if let Some(first) = chain(blocks) {
            self.inputs.insert(
                name.to_string(),
                Input {
                    block: Some(Box::new(first)),
                    shadow: None,
                },
            );
        }
        self
    }

    pub fn with_next(mut self, block: Block) -> Self {
        self.next = Some(Box::new(Input {
            block: Some(Box::new(block)),
            shadow: None,
        }));
        self
    }

    pub fn with_extra(mut self, extra: ExtraState) -> Self {
        self.extra_state = Some(extra);
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// The block following this one in its statement sequence
    pub fn next_block(&self) -> Option<&Block> {
        self.next.as_deref().and_then(Input::target)
    }
}

/// Link blocks into one statement chain, returning its head
pub fn chain(blocks: Vec<Block>) -> Option<Block> {
    blocks.into_iter().rev().fold(None, |next, block| {
        Some(match next {
            Some(next) => block.with_next(next),
            None => block,
        })
    })
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Number(n)
    }
}

impl From<i32> for FieldValue {
    fn from(n: i32) -> Self {
        FieldValue::Number(f64::from(n))
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl BlockNode for Block {
    fn kind(&self) -> &str {
        &self.kind
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn input(&self, name: &str) -> Option<&dyn BlockNode> {
        self.inputs
            .get(name)
            .and_then(Input::target)
            .map(|b| b as &dyn BlockNode)
    }

    fn statements(&self, name: &str) -> Vec<&dyn BlockNode> {
        let mut out: Vec<&dyn BlockNode> = Vec::new();
        let mut current = self.inputs.get(name).and_then(Input::target);
        while let Some(block) = current {
            out.push(block);
            current = block.next_block();
        }
        out
    }

    fn next(&self) -> Option<&dyn BlockNode> {
        self.next_block().map(|b| b as &dyn BlockNode)
    }

    fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    fn fields(&self) -> Vec<(&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v)).collect()
    }

    fn children(&self) -> Vec<&dyn BlockNode> {
        let mut out: Vec<&dyn BlockNode> = self
            .inputs
            .values()
            .filter_map(Input::target)
            .map(|b| b as &dyn BlockNode)
            .collect();
        if let Some(next) = self.next_block() {
            out.push(next);
        }
        out
    }

    fn extra_count(&self, key: &str) -> Option<usize> {
        let extra = self.extra_state.as_ref()?;
        match key {
            "itemCount" => extra.item_count,
            "elseIfCount" => extra.else_if_count,
            _ => None,
        }
    }

    fn extra_flag(&self, key: &str) -> bool {
        match (key, &self.extra_state) {
            ("hasElse", Some(extra)) => extra.has_else,
            _ => false,
        }
    }

    fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }
}

/// A workspace: the top-level block stacks of one program
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Document {
    pub blocks: Vec<Block>,
}

/// Either `{"blocks": [..]}` or the editor's `{"blocks": {"blocks": [..]}}`
#[derive(Deserialize)]
#[serde(untagged)]
enum RawBlocks {
    Flat(Vec<Block>),
    Nested {
        #[serde(default)]
        blocks: Vec<Block>,
    },
}

#[derive(Deserialize)]
struct RawDocument {
    #[serde(default)]
    blocks: Option<RawBlocks>,
}

impl Document {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    /// Parse a document from its JSON text
    pub fn from_json(source: &str) -> BlockgenResult<Self> {
        let raw: RawDocument = serde_json::from_str(source).map_err(|e| {
            let offset = line_col_to_offset(source, e.line(), e.column());
            let end = (offset + 1).min(source.len()).max(offset);
            BlockgenError::document(e.to_string(), SourceSpan::new(offset, end))
        })?;
        let blocks = match raw.blocks {
            Some(RawBlocks::Flat(blocks)) | Some(RawBlocks::Nested { blocks }) => blocks,
            None => Vec::new(),
        };
        log::debug!("loaded document with {} top-level stacks", blocks.len());
        Ok(Self { blocks })
    }

    /// The top-level stacks as block nodes
    pub fn roots(&self) -> Vec<&dyn BlockNode> {
        self.blocks.iter().map(|b| b as &dyn BlockNode).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flat_document() {
        let doc = Document::from_json(
            r#"{"blocks": [{"type": "math_number", "id": "n1", "fields": {"NUM": 5}}]}"#,
        )
        .unwrap();
        assert_eq!(doc.blocks.len(), 1);
        assert_eq!(doc.blocks[0].kind, "math_number");
        assert_eq!(doc.blocks[0].field("NUM"), Some(&FieldValue::Number(5.0)));
    }

    #[test]
    fn test_parse_editor_document() {
        let doc = Document::from_json(
            r#"{
                "blocks": {
                    "languageVersion": 0,
                    "blocks": [
                        {
                            "type": "controls_repeat_ext",
                            "id": "r1",
                            "x": 10,
                            "y": 20,
                            "inputs": {
                                "TIMES": {"shadow": {"type": "math_number", "id": "s1", "fields": {"NUM": 3}}},
                                "DO": {"block": {
                                    "type": "controls_flow_statements", "id": "f1",
                                    "fields": {"FLOW": "BREAK"},
                                    "next": {"block": {"type": "controls_flow_statements", "id": "f2", "fields": {"FLOW": "CONTINUE"}}}
                                }}
                            }
                        }
                    ]
                }
            }"#,
        )
        .unwrap();
        let repeat = &doc.blocks[0];
        assert_eq!(repeat.input("TIMES").map(|b| b.id()), Some("s1"));
        let body: Vec<_> = repeat.statements("DO").iter().map(|b| b.id().to_string()).collect();
        assert_eq!(body, vec!["f1", "f2"]);
    }

    #[test]
    fn test_block_wins_over_shadow() {
        let doc = Document::from_json(
            r#"{"blocks": [{"type": "logic_negate", "inputs": {"BOOL": {
                "shadow": {"type": "logic_boolean", "id": "s", "fields": {"BOOL": "TRUE"}},
                "block": {"type": "variables_get", "id": "v", "fields": {"VAR": "done"}}
            }}}]}"#,
        )
        .unwrap();
        assert_eq!(doc.blocks[0].input("BOOL").map(|b| b.id()), Some("v"));
    }

    #[test]
    fn test_parse_error_has_span() {
        let source = "{\"blocks\": [\n  {\"type\": }\n]}";
        let err = Document::from_json(source).unwrap_err();
        let span = err.span().expect("document errors carry a span");
        assert!(span.start > 0 && span.start <= source.len());
    }

    #[test]
    fn test_statement_chain_builder() {
        let block = Block::new("forever", "f").with_statements(
            "STMTS",
            vec![Block::new("wait", "a"), Block::new("wait", "b"), Block::new("wait", "c")],
        );
        let ids: Vec<_> = block.statements("STMTS").iter().map(|b| b.id().to_string()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert!(block.statements("MISSING").is_empty());
    }

    #[test]
    fn test_children_include_next() {
        let block = Block::new("wait", "a").with_next(Block::new("wait", "b"));
        let ids: Vec<_> = block.children().iter().map(|b| b.id().to_string()).collect();
        assert_eq!(ids, vec!["b"]);
    }
}
