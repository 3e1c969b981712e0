//! Undecoded instruction nodes, as produced by a source reader.
//!
//! Nothing here is validated. Attributes may be missing, children may
//! carry any tag and appear in any order; the loader decides what is legal.

/// One instruction node from the source document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawInstruction {
    /// The `order` attribute, if present.
    pub order: Option<String>,
    /// The `opcode` attribute, if present.
    pub opcode: Option<String>,
    /// Child elements in document order.
    pub children: Vec<RawArgument>,
}

/// One child element of an instruction node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawArgument {
    /// Element tag, expected to be `arg1`, `arg2`, or `arg3`.
    pub tag: String,
    /// The `type` attribute, if present.
    pub kind: Option<String>,
    /// Text content, untrimmed.
    pub text: String,
}

impl RawInstruction {
    /// Create a node with both attributes present and no children.
    pub fn new(order: impl Into<String>, opcode: impl Into<String>) -> Self {
        Self {
            order: Some(order.into()),
            opcode: Some(opcode.into()),
            children: Vec::new(),
        }
    }

    /// Append an `argN` child, numbering it after the existing children.
    pub fn arg(mut self, kind: impl Into<String>, text: impl Into<String>) -> Self {
        let tag = format!("arg{}", self.children.len() + 1);
        self.children.push(RawArgument::new(tag, kind, text));
        self
    }

    /// Append a child with an explicit tag.
    pub fn child(mut self, child: RawArgument) -> Self {
        self.children.push(child);
        self
    }
}

impl RawArgument {
    /// Create a child element with a `type` attribute.
    pub fn new(tag: impl Into<String>, kind: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            kind: Some(kind.into()),
            text: text.into(),
        }
    }
}
