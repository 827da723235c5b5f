//! The accessibility node, as fed into the Outline Builder (spec §3).

/// A stable node identifier within one accessibility-tree snapshot.
pub type NodeId = String;

/// One node of the flat accessibility-tree node list the Outline Builder
/// consumes. Lives for one Outline-Builder invocation (spec §3 Lifecycle).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessibilityNode {
    pub id: NodeId,
    pub parent_id: Option<NodeId>,
    /// Raw role string, in the browser's own tree vocabulary (not yet
    /// mapped to ARIA — see `roles::map_role`).
    pub role: String,
    pub name: Option<String>,
    /// Opaque integer used to later address the element in the browser.
    pub backend_node_id: Option<i64>,
    pub ignored: bool,
    /// Pre-rendered bracket-tag bodies emitted as `[tag]` suffixes, e.g.
    /// `"focused"`, `"level=2"`, `"disabled=false"` (spec §3 `<suffix>`).
    pub attributes: Vec<String>,
    /// When set, rendered as a synthetic `- /url: <value>` child line
    /// immediately after this node's own line (spec §4.2 reducer 2).
    pub url: Option<String>,
    /// When set, rendered as a synthetic `- /placeholder: <value>` child
    /// line immediately after this node's own line (spec §4.2 reducer 3).
    pub placeholder: Option<String>,
}

impl AccessibilityNode {
    pub fn new(id: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            parent_id: None,
            role: role.into(),
            name: None,
            backend_node_id: None,
            ignored: false,
            attributes: Vec::new(),
            url: None,
            placeholder: None,
        }
    }

    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_backend_node_id(mut self, id: i64) -> Self {
        self.backend_node_id = Some(id);
        self
    }

    pub fn ignored(mut self) -> Self {
        self.ignored = true;
        self
    }

    pub fn with_attribute(mut self, tag: impl Into<String>) -> Self {
        self.attributes.push(tag.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn name_str(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }
}
