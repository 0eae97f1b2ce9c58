//! Tree structure rendering for project summaries

use console::Style;
use std::collections::BTreeMap;

/// Represents a node in a tree structure
#[derive(Debug, Clone)]
pub struct TreeNode {
    pub name: String,
    pub node_type: NodeType,
    pub children: Vec<TreeNode>,
    pub metadata: BTreeMap<String, String>,
    pub images: Vec<ImageRef>,
}

/// Types of nodes in the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    Root,
    Header,
    Symbol,
    Frame,
    Entity,
    Animation,
    Timeline,
}

/// Source image referenced by an atlas frame
#[derive(Debug, Clone)]
pub struct ImageRef {
    pub path: String,
    pub exists: Option<bool>,
}

/// Options for tree rendering
#[derive(Debug, Clone)]
pub struct TreeOptions {
    pub max_depth: Option<usize>,
    pub show_images: bool,
    pub no_color: bool,
    pub show_metadata: bool,
    pub compact: bool,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            max_depth: None,
            show_images: true,
            no_color: false,
            show_metadata: true,
            compact: false,
        }
    }
}

impl TreeNode {
    /// Create a new tree node
    pub fn new(name: impl Into<String>, node_type: NodeType) -> Self {
        Self {
            name: name.into(),
            node_type,
            children: Vec::new(),
            metadata: BTreeMap::new(),
            images: Vec::new(),
        }
    }

    /// Add a child node
    pub fn add_child(mut self, child: TreeNode) -> Self {
        self.children.push(child);
        self
    }

    /// Add metadata
    pub fn with_metadata(mut self, key: &str, value: impl ToString) -> Self {
        self.metadata.insert(key.to_string(), value.to_string());
        self
    }

    /// Add a source image reference
    pub fn with_image(mut self, path: &str, exists: Option<bool>) -> Self {
        self.images.push(ImageRef {
            path: path.to_string(),
            exists,
        });
        self
    }
}

impl ImageRef {
    /// Color style based on existence
    pub fn style(&self, no_color: bool) -> Style {
        if no_color {
            Style::new()
        } else {
            match self.exists {
                Some(true) => Style::new().green(),
                Some(false) => Style::new().red(),
                None => Style::new().yellow(),
            }
        }
    }
}

impl NodeType {
    /// Emoji icon for node type
    pub fn icon(self) -> &'static str {
        match self {
            NodeType::Root => "📁",
            NodeType::Header => "📋",
            NodeType::Symbol => "🗂️",
            NodeType::Frame => "🖼️",
            NodeType::Entity => "🧍",
            NodeType::Animation => "📽️",
            NodeType::Timeline => "🎞️",
        }
    }

    /// Color style for node type
    pub fn style(self, no_color: bool) -> Style {
        if no_color {
            Style::new()
        } else {
            match self {
                NodeType::Root => Style::new().bold().cyan(),
                NodeType::Header => Style::new().bold().yellow(),
                NodeType::Symbol => Style::new().blue(),
                NodeType::Frame => Style::new().green(),
                NodeType::Entity => Style::new().magenta(),
                NodeType::Animation => Style::new().cyan(),
                NodeType::Timeline => Style::new().dim(),
            }
        }
    }
}

/// Render a tree structure to string
pub fn render_tree(root: &TreeNode, options: &TreeOptions) -> String {
    let mut output = String::new();
    render_node(root, &mut output, "", true, 0, options);
    output
}

fn render_node(
    node: &TreeNode,
    output: &mut String,
    prefix: &str,
    is_last: bool,
    depth: usize,
    options: &TreeOptions,
) {
    if let Some(max_depth) = options.max_depth
        && depth > max_depth
    {
        return;
    }

    let icon = node.node_type.icon();
    let style = node.node_type.style(options.no_color);
    let connector = if depth == 0 {
        ""
    } else if is_last {
        "└── "
    } else {
        "├── "
    };

    let mut line = format!("{prefix}{connector}{icon} {}", style.apply_to(&node.name));

    if options.show_metadata && options.compact && !node.metadata.is_empty() {
        let meta_parts: Vec<String> = node
            .metadata
            .iter()
            .map(|(key, value)| format!("{key}:{value}"))
            .collect();
        line.push_str(&format!(" [{}]", meta_parts.join(", ")));
    }

    output.push_str(&line);
    output.push('\n');

    let child_prefix = if depth == 0 {
        ""
    } else if is_last {
        "    "
    } else {
        "│   "
    };

    if options.show_metadata && !options.compact && !node.metadata.is_empty() {
        let meta_prefix = format!("{prefix}{child_prefix}    ");
        let meta_style = if options.no_color {
            Style::new()
        } else {
            Style::new().dim()
        };

        for (key, value) in &node.metadata {
            output.push_str(&format!(
                "{meta_prefix}🏷️  {}: {value}\n",
                meta_style.apply_to(key)
            ));
        }
    }

    if options.show_images && !node.images.is_empty() {
        let ref_prefix = format!("{prefix}{child_prefix}    ");

        for image in &node.images {
            let style = image.style(options.no_color);
            output.push_str(&format!(
                "{ref_prefix}└─→ 🖼️ {}\n",
                style.apply_to(&image.path)
            ));
        }
    }

    if !node.children.is_empty() {
        let new_prefix = if depth == 0 {
            String::new()
        } else {
            format!("{prefix}{child_prefix}")
        };

        for (i, child) in node.children.iter().enumerate() {
            let is_last_child = i == node.children.len() - 1;
            render_node(
                child,
                output,
                &new_prefix,
                is_last_child,
                depth + 1,
                options,
            );
        }
    }
}
