//! Tree rendering for scene hierarchies

use console::Style;
use skel_anim::{AnimationClip, BoneTable, SceneNode};

/// Represents a node in a rendered tree
#[derive(Debug, Clone)]
pub struct TreeNode {
    pub name: String,
    pub node_type: NodeType,
    pub children: Vec<TreeNode>,
    pub metadata: Vec<(String, String)>,
}

/// What a scene node is used for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    Root,
    /// Bone driven by a channel of the active clip
    AnimatedBone,
    Bone,
    /// Non-bone node driven by a channel
    Animated,
    /// Node that draws meshes
    Mesh,
    Plain,
}

/// Options for tree rendering
#[derive(Debug, Clone, Default)]
pub struct TreeOptions {
    pub max_depth: Option<usize>,
    pub no_color: bool,
    pub show_metadata: bool,
}

impl TreeNode {
    pub fn new(name: impl Into<String>, node_type: NodeType) -> Self {
        Self {
            name: name.into(),
            node_type,
            children: Vec::new(),
            metadata: Vec::new(),
        }
    }

    /// Add a child node
    pub fn add_child(mut self, child: TreeNode) -> Self {
        self.children.push(child);
        self
    }

    /// Add metadata
    pub fn with_metadata(mut self, key: &str, value: impl ToString) -> Self {
        self.metadata.push((key.to_string(), value.to_string()));
        self
    }

    /// Build a display tree from a scene hierarchy
    pub fn from_scene(node: &SceneNode, bones: &BoneTable, clip: Option<&AnimationClip>) -> Self {
        Self::from_scene_at(node, bones, clip, true)
    }

    fn from_scene_at(
        node: &SceneNode,
        bones: &BoneTable,
        clip: Option<&AnimationClip>,
        is_root: bool,
    ) -> Self {
        let bone = bones.index_of(&node.name);
        let animated = clip.and_then(|c| c.channel(&node.name)).is_some();
        let node_type = match (is_root, bone, animated) {
            (true, _, _) => NodeType::Root,
            (_, Some(_), true) => NodeType::AnimatedBone,
            (_, Some(_), false) => NodeType::Bone,
            (_, None, true) => NodeType::Animated,
            (_, None, false) if !node.meshes.is_empty() => NodeType::Mesh,
            _ => NodeType::Plain,
        };

        let mut tree = TreeNode::new(node.name.clone(), node_type);
        if let Some(index) = bone {
            tree = tree.with_metadata("bone", index);
        }
        if !node.meshes.is_empty() {
            let meshes: Vec<String> = node.meshes.iter().map(ToString::to_string).collect();
            tree = tree.with_metadata("meshes", meshes.join(","));
        }

        node.children.iter().fold(tree, |tree, child| {
            tree.add_child(Self::from_scene_at(child, bones, clip, false))
        })
    }
}

impl NodeType {
    /// Marker shown in front of the node name
    pub fn icon(self) -> &'static str {
        match self {
            NodeType::Root => "◆",
            NodeType::AnimatedBone => "●",
            NodeType::Bone => "○",
            NodeType::Animated => "▶",
            NodeType::Mesh => "▣",
            NodeType::Plain => "·",
        }
    }

    /// Get color style for node type
    pub fn style(self, no_color: bool) -> Style {
        if no_color {
            return Style::new();
        }
        match self {
            NodeType::Root => Style::new().bold().cyan(),
            NodeType::AnimatedBone => Style::new().bold().green(),
            NodeType::Bone => Style::new().green(),
            NodeType::Animated => Style::new().yellow(),
            NodeType::Mesh => Style::new().magenta(),
            NodeType::Plain => Style::new().dim(),
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

    let style = node.node_type.style(options.no_color);
    let connector = if depth == 0 {
        ""
    } else if is_last {
        "└── "
    } else {
        "├── "
    };

    output.push_str(&format!(
        "{}{}{} {}",
        prefix,
        connector,
        node.node_type.icon(),
        style.apply_to(&node.name)
    ));

    if options.show_metadata && !node.metadata.is_empty() {
        let meta: Vec<String> = node
            .metadata
            .iter()
            .map(|(key, value)| format!("{key}:{value}"))
            .collect();
        let meta_style = if options.no_color {
            Style::new()
        } else {
            Style::new().dim()
        };
        output.push_str(&format!(" {}", meta_style.apply_to(format!("[{}]", meta.join(", ")))));
    }
    output.push('\n');

    let child_prefix = if depth == 0 {
        String::new()
    } else {
        format!("{}{}", prefix, if is_last { "    " } else { "│   " })
    };

    for (i, child) in node.children.iter().enumerate() {
        let is_last_child = i == node.children.len() - 1;
        render_node(
            child,
            output,
            &child_prefix,
            is_last_child,
            depth + 1,
            options,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain_options() -> TreeOptions {
        TreeOptions {
            max_depth: None,
            no_color: true,
            show_metadata: true,
        }
    }

    #[test]
    fn test_tree_rendering() {
        let root = TreeNode::new("Scene", NodeType::Root)
            .add_child(
                TreeNode::new("hips", NodeType::AnimatedBone)
                    .with_metadata("bone", 0)
                    .add_child(TreeNode::new("spine", NodeType::Bone).with_metadata("bone", 1)),
            )
            .add_child(TreeNode::new("body", NodeType::Mesh).with_metadata("meshes", "0"));

        let output = render_tree(&root, &plain_options());
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines[0], "◆ Scene");
        assert_eq!(lines[1], "├── ● hips [bone:0]");
        assert_eq!(lines[2], "│   └── ○ spine [bone:1]");
        assert_eq!(lines[3], "└── ▣ body [meshes:0]");
    }

    #[test]
    fn test_depth_limit() {
        let root = TreeNode::new("Scene", NodeType::Root).add_child(
            TreeNode::new("a", NodeType::Plain).add_child(TreeNode::new("b", NodeType::Plain)),
        );
        let options = TreeOptions {
            max_depth: Some(1),
            ..plain_options()
        };

        let output = render_tree(&root, &options);
        assert!(output.contains("a"));
        assert!(!output.contains("b"));
    }
}
