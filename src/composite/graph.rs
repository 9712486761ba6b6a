use std::sync::Arc;

use crate::{
    assets::source::ImageAsset,
    foundation::core::Channel,
    foundation::error::{PackError, PackResult},
    foundation::scratch::unique_token,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
/// Index of a node inside a [`RoutingGraph`].
pub struct NodeId(pub(crate) u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// One channel output of a node.
pub struct Socket {
    /// Node producing the value.
    pub node: NodeId,
    /// Channel of that node's output.
    pub channel: Channel,
}

#[derive(Clone, Debug)]
/// Channel-routing graph node.
pub enum Node {
    /// Reads pixels of a source image.
    ImageSource {
        /// Image to read.
        asset: Arc<ImageAsset>,
    },
    /// Splits an image source into its four channel outputs.
    Separate {
        /// Upstream [`Node::ImageSource`].
        input: NodeId,
    },
    /// Assembles four channels; unlinked inputs use their default constant.
    Combine {
        /// Per-input constant used when nothing is linked.
        defaults: [f32; 4],
        /// Per-input link from a [`Node::Separate`] channel.
        inputs: [Option<Socket>; 4],
    },
    /// Final image, taken from a [`Node::Combine`].
    Output {
        /// Upstream combine node.
        input: NodeId,
    },
}

#[derive(Clone, Debug, Default)]
/// Directed graph routing source channels into one combined RGBA image.
///
/// ```text
/// [ImageSource]-->[Separate]--src-->[Combine dst]-->[Output]
/// ```
pub struct RoutingGraph {
    nodes: Vec<Node>,
    output: Option<NodeId>,
}

impl RoutingGraph {
    /// Empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// All nodes in insertion order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Node count.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Declared output node, if any.
    pub fn output(&self) -> Option<NodeId> {
        self.output
    }

    /// Lookup a node.
    pub fn node(&self, id: NodeId) -> PackResult<&Node> {
        self.nodes
            .get(id.0 as usize)
            .ok_or_else(|| PackError::engine(format!("unknown node id {}", id.0)))
    }

    /// Add an image source node.
    pub fn add_image(&mut self, asset: Arc<ImageAsset>) -> PackResult<NodeId> {
        self.push(Node::ImageSource { asset })
    }

    /// Add a channel-separate node fed by image source `input`.
    pub fn add_separate(&mut self, input: NodeId) -> PackResult<NodeId> {
        match self.node(input)? {
            Node::ImageSource { .. } => self.push(Node::Separate { input }),
            _ => Err(PackError::engine("separate input must be an image source")),
        }
    }

    /// Add a combine node with every input defaulting to `default`.
    pub fn add_combine(&mut self, default: f32) -> PackResult<NodeId> {
        self.push(Node::Combine {
            defaults: [default; 4],
            inputs: [None; 4],
        })
    }

    /// Override the default constant of combine input `dst`.
    pub fn set_default(&mut self, combine: NodeId, dst: Channel, value: f32) -> PackResult<()> {
        let Node::Combine { defaults, .. } = self.node_mut(combine)? else {
            return Err(PackError::engine("set_default target must be a combine node"));
        };
        defaults[dst.index()] = value;
        Ok(())
    }

    /// Route channel `src` of separate node `from` into combine input `dst`.
    pub fn link(
        &mut self,
        from: NodeId,
        src: Channel,
        combine: NodeId,
        dst: Channel,
    ) -> PackResult<()> {
        if !matches!(self.node(from)?, Node::Separate { .. }) {
            return Err(PackError::engine("link source must be a separate node"));
        }
        let Node::Combine { inputs, .. } = self.node_mut(combine)? else {
            return Err(PackError::engine("link target must be a combine node"));
        };
        inputs[dst.index()] = Some(Socket {
            node: from,
            channel: src,
        });
        Ok(())
    }

    /// Add the output node fed by combine node `input`, replacing any previous output.
    pub fn add_output(&mut self, input: NodeId) -> PackResult<NodeId> {
        if !matches!(self.node(input)?, Node::Combine { .. }) {
            return Err(PackError::engine("output input must be a combine node"));
        }
        let id = self.push(Node::Output { input })?;
        self.output = Some(id);
        Ok(id)
    }

    fn node_mut(&mut self, id: NodeId) -> PackResult<&mut Node> {
        self.nodes
            .get_mut(id.0 as usize)
            .ok_or_else(|| PackError::engine(format!("unknown node id {}", id.0)))
    }

    fn push(&mut self, node: Node) -> PackResult<NodeId> {
        let id = NodeId(
            self.nodes
                .len()
                .try_into()
                .map_err(|_| PackError::engine("node id overflow"))?,
        );
        self.nodes.push(node);
        Ok(id)
    }
}

#[derive(Debug)]
/// Ephemeral, uniquely named execution context holding one routing graph.
///
/// The graph (and the image handles it holds) is torn down when the session drops.
pub struct RenderSession {
    name: String,
    graph: RoutingGraph,
}

impl RenderSession {
    /// New empty session named `chanpack:<tag>:<unique token>`.
    pub fn new(tag: &str) -> Self {
        Self {
            name: format!("chanpack:{tag}:{}", unique_token()),
            graph: RoutingGraph::new(),
        }
    }

    /// Unique session name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Session graph.
    pub fn graph(&self) -> &RoutingGraph {
        &self.graph
    }

    /// Mutable session graph.
    pub fn graph_mut(&mut self) -> &mut RoutingGraph {
        &mut self.graph
    }
}

impl Drop for RenderSession {
    fn drop(&mut self) {
        tracing::trace!(session = %self.name, nodes = self.graph.len(), "tearing down render session");
        self.graph = RoutingGraph::new();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/composite/graph.rs"]
mod tests;
