//! Creation of the preview and placeholder nodes.

use sortable_core::geometry::ClientRect;

use crate::DragId;
use crate::host::{DomHost, NodeId};
use crate::styling;

pub const PREVIEW_CLASS: &str = "sortable-drag-preview";
pub const PLACEHOLDER_CLASS: &str = "sortable-drag-placeholder";
/// Added to the preview while it transitions to the drop position.
pub const ANIMATING_CLASS: &str = "sortable-drag-animating";

/// Builds the stand-in nodes for a dragged item.
///
/// The engine treats both nodes as opaque: it inserts, moves and finally
/// removes them.
pub trait PreviewFactory<H: DomHost + ?Sized> {
    /// Node that follows the pointer. `root_rect` is where the item was when
    /// the drag started.
    fn create_preview(&self, host: &H, item: DragId, root: NodeId, root_rect: ClientRect) -> NodeId;

    /// Node that holds the item's slot in a list.
    fn create_placeholder(&self, host: &H, item: DragId, root: NodeId) -> NodeId;
}

/// Deep-clones the root element for both the preview and the placeholder.
#[derive(Debug, Default, Clone, Copy)]
pub struct CloneFactory;

impl<H: DomHost + ?Sized> PreviewFactory<H> for CloneFactory {
    fn create_preview(&self, host: &H, _item: DragId, root: NodeId, root_rect: ClientRect) -> NodeId {
        let preview = host.clone_node(root);
        for (name, value) in [
            ("width", format!("{}px", root_rect.width)),
            ("height", format!("{}px", root_rect.height)),
            (styling::POINTER_EVENTS, "none".to_owned()),
            ("margin", "0".to_owned()),
            (styling::POSITION, "fixed".to_owned()),
            ("top", "0".to_owned()),
            ("left", "0".to_owned()),
            ("z-index", "1000".to_owned()),
        ] {
            host.set_style_property(preview, name, &value);
        }
        host.set_visible(preview, true);
        host.toggle_class(preview, PREVIEW_CLASS, true);
        preview
    }

    fn create_placeholder(&self, host: &H, _item: DragId, root: NodeId) -> NodeId {
        let placeholder = host.clone_node(root);
        host.set_visible(placeholder, true);
        host.toggle_class(placeholder, PLACEHOLDER_CLASS, true);
        placeholder
    }
}
