use serde::{Deserialize, Serialize};

/// A node of the host's bookmark tree: exactly one of folder or leaf.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BookmarkNode {
    Folder(BookmarkFolder),
    Leaf(BookmarkLeaf),
}

/// A bookmark folder. Folders carry children and never a URL.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BookmarkFolder {
    pub id: String,
    pub parent_id: Option<String>,
    pub index: usize,
    pub title: String,
    pub children: Vec<BookmarkNode>,
}

/// A saved page. Leaves always live inside some folder.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BookmarkLeaf {
    pub id: String,
    pub parent_id: String,
    pub index: usize,
    pub title: String,
    pub url: String,
}

impl BookmarkNode {
    pub fn id(&self) -> &str {
        match self {
            BookmarkNode::Folder(f) => &f.id,
            BookmarkNode::Leaf(l) => &l.id,
        }
    }

    pub fn parent_id(&self) -> Option<&str> {
        match self {
            BookmarkNode::Folder(f) => f.parent_id.as_deref(),
            BookmarkNode::Leaf(l) => Some(&l.parent_id),
        }
    }

    pub fn index(&self) -> usize {
        match self {
            BookmarkNode::Folder(f) => f.index,
            BookmarkNode::Leaf(l) => l.index,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            BookmarkNode::Folder(f) => &f.title,
            BookmarkNode::Leaf(l) => &l.title,
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, BookmarkNode::Folder(_))
    }

    /// Children of a folder; leaves have none.
    pub fn children(&self) -> &[BookmarkNode] {
        match self {
            BookmarkNode::Folder(f) => &f.children,
            BookmarkNode::Leaf(_) => &[],
        }
    }

    /// Returns a copy of this node without its subtree, as single-node host
    /// lookups report it.
    pub fn shallow(&self) -> BookmarkNode {
        match self {
            BookmarkNode::Folder(f) => BookmarkNode::Folder(BookmarkFolder {
                children: Vec::new(),
                ..f.clone()
            }),
            BookmarkNode::Leaf(l) => BookmarkNode::Leaf(l.clone()),
        }
    }
}

/// Target position of a bookmark move: new parent folder and index among its children.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BookmarkDestination {
    pub parent_id: String,
    pub index: usize,
}
