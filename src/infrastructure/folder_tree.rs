use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Handle(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Item {
    Folder(Handle),
    /// Position in the caller's bookmark list.
    Link(usize),
}

#[derive(Debug, Clone, Default)]
pub struct FolderNode {
    pub name: String,
    pub items: Vec<Item>,
    pub depth: usize,
}

/// Folder hierarchy rebuilt from `folder_path`s, children in first-seen order.
#[derive(Debug, Clone)]
pub struct FolderTree {
    pub nodes: Vec<FolderNode>,
    child_index: HashMap<(Handle, String), Handle>,
}

impl Default for FolderTree {
    fn default() -> Self {
        Self::new()
    }
}

impl FolderTree {
    pub const ROOT: Handle = Handle(0);

    pub fn new() -> Self {
        Self {
            nodes: vec![FolderNode::default()],
            child_index: HashMap::new(),
        }
    }

    /// Folder at `path` below the root, creating missing folders on the way.
    pub fn folder_for(&mut self, path: &[String]) -> Handle {
        let mut cur = Self::ROOT;
        for name in path {
            let key = (cur, name.clone());
            cur = match self.child_index.get(&key) {
                Some(&h) => h,
                None => {
                    let h = Handle(self.nodes.len());
                    let depth = self.nodes[cur.0].depth + 1;
                    self.nodes.push(FolderNode {
                        name: name.clone(),
                        items: Vec::new(),
                        depth,
                    });
                    self.nodes[cur.0].items.push(Item::Folder(h));
                    self.child_index.insert(key, h);
                    h
                }
            };
        }
        cur
    }

    pub fn push_link(&mut self, path: &[String], position: usize) {
        let h = self.folder_for(path);
        self.nodes[h.0].items.push(Item::Link(position));
    }

    pub fn node(&self, h: Handle) -> &FolderNode {
        &self.nodes[h.0]
    }
}
