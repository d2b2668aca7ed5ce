use wdldidl::{Container, Item};

/// A second-level container together with the items found directly inside it.
#[derive(Debug, Clone, PartialEq)]
pub struct Folder {
    pub container: Container,
    pub items: Vec<Item>,
}

impl Folder {
    pub fn title(&self) -> &str {
        &self.container.title
    }

    /// Sum of the primary resource sizes that parse as a byte count.
    pub fn total_size(&self) -> u64 {
        self.items
            .iter()
            .filter_map(|item| item.primary_resource())
            .filter_map(|res| res.size().and_then(|size| size.into_typed()))
            .sum()
    }
}
