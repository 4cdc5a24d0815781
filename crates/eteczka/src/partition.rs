//! Page selection and document range creation.

use std::collections::BTreeSet;

use crate::document::{DocumentRange, FileId, PageRef, UploadedFile};
use crate::error::PartitionError;
use crate::suggest::Suggester;

/// Holds the pages currently selected on the split step.
#[derive(Debug, Clone, Default)]
pub struct Partitioner {
    selection: BTreeSet<PageRef>,
}

impl Partitioner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or removes a page. Returns whether the page is selected afterwards.
    pub fn toggle(&mut self, page: PageRef) -> bool {
        if self.selection.remove(&page) {
            false
        } else {
            self.selection.insert(page);
            true
        }
    }

    pub fn is_selected(&self, page: &PageRef) -> bool {
        self.selection.contains(page)
    }

    pub fn selected(&self) -> impl Iterator<Item = &PageRef> {
        self.selection.iter()
    }

    pub fn selected_count(&self) -> usize {
        self.selection.len()
    }

    pub fn clear(&mut self) {
        self.selection.clear();
    }

    /// Drops selected pages that no longer exist in `files`.
    pub fn prune(&mut self, files: &[UploadedFile]) {
        self.selection.retain(|page| {
            files
                .iter()
                .find(|f| f.id == page.file_id)
                .is_some_and(|f| f.page(&page.page_id).is_some())
        });
    }

    /// Drops every selected page of one file.
    pub fn forget_file(&mut self, file_id: &FileId) {
        self.selection.retain(|page| &page.file_id != file_id);
    }

    pub fn can_create(&self, title: &str) -> bool {
        !self.selection.is_empty() && !title.trim().is_empty()
    }

    /// Turns the current selection into a new range.
    ///
    /// Bounds are the lowest and highest selected page numbers, whichever
    /// file they belong to. The suggested category comes from the text of
    /// the selected pages in upload order. The selection is cleared only on
    /// success.
    pub fn create_range(
        &mut self,
        title: &str,
        files: &[UploadedFile],
        existing: &[DocumentRange],
        suggester: &Suggester,
        allow_overlap: bool,
    ) -> Result<DocumentRange, PartitionError> {
        self.prune(files);

        if self.selection.is_empty() {
            return Err(PartitionError::EmptySelection);
        }
        let title = title.trim();
        if title.is_empty() {
            return Err(PartitionError::EmptyTitle);
        }

        let mut start = u32::MAX;
        let mut end = 0;
        let mut source_files = Vec::new();
        let mut texts = Vec::new();

        for file in files {
            let mut used = false;
            for page in &file.pages {
                if !self.selection.contains(&PageRef::new(&file.id, page.number)) {
                    continue;
                }
                used = true;
                start = start.min(page.number);
                end = end.max(page.number);
                if let Some(text) = &page.text {
                    texts.push(text.as_str());
                }
            }
            if used {
                source_files.push(file.id.clone());
            }
        }

        if !allow_overlap {
            if let Some(other) = existing.iter().find(|r| r.overlaps(start, end)) {
                return Err(PartitionError::Overlap {
                    start,
                    end,
                    existing: other.id.clone(),
                });
            }
        }

        let mut range = DocumentRange::new(title, start, end, source_files);
        range.suggested_category = suggester.suggest(&texts.join(" "));

        tracing::debug!(
            range_id = %range.id,
            start,
            end,
            suggested = ?range.suggested_category,
            "Created document range"
        );

        self.selection.clear();
        Ok(range)
    }
}
