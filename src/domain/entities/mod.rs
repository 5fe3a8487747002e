mod document;
mod page;

pub use document::{Document, DocumentChanges, DocumentId};
pub use page::{
    Page, PageRequest, Sort, SortDirection, SortField, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};
