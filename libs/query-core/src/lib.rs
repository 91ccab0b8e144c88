//! Paging and text-filter primitives shared by the list endpoints.
//!
//! The types here are storage-agnostic: they describe *what* a listing asks
//! for (which window of an id-ordered collection, which case-insensitive
//! substring constraints) and how the answer is shaped. Turning them into SQL
//! is the job of `db::query`.

mod filter;
mod page;

pub use filter::TextFilter;
pub use page::{Page, PageError, PageInfo, PageParams, PageRequest};

#[cfg(test)]
mod tests;
