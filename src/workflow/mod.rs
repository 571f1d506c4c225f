pub mod page_worker;

pub use page_worker::{PagePosition, PageWorker};
