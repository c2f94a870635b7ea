pub mod columns;
pub mod pagination;
pub mod result_view;
pub mod tables;

pub use pagination::PageSize;
pub use result_view::{ResultView, ViewPhase};
