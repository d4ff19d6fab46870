pub mod import;
pub mod platform;
pub mod title;

pub use import::{ImportReport, SearchMatch};
pub use platform::Platform;
pub use title::TitleRecord;
