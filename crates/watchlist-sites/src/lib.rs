pub mod descriptor;
pub mod matcher;

pub use descriptor::{descriptor_for, PlatformDescriptor, PLATFORMS};
pub use matcher::{classify, SiteStatus};
