//! The external converter capability.
//!
//! Font format conversion is delegated entirely to a collaborator; the trait
//! here is the seam. Two transports are provided: a local executable invoked
//! per file ([`SubprocessConverter`]) and a remote HTTP service
//! ([`RemoteConverter`]). Handlers and the CLI only ever see the trait, so
//! tests can inject a fake.

pub mod remote;
pub mod subprocess;

pub use remote::RemoteConverter;
pub use subprocess::SubprocessConverter;

use async_trait::async_trait;

use crate::batch::UploadedFont;
use crate::error::Result;
use crate::format::TargetFormat;

/// A thing that can turn font bytes into font bytes of another container
/// format, or tell us why it could not.
#[async_trait]
pub trait FontConverter: Send + Sync {
    async fn convert(&self, font: &UploadedFont, target: TargetFormat) -> Result<Vec<u8>>;
}
