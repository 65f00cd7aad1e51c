//! LTI Advantage data model shared by every component.

pub mod launch;
pub mod line_item;
pub mod platform;
pub mod score;

pub use launch::{ContextClaim, EndpointClaim, LaunchToken, PlatformContext, ResourceClaim, ResourceLinkRef};
pub use line_item::{LineItem, LineItemOrigin, LineItemQuery, NewLineItem, ResolvedLineItem};
pub use platform::{AuthConfig, AuthMethod, PlatformRegistration, PlatformSpec};
pub use score::{ActivityProgress, GradingProgress, Score, SubmissionReceipt};
