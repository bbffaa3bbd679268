pub mod config;
pub mod error;
pub mod function;
pub mod group;
pub mod identity;
pub mod logger;
pub mod routing;
pub mod stack;
pub mod template;

pub use config::StackConfig;
pub use error::{CompositionError, ConfigurationError};
pub use function::{Alias, CodeArtifact, FunctionConfig, FunctionDescriptor};
pub use group::{GroupBuilder, GroupDescriptor};
pub use identity::{Attachments, Identity, PolicyDocument, PolicyStatement};
pub use logger::{LogLevel, LoggerDescriptor, LoggerTarget};
pub use routing::{Endpoint, RoutingEntry, RoutingTable};
