pub mod names;
pub mod directive;
pub mod envelope;
pub mod discovery;
pub mod fault;

pub use directive::{Directive, DirectiveHeader, DirectiveRequest};
pub use discovery::{Capability, DiscoveryEndpoint, DiscoveryPayload};
pub use envelope::{Context, ContextProperty, Endpoint, Event, Header, Response, Scope};
pub use fault::ErrorType;
pub use names::Namespace;
