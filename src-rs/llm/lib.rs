pub mod hyperbolic_adapter;
pub mod rotation;
pub mod types;

pub use hyperbolic_adapter::HttpTransport;
pub use rotation::CyclicRotator;
pub use types::{
    Choice, CompletionRequest, CompletionResponse, CompletionTransport, Message, TransportError, TransportReply,
};
