pub mod endpoint;
pub(crate) mod handler;
pub mod protocol;
