// Backend proxy: forwards browser requests to the interview backend with a
// bounded wait and normalizes every failure into one envelope shape.
// All backend calls go through `upstream::BackendClient`.

pub mod deadline;
pub mod endpoint;
pub mod handlers;
pub mod upstream;

pub use endpoint::Endpoint;
pub use upstream::BackendClient;
