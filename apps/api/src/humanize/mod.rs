// Humanization: the local engine, the webhook client and the job orchestrator
// that ties them to session storage.

pub mod engine;
pub mod handlers;
pub mod orchestrator;
pub mod remote;
pub mod transformer;
pub mod upload;
