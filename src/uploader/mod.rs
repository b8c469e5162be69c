// Upload pipeline: the photo API client and the orchestration around it.

pub mod orchestrator;
pub mod photos_client;

pub use orchestrator::{UploadOrchestrator, UploadOutcome};
pub use photos_client::{ImageBlob, MediaItemResult, PhotosClient, UploadToken};
