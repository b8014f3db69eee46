pub mod course;
pub mod record;
pub mod remote;

pub use course::CourseId;
pub use record::{FileRecord, RecordStore};
pub use remote::{RemoteFile, RemoteFolder};
