mod clock;
mod storage;

pub use clock::SystemClock;
pub use storage::FsProjectStorage;
