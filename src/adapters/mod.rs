// Adapters layer: concrete implementations of the domain ports (file reader, storage, clock).

pub mod clock;
pub mod ibs_reader;
pub mod storage;

pub use clock::SystemClock;
pub use ibs_reader::IbsReader;
pub use storage::LocalStorage;
