mod memory;
mod postgres;

pub use memory::MemoryDeviceDirectory;
pub use postgres::PgDeviceDirectory;
