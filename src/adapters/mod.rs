// Adapters layer: concrete implementations of the domain ports (range store, import, sms, transaction log).

pub mod csv_import;
pub mod memory_store;
pub mod sms;
pub mod transaction_log;
