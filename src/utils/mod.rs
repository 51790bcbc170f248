pub mod ip;

pub use ip::is_private_or_local;
