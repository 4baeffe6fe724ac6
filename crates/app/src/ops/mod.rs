pub mod combine;
pub mod derive;
pub mod init;
pub mod share;
pub mod version;

pub use combine::Combine;
pub use derive::Derive;
pub use init::Init;
pub use share::Share;
pub use version::Version;
