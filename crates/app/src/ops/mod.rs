pub mod folder;
pub mod init;
pub mod invite;
pub mod item;
pub mod version;

pub use folder::Folder;
pub use init::Init;
pub use invite::Invite;
pub use item::Item;
pub use version::Version;
