pub mod entry;
pub mod settings;
pub mod user;

pub use entry::EntryRow;
pub use settings::UserSettings;
pub use user::User;
