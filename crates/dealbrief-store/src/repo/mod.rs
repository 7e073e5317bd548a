pub mod contacts;
pub mod meetings;
pub mod messages;
pub mod organizations;
pub mod users;

pub use contacts::{ContactNew, ContactsRepo};
pub use meetings::{MeetingNew, MeetingsRepo};
pub use messages::{MessageNew, MessagesRepo};
pub use organizations::OrganizationsRepo;
pub use users::{UserNew, UsersRepo};
