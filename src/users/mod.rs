mod password;
mod service;
mod store;

pub use service::{UsersService, USER_NOT_FOUND, WRONG_CREDENTIALS};
pub use store::{SqliteUserStore, User, UserCredentials, UserStore};
