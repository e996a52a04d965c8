mod users;

pub use users::users_page;
