pub mod tasks;
pub mod users;

pub use tasks::TaskUseCase;
pub use users::UserUseCase;
