pub mod task;
pub mod user;

pub use task::{NewTask, Task, TaskPatch, TaskStatus, TaskUpdate};
pub use user::{Credentials, NewUser, Role, User, UserView};
