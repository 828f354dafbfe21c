pub mod pagination;
pub mod task;
pub mod user;

pub use pagination::PageRequest;
pub use task::{CreateTaskRequest, EditTaskRequest, NewTask, Task, TaskChanges, TaskListQuery};
pub use user::{LoginUserRequest, NewUser, RegisterUserRequest, User, UserView};
