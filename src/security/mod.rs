pub mod command_executor;
pub mod token_store;

pub use command_executor::{CommandError, SafeCommandExecutor};
pub use token_store::StageTokenStore;
