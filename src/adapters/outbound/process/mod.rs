/// Process adapters for running external programs
mod system_command_executor;

pub use system_command_executor::SystemCommandExecutor;
