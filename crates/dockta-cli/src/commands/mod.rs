mod eject;
mod generate;
mod init;

pub use eject::eject;
pub use generate::{GenerateArgs, generate};
pub use init::init_project;
