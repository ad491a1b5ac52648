mod deploy;
mod package;
mod run;
mod setup;
mod watch;

pub use deploy::cmd_deploy;
pub use package::cmd_package;
pub use run::cmd_run;
pub use setup::cmd_setup;
pub use watch::cmd_watch;
